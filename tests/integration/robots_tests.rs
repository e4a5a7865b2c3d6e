use sitemap_inspector::config::Config;
use sitemap_inspector::fetcher::{build_http_client, Severity};
use sitemap_inspector::robots::{fetch_robots, RobotsStatus};
use sitemap_inspector::url::Target;
use sitemap_inspector::Inspector;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve_robots(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_robots_blocking_sitemap() {
    let server = MockServer::start().await;
    serve_robots(&server, 200, "User-agent: *\nDisallow: /private/\nCrawl-delay: 2\n").await;

    let client = build_http_client(&Config::default().fetcher).unwrap();
    let sitemap = Url::parse(&format!("{}/private/sitemap.xml", server.uri())).unwrap();
    let report = fetch_robots(&client, &sitemap, "*").await.unwrap();

    assert_eq!(report.status, RobotsStatus::Found);
    assert_eq!(report.sitemap_allowed, Some(false));
    assert_eq!(report.crawl_delay, Some(2.0));
    assert!(report
        .findings
        .iter()
        .any(|d| d.severity == Severity::Warning && d.message.contains("/private/sitemap.xml")));
    assert!(report.findings.iter().any(|d| d.message.contains("no Sitemap")));
}

#[tokio::test]
async fn test_missing_robots() {
    let server = MockServer::start().await;
    serve_robots(&server, 404, "").await;

    let client = build_http_client(&Config::default().fetcher).unwrap();
    let sitemap = Url::parse(&format!("{}/sitemap.xml", server.uri())).unwrap();
    let report = fetch_robots(&client, &sitemap, "*").await.unwrap();

    assert_eq!(report.status, RobotsStatus::NotFound);
    assert_eq!(report.warning_count(), 0);
}

#[tokio::test]
async fn test_robots_failure_is_downgraded() {
    let server = MockServer::start().await;
    serve_robots(&server, 503, "").await;

    let inspector = Inspector::new(Config::default()).unwrap();
    let target = Target::parse(&format!("{}/sitemap.xml", server.uri())).unwrap();
    let report = inspector.check_robots(&target).await.unwrap();

    assert_eq!(report.status, RobotsStatus::Unavailable);
    assert_eq!(report.warning_count(), 1);
    assert!(report.findings[0].message.contains("503"));
}
