use flate2::write::GzEncoder;
use flate2::Compression;
use sitemap_inspector::config::{parse_config, Config, FetcherConfig};
use sitemap_inspector::fetcher::{DocumentSource, HttpSource};
use sitemap_inspector::output::{format_markdown_report, Report, ReportRenderer, TextRenderer};
use sitemap_inspector::url::Target;
use sitemap_inspector::{FetchError, FetchOutcome, Inspection, Inspector, InspectorError};
use std::io::Write;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn urlset(base: &str, paths: &[&str]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#,
    );
    for p in paths {
        xml.push_str(&format!(
            "<url><loc>{}{}</loc><lastmod>2024-01-15T10:30:00+00:00</lastmod></url>",
            base, p
        ));
    }
    xml.push_str("</urlset>");
    xml
}

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

async fn serve(server: &MockServer, at: &str, body: impl Into<Vec<u8>>) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(body.into())
                .insert_header("content-type", "application/xml"),
        )
        .mount(server)
        .await;
}

fn target(url: String) -> Target {
    Target::parse(&url).unwrap()
}

#[tokio::test]
async fn test_index_with_failing_child() {
    let server = MockServer::start().await;
    let base = server.uri();

    let index = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>{base}/a.xml</loc><lastmod>2024-01-15</lastmod></sitemap>
  <sitemap><loc>{base}/b.xml</loc></sitemap>
  <sitemap><loc>{base}/c.xml</loc></sitemap>
</sitemapindex>"#
    );
    serve(&server, "/index.xml", index).await;
    serve(&server, "/a.xml", urlset(&base, &["/1", "/2"])).await;
    serve(&server, "/c.xml", urlset(&base, &["/2", "/3"])).await;
    Mock::given(method("GET"))
        .and(path("/b.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let inspector = Inspector::new(Config::default()).unwrap();
    let inspection = inspector
        .inspect(&target(format!("{}/index.xml", base)))
        .await
        .unwrap();

    let Inspection::Index {
        entries,
        aggregate,
        outcomes,
        ..
    } = &inspection
    else {
        panic!("expected a sitemap index");
    };

    assert_eq!(entries.len(), 3);
    assert_eq!(outcomes.len(), 3);
    assert_eq!(aggregate.url_count(), 3);
    assert_eq!(aggregate.modification_dates.len(), 4);
    assert!(aggregate.any_has_time_of_day);

    let failures: Vec<&FetchOutcome> = outcomes.iter().filter(|o| !o.is_success()).collect();
    assert_eq!(failures.len(), 1);
    match failures[0] {
        FetchOutcome::Failure { url, error_message, .. } => {
            assert_eq!(url, &format!("{}/b.xml", base));
            assert!(error_message.contains("500"));
            assert!(error_message.contains("/b.xml"));
        }
        FetchOutcome::Success { .. } => unreachable!(),
    }

    let report = Report::new(inspection.clone(), None, &Config::default());
    let text = TextRenderer.render(&report);
    assert!(text.contains(&format!("Sitemap: {}/b.xml (Failed)", base)));
    assert!(text.contains(&format!("Sitemap: {}/a.xml (2 URLs)", base)));
}

#[tokio::test]
async fn test_gzip_round_trip_matches_plain() {
    let server = MockServer::start().await;
    let base = server.uri();
    let xml = urlset(&base, &["/x", "/y", "/z", "/x"]);

    serve(&server, "/plain.xml", xml.clone()).await;
    serve(&server, "/packed.xml.gz", gzip(xml.as_bytes())).await;

    let inspector = Inspector::new(Config::default()).unwrap();
    let plain = inspector
        .inspect(&target(format!("{}/plain.xml", base)))
        .await
        .unwrap();
    let packed = inspector
        .inspect(&target(format!("{}/packed.xml.gz", base)))
        .await
        .unwrap();

    match (&plain, &packed) {
        (Inspection::Leaf { result: a, .. }, Inspection::Leaf { result: b, .. }) => {
            assert_eq!(a, b);
            assert_eq!(a.url_count(), 3);
            assert_eq!(a.entry_count, 4);
        }
        _ => panic!("expected two leaf sitemaps"),
    }

    assert!(packed
        .diagnostics()
        .iter()
        .any(|d| d.message.contains("gzip payload decompressed")));
}

#[tokio::test]
async fn test_local_gzip_file() {
    let xml = urlset("https://example.com", &["/a", "/b"]);
    let mut file = tempfile::Builder::new().suffix(".xml.gz").tempfile().unwrap();
    file.write_all(&gzip(xml.as_bytes())).unwrap();

    let inspector = Inspector::new(Config::default()).unwrap();
    let target = Target::parse(file.path().to_str().unwrap()).unwrap();
    let inspection = inspector.inspect(&target).await.unwrap();

    assert!(!inspection.is_index());
    assert_eq!(inspection.url_count(), 2);
    assert!(inspector.check_robots(&target).await.is_none());
}

#[tokio::test]
async fn test_top_level_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let inspector = Inspector::new(Config::default()).unwrap();
    let error = inspector
        .inspect(&target(format!("{}/gone.xml", server.uri())))
        .await
        .unwrap_err();

    match error {
        InspectorError::Fetch(FetchError::Status { url, status }) => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/gone.xml"));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_oversized_document_rejected() {
    let server = MockServer::start().await;
    let base = server.uri();
    serve(&server, "/big.xml", urlset(&base, &["/1", "/2", "/3", "/4"])).await;

    let config = parse_config(
        "[fetcher]\nmax-download-bytes = 64\nmax-decompressed-bytes = 64\n",
    )
    .unwrap();
    let inspector = Inspector::new(config).unwrap();
    let error = inspector
        .inspect(&target(format!("{}/big.xml", base)))
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        InspectorError::Fetch(FetchError::TooLarge { limit: 64, .. })
    ));
}

#[tokio::test]
async fn test_malformed_and_empty_documents() {
    let server = MockServer::start().await;
    let base = server.uri();
    serve(&server, "/broken.xml", "<urlset><url><loc>oops").await;
    serve(&server, "/empty.xml", "<urlset></urlset>").await;

    let inspector = Inspector::new(Config::default()).unwrap();

    let error = inspector
        .inspect(&target(format!("{}/broken.xml", base)))
        .await
        .unwrap_err();
    assert!(matches!(error, InspectorError::MalformedDocument { .. }));
    assert!(error.to_string().contains("/broken.xml"));

    let error = inspector
        .inspect(&target(format!("{}/empty.xml", base)))
        .await
        .unwrap_err();
    assert!(error.is_empty_result());
}

#[tokio::test]
async fn test_markdown_report_for_leaf() {
    let server = MockServer::start().await;
    let base = server.uri();
    let xml = format!(
        r#"<urlset xmlns:video="http://www.google.com/schemas/sitemap-video/1.1">
  <url><loc>{base}/watch</loc><changefreq>weekly</changefreq>
    <video:video><video:title>Demo</video:title></video:video></url>
</urlset>"#
    );
    serve(&server, "/video.xml", xml).await;

    let mut config = Config::default();
    config.cost.price_per_thousand_urls = 1000.0;
    let inspector = Inspector::new(config.clone()).unwrap();
    let inspection = inspector
        .inspect(&target(format!("{}/video.xml", base)))
        .await
        .unwrap();

    let markdown = format_markdown_report(&Report::new(inspection, None, &config));
    assert!(markdown.contains("- **Total URLs**: 1"));
    assert!(markdown.contains("- **standard**: changefreq"));
    assert!(markdown.contains("- **video**: title, video"));
    assert!(markdown.contains("| 1 | 1000.00 USD | 1.00 USD | 1.00 USD |"));
}

#[tokio::test]
async fn test_root_url_without_slash_is_not_a_redirect() {
    let server = MockServer::start().await;
    serve(&server, "/", urlset("https://example.com", &["/a"])).await;

    let source = HttpSource::new(&FetcherConfig::default()).unwrap();
    let doc = source.fetch(&server.uri()).await.unwrap();

    assert!(doc.text.contains("https://example.com/a"));
    assert!(!doc
        .diagnostics
        .iter()
        .any(|d| d.message.starts_with("redirected to")));
}

#[tokio::test]
async fn test_redirect_is_noted() {
    let server = MockServer::start().await;
    serve(&server, "/sitemap.xml", urlset("https://example.com", &["/a"])).await;
    Mock::given(method("GET"))
        .and(path("/old-sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/sitemap.xml", server.uri()).as_str()),
        )
        .mount(&server)
        .await;

    let source = HttpSource::new(&FetcherConfig::default()).unwrap();
    let doc = source
        .fetch(&format!("{}/old-sitemap.xml", server.uri()))
        .await
        .unwrap();

    let expected = format!("redirected to {}/sitemap.xml", server.uri());
    assert!(doc.diagnostics.iter().any(|d| d.message == expected));
}
