use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitemap_inspector::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/sitemap.xml").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the robots.txt location for the origin serving `url`
///
/// Scheme, host and port are kept; path, query and fragment are dropped.
/// Returns `None` for URLs that have no host (e.g. `file:` or `data:`).
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitemap_inspector::url::robots_url;
///
/// let url = Url::parse("https://example.com:8443/maps/sitemap.xml?v=2").unwrap();
/// assert_eq!(
///     robots_url(&url).unwrap().as_str(),
///     "https://example.com:8443/robots.txt"
/// );
/// ```
pub fn robots_url(url: &Url) -> Option<Url> {
    url.host_str()?;
    let mut robots = url.clone();
    robots.set_path("/robots.txt");
    robots.set_query(None);
    robots.set_fragment(None);
    Some(robots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_domain() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_with_port() {
        let url = Url::parse("https://example.com:8080/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_mixed_case() {
        let url = Url::parse("https://Blog.Example.COM/sitemap.xml").unwrap();
        assert_eq!(extract_domain(&url), Some("blog.example.com".to_string()));
    }

    #[test]
    fn test_robots_url_drops_path_and_query() {
        let url = Url::parse("http://example.com/a/b/sitemap.xml.gz?x=1#frag").unwrap();
        assert_eq!(
            robots_url(&url).unwrap().as_str(),
            "http://example.com/robots.txt"
        );
    }

    #[test]
    fn test_robots_url_without_host() {
        let url = Url::parse("file:///tmp/sitemap.xml").unwrap();
        assert!(robots_url(&url).is_none());
    }
}
