use crate::FetchError;
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// What the user asked to inspect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// An http(s) sitemap URL
    Remote(Url),
    /// A sitemap file on disk (`.xml` or `.xml.gz`)
    Local(PathBuf),
}

impl Target {
    /// Classifies a command-line argument as a URL or a file path
    ///
    /// Anything with a `scheme://` prefix must be http or https; everything
    /// else is treated as a path.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitemap_inspector::url::Target;
    ///
    /// assert!(matches!(Target::parse("https://example.com/sitemap.xml"), Ok(Target::Remote(_))));
    /// assert!(matches!(Target::parse("./sitemap.xml.gz"), Ok(Target::Local(_))));
    /// assert!(Target::parse("ftp://example.com/sitemap.xml").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, FetchError> {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Err(FetchError::InvalidUrl {
                url: input.to_string(),
                message: "empty target".to_string(),
            });
        }

        if !trimmed.contains("://") {
            return Ok(Self::Local(PathBuf::from(trimmed)));
        }

        let url = parse_http_url(trimmed)?;
        Ok(Self::Remote(url))
    }

    /// Display label used in reports and error messages
    pub fn label(&self) -> String {
        match self {
            Self::Remote(url) => url.to_string(),
            Self::Local(path) => path.display().to_string(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Parses an absolute http(s) URL
pub fn parse_http_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw).map_err(|e| FetchError::InvalidUrl {
        url: raw.to_string(),
        message: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::InvalidUrl {
            url: raw.to_string(),
            message: format!("unsupported scheme '{}'", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_remote() {
        let target = Target::parse("https://example.com/sitemap.xml").unwrap();
        assert_eq!(
            target,
            Target::Remote(Url::parse("https://example.com/sitemap.xml").unwrap())
        );
    }

    #[test]
    fn test_parse_local_paths() {
        assert_eq!(
            Target::parse("sitemap.xml").unwrap(),
            Target::Local(PathBuf::from("sitemap.xml"))
        );
        assert_eq!(
            Target::parse(" /var/data/sitemap.xml.gz ").unwrap(),
            Target::Local(PathBuf::from("/var/data/sitemap.xml.gz"))
        );
    }

    #[test]
    fn test_parse_rejects_other_schemes() {
        let err = Target::parse("ftp://example.com/sitemap.xml").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
        assert_eq!(err.url(), "ftp://example.com/sitemap.xml");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(Target::parse("   ").is_err());
    }

    #[test]
    fn test_label() {
        let target = Target::parse("https://example.com/sitemap.xml").unwrap();
        assert_eq!(target.label(), "https://example.com/sitemap.xml");
        assert_eq!(target.to_string(), target.label());
    }
}
