//! HTTP fetcher implementation
//!
//! This module handles all network requests for sitemap documents, including:
//! - Building HTTP clients with the configured user agent and timeouts
//! - Streaming bodies under a size ceiling
//! - Error classification into [`FetchError`] variants

use crate::config::FetcherConfig;
use crate::fetcher::decode::decode_body;
use crate::fetcher::{Diagnostic, DocumentSource, FetchFailure, FetchedDocument};
use crate::url::parse_http_url;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Maximum number of redirects followed for a single document
const MAX_REDIRECTS: usize = 10;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sitemap_inspector::config::FetcherConfig;
/// use sitemap_inspector::fetcher::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Classifies a transport error for the given URL
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

/// Fetches a document over HTTP and decodes it to text
///
/// # Request Flow
///
/// 1. Validate the URL (absolute http or https)
/// 2. Send a single GET request (no retries)
/// 3. Reject non-2xx responses
/// 4. Reject bodies whose `Content-Length` exceeds the download ceiling
/// 5. Stream the body, aborting once the ceiling is crossed
/// 6. Gunzip (magic-byte detection) and decode with charset fallback
///
/// Diagnostics gathered before a failure are returned alongside the error.
pub async fn fetch_document(
    client: &Client,
    url: &str,
    limits: &FetcherConfig,
) -> Result<FetchedDocument, FetchFailure> {
    let mut diagnostics = Vec::new();

    let parsed = parse_http_url(url)?;

    tracing::debug!("Fetching {}", url);

    let mut response = client
        .get(parsed.clone())
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if response.url() != &parsed {
        diagnostics.push(Diagnostic::info(format!("redirected to {}", response.url())));
    }

    if !status.is_success() {
        return Err(FetchFailure::with_diagnostics(
            FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            },
            diagnostics,
        ));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if content_type.contains("text/html") {
        diagnostics.push(Diagnostic::warning(format!(
            "served with Content-Type {}",
            content_type
        )));
    }

    let limit = limits.max_download_bytes;
    if let Some(length) = response.content_length() {
        if length > limit {
            return Err(FetchFailure::with_diagnostics(
                FetchError::TooLarge {
                    url: url.to_string(),
                    limit,
                },
                diagnostics,
            ));
        }
    }

    let mut body: Vec<u8> = Vec::new();
    loop {
        let chunk = match response.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => {
                return Err(FetchFailure::with_diagnostics(
                    classify_error(url, e),
                    diagnostics,
                ))
            }
        };

        if (body.len() + chunk.len()) as u64 > limit {
            return Err(FetchFailure::with_diagnostics(
                FetchError::TooLarge {
                    url: url.to_string(),
                    limit,
                },
                diagnostics,
            ));
        }
        body.extend_from_slice(&chunk);
    }

    let bytes_read = body.len() as u64;
    match decode_body(&body, limits, url, &mut diagnostics) {
        Ok(decoded) => Ok(FetchedDocument {
            url: url.to_string(),
            text: decoded.text,
            charset: decoded.charset,
            compressed: decoded.compressed,
            bytes_read,
            diagnostics,
        }),
        Err(error) => Err(FetchFailure::with_diagnostics(error, diagnostics)),
    }
}

/// [`DocumentSource`] backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    limits: FetcherConfig,
}

impl HttpSource {
    /// Creates a source from the fetcher configuration
    pub fn new(config: &FetcherConfig) -> Result<Self, FetchError> {
        let client = build_http_client(config).map_err(|e| FetchError::Http {
            url: String::new(),
            source: e,
        })?;
        Ok(Self::with_client(client, config.clone()))
    }

    /// Wraps an existing client
    pub fn with_client(client: Client, limits: FetcherConfig) -> Self {
        Self { client, limits }
    }

    /// The underlying client, shared with the robots.txt check
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, FetchFailure> {
        fetch_document(&self.client, url, &self.limits).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&FetcherConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_http_source_new() {
        let source = HttpSource::new(&FetcherConfig::default()).unwrap();
        assert!(format!("{:?}", source.client()).contains("Client"));
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_http_url() {
        let source = HttpSource::new(&FetcherConfig::default()).unwrap();
        let failure = source.fetch("ftp://example.com/sitemap.xml").await.unwrap_err();
        assert!(matches!(failure.error, FetchError::InvalidUrl { .. }));
        assert!(failure.diagnostics.is_empty());
    }

    // Network behaviour is covered with wiremock in the integration tests
}
