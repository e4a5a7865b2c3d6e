//! Sitemap Inspector: fetch, parse and summarize XML sitemaps
//!
//! This crate loads a sitemap (from a URL or a local `.xml`/`.xml.gz` file),
//! follows one level of sitemap-index indirection, and reports URL counts,
//! modification-date statistics, extension tags and robots.txt findings.

pub mod config;
pub mod fetcher;
pub mod inspector;
pub mod output;
pub mod robots;
pub mod sitemap;
pub mod stats;
pub mod url;

use thiserror::Error;

/// Main error type for sitemap inspection
#[derive(Debug, Error)]
pub enum InspectorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Malformed sitemap document at {url}: {message}")]
    MalformedDocument { url: String, message: String },

    #[error("No usable URLs found in {url}")]
    EmptyResult { url: String },

    #[error("Robots.txt error for {url}: {message}")]
    Robots { url: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output error: {0}")]
    Output(String),
}

impl InspectorError {
    /// Returns true for the "nothing found" condition, which is reported
    /// to the user rather than treated as a crash
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::EmptyResult { .. })
    }
}

/// Errors raised while retrieving or decoding a document
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Document at {url} exceeds the {limit} byte limit")]
    TooLarge { url: String, limit: u64 },

    #[error("Failed to read {url}: {source}")]
    Io { url: String, source: std::io::Error },

    #[error("Failed to decompress {url}: {message}")]
    Decompress { url: String, message: String },

    #[error("No supported text encoding matched the content of {url}")]
    Decode { url: String },

    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

impl FetchError {
    /// The URL (or file path) that triggered this error
    pub fn url(&self) -> &str {
        match self {
            Self::Http { url, .. }
            | Self::Timeout { url }
            | Self::Status { url, .. }
            | Self::TooLarge { url, .. }
            | Self::Io { url, .. }
            | Self::Decompress { url, .. }
            | Self::Decode { url }
            | Self::InvalidUrl { url, .. } => url,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for inspection operations
pub type Result<T> = std::result::Result<T, InspectorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use fetcher::{DocumentSource, FetchFailure, FetchedDocument, HttpSource};
pub use inspector::{aggregate, AggregateResult, FetchOutcome, Inspection, Inspector};
pub use sitemap::{parse_document, LeafSitemapResult, SitemapDocument};
pub use stats::{bucket, hour_weekday_distribution, RecencyBuckets};
