//! Document fetcher module
//!
//! This module turns a sitemap location into decoded text:
//! - HTTP fetching with a size ceiling and single attempt per URL
//! - Local file loading for uploaded `.xml` / `.xml.gz` files
//! - Gzip magic-byte detection and charset fallback decoding
//! - Diagnostics describing what happened along the way

mod decode;
mod diagnostics;
mod file;
mod http;

pub use decode::{decode_body, decode_text, decompress_gzip, is_gzip, Charset, DecodedText};
pub use diagnostics::{Diagnostic, Severity};
pub use file::load_file;
pub use http::{build_http_client, fetch_document, HttpSource};

use crate::FetchError;
use async_trait::async_trait;
use std::fmt;

/// A successfully loaded and decoded document
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// The requested URL (or file path)
    pub url: String,

    /// Decoded document text
    pub text: String,

    /// Charset that decoded the body
    pub charset: Charset,

    /// Whether the body was gzip-compressed
    pub compressed: bool,

    /// Raw bytes read before decompression
    pub bytes_read: u64,

    /// Notes gathered while loading
    pub diagnostics: Vec<Diagnostic>,
}

/// A failed load, with whatever diagnostics were gathered before the failure
#[derive(Debug)]
pub struct FetchFailure {
    pub error: FetchError,
    pub diagnostics: Vec<Diagnostic>,
}

impl FetchFailure {
    pub fn with_diagnostics(error: FetchError, diagnostics: Vec<Diagnostic>) -> Self {
        Self { error, diagnostics }
    }
}

impl From<FetchError> for FetchFailure {
    fn from(error: FetchError) -> Self {
        Self {
            error,
            diagnostics: Vec::new(),
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

/// Anything that can produce sitemap text for a URL
///
/// The HTTP implementation is [`HttpSource`]; tests substitute in-memory
/// sources to exercise the aggregator without a network.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetches and decodes the document at `url`
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, FetchFailure>;
}
