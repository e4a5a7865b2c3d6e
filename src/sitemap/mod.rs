//! Sitemap document model and parsing
//!
//! This module provides:
//! - The parsed document types (leaf results, index entries, extension tags)
//! - A streaming, namespace-agnostic XML parser
//! - Lenient last-modified timestamp parsing

mod dates;
mod parser;
mod types;

pub use dates::{has_time_component, parse_timestamp};
pub use parser::{parse_document, MalformedDocument};
pub use types::{ExtensionTags, IndexEntry, LeafSitemapResult, SitemapDocument, TagCategory};
