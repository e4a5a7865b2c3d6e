//! URL handling module for Sitemap Inspector
//!
//! This module classifies the inspection target and derives related
//! locations such as the origin's robots.txt.

mod domain;
mod target;

// Re-export main functions
pub use domain::{extract_domain, robots_url};
pub use target::{parse_http_url, Target};
