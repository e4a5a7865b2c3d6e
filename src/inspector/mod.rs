//! Sitemap inspection
//!
//! This module contains the core inspection logic:
//! - Concurrent fan-out over the children of a sitemap index
//! - Single-pass merging of per-child results
//! - Top-level coordination for a URL or file target

mod aggregator;
mod coordinator;

pub use aggregator::{aggregate, AggregateResult, FetchOutcome};
pub use coordinator::{Inspection, Inspector};
