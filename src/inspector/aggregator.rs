//! Sitemap-index fan-out
//!
//! Every child sitemap is fetched and parsed independently; a failure
//! becomes a [`FetchOutcome::Failure`] for that child only. Outcomes are
//! collected in completion order and merged afterwards in a single pass,
//! so no task ever writes into shared state.

use crate::fetcher::{Diagnostic, DocumentSource};
use crate::sitemap::{parse_document, LeafSitemapResult, SitemapDocument};
use crate::InspectorError;
use chrono::{DateTime, FixedOffset};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;

/// Result of fetching and parsing one child sitemap
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success {
        url: String,
        leaf_result: LeafSitemapResult,
        diagnostics: Vec<Diagnostic>,
    },
    Failure {
        url: String,
        error_message: String,
        diagnostics: Vec<Diagnostic>,
    },
}

impl FetchOutcome {
    pub fn url(&self) -> &str {
        match self {
            Self::Success { url, .. } | Self::Failure { url, .. } => url,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::Success { diagnostics, .. } | Self::Failure { diagnostics, .. } => diagnostics,
        }
    }

    /// The parsed child, for successes
    pub fn leaf_result(&self) -> Option<&LeafSitemapResult> {
        match self {
            Self::Success { leaf_result, .. } => Some(leaf_result),
            Self::Failure { .. } => None,
        }
    }
}

/// Global view over every successful child of an index
///
/// Tag inventories are deliberately absent: they are reported per child.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateResult {
    /// Union of all child URL sets
    pub urls: HashSet<String>,

    /// Concatenation of all child modification dates
    pub modification_dates: Vec<DateTime<FixedOffset>>,

    /// True if any child saw a timestamp with a time of day
    pub any_has_time_of_day: bool,

    pub succeeded: usize,
    pub failed: usize,
}

impl AggregateResult {
    /// Folds outcomes into a single aggregate
    ///
    /// Failures only bump the failure count. The result does not depend
    /// on the order of `outcomes`, except for the order of
    /// `modification_dates`, which is only ever consumed as a multiset.
    pub fn merge(outcomes: &[FetchOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |mut acc, outcome| {
            match outcome {
                FetchOutcome::Success { leaf_result, .. } => {
                    acc.urls.extend(leaf_result.urls.iter().cloned());
                    acc.modification_dates
                        .extend(leaf_result.modification_dates.iter().copied());
                    acc.any_has_time_of_day |= leaf_result.has_time_of_day;
                    acc.succeeded += 1;
                }
                FetchOutcome::Failure { .. } => acc.failed += 1,
            }
            acc
        })
    }

    /// Number of distinct URLs across all children
    pub fn url_count(&self) -> usize {
        self.urls.len()
    }

    pub fn child_count(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Fetches and parses child sitemaps concurrently, then merges the results
///
/// # Arguments
///
/// * `source` - Where documents come from
/// * `child_urls` - Child sitemap locations, usually from an index
/// * `concurrency` - Maximum number of fetches in flight (at least 1)
///
/// # Returns
///
/// The merged aggregate and one outcome per child URL, in completion order
pub async fn aggregate<S>(
    source: &S,
    child_urls: &[String],
    concurrency: usize,
) -> (AggregateResult, Vec<FetchOutcome>)
where
    S: DocumentSource + ?Sized,
{
    tracing::info!(
        "Fetching {} child sitemap(s), {} at a time",
        child_urls.len(),
        concurrency.max(1)
    );

    let outcomes: Vec<FetchOutcome> = stream::iter(child_urls.iter())
        .map(|url| inspect_child(source, url))
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let aggregate = AggregateResult::merge(&outcomes);
    tracing::info!(
        "Merged {} child sitemap(s): {} succeeded, {} failed, {} distinct URLs",
        aggregate.child_count(),
        aggregate.succeeded,
        aggregate.failed,
        aggregate.url_count()
    );

    (aggregate, outcomes)
}

/// Fetches and parses one child sitemap; never fails as a whole
async fn inspect_child<S>(source: &S, url: &str) -> FetchOutcome
where
    S: DocumentSource + ?Sized,
{
    let document = match source.fetch(url).await {
        Ok(document) => document,
        Err(failure) => {
            tracing::warn!("Child sitemap failed: {}", failure.error);
            return FetchOutcome::Failure {
                url: url.to_string(),
                error_message: failure.error.to_string(),
                diagnostics: failure.diagnostics,
            };
        }
    };

    let mut diagnostics = document.diagnostics;

    match parse_document(&document.text) {
        Ok(SitemapDocument::Leaf(leaf_result)) => {
            note_skipped(&leaf_result, &mut diagnostics);
            tracing::debug!("{}: {} URLs", url, leaf_result.url_count());
            FetchOutcome::Success {
                url: url.to_string(),
                leaf_result,
                diagnostics,
            }
        }
        Ok(SitemapDocument::Index(entries)) => {
            tracing::warn!("{} is itself a sitemap index; not following", url);
            FetchOutcome::Failure {
                url: url.to_string(),
                error_message: format!(
                    "nested sitemap index ({} child references not followed)",
                    entries.len()
                ),
                diagnostics,
            }
        }
        Err(e) => {
            let error = InspectorError::MalformedDocument {
                url: url.to_string(),
                message: e.message,
            };
            tracing::warn!("{}", error);
            FetchOutcome::Failure {
                url: url.to_string(),
                error_message: error.to_string(),
                diagnostics,
            }
        }
    }
}

/// Records the tolerant-parsing decisions of a leaf as diagnostics
pub(crate) fn note_skipped(leaf: &LeafSitemapResult, diagnostics: &mut Vec<Diagnostic>) {
    if leaf.skipped_entries > 0 {
        diagnostics.push(Diagnostic::warning(format!(
            "{} entries without a usable <loc> were skipped",
            leaf.skipped_entries
        )));
    }
    if leaf.unparsed_dates > 0 {
        diagnostics.push(Diagnostic::warning(format!(
            "{} unparseable <lastmod> values were ignored",
            leaf.unparsed_dates
        )));
    }
}
