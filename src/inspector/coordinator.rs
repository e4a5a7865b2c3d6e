//! Inspection coordinator - top-level orchestration
//!
//! This module ties the pieces together for one target:
//! - Loading the document (HTTP or local file)
//! - Parsing it and deciding between leaf and index handling
//! - Fanning out over index children
//! - The optional robots.txt cross-check

use crate::config::Config;
use crate::fetcher::{
    build_http_client, load_file, Diagnostic, DocumentSource, FetchedDocument, HttpSource,
};
use crate::inspector::aggregator::{aggregate, note_skipped, AggregateResult, FetchOutcome};
use crate::robots::{fetch_robots, RobotsReport};
use crate::sitemap::{parse_document, IndexEntry, LeafSitemapResult, SitemapDocument};
use crate::stats::DateSummary;
use crate::url::{robots_url, Target};
use crate::{FetchError, InspectorError, Result};
use chrono::{DateTime, FixedOffset};
use reqwest::Client;
use url::Url;

/// What an inspection found
#[derive(Debug, Clone, PartialEq)]
pub enum Inspection {
    /// The target was a single `<urlset>`
    Leaf {
        url: String,
        result: LeafSitemapResult,
        diagnostics: Vec<Diagnostic>,
    },

    /// The target was a `<sitemapindex>`; children were fetched
    Index {
        url: String,
        entries: Vec<IndexEntry>,
        aggregate: AggregateResult,
        /// One per child, in completion order
        outcomes: Vec<FetchOutcome>,
        diagnostics: Vec<Diagnostic>,
    },
}

impl Inspection {
    pub fn url(&self) -> &str {
        match self {
            Self::Leaf { url, .. } | Self::Index { url, .. } => url,
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index { .. })
    }

    /// Distinct URLs found, across all children for an index
    pub fn url_count(&self) -> usize {
        match self {
            Self::Leaf { result, .. } => result.url_count(),
            Self::Index { aggregate, .. } => aggregate.url_count(),
        }
    }

    pub fn modification_dates(&self) -> &[DateTime<FixedOffset>] {
        match self {
            Self::Leaf { result, .. } => &result.modification_dates,
            Self::Index { aggregate, .. } => &aggregate.modification_dates,
        }
    }

    pub fn has_time_of_day(&self) -> bool {
        match self {
            Self::Leaf { result, .. } => result.has_time_of_day,
            Self::Index { aggregate, .. } => aggregate.any_has_time_of_day,
        }
    }

    /// Every distinct URL in lexical order
    pub fn sorted_urls(&self) -> Vec<&str> {
        match self {
            Self::Leaf { result, .. } => result.sorted_urls(),
            Self::Index { aggregate, .. } => {
                let mut urls: Vec<&str> = aggregate.urls.iter().map(String::as_str).collect();
                urls.sort_unstable();
                urls
            }
        }
    }

    /// Date statistics for the whole inspection
    pub fn date_summary(&self) -> DateSummary {
        DateSummary::new(self.modification_dates(), self.has_time_of_day())
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::Leaf { diagnostics, .. } | Self::Index { diagnostics, .. } => diagnostics,
        }
    }
}

/// Runs inspections with a shared configuration and document source
pub struct Inspector<S = HttpSource> {
    config: Config,
    source: S,
    client: Client,
}

impl Inspector<HttpSource> {
    /// Creates an inspector that fetches over HTTP
    ///
    /// # Arguments
    ///
    /// * `config` - The inspector configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Inspector)` - Ready to inspect
    /// * `Err(InspectorError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self> {
        let source = HttpSource::new(&config.fetcher)?;
        let client = source.client().clone();
        Ok(Self {
            config,
            source,
            client,
        })
    }
}

impl<S: DocumentSource> Inspector<S> {
    /// Creates an inspector over a custom document source
    ///
    /// The robots.txt check still goes over HTTP with its own client.
    pub fn with_source(config: Config, source: S) -> Result<Self> {
        let client = build_http_client(&config.fetcher).map_err(|e| FetchError::Http {
            url: String::new(),
            source: e,
        })?;
        Ok(Self {
            config,
            source,
            client,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Inspects a sitemap URL or file
    ///
    /// # Flow
    ///
    /// 1. Load and decode the target document
    /// 2. Parse it; a malformed top-level document is a final failure
    /// 3. Leaf: return its result directly
    /// 4. Index: fetch every child concurrently and merge the successes
    ///
    /// # Returns
    ///
    /// * `Ok(Inspection)` - Leaf or index results
    /// * `Err(InspectorError::EmptyResult)` - Well-formed but nothing usable
    /// * `Err(InspectorError)` - The target itself could not be loaded or parsed
    pub async fn inspect(&self, target: &Target) -> Result<Inspection> {
        tracing::info!("Inspecting {}", target);

        let document = self.load(target).await?;
        let url = target.label();
        let mut diagnostics = document.diagnostics;

        let parsed = parse_document(&document.text).map_err(|e| {
            let error = InspectorError::MalformedDocument {
                url: url.clone(),
                message: e.message,
            };
            tracing::error!("{}", error);
            error
        })?;

        match parsed {
            SitemapDocument::Leaf(result) => {
                if result.url_count() == 0 {
                    return Err(InspectorError::EmptyResult { url });
                }
                note_skipped(&result, &mut diagnostics);
                tracing::info!("Leaf sitemap with {} URLs", result.url_count());
                Ok(Inspection::Leaf {
                    url,
                    result,
                    diagnostics,
                })
            }
            SitemapDocument::Index(entries) => {
                if entries.is_empty() {
                    return Err(InspectorError::EmptyResult { url });
                }
                tracing::info!("Sitemap index with {} child sitemaps", entries.len());

                let base = match target {
                    Target::Remote(base) => Some(base),
                    Target::Local(_) => None,
                };
                let child_urls: Vec<String> = entries
                    .iter()
                    .map(|entry| resolve_child(base, &entry.url))
                    .collect();

                let (aggregate, outcomes) = aggregate(
                    &self.source,
                    &child_urls,
                    self.config.aggregator.max_concurrent_fetches,
                )
                .await;

                Ok(Inspection::Index {
                    url,
                    entries,
                    aggregate,
                    outcomes,
                    diagnostics,
                })
            }
        }
    }

    /// Cross-checks robots.txt for a remote target
    ///
    /// Returns `None` for local files. Retrieval failures are downgraded
    /// to a report carrying a single warning.
    pub async fn check_robots(&self, target: &Target) -> Option<RobotsReport> {
        let Target::Remote(sitemap_url) = target else {
            return None;
        };

        let user_agent = &self.config.robots.user_agent;
        match fetch_robots(&self.client, sitemap_url, user_agent).await {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::warn!("{}", e);
                let location = robots_url(sitemap_url)
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| sitemap_url.to_string());
                Some(RobotsReport::unavailable(location, e.to_string()))
            }
        }
    }

    async fn load(&self, target: &Target) -> Result<FetchedDocument> {
        let loaded = match target {
            Target::Remote(url) => self.source.fetch(url.as_str()).await,
            Target::Local(path) => load_file(path, &self.config.fetcher).await,
        };

        loaded.map_err(|failure| {
            for diagnostic in &failure.diagnostics {
                tracing::warn!("{}", diagnostic);
            }
            tracing::error!("{}", failure.error);
            InspectorError::Fetch(failure.error)
        })
    }
}

/// Resolves a child location against the index URL when it is relative
fn resolve_child(base: Option<&Url>, raw: &str) -> String {
    if Url::parse(raw).is_ok() {
        return raw.to_string();
    }
    base.and_then(|base| base.join(raw).ok())
        .map(|url| url.to_string())
        .unwrap_or_else(|| raw.to_string())
}
