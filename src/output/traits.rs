//! Report renderer trait and the report model
//!
//! This module defines the data a report is rendered from and the trait
//! every output format implements.

use crate::config::Config;
use crate::inspector::{FetchOutcome, Inspection};
use crate::output::cost::CostEstimate;
use crate::robots::RobotsReport;
use crate::stats::DateSummary;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

impl From<OutputError> for crate::InspectorError {
    fn from(error: OutputError) -> Self {
        crate::InspectorError::Output(error.to_string())
    }
}

/// Everything needed to render one inspection
#[derive(Debug, Clone)]
pub struct Report {
    pub inspection: Inspection,

    /// Date statistics over the whole inspection
    pub summary: DateSummary,

    pub robots: Option<RobotsReport>,
    pub cost: CostEstimate,

    /// Whether to append the URL listing
    pub list_urls: bool,
    pub max_listed_urls: usize,

    /// Reference instant for every recency window in the report
    pub generated_at: DateTime<Utc>,
}

impl Report {
    /// Builds a report relative to the current time
    pub fn new(inspection: Inspection, robots: Option<RobotsReport>, config: &Config) -> Self {
        Self::at(inspection, robots, config, Utc::now())
    }

    /// Builds a report relative to `now`
    pub fn at(
        inspection: Inspection,
        robots: Option<RobotsReport>,
        config: &Config,
        now: DateTime<Utc>,
    ) -> Self {
        let summary = DateSummary::at(
            inspection.modification_dates(),
            inspection.has_time_of_day(),
            now,
        );
        let cost = CostEstimate::compute(inspection.url_count(), &config.cost);

        Self {
            inspection,
            summary,
            robots,
            cost,
            list_urls: config.output.list_urls,
            max_listed_urls: config.output.max_listed_urls,
            generated_at: now,
        }
    }

    /// Date statistics for one child, on the report's clock
    pub fn child_summary(&self, outcome: &FetchOutcome) -> Option<DateSummary> {
        outcome.leaf_result().map(|leaf| {
            DateSummary::at(
                &leaf.modification_dates,
                leaf.has_time_of_day,
                self.generated_at,
            )
        })
    }
}

/// Trait for report renderers
///
/// Renderers are pure: they turn a report into text and leave writing
/// it somewhere to the caller.
pub trait ReportRenderer {
    /// Renders the complete report
    ///
    /// # Arguments
    ///
    /// * `report` - The report to render
    fn render(&self, report: &Report) -> String;
}
