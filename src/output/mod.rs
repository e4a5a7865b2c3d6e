//! Output module for rendering inspection reports
//!
//! This module handles:
//! - The plain-text report printed to the terminal
//! - The markdown report written to a file
//! - The cost calculator over URL counts

mod cost;
mod markdown;
mod text;
mod traits;

pub use cost::CostEstimate;
pub use markdown::{format_markdown_report, write_markdown_report, MarkdownRenderer};
pub use text::TextRenderer;
pub use traits::{OutputError, OutputResult, Report, ReportRenderer};

use crate::inspector::FetchOutcome;
use crate::robots::RobotsStatus;
use chrono::Weekday;

/// Heading for one child of a sitemap index
///
/// `Sitemap: <url> (<n> URLs)` for successes, `Sitemap: <url> (Failed)` otherwise.
pub fn child_title(outcome: &FetchOutcome) -> String {
    match outcome {
        FetchOutcome::Success { url, leaf_result, .. } => {
            format!("Sitemap: {} ({} URLs)", url, leaf_result.url_count())
        }
        FetchOutcome::Failure { url, .. } => format!("Sitemap: {} (Failed)", url),
    }
}

pub(crate) fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub(crate) fn status_label(status: RobotsStatus) -> &'static str {
    match status {
        RobotsStatus::Found => "found",
        RobotsStatus::NotFound => "not found",
        RobotsStatus::Unavailable => "unavailable",
    }
}

/// Density ramp for the terminal heatmap, lightest first
const SHADES: [char; 5] = [' ', '.', ':', '*', '#'];

/// Character for a heatmap cell relative to the busiest cell
pub(crate) fn shade(value: f64, max: f64) -> char {
    if value <= 0.0 || max <= 0.0 {
        return SHADES[0];
    }
    let steps = (SHADES.len() - 1) as f64;
    let index = ((value / max) * steps).ceil() as usize;
    SHADES[index.clamp(1, SHADES.len() - 1)]
}
