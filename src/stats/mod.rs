//! Statistics over sitemap modification dates
//!
//! This module provides:
//! - Overlapping recency buckets (24h, week, month, year)
//! - The weekday by hour-of-day distribution matrix
//! - [`DateSummary`], which bundles both for reporting

mod distribution;
mod recency;

pub use distribution::{hour_weekday_distribution, HourWeekdayDistribution, WEEKDAYS};
pub use recency::{bucket, bucket_at, RecencyBuckets, RecencyWindow};

use chrono::{DateTime, FixedOffset, Utc};

/// Everything the reports show about a set of modification dates
#[derive(Debug, Clone, PartialEq)]
pub struct DateSummary {
    pub buckets: RecencyBuckets,
    pub distribution: HourWeekdayDistribution,
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,

    /// Whether any source timestamp carried a time of day; the hour axis
    /// of the distribution is meaningless otherwise
    pub has_time_of_day: bool,
}

impl DateSummary {
    /// Summarizes dates relative to the current time
    pub fn new(dates: &[DateTime<FixedOffset>], has_time_of_day: bool) -> Self {
        Self::at(dates, has_time_of_day, Utc::now())
    }

    /// Summarizes dates relative to `now`
    pub fn at(dates: &[DateTime<FixedOffset>], has_time_of_day: bool, now: DateTime<Utc>) -> Self {
        let utc = dates.iter().map(|d| d.with_timezone(&Utc));

        Self {
            buckets: bucket_at(dates, now),
            distribution: hour_weekday_distribution(dates),
            earliest: utc.clone().min(),
            latest: utc.max(),
            has_time_of_day,
        }
    }

    /// Number of timestamps summarized
    pub fn date_count(&self) -> usize {
        self.distribution.total()
    }

    /// Whether the hour-of-day distribution should be displayed
    pub fn show_distribution(&self) -> bool {
        self.has_time_of_day && !self.distribution.is_empty()
    }
}
