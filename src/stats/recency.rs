use chrono::{DateTime, Duration, TimeZone, Utc};

/// Look-back windows, narrowest first
const WINDOWS: [(RecencyWindow, i64); 4] = [
    (RecencyWindow::Day, 1),
    (RecencyWindow::Week, 7),
    (RecencyWindow::Month, 30),
    (RecencyWindow::Year, 365),
];

/// A fixed look-back window ending at the reference instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecencyWindow {
    Day,
    Week,
    Month,
    Year,
}

impl RecencyWindow {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Day => "Last 24 hours",
            Self::Week => "Last 7 days",
            Self::Month => "Last 30 days",
            Self::Year => "Last 365 days",
        }
    }
}

/// Counts of timestamps falling inside each look-back window
///
/// Windows overlap: a timestamp from the last day is also counted
/// in the week, month and year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecencyBuckets {
    pub last_24h: usize,
    pub last_week: usize,
    pub last_month: usize,
    pub last_year: usize,
}

impl RecencyBuckets {
    pub fn get(&self, window: RecencyWindow) -> usize {
        match window {
            RecencyWindow::Day => self.last_24h,
            RecencyWindow::Week => self.last_week,
            RecencyWindow::Month => self.last_month,
            RecencyWindow::Year => self.last_year,
        }
    }

    /// Windows with their counts, narrowest first
    pub fn iter(&self) -> impl Iterator<Item = (RecencyWindow, usize)> + '_ {
        WINDOWS.iter().map(move |(window, _)| (*window, self.get(*window)))
    }

    fn slot(&mut self, window: RecencyWindow) -> &mut usize {
        match window {
            RecencyWindow::Day => &mut self.last_24h,
            RecencyWindow::Week => &mut self.last_week,
            RecencyWindow::Month => &mut self.last_month,
            RecencyWindow::Year => &mut self.last_year,
        }
    }
}

/// Buckets timestamps into recency windows relative to the current time
///
/// # Arguments
///
/// * `dates` - Timestamps in any offset; they are compared in UTC
///
/// # Returns
///
/// Counts for the last 24 hours, 7 days, 30 days and 365 days
pub fn bucket<Tz: TimeZone>(dates: &[DateTime<Tz>]) -> RecencyBuckets {
    bucket_at(dates, Utc::now())
}

/// Buckets timestamps into recency windows ending at `now`
///
/// A timestamp exactly on a window boundary is inside the window.
/// Timestamps in the future count toward every window.
pub fn bucket_at<Tz: TimeZone>(dates: &[DateTime<Tz>], now: DateTime<Utc>) -> RecencyBuckets {
    let mut buckets = RecencyBuckets::default();

    for date in dates {
        let date = date.with_timezone(&Utc);
        for (window, days) in WINDOWS {
            if date >= now - Duration::days(days) {
                *buckets.slot(window) += 1;
            }
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sitemap::parse_timestamp;
    use chrono::FixedOffset;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_dates() {
        let dates: Vec<DateTime<Utc>> = Vec::new();
        assert_eq!(bucket_at(&dates, now()), RecencyBuckets::default());
    }

    #[test]
    fn test_overlapping_windows() {
        let now = now();
        let dates = vec![
            now - Duration::hours(1),
            now - Duration::days(3),
            now - Duration::days(20),
            now - Duration::days(200),
            now - Duration::days(800),
        ];
        let buckets = bucket_at(&dates, now);
        assert_eq!(buckets.last_24h, 1);
        assert_eq!(buckets.last_week, 2);
        assert_eq!(buckets.last_month, 3);
        assert_eq!(buckets.last_year, 4);
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let now = now();
        let dates = vec![
            now - Duration::hours(24),
            now - Duration::days(7),
            now - Duration::days(30),
            now - Duration::days(365),
        ];
        let buckets = bucket_at(&dates, now);
        assert_eq!(buckets.last_24h, 1);
        assert_eq!(buckets.last_week, 2);
        assert_eq!(buckets.last_month, 3);
        assert_eq!(buckets.last_year, 4);

        let just_outside = vec![now - Duration::hours(24) - Duration::seconds(1)];
        assert_eq!(bucket_at(&just_outside, now).last_24h, 0);
    }

    #[test]
    fn test_offsets_are_converted_to_utc() {
        let now = now();
        // 13:30 at +02:00 is 11:30 UTC, inside the last day
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let date = offset.with_ymd_and_hms(2024, 6, 15, 13, 30, 0).unwrap();
        assert_eq!(bucket_at(&[date], now).last_24h, 1);

        // 11:30 at -02:00 is 13:30 UTC, in the future, still counted
        let offset = FixedOffset::west_opt(2 * 3600).unwrap();
        let date = offset.with_ymd_and_hms(2024, 6, 15, 11, 30, 0).unwrap();
        assert_eq!(bucket_at(&[date], now).last_24h, 1);
    }

    #[test]
    fn test_naive_date_matches_utc_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap();
        let naive = parse_timestamp("2024-01-15").unwrap();
        let explicit = parse_timestamp("2024-01-15T00:00:00Z").unwrap();
        assert_eq!(bucket_at(&[naive], now), bucket_at(&[explicit], now));
        assert_eq!(bucket_at(&[naive], now).last_24h, 1);
    }

    #[test]
    fn test_monotonic_windows() {
        let now = now();
        let dates: Vec<DateTime<Utc>> = (0..500).map(|h| now - Duration::hours(h * 37)).collect();
        let buckets = bucket_at(&dates, now);
        assert!(buckets.last_24h <= buckets.last_week);
        assert!(buckets.last_week <= buckets.last_month);
        assert!(buckets.last_month <= buckets.last_year);
        assert!(buckets.last_year <= dates.len());
    }

    #[test]
    fn test_iter_order() {
        let buckets = RecencyBuckets {
            last_24h: 1,
            last_week: 2,
            last_month: 3,
            last_year: 4,
        };
        let counts: Vec<usize> = buckets.iter().map(|(_, count)| count).collect();
        assert_eq!(counts, vec![1, 2, 3, 4]);
        assert_eq!(RecencyWindow::Week.label(), "Last 7 days");
    }
}
