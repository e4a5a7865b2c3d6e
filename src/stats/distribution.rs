use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc, Weekday};

/// Weekdays in matrix row order
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Share of timestamps per (weekday, hour) cell, in percent
///
/// Rows are weekdays starting on Monday, columns are UTC hours 0-23.
/// All cells sum to 100 unless there were no timestamps, in which
/// case every cell is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct HourWeekdayDistribution {
    cells: [[f64; 24]; 7],
    counts: [[usize; 24]; 7],
    total: usize,
}

impl Default for HourWeekdayDistribution {
    fn default() -> Self {
        Self {
            cells: [[0.0; 24]; 7],
            counts: [[0; 24]; 7],
            total: 0,
        }
    }
}

impl HourWeekdayDistribution {
    /// Percentage of timestamps in a cell
    pub fn cell(&self, weekday: Weekday, hour: u32) -> f64 {
        self.cells[weekday.num_days_from_monday() as usize]
            .get(hour as usize)
            .copied()
            .unwrap_or(0.0)
    }

    /// Raw number of timestamps in a cell
    pub fn count(&self, weekday: Weekday, hour: u32) -> usize {
        self.counts[weekday.num_days_from_monday() as usize]
            .get(hour as usize)
            .copied()
            .unwrap_or(0)
    }

    /// Number of timestamps the matrix was built from
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// The matrix, one row per weekday starting on Monday
    pub fn rows(&self) -> &[[f64; 24]; 7] {
        &self.cells
    }

    /// The busiest cell, earliest in the week on ties
    pub fn peak(&self) -> Option<(Weekday, u32, f64)> {
        if self.total == 0 {
            return None;
        }

        let mut best: Option<(Weekday, u32, usize)> = None;
        for (row, weekday) in WEEKDAYS.iter().enumerate() {
            for hour in 0..24 {
                let count = self.counts[row][hour];
                if best.map(|(_, _, c)| count > c).unwrap_or(true) {
                    best = Some((*weekday, hour as u32, count));
                }
            }
        }

        best.map(|(weekday, hour, _)| (weekday, hour, self.cell(weekday, hour)))
    }

    /// Percentage per weekday, Monday first
    pub fn weekday_totals(&self) -> [f64; 7] {
        let mut totals = [0.0; 7];
        for (row, total) in totals.iter_mut().enumerate() {
            *total = self.cells[row].iter().sum();
        }
        totals
    }

    /// Percentage per UTC hour
    pub fn hour_totals(&self) -> [f64; 24] {
        let mut totals = [0.0; 24];
        for row in &self.cells {
            for (hour, value) in row.iter().enumerate() {
                totals[hour] += value;
            }
        }
        totals
    }
}

/// Builds the 7x24 weekday/hour distribution of timestamps in UTC
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc, Weekday};
/// use sitemap_inspector::hour_weekday_distribution;
///
/// // 2024-01-15 was a Monday
/// let dates = vec![
///     Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap(),
///     Utc.with_ymd_and_hms(2024, 1, 15, 9, 45, 0).unwrap(),
///     Utc.with_ymd_and_hms(2024, 1, 16, 17, 0, 0).unwrap(),
///     Utc.with_ymd_and_hms(2024, 1, 21, 23, 0, 0).unwrap(),
/// ];
///
/// let matrix = hour_weekday_distribution(&dates);
/// assert_eq!(matrix.cell(Weekday::Mon, 9), 50.0);
/// assert_eq!(matrix.cell(Weekday::Sun, 23), 25.0);
/// ```
pub fn hour_weekday_distribution<Tz: TimeZone>(dates: &[DateTime<Tz>]) -> HourWeekdayDistribution {
    let mut distribution = HourWeekdayDistribution::default();
    if dates.is_empty() {
        return distribution;
    }

    for date in dates {
        let date = date.with_timezone(&Utc);
        let row = date.weekday().num_days_from_monday() as usize;
        distribution.counts[row][date.hour() as usize] += 1;
    }

    distribution.total = dates.len();
    let total = dates.len() as f64;
    for (row, counts) in distribution.counts.iter().enumerate() {
        for (hour, count) in counts.iter().enumerate() {
            distribution.cells[row][hour] = *count as f64 / total * 100.0;
        }
    }

    distribution
}
