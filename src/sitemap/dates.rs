//! Permissive, locale-agnostic timestamp parsing for `<lastmod>` values
//!
//! Sitemaps in the wild use far more than the W3C datetime profile, so a
//! series of formats is tried in turn. Values without an offset are taken
//! as UTC, never as local time.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// Formats carrying an explicit offset
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%:z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M%:z",
];

/// Formats without an offset, interpreted as UTC
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

/// Zone names treated as a zero offset
const UTC_SUFFIXES: &[&str] = &[" UTC", " GMT", " Z"];

/// Parses a timestamp, returning `None` when no known format matches
///
/// # Examples
///
/// ```
/// use sitemap_inspector::sitemap::parse_timestamp;
///
/// let with_zone = parse_timestamp("2024-01-15T00:00:00Z").unwrap();
/// let date_only = parse_timestamp("2024-01-15").unwrap();
/// assert_eq!(with_zone, date_only);
///
/// assert!(parse_timestamp("last tuesday").is_none());
/// ```
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt);
    }

    // A trailing "Z" outside RFC 3339 (e.g. no seconds) becomes "+00:00"
    let zulu;
    let s = match s.strip_suffix('Z').or_else(|| s.strip_suffix('z')) {
        Some(rest) if rest.contains(':') => {
            zulu = format!("{}+00:00", rest);
            zulu.as_str()
        }
        _ => s,
    };

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    let s = UTC_SUFFIXES
        .iter()
        .find_map(|suffix| s.strip_suffix(suffix))
        .unwrap_or(s)
        .trim_end();

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(as_utc(naive));
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0).map(as_utc);
        }
    }

    parse_partial_date(s)
}

/// Returns true if a raw last-modified value carries a time of day
///
/// Any `T` date/time separator or `:` qualifies; date-only values do not.
pub fn has_time_component(raw: &str) -> bool {
    raw.contains('T') || raw.contains(':')
}

/// Treats a naive timestamp as UTC
fn as_utc(naive: NaiveDateTime) -> DateTime<FixedOffset> {
    naive.and_utc().fixed_offset()
}

/// W3C reduced precision: `YYYY-MM` and `YYYY` resolve to the first instant
fn parse_partial_date(s: &str) -> Option<DateTime<FixedOffset>> {
    let (year, month) = match s.split_once('-') {
        Some((year, month)) => (year, month),
        None => (s, "1"),
    };

    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if month.is_empty() || month.len() > 2 || !month.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)?;
    date.and_hms_opt(0, 0, 0).map(as_utc)
}
