//! Permissive parsing of feed timestamps and the recency check built on it.
//!
//! Feeds mostly emit RFC 822 timestamps (`Fri, 16 Oct 2026 14:03:00 GMT`),
//! but Atom feeds and scraped sources use RFC 3339 or looser date-only forms.
//! Every parse here is best effort: failures come back as `None` or `false`
//! and never end the run.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::models::DATE_NOT_AVAILABLE;

/// Naive date-time layouts tried after the RFC parsers; read as UTC.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%a, %d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M:%S",
    "%b %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// Date-only layouts; the time is taken as midnight UTC.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%a, %d %b %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
];

/// Parse a feed timestamp into a point in time.
///
/// Returns `None` for empty input, the `Date not available` sentinel, or
/// anything no known layout accepts.
pub fn parse_published(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if text.is_empty() || text == DATE_NOT_AVAILABLE {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt);
    }
    // Some feeds append a zone abbreviation RFC 2822 parsing does not know.
    let without_zone = strip_zone_suffix(text);

    let utc = FixedOffset::east_opt(0)?;
    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(without_zone, fmt) {
            return naive.and_local_timezone(utc).single();
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(without_zone, fmt) {
            return date.and_hms_opt(0, 0, 0)?.and_local_timezone(utc).single();
        }
    }

    debug!(published = %text, "Unparseable published date");
    None
}

/// Is `date_text` on or after `cutoff`?
///
/// The calendar date is taken in the timestamp's own offset. Unparseable or
/// missing dates are never recent.
pub fn is_recent(date_text: &str, cutoff: NaiveDate) -> bool {
    parse_published(date_text).is_some_and(|dt| dt.date_naive() >= cutoff)
}

/// `today` minus `days`, saturating at the earliest representable date.
pub fn days_before(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_sub_days(chrono::Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

fn strip_zone_suffix(text: &str) -> &str {
    match text.rsplit_once(' ') {
        Some((head, zone))
            if (2..=4).contains(&zone.len()) && zone.chars().all(|c| c.is_ascii_uppercase()) =>
        {
            head
        }
        _ => text,
    }
}
