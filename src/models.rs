//! Data models for stores, feed entries, and the grouped snapshot.
//!
//! This module defines the core data structures used throughout the application:
//! - [`StoreRecord`]: A store and the analyst responsible for it
//! - [`RawEntry`]: An unfiltered entry as read from the search feed
//! - [`NewsEvent`]: A recent, sanitized entry tagged with its [`EventType`]
//! - [`AnalystReportEntry`]: A news event flattened with store and analyst context
//! - [`Snapshot`]: The complete grouped result set for one run
//!
//! Report entries serialize with PascalCase keys (`Store`, `Analyst`, `Type`, ...)
//! because the dashboard consuming `latest_news.json` and the CSV header both
//! expect that shape.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Analyst name used when a store has no owner.
pub const UNASSIGNED: &str = "Unassigned";

/// Published value used when a feed entry carries no date.
pub const DATE_NOT_AVAILABLE: &str = "Date not available";

/// A store being watched and the analyst who owns it.
///
/// Loaded once at startup and never mutated during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreRecord {
    /// Store name, trimmed and non-empty.
    pub name: String,
    /// Responsible analyst, [`UNASSIGNED`] when the roster has none.
    pub analyst: String,
}

impl StoreRecord {
    pub fn new(name: impl Into<String>, analyst: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            analyst: analyst.into(),
        }
    }

    /// A store with no analyst mapping.
    pub fn unassigned(name: impl Into<String>) -> Self {
        Self::new(name, UNASSIGNED)
    }
}

/// Whether an article signals a store opening or a store closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum EventType {
    Opening,
    Closing,
}

impl EventType {
    /// Both event types, in the order a store is scanned.
    pub const ALL: [EventType; 2] = [EventType::Opening, EventType::Closing];

    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Opening => "Opening",
            EventType::Closing => "Closing",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry as read from the search feed, before any filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub title: String,
    pub link: String,
    /// Published timestamp exactly as the feed wrote it.
    pub published: Option<String>,
    /// Summary body, possibly HTML.
    pub summary: Option<String>,
}

/// A recent feed entry for one store, tagged with its event type.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsEvent {
    pub title: String,
    pub link: String,
    /// Published value verbatim from the feed.
    pub published: String,
    /// Parsed form of `published`, used for ordering.
    pub published_at: DateTime<FixedOffset>,
    /// Plain-text summary.
    pub summary: String,
    pub event_type: EventType,
}

/// A [`NewsEvent`] enriched with the store and analyst it belongs to.
///
/// This is the row shape of both the CSV export and the per-analyst
/// arrays inside the JSON snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnalystReportEntry {
    pub store: String,
    pub analyst: String,
    #[serde(rename = "Type")]
    pub event_type: EventType,
    pub title: String,
    pub link: String,
    pub published: String,
    pub summary: String,
}

impl AnalystReportEntry {
    pub fn from_event(store: &str, analyst: &str, event: &NewsEvent) -> Self {
        Self {
            store: store.to_string(),
            analyst: analyst.to_string(),
            event_type: event.event_type,
            title: event.title.clone(),
            link: event.link.clone(),
            published: event.published.clone(),
            summary: event.summary.clone(),
        }
    }
}

/// Report entries keyed by analyst, iterated in ascending analyst order.
pub type AnalystGroups = BTreeMap<String, Vec<AnalystReportEntry>>;

/// The complete result of one run, written verbatim to both JSON sinks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Snapshot {
    /// Run date in `YYYY-MM-DD` format.
    pub last_updated: String,
    pub data: AnalystGroups,
}

impl Snapshot {
    pub fn new(run_date: NaiveDate, data: AnalystGroups) -> Self {
        Self {
            last_updated: run_date.format("%Y-%m-%d").to_string(),
            data,
        }
    }

    /// Total number of articles across all analysts.
    pub fn article_count(&self) -> usize {
        self.data.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry(store: &str, analyst: &str, event_type: EventType) -> AnalystReportEntry {
        AnalystReportEntry {
            store: store.to_string(),
            analyst: analyst.to_string(),
            event_type,
            title: format!("{store} news"),
            link: "https://example.com/a".to_string(),
            published: "Fri, 16 Oct 2026 14:03:00 GMT".to_string(),
            summary: "Something happened".to_string(),
        }
    }

    #[test]
    fn test_report_entry_uses_pascal_case_keys() {
        let entry = sample_entry("Mud Bay", "Jane", EventType::Closing);
        let value = serde_json::to_value(&entry).unwrap();
        let obj = value.as_object().unwrap();

        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["Analyst", "Link", "Published", "Store", "Summary", "Title", "Type"]
        );
        assert_eq!(obj["Type"], "Closing");
        assert_eq!(obj["Store"], "Mud Bay");
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let mut data = AnalystGroups::new();
        data.entry("Zed".to_string())
            .or_default()
            .push(sample_entry("Pet Depot", "Zed", EventType::Opening));
        data.entry("Amy".to_string()).or_default().extend([
            sample_entry("Dogtopia", "Amy", EventType::Opening),
            sample_entry("Dogtopia", "Amy", EventType::Closing),
        ]);
        let snapshot = Snapshot::new(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(), data);

        let json = serde_json::to_string_pretty(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(back, snapshot);
        assert_eq!(back.last_updated, "2026-10-17");
        let analysts: Vec<&String> = back.data.keys().collect();
        assert_eq!(analysts, ["Amy", "Zed"]);
        assert!(json.find("\"Amy\"").unwrap() < json.find("\"Zed\"").unwrap());
        assert_eq!(back.data["Amy"][1].event_type, EventType::Closing);
    }

    #[test]
    fn test_empty_snapshot_shape() {
        let snapshot = Snapshot::new(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(), AnalystGroups::new());
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value, serde_json::json!({ "last_updated": "2026-01-05", "data": {} }));
        assert_eq!(snapshot.article_count(), 0);
    }

    #[test]
    fn test_event_type_display() {
        assert_eq!(EventType::Opening.to_string(), "Opening");
        assert_eq!(EventType::Closing.to_string(), "Closing");
        assert_eq!(EventType::ALL, [EventType::Opening, EventType::Closing]);
    }

    #[test]
    fn test_unassigned_store_record() {
        let record = StoreRecord::unassigned("Kriser's");
        assert_eq!(record.name, "Kriser's");
        assert_eq!(record.analyst, UNASSIGNED);
    }
}
