//! Search query construction for store opening and closing news.
//!
//! A query is the quoted store name followed by four fixed clauses:
//! event phrases, retail context, North American locations, and a
//! freshness constraint (`after:YYYY-MM-DD`).

use chrono::NaiveDate;

use crate::dates::days_before;
use crate::models::EventType;

/// Phrases that signal a store opening.
pub const OPENING_PHRASES: &[&str] = &[
    "new store",
    "new location",
    "opening soon",
    "coming soon",
    "grand opening",
    "now open",
    "opens new",
    "opening in",
    "to open",
    "set to open",
    "plans to open",
    "breaks ground",
    "now hiring",
    "store opening",
    "location opening",
];

/// Phrases that signal a store closing.
pub const CLOSING_PHRASES: &[&str] = &[
    "store closing",
    "closing soon",
    "closing",
    "closures",
    "shutting down",
    "shutters",
    "permanent closure",
    "permanent closing",
    "going out of business",
    "going-out-of-business",
    "liquidation",
    "everything must go",
    "store closing sale",
    "last day",
    "final day",
    "final closing",
    "ceases operations",
    "store to close",
    "stores to close",
    "closing all locations",
    "closing locations",
    "shutter stores",
];

/// Terms that keep results about physical retail.
pub const RETAIL_CONTEXT: &[&str] = &[
    "store",
    "location",
    "retail",
    "shop",
    "outlet",
    "station",
    "pharmacy",
    "supermarket",
    "grocery",
    "\"auto parts\"",
];

/// Terms that keep results in the US and Canada.
pub const LOCATIONS: &[&str] = &[
    "USA",
    "Canada",
    "\"United States\"",
    "America",
    "state",
    "city",
    "county",
];

/// Default number of days the `after:` constraint reaches back.
pub const DEFAULT_QUERY_WINDOW_DAYS: u32 = 4;

/// Builds search queries for one run date.
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder {
    today: NaiveDate,
    window_days: u32,
}

impl QueryBuilder {
    pub fn new(today: NaiveDate, window_days: u32) -> Self {
        Self { today, window_days }
    }

    /// The date used in the `after:` constraint.
    pub fn published_after(&self) -> NaiveDate {
        days_before(self.today, self.window_days)
    }

    /// Build the query for `store` and `event_type`.
    pub fn build(&self, store: &str, event_type: EventType) -> String {
        let phrases = match event_type {
            EventType::Opening => OPENING_PHRASES,
            EventType::Closing => CLOSING_PHRASES,
        };
        let keywords = phrases
            .iter()
            .map(|p| format!("\"{p}\""))
            .collect::<Vec<_>>()
            .join(" OR ");
        let retail = RETAIL_CONTEXT.join(" OR ");
        let locations = LOCATIONS.join(" OR ");

        format!(
            "\"{store}\" {keywords} ({retail}) ({locations}) after:{}",
            self.published_after().format("%Y-%m-%d")
        )
    }
}
