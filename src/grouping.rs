//! Grouping of scanned news by responsible analyst.

use tracing::debug;

use crate::models::{AnalystGroups, AnalystReportEntry, NewsEvent};
use crate::roster::Roster;

/// Recent news found for one store, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreNews {
    pub store: String,
    pub events: Vec<NewsEvent>,
}

/// Flatten per-store news into report entries keyed by analyst.
///
/// Stores missing from the roster are filed under `Unassigned`. Within an
/// analyst, entries keep the order of `per_store` and of each store's events.
/// Stores without news contribute nothing, so analysts with no news are absent.
pub fn group_by_analyst(roster: &Roster, per_store: &[StoreNews]) -> AnalystGroups {
    let mut groups = AnalystGroups::new();
    for news in per_store.iter().filter(|n| !n.events.is_empty()) {
        let analyst = roster.analyst_for(&news.store);
        debug!(store = %news.store, %analyst, count = news.events.len(), "Grouping store news");
        groups.entry(analyst.to_string()).or_default().extend(
            news.events
                .iter()
                .map(|event| AnalystReportEntry::from_event(&news.store, analyst, event)),
        );
    }
    groups
}
