//! Per-store news scanning.
//!
//! One scan is one search: build the query, fetch the feed, keep entries
//! published on or after the recency cutoff, clean their summaries and tag
//! them with the event type. Results come back newest first.

use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use crate::dates::{days_before, is_recent, parse_published};
use crate::feed::FeedFetcher;
use crate::models::{DATE_NOT_AVAILABLE, EventType, NewsEvent, RawEntry};
use crate::query::QueryBuilder;
use crate::sanitize::sanitize;

/// Scans stores for opening and closing news relative to one run date.
#[derive(Debug)]
pub struct StoreNewsScanner<F> {
    fetcher: F,
    queries: QueryBuilder,
    cutoff: NaiveDate,
}

impl<F: FeedFetcher> StoreNewsScanner<F> {
    /// `lookback_days` sets the recency cutoff; `query_window_days` the search `after:` date.
    pub fn new(fetcher: F, today: NaiveDate, lookback_days: u32, query_window_days: u32) -> Self {
        Self {
            fetcher,
            queries: QueryBuilder::new(today, query_window_days),
            cutoff: days_before(today, lookback_days),
        }
    }

    /// Earliest published date that still counts as recent.
    pub fn cutoff(&self) -> NaiveDate {
        self.cutoff
    }

    /// Recent news for `store` of one event type, newest first.
    ///
    /// A failed fetch is logged and treated as no news.
    #[instrument(level = "info", skip_all, fields(%store, %event_type))]
    pub async fn scan(&self, store: &str, event_type: EventType) -> Vec<NewsEvent> {
        let query = self.queries.build(store, event_type);
        debug!(%query, "Built search query");

        let entries = match self.fetcher.fetch(&query).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Feed fetch failed; treating as no news");
                Vec::new()
            }
        };
        let fetched = entries.len();

        let events = self.filter_recent(entries, event_type);
        info!(fetched, recent = events.len(), cutoff = %self.cutoff, "Scanned store");
        events
    }

    /// Opening news followed by closing news for `store`.
    pub async fn scan_store(&self, store: &str) -> Vec<NewsEvent> {
        let mut events = Vec::new();
        for event_type in EventType::ALL {
            events.extend(self.scan(store, event_type).await);
        }
        events
    }

    fn filter_recent(&self, entries: Vec<RawEntry>, event_type: EventType) -> Vec<NewsEvent> {
        let mut events: Vec<NewsEvent> = entries
            .into_iter()
            .filter_map(|entry| {
                let published = entry
                    .published
                    .unwrap_or_else(|| DATE_NOT_AVAILABLE.to_string());
                if !is_recent(&published, self.cutoff) {
                    return None;
                }
                let published_at = parse_published(&published)?;
                Some(NewsEvent {
                    title: entry.title,
                    link: entry.link,
                    published,
                    published_at,
                    summary: sanitize(entry.summary.as_deref()),
                    event_type,
                })
            })
            .collect();

        // Stable: entries published at the same instant keep feed order.
        events.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        events
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::error::Error;

    /// In-memory feed keyed on (store, event type), recording every query.
    #[derive(Default)]
    pub(crate) struct StubFeed {
        pub responses: HashMap<(String, EventType), Result<Vec<RawEntry>, String>>,
        pub queries: RefCell<Vec<String>>,
    }

    impl StubFeed {
        pub fn with(mut self, store: &str, event_type: EventType, entries: Vec<RawEntry>) -> Self {
            self.responses.insert((store.to_string(), event_type), Ok(entries));
            self
        }

        pub fn failing(mut self, store: &str, event_type: EventType) -> Self {
            self.responses
                .insert((store.to_string(), event_type), Err("connection reset".to_string()));
            self
        }
    }

    impl FeedFetcher for StubFeed {
        async fn fetch(&self, query: &str) -> Result<Vec<RawEntry>, Box<dyn Error>> {
            self.queries.borrow_mut().push(query.to_string());
            let event_type = if query.contains("\"grand opening\"") {
                EventType::Opening
            } else {
                EventType::Closing
            };
            let found = self.responses.iter().find(|((store, et), _)| {
                *et == event_type && query.starts_with(&format!("\"{store}\" "))
            });
            match found {
                Some((_, Ok(entries))) => Ok(entries.clone()),
                Some((_, Err(msg))) => Err(msg.clone().into()),
                None => Ok(Vec::new()),
            }
        }
    }

    impl FeedFetcher for &StubFeed {
        async fn fetch(&self, query: &str) -> Result<Vec<RawEntry>, Box<dyn Error>> {
            (**self).fetch(query).await
        }
    }

    pub(crate) fn entry(title: &str, published: Option<&str>, summary: Option<&str>) -> RawEntry {
        RawEntry {
            title: title.to_string(),
            link: format!("https://example.com/{}", title.replace(' ', "-").to_lowercase()),
            published: published.map(str::to_string),
            summary: summary.map(str::to_string),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    #[tokio::test]
    async fn test_scan_filters_by_cutoff() {
        let feed = StubFeed::default().with(
            "Mud Bay",
            EventType::Opening,
            vec![
                entry("fresh", Some("Fri, 16 Oct 2026 14:03:00 GMT"), Some("<b>New</b> store")),
                entry("stale", Some("Wed, 14 Oct 2026 09:00:00 GMT"), None),
                entry("undated", None, Some("no date")),
                entry("garbled", Some("sometime soon"), None),
                entry("boundary", Some("2026-10-15"), None),
            ],
        );
        let scanner = StoreNewsScanner::new(feed, today(), 2, 4);
        assert_eq!(scanner.cutoff(), NaiveDate::from_ymd_opt(2026, 10, 15).unwrap());

        let events = scanner.scan("Mud Bay", EventType::Opening).await;
        let titles: Vec<&str> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["fresh", "boundary"]);
        assert_eq!(events[0].summary, "New store");
        assert_eq!(events[0].published, "Fri, 16 Oct 2026 14:03:00 GMT");
        assert_eq!(events[1].summary, "No summary");
        assert!(events.iter().all(|e| e.event_type == EventType::Opening));
    }

    #[tokio::test]
    async fn test_scan_sorts_newest_first_across_formats() {
        let feed = StubFeed::default().with(
            "Pet Depot",
            EventType::Closing,
            vec![
                entry("morning", Some("Fri, 16 Oct 2026 08:00:00 GMT"), None),
                entry("tonight", Some("2026-10-16T22:00:00Z"), None),
                entry("noon-east", Some("Fri, 16 Oct 2026 12:00:00 -0400"), None),
                entry("tie-a", Some("Sat, 17 Oct 2026 01:00:00 GMT"), None),
                entry("tie-b", Some("2026-10-17T01:00:00Z"), None),
            ],
        );
        let scanner = StoreNewsScanner::new(feed, today(), 2, 4);

        let events = scanner.scan("Pet Depot", EventType::Closing).await;
        let titles: Vec<&str> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["tie-a", "tie-b", "tonight", "noon-east", "morning"]);
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_no_news() {
        let feed = StubFeed::default().failing("Dogtopia", EventType::Closing);
        let scanner = StoreNewsScanner::new(feed, today(), 2, 4);
        assert!(scanner.scan("Dogtopia", EventType::Closing).await.is_empty());
    }

    #[tokio::test]
    async fn test_scan_store_runs_opening_then_closing() {
        let feed = StubFeed::default()
            .with("Mud Bay", EventType::Closing, vec![entry("closing", Some("2026-10-16"), None)])
            .with("Mud Bay", EventType::Opening, vec![entry("opening", Some("2026-10-15"), None)]);
        let scanner = StoreNewsScanner::new(feed, today(), 2, 4);

        let events = scanner.scan_store("Mud Bay").await;
        let kinds: Vec<EventType> = events.iter().map(|e| e.event_type).collect();
        assert_eq!(kinds, [EventType::Opening, EventType::Closing]);

        let queries = scanner.fetcher.queries.borrow();
        assert_eq!(queries.len(), 2);
        assert!(queries[0].contains("\"grand opening\""));
        assert!(queries[1].contains("\"liquidation\""));
        assert!(queries.iter().all(|q| q.ends_with("after:2026-10-13")));
    }
}
