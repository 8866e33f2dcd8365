//! One complete scan: every store, both event types, then all outputs.

use chrono::NaiveDate;
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument};

use crate::config::Settings;
use crate::feed::FeedFetcher;
use crate::grouping::{StoreNews, group_by_analyst};
use crate::models::Snapshot;
use crate::outputs::{csv, json, report};
use crate::roster::Roster;
use crate::scanner::StoreNewsScanner;

/// What a run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub snapshot: Snapshot,
    /// Rendered console report.
    pub report: String,
    /// Present only when at least one article was found.
    pub csv_path: Option<PathBuf>,
    pub json_paths: json::SnapshotPaths,
}

/// Scan every store on the roster and write the outputs to `settings.output_dir`.
///
/// Stores are processed one at a time, with `settings.store_delay_ms` between
/// consecutive stores. Fetch failures count as no news; write failures end
/// the run with an error.
#[instrument(level = "info", skip_all, fields(%today, stores = roster.len()))]
pub async fn run<F: FeedFetcher>(
    settings: &Settings,
    roster: &Roster,
    fetcher: F,
    today: NaiveDate,
) -> Result<RunOutcome, Box<dyn Error>> {
    let scanner = StoreNewsScanner::new(
        fetcher,
        today,
        settings.lookback_days,
        settings.query_window_days,
    );
    info!(
        cutoff = %scanner.cutoff(),
        lookback_days = settings.lookback_days,
        "Fetching recent store opening and closing news"
    );

    let per_store = scan_roster(&scanner, roster, settings.store_delay()).await;
    let groups = group_by_analyst(roster, &per_store);
    let snapshot = Snapshot::new(today, groups);

    let report = report::render(&snapshot.data, settings.lookback_days);

    let csv_path =
        csv::write_articles_csv(&snapshot.data, &settings.output_dir, &snapshot.last_updated).await?;
    if let Some(path) = &csv_path {
        info!(path = %path.display(), total = snapshot.article_count(), "Results saved");
    }

    let json_paths = json::write_snapshot(&snapshot, &settings.output_dir).await?;
    info!(
        latest = %json_paths.latest.display(),
        archive = %json_paths.archive.display(),
        last_updated = %snapshot.last_updated,
        "Snapshot written"
    );

    Ok(RunOutcome {
        snapshot,
        report,
        csv_path,
        json_paths,
    })
}

async fn scan_roster<F: FeedFetcher>(
    scanner: &StoreNewsScanner<F>,
    roster: &Roster,
    delay: Duration,
) -> Vec<StoreNews> {
    let mut per_store = Vec::with_capacity(roster.len());
    for (i, record) in roster.stores().iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            sleep(delay).await;
        }
        let events = scanner.scan_store(&record.name).await;
        per_store.push(StoreNews {
            store: record.name.clone(),
            events,
        });
    }
    per_store
}
