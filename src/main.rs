//! # Store News
//!
//! Watches a news search feed for retail store openings and closings,
//! keeps only recent articles, groups them by the analyst responsible for
//! each store, and writes snapshots for a downstream dashboard.
//!
//! ## Usage
//!
//! ```sh
//! store_news --analysts ./analyst.csv --output-dir ./public
//! ```
//!
//! ## Architecture
//!
//! The application is a single sequential pass:
//! 1. **Roster**: Load stores and analysts from CSV, or fall back to defaults
//! 2. **Scanning**: For each store, search opening then closing news, pausing between stores
//! 3. **Filtering**: Keep entries published within the lookback window, clean summaries
//! 4. **Grouping**: File every article under its store's analyst
//! 5. **Output**: Console report, dated CSV, latest and archived JSON snapshots

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod dates;
mod feed;
mod grouping;
mod models;
mod outputs;
mod pipeline;
mod query;
mod roster;
mod sanitize;
mod scanner;
mod utils;

use cli::Cli;
use config::Settings;
use feed::GoogleNewsFeed;
use roster::Roster;
use utils::ensure_writable_dir;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let today = Local::now().date_naive();
    info!(run_date = %today, "store_news starting up");

    // Parse CLI and resolve settings
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");
    let settings = Settings::resolve(&args)?;
    debug!(?settings, "Resolved settings");

    // Early check: fail before any fetch if outputs cannot be written
    if let Err(e) = ensure_writable_dir(&settings.output_dir).await {
        error!(
            path = %settings.output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let roster = Roster::load(&settings.analysts_file, &settings.default_stores);
    if roster.is_empty() {
        warn!("No stores to scan; snapshots will be empty");
    }
    let fetcher = GoogleNewsFeed::new(&settings.feed_endpoint, settings.request_timeout())?;

    let outcome = pipeline::run(&settings, &roster, fetcher, today).await?;
    println!("{}", outcome.report);

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        articles = outcome.snapshot.article_count(),
        analysts = outcome.snapshot.data.len(),
        csv = ?outcome.csv_path,
        latest_json = %outcome.json_paths.latest.display(),
        archive_json = %outcome.json_paths.archive.display(),
        "Execution complete"
    );

    Ok(())
}
