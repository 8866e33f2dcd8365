//! Command-line interface definitions for the store news scanner.
//!
//! Every flag is optional. Unset flags fall back to the settings file given
//! with `--config`, then to built-in defaults (see [`crate::config::Settings`]).

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the store news scanner.
///
/// # Examples
///
/// ```sh
/// # Scan with analyst.csv from the working directory
/// store_news
///
/// # Custom roster and output directory
/// store_news --analysts ./analysts.csv --output-dir ./public
///
/// # Settings file plus a wider window
/// store_news --config ./store_news.yaml --lookback-days 7
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// CSV file with `Store` and `Analyst` columns
    #[arg(short, long, env = "STORE_NEWS_ANALYSTS")]
    pub analysts: Option<PathBuf>,

    /// Directory for the CSV and JSON outputs
    #[arg(short, long, env = "STORE_NEWS_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Optional path to a YAML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Keep articles published within this many days
    #[arg(long)]
    pub lookback_days: Option<u32>,

    /// Days reached back by the search `after:` clause
    #[arg(long)]
    pub query_window_days: Option<u32>,

    /// Pause between stores, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Search feed endpoint
    #[arg(long, env = "STORE_NEWS_FEED_ENDPOINT")]
    pub feed_endpoint: Option<String>,

    /// HTTP request timeout, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "store_news",
            "--analysts",
            "./analyst.csv",
            "--output-dir",
            "./public",
            "--lookback-days",
            "7",
        ]);

        assert_eq!(cli.analysts, Some(PathBuf::from("./analyst.csv")));
        assert_eq!(cli.output_dir, Some(PathBuf::from("./public")));
        assert_eq!(cli.lookback_days, Some(7));
        assert_eq!(cli.delay_ms, None);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["store_news", "-a", "/tmp/a.csv", "-o", "/tmp/out", "-c", "/tmp/s.yaml"]);

        assert_eq!(cli.analysts, Some(PathBuf::from("/tmp/a.csv")));
        assert_eq!(cli.output_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/s.yaml")));
    }
}
