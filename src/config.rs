//! Run settings: built-in defaults, an optional YAML file, then CLI overrides.
//!
//! ```yaml
//! analysts_file: ./analyst.csv
//! output_dir: ./out
//! lookback_days: 2
//! store_delay_ms: 1300
//! default_stores:
//!   - Mud Bay
//!   - Pet Depot
//! ```

use serde::Deserialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};

use crate::cli::Cli;
use crate::feed::DEFAULT_FEED_ENDPOINT;
use crate::query::DEFAULT_QUERY_WINDOW_DAYS;

/// Stores scanned when the analyst roster cannot be loaded.
pub const DEFAULT_STORES: &[&str] = &[
    "Doggie Style",
    "Dogtopia",
    "Earthwise Pet",
    "Feeders Supply",
    "Friendly Pets",
    "Hollywood Feed",
    "Kahoots Pet Products",
    "Kriser's",
    "Mud Bay",
    "Pet Club Food and Supplies",
    "Pet Depot",
    "Pet Evolution",
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Roster CSV with `Store` and `Analyst` columns.
    pub analysts_file: PathBuf,
    /// Directory receiving the CSV and JSON outputs.
    pub output_dir: PathBuf,
    /// Search feed endpoint, without query string.
    pub feed_endpoint: String,
    /// Entries older than today minus this many days are dropped.
    pub lookback_days: u32,
    /// Reach of the `after:` clause in search queries.
    pub query_window_days: u32,
    /// Pause between consecutive stores, in milliseconds.
    pub store_delay_ms: u64,
    /// Per-request HTTP timeout, in seconds.
    pub request_timeout_secs: u64,
    /// Fallback store list.
    pub default_stores: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            analysts_file: PathBuf::from("analyst.csv"),
            output_dir: PathBuf::from("."),
            feed_endpoint: DEFAULT_FEED_ENDPOINT.to_string(),
            lookback_days: 2,
            query_window_days: DEFAULT_QUERY_WINDOW_DAYS,
            store_delay_ms: 1300,
            request_timeout_secs: 20,
            default_stores: DEFAULT_STORES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Settings {
    /// Read settings from a YAML file; missing keys keep their defaults.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn from_yaml_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_yaml_str(&text)?;
        info!("Loaded settings file");
        Ok(settings)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, Box<dyn Error>> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Resolve the effective settings for a CLI invocation.
    pub fn resolve(cli: &Cli) -> Result<Self, Box<dyn Error>> {
        let mut settings = match cli.config.as_deref() {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        settings.apply_cli(cli);
        Ok(settings)
    }

    /// Overlay any flags given on the command line.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(path) = &cli.analysts {
            self.analysts_file = path.clone();
        }
        if let Some(dir) = &cli.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(endpoint) = &cli.feed_endpoint {
            self.feed_endpoint = endpoint.clone();
        }
        if let Some(days) = cli.lookback_days {
            self.lookback_days = days;
        }
        if let Some(days) = cli.query_window_days {
            self.query_window_days = days;
        }
        if let Some(ms) = cli.delay_ms {
            self.store_delay_ms = ms;
        }
        if let Some(secs) = cli.timeout_secs {
            self.request_timeout_secs = secs;
        }
    }

    pub fn store_delay(&self) -> Duration {
        Duration::from_millis(self.store_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
