//! JSON snapshot output for the dashboard.
//!
//! Every run writes the same [`Snapshot`] twice:
//! ```text
//! output_dir/
//! ├── latest_news.json              # replaced each run
//! └── latest_news_2026-10-17.json   # one per run date
//! ```
//! Both files are written even when no news was found, so the dashboard
//! always sees a fresh `last_updated`.

use crate::models::Snapshot;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// File name of the snapshot replaced on every run.
pub const LATEST_FILENAME: &str = "latest_news.json";

/// Paths written by [`write_snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPaths {
    pub latest: PathBuf,
    pub archive: PathBuf,
}

/// Archive file name for a snapshot dated `last_updated`.
pub fn archive_filename(last_updated: &str) -> String {
    format!("latest_news_{last_updated}.json")
}

/// Write `snapshot` as pretty-printed JSON to the latest and archive paths.
///
/// # Errors
///
/// Returns an error if serialization or either file write fails.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display(), last_updated = %snapshot.last_updated))]
pub async fn write_snapshot(
    snapshot: &Snapshot,
    output_dir: &Path,
) -> Result<SnapshotPaths, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(snapshot)?;

    let paths = SnapshotPaths {
        latest: output_dir.join(LATEST_FILENAME),
        archive: output_dir.join(archive_filename(&snapshot.last_updated)),
    };

    for path in [&paths.latest, &paths.archive] {
        if let Err(e) = fs::write(path, &json).await {
            error!(path = %path.display(), error = %e, "Failed to write JSON snapshot");
            return Err(e.into());
        }
        info!(path = %path.display(), "Wrote JSON snapshot");
    }

    Ok(paths)
}
