//! Dated CSV export, one row per article.

use crate::models::AnalystGroups;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// CSV file name for a run on `run_date` (`YYYY-MM-DD`).
pub fn csv_filename(run_date: &str) -> String {
    format!("store_open_close_news_{run_date}.csv")
}

/// Write every entry of `groups` to `store_open_close_news_<run_date>.csv`.
///
/// Rows follow analyst order, then per-analyst order. Nothing is written when
/// `groups` holds no entries, and `Ok(None)` is returned.
///
/// # Errors
///
/// Returns an error if serialization or the file write fails.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display(), %run_date))]
pub async fn write_articles_csv(
    groups: &AnalystGroups,
    output_dir: &Path,
    run_date: &str,
) -> Result<Option<PathBuf>, Box<dyn Error>> {
    let rows = groups.values().flatten();
    if groups.values().all(Vec::is_empty) {
        info!("No articles; skipping CSV");
        return Ok(None);
    }

    let mut writer = ::csv::Writer::from_writer(Vec::new());
    let mut count = 0usize;
    for row in rows {
        writer.serialize(row)?;
        count += 1;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;

    let path = output_dir.join(csv_filename(run_date));
    fs::write(&path, bytes).await?;
    info!(path = %path.display(), rows = count, "Wrote CSV");
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalystReportEntry, EventType};
    use tempfile::TempDir;

    fn entry(store: &str, analyst: &str, title: &str, summary: &str) -> AnalystReportEntry {
        AnalystReportEntry {
            store: store.to_string(),
            analyst: analyst.to_string(),
            event_type: EventType::Closing,
            title: title.to_string(),
            link: "https://example.com/x".to_string(),
            published: "Fri, 16 Oct 2026 14:03:00 GMT".to_string(),
            summary: summary.to_string(),
        }
    }

    #[tokio::test]
    async fn test_csv_header_and_rows() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();

        let mut groups = AnalystGroups::new();
        groups
            .entry("Zoe".to_string())
            .or_default()
            .push(entry("Pet Depot", "Zoe", "Pet Depot, Inc. closing", "Final \"sale\" today"));
        groups
            .entry("Amir".to_string())
            .or_default()
            .push(entry("Dogtopia", "Amir", "Dogtopia shutters", "Plain"));

        let path = write_articles_csv(&groups, dir, "2026-10-17")
            .await
            .unwrap()
            .expect("CSV should be written");
        assert_eq!(path, dir.join("store_open_close_news_2026-10-17.csv"));

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Store,Analyst,Type,Title,Link,Published,Summary");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Dogtopia,Amir,Closing,"));
        assert!(lines[2].contains("\"Pet Depot, Inc. closing\""));
        assert!(lines[2].ends_with("\"Final \"\"sale\"\" today\""));
    }

    #[tokio::test]
    async fn test_no_csv_without_articles() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();

        let written = write_articles_csv(&AnalystGroups::new(), dir, "2026-10-17").await.unwrap();
        assert!(written.is_none());
        assert!(!dir.join(csv_filename("2026-10-17")).exists());
    }
}
