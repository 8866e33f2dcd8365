//! Store-to-analyst roster loading.
//!
//! The roster CSV is the single source of truth for which stores are scanned
//! and who owns them. When it is missing or unreadable the run falls back to
//! the configured default store list with every store unassigned.

use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument, warn};

use crate::models::{StoreRecord, UNASSIGNED};

const STORE_COLUMN: &str = "Store";
const ANALYST_COLUMN: &str = "Analyst";

/// Stores to scan, in roster order, with their analysts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    stores: Vec<StoreRecord>,
    analysts: HashMap<String, String>,
}

impl Roster {
    /// Build a roster from records.
    ///
    /// A store listed more than once is scanned once, at its first position,
    /// and owned by the analyst on its last row.
    pub fn from_records(records: impl IntoIterator<Item = StoreRecord>) -> Self {
        let mut stores: Vec<StoreRecord> = Vec::new();
        let mut analysts = HashMap::new();
        for record in records {
            if let Some(previous) = analysts.insert(record.name.clone(), record.analyst.clone()) {
                warn!(
                    store = %record.name,
                    %previous,
                    analyst = %record.analyst,
                    "Duplicate store row; later analyst wins"
                );
                if let Some(existing) = stores.iter_mut().find(|s| s.name == record.name) {
                    existing.analyst = record.analyst;
                }
                continue;
            }
            stores.push(record);
        }
        Self { stores, analysts }
    }

    /// Every store unassigned.
    pub fn fallback<S: AsRef<str>>(stores: &[S]) -> Self {
        Self::from_records(stores.iter().map(|s| StoreRecord::unassigned(s.as_ref().trim())))
    }

    /// Load the roster at `path`, falling back to `default_stores` on any error.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load<S: AsRef<str>>(path: &Path, default_stores: &[S]) -> Self {
        if !path.exists() {
            warn!("Analyst roster not found; using default store list");
            return Self::fallback(default_stores);
        }

        match read_roster_csv(path) {
            Ok(records) => {
                let roster = Self::from_records(records);
                info!(
                    stores = roster.len(),
                    analysts = roster.unique_analysts(),
                    "Loaded analyst roster"
                );
                roster
            }
            Err(e) => {
                warn!(error = %e, "Could not read analyst roster; using default store list");
                Self::fallback(default_stores)
            }
        }
    }

    pub fn stores(&self) -> &[StoreRecord] {
        &self.stores
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Analyst responsible for `store`, [`UNASSIGNED`] if the roster has no entry.
    pub fn analyst_for(&self, store: &str) -> &str {
        self.analysts.get(store).map_or(UNASSIGNED, String::as_str)
    }

    pub fn unique_analysts(&self) -> usize {
        self.analysts.values().collect::<HashSet<_>>().len()
    }
}

/// Read `Store`/`Analyst` rows from a CSV file.
///
/// Cells are trimmed, rows with an empty store are skipped and an empty
/// analyst becomes [`UNASSIGNED`].
///
/// # Errors
///
/// Returns an error if the file cannot be read, either column is missing, or
/// a row is malformed.
pub fn read_roster_csv(path: &Path) -> Result<Vec<StoreRecord>, Box<dyn Error>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}') == name)
            .ok_or_else(|| format!("missing `{name}` column"))
    };
    let store_idx = column(STORE_COLUMN)?;
    let analyst_idx = column(ANALYST_COLUMN)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let name = row.get(store_idx).unwrap_or("").trim();
        if name.is_empty() {
            continue;
        }
        let analyst = match row.get(analyst_idx).map(str::trim) {
            Some(a) if !a.is_empty() => a,
            _ => UNASSIGNED,
        };
        records.push(StoreRecord::new(name, analyst));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_STORES;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_csv(contents: &str) -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("analyst.csv");
        std::fs::write(&path, contents).unwrap();
        (temp_dir, path)
    }

    #[test]
    fn test_load_trims_and_drops_empty_stores() {
        let (_temp_dir, path) = write_csv(
            "Store,Analyst\n  Mud Bay , Jane \n,Bob\n   ,Bob\nPet Depot,\nDogtopia,Omar\n",
        );
        let roster = Roster::load(&path, DEFAULT_STORES);

        let names: Vec<&str> = roster.stores().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Mud Bay", "Pet Depot", "Dogtopia"]);
        assert_eq!(roster.analyst_for("Mud Bay"), "Jane");
        assert_eq!(roster.analyst_for("Pet Depot"), UNASSIGNED);
        assert_eq!(roster.analyst_for("Dogtopia"), "Omar");
        assert_eq!(roster.unique_analysts(), 3);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("analyst.csv");
        let roster = Roster::load(&path, DEFAULT_STORES);

        assert_eq!(roster.len(), DEFAULT_STORES.len());
        assert!(roster.stores().iter().all(|s| s.analyst == UNASSIGNED));
        assert_eq!(roster.stores()[0].name, "Doggie Style");
    }

    #[test]
    fn test_missing_column_falls_back() {
        let (_temp_dir, path) = write_csv("Name,Owner\nMud Bay,Jane\n");
        assert!(read_roster_csv(&path).is_err());

        let roster = Roster::load(&path, &["Only Store"]);
        assert_eq!(roster.stores(), &[StoreRecord::unassigned("Only Store")]);
    }

    #[test]
    fn test_extra_columns_and_bom() {
        let (_temp_dir, path) = write_csv("\u{feff}Store,Region,Analyst\nKriser's,West,Lee\n");
        let records = read_roster_csv(&path).unwrap();
        assert_eq!(records, vec![StoreRecord::new("Kriser's", "Lee")]);
    }

    #[test]
    fn test_duplicate_stores_take_last_analyst() {
        let (_temp_dir, path) = write_csv("Store,Analyst\nMud Bay,Jane\nDogtopia,Lee\nMud Bay,Omar\n");
        let roster = Roster::load(&path, DEFAULT_STORES);

        assert_eq!(
            roster.stores(),
            &[StoreRecord::new("Mud Bay", "Omar"), StoreRecord::new("Dogtopia", "Lee")]
        );
        assert_eq!(roster.analyst_for("Mud Bay"), "Omar");
        assert_eq!(roster.unique_analysts(), 2);
    }

    #[test]
    fn test_unknown_store_is_unassigned() {
        let roster = Roster::from_records([StoreRecord::new("Acme Pet", "Jane")]);
        assert_eq!(roster.analyst_for("Beta Pets"), UNASSIGNED);
    }
}
