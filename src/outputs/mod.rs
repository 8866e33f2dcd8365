//! Output generation for the JSON snapshot, the CSV export and the console report.
//!
//! # Submodules
//!
//! - [`json`]: Writes the [`Snapshot`](crate::models::Snapshot) to the latest and dated JSON files
//! - [`csv`]: Writes one row per article to a dated CSV file, when any were found
//! - [`report`]: Renders the human-readable grouped listing
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── latest_news.json                    # overwritten every run
//! ├── latest_news_2026-10-17.json         # archive for the run date
//! └── store_open_close_news_2026-10-17.csv
//! ```

pub mod csv;
pub mod json;
pub mod report;
