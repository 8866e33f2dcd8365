//! Console report of the grouped news.

use std::fmt::Write;

use crate::models::AnalystGroups;
use crate::utils::truncate_chars;

/// Summaries longer than this many characters are cut in the report.
pub const SUMMARY_PREVIEW_CHARS: usize = 220;

/// Render the grouped listing printed at the end of a run.
///
/// With no entries, this is a single notice line instead.
pub fn render(groups: &AnalystGroups, lookback_days: u32) -> String {
    let mut out = String::new();

    if groups.values().all(Vec::is_empty) {
        writeln!(
            out,
            "No recent store opening or closing news found in the last {lookback_days} days."
        )
        .unwrap();
        return out;
    }

    let rule = "=".repeat(85);
    writeln!(out, "{rule}").unwrap();
    writeln!(
        out,
        "     STORE OPENING & CLOSING NEWS – GROUPED BY ANALYST (last {lookback_days} days only)"
    )
    .unwrap();
    writeln!(out, "{rule}\n").unwrap();

    for (analyst, items) in groups.iter().filter(|(_, items)| !items.is_empty()) {
        writeln!(out, "Analyst: {analyst}   ({} article(s))", items.len()).unwrap();
        writeln!(out, "{}", "-".repeat(70)).unwrap();

        for (i, item) in items.iter().enumerate() {
            writeln!(out, "{}. [{}] {}", i + 1, item.event_type, item.store).unwrap();
            writeln!(out, "   {}", item.title).unwrap();
            writeln!(out, "   Published: {}", item.published).unwrap();
            writeln!(out, "   Link:      {}", item.link).unwrap();
            writeln!(out, "   {}\n", truncate_chars(&item.summary, SUMMARY_PREVIEW_CHARS)).unwrap();
        }
        writeln!(out).unwrap();
    }

    out
}
