use crate::reports::config::CollisionPolicy;
use crate::reports::paths::ReportPaths;
use crate::reports::row::ReportRow;
use crate::reports::util::{title_case, write_atomic};
use anyhow::Result;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const TABLE_HEADER: &str = "| Report | Date | Status | Summary |\n";
const TABLE_SEPARATOR: &str = "|--------|------|--------|---------|\n";

pub fn group_by_category(rows: &[ReportRow]) -> BTreeMap<&str, Vec<&ReportRow>> {
    let mut out: BTreeMap<&str, Vec<&ReportRow>> = BTreeMap::new();
    for row in rows {
        out.entry(row.category.as_str()).or_default().push(row);
    }
    out
}

pub fn render(archive_date: NaiveDate, threshold_days: u32, rows: &[ReportRow]) -> String {
    let mut out = String::new();
    out.push_str("# Archived Reports\n\n");
    out.push_str(&format!(
        "**Archive Date:** {}\n",
        archive_date.format("%Y-%m-%d")
    ));
    out.push_str(&format!(
        "**Threshold:** Reports older than {threshold_days} days\n"
    ));
    out.push_str(&format!("**Total Archived:** {} reports\n\n", rows.len()));
    out.push_str("---\n\n");

    for (category, entries) in group_by_category(rows) {
        out.push_str(&format!("### {}\n\n", title_case(category)));
        out.push_str(TABLE_HEADER);
        out.push_str(TABLE_SEPARATOR);
        for row in entries {
            out.push_str(&row.render_archived());
        }
        out.push_str("\n---\n\n");
    }

    out
}

/// Picks the archive registry file for `date`. Under `Version`, an existing
/// file for the day pushes the name to the first free `-<n>` suffix.
pub fn target_path(paths: &ReportPaths, date: NaiveDate, policy: CollisionPolicy) -> PathBuf {
    let base = paths.archive_registry_file(date, None);
    if policy == CollisionPolicy::Overwrite || !base.exists() {
        return base;
    }
    (2u32..)
        .map(|n| paths.archive_registry_file(date, Some(n)))
        .find(|candidate| !candidate.exists())
        .unwrap_or(base)
}

pub fn write(path: &Path, contents: &str) -> Result<()> {
    write_atomic(path, contents)
}
