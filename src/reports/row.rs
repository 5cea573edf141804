//! Tokenizer for registry lines.
//!
//! A report row has the shape
//!
//! ```text
//! | [<filename>](<category>/<rest of path>) | <YYYY-MM-DD> | <status> |<tail>
//! ```
//!
//! where `<tail>` holds the summary column, its closing pipe and the line
//! terminator. `filename`, `path` and `status` are the shortest text that
//! lets the remainder of the line match. Lines that do not fit are never an
//! error; they classify as [`LineKind::Other`] and pass through untouched.

use chrono::NaiveDate;

const SECTION_MARKER: &str = "### ";
const TABLE_HEADER_PREFIX: &str = "| Report |";
const TABLE_SEPARATOR_PREFIX: &str = "|---";
const ROW_OPEN: &str = "| [";
const LINK_MIDDLE: &str = "](";
const LINK_CLOSE: &str = ") | ";
const COLUMN_SEP: &str = " | ";
const STATUS_CLOSE: &str = " |";
const DATE_LEN: usize = 10;

pub const ARCHIVED_STATUS: &str = "Archived";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub filename: String,
    pub path: String,
    pub category: String,
    pub date: NaiveDate,
    pub date_text: String,
    pub status: String,
    /// Text after the status column's closing pipe, terminator included.
    pub tail: String,
    /// Lower-cased title of the `### ` section the row appeared under.
    pub section: Option<String>,
}

impl ReportRow {
    pub fn summary(&self) -> &str {
        let trimmed = self.tail.trim();
        trimmed.strip_suffix('|').unwrap_or(trimmed).trim()
    }

    /// The row as it appears in an archive registry: status forced to
    /// `Archived`, always newline-terminated.
    pub fn render_archived(&self) -> String {
        let mut out = format!(
            "| [{}]({}) | {} | {ARCHIVED_STATUS} |{}",
            self.filename, self.path, self.date_text, self.tail
        );
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Section(String),
    TableHeader,
    TableSeparator,
    Report(ReportRow),
    Other,
}

pub fn classify(line: &str) -> LineKind {
    if let Some(rest) = line.strip_prefix(SECTION_MARKER) {
        return LineKind::Section(rest.trim().to_lowercase());
    }
    if line.starts_with(TABLE_HEADER_PREFIX) {
        return LineKind::TableHeader;
    }
    if line.starts_with(TABLE_SEPARATOR_PREFIX) {
        return LineKind::TableSeparator;
    }
    match parse_row(line) {
        Some(row) => LineKind::Report(row),
        None => LineKind::Other,
    }
}

struct RawRow<'a> {
    filename: &'a str,
    path: &'a str,
    date_text: &'a str,
    status: &'a str,
    tail: &'a str,
}

/// Parses a report row. The first grammar match decides; a match with an
/// empty filename, a path without a non-empty category, or a date that is
/// not a real calendar date is rejected.
pub fn parse_row(line: &str) -> Option<ReportRow> {
    let raw = match_row(line)?;
    if raw.filename.is_empty() {
        return None;
    }
    let (category, _) = raw.path.split_once('/')?;
    if category.is_empty() {
        return None;
    }
    let date = NaiveDate::parse_from_str(raw.date_text, "%Y-%m-%d").ok()?;
    Some(ReportRow {
        filename: raw.filename.to_string(),
        path: raw.path.to_string(),
        category: category.to_string(),
        date,
        date_text: raw.date_text.to_string(),
        status: raw.status.to_string(),
        tail: raw.tail.to_string(),
        section: None,
    })
}

fn match_row(line: &str) -> Option<RawRow<'_>> {
    let body = line.strip_prefix(ROW_OPEN)?;
    body.match_indices(LINK_MIDDLE).find_map(|(name_end, _)| {
        let filename = &body[..name_end];
        if filename.contains('\n') {
            return None;
        }
        match_after_filename(filename, &body[name_end + LINK_MIDDLE.len()..])
    })
}

fn match_after_filename<'a>(filename: &'a str, rest: &'a str) -> Option<RawRow<'a>> {
    rest.match_indices(LINK_CLOSE).find_map(|(path_end, _)| {
        let path = &rest[..path_end];
        if path.contains('\n') {
            return None;
        }
        let after_path = &rest[path_end + LINK_CLOSE.len()..];
        let (date_text, after_date) = split_date(after_path)?;
        let columns = after_date.strip_prefix(COLUMN_SEP)?;
        let status_end = columns.find(STATUS_CLOSE)?;
        let status = &columns[..status_end];
        if status.contains('\n') {
            return None;
        }
        Some(RawRow {
            filename,
            path,
            date_text,
            status,
            tail: &columns[status_end + STATUS_CLOSE.len()..],
        })
    })
}

fn split_date(text: &str) -> Option<(&str, &str)> {
    let bytes = text.as_bytes();
    if bytes.len() < DATE_LEN {
        return None;
    }
    let shape_ok = bytes[..DATE_LEN].iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !shape_ok {
        return None;
    }
    Some(text.split_at(DATE_LEN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(line: &str) -> ReportRow {
        match classify(line) {
            LineKind::Report(row) => row,
            other => panic!("expected report row, got {other:?}"),
        }
    }

    #[test]
    fn parses_a_canonical_row() {
        let got = row("| [q3.md](analysis/q3.md) | 2026-09-01 | Complete | Quarter review |\n");
        assert_eq!(got.filename, "q3.md");
        assert_eq!(got.path, "analysis/q3.md");
        assert_eq!(got.category, "analysis");
        assert_eq!(got.date, NaiveDate::from_ymd_opt(2026, 9, 1).expect("date"));
        assert_eq!(got.status, "Complete");
        assert_eq!(got.tail, " Quarter review |\n");
        assert_eq!(got.summary(), "Quarter review");
    }

    #[test]
    fn classifies_structural_lines() {
        assert_eq!(
            classify("### Analysis Reports\n"),
            LineKind::Section("analysis reports".to_string())
        );
        assert_eq!(
            classify("| Report | Date | Status | Summary |\n"),
            LineKind::TableHeader
        );
        assert_eq!(
            classify("|--------|------|--------|---------|\n"),
            LineKind::TableSeparator
        );
        assert_eq!(classify("\n"), LineKind::Other);
        assert_eq!(classify("# Report Registry\n"), LineKind::Other);
    }

    #[test]
    fn malformed_rows_are_other() {
        for line in [
            "| q3.md | 2026-09-01 | Complete | x |\n",
            "| [q3.md](analysis/q3.md) | 2026-9-01 | Complete | x |\n",
            "| [q3.md](analysis/q3.md) | 2026-09-01 |\n",
            "|[q3.md](analysis/q3.md) | 2026-09-01 | Complete | x |\n",
            "  | [q3.md](analysis/q3.md) | 2026-09-01 | Complete | x |\n",
            "| [](notes/x.md) | 2020-01-01 | Draft | empty name |\n",
        ] {
            assert_eq!(classify(line), LineKind::Other, "line: {line:?}");
        }
    }

    #[test]
    fn path_without_category_is_other() {
        assert_eq!(
            classify("| [q3.md](q3.md) | 2026-09-01 | Complete | x |\n"),
            LineKind::Other
        );
        assert_eq!(
            classify("| [a.md](/a.md) | 2020-01-01 | Draft | empty category |\n"),
            LineKind::Other
        );
    }

    #[test]
    fn impossible_calendar_date_is_other() {
        assert_eq!(
            classify("| [q3.md](analysis/q3.md) | 2026-02-30 | Complete | x |\n"),
            LineKind::Other
        );
    }

    #[test]
    fn fields_take_the_shortest_match() {
        let got = row("| [a](b)c.md](notes/a](b)c.md) | 2026-01-02 | In | Progress | s |\n");
        assert_eq!(got.filename, "a");
        assert_eq!(got.path, "b)c.md](notes/a](b)c.md");
        assert_eq!(got.category, "b)c.md](notes");
        assert_eq!(got.status, "In");
        assert_eq!(got.tail, " Progress | s |\n");
    }

    #[test]
    fn row_without_summary_keeps_empty_tail() {
        let got = row("| [a.md](notes/a.md) | 2026-01-02 | Draft |");
        assert_eq!(got.tail, "");
        assert_eq!(got.summary(), "");
    }

    #[test]
    fn archived_rendering_forces_status_and_keeps_summary() {
        let got = row("| [a.md](notes/a.md) | 2026-01-02 | In Progress | keep me |\r\n");
        assert_eq!(
            got.render_archived(),
            "| [a.md](notes/a.md) | 2026-01-02 | Archived | keep me |\r\n"
        );

        let bare = row("| [a.md](notes/a.md) | 2026-01-02 | Draft | s |");
        assert_eq!(
            bare.render_archived(),
            "| [a.md](notes/a.md) | 2026-01-02 | Archived | s |\n"
        );
    }
}
