use crate::reports::config::ArchiverConfig;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

const REGISTRY_FILE: &str = "_registry.md";
const ARCHIVE_DIR: &str = "archive";
const AUDIT_LOG_FILE: &str = "_archive-audit.jsonl";

#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub reports_root: PathBuf,
    pub registry_file: PathBuf,
    pub archive_dir: PathBuf,
    pub audit_log: PathBuf,
}

impl ReportPaths {
    pub fn new(reports_root: impl Into<PathBuf>) -> Self {
        let reports_root = reports_root.into();
        let archive_dir = reports_root.join(ARCHIVE_DIR);
        Self {
            registry_file: reports_root.join(REGISTRY_FILE),
            audit_log: archive_dir.join(AUDIT_LOG_FILE),
            archive_dir,
            reports_root,
        }
    }

    pub fn report_file(&self, category: &str, filename: &str) -> PathBuf {
        self.reports_root.join(category).join(filename)
    }

    pub fn archived_report_file(&self, category: &str, filename: &str) -> PathBuf {
        self.archive_category_dir(category).join(filename)
    }

    pub fn archive_category_dir(&self, category: &str) -> PathBuf {
        self.archive_dir.join(category)
    }

    /// `archive/_registry-archive-<YYYYMMDD>.md`, or with a `-<n>` suffix
    /// for later versions of the same day.
    pub fn archive_registry_file(&self, date: NaiveDate, version: Option<u32>) -> PathBuf {
        let stamp = date.format("%Y%m%d");
        let name = match version {
            Some(n) => format!("_registry-archive-{stamp}-{n}.md"),
            None => format!("_registry-archive-{stamp}.md"),
        };
        self.archive_dir.join(name)
    }
}

pub fn resolve_paths(cfg: &ArchiverConfig) -> ReportPaths {
    ReportPaths::new(Path::new(cfg.archive.reports_root.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_hangs_off_the_reports_root() {
        let paths = ReportPaths::new("/work/.claude/reports");
        assert_eq!(
            paths.registry_file,
            PathBuf::from("/work/.claude/reports/_registry.md")
        );
        assert_eq!(
            paths.report_file("analysis", "q3.md"),
            PathBuf::from("/work/.claude/reports/analysis/q3.md")
        );
        assert_eq!(
            paths.archived_report_file("analysis", "q3.md"),
            PathBuf::from("/work/.claude/reports/archive/analysis/q3.md")
        );
    }

    #[test]
    fn archive_registry_name_uses_compact_date() {
        let paths = ReportPaths::new("r");
        let date = NaiveDate::from_ymd_opt(2026, 10, 9).expect("date");
        assert_eq!(
            paths.archive_registry_file(date, None),
            PathBuf::from("r/archive/_registry-archive-20261009.md")
        );
        assert_eq!(
            paths.archive_registry_file(date, Some(3)),
            PathBuf::from("r/archive/_registry-archive-20261009-3.md")
        );
    }

    #[test]
    fn config_root_is_trimmed() {
        let mut cfg = ArchiverConfig::default();
        cfg.archive.reports_root = " out/reports ".to_string();
        assert_eq!(resolve_paths(&cfg).reports_root, PathBuf::from("out/reports"));
    }
}
