use crate::error::WarnCode;
use crate::reports::warn::{self, WarnEvent};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

pub fn now_epoch_secs() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before UNIX_EPOCH")?
        .as_secs())
}

/// Calendar date of the current run, in `tz` when given, else the local zone.
pub fn today(tz: Option<Tz>) -> NaiveDate {
    match tz {
        Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
        None => Local::now().date_naive(),
    }
}

/// Title-cases `input` the way section headings are written: the first
/// letter of every alphabetic run is upper-cased, the rest lower-cased.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_alpha = false;
    for ch in input.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

/// Replaces `path` with `contents` through a temp file in the same directory.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("failed to write temp file for {}", path.display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("failed to sync temp file for {}", path.display()))?;
    if let Ok(meta) = fs::metadata(path)
        && let Err(err) = fs::set_permissions(tmp.path(), meta.permissions())
    {
        warn::emit(WarnEvent {
            code: WarnCode::W005PermissionsNotCopied.as_str(),
            stage: "write",
            action: "copy-permissions",
            category: "na",
            file: &path.display().to_string(),
            reason: "replacement-keeps-default-mode",
            err: &err.to_string(),
        });
    }
    tmp.persist(path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn title_case_capitalises_each_word() {
        assert_eq!(title_case("analysis"), "Analysis");
        assert_eq!(title_case("data-science"), "Data-Science");
        assert_eq!(title_case("ml_OPS"), "Ml_Ops");
        assert_eq!(title_case("2fa notes"), "2Fa Notes");
    }

    #[test]
    fn write_atomic_replaces_existing_contents() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("_registry.md");
        fs::write(&path, "old\n").expect("seed");

        write_atomic(&path, "new\n").expect("write");
        assert_eq!(fs::read_to_string(&path).expect("read"), "new\n");

        let leftovers = fs::read_dir(tmp.path()).expect("read dir").count();
        assert_eq!(leftovers, 1);
    }

    #[cfg(unix)]
    #[test]
    fn write_atomic_keeps_the_replaced_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("_registry.md");
        fs::write(&path, "old\n").expect("seed");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).expect("chmod");

        write_atomic(&path, "new\n").expect("write");

        let mode = fs::metadata(&path).expect("meta").permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[test]
    fn today_in_zone_is_within_a_day_of_local() {
        let local = today(None);
        let far_east = today(Some(chrono_tz::Pacific::Kiritimati));
        let diff = (far_east - local).num_days().abs();
        assert!(diff <= 2);
    }
}
