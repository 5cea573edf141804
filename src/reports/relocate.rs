use crate::reports::paths::ReportPaths;
use crate::reports::row::ReportRow;
use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    pub category: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub source_exists: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// Destination already held identical bytes; the source was dropped.
    AlreadyArchived,
    SourceMissing,
    Failed(String),
}

/// Works out where every archived row's report file goes. Touches nothing
/// but `exists()` checks.
pub fn plan_moves(paths: &ReportPaths, archived: &[ReportRow]) -> Vec<MovePlan> {
    archived
        .iter()
        .map(|row| {
            let source = paths.report_file(&row.category, &row.filename);
            MovePlan {
                category: row.category.clone(),
                source_exists: source.is_file(),
                destination: paths.archived_report_file(&row.category, &row.filename),
                source,
            }
        })
        .collect()
}

fn file_hash(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

fn same_contents(a: &Path, b: &Path) -> Result<bool> {
    Ok(file_hash(a)? == file_hash(b)?)
}

fn move_file(from: &Path, to: &Path) -> Result<()> {
    if from == to {
        return Ok(());
    }
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    match fs::rename(from, to) {
        Ok(_) => Ok(()),
        Err(rename_err) => {
            if matches!(
                rename_err.kind(),
                ErrorKind::CrossesDevices | ErrorKind::PermissionDenied
            ) {
                fs::copy(from, to).with_context(|| {
                    format!("failed to copy {} to {}", from.display(), to.display())
                })?;
                fs::remove_file(from)
                    .with_context(|| format!("failed to remove {}", from.display()))?;
                Ok(())
            } else {
                Err(rename_err).with_context(|| {
                    format!("failed to move {} to {}", from.display(), to.display())
                })
            }
        }
    }
}

fn apply_one(plan: &MovePlan) -> Result<MoveOutcome> {
    if !plan.source.is_file() {
        return Ok(MoveOutcome::SourceMissing);
    }
    if plan.destination.is_file() && same_contents(&plan.source, &plan.destination)? {
        fs::remove_file(&plan.source)
            .with_context(|| format!("failed to remove {}", plan.source.display()))?;
        return Ok(MoveOutcome::AlreadyArchived);
    }
    move_file(&plan.source, &plan.destination)?;
    Ok(MoveOutcome::Moved)
}

/// Carries out one planned move. Failures are folded into the outcome so
/// the caller can keep going with the remaining rows.
pub fn apply(plan: &MovePlan) -> MoveOutcome {
    match apply_one(plan) {
        Ok(outcome) => outcome,
        Err(err) => MoveOutcome::Failed(format!("{err:#}")),
    }
}
