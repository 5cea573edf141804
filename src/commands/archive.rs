use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use crate::commands::CommandReport;
use crate::error::{ArchiveError, WarnCode};
use crate::reports::archive_registry;
use crate::reports::audit::{self, AuditEvent};
use crate::reports::config::ArchiverConfig;
use crate::reports::partition::{cutoff_date, partition};
use crate::reports::paths::{ReportPaths, resolve_paths};
use crate::reports::registry;
use crate::reports::relocate::{self, MoveOutcome, MovePlan, plan_moves};
use crate::reports::util::today;
use crate::reports::warn::{self, WarnEvent};

#[derive(Debug, Clone, Default)]
pub struct ArchiveOptions {
    pub days: Option<u32>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct MoveTally {
    moved: usize,
    missing: usize,
    failed: usize,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn warn_missing(plan: &MovePlan) {
    warn::emit(WarnEvent {
        code: WarnCode::W001SourceMissing.as_str(),
        stage: "relocate",
        action: "move-report",
        category: &plan.category,
        file: &plan.source.display().to_string(),
        reason: "source-missing",
        err: "",
    });
}

fn apply_moves(plans: &[MovePlan], report: &mut CommandReport) -> MoveTally {
    let mut tally = MoveTally::default();
    for plan in plans {
        match relocate::apply(plan) {
            MoveOutcome::Moved => {
                tally.moved += 1;
                report.detail(format!(
                    "moved {} -> {}",
                    plan.source.display(),
                    plan.destination.display()
                ));
            }
            MoveOutcome::AlreadyArchived => {
                tally.moved += 1;
                report.detail(format!(
                    "already archived {} (identical copy at {})",
                    plan.source.display(),
                    plan.destination.display()
                ));
            }
            MoveOutcome::SourceMissing => {
                tally.missing += 1;
                warn_missing(plan);
                report.detail(format!("file not found: {}", plan.source.display()));
            }
            MoveOutcome::Failed(err) => {
                tally.failed += 1;
                warn::emit(WarnEvent {
                    code: WarnCode::W002MoveFailed.as_str(),
                    stage: "relocate",
                    action: "move-report",
                    category: &plan.category,
                    file: &plan.source.display().to_string(),
                    reason: "move-failed",
                    err: &err,
                });
                report.issue(format!(
                    "failed to move {}: {err}",
                    plan.source.display()
                ));
            }
        }
    }
    tally
}

fn summarize(
    report: &mut CommandReport,
    archive_date: NaiveDate,
    threshold_days: u32,
    archived: usize,
    remaining: usize,
    archive_file: Option<&Path>,
) {
    report.detail(format!(
        "summary.archive_date={}",
        archive_date.format("%Y-%m-%d")
    ));
    report.detail(format!("summary.threshold_days={threshold_days}"));
    report.detail(format!("summary.archived={archived}"));
    report.detail(format!("summary.remaining={remaining}"));
    if let Some(path) = archive_file {
        report.detail(format!("summary.archive_registry={}", file_name(path)));
    }
}

pub fn run(cfg: &ArchiverConfig, opts: &ArchiveOptions) -> Result<CommandReport> {
    let run_date = today(cfg.timezone()?);
    run_at(cfg, opts, run_date)
}

/// One archiving pass as of `run_date`: parse, partition, then (unless dry
/// run) write the archive registry, move files and rewrite the registry.
pub fn run_at(
    cfg: &ArchiverConfig,
    opts: &ArchiveOptions,
    run_date: NaiveDate,
) -> Result<CommandReport> {
    let paths = resolve_paths(cfg);
    let threshold_days = opts.days.unwrap_or(cfg.archive.default_days);
    let cutoff = cutoff_date(run_date, threshold_days);
    let mut report = CommandReport::new("archive-reports");

    report.detail(format!("registry={}", paths.registry_file.display()));
    report.detail(format!("archive_dir={}", paths.archive_dir.display()));
    report.detail(format!("threshold_days={threshold_days}"));
    match cutoff {
        Some(cutoff) => report.detail(format!("cutoff={}", cutoff.format("%Y-%m-%d"))),
        None => report.detail("cutoff=none (threshold exceeds calendar range)"),
    }
    if opts.dry_run {
        report.detail("dry_run=true");
    }

    let loaded = match registry::load(&paths.registry_file) {
        Ok(loaded) => loaded,
        Err(err) => {
            if let Some(ArchiveError::RegistryMissing(_)) = err.downcast_ref::<ArchiveError>() {
                report.issue(format!("{err}"));
                return Ok(report);
            }
            return Err(err);
        }
    };

    report.detail(format!("registry_rows={}", loaded.report_rows()));
    let split = partition(loaded.lines, cutoff);
    let remaining = split.remaining_rows();
    for row in &split.archived {
        report.detail(format!(
            "archiving {}/{} (date={}, status={}, section={}, summary={})",
            row.category,
            row.filename,
            row.date_text,
            row.status,
            row.section.as_deref().unwrap_or("-"),
            row.summary()
        ));
    }

    let plans = plan_moves(&paths, &split.archived);
    let archive_file = (!split.archived.is_empty())
        .then(|| archive_registry::target_path(&paths, run_date, cfg.archive.collision));

    if opts.dry_run {
        for plan in &plans {
            if plan.source_exists {
                report.detail(format!(
                    "dry-run: would move {} -> {}",
                    plan.source.display(),
                    plan.destination.display()
                ));
            } else {
                warn_missing(plan);
                report.detail(format!("file not found: {}", plan.source.display()));
            }
        }
        report.detail(format!(
            "dry-run: would update {}",
            paths.registry_file.display()
        ));
        if let Some(path) = &archive_file {
            report.detail(format!("dry-run: would create {}", path.display()));
        }
        summarize(
            &mut report,
            run_date,
            threshold_days,
            split.archived.len(),
            remaining,
            archive_file.as_deref(),
        );
        report.detail("dry-run: no files were moved");
        return Ok(report);
    }

    fs::create_dir_all(&paths.archive_dir)
        .with_context(|| format!("failed to create {}", paths.archive_dir.display()))?;

    if let Some(path) = &archive_file {
        let contents = archive_registry::render(run_date, threshold_days, &split.archived);
        archive_registry::write(path, &contents)?;
        report.detail(format!("created archive registry {}", path.display()));
    }

    let tally = apply_moves(&plans, &mut report);

    if split.archived.is_empty() {
        report.detail("registry unchanged");
    } else {
        registry::rewrite(&paths.registry_file, &split.retained)?;
        report.detail(format!(
            "updated active registry {}",
            paths.registry_file.display()
        ));
    }

    summarize(
        &mut report,
        run_date,
        threshold_days,
        split.archived.len(),
        remaining,
        archive_file.as_deref(),
    );

    if cfg.archive.audit_log {
        record_audit(
            &paths,
            AuditEvent {
                at_epoch_secs: 0,
                archive_date: run_date.format("%Y-%m-%d").to_string(),
                threshold_days,
                archived: split.archived.len(),
                remaining,
                moved: tally.moved,
                missing: tally.missing,
                failed: tally.failed,
                archive_registry: archive_file.as_deref().map(file_name),
            },
        );
    }

    Ok(report)
}

fn record_audit(paths: &ReportPaths, event: AuditEvent) {
    let result = event
        .stamped()
        .and_then(|event| audit::append_event(&paths.audit_log, &event));
    if let Err(err) = result {
        warn::emit(WarnEvent {
            code: WarnCode::W003AuditFailed.as_str(),
            stage: "audit",
            action: "append-event",
            category: "",
            file: &paths.audit_log.display().to_string(),
            reason: "audit-write-failed",
            err: &format!("{err:#}"),
        });
    }
}
