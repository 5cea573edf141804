use anyhow::Result;
use clap::Parser;

use crate::commands::CommandReport;
use crate::commands::archive::{self, ArchiveOptions};
use crate::reports::config::{OutputFormat, load_config};

#[derive(Debug, Parser)]
#[command(
    name = "archive-reports",
    version,
    about = "Archive old registry entries and their report files",
    long_about = "Moves registry entries older than DAYS, and the report files they point to, \
into a dated archive registry under <reports_root>/archive."
)]
struct Cli {
    /// Archive entries older than this many days (default: 7, or the configured default)
    days: Option<u32>,

    /// Show what would be archived without moving or writing any files
    #[arg(long)]
    dry_run: bool,
}

fn render_text(report: &CommandReport) -> String {
    let mut out = format!(
        "{}: {}\n",
        report.command,
        if report.ok { "ok" } else { "failed" }
    );
    for detail in &report.details {
        out.push_str(&format!("  {detail}\n"));
    }
    if !report.issues.is_empty() {
        out.push_str("issues:\n");
        for issue in &report.issues {
            out.push_str(&format!("  - {issue}\n"));
        }
    }
    out
}

fn print_report(report: &CommandReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config()?;

    let report = archive::run(
        &cfg,
        &ArchiveOptions {
            days: cli.days,
            dry_run: cli.dry_run,
        },
    )?;
    print_report(&report, cfg.archive.output)?;

    if !report.ok {
        anyhow::bail!("{} finished with {} issue(s)", report.command, report.issues.len());
    }
    Ok(())
}
