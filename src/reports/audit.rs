use crate::reports::util::now_epoch_secs;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditEvent {
    pub at_epoch_secs: u64,
    pub archive_date: String,
    pub threshold_days: u32,
    pub archived: usize,
    pub remaining: usize,
    pub moved: usize,
    pub missing: usize,
    pub failed: usize,
    pub archive_registry: Option<String>,
}

impl AuditEvent {
    pub fn stamped(mut self) -> Result<Self> {
        self.at_epoch_secs = now_epoch_secs()?;
        Ok(self)
    }
}

pub fn append_event(log_path: &Path, event: &AuditEvent) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let line = format!("{}\n", serde_json::to_string(event)?);
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;
    file.write_all(line.as_bytes())
        .with_context(|| format!("failed to append {}", log_path.display()))?;
    Ok(())
}
