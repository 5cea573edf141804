use crate::error::{ArchiveError, WarnCode};
use crate::reports::warn::{self, WarnEvent};
use anyhow::Result;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

include!(concat!(env!("OUT_DIR"), "/reports_env_allowlist.rs"));

const DEFAULT_REPORTS_ROOT: &str = ".claude/reports";
const DEFAULT_ARCHIVE_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    #[default]
    Overwrite,
    Version,
}

impl CollisionPolicy {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Some(Self::Overwrite),
            "version" => Some(Self::Version),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveSettings {
    pub reports_root: String,
    pub default_days: u32,
    pub collision: CollisionPolicy,
    pub timezone: Option<String>,
    pub audit_log: bool,
    pub output: OutputFormat,
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            reports_root: DEFAULT_REPORTS_ROOT.to_string(),
            default_days: DEFAULT_ARCHIVE_DAYS,
            collision: CollisionPolicy::Overwrite,
            timezone: None,
            audit_log: true,
            output: OutputFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ArchiverConfig {
    pub archive: ArchiveSettings,
}

impl ArchiverConfig {
    /// Resolved time zone for "today". `None` means the system local zone.
    pub fn timezone(&self) -> Result<Option<Tz>> {
        let Some(name) = self.archive.timezone.as_deref() else {
            return Ok(None);
        };
        let tz = name.trim().parse::<Tz>().map_err(|err| {
            ArchiveError::InvalidConfig(format!("unknown timezone `{name}`: {err}"))
        })?;
        Ok(Some(tz))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialArchiverConfig {
    archive: Option<ArchiveSettings>,
}

fn lookup_string(lookup: &impl Fn(&str) -> Option<String>, var: &str) -> Option<String> {
    lookup(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or_u32(lookup: &impl Fn(&str) -> Option<String>, var: &str, fallback: u32) -> u32 {
    lookup_string(lookup, var)
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(fallback)
}

fn env_or_bool(lookup: &impl Fn(&str) -> Option<String>, var: &str, fallback: bool) -> bool {
    match lookup_string(lookup, var).as_deref() {
        Some("1" | "true" | "TRUE" | "yes" | "on") => true,
        Some("0" | "false" | "FALSE" | "no" | "off") => false,
        _ => fallback,
    }
}

fn apply_env_overrides(
    cfg: &mut ArchiverConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    let settings = &mut cfg.archive;
    if let Some(root) = lookup_string(&lookup, "REPORTS_ROOT") {
        settings.reports_root = root;
    }
    settings.default_days = env_or_u32(&lookup, "REPORTS_ARCHIVE_DAYS", settings.default_days);
    if let Some(raw) = lookup_string(&lookup, "REPORTS_ARCHIVE_COLLISION") {
        settings.collision = CollisionPolicy::parse(&raw).ok_or_else(|| {
            ArchiveError::InvalidConfig(format!(
                "invalid collision policy `{raw}`: use `overwrite` or `version`"
            ))
        })?;
    }
    if let Some(tz) = lookup_string(&lookup, "REPORTS_TIMEZONE") {
        settings.timezone = Some(tz);
    }
    settings.audit_log = env_or_bool(&lookup, "REPORTS_AUDIT_LOG", settings.audit_log);
    if let Some(raw) = lookup_string(&lookup, "REPORTS_OUTPUT") {
        settings.output = OutputFormat::parse(&raw).ok_or_else(|| {
            ArchiveError::InvalidConfig(format!("invalid output format `{raw}`: use `text` or `json`"))
        })?;
    }
    Ok(())
}

fn validate(cfg: &ArchiverConfig) -> Result<()> {
    if cfg.archive.reports_root.trim().is_empty() {
        return Err(ArchiveError::InvalidConfig("reports_root cannot be empty".to_string()).into());
    }
    cfg.timezone()?;
    Ok(())
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(custom) = env::var("REPORTS_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    let home = dirs::home_dir()?;
    Some(home.join(".config").join("report-archiver").join("config.toml"))
}

fn merge_file_config(base: &mut ArchiverConfig, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(path).map_err(|err| {
        ArchiveError::InvalidConfig(format!("failed to read {}: {err}", path.display()))
    })?;
    let parsed: PartialArchiverConfig = toml::from_str(&raw).map_err(|err| {
        ArchiveError::InvalidConfig(format!("failed to parse {}: {err}", path.display()))
    })?;
    if let Some(archive) = parsed.archive {
        base.archive = archive;
    }
    Ok(())
}

fn unknown_env_keys(keys: impl Iterator<Item = String>) -> Vec<String> {
    keys.filter(|k| k.starts_with("REPORTS_"))
        .filter(|k| !GENERATED_REPORTS_ENV_ALLOWLIST.contains(&k.as_str()))
        .collect()
}

fn warn_unknown_env() {
    for key in unknown_env_keys(env::vars_os().filter_map(|(k, _)| k.into_string().ok())) {
        warn::emit(WarnEvent {
            code: WarnCode::W004UnknownEnv.as_str(),
            stage: "config",
            action: "ignore-env",
            category: "",
            file: &key,
            reason: "unrecognised-reports-variable",
            err: "",
        });
    }
}

pub fn load_config() -> Result<ArchiverConfig> {
    let mut cfg = ArchiverConfig::default();
    if let Some(path) = resolve_config_path() {
        merge_file_config(&mut cfg, &path)?;
    }
    apply_env_overrides(&mut cfg, |var| env::var(var).ok())?;
    warn_unknown_env();

    validate(&cfg)?;
    Ok(cfg)
}
