use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("registry not found: {}", .0.display())]
    RegistryMissing(PathBuf),
    #[error("config file invalid or unreadable: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarnCode {
    W001SourceMissing,
    W002MoveFailed,
    W003AuditFailed,
    W004UnknownEnv,
    W005PermissionsNotCopied,
}

impl WarnCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::W001SourceMissing => "W001_SOURCE_MISSING",
            Self::W002MoveFailed => "W002_MOVE_FAILED",
            Self::W003AuditFailed => "W003_AUDIT_FAILED",
            Self::W004UnknownEnv => "W004_UNKNOWN_ENV",
            Self::W005PermissionsNotCopied => "W005_PERMISSIONS_NOT_COPIED",
        }
    }
}
