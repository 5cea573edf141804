use crate::error::ArchiveError;
use crate::reports::row::{LineKind, classify};
use crate::reports::util::write_atomic;
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// One line of the active registry, terminator included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryLine {
    pub text: String,
    pub kind: LineKind,
}

#[derive(Debug, Clone)]
pub struct Registry {
    pub lines: Vec<RegistryLine>,
}

impl Registry {
    pub fn report_rows(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| matches!(line.kind, LineKind::Report(_)))
            .count()
    }
}

/// Splits `text` into classified lines. Report rows remember the section
/// header they appeared under; that is the only state carried between lines.
pub fn parse(text: &str) -> Vec<RegistryLine> {
    let mut section: Option<String> = None;
    let mut out = Vec::new();
    for line in text.split_inclusive('\n') {
        let kind = match classify(line) {
            LineKind::Section(name) => {
                section = Some(name.clone());
                LineKind::Section(name)
            }
            LineKind::Report(mut row) => {
                row.section = section.clone();
                LineKind::Report(row)
            }
            other => other,
        };
        out.push(RegistryLine {
            text: line.to_string(),
            kind,
        });
    }
    out
}

pub fn load(path: &Path) -> Result<Registry> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(ArchiveError::RegistryMissing(path.to_path_buf()).into());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    Ok(Registry {
        lines: parse(&raw),
    })
}

pub fn render(lines: &[RegistryLine]) -> String {
    lines.iter().map(|line| line.text.as_str()).collect()
}

pub fn rewrite(path: &Path, lines: &[RegistryLine]) -> Result<()> {
    write_atomic(path, &render(lines))
}
