pub mod archive;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub ok: bool,
    pub details: Vec<String>,
    pub issues: Vec<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ok: true,
            details: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.ok = false;
        self.issues.push(text.into());
    }
}

#[cfg(test)]
mod tests {
    use super::CommandReport;

    #[test]
    fn issues_flip_ok() {
        let mut report = CommandReport::new("archive-reports");
        report.detail("threshold_days=7");
        assert!(report.ok);
        report.issue("registry not found");
        assert!(!report.ok);
        assert_eq!(report.details.len(), 1);
        assert_eq!(report.issues, vec!["registry not found".to_string()]);
    }
}
