//! Error log kept by the controller and the plain-text report built from it.

use chrono::{DateTime, SecondsFormat, Utc};

/// A recovered failure, kept for the error report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub message: String,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorRecord {
    #[must_use]
    pub fn new(message: impl Into<String>, error: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            message: message.into(),
            error: error.into(),
            timestamp: at,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    records: Vec<ErrorRecord>,
}

impl ErrorLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ErrorRecord) {
        self.records.push(record);
    }

    #[must_use]
    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Assemble the text a user can paste into a bug report.
    #[must_use]
    pub fn render_report(&self, now: DateTime<Utc>, agent: &str) -> String {
        let details = self
            .records
            .iter()
            .map(|record| {
                format!(
                    "{}: {} - {}",
                    iso_millis(record.timestamp),
                    record.message,
                    record.error
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Quiz App Error Report\n\nErrors:\n{details}\n\nUser Agent: {agent}\n\nTimestamp: {}",
            iso_millis(now)
        )
    }
}

fn iso_millis(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[test]
    fn report_lists_every_record() {
        let mut log = ErrorLog::new();
        log.push(ErrorRecord::new(
            "Failed to load saved state",
            "malformed snapshot: expected value",
            fixed_now(),
        ));
        log.push(ErrorRecord::new("Failed to save game state", "disk full", fixed_now()));

        let report = log.render_report(fixed_now(), "quiz-cli/0.1.0");

        assert_eq!(
            report,
            "Quiz App Error Report\n\n\
             Errors:\n\
             2023-11-14T22:13:20.000Z: Failed to load saved state - malformed snapshot: expected value\n\
             2023-11-14T22:13:20.000Z: Failed to save game state - disk full\n\n\
             User Agent: quiz-cli/0.1.0\n\n\
             Timestamp: 2023-11-14T22:13:20.000Z"
        );
    }

    #[test]
    fn empty_log_still_renders() {
        let log = ErrorLog::new();
        assert!(log.is_empty());
        assert!(log.render_report(fixed_now(), "x").contains("Errors:\n\n\nUser Agent: x"));
    }
}
