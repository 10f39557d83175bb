use chrono::Duration;
use thiserror::Error;

/// Snapshots older than this many hours are discarded by default.
pub const DEFAULT_SNAPSHOT_TTL_HOURS: u32 = 24;

/// Upper bound for the resume window (30 days).
pub const MAX_SNAPSHOT_TTL_HOURS: u32 = 720;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizSettings {
    snapshot_ttl_hours: u32,
    shuffle_questions: bool,
}

#[derive(Clone, Debug, Default)]
pub struct QuizSettingsDraft {
    pub snapshot_ttl_hours: Option<u32>,
    pub shuffle_questions: Option<bool>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSettingsError {
    #[error("snapshot TTL must be between 1 and {MAX_SNAPSHOT_TTL_HOURS} hours, got {0}")]
    InvalidSnapshotTtl(u32),
}

impl QuizSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the draft, filling unset fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns `QuizSettingsError` if the snapshot TTL is zero or above the maximum.
    pub fn validate(self) -> Result<QuizSettings, QuizSettingsError> {
        let snapshot_ttl_hours = self
            .snapshot_ttl_hours
            .unwrap_or(DEFAULT_SNAPSHOT_TTL_HOURS);
        if !(1..=MAX_SNAPSHOT_TTL_HOURS).contains(&snapshot_ttl_hours) {
            return Err(QuizSettingsError::InvalidSnapshotTtl(snapshot_ttl_hours));
        }

        Ok(QuizSettings {
            snapshot_ttl_hours,
            shuffle_questions: self.shuffle_questions.unwrap_or(false),
        })
    }
}

impl QuizSettings {
    #[must_use]
    pub fn snapshot_ttl_hours(&self) -> u32 {
        self.snapshot_ttl_hours
    }

    #[must_use]
    pub fn snapshot_ttl(&self) -> Duration {
        Duration::hours(i64::from(self.snapshot_ttl_hours))
    }

    #[must_use]
    pub fn shuffle_questions(&self) -> bool {
        self.shuffle_questions
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            snapshot_ttl_hours: DEFAULT_SNAPSHOT_TTL_HOURS,
            shuffle_questions: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_draft_uses_defaults() {
        let settings = QuizSettingsDraft::new().validate().unwrap();
        assert_eq!(settings, QuizSettings::default());
        assert_eq!(settings.snapshot_ttl().num_milliseconds(), 86_400_000);
        assert!(!settings.shuffle_questions());
    }

    #[test]
    fn rejects_zero_ttl() {
        let draft = QuizSettingsDraft {
            snapshot_ttl_hours: Some(0),
            ..QuizSettingsDraft::default()
        };
        assert_eq!(
            draft.validate().unwrap_err(),
            QuizSettingsError::InvalidSnapshotTtl(0)
        );
    }

    #[test]
    fn rejects_ttl_above_max() {
        let draft = QuizSettingsDraft {
            snapshot_ttl_hours: Some(MAX_SNAPSHOT_TTL_HOURS + 1),
            shuffle_questions: Some(true),
        };
        assert!(draft.validate().is_err());
    }
}
