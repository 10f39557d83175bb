use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::session::{CORRECT_POINTS, INCORRECT_POINTS, ResumePoint};

/// Storage key holding the resumable session snapshot.
pub const SNAPSHOT_KEY: &str = "quizState";

/// Storage key holding the best score ever reached.
pub const HIGH_SCORE_KEY: &str = "quizHighScore";

/// Current snapshot layout version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Default lifetime of a snapshot before it is discarded (24 hours).
pub const DEFAULT_SNAPSHOT_TTL_MS: i64 = 86_400_000;

#[must_use]
pub fn default_snapshot_ttl() -> Duration {
    Duration::milliseconds(DEFAULT_SNAPSHOT_TTL_MS)
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Malformed(String),

    #[error("unsupported snapshot version {found}")]
    UnsupportedVersion { found: u32 },

    #[error("snapshot could not be encoded: {0}")]
    Encode(String),
}

/// Minimal persisted state needed to resume a session.
///
/// Encoded as `{"version":1,"currentQuestionIndex":3,"score":4,"timestamp":<epoch ms>}`.
/// Blobs without `version` are read as version 1; unknown fields are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SessionSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    pub current_question_index: usize,
    pub score: i64,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shuffle_seed: Option<u64>,
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

impl SessionSnapshot {
    #[must_use]
    pub fn new(current_question_index: usize, score: i64, taken_at: DateTime<Utc>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            current_question_index,
            score,
            timestamp: taken_at.timestamp_millis(),
            shuffle_seed: None,
        }
    }

    #[must_use]
    pub fn with_shuffle_seed(mut self, seed: Option<u64>) -> Self {
        self.shuffle_seed = seed;
        self
    }

    /// Serialize the snapshot for the key-value store.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Encode` if serialization fails.
    pub fn encode(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|err| SnapshotError::Encode(err.to_string()))
    }

    /// Parse and validate a stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Malformed` for unparsable or wrongly shaped data or a
    /// score no session could reach at the stored position, and
    /// `SnapshotError::UnsupportedVersion` for versions this build does not know.
    pub fn decode(raw: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self =
            serde_json::from_str(raw).map_err(|err| SnapshotError::Malformed(err.to_string()))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
            });
        }
        if !snapshot.score_is_reachable() {
            return Err(SnapshotError::Malformed(format!(
                "score {} is out of range at question {}",
                snapshot.score, snapshot.current_question_index
            )));
        }
        Ok(snapshot)
    }

    /// Snapshots are written after an answer, so at most `index + 1` questions are scored.
    fn score_is_reachable(&self) -> bool {
        let answered = i64::try_from(self.current_question_index)
            .unwrap_or(i64::MAX)
            .saturating_add(1);
        let lowest = answered.saturating_mul(INCORRECT_POINTS);
        let highest = answered.saturating_mul(CORRECT_POINTS);
        (lowest..=highest).contains(&self.score)
    }

    /// True when the snapshot is at least `ttl` old at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.timestamp_millis().saturating_sub(self.timestamp) >= ttl.num_milliseconds()
    }

    #[must_use]
    pub fn resume_point(&self) -> ResumePoint {
        ResumePoint {
            current_index: self.current_question_index,
            score: self.score,
        }
    }
}

/// Parse a stored high score. Anything but a decimal integer reads as absent.
#[must_use]
pub fn decode_high_score(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

#[must_use]
pub fn encode_high_score(score: i64) -> String {
    score.to_string()
}
