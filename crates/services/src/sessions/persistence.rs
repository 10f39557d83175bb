use std::sync::Arc;

use chrono::Duration;
use quiz_core::Clock;
use quiz_core::model::{
    HIGH_SCORE_KEY, SNAPSHOT_KEY, SessionSnapshot, SnapshotError, decode_high_score,
    encode_high_score,
};
use storage::{KeyValueStore, StorageError};

use crate::error::PersistenceError;

/// What the store held under the snapshot key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadedSnapshot {
    Absent,
    /// Older than the TTL; already removed from the store.
    Expired(SessionSnapshot),
    /// Unparsable or unsupported; already removed from the store.
    Malformed(SnapshotError),
    Valid(SessionSnapshot),
}

/// Reads and writes the session snapshot and the high score.
#[derive(Clone)]
pub struct SessionPersistence {
    store: Arc<dyn KeyValueStore>,
    clock: Clock,
    ttl: Duration,
}

impl SessionPersistence {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Clock, ttl: Duration) -> Self {
        Self { store, clock, ttl }
    }

    /// Load the stored snapshot, dropping it when expired or malformed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read or the stale entry
    /// cannot be removed.
    pub async fn load(&self) -> Result<LoadedSnapshot, StorageError> {
        let Some(raw) = self.store.get_item(SNAPSHOT_KEY).await? else {
            return Ok(LoadedSnapshot::Absent);
        };

        match SessionSnapshot::decode(&raw) {
            Err(err) => {
                self.store.remove_item(SNAPSHOT_KEY).await?;
                Ok(LoadedSnapshot::Malformed(err))
            }
            Ok(snapshot) if snapshot.is_expired(self.clock.now(), self.ttl) => {
                self.store.remove_item(SNAPSHOT_KEY).await?;
                Ok(LoadedSnapshot::Expired(snapshot))
            }
            Ok(snapshot) => Ok(LoadedSnapshot::Valid(snapshot)),
        }
    }

    /// Write a snapshot stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if encoding or the store write fails.
    pub async fn save(
        &self,
        current_index: usize,
        score: i64,
        shuffle_seed: Option<u64>,
    ) -> Result<SessionSnapshot, PersistenceError> {
        let snapshot = SessionSnapshot::new(current_index, score, self.clock.now())
            .with_shuffle_seed(shuffle_seed);
        let raw = snapshot.encode()?;
        self.store.set_item(SNAPSHOT_KEY, &raw).await?;
        Ok(snapshot)
    }

    /// Remove the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.store.remove_item(SNAPSHOT_KEY).await
    }

    /// Best score ever recorded; absent or unparsable values read as 0.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn high_score(&self) -> Result<i64, StorageError> {
        let raw = self.store.get_item(HIGH_SCORE_KEY).await?;
        Ok(raw.as_deref().and_then(decode_high_score).unwrap_or(0))
    }

    /// Store `score` as the new high score if it beats the current one.
    ///
    /// Returns `true` when the stored value changed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read or written.
    pub async fn record_high_score(&self, score: i64) -> Result<bool, StorageError> {
        let current = self.high_score().await?;
        if score <= current {
            return Ok(false);
        }
        self.store
            .set_item(HIGH_SCORE_KEY, &encode_high_score(score))
            .await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::default_snapshot_ttl;
    use quiz_core::time::{fixed_clock, fixed_now};
    use storage::InMemoryStore;

    fn persistence(store: &InMemoryStore, clock: Clock) -> SessionPersistence {
        SessionPersistence::new(Arc::new(store.clone()), clock, default_snapshot_ttl())
    }

    #[tokio::test]
    async fn save_then_load_is_valid() {
        let store = InMemoryStore::new();
        let persistence = persistence(&store, fixed_clock());

        let saved = persistence.save(4, 7, None).await.unwrap();
        assert_eq!(saved.timestamp, fixed_now().timestamp_millis());

        assert_eq!(
            persistence.load().await.unwrap(),
            LoadedSnapshot::Valid(saved)
        );
    }

    #[tokio::test]
    async fn expired_snapshot_is_removed() {
        let store = InMemoryStore::new();
        persistence(&store, fixed_clock())
            .save(1, 2, None)
            .await
            .unwrap();

        let mut later = fixed_clock();
        later.advance(Duration::hours(24));
        let loaded = persistence(&store, later).load().await.unwrap();

        assert!(matches!(loaded, LoadedSnapshot::Expired(_)));
        assert_eq!(store.get_item(SNAPSHOT_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn malformed_snapshot_is_removed() {
        let store = InMemoryStore::new();
        store.set_item(SNAPSHOT_KEY, "{not json").await.unwrap();

        let loaded = persistence(&store, fixed_clock()).load().await.unwrap();

        assert!(matches!(
            loaded,
            LoadedSnapshot::Malformed(SnapshotError::Malformed(_))
        ));
        assert_eq!(store.get_item(SNAPSHOT_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn high_score_only_increases() {
        let store = InMemoryStore::new();
        let persistence = persistence(&store, fixed_clock());
        store.set_item(HIGH_SCORE_KEY, "3").await.unwrap();

        assert!(persistence.record_high_score(5).await.unwrap());
        assert!(!persistence.record_high_score(2).await.unwrap());
        assert!(!persistence.record_high_score(5).await.unwrap());
        assert_eq!(persistence.high_score().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn garbage_high_score_reads_as_zero() {
        let store = InMemoryStore::new();
        store.set_item(HIGH_SCORE_KEY, "lots").await.unwrap();
        let persistence = persistence(&store, fixed_clock());

        assert_eq!(persistence.high_score().await.unwrap(), 0);
        assert!(persistence.record_high_score(1).await.unwrap());
        assert_eq!(
            store.get_item(HIGH_SCORE_KEY).await.unwrap().as_deref(),
            Some("1")
        );
    }
}
