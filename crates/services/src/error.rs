//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{SessionError, SnapshotError};
use storage::StorageError;

/// Errors emitted by `SessionPersistence` when writing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PersistenceError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `SessionController`.
///
/// Only caller contract violations surface here; persistence failures are
/// recorded in the error log instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ControllerError {
    #[error(transparent)]
    Session(#[from] SessionError),
}
