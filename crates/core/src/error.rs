use thiserror::Error;

use crate::bank::QuestionSourceError;
use crate::model::{QuestionError, SessionError, SnapshotError};
use crate::settings::QuizSettingsError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    QuestionSource(#[from] QuestionSourceError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Settings(#[from] QuizSettingsError),
}
