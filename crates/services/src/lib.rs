#![forbid(unsafe_code)]

pub mod error;
pub mod report;
pub mod sessions;

pub use quiz_core::Clock;

pub use error::{ControllerError, PersistenceError};
pub use report::{ErrorLog, ErrorRecord};

pub use sessions::{
    FinalScore, LoadedSnapshot, NullView, QuizView, SavedProgress, SessionController,
    SessionPersistence,
};
