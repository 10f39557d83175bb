#![forbid(unsafe_code)]

pub mod bank;
pub mod error;
pub mod model;
pub mod settings;
pub mod time;

pub use bank::{BuiltinBank, QuestionBank, QuestionSource, QuestionSourceError};
pub use error::Error;
pub use settings::{QuizSettings, QuizSettingsDraft, QuizSettingsError};
pub use time::Clock;
