mod controller;
mod persistence;
mod plan;
mod view;

// Public API of the session subsystem.
pub use controller::{SavedProgress, SessionController};
pub use persistence::{LoadedSnapshot, SessionPersistence};
pub use view::{FinalScore, NullView, QuizView};
