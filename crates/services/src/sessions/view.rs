use quiz_core::model::{AnswerOutcome, Question, SessionProgress};

use crate::report::ErrorRecord;
use crate::sessions::SavedProgress;

/// Final result handed to the view when a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalScore {
    pub score: i64,
    pub total_questions: usize,
    pub high_score: i64,
    pub is_new_high_score: bool,
}

/// Presentation boundary notified by `SessionController`.
///
/// Every method defaults to a no-op so front-ends only implement what they show.
pub trait QuizView: Send {
    fn show_start_prompt(&mut self, _saved: Option<&SavedProgress>) {}

    fn render_question(&mut self, _progress: &SessionProgress, _question: &Question) {}

    fn highlight_selection(&mut self, _index: usize) {}

    fn show_feedback(&mut self, _outcome: &AnswerOutcome) {}

    fn update_score(&mut self, _score: i64) {}

    fn show_final_score(&mut self, _result: &FinalScore) {}

    fn show_error_banner(&mut self, _record: &ErrorRecord) {}
}

/// Headless view that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullView;

impl QuizView for NullView {}
