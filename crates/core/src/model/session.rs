use thiserror::Error;

use crate::model::question::Question;

/// Points awarded for a correct answer.
pub const CORRECT_POINTS: i64 = 2;

/// Points awarded for an incorrect answer. Scores have no floor.
pub const INCORRECT_POINTS: i64 = -1;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("option {index} is out of range for a question with {len} options")]
    OptionOutOfRange { index: usize, len: usize },

    #[error("resume index {index} is past the end of a {len}-question bank")]
    ResumeOutOfRange { index: usize, len: usize },
}

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Where a session currently sits in the question flow.
///
/// The chosen option travels with the phase, so a selection can only exist
/// while a question is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    NotStarted,
    AwaitingSelection,
    AwaitingSubmit {
        selected: usize,
    },
    Answered {
        selected: usize,
        correct: bool,
    },
    Ended,
}

impl SessionPhase {
    #[must_use]
    pub fn selected_answer(self) -> Option<usize> {
        match self {
            SessionPhase::AwaitingSubmit { selected } | SessionPhase::Answered { selected, .. } => {
                Some(selected)
            }
            SessionPhase::NotStarted | SessionPhase::AwaitingSelection | SessionPhase::Ended => {
                None
            }
        }
    }

    /// True while a question is being shown (selection, submit or feedback).
    #[must_use]
    pub fn is_in_progress(self) -> bool {
        matches!(
            self,
            SessionPhase::AwaitingSelection
                | SessionPhase::AwaitingSubmit { .. }
                | SessionPhase::Answered { .. }
        )
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SessionPhase::NotStarted => "not_started",
            SessionPhase::AwaitingSelection => "awaiting_selection",
            SessionPhase::AwaitingSubmit { .. } => "awaiting_submit",
            SessionPhase::Answered { .. } => "answered",
            SessionPhase::Ended => "ended",
        }
    }
}

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Position and score restored from a persisted snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResumePoint {
    pub current_index: usize,
    pub score: i64,
}

/// Final result of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEnd {
    pub score: i64,
    pub total_questions: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A question is on screen at `index`.
    Question { index: usize, resumed: bool },
    /// The bank was exhausted before any question could be shown.
    Ended(SessionEnd),
    /// The session was already running or finished.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected(usize),
    Ignored,
}

/// Result of scoring the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub question_index: usize,
    pub selected: usize,
    pub correct_index: usize,
    pub is_correct: bool,
    pub points: i64,
    pub score: i64,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextOutcome {
    Question { index: usize },
    Ended(SessionEnd),
    Ignored,
}

/// Aggregated view of session progress, useful for a "question X of Y" header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    /// 1-based position of the current question, capped at `total`.
    pub position: usize,
    pub total: usize,
    pub score: i64,
    pub is_complete: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Single-player quiz session stepping through an ordered list of questions.
///
/// Pure state machine: persistence and presentation live in the services layer.
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    questions: Vec<Question>,
    current_index: usize,
    score: i64,
    phase: SessionPhase,
}

impl QuizSession {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            current_index: 0,
            score: 0,
            phase: SessionPhase::NotStarted,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn score(&self) -> i64 {
        self.score
    }

    #[must_use]
    pub fn selected_answer(&self) -> Option<usize> {
        self.phase.selected_answer()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// The question on screen, if any.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.phase.is_in_progress() {
            self.questions.get(self.current_index)
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Ended
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.questions.len();
        SessionProgress {
            position: (self.current_index + 1).min(total),
            total,
            score: self.score,
            is_complete: self.is_complete(),
        }
    }

    /// Begin the session, either fresh or from a restored position.
    ///
    /// A restored index equal to the bank length ends the session immediately.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ResumeOutOfRange` if the restored index lies past
    /// the end of the bank; the session stays in `NotStarted`.
    pub fn start(&mut self, resume: Option<ResumePoint>) -> Result<StartOutcome, SessionError> {
        if self.phase != SessionPhase::NotStarted {
            return Ok(StartOutcome::Ignored);
        }

        let len = self.questions.len();
        let (index, score, resumed) = match resume {
            Some(point) if point.current_index > len => {
                return Err(SessionError::ResumeOutOfRange {
                    index: point.current_index,
                    len,
                });
            }
            Some(point) => (point.current_index, point.score, true),
            None => (0, 0, false),
        };

        self.current_index = index;
        self.score = score;

        if index >= len {
            self.phase = SessionPhase::Ended;
            return Ok(StartOutcome::Ended(self.end_summary()));
        }

        self.phase = SessionPhase::AwaitingSelection;
        Ok(StartOutcome::Question { index, resumed })
    }

    /// Choose an option for the current question. Re-selecting overwrites the choice.
    ///
    /// Ignored outside of `AwaitingSelection` / `AwaitingSubmit`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OptionOutOfRange` if `index` is not a valid option.
    pub fn select_answer(&mut self, index: usize) -> Result<SelectOutcome, SessionError> {
        if !matches!(
            self.phase,
            SessionPhase::AwaitingSelection | SessionPhase::AwaitingSubmit { .. }
        ) {
            return Ok(SelectOutcome::Ignored);
        }

        let Some(question) = self.questions.get(self.current_index) else {
            return Ok(SelectOutcome::Ignored);
        };
        if index >= question.option_count() {
            return Err(SessionError::OptionOutOfRange {
                index,
                len: question.option_count(),
            });
        }

        self.phase = SessionPhase::AwaitingSubmit { selected: index };
        Ok(SelectOutcome::Selected(index))
    }

    /// Score the current selection. Returns `None` when there is nothing to submit.
    pub fn submit_answer(&mut self) -> Option<AnswerOutcome> {
        let SessionPhase::AwaitingSubmit { selected } = self.phase else {
            return None;
        };
        let question = self.questions.get(self.current_index)?;

        let is_correct = question.is_correct(selected);
        let points = if is_correct {
            CORRECT_POINTS
        } else {
            INCORRECT_POINTS
        };
        self.score = self.score.saturating_add(points);

        let outcome = AnswerOutcome {
            question_index: self.current_index,
            selected,
            correct_index: question.correct_index(),
            is_correct,
            points,
            score: self.score,
            explanation: question.explanation().to_owned(),
        };

        self.phase = SessionPhase::Answered {
            selected,
            correct: is_correct,
        };
        Some(outcome)
    }

    /// Move past an answered question, ending the session after the last one.
    pub fn next_question(&mut self) -> NextOutcome {
        if !matches!(self.phase, SessionPhase::Answered { .. }) {
            return NextOutcome::Ignored;
        }

        self.current_index += 1;
        if self.current_index < self.questions.len() {
            self.phase = SessionPhase::AwaitingSelection;
            NextOutcome::Question {
                index: self.current_index,
            }
        } else {
            self.current_index = self.questions.len();
            self.phase = SessionPhase::Ended;
            NextOutcome::Ended(self.end_summary())
        }
    }

    /// Return to the start prompt with a zeroed position and score.
    pub fn reset(&mut self) {
        self.current_index = 0;
        self.score = 0;
        self.phase = SessionPhase::NotStarted;
    }

    fn end_summary(&self) -> SessionEnd {
        SessionEnd {
            score: self.score,
            total_questions: self.questions.len(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
