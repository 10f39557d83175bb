use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use quiz_core::model::{
    AnswerOutcome, NextOutcome, Question, QuizSession, SelectOutcome, SessionEnd, SessionPhase,
    SessionProgress, SessionSnapshot, StartOutcome,
};
use quiz_core::{Clock, QuestionSource, QuestionSourceError, QuizSettings};
use storage::KeyValueStore;
use tracing::{debug, info, warn};

use super::persistence::{LoadedSnapshot, SessionPersistence};
use super::plan::{draw_seed, order_questions};
use super::view::{FinalScore, NullView, QuizView};
use crate::error::ControllerError;
use crate::report::{ErrorLog, ErrorRecord};

/// A resumable session found in the store, shown on the start prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedProgress {
    pub current_index: usize,
    pub score: i64,
    pub total_questions: usize,
    pub saved_at: Option<DateTime<Utc>>,
}

/// Drives one quiz session and keeps its snapshot in a key-value store.
///
/// Questions are read from the source once, at construction. Storage failures
/// never abort an operation: they are logged, kept in the error log and shown
/// through `QuizView::show_error_banner`.
pub struct SessionController {
    clock: Clock,
    settings: QuizSettings,
    source_questions: Vec<Question>,
    session: QuizSession,
    shuffle_seed: Option<u64>,
    persistence: SessionPersistence,
    errors: ErrorLog,
    view: Box<dyn QuizView>,
}

impl SessionController {
    /// Build a controller over `source`, persisting into `store`.
    ///
    /// A failing source is recorded in the error log and leaves the bank empty,
    /// so `start` ends the session immediately.
    #[must_use]
    pub fn new(
        source: &dyn QuestionSource,
        store: Arc<dyn KeyValueStore>,
        settings: QuizSettings,
        clock: Clock,
    ) -> Self {
        let persistence = SessionPersistence::new(store, clock, settings.snapshot_ttl());
        let mut controller = Self {
            clock,
            settings,
            source_questions: Vec::new(),
            session: QuizSession::default(),
            shuffle_seed: None,
            persistence,
            errors: ErrorLog::new(),
            view: Box::new(NullView),
        };

        match source.questions() {
            Ok(questions) => {
                info!(count = questions.len(), "loaded questions");
                controller.session = QuizSession::new(questions.clone());
                controller.source_questions = questions;
            }
            Err(err) => controller.record_error("Failed to load questions", &err),
        }

        controller
    }

    /// Attach a view. Errors recorded so far are replayed to its banner.
    #[must_use]
    pub fn with_view(mut self, view: Box<dyn QuizView>) -> Self {
        self.view = view;
        for record in self.errors.records() {
            self.view.show_error_banner(record);
        }
        self
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    #[must_use]
    pub fn score(&self) -> i64 {
        self.session.score()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.session.current_index()
    }

    #[must_use]
    pub fn selected_answer(&self) -> Option<usize> {
        self.session.selected_answer()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.session.current_question()
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.source_questions.len()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        self.session.progress()
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn errors(&self) -> &[ErrorRecord] {
        self.errors.records()
    }

    /// Plain-text report of every recorded error.
    #[must_use]
    pub fn error_report(&self, agent: &str) -> String {
        self.errors.render_report(self.clock.now(), agent)
    }

    /// Look for a resumable session without starting one and show the start prompt.
    ///
    /// Expired or malformed snapshots are removed. A snapshot pointing past the
    /// end of the bank is not offered.
    pub async fn saved_progress(&mut self) -> Option<SavedProgress> {
        let total_questions = self.source_questions.len();
        let saved = self
            .load_snapshot()
            .await
            .filter(|snapshot| snapshot.current_question_index <= total_questions)
            .map(|snapshot| SavedProgress {
                current_index: snapshot.current_question_index,
                score: snapshot.score,
                total_questions,
                saved_at: DateTime::<Utc>::from_timestamp_millis(snapshot.timestamp),
            });
        self.view.show_start_prompt(saved.as_ref());
        saved
    }

    /// Best score ever recorded, or 0 if it cannot be read.
    pub async fn high_score(&mut self) -> i64 {
        match self.persistence.high_score().await {
            Ok(score) => score,
            Err(err) => {
                self.record_error("Failed to load high score", &err);
                0
            }
        }
    }

    /// Begin a session, resuming from a valid snapshot when `resume` is set.
    ///
    /// Ignored unless the session is in `NotStarted`.
    pub async fn start(&mut self, resume: bool) -> StartOutcome {
        if self.session.phase() != SessionPhase::NotStarted {
            debug!(phase = self.session.phase().label(), "start ignored");
            return StartOutcome::Ignored;
        }

        if self.source_questions.is_empty() {
            self.record_error("Cannot start quiz", &QuestionSourceError::Empty);
        }

        let restored = if resume {
            self.load_snapshot().await
        } else {
            None
        };

        let outcome = match restored {
            Some(snapshot) => {
                self.prepare_session(snapshot.shuffle_seed);
                match self.session.start(Some(snapshot.resume_point())) {
                    Ok(outcome) => {
                        info!(
                            index = snapshot.current_question_index,
                            score = snapshot.score,
                            "resuming quiz from saved state"
                        );
                        outcome
                    }
                    Err(err) => {
                        self.record_error("Saved state does not match the question bank", &err);
                        self.clear_snapshot().await;
                        self.start_fresh()
                    }
                }
            }
            None => self.start_fresh(),
        };

        match outcome {
            StartOutcome::Question { .. } => {
                self.view.update_score(self.session.score());
                self.render_current();
            }
            StartOutcome::Ended(end) => self.finish(end).await,
            StartOutcome::Ignored => {}
        }

        outcome
    }

    /// Select an option for the current question.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::Session` if `index` is not a valid option.
    pub fn select_answer(&mut self, index: usize) -> Result<SelectOutcome, ControllerError> {
        let outcome = self.session.select_answer(index)?;
        match outcome {
            SelectOutcome::Selected(selected) => {
                debug!(selected, "answer selected");
                self.view.highlight_selection(selected);
            }
            SelectOutcome::Ignored => debug!(index, "selection ignored"),
        }
        Ok(outcome)
    }

    /// Score the current selection and save progress.
    ///
    /// Returns `None` when nothing is selected or the question was already answered.
    pub async fn submit_answer(&mut self) -> Option<AnswerOutcome> {
        let Some(outcome) = self.session.submit_answer() else {
            debug!(phase = self.session.phase().label(), "submit ignored");
            return None;
        };

        info!(
            index = outcome.question_index,
            correct = outcome.is_correct,
            score = outcome.score,
            "answer submitted"
        );

        self.save_snapshot().await;
        self.view.show_feedback(&outcome);
        self.view.update_score(outcome.score);
        Some(outcome)
    }

    /// Advance past an answered question, ending the session after the last one.
    pub async fn next_question(&mut self) -> NextOutcome {
        let outcome = self.session.next_question();
        match outcome {
            NextOutcome::Question { index } => {
                debug!(index, "moving to next question");
                self.render_current();
            }
            NextOutcome::Ended(end) => self.finish(end).await,
            NextOutcome::Ignored => {
                debug!(phase = self.session.phase().label(), "next ignored");
            }
        }
        outcome
    }

    /// Clear all progress, delete the snapshot and return to the start prompt.
    pub async fn reset(&mut self) {
        self.session.reset();
        self.shuffle_seed = None;
        self.clear_snapshot().await;
        self.view.update_score(0);
        self.view.show_start_prompt(None);
        info!("quiz reset");
    }

    fn start_fresh(&mut self) -> StartOutcome {
        self.prepare_session(draw_seed(self.settings.shuffle_questions()));
        info!("starting new quiz");
        // A fresh start cannot fail: there is no resume point to validate.
        self.session.start(None).unwrap_or(StartOutcome::Ignored)
    }

    /// Replace the session with a not-started one over the ordered bank.
    fn prepare_session(&mut self, seed: Option<u64>) {
        self.shuffle_seed = seed;
        self.session = QuizSession::new(order_questions(&self.source_questions, seed));
    }

    async fn finish(&mut self, end: SessionEnd) {
        info!(score = end.score, total = end.total_questions, "game ended");
        self.save_snapshot().await;

        let is_new_high_score = match self.persistence.record_high_score(end.score).await {
            Ok(updated) => updated,
            Err(err) => {
                self.record_error("Failed to save high score", &err);
                false
            }
        };
        if is_new_high_score {
            info!(score = end.score, "new high score saved");
        }
        let high_score = self.high_score().await;

        self.view.show_final_score(&FinalScore {
            score: end.score,
            total_questions: end.total_questions,
            high_score,
            is_new_high_score,
        });
    }

    fn render_current(&mut self) {
        if let Some(question) = self.session.current_question() {
            let progress = self.session.progress();
            self.view.render_question(&progress, question);
        }
    }

    async fn load_snapshot(&mut self) -> Option<SessionSnapshot> {
        match self.persistence.load().await {
            Ok(LoadedSnapshot::Valid(snapshot)) => Some(snapshot),
            Ok(LoadedSnapshot::Absent) => None,
            Ok(LoadedSnapshot::Expired(snapshot)) => {
                info!(
                    saved_at = snapshot.timestamp,
                    "saved state is too old, starting fresh"
                );
                None
            }
            Ok(LoadedSnapshot::Malformed(err)) => {
                self.record_error("Failed to load saved state", &err);
                None
            }
            Err(err) => {
                self.record_error("Failed to load saved state", &err);
                None
            }
        }
    }

    async fn save_snapshot(&mut self) {
        let result = self
            .persistence
            .save(
                self.session.current_index(),
                self.session.score(),
                self.shuffle_seed,
            )
            .await;
        match result {
            Ok(_) => debug!("game state saved"),
            Err(err) => self.record_error("Failed to save game state", &err),
        }
    }

    async fn clear_snapshot(&mut self) {
        if let Err(err) = self.persistence.clear().await {
            self.record_error("Failed to clear saved state", &err);
        }
    }

    fn record_error(&mut self, message: &str, err: &dyn fmt::Display) {
        warn!(error = %err, "{message}");
        let record = ErrorRecord::new(message, err.to_string(), self.clock.now());
        self.view.show_error_banner(&record);
        self.errors.push(record);
    }
}

impl fmt::Debug for SessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionController")
            .field("questions_len", &self.source_questions.len())
            .field("phase", &self.session.phase())
            .field("current_index", &self.session.current_index())
            .field("score", &self.session.score())
            .field("shuffle_seed", &self.shuffle_seed)
            .field("errors_len", &self.errors.records().len())
            .finish_non_exhaustive()
    }
}
