use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// Minimum number of answer options a question must offer.
pub const MIN_OPTIONS: usize = 2;

/// Unvalidated question as it appears in a bank file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    #[serde(default)]
    pub explanation: String,
}

impl QuestionDraft {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        correct_index: usize,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct_index,
            explanation: explanation.into(),
        }
    }

    /// Validate the draft into an immutable `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt or an option is blank, fewer than
    /// two options are given, or the correct index is out of range.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let text = self.text.trim().to_owned();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }

        if self.options.len() < MIN_OPTIONS {
            return Err(QuestionError::TooFewOptions {
                len: self.options.len(),
            });
        }

        if let Some(index) = self.options.iter().position(|opt| opt.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { index });
        }

        if self.correct_index >= self.options.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: self.correct_index,
                len: self.options.len(),
            });
        }

        Ok(Question {
            text,
            options: self.options,
            correct_index: self.correct_index,
            explanation: self.explanation.trim().to_owned(),
        })
    }
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: String,
}

impl Question {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }
}

//
// ─── QUESTION VALIDATION ERRORS ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text is empty")]
    EmptyText,

    #[error("question needs at least 2 options, got {len}")]
    TooFewOptions { len: usize },

    #[error("option {index} is empty")]
    EmptyOption { index: usize },

    #[error("correct index {index} is out of range for {len} options")]
    CorrectIndexOutOfRange { index: usize, len: usize },
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_trims_text() {
        let question = QuestionDraft::new("  What is 2 + 2?  ", ["3", "4"], 1, " four ")
            .validate()
            .unwrap();

        assert_eq!(question.text(), "What is 2 + 2?");
        assert_eq!(question.explanation(), "four");
        assert!(question.is_correct(1));
        assert!(!question.is_correct(0));
        assert_eq!(question.option(1), Some("4"));
        assert_eq!(question.option(2), None);
    }

    #[test]
    fn validate_rejects_blank_text() {
        let err = QuestionDraft::new("   ", ["a", "b"], 0, "")
            .validate()
            .unwrap_err();
        assert_eq!(err, QuestionError::EmptyText);
    }

    #[test]
    fn validate_rejects_single_option() {
        let err = QuestionDraft::new("Q", ["only"], 0, "")
            .validate()
            .unwrap_err();
        assert_eq!(err, QuestionError::TooFewOptions { len: 1 });
    }

    #[test]
    fn validate_rejects_blank_option() {
        let err = QuestionDraft::new("Q", ["a", " ", "c"], 0, "")
            .validate()
            .unwrap_err();
        assert_eq!(err, QuestionError::EmptyOption { index: 1 });
    }

    #[test]
    fn validate_rejects_correct_index_past_options() {
        let err = QuestionDraft::new("Q", ["a", "b"], 2, "")
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            QuestionError::CorrectIndexOutOfRange { index: 2, len: 2 }
        );
    }

    #[test]
    fn draft_deserializes_without_explanation() {
        let draft: QuestionDraft =
            serde_json::from_str(r#"{"text":"Q","options":["a","b"],"correct_index":0}"#)
                .unwrap();
        assert_eq!(draft.explanation, "");
    }
}
