use thiserror::Error;

use crate::model::{Question, QuestionDraft, QuestionError};

const BUILTIN_QUESTIONS: &str = include_str!("../data/questions.json");

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionSourceError {
    #[error("question bank is empty")]
    Empty,

    #[error("question bank is unreadable: {0}")]
    Unreadable(String),

    #[error("question {index} is invalid: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

/// Supplies the ordered, immutable list of questions for a session.
pub trait QuestionSource: Send + Sync {
    /// Return every question in presentation order.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError` if the bank is missing, unreadable or empty.
    fn questions(&self) -> Result<Vec<Question>, QuestionSourceError>;
}

/// In-memory question bank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// The bundled bank of algebra word problems.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError` if the bundled data fails validation.
    pub fn builtin() -> Result<Self, QuestionSourceError> {
        Self::from_json_str(BUILTIN_QUESTIONS)
    }

    /// Parse a JSON array of question drafts, validating each entry.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError::Unreadable` for malformed JSON and
    /// `QuestionSourceError::InvalidQuestion` for the first entry that fails validation.
    pub fn from_json_str(raw: &str) -> Result<Self, QuestionSourceError> {
        let drafts: Vec<QuestionDraft> = serde_json::from_str(raw)
            .map_err(|err| QuestionSourceError::Unreadable(err.to_string()))?;

        let questions = drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                draft
                    .validate()
                    .map_err(|source| QuestionSourceError::InvalidQuestion { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { questions })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Source backed by the bundled question data, parsed on each read.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinBank;

impl QuestionSource for BuiltinBank {
    fn questions(&self) -> Result<Vec<Question>, QuestionSourceError> {
        QuestionBank::builtin()?.questions()
    }
}

impl QuestionSource for QuestionBank {
    fn questions(&self) -> Result<Vec<Question>, QuestionSourceError> {
        if self.questions.is_empty() {
            return Err(QuestionSourceError::Empty);
        }
        Ok(self.questions.clone())
    }
}
