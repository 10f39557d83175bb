use std::path::PathBuf;

use quiz_core::model::Question;
use quiz_core::{QuestionBank, QuestionSource, QuestionSourceError};

/// Question bank read from a JSON file on every `questions()` call.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl QuestionSource for JsonFileSource {
    fn questions(&self) -> Result<Vec<Question>, QuestionSourceError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|err| {
            QuestionSourceError::Unreadable(format!("{}: {err}", self.path.display()))
        })?;
        QuestionBank::from_json_str(&raw)?.questions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_questions_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"text": "1 + 1?", "options": ["1", "2"], "correct_index": 1, "explanation": "two"}}]"#
        )
        .unwrap();

        let questions = JsonFileSource::new(file.path()).questions().unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].explanation(), "two");
    }

    #[test]
    fn missing_file_is_unreadable() {
        let err = JsonFileSource::new("/definitely/not/here.json")
            .questions()
            .unwrap_err();
        assert!(matches!(err, QuestionSourceError::Unreadable(msg) if msg.contains("here.json")));
    }

    #[test]
    fn empty_array_is_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();

        let err = JsonFileSource::new(file.path()).questions().unwrap_err();
        assert_eq!(err, QuestionSourceError::Empty);
    }
}
