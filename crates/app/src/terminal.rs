use quiz_core::model::{AnswerOutcome, Question, SessionProgress};
use services::{ErrorRecord, FinalScore, QuizView, SavedProgress};

/// Line-oriented view printing to stdout.
#[derive(Debug, Default)]
pub struct TerminalView {
    options: Vec<String>,
}

impl TerminalView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl QuizView for TerminalView {
    fn show_start_prompt(&mut self, saved: Option<&SavedProgress>) {
        println!("{}", start_prompt(saved));
    }

    fn render_question(&mut self, progress: &SessionProgress, question: &Question) {
        self.options = question.options().to_vec();
        println!("{}", question_block(progress, question));
    }

    fn highlight_selection(&mut self, index: usize) {
        if let Some(option) = self.options.get(index) {
            println!("> {}. {option}", index + 1);
        }
    }

    fn show_feedback(&mut self, outcome: &AnswerOutcome) {
        let correct = self
            .options
            .get(outcome.correct_index)
            .map_or("", String::as_str);
        println!("{}", feedback(outcome, correct));
    }

    fn update_score(&mut self, score: i64) {
        println!("Score: {score}");
    }

    fn show_final_score(&mut self, result: &FinalScore) {
        println!("{}", final_score(result));
    }

    fn show_error_banner(&mut self, record: &ErrorRecord) {
        eprintln!("! {}. Type `report` for details.", record.message);
    }
}

fn start_prompt(saved: Option<&SavedProgress>) -> String {
    match saved {
        Some(saved) => format!(
            "Saved quiz found: question {} of {}, score {}.\n\
             Press enter to resume or type `fresh` to start over.",
            (saved.current_index + 1).min(saved.total_questions),
            saved.total_questions,
            saved.score
        ),
        None => "Press enter to start the quiz.".to_string(),
    }
}

fn question_block(progress: &SessionProgress, question: &Question) -> String {
    let mut out = format!(
        "\nQuestion {} of {}\n{}\n",
        progress.position,
        progress.total,
        question.text()
    );
    for (index, option) in question.options().iter().enumerate() {
        out.push_str(&format!("  {}. {option}\n", index + 1));
    }
    out.push_str("Pick an option, then `s` to submit.");
    out
}

fn feedback(outcome: &AnswerOutcome, correct_option: &str) -> String {
    let verdict = if outcome.is_correct {
        format!("Correct! (+{})", outcome.points)
    } else {
        format!(
            "Incorrect ({}). The answer was {}: {correct_option}",
            outcome.points,
            outcome.correct_index + 1
        )
    };
    if outcome.explanation.is_empty() {
        format!("{verdict}\nType `n` for the next question.")
    } else {
        format!(
            "{verdict}\n{}\nType `n` for the next question.",
            outcome.explanation
        )
    }
}

fn final_score(result: &FinalScore) -> String {
    let mut out = format!(
        "\nQuiz complete! Final score: {} ({} questions)\nHigh score: {}",
        result.score, result.total_questions, result.high_score
    );
    if result.is_new_high_score {
        out.push_str("\nNew high score!");
    }
    out.push_str("\nType `r` to play again or `q` to quit.");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionDraft;

    fn question() -> Question {
        QuestionDraft::new("2 + 2?", ["3", "4"], 1, "Two pairs.")
            .validate()
            .unwrap()
    }

    fn outcome(is_correct: bool) -> AnswerOutcome {
        AnswerOutcome {
            question_index: 0,
            selected: if is_correct { 1 } else { 0 },
            correct_index: 1,
            is_correct,
            points: if is_correct { 2 } else { -1 },
            score: if is_correct { 2 } else { -1 },
            explanation: "Two pairs.".into(),
        }
    }

    #[test]
    fn question_lists_numbered_options() {
        let progress = SessionProgress {
            position: 1,
            total: 3,
            score: 0,
            is_complete: false,
        };
        let block = question_block(&progress, &question());
        assert!(block.contains("Question 1 of 3"));
        assert!(block.contains("  1. 3\n  2. 4\n"));
    }

    #[test]
    fn feedback_names_the_correct_option_on_a_miss() {
        let text = feedback(&outcome(false), "4");
        assert!(text.starts_with("Incorrect (-1). The answer was 2: 4"));
        assert!(text.contains("Two pairs."));
        assert!(feedback(&outcome(true), "4").starts_with("Correct! (+2)"));
    }

    #[test]
    fn prompt_mentions_saved_progress() {
        let saved = SavedProgress {
            current_index: 2,
            score: 3,
            total_questions: 5,
            saved_at: None,
        };
        assert!(start_prompt(Some(&saved)).contains("question 3 of 5, score 3"));
        assert_eq!(start_prompt(None), "Press enter to start the quiz.");
    }

    #[test]
    fn final_score_flags_new_high_score() {
        let result = FinalScore {
            score: 6,
            total_questions: 3,
            high_score: 6,
            is_new_high_score: true,
        };
        let text = final_score(&result);
        assert!(text.contains("Final score: 6 (3 questions)"));
        assert!(text.contains("New high score!"));
    }
}
