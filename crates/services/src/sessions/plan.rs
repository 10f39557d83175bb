use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{SeedableRng, random};

use quiz_core::model::Question;

/// Draw a fresh seed when shuffling is enabled.
pub(crate) fn draw_seed(shuffle: bool) -> Option<u64> {
    shuffle.then(random::<u64>)
}

/// Presentation order for a session.
///
/// Without a seed the source order is kept. The same seed always yields the
/// same order, which lets a resumed session line up with its snapshot.
pub(crate) fn order_questions(questions: &[Question], seed: Option<u64>) -> Vec<Question> {
    let mut ordered = questions.to_vec();
    if let Some(seed) = seed {
        let mut rng = StdRng::seed_from_u64(seed);
        ordered.shuffle(&mut rng);
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionDraft;

    fn build_questions(count: usize) -> Vec<Question> {
        (0..count)
            .map(|i| {
                QuestionDraft::new(format!("Q{i}"), ["a", "b"], 0, "")
                    .validate()
                    .unwrap()
            })
            .collect()
    }

    fn texts(questions: &[Question]) -> Vec<String> {
        questions.iter().map(|q| q.text().to_owned()).collect()
    }

    #[test]
    fn no_seed_keeps_source_order() {
        let questions = build_questions(10);
        assert_eq!(order_questions(&questions, None), questions);
        assert_eq!(draw_seed(false), None);
    }

    #[test]
    fn same_seed_gives_same_order() {
        let questions = build_questions(20);
        let first = order_questions(&questions, Some(42));
        let second = order_questions(&questions, Some(42));

        assert_eq!(texts(&first), texts(&second));

        let mut sorted = texts(&first);
        sorted.sort();
        let mut expected = texts(&questions);
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn shuffle_draws_a_seed() {
        assert!(draw_seed(true).is_some());
    }
}
