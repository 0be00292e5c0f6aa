//! Quiz selection: one random question the player has not seen yet.
//!
//! The storage layer materializes the candidate ids; this module only draws
//! from them, so an empty candidate set is a plain `None` rather than a
//! range error.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::id::{CategoryId, QuestionId};
use crate::question::Question;

/// Input of one quiz round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizRequest {
    /// Ids already asked in this session. Excluded regardless of category.
    pub previous_questions: Vec<QuestionId>,
    /// `None` means any category.
    pub category: Option<CategoryId>,
}

impl QuizRequest {
    pub fn new(previous_questions: Vec<QuestionId>, category: Option<CategoryId>) -> Self {
        Self {
            previous_questions,
            category,
        }
    }

    /// Whether `question` may be asked in this round.
    pub fn admits(&self, question: &Question) -> bool {
        if let Some(category) = self.category {
            if question.category_id != category {
                return false;
            }
        }
        !self.previous_questions.contains(&question.id)
    }
}

/// Draw one candidate uniformly at random.
pub fn pick_question<R: Rng + ?Sized>(candidates: &[QuestionId], rng: &mut R) -> Option<QuestionId> {
    candidates.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ids(raw: &[i32]) -> Vec<QuestionId> {
        raw.iter().copied().map(QuestionId::new).collect()
    }

    #[test]
    fn no_candidates_yields_none() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(pick_question(&[], &mut rng), None);
    }

    #[test]
    fn single_candidate_is_always_picked() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(pick_question(&ids(&[10]), &mut rng), Some(QuestionId::new(10)));
        }
    }

    #[test]
    fn seeded_draws_are_reproducible() {
        let candidates = ids(&[2, 4, 5, 6, 9, 10, 11]);
        let a: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..10).map(|_| pick_question(&candidates, &mut rng)).collect()
        };
        let b: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..10).map(|_| pick_question(&candidates, &mut rng)).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn every_candidate_is_reachable() {
        let candidates = ids(&[1, 2, 3]);
        let mut rng = StdRng::seed_from_u64(1);
        let mut hits = [false; 3];
        for _ in 0..200 {
            let picked = pick_question(&candidates, &mut rng).unwrap();
            hits[(picked.get() - 1) as usize] = true;
        }
        assert!(hits.iter().all(|h| *h));
    }

    #[test]
    fn admits_respects_category_and_global_exclusion() {
        let question = Question {
            id: QuestionId::new(11),
            question: "Which country won the first ever soccer World Cup in 1930?".to_string(),
            answer: "Uruguay".to_string(),
            category_id: CategoryId::new(6),
            difficulty: 4,
        };
        assert!(QuizRequest::new(vec![], None).admits(&question));
        assert!(QuizRequest::new(vec![], Some(CategoryId::new(6))).admits(&question));
        assert!(!QuizRequest::new(vec![], Some(CategoryId::new(1))).admits(&question));
        assert!(!QuizRequest::new(ids(&[11]), None).admits(&question));
    }

    proptest! {
        #[test]
        fn picked_id_is_a_candidate(raw in proptest::collection::vec(any::<i32>(), 0..50), seed in any::<u64>()) {
            let candidates = ids(&raw);
            let mut rng = StdRng::seed_from_u64(seed);
            match pick_question(&candidates, &mut rng) {
                Some(id) => prop_assert!(candidates.contains(&id)),
                None => prop_assert!(candidates.is_empty()),
            }
        }
    }
}
