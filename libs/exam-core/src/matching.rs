//! Content-fingerprint matching for difficulty carry-over.

use std::collections::HashMap;

use crate::parser::normalize_question_text;
use crate::types::{Difficulty, Question};

/// Composite key identifying "the same question" across document
/// revisions: normalized body, image reference, and answer.
///
/// Difficulty, category, and note never participate, so re-ratings and
/// reclassifications do not break identity.
pub fn fingerprint(question: &Question) -> String {
    format!(
        "{}|{}|{}",
        normalize_question_text(&question.question),
        question.question_image.as_deref().unwrap_or(""),
        question.answer.map(|a| a.as_str()).unwrap_or(""),
    )
}

/// Fingerprint → difficulty lookup built from a prior document revision.
///
/// Matching is exact-string equality over the fingerprint; there is no
/// fuzzy fallback.
#[derive(Debug, Clone, Default)]
pub struct DifficultyIndex {
    ratings: HashMap<String, Difficulty>,
}

impl DifficultyIndex {
    /// Index the ratings of a previously produced question list.
    pub fn from_questions(questions: &[Question]) -> Self {
        let ratings = questions
            .iter()
            .map(|question| (fingerprint(question), question.difficulty))
            .collect();
        Self { ratings }
    }

    /// Rating for a matching prior question, `Unknown` when none exists.
    pub fn lookup(&self, question: &Question) -> Difficulty {
        self.ratings
            .get(&fingerprint(question))
            .copied()
            .unwrap_or_default()
    }

    /// Copy ratings onto freshly parsed questions.
    pub fn apply(&self, questions: &mut [Question]) {
        for question in questions {
            question.difficulty = self.lookup(question);
        }
    }
}
