use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::QuestionId;

/// Answers selected so far in an attempt, keyed by question id.
///
/// Selecting an option for a question overwrites any prior answer for that
/// question id (last-write-wins; no multi-select). The map is the unit of
/// persistence for in-progress attempts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap(BTreeMap<QuestionId, String>);

impl AnswerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a selection, returning the previous answer for this question
    /// if there was one.
    pub fn select(&mut self, question_id: QuestionId, option: impl Into<String>) -> Option<String> {
        self.0.insert(question_id, option.into())
    }

    #[must_use]
    pub fn selected(&self, question_id: &QuestionId) -> Option<&str> {
        self.0.get(question_id).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drop answers for questions that are no longer part of the quiz.
    ///
    /// A restored draft can reference question ids the server has since
    /// deleted; those answers must not be submitted.
    pub fn retain_questions(&mut self, valid: &[QuestionId]) {
        self.0.retain(|id, _| valid.contains(id));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &str)> {
        self.0.iter().map(|(id, option)| (id, option.as_str()))
    }
}

/// Score and per-question review data returned by the grading endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptOutcome {
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub review: Vec<ReviewEntry>,
}

/// One graded question in the post-submission review.
///
/// The server decides how much to reveal; every field beyond the question id
/// is optional on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
    #[serde(rename = "_id", alias = "questionId")]
    pub question_id: QuestionId,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub selected: Option<String>,
    #[serde(default)]
    pub correct: Option<String>,
    #[serde(default)]
    pub is_correct: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_overwrites_prior_answer() {
        let mut answers = AnswerMap::new();
        let q = QuestionId::new("q1");
        assert_eq!(answers.select(q.clone(), "A"), None);
        assert_eq!(answers.select(q.clone(), "B"), Some("A".to_owned()));
        assert_eq!(answers.selected(&q), Some("B"));
        assert_eq!(answers.len(), 1);
    }

    #[test]
    fn retain_drops_stale_question_ids() {
        let mut answers = AnswerMap::new();
        answers.select(QuestionId::new("q1"), "A");
        answers.select(QuestionId::new("q2"), "B");
        answers.retain_questions(&[QuestionId::new("q2")]);
        assert!(answers.selected(&QuestionId::new("q1")).is_none());
        assert_eq!(answers.selected(&QuestionId::new("q2")), Some("B"));
    }

    #[test]
    fn overwrite_law_holds_for_any_prefix() {
        // The persisted map after any prefix of selections equals the last
        // selection per question id.
        let selections = [("q1", "A"), ("q2", "B"), ("q1", "C"), ("q2", "B"), ("q1", "A")];
        let mut answers = AnswerMap::new();
        let mut last: BTreeMap<&str, &str> = BTreeMap::new();

        for (question, option) in selections {
            answers.select(QuestionId::new(question), option);
            last.insert(question, option);

            for (question, option) in &last {
                assert_eq!(answers.selected(&QuestionId::new(*question)), Some(*option));
            }
            assert_eq!(answers.len(), last.len());
        }
    }
}
