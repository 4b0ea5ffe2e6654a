use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{QuestionId, QuizId};

/// A single multiple-choice question.
///
/// The correct answer is never present client-side; grading happens on the
/// server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "_id", alias = "id")]
    pub id: QuestionId,
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
}

/// Quiz metadata as returned by the list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    #[serde(rename = "_id", alias = "id")]
    pub id: QuizId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub total_marks: u32,
    #[serde(rename = "timeLimit", default)]
    pub time_limit_minutes: Option<u32>,
    #[serde(default)]
    pub is_public: bool,
}

/// A full quiz definition, including its questions.
///
/// Fetched read-only into view-local state; never cached across views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    #[serde(rename = "_id", alias = "id")]
    pub id: QuizId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub total_marks: u32,
    #[serde(rename = "timeLimit", default)]
    pub time_limit_minutes: Option<u32>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Quiz {
    /// Metadata-only view of this quiz.
    #[must_use]
    pub fn summary(&self) -> QuizSummary {
        QuizSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            total_marks: self.total_marks,
            time_limit_minutes: self.time_limit_minutes,
            is_public: self.is_public,
        }
    }

    /// Ids of this quiz's questions, in definition order.
    #[must_use]
    pub fn question_ids(&self) -> Vec<QuestionId> {
        self.questions.iter().map(|q| q.id.clone()).collect()
    }
}

// ─── Quiz Form Validation ──────────────────────────────────────────────────────

const MAX_TITLE_LEN: usize = 200;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizDraftError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("title is too long: {len} characters")]
    TitleTooLong { len: usize },

    #[error("total marks must be greater than zero")]
    ZeroMarks,

    #[error("time limit, when set, must be greater than zero")]
    ZeroTimeLimit,
}

/// Unvalidated quiz form input, straight from the create/edit view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizDraft {
    pub title: String,
    pub description: String,
    pub total_marks: u32,
    pub time_limit_minutes: Option<u32>,
}

impl QuizDraft {
    /// Validate the draft into a form ready for submission.
    ///
    /// # Errors
    ///
    /// Returns `QuizDraftError` when the title is missing or overlong, when
    /// marks are zero, or when a time limit is present but zero.
    pub fn validate(self) -> Result<QuizForm, QuizDraftError> {
        let title = self.title.trim().to_owned();
        if title.is_empty() {
            return Err(QuizDraftError::EmptyTitle);
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(QuizDraftError::TitleTooLong {
                len: title.chars().count(),
            });
        }
        if self.total_marks == 0 {
            return Err(QuizDraftError::ZeroMarks);
        }
        if self.time_limit_minutes == Some(0) {
            return Err(QuizDraftError::ZeroTimeLimit);
        }

        Ok(QuizForm {
            title,
            description: self.description.trim().to_owned(),
            total_marks: self.total_marks,
            time_limit_minutes: self.time_limit_minutes,
        })
    }
}

/// A validated quiz form. Construction goes through `QuizDraft::validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizForm {
    title: String,
    description: String,
    total_marks: u32,
    time_limit_minutes: Option<u32>,
}

impl QuizForm {
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn total_marks(&self) -> u32 {
        self.total_marks
    }

    #[must_use]
    pub fn time_limit_minutes(&self) -> Option<u32> {
        self.time_limit_minutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> QuizDraft {
        QuizDraft {
            title: "Rust basics".into(),
            description: "Ownership and borrowing".into(),
            total_marks: 10,
            time_limit_minutes: Some(5),
        }
    }

    #[test]
    fn valid_draft_passes() {
        let form = draft().validate().unwrap();
        assert_eq!(form.title(), "Rust basics");
        assert_eq!(form.total_marks(), 10);
        assert_eq!(form.time_limit_minutes(), Some(5));
    }

    #[test]
    fn whitespace_title_is_rejected() {
        let mut d = draft();
        d.title = "   ".into();
        assert_eq!(d.validate().unwrap_err(), QuizDraftError::EmptyTitle);
    }

    #[test]
    fn zero_marks_rejected() {
        let mut d = draft();
        d.total_marks = 0;
        assert_eq!(d.validate().unwrap_err(), QuizDraftError::ZeroMarks);
    }

    #[test]
    fn zero_time_limit_rejected_but_absent_is_fine() {
        let mut d = draft();
        d.time_limit_minutes = Some(0);
        assert_eq!(d.validate().unwrap_err(), QuizDraftError::ZeroTimeLimit);

        let mut d = draft();
        d.time_limit_minutes = None;
        assert!(d.validate().is_ok());
    }

    #[test]
    fn title_is_trimmed() {
        let mut d = draft();
        d.title = "  Rust basics  ".into();
        assert_eq!(d.validate().unwrap().title(), "Rust basics");
    }
}
