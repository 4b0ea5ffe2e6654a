use std::path::Path;

use quiz_core::model::{Quiz, QuizDraft};
use services::QuizSourceFile;

use crate::views::ViewError;

/// Form state for creating or editing a quiz.
///
/// Numeric fields stay as strings until submission so the user can type
/// freely; parsing failures become validation errors with the field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizFormVm {
    pub title: String,
    pub description: String,
    pub total_marks: String,
    pub time_limit_minutes: String,
    pub source_path: String,
}

impl QuizFormVm {
    /// Pre-fill from a fetched quiz for editing.
    #[must_use]
    pub fn from_quiz(quiz: &Quiz) -> Self {
        Self {
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            total_marks: quiz.total_marks.to_string(),
            time_limit_minutes: quiz
                .time_limit_minutes
                .map(|minutes| minutes.to_string())
                .unwrap_or_default(),
            source_path: String::new(),
        }
    }

    /// Parse the form into an unvalidated draft.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Validation` naming the field that failed to
    /// parse; draft-level validation happens in the service.
    pub fn to_draft(&self) -> Result<QuizDraft, ViewError> {
        let total_marks = self
            .total_marks
            .trim()
            .parse::<u32>()
            .map_err(|_| ViewError::Validation("Total marks must be a whole number.".into()))?;

        let time_limit = self.time_limit_minutes.trim();
        let time_limit_minutes = if time_limit.is_empty() {
            None
        } else {
            Some(time_limit.parse::<u32>().map_err(|_| {
                ViewError::Validation("Time limit must be a whole number of minutes.".into())
            })?)
        };

        Ok(QuizDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            total_marks,
            time_limit_minutes,
        })
    }

    /// Read the source document from disk.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Validation` when the path cannot be read.
    pub async fn load_source(&self) -> Result<Option<QuizSourceFile>, ViewError> {
        let path = self.source_path.trim();
        if path.is_empty() {
            return Ok(None);
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| ViewError::Validation(format!("Could not read {path}: {err}")))?;
        let file_name = Path::new(path)
            .file_name()
            .map_or_else(|| "upload".to_owned(), |name| name.to_string_lossy().into_owned());

        Ok(Some(QuizSourceFile { file_name, bytes }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> QuizFormVm {
        QuizFormVm {
            title: "T".into(),
            description: "D".into(),
            total_marks: "10".into(),
            time_limit_minutes: "5".into(),
            source_path: String::new(),
        }
    }

    #[test]
    fn parses_numeric_fields() {
        let draft = filled().to_draft().unwrap();
        assert_eq!(draft.total_marks, 10);
        assert_eq!(draft.time_limit_minutes, Some(5));
    }

    #[test]
    fn empty_time_limit_means_untimed() {
        let mut form = filled();
        form.time_limit_minutes = "  ".into();
        assert_eq!(form.to_draft().unwrap().time_limit_minutes, None);
    }

    #[test]
    fn garbage_marks_name_the_field() {
        let mut form = filled();
        form.total_marks = "ten".into();
        let err = form.to_draft().unwrap_err();
        assert!(matches!(err, ViewError::Validation(message) if message.contains("Total marks")));
    }

    #[tokio::test]
    async fn empty_source_path_loads_nothing() {
        assert_eq!(filled().load_source().await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_source_file_is_a_validation_error() {
        let mut form = filled();
        form.source_path = "/definitely/not/here.pdf".into();
        assert!(matches!(
            form.load_source().await.unwrap_err(),
            ViewError::Validation(_)
        ));
    }
}
