use std::sync::Arc;

use tracing::debug;

use quiz_core::model::{BearerToken, QuestionId, Quiz, QuizDraft, QuizId, QuizSummary};

use crate::api::{QuizApi, QuizSourceFile, QuizUpdate};
use crate::error::QuizServiceError;

/// Which slice of the quiz catalogue to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizScope {
    /// Public quizzes; no credential required.
    Public,
    /// Everything visible to the signed-in caller.
    All,
    /// Quizzes the caller owns.
    Mine,
}

/// Quiz management: list, create, edit, delete.
///
/// There is no optimistic local update anywhere here. Every mutation
/// re-fetches from the server and returns the refreshed data, so callers
/// always render server truth (simplicity over latency).
pub struct QuizService {
    api: Arc<dyn QuizApi>,
}

impl QuizService {
    #[must_use]
    pub fn new(api: Arc<dyn QuizApi>) -> Self {
        Self { api }
    }

    /// List quizzes in the given scope.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::NotSignedIn` for authenticated scopes
    /// without a token, and propagates API failures.
    pub async fn list(
        &self,
        scope: QuizScope,
        token: Option<&BearerToken>,
    ) -> Result<Vec<QuizSummary>, QuizServiceError> {
        match scope {
            QuizScope::Public => Ok(self.api.list_public().await?),
            QuizScope::All => {
                let token = token.ok_or(QuizServiceError::NotSignedIn)?;
                Ok(self.api.list_all(token).await?)
            }
            QuizScope::Mine => {
                let token = token.ok_or(QuizServiceError::NotSignedIn)?;
                Ok(self.api.list_mine(token).await?)
            }
        }
    }

    /// Fetch one quiz with its questions.
    ///
    /// # Errors
    ///
    /// Propagates API failures.
    pub async fn get(&self, id: &QuizId) -> Result<Quiz, QuizServiceError> {
        Ok(self.api.get_quiz(id).await?)
    }

    /// Validate and submit a new quiz, then return the caller's refreshed
    /// quiz list.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Draft` for invalid form input,
    /// `MissingSourceFile` when no document was attached, and propagates
    /// API failures (validation messages stay attached for the form).
    pub async fn create(
        &self,
        token: &BearerToken,
        draft: QuizDraft,
        source: Option<QuizSourceFile>,
    ) -> Result<Vec<QuizSummary>, QuizServiceError> {
        let form = draft.validate()?;
        let source = source.ok_or(QuizServiceError::MissingSourceFile)?;

        self.api.create_quiz(token, &form, source).await?;
        debug!(title = form.title(), "quiz created");
        Ok(self.api.list_mine(token).await?)
    }

    /// Update quiz metadata or visibility, then return the refreshed list.
    ///
    /// # Errors
    ///
    /// Propagates API failures.
    pub async fn update(
        &self,
        token: &BearerToken,
        id: &QuizId,
        update: &QuizUpdate,
    ) -> Result<Vec<QuizSummary>, QuizServiceError> {
        self.api.update_quiz(token, id, update).await?;
        Ok(self.api.list_mine(token).await?)
    }

    /// Delete a quiz, then return the refreshed list.
    ///
    /// The confirmation prompt is the view's responsibility; by the time
    /// this runs the user has already agreed.
    ///
    /// # Errors
    ///
    /// Propagates API failures.
    pub async fn delete(
        &self,
        token: &BearerToken,
        id: &QuizId,
    ) -> Result<Vec<QuizSummary>, QuizServiceError> {
        self.api.delete_quiz(token, id).await?;
        Ok(self.api.list_mine(token).await?)
    }

    /// Delete a single question, then return the re-fetched quiz.
    ///
    /// # Errors
    ///
    /// Propagates API failures.
    pub async fn delete_question(
        &self,
        token: &BearerToken,
        quiz_id: &QuizId,
        question_id: &QuestionId,
    ) -> Result<Quiz, QuizServiceError> {
        self.api.delete_question(token, question_id).await?;
        Ok(self.api.get_quiz(quiz_id).await?)
    }
}
