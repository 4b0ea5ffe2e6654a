use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use quiz_core::model::{AnswerMap, BearerToken, QuizId, UserSummary};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of the client's credentials.
///
/// The token is what authenticated requests need; the cached user lets the
/// UI greet the user before the first "who am I" round trip completes. The
/// cache is advisory only; the server's answer always wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub token: BearerToken,
    pub user: Option<UserSummary>,
}

impl StoredCredentials {
    #[must_use]
    pub fn new(token: BearerToken, user: Option<UserSummary>) -> Self {
        Self { token, user }
    }
}

/// Repository contract for the client's bearer token and cached user.
///
/// There is at most one credential record; saving replaces whatever was
/// there (last-write-wins, like every other client-local key).
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Persist the credentials, replacing any existing record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save_credentials(&self, credentials: &StoredCredentials) -> Result<(), StorageError>;

    /// Load the persisted credentials, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures; a missing record is
    /// `Ok(None)`, not an error.
    async fn load_credentials(&self) -> Result<Option<StoredCredentials>, StorageError>;

    /// Remove the persisted credentials. Removing an absent record is fine.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the removal cannot be performed.
    async fn clear_credentials(&self) -> Result<(), StorageError>;
}

/// Repository contract for in-progress attempt answer maps, keyed by quiz id.
#[async_trait]
pub trait AttemptDraftRepository: Send + Sync {
    /// Persist the answer map for a quiz, replacing any existing draft.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the draft cannot be stored.
    async fn save_draft(&self, quiz_id: &QuizId, answers: &AnswerMap) -> Result<(), StorageError>;

    /// Load the draft for a quiz, if one was persisted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures; a missing draft is
    /// `Ok(None)`.
    async fn load_draft(&self, quiz_id: &QuizId) -> Result<Option<AnswerMap>, StorageError>;

    /// Remove the draft for a quiz (after successful submission).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the removal cannot be performed.
    async fn clear_draft(&self, quiz_id: &QuizId) -> Result<(), StorageError>;
}

/// Bundle of repositories handed to the services layer.
#[derive(Clone)]
pub struct Storage {
    pub credentials: Arc<dyn CredentialRepository>,
    pub attempt_drafts: Arc<dyn AttemptDraftRepository>,
}

impl Storage {
    /// Build a `Storage` backed by in-memory repositories.
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        Self {
            credentials: Arc::new(repo.clone()),
            attempt_drafts: Arc::new(repo),
        }
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    credentials: Arc<Mutex<Option<StoredCredentials>>>,
    drafts: Arc<Mutex<HashMap<QuizId, AnswerMap>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialRepository for InMemoryRepository {
    async fn save_credentials(&self, credentials: &StoredCredentials) -> Result<(), StorageError> {
        let mut guard = self
            .credentials
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(credentials.clone());
        Ok(())
    }

    async fn load_credentials(&self) -> Result<Option<StoredCredentials>, StorageError> {
        let guard = self
            .credentials
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn clear_credentials(&self) -> Result<(), StorageError> {
        let mut guard = self
            .credentials
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

#[async_trait]
impl AttemptDraftRepository for InMemoryRepository {
    async fn save_draft(&self, quiz_id: &QuizId, answers: &AnswerMap) -> Result<(), StorageError> {
        let mut guard = self
            .drafts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(quiz_id.clone(), answers.clone());
        Ok(())
    }

    async fn load_draft(&self, quiz_id: &QuizId) -> Result<Option<AnswerMap>, StorageError> {
        let guard = self
            .drafts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(quiz_id).cloned())
    }

    async fn clear_draft(&self, quiz_id: &QuizId) -> Result<(), StorageError> {
        let mut guard = self
            .drafts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(quiz_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionId;

    #[tokio::test]
    async fn credentials_roundtrip() {
        let repo = InMemoryRepository::new();
        assert!(repo.load_credentials().await.unwrap().is_none());

        let creds = StoredCredentials::new(BearerToken::new("t"), None);
        repo.save_credentials(&creds).await.unwrap();
        assert_eq!(repo.load_credentials().await.unwrap(), Some(creds));

        repo.clear_credentials().await.unwrap();
        assert!(repo.load_credentials().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn drafts_are_keyed_by_quiz() {
        let repo = InMemoryRepository::new();
        let quiz_a = QuizId::new("a");
        let quiz_b = QuizId::new("b");

        let mut answers = AnswerMap::new();
        answers.select(QuestionId::new("q1"), "A");
        repo.save_draft(&quiz_a, &answers).await.unwrap();

        assert_eq!(repo.load_draft(&quiz_a).await.unwrap(), Some(answers));
        assert!(repo.load_draft(&quiz_b).await.unwrap().is_none());

        repo.clear_draft(&quiz_a).await.unwrap();
        assert!(repo.load_draft(&quiz_a).await.unwrap().is_none());
    }
}
