//! Shared error types for the services crate.

use reqwest::StatusCode;
use thiserror::Error;

use quiz_core::model::QuizDraftError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors from the REST API boundary.
///
/// The variants mirror the client's failure taxonomy: transport failures and
/// 5xx are generic "try again later" conditions, 401 clears the session, and
/// other 4xx carry the server-provided message back to the form that caused
/// them.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("authentication required")]
    Unauthorized,

    #[error("request rejected: {message}")]
    Validation { status: StatusCode, message: String },

    #[error("server failure: {status}")]
    Server { status: StatusCode },

    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// True for failures worth retrying as-is (nothing wrong with the
    /// request itself).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Server { .. })
    }
}

/// Errors emitted by `SessionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the attempt flow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("quiz has no questions")]
    Empty,
    #[error("attempt is not active")]
    NotActive,
    #[error("submission already in flight")]
    SubmissionInFlight,
    #[error("attempt already submitted")]
    AlreadySubmitted,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error(transparent)]
    Draft(#[from] QuizDraftError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("a source file is required to create a quiz")]
    MissingSourceFile,
    #[error("sign in to manage quizzes")]
    NotSignedIn,
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}
