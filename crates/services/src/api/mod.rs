//! Typed surface of the quiz platform's REST API.
//!
//! Every endpoint the client consumes is reachable through one of three
//! traits so tests can substitute in-memory fakes for the HTTP client. The
//! authoritative checks (grading, token validation) all live server-side;
//! this module only shapes requests and classifies failures.

mod client;
mod wire;

use async_trait::async_trait;
use serde::Serialize;
use url::Url;

use quiz_core::model::{
    AnswerMap, AttemptOutcome, BearerToken, Question, QuestionId, Quiz, QuizForm, QuizId,
    QuizSummary, UserSummary,
};

use crate::error::ApiError;

pub use client::ApiClient;

/// Where the API server lives. The default matches a local development
/// server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:4532/api";

#[derive(Clone, Debug)]
pub struct ApiConfig {
    base_url: Url,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    /// Parse and validate a base URL.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` when the string is not an absolute URL.
    pub fn parse(base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
        })
    }

    /// The default local development configuration.
    ///
    /// # Panics
    ///
    /// Never panics; the default URL is a valid constant.
    #[must_use]
    pub fn local() -> Self {
        Self::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

/// A successful login or signup: the credential plus whatever user object
/// the server chose to include inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthGrant {
    pub token: BearerToken,
    pub user: Option<UserSummary>,
}

/// The source document uploaded at quiz creation, from which the server
/// generates questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSourceFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Metadata update for an existing quiz, including the visibility toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizUpdate {
    pub title: String,
    pub description: String,
    pub total_marks: u32,
    #[serde(rename = "timeLimit", skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<u32>,
    pub is_public: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<Question>,
}

impl QuizUpdate {
    /// An update that keeps a fetched quiz as-is; callers then edit fields.
    #[must_use]
    pub fn from_quiz(quiz: &Quiz) -> Self {
        Self {
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            total_marks: quiz.total_marks,
            time_limit_minutes: quiz.time_limit_minutes,
            is_public: quiz.is_public,
            questions: quiz.questions.clone(),
        }
    }
}

/// Authentication endpoints.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// POST /auth/login.
    ///
    /// # Errors
    ///
    /// `ApiError::Validation`/`Unauthorized` for rejected credentials,
    /// `Transport`/`Server` for everything the caller may retry.
    async fn login(&self, email: &str, password: &str) -> Result<AuthGrant, ApiError>;

    /// POST /auth/signup.
    ///
    /// # Errors
    ///
    /// Same classification as `login`.
    async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthGrant, ApiError>;

    /// GET /auth/user: "who am I" for a stored token.
    ///
    /// # Errors
    ///
    /// `ApiError::Unauthorized` when the token is invalid or expired.
    async fn current_user(&self, token: &BearerToken) -> Result<UserSummary, ApiError>;
}

/// Quiz listing and management endpoints.
#[async_trait]
pub trait QuizApi: Send + Sync {
    /// GET /quiz/public (no auth).
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or server failures.
    async fn list_public(&self) -> Result<Vec<QuizSummary>, ApiError>;

    /// GET /quiz/all.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, auth, or server failures.
    async fn list_all(&self, token: &BearerToken) -> Result<Vec<QuizSummary>, ApiError>;

    /// GET /quiz/user: quizzes owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, auth, or server failures.
    async fn list_mine(&self, token: &BearerToken) -> Result<Vec<QuizSummary>, ApiError>;

    /// GET /quiz/{id}, including questions.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or server failures.
    async fn get_quiz(&self, id: &QuizId) -> Result<Quiz, ApiError>;

    /// POST /quiz/create: multipart form with the source file.
    ///
    /// # Errors
    ///
    /// `ApiError::Validation` carries the server's rejection message so the
    /// form can be corrected and resubmitted.
    async fn create_quiz(
        &self,
        token: &BearerToken,
        form: &QuizForm,
        source: QuizSourceFile,
    ) -> Result<(), ApiError>;

    /// PUT /quiz/{id}: metadata or visibility update.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, auth, validation, or server failures.
    async fn update_quiz(
        &self,
        token: &BearerToken,
        id: &QuizId,
        update: &QuizUpdate,
    ) -> Result<(), ApiError>;

    /// DELETE /quiz/{id}.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, auth, or server failures.
    async fn delete_quiz(&self, token: &BearerToken, id: &QuizId) -> Result<(), ApiError>;

    /// DELETE /question/{id}.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, auth, or server failures.
    async fn delete_question(&self, token: &BearerToken, id: &QuestionId) -> Result<(), ApiError>;
}

/// Attempt submission endpoint.
#[async_trait]
pub trait AttemptApi: Send + Sync {
    /// POST /quiz/{id}/attempt: answers in, score and review out.
    ///
    /// The token is optional: whether anonymous attempts are allowed is the
    /// server's call; the client merely forwards a credential when it has
    /// one.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, auth, or server failures.
    async fn submit_attempt(
        &self,
        token: Option<&BearerToken>,
        quiz_id: &QuizId,
        answers: &AnswerMap,
    ) -> Result<AttemptOutcome, ApiError>;
}
