//! Request and response envelopes as the server actually frames them.

use serde::{Deserialize, Serialize};

use quiz_core::model::{AnswerMap, Quiz, QuizSummary, UserSummary};

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SignupRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthEnvelope {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: UserSummary,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuizListEnvelope {
    #[serde(default)]
    pub quizzes: Vec<QuizSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuizEnvelope {
    pub quiz: Quiz,
}

#[derive(Debug, Serialize)]
pub(crate) struct AttemptRequest<'a> {
    pub answers: &'a AnswerMap,
}

/// Error payloads carry at most a human-readable message.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
}
