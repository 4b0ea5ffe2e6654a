use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use quiz_core::model::{
    AnswerMap, AttemptOutcome, BearerToken, QuestionId, Quiz, QuizForm, QuizId, QuizSummary,
    UserSummary,
};

use super::wire::{
    ApiMessage, AttemptRequest, AuthEnvelope, LoginRequest, QuizEnvelope, QuizListEnvelope,
    SignupRequest, UserEnvelope,
};
use super::{ApiConfig, AttemptApi, AuthApi, AuthGrant, QuizApi, QuizSourceFile, QuizUpdate};
use crate::error::ApiError;

/// `reqwest`-backed implementation of the API traits.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base: String,
}

impl ApiClient {
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: Client::new(),
            base: config.base_url().as_str().trim_end_matches('/').to_owned(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    fn with_token(builder: RequestBuilder, token: Option<&BearerToken>) -> RequestBuilder {
        match token {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        }
    }

    /// Classify a response per the client's failure taxonomy.
    async fn success(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if status.is_client_error() {
            let message = response
                .json::<ApiMessage>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| format!("request failed with status {status}"));
            return Err(ApiError::Validation { status, message });
        }
        Err(ApiError::Server { status })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn grant_from(response: Response) -> Result<AuthGrant, ApiError> {
        let envelope: AuthEnvelope = Self::decode(Self::success(response).await?).await?;
        Ok(AuthGrant {
            token: BearerToken::new(envelope.token),
            user: envelope.user,
        })
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<AuthGrant, ApiError> {
        let response = self
            .client
            .post(self.endpoint("auth/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        Self::grant_from(response).await
    }

    async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthGrant, ApiError> {
        let response = self
            .client
            .post(self.endpoint("auth/signup"))
            .json(&SignupRequest {
                username,
                email,
                password,
            })
            .send()
            .await?;
        Self::grant_from(response).await
    }

    async fn current_user(&self, token: &BearerToken) -> Result<UserSummary, ApiError> {
        let response = self
            .client
            .get(self.endpoint("auth/user"))
            .bearer_auth(token.as_str())
            .send()
            .await?;
        let envelope: UserEnvelope = Self::decode(Self::success(response).await?).await?;
        Ok(envelope.user)
    }
}

#[async_trait]
impl QuizApi for ApiClient {
    async fn list_public(&self) -> Result<Vec<QuizSummary>, ApiError> {
        let response = self.client.get(self.endpoint("quiz/public")).send().await?;
        let envelope: QuizListEnvelope = Self::decode(Self::success(response).await?).await?;
        Ok(envelope.quizzes)
    }

    async fn list_all(&self, token: &BearerToken) -> Result<Vec<QuizSummary>, ApiError> {
        let response = self
            .client
            .get(self.endpoint("quiz/all"))
            .bearer_auth(token.as_str())
            .send()
            .await?;
        let envelope: QuizListEnvelope = Self::decode(Self::success(response).await?).await?;
        Ok(envelope.quizzes)
    }

    async fn list_mine(&self, token: &BearerToken) -> Result<Vec<QuizSummary>, ApiError> {
        let response = self
            .client
            .get(self.endpoint("quiz/user"))
            .bearer_auth(token.as_str())
            .send()
            .await?;
        let envelope: QuizListEnvelope = Self::decode(Self::success(response).await?).await?;
        Ok(envelope.quizzes)
    }

    async fn get_quiz(&self, id: &QuizId) -> Result<Quiz, ApiError> {
        let response = self
            .client
            .get(self.endpoint(&format!("quiz/{id}")))
            .send()
            .await?;
        let envelope: QuizEnvelope = Self::decode(Self::success(response).await?).await?;
        Ok(envelope.quiz)
    }

    async fn create_quiz(
        &self,
        token: &BearerToken,
        quiz: &QuizForm,
        source: QuizSourceFile,
    ) -> Result<(), ApiError> {
        let mut form = Form::new()
            .text("title", quiz.title().to_owned())
            .text("description", quiz.description().to_owned())
            .text("totalMarks", quiz.total_marks().to_string());
        if let Some(minutes) = quiz.time_limit_minutes() {
            form = form.text("timeLimit", minutes.to_string());
        }
        form = form.part("file", Part::bytes(source.bytes).file_name(source.file_name));

        debug!(title = quiz.title(), "creating quiz");
        let response = self
            .client
            .post(self.endpoint("quiz/create"))
            .bearer_auth(token.as_str())
            .multipart(form)
            .send()
            .await?;
        Self::success(response).await?;
        Ok(())
    }

    async fn update_quiz(
        &self,
        token: &BearerToken,
        id: &QuizId,
        update: &QuizUpdate,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .put(self.endpoint(&format!("quiz/{id}")))
            .bearer_auth(token.as_str())
            .json(update)
            .send()
            .await?;
        Self::success(response).await?;
        Ok(())
    }

    async fn delete_quiz(&self, token: &BearerToken, id: &QuizId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.endpoint(&format!("quiz/{id}")))
            .bearer_auth(token.as_str())
            .send()
            .await?;
        Self::success(response).await?;
        Ok(())
    }

    async fn delete_question(&self, token: &BearerToken, id: &QuestionId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.endpoint(&format!("question/{id}")))
            .bearer_auth(token.as_str())
            .send()
            .await?;
        Self::success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl AttemptApi for ApiClient {
    async fn submit_attempt(
        &self,
        token: Option<&BearerToken>,
        quiz_id: &QuizId,
        answers: &AnswerMap,
    ) -> Result<AttemptOutcome, ApiError> {
        debug!(%quiz_id, answered = answers.len(), "submitting attempt");
        let builder = self
            .client
            .post(self.endpoint(&format!("quiz/{quiz_id}/attempt")))
            .json(&AttemptRequest { answers });
        let response = Self::with_token(builder, token).send().await?;
        Self::decode(Self::success(response).await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let client = ApiClient::new(&ApiConfig::parse("http://localhost:4532/api/").unwrap());
        assert_eq!(
            client.endpoint("/quiz/public"),
            "http://localhost:4532/api/quiz/public"
        );
        assert_eq!(
            client.endpoint("auth/login"),
            "http://localhost:4532/api/auth/login"
        );
    }
}
