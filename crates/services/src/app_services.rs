use std::sync::Arc;

use quiz_core::Clock;
use storage::repository::Storage;

use crate::api::{ApiClient, ApiConfig, AttemptApi, AuthApi, QuizApi};
use crate::attempt::AttemptFlowService;
use crate::auth_gate::{AttemptAccess, AuthGate};
use crate::error::AppServicesError;
use crate::quiz_service::QuizService;
use crate::session_service::SessionService;

/// Assembles app-facing services over one storage and one API client.
#[derive(Clone)]
pub struct AppServices {
    auth_gate: AuthGate,
    session: Arc<SessionService>,
    quizzes: Arc<QuizService>,
    attempt_flow: Arc<AttemptFlowService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP API client.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        api: &ApiConfig,
        clock: Clock,
        attempt_access: AttemptAccess,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let client = Arc::new(ApiClient::new(api));
        let auth: Arc<dyn AuthApi> = client.clone();
        let quiz_api: Arc<dyn QuizApi> = client.clone();
        let attempt_api: Arc<dyn AttemptApi> = client;
        Ok(Self::from_parts(
            storage,
            auth,
            quiz_api,
            attempt_api,
            clock,
            attempt_access,
        ))
    }

    /// Build from explicit trait objects. Tests use this with in-memory
    /// storage and API fakes.
    #[must_use]
    pub fn from_parts(
        storage: Storage,
        auth: Arc<dyn AuthApi>,
        quizzes: Arc<dyn QuizApi>,
        attempts: Arc<dyn AttemptApi>,
        clock: Clock,
        attempt_access: AttemptAccess,
    ) -> Self {
        let session = Arc::new(SessionService::new(auth, Arc::clone(&storage.credentials)));
        let quiz_service = Arc::new(QuizService::new(Arc::clone(&quizzes)));
        let attempt_flow = Arc::new(AttemptFlowService::new(
            clock,
            quizzes,
            attempts,
            Arc::clone(&storage.attempt_drafts),
        ));

        Self {
            auth_gate: AuthGate::new(attempt_access),
            session,
            quizzes: quiz_service,
            attempt_flow,
        }
    }

    #[must_use]
    pub fn auth_gate(&self) -> AuthGate {
        self.auth_gate
    }

    #[must_use]
    pub fn session(&self) -> Arc<SessionService> {
        Arc::clone(&self.session)
    }

    #[must_use]
    pub fn quizzes(&self) -> Arc<QuizService> {
        Arc::clone(&self.quizzes)
    }

    #[must_use]
    pub fn attempt_flow(&self) -> Arc<AttemptFlowService> {
        Arc::clone(&self.attempt_flow)
    }
}
