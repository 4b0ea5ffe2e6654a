use std::sync::Arc;

use services::{AttemptFlowService, AuthGate, QuizService, SessionService};

/// What the composition root must provide for the UI to run.
pub trait UiApp: Send + Sync {
    fn auth_gate(&self) -> AuthGate;
    fn session(&self) -> Arc<SessionService>;
    fn quizzes(&self) -> Arc<QuizService>;
    fn attempt_flow(&self) -> Arc<AttemptFlowService>;
}

/// Services handed to every view through Dioxus context.
///
/// Nothing here is ambient global state: views receive this explicitly and
/// the session service inside it is the single owner of auth state.
#[derive(Clone)]
pub struct AppContext {
    auth_gate: AuthGate,
    session: Arc<SessionService>,
    quizzes: Arc<QuizService>,
    attempt_flow: Arc<AttemptFlowService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            auth_gate: app.auth_gate(),
            session: app.session(),
            quizzes: app.quizzes(),
            attempt_flow: app.attempt_flow(),
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

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
