#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod attempt;
pub mod auth_gate;
pub mod error;
pub mod quiz_service;
pub mod session_service;

pub use quiz_core::Clock;

pub use api::{
    ApiClient, ApiConfig, AttemptApi, AuthApi, AuthGrant, QuizApi, QuizSourceFile, QuizUpdate,
};
pub use app_services::AppServices;
pub use attempt::{
    AttemptFlowService, AttemptPhase, AttemptProgress, AttemptSession, SubmitStatus, TickOutcome,
};
pub use auth_gate::{AttemptAccess, AuthGate, GateDecision, RouteClass};
pub use error::{ApiError, AppServicesError, AttemptError, QuizServiceError, SessionError};
pub use quiz_service::{QuizScope, QuizService};
pub use session_service::{LoginOutcome, SessionService};
