use dioxus::prelude::*;

use services::{ApiError, AttemptError, QuizServiceError, SessionError};

/// What went wrong, pre-digested for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewError {
    /// The server rejected the request; its message is shown verbatim so
    /// the user can correct the form.
    Validation(String),
    NotSignedIn,
    EmptyQuiz,
    /// Network or server trouble; nothing wrong with the request itself.
    Unavailable,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            ViewError::Validation(message) => message.clone(),
            ViewError::NotSignedIn => "Please sign in first.".to_owned(),
            ViewError::EmptyQuiz => "This quiz has no questions yet.".to_owned(),
            ViewError::Unavailable => {
                "The quiz server is unreachable. Please try again.".to_owned()
            }
            ViewError::Unknown => "Something went wrong. Please try again.".to_owned(),
        }
    }
}

fn classify_api(err: &ApiError) -> ViewError {
    match err {
        ApiError::Unauthorized => ViewError::NotSignedIn,
        ApiError::Validation { message, .. } => ViewError::Validation(message.clone()),
        ApiError::Transport(_) | ApiError::Server { .. } => ViewError::Unavailable,
        _ => ViewError::Unknown,
    }
}

impl From<QuizServiceError> for ViewError {
    fn from(err: QuizServiceError) -> Self {
        match err {
            QuizServiceError::Draft(err) => ViewError::Validation(err.to_string()),
            QuizServiceError::MissingSourceFile => {
                ViewError::Validation("Attach a source file first.".to_owned())
            }
            QuizServiceError::NotSignedIn => ViewError::NotSignedIn,
            QuizServiceError::Api(err) => classify_api(&err),
            _ => ViewError::Unknown,
        }
    }
}

impl From<AttemptError> for ViewError {
    fn from(err: AttemptError) -> Self {
        match err {
            AttemptError::Empty => ViewError::EmptyQuiz,
            AttemptError::Api(err) => classify_api(&err),
            _ => ViewError::Unknown,
        }
    }
}

impl From<SessionError> for ViewError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Api(err) => classify_api(&err),
            _ => ViewError::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(err.clone()),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
