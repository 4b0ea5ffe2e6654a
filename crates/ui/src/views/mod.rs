mod attempt;
mod dashboard;
mod home;
mod login;
mod quiz_detail;
mod quiz_form;
mod signup;
mod state;

pub use attempt::AttemptView;
pub use dashboard::DashboardView;
pub use home::HomeView;
pub use login::LoginView;
pub use quiz_detail::QuizDetailView;
pub use quiz_form::QuizFormView;
pub use signup::SignupView;
pub use state::{ViewError, ViewState, view_state_from_resource};
