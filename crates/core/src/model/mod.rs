mod attempt;
mod ids;
mod quiz;
mod session;
mod user;

pub use ids::{QuestionId, QuizId, UserId};

pub use attempt::{AnswerMap, AttemptOutcome, ReviewEntry};
pub use quiz::{Question, Quiz, QuizDraft, QuizDraftError, QuizForm, QuizSummary};
pub use session::{BearerToken, Session};
pub use user::UserSummary;
