use thiserror::Error;

use crate::model::QuizDraftError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    QuizDraft(#[from] QuizDraftError),
}
