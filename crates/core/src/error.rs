use thiserror::Error;

use crate::model::{ExampleError, QuestionError, StageParseError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Stage(#[from] StageParseError),
    #[error(transparent)]
    Example(#[from] ExampleError),
    #[error(transparent)]
    Question(#[from] QuestionError),
}
