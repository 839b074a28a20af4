use thiserror::Error;

use backend::ApiError;

/// Failures surfaced by the worked-examples controller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WalkthroughError {
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The backend answered success but the page has nowhere to go next.
    #[error("complete-examples succeeded without a destination")]
    NoDestination,
}

/// Failures surfaced by the practice controller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PracticeError {
    #[error(transparent)]
    Api(#[from] ApiError),
    /// A submit was attempted with no active question.
    #[error("no question is currently displayed")]
    NoQuestion,
}
