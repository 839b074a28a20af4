use async_trait::async_trait;
use thiserror::Error;

use lesson_core::model::ExampleIndex;

use crate::wire::{
    CompleteResponse, ExamplePayload, QuestionResponse, ResetResponse, StagePayload,
    VerifyRequest, VerifyResponse,
};

/// Errors from talking to the lesson backend.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("backend responded with status {0}")]
    Status(reqwest::StatusCode),
    /// The payload carried an application-level `error` field.
    #[error("backend rejected the request: {0}")]
    Rejected(String),
    #[error("backend payload was malformed: {0}")]
    Payload(String),
    #[error("invalid backend base url: {0}")]
    BaseUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Application-level rejections and malformed payloads are terminal;
    /// transport failures and non-2xx statuses are retried by the HTTP
    /// implementation before ever reaching a controller.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Http(_) | ApiError::Status(_))
    }
}

/// The REST surface the page controllers consume.
///
/// One method per endpoint, returning the wire payload; converting wire
/// data into domain types is the caller's concern so a failed conversion
/// can keep the controller in its prior valid state.
#[async_trait]
pub trait LessonApi: Send + Sync {
    /// GET `/api/decimal1/examples/first` | `/second`.
    async fn example(&self, slot: ExampleIndex) -> Result<ExamplePayload, ApiError>;

    /// POST `/api/decimal1/examples/complete`.
    async fn complete_examples(&self) -> Result<CompleteResponse, ApiError>;

    /// GET `/api/current-stage`.
    async fn current_stage(&self) -> Result<StagePayload, ApiError>;

    /// GET `/api/decimal1/practice/question`.
    async fn practice_question(&self) -> Result<QuestionResponse, ApiError>;

    /// POST `/api/verify-answer`.
    async fn verify_answer(&self, request: &VerifyRequest) -> Result<VerifyResponse, ApiError>;

    /// POST `/api/reset`.
    async fn reset(&self) -> Result<ResetResponse, ApiError>;
}
