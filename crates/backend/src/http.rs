use std::time::Duration;

use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use async_trait::async_trait;
use lesson_core::model::ExampleIndex;

use crate::api::{ApiError, LessonApi};
use crate::wire::{
    CompleteResponse, ExamplePayload, QuestionResponse, ResetResponse, StagePayload,
    VerifyRequest, VerifyResponse,
};

/// Bounded exponential backoff for transient request failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles per subsequent attempt.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay after the given 0-based failed attempt.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// `reqwest`-backed implementation of [`LessonApi`].
///
/// Transient failures (transport errors, non-2xx statuses) are retried with
/// exponential backoff before the error is surfaced; application-level
/// rejections and malformed payloads are returned immediately.
#[derive(Clone)]
pub struct HttpLessonApi {
    client: Client,
    base: Url,
    retry: RetryPolicy,
}

impl HttpLessonApi {
    /// # Errors
    ///
    /// Returns `ApiError::BaseUrl` when `base_url` does not parse.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            client: Client::new(),
            base: Url::parse(base_url)?,
            retry: RetryPolicy::default(),
        })
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, None::<&()>).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, body).await
    }

    async fn request<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let url = self.base.join(path)?;

        let mut attempt = 0;
        loop {
            let mut builder = self.client.request(method.clone(), url.clone());
            if let Some(body) = body {
                builder = builder.json(body);
            }

            let error = match builder.send().await {
                Ok(response) if response.status().is_success() => {
                    // Decode failures are terminal; retrying will not
                    // produce a different body.
                    return response
                        .json::<T>()
                        .await
                        .map_err(|e| ApiError::Payload(e.to_string()));
                }
                Ok(response) => ApiError::Status(response.status()),
                Err(e) => ApiError::Http(e),
            };

            attempt += 1;
            if attempt >= self.retry.max_attempts || !error.is_transient() {
                warn!(%url, attempt, %error, "giving up on backend request");
                return Err(error);
            }

            let delay = self.retry.delay_for(attempt - 1);
            debug!(%url, attempt, ?delay, "retrying backend request");
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl LessonApi for HttpLessonApi {
    async fn example(&self, slot: ExampleIndex) -> Result<ExamplePayload, ApiError> {
        self.get_json(&format!("/api/decimal1/examples/{}", slot.slug()))
            .await
    }

    async fn complete_examples(&self) -> Result<CompleteResponse, ApiError> {
        self.post_json("/api/decimal1/examples/complete", None::<&()>)
            .await
    }

    async fn current_stage(&self) -> Result<StagePayload, ApiError> {
        self.get_json("/api/current-stage").await
    }

    async fn practice_question(&self) -> Result<QuestionResponse, ApiError> {
        self.get_json("/api/decimal1/practice/question").await
    }

    async fn verify_answer(&self, request: &VerifyRequest) -> Result<VerifyResponse, ApiError> {
        self.post_json("/api/verify-answer", Some(request)).await
    }

    async fn reset(&self) -> Result<ResetResponse, ApiError> {
        self.post_json("/api/reset", None::<&()>).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_attempt() {
        let retry = RetryPolicy {
            max_attempts: 4,
            base_delay: Duration::from_millis(250),
        };
        assert_eq!(retry.delay_for(0), Duration::from_millis(250));
        assert_eq!(retry.delay_for(1), Duration::from_millis(500));
        assert_eq!(retry.delay_for(2), Duration::from_millis(1000));
    }

    #[test]
    fn base_url_is_validated() {
        assert!(HttpLessonApi::new("http://127.0.0.1:5000").is_ok());
        assert!(matches!(
            HttpLessonApi::new("not a url"),
            Err(ApiError::BaseUrl(_))
        ));
    }
}
