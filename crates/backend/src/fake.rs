//! Scripted in-memory backend for tests and the offline demo.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use lesson_core::model::ExampleIndex;

use crate::api::{ApiError, LessonApi};
use crate::wire::{
    CompleteResponse, ExamplePayload, ImageContentPayload, LearningStatePayload,
    QuestionPayload, QuestionResponse, ResetResponse, StagePayload, StepPayload, VerifyRequest,
    VerifyResponse,
};

/// Number of calls the fake has served per endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub example: u32,
    pub complete_examples: u32,
    pub current_stage: u32,
    pub practice_question: u32,
    pub verify_answer: u32,
    pub reset: u32,
}

#[derive(Default)]
struct Script {
    examples: VecDeque<Result<ExamplePayload, ApiError>>,
    completes: VecDeque<Result<CompleteResponse, ApiError>>,
    stages: VecDeque<Result<StagePayload, ApiError>>,
    questions: VecDeque<Result<QuestionResponse, ApiError>>,
    verifications: VecDeque<Result<VerifyResponse, ApiError>>,
    resets: VecDeque<Result<ResetResponse, ApiError>>,
    submitted_answers: Vec<VerifyRequest>,
    calls: CallCounts,
}

/// A [`LessonApi`] double with scriptable responses.
///
/// Unscripted calls answer with canned data mirroring the real service, so
/// the fake also works as a self-contained offline lesson. Scripted
/// responses (including errors) are served in FIFO order per endpoint.
#[derive(Default)]
pub struct FakeLessonApi {
    inner: Mutex<Script>,
}

impl FakeLessonApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_example(&self, response: Result<ExamplePayload, ApiError>) {
        self.lock().examples.push_back(response);
    }

    pub fn push_complete(&self, response: Result<CompleteResponse, ApiError>) {
        self.lock().completes.push_back(response);
    }

    pub fn push_stage(&self, response: Result<StagePayload, ApiError>) {
        self.lock().stages.push_back(response);
    }

    pub fn push_question(&self, response: Result<QuestionResponse, ApiError>) {
        self.lock().questions.push_back(response);
    }

    pub fn push_verify(&self, response: Result<VerifyResponse, ApiError>) {
        self.lock().verifications.push_back(response);
    }

    pub fn push_reset(&self, response: Result<ResetResponse, ApiError>) {
        self.lock().resets.push_back(response);
    }

    #[must_use]
    pub fn calls(&self) -> CallCounts {
        self.lock().calls
    }

    /// Verify-answer request bodies in submission order.
    #[must_use]
    pub fn submitted_answers(&self) -> Vec<VerifyRequest> {
        self.lock().submitted_answers.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        self.inner.lock().expect("fake backend lock poisoned")
    }

    /// Canned worked-example payload matching the real service's content.
    #[must_use]
    pub fn canned_example(slot: ExampleIndex) -> ExamplePayload {
        let (question, display, final_display, up) = match slot {
            ExampleIndex::First => ("Round 12.632 to 1 decimal place", "12.6|32", "12.6", false),
            ExampleIndex::Second => ("Round 12.682 to 1 decimal place", "12.6|82", "12.7", true),
        };
        let middle = if up {
            "Check the digit to the right of the \"cut off\" line. If this digit is 5 or bigger \
             we need to round up. We do this by adding 1 to the rounding digit."
        } else {
            "Check the digit to the right of the \"cut off\" line. If this digit is less than 5 \
             we keep our rounding digit the same."
        };
        ExamplePayload {
            question_text: question.to_string(),
            total_steps: 3,
            steps: vec![
                StepPayload {
                    image_content: ImageContentPayload {
                        display_text: display.to_string(),
                        annotation: "1st decimal place".to_string(),
                        highlight_position: "after_6".to_string(),
                    },
                    text_content: "Identify the digit in the 1st decimal place. This is the \
                                   first digit after the decimal point. We will call it the \
                                   \"rounding digit\". Draw a \"cut off\" line after the \
                                   rounding digit."
                        .to_string(),
                },
                StepPayload {
                    image_content: ImageContentPayload {
                        display_text: display.to_string(),
                        annotation: "Check the next digit".to_string(),
                        highlight_position: "after_line".to_string(),
                    },
                    text_content: middle.to_string(),
                },
                StepPayload {
                    image_content: ImageContentPayload {
                        display_text: final_display.to_string(),
                        annotation: "Final answer".to_string(),
                        highlight_position: "complete".to_string(),
                    },
                    text_content: "Remove all digits after the \"cut off\" line. We have now \
                                   rounded the number to 1 decimal place."
                        .to_string(),
                },
            ],
            error: None,
        }
    }

    fn canned_question() -> QuestionResponse {
        QuestionResponse {
            lesson_complete: false,
            message: None,
            stage: Some("1.1".to_string()),
            question: Some(QuestionPayload {
                question_text: "Round 8.236 to 1 decimal place".to_string(),
                choices: vec![
                    ("a".to_string(), "8.2".to_string()),
                    ("b".to_string(), "8.3".to_string()),
                    ("c".to_string(), "8.24".to_string()),
                    ("d".to_string(), "8".to_string()),
                ],
                correct_letter: "a".to_string(),
            }),
        }
    }
}

#[async_trait]
impl LessonApi for FakeLessonApi {
    async fn example(&self, slot: ExampleIndex) -> Result<ExamplePayload, ApiError> {
        let mut script = self.lock();
        script.calls.example += 1;
        script
            .examples
            .pop_front()
            .unwrap_or_else(|| Ok(Self::canned_example(slot)))
    }

    async fn complete_examples(&self) -> Result<CompleteResponse, ApiError> {
        let mut script = self.lock();
        script.calls.complete_examples += 1;
        script.completes.pop_front().unwrap_or_else(|| {
            Ok(CompleteResponse {
                status: "success".to_string(),
            })
        })
    }

    async fn current_stage(&self) -> Result<StagePayload, ApiError> {
        let mut script = self.lock();
        script.calls.current_stage += 1;
        script.stages.pop_front().unwrap_or_else(|| {
            Ok(StagePayload {
                redirect: None,
                learning_state: Some(LearningStatePayload {
                    stage: "1.1".to_string(),
                    ..LearningStatePayload::default()
                }),
            })
        })
    }

    async fn practice_question(&self) -> Result<QuestionResponse, ApiError> {
        let mut script = self.lock();
        script.calls.practice_question += 1;
        script
            .questions
            .pop_front()
            .unwrap_or_else(|| Ok(Self::canned_question()))
    }

    async fn verify_answer(&self, request: &VerifyRequest) -> Result<VerifyResponse, ApiError> {
        let mut script = self.lock();
        script.calls.verify_answer += 1;
        script.submitted_answers.push(request.clone());
        script.verifications.pop_front().unwrap_or_else(|| {
            Ok(VerifyResponse {
                is_correct: request.answer == "a",
                ..VerifyResponse::default()
            })
        })
    }

    async fn reset(&self) -> Result<ResetResponse, ApiError> {
        let mut script = self.lock();
        script.calls.reset += 1;
        script.resets.pop_front().unwrap_or_else(|| {
            Ok(ResetResponse {
                status: "reset".to_string(),
                redirect: Some("/".to_string()),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_responses_are_fifo() {
        let fake = FakeLessonApi::new();
        fake.push_question(Ok(QuestionResponse {
            lesson_complete: true,
            message: Some("done".to_string()),
            ..QuestionResponse::default()
        }));
        fake.push_question(Err(ApiError::Rejected("nope".to_string())));

        let first = fake.practice_question().await.unwrap();
        assert!(first.lesson_complete);
        assert!(fake.practice_question().await.is_err());

        // Exhausted script falls back to canned data.
        let canned = fake.practice_question().await.unwrap();
        assert!(canned.question.is_some());
        assert_eq!(fake.calls().practice_question, 3);
    }

    #[tokio::test]
    async fn records_submitted_answers() {
        let fake = FakeLessonApi::new();
        let _ = fake
            .verify_answer(&VerifyRequest {
                answer: "b".to_string(),
                response_time: 1500,
            })
            .await
            .unwrap();
        let submitted = fake.submitted_answers();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].answer, "b");
    }
}
