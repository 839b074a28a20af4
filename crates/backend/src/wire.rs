//! Wire DTOs for the lesson REST API.
//!
//! Field names mirror the server's JSON exactly; optional and missing
//! fields default rather than failing, since several endpoints answer with
//! partial objects (for instance `/api/current-stage` returns `{}` for a
//! fresh session). Conversions into `lesson-core` types live here too, so
//! controllers never handle raw JSON.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use lesson_core::model::{
    Choice, ExampleIndex, LearningState, LessonExample, LessonStep, PracticeQuestion, Stage,
    StepImage,
};

use crate::api::ApiError;

/// `GET /api/decimal1/examples/{first,second}` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExamplePayload {
    #[serde(default)]
    pub question_text: String,
    #[serde(default)]
    pub total_steps: u32,
    #[serde(default)]
    pub steps: Vec<StepPayload>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StepPayload {
    #[serde(default)]
    pub image_content: ImageContentPayload,
    #[serde(default)]
    pub text_content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageContentPayload {
    #[serde(default)]
    pub display_text: String,
    #[serde(default)]
    pub annotation: String,
    #[serde(default)]
    pub highlight_position: String,
}

impl ExamplePayload {
    /// Convert into the domain example for the given slot.
    ///
    /// # Errors
    ///
    /// `ApiError::Rejected` when the payload carries an `error` field,
    /// `ApiError::Payload` when the step data is structurally invalid.
    pub fn into_example(self, slot: ExampleIndex) -> Result<LessonExample, ApiError> {
        if let Some(message) = self.error {
            return Err(ApiError::Rejected(message));
        }
        let steps = self
            .steps
            .into_iter()
            .map(|step| LessonStep {
                image: StepImage {
                    display_text: step.image_content.display_text,
                    annotation: step.image_content.annotation,
                    highlight_position: step.image_content.highlight_position,
                },
                narration: step.text_content,
            })
            .collect();
        LessonExample::new(slot, self.question_text, self.total_steps, steps)
            .map_err(|e| ApiError::Payload(e.to_string()))
    }
}

/// `POST /api/decimal1/examples/complete` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompleteResponse {
    #[serde(default)]
    pub status: String,
}

impl CompleteResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// `GET /api/current-stage` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StagePayload {
    #[serde(default)]
    pub redirect: Option<String>,
    #[serde(default)]
    pub learning_state: Option<LearningStatePayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LearningStatePayload {
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub questions_attempted: u32,
    #[serde(default)]
    pub correct_answers: u32,
    #[serde(default)]
    pub consecutive_correct: u32,
    #[serde(default)]
    pub showing_example: bool,
}

impl LearningStatePayload {
    /// Adopt the server state wholesale; an unrecognized stage id keeps
    /// `fallback_stage` (logged, not surfaced).
    #[must_use]
    pub fn into_state(self, fallback_stage: Stage) -> LearningState {
        let stage = self.stage.parse::<Stage>().unwrap_or_else(|err| {
            warn!(%err, "keeping previous stage");
            fallback_stage
        });
        LearningState {
            stage,
            questions_attempted: self.questions_attempted,
            correct_answers: self.correct_answers,
            consecutive_correct: self.consecutive_correct,
            showing_example: self.showing_example,
        }
    }
}

/// `GET /api/decimal1/practice/question` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionResponse {
    #[serde(default)]
    pub lesson_complete: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub question: Option<QuestionPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionPayload {
    #[serde(default)]
    pub question_text: String,
    /// Choice letters in the server's order, which is display order.
    #[serde(default, deserialize_with = "ordered_choices")]
    pub choices: Vec<(String, String)>,
    #[serde(default)]
    pub correct_letter: String,
}

impl QuestionPayload {
    /// # Errors
    ///
    /// `ApiError::Payload` when the choices are empty or the correct letter
    /// is not among them.
    pub fn into_question(self) -> Result<PracticeQuestion, ApiError> {
        let choices = self
            .choices
            .into_iter()
            .map(|(letter, text)| Choice { letter, text })
            .collect();
        PracticeQuestion::new(self.question_text, choices, self.correct_letter)
            .map_err(|e| ApiError::Payload(e.to_string()))
    }
}

/// `POST /api/verify-answer` request body.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyRequest {
    pub answer: String,
    pub response_time: u64,
}

/// `POST /api/verify-answer` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyResponse {
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub learning_state: Option<LearningStatePayload>,
    #[serde(default)]
    pub next_stage: Option<String>,
    #[serde(default)]
    pub next_stage_redirect: Option<String>,
    #[serde(default)]
    pub stage_completed: bool,
    #[serde(default)]
    pub showing_new_examples: bool,
    #[serde(default)]
    pub lesson_complete: bool,
    /// Free-form feedback; the server sends either a string or a
    /// structured object depending on its feedback service.
    #[serde(default)]
    pub feedback: Option<serde_json::Value>,
}

impl VerifyResponse {
    /// Best-effort extraction of displayable feedback text.
    #[must_use]
    pub fn feedback_text(&self) -> Option<&str> {
        match self.feedback.as_ref()? {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Object(map) => map.get("message").and_then(|v| v.as_str()),
            _ => None,
        }
    }
}

/// `POST /api/reset` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub redirect: Option<String>,
}

impl ResetResponse {
    #[must_use]
    pub fn is_reset(&self) -> bool {
        self.status == "reset"
    }
}

fn ordered_choices<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ChoicesVisitor;

    impl<'de> Visitor<'de> for ChoicesVisitor {
        type Value = Vec<(String, String)>;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a map of choice letter to answer text")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(4));
            while let Some(entry) = access.next_entry::<String, String>()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(ChoicesVisitor)
}
