//! Controller for the practice page.
//!
//! Runs the question loop: fetch, select, submit, continue. The server is
//! authoritative for learning state; when it cannot be reached at page
//! load the controller seeds a local state and keeps the page usable.
//!
//! The continue button is the loop's gate: it is enabled only by a
//! successfully verified answer, never by selecting one, and a failed
//! submit leaves it disabled.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use backend::wire::{VerifyRequest, VerifyResponse};
use backend::LessonApi;
use lesson_core::model::{LearningState, PracticeQuestion, Stage};
use lesson_core::progress::practice_percent;
use lesson_core::time::Clock;

use crate::error::PracticeError;
use crate::render::{ChoiceHighlight, PracticeView, QuestionVm};
use crate::tween::ProgressTween;

const SUBMIT_LABEL: &str = "Submit Answer";
const CHECKING_LABEL: &str = "Checking...";
const OFFLINE_BANNER: &str =
    "Could not reach the lesson server. Progress will not be saved until it returns.";
const VERIFY_FAILED_BANNER: &str = "Could not check your answer. Please try again.";
const DEFAULT_COMPLETE_MESSAGE: &str = "Congratulations! You have completed this lesson.";
const CORRECT_FEEDBACK: &str = "Correct! Well done.";
const INCORRECT_FEEDBACK: &str = "Not quite. Have a look at the highlighted answer.";

/// Fold a verify response into the cached learning state.
///
/// A server-sent learning state wins wholesale. Without one, local
/// bookkeeping records the answer and adopts an advertised next stage.
pub fn merge_learning_state(state: &mut LearningState, response: &VerifyResponse) {
    if let Some(payload) = &response.learning_state {
        *state = payload.clone().into_state(state.stage);
        return;
    }
    state.record_answer(response.is_correct);
    if let Some(next) = &response.next_stage {
        match next.parse::<Stage>() {
            Ok(stage) if stage != state.stage => {
                state.stage = stage;
                state.consecutive_correct = 0;
            }
            Ok(_) => {}
            Err(err) => warn!(%err, "ignoring unknown next stage"),
        }
    }
    if response.showing_new_examples {
        state.showing_example = true;
    }
}

pub struct PracticeController<V: PracticeView> {
    api: Arc<dyn LessonApi>,
    view: V,
    clock: Clock,
    page_path: String,
    state: LearningState,
    question: Option<PracticeQuestion>,
    selected: Option<String>,
    is_submitting: bool,
    continue_enabled: bool,
    question_started: Option<DateTime<Utc>>,
    tween: ProgressTween,
    request_generation: u64,
}

impl<V: PracticeView> PracticeController<V> {
    #[must_use]
    pub fn new(api: Arc<dyn LessonApi>, view: V, clock: Clock, page_path: impl Into<String>) -> Self {
        let state = LearningState::default();
        let initial = f64::from(practice_percent(&state));
        Self {
            api,
            view,
            clock,
            page_path: page_path.into(),
            state,
            question: None,
            selected: None,
            is_submitting: false,
            continue_enabled: false,
            question_started: None,
            tween: ProgressTween::new(initial),
            request_generation: 0,
        }
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    #[must_use]
    pub fn state(&self) -> &LearningState {
        &self.state
    }

    #[must_use]
    pub fn can_continue(&self) -> bool {
        self.continue_enabled
    }

    /// Open the page: adopt the server's learning state, then fetch the
    /// first question.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError` when the question fetch fails; a failed
    /// state fetch alone degrades to offline mode instead of erroring.
    pub async fn start(&mut self) -> Result<(), PracticeError> {
        self.load_backend_state().await;
        self.fetch_question().await
    }

    /// Sync the cached learning state with the server, or fall back to the
    /// locally seeded default when the server is unreachable.
    pub async fn load_backend_state(&mut self) {
        match self.api.current_stage().await {
            Ok(payload) => {
                if let Some(redirect) = payload.redirect {
                    if redirect != self.page_path {
                        self.view.navigate(&redirect);
                        return;
                    }
                }
                if let Some(learning_state) = payload.learning_state {
                    self.state = learning_state.into_state(self.state.stage);
                }
            }
            Err(err) => {
                warn!(%err, "starting practice with local state");
                self.view.show_banner(OFFLINE_BANNER);
                self.view.announce("Working offline");
            }
        }
        let percent = f64::from(practice_percent(&self.state));
        self.tween = ProgressTween::new(percent);
        self.view.set_progress(percent);
        self.view
            .set_stats(self.state.questions_attempted, self.state.correct_answers);
    }

    /// Fetch and display the next question, or the completion screen.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Api` on fetch or payload failures and
    /// `PracticeError::NoQuestion` when the server sends neither a question
    /// nor a completion marker.
    pub async fn fetch_question(&mut self) -> Result<(), PracticeError> {
        self.request_generation += 1;
        let request = self.request_generation;

        let response = match self.api.practice_question().await {
            Ok(response) => response,
            Err(err) => {
                self.view.show_banner(OFFLINE_BANNER);
                return Err(err.into());
            }
        };
        if request != self.request_generation {
            return Ok(());
        }

        if response.lesson_complete {
            let message = response
                .message
                .as_deref()
                .unwrap_or(DEFAULT_COMPLETE_MESSAGE);
            self.question = None;
            self.continue_enabled = false;
            self.view.set_continue_enabled(false);
            self.view.show_complete(message);
            self.tween.retarget(100.0);
            return Ok(());
        }

        if let Some(stage) = &response.stage {
            match stage.parse::<Stage>() {
                Ok(stage) => self.state.stage = stage,
                Err(err) => warn!(%err, "keeping current stage"),
            }
        }

        let Some(payload) = response.question else {
            self.view.show_banner(OFFLINE_BANNER);
            return Err(PracticeError::NoQuestion);
        };
        let question = payload.into_question().map_err(|err| {
            self.view.show_banner(OFFLINE_BANNER);
            PracticeError::from(err)
        })?;
        self.display_question(question);
        Ok(())
    }

    /// Mark a choice as picked. Ignored while a submit is in flight or
    /// after the answer has been verified.
    pub fn select_choice(&mut self, letter: &str) {
        if self.is_submitting || self.continue_enabled {
            return;
        }
        let Some(question) = &self.question else {
            return;
        };
        let Some(choice) = question.choice(letter) else {
            warn!(letter, "selection does not match any choice");
            return;
        };
        let announcement = format!("Selected {}: {}", choice.letter, choice.text);
        self.selected = Some(letter.to_string());
        self.view.set_selected(letter);
        self.view.set_submit_enabled(true);
        self.view.announce(&announcement);
    }

    /// Send the selected answer for verification.
    ///
    /// On success the answer is graded, state and progress update, and the
    /// continue button unlocks. On failure the submit button is restored
    /// and continue stays locked, so the learner can retry.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Api` when verification fails and
    /// `PracticeError::NoQuestion` when no question is displayed.
    pub async fn submit_answer(&mut self) -> Result<(), PracticeError> {
        if self.is_submitting || self.continue_enabled {
            return Ok(());
        }
        let Some(question) = self.question.clone() else {
            return Err(PracticeError::NoQuestion);
        };
        let Some(answer) = self.selected.clone() else {
            // Submit is disabled until a choice is selected.
            return Ok(());
        };

        self.is_submitting = true;
        self.view.set_submit_enabled(false);
        self.view.set_submit_label(CHECKING_LABEL);

        let response_time = self
            .question_started
            .map(|started| self.clock.elapsed_ms(started))
            .unwrap_or(0);
        let request = self.request_generation;
        let body = VerifyRequest {
            answer: answer.clone(),
            response_time,
        };

        let response = match self.api.verify_answer(&body).await {
            Ok(response) => response,
            Err(err) => {
                self.is_submitting = false;
                self.view.set_submit_label(SUBMIT_LABEL);
                self.view.set_submit_enabled(true);
                self.view.show_banner(VERIFY_FAILED_BANNER);
                return Err(err.into());
            }
        };
        if request != self.request_generation {
            return Ok(());
        }

        self.is_submitting = false;
        self.view.set_submit_label(SUBMIT_LABEL);

        merge_learning_state(&mut self.state, &response);

        if response.is_correct {
            self.view.highlight_choice(&answer, ChoiceHighlight::Correct);
        } else {
            self.view
                .highlight_choice(&answer, ChoiceHighlight::Incorrect);
            self.view
                .highlight_choice(question.correct_letter(), ChoiceHighlight::Reveal);
        }

        let feedback = response.feedback_text().unwrap_or(if response.is_correct {
            CORRECT_FEEDBACK
        } else {
            INCORRECT_FEEDBACK
        });
        self.view.show_feedback(feedback, response.is_correct);
        self.view
            .set_stats(self.state.questions_attempted, self.state.correct_answers);
        self.tween
            .retarget(f64::from(practice_percent(&self.state)));

        self.continue_enabled = true;
        self.view.set_continue_enabled(true);
        self.view.announce(if response.is_correct {
            "Correct"
        } else {
            "Incorrect"
        });

        if let Some(redirect) = response.next_stage_redirect {
            self.view.navigate(&redirect);
        }
        Ok(())
    }

    /// Move on after a verified answer. Ignored until then.
    ///
    /// # Errors
    ///
    /// Propagates `PracticeError` from the question fetch.
    pub async fn next_question(&mut self) -> Result<(), PracticeError> {
        if !self.continue_enabled {
            return Ok(());
        }
        self.continue_enabled = false;
        self.view.set_continue_enabled(false);
        self.fetch_question().await
    }

    /// Advance the progress-bar glide one frame.
    pub fn progress_tick(&mut self) {
        if let Some(percent) = self.tween.tick() {
            self.view.set_progress(percent);
        }
    }

    /// Whether the progress bar still has frames to play.
    #[must_use]
    pub fn progress_animating(&self) -> bool {
        self.tween.is_animating()
    }

    /// Wipe the session on the backend and leave the lesson.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Api` when the reset request fails.
    pub async fn reset_lesson(&mut self) -> Result<(), PracticeError> {
        let response = self.api.reset().await?;
        let destination = response.redirect.as_deref().unwrap_or("/");
        self.view.navigate(destination);
        Ok(())
    }

    fn display_question(&mut self, question: PracticeQuestion) {
        self.selected = None;
        self.is_submitting = false;
        self.continue_enabled = false;
        self.question_started = Some(self.clock.now());

        self.view.show_question(&QuestionVm {
            question_text: question.question_text().to_string(),
            choices: question.choices().to_vec(),
        });
        self.view.set_submit_label(SUBMIT_LABEL);
        self.view.set_submit_enabled(false);
        self.view.set_continue_enabled(false);
        self.view
            .set_stats(self.state.questions_attempted, self.state.correct_answers);
        self.tween
            .retarget(f64::from(practice_percent(&self.state)));
        self.view.announce("New question");

        self.question = Some(question);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use backend::wire::LearningStatePayload;

    #[test]
    fn server_state_wins_wholesale() {
        let mut state = LearningState::default();
        state.record_answer(true);

        let response = VerifyResponse {
            is_correct: false,
            learning_state: Some(LearningStatePayload {
                stage: "1.3".to_string(),
                questions_attempted: 7,
                correct_answers: 5,
                consecutive_correct: 1,
                showing_example: false,
            }),
            ..VerifyResponse::default()
        };
        merge_learning_state(&mut state, &response);

        assert_eq!(state.stage, Stage::Practice13);
        assert_eq!(state.questions_attempted, 7);
        assert_eq!(state.consecutive_correct, 1);
    }

    #[test]
    fn local_fallback_records_and_advances() {
        let mut state = LearningState::default();

        let response = VerifyResponse {
            is_correct: true,
            next_stage: Some("1.2".to_string()),
            ..VerifyResponse::default()
        };
        merge_learning_state(&mut state, &response);

        assert_eq!(state.stage, Stage::Practice12);
        assert_eq!(state.questions_attempted, 1);
        assert_eq!(state.correct_answers, 1);
        // Streak restarts in the new stage.
        assert_eq!(state.consecutive_correct, 0);
    }

    #[test]
    fn unknown_next_stage_is_ignored() {
        let mut state = LearningState::default();
        let response = VerifyResponse {
            is_correct: true,
            next_stage: Some("9.9".to_string()),
            ..VerifyResponse::default()
        };
        merge_learning_state(&mut state, &response);
        assert_eq!(state.stage, Stage::Practice11);
        assert_eq!(state.consecutive_correct, 1);
    }

    #[test]
    fn showing_new_examples_flag_sticks() {
        let mut state = LearningState::default();
        let response = VerifyResponse {
            is_correct: true,
            showing_new_examples: true,
            ..VerifyResponse::default()
        };
        merge_learning_state(&mut state, &response);
        assert!(state.showing_example);
    }
}
