//! Presentation seams between the controllers and whatever renders them.
//!
//! These traits are intentionally **not** a widget toolkit: methods carry
//! plain data and the host decides how to draw it. Everything is
//! synchronous so a test double can record calls without an executor.

use lesson_core::model::Choice;

pub use crate::transition::Direction;

/// An image the host should fetch and display.
///
/// The `generation` ties the eventual load callback back to the slide
/// transition that requested it; stale callbacks are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub path: String,
    pub generation: u64,
}

/// Enabled state and labelling for the walkthrough navigation buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavState {
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub next_label: &'static str,
}

/// Everything the practice page needs to show one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionVm {
    pub question_text: String,
    pub choices: Vec<Choice>,
}

/// How a choice row should be marked after an answer is verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceHighlight {
    /// The learner's pick, and it was right.
    Correct,
    /// The learner's pick, and it was wrong.
    Incorrect,
    /// The actual answer, revealed after a wrong pick.
    Reveal,
}

/// Render surface for the worked-examples page.
pub trait WalkthroughView {
    fn set_question(&mut self, text: &str);

    /// Begin fetching `image`; report back through
    /// `WalkthroughController::on_image_loaded` with the same generation.
    fn start_image_load(&mut self, image: ImageRef);

    /// Show `image` with no transition (first paint of a page).
    fn place_image(&mut self, image: ImageRef);

    /// Slide the already-loaded `image` in from the given direction, then
    /// report back through `WalkthroughController::on_settle_complete`.
    fn begin_slide(&mut self, image: ImageRef, direction: Direction);

    /// Text stand-in for a step whose image failed to load.
    fn show_image_fallback(&mut self, display_text: &str, annotation: &str);

    fn clear_narration(&mut self);
    fn append_narration(&mut self, ch: char);

    fn set_progress(&mut self, percent: f64);
    fn set_nav(&mut self, nav: NavState);

    /// Assistive-technology announcement; also suits a status line.
    fn announce(&mut self, message: &str);
    fn show_banner(&mut self, message: &str);
    fn navigate(&mut self, path: &str);
}

/// Render surface for the practice page.
pub trait PracticeView {
    fn show_question(&mut self, question: &QuestionVm);
    fn set_selected(&mut self, letter: &str);
    fn highlight_choice(&mut self, letter: &str, highlight: ChoiceHighlight);

    fn set_submit_enabled(&mut self, enabled: bool);
    fn set_submit_label(&mut self, label: &str);
    fn set_continue_enabled(&mut self, enabled: bool);

    fn show_feedback(&mut self, text: &str, is_correct: bool);
    fn set_progress(&mut self, percent: f64);
    fn set_stats(&mut self, attempted: u32, correct: u32);
    fn show_complete(&mut self, message: &str);

    fn announce(&mut self, message: &str);
    fn show_banner(&mut self, message: &str);
    fn navigate(&mut self, path: &str);
}
