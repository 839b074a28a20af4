use std::sync::Arc;

use backend::{ApiError, FakeLessonApi};
use lesson_core::model::ExampleIndex;
use services::WalkthroughController;
use services::render::{Direction, ImageRef, NavState, WalkthroughView};
use services::walkthrough::PRACTICE_PATH;

#[derive(Default)]
struct RecordingView {
    question: Option<String>,
    image_loads: Vec<ImageRef>,
    placed: Vec<ImageRef>,
    slides: Vec<(ImageRef, Direction)>,
    fallbacks: Vec<(String, String)>,
    narration: String,
    progress: Vec<f64>,
    nav: Option<NavState>,
    announcements: Vec<String>,
    banners: Vec<String>,
    navigations: Vec<String>,
}

impl WalkthroughView for RecordingView {
    fn set_question(&mut self, text: &str) {
        self.question = Some(text.to_string());
    }

    fn start_image_load(&mut self, image: ImageRef) {
        self.image_loads.push(image);
    }

    fn place_image(&mut self, image: ImageRef) {
        self.placed.push(image);
    }

    fn begin_slide(&mut self, image: ImageRef, direction: Direction) {
        self.slides.push((image, direction));
    }

    fn show_image_fallback(&mut self, display_text: &str, annotation: &str) {
        self.fallbacks
            .push((display_text.to_string(), annotation.to_string()));
    }

    fn clear_narration(&mut self) {
        self.narration.clear();
    }

    fn append_narration(&mut self, ch: char) {
        self.narration.push(ch);
    }

    fn set_progress(&mut self, percent: f64) {
        self.progress.push(percent);
    }

    fn set_nav(&mut self, nav: NavState) {
        self.nav = Some(nav);
    }

    fn announce(&mut self, message: &str) {
        self.announcements.push(message.to_string());
    }

    fn show_banner(&mut self, message: &str) {
        self.banners.push(message.to_string());
    }

    fn navigate(&mut self, path: &str) {
        self.navigations.push(path.to_string());
    }
}

fn harness() -> (Arc<FakeLessonApi>, WalkthroughController<RecordingView>) {
    let api = Arc::new(FakeLessonApi::new());
    let controller = WalkthroughController::new(api.clone(), RecordingView::default());
    (api, controller)
}

/// Ack the last requested image load and let its slide settle.
fn finish_transition(controller: &mut WalkthroughController<RecordingView>) {
    let image = controller
        .view()
        .image_loads
        .last()
        .cloned()
        .expect("an image load was requested");
    controller.on_image_loaded(image.generation, true);
    controller.on_settle_complete(image.generation);
    assert!(!controller.is_transitioning());
}

#[tokio::test]
async fn walks_both_examples_then_redirects_to_practice() {
    let (api, mut controller) = harness();

    controller.start().await.unwrap();
    assert_eq!(controller.example_number(), Some(1));
    assert_eq!(controller.current_step(), 1);
    assert_eq!(
        controller.view().question.as_deref(),
        Some("Round 12.632 to 1 decimal place")
    );
    assert_eq!(controller.view().progress.last().copied(), Some(10.0));

    // First paint goes straight onto the whiteboard, no slide.
    finish_transition(&mut controller);
    assert_eq!(controller.view().placed.len(), 1);
    assert!(controller.view().slides.is_empty());

    for _ in 0..2 {
        controller.next_step().await.unwrap();
        finish_transition(&mut controller);
    }
    assert_eq!(controller.current_step(), 3);
    assert_eq!(controller.view().nav.as_ref().unwrap().next_label, "Continue");

    // Stepping past the last step rolls into the second example.
    controller.next_step().await.unwrap();
    finish_transition(&mut controller);
    assert_eq!(controller.example_number(), Some(2));
    assert_eq!(controller.current_step(), 1);
    assert_eq!(controller.view().progress.last().copied(), Some(20.0));
    assert_eq!(api.calls().example, 2);

    for _ in 0..2 {
        controller.next_step().await.unwrap();
        finish_transition(&mut controller);
    }
    assert_eq!(
        controller.view().nav.as_ref().unwrap().next_label,
        "Complete Examples"
    );

    controller.next_step().await.unwrap();
    assert_eq!(api.calls().complete_examples, 1);
    assert_eq!(
        controller.view().navigations.last().map(String::as_str),
        Some(PRACTICE_PATH)
    );
}

#[tokio::test]
async fn slide_direction_tracks_navigation() {
    let (_api, mut controller) = harness();
    controller.start().await.unwrap();
    finish_transition(&mut controller);

    controller.next_step().await.unwrap();
    finish_transition(&mut controller);
    assert_eq!(controller.view().slides.last().unwrap().1, Direction::Forward);

    controller.prev_step().await.unwrap();
    finish_transition(&mut controller);
    assert_eq!(
        controller.view().slides.last().unwrap().1,
        Direction::Backward
    );
}

#[tokio::test]
async fn prev_at_first_step_reenters_previous_examples_last_step() {
    let (api, mut controller) = harness();
    controller.start().await.unwrap();
    finish_transition(&mut controller);
    for _ in 0..3 {
        controller.next_step().await.unwrap();
        finish_transition(&mut controller);
    }
    assert_eq!(controller.example_number(), Some(2));
    assert_eq!(controller.current_step(), 1);

    controller.prev_step().await.unwrap();
    finish_transition(&mut controller);
    assert_eq!(controller.example_number(), Some(1));
    assert_eq!(controller.current_step(), 3);
    // Crossing the boundary backward slides in from below.
    assert_eq!(
        controller.view().slides.last().unwrap().1,
        Direction::Backward
    );
    assert_eq!(api.calls().example, 3);
}

#[tokio::test]
async fn navigation_is_dropped_while_a_slide_is_in_flight() {
    let (_api, mut controller) = harness();
    controller.start().await.unwrap();
    finish_transition(&mut controller);

    controller.next_step().await.unwrap();
    assert!(controller.is_transitioning());
    controller.next_step().await.unwrap();
    controller.prev_step().await.unwrap();
    finish_transition(&mut controller);

    // Exactly one navigation was processed.
    assert_eq!(controller.current_step(), 2);
}

#[tokio::test]
async fn fetch_failure_keeps_prior_example() {
    let (api, mut controller) = harness();
    controller.start().await.unwrap();
    finish_transition(&mut controller);
    for _ in 0..2 {
        controller.next_step().await.unwrap();
        finish_transition(&mut controller);
    }

    api.push_example(Err(ApiError::Rejected("wrong topic".to_string())));
    assert!(controller.next_step().await.is_err());
    assert!(!controller.view().banners.is_empty());
    assert_eq!(controller.example_number(), Some(1));
    assert_eq!(controller.current_step(), 3);
}

#[tokio::test]
async fn start_failure_banners_without_a_page() {
    let (api, mut controller) = harness();
    api.push_example(Err(ApiError::Payload("empty body".to_string())));

    assert!(controller.start().await.is_err());
    assert!(!controller.view().banners.is_empty());
    assert_eq!(controller.example_number(), None);
}

#[tokio::test]
async fn failed_image_load_falls_back_to_step_text() {
    let (_api, mut controller) = harness();
    controller.start().await.unwrap();

    let image = controller.view().image_loads.last().cloned().unwrap();
    controller.on_image_loaded(image.generation, false);

    let (display, annotation) = controller.view().fallbacks.last().unwrap();
    assert_eq!(display, "12.6|32");
    assert_eq!(annotation, "1st decimal place");

    // The failed transition does not wedge navigation.
    assert!(!controller.is_transitioning());
    controller.next_step().await.unwrap();
    assert_eq!(controller.current_step(), 2);
}

#[tokio::test]
async fn narration_types_out_character_by_character() {
    let (_api, mut controller) = harness();
    controller.start().await.unwrap();

    assert!(controller.narration_active());
    controller.narration_tick();
    assert_eq!(controller.view().narration, "I");

    while controller.narration_active() {
        controller.narration_tick();
    }
    assert!(controller.view().narration.starts_with("Identify the digit"));
    assert!(controller.view().narration.ends_with("rounding digit."));
}

#[tokio::test]
async fn loading_a_step_preempts_the_running_narration() {
    let (_api, mut controller) = harness();
    controller.start().await.unwrap();
    finish_transition(&mut controller);
    for _ in 0..3 {
        controller.narration_tick();
    }
    assert_eq!(controller.view().narration.chars().count(), 3);

    controller.next_step().await.unwrap();
    assert!(controller.view().narration.is_empty());
    controller.narration_tick();
    assert_eq!(controller.view().narration, "C");
}

#[tokio::test]
async fn empty_narration_resolves_to_the_step_fallback() {
    let (api, mut controller) = harness();
    let mut payload = FakeLessonApi::canned_example(ExampleIndex::First);
    payload.steps[0].text_content = String::new();
    api.push_example(Ok(payload));

    controller.start().await.unwrap();
    while controller.narration_active() {
        controller.narration_tick();
    }
    assert!(
        controller
            .view()
            .narration
            .starts_with("Identify the digit in the 1st decimal place")
    );
}
