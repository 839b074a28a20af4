//! Controller for the worked-examples page.
//!
//! Walks the learner through two worked examples step by step. Each step
//! change slides a new annotated image in and types its narration out; the
//! controller drives both through [`WalkthroughView`] and never blocks on
//! the animations itself.

use std::sync::Arc;

use tracing::{error, warn};

use backend::LessonApi;
use lesson_core::model::{ExampleIndex, LessonExample};
use lesson_core::progress::walkthrough_percent;
use lesson_core::text::resolve_narration;

use crate::error::WalkthroughError;
use crate::render::{Direction, ImageRef, NavState, WalkthroughView};
use crate::transition::{FROM_AHEAD, SlideTransition};
use crate::typewriter::{TypeEvent, Typewriter};

/// Where the page goes once both examples are done.
pub const PRACTICE_PATH: &str = "/decimal1/practice";

const LOAD_FAILED_BANNER: &str = "Could not load the example. Check your connection and try again.";

/// Which step a freshly opened example lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStep {
    First,
    /// Used when stepping backward across the example boundary.
    Last,
}

pub struct WalkthroughController<V: WalkthroughView> {
    api: Arc<dyn LessonApi>,
    view: V,
    example: Option<LessonExample>,
    current_step: u32,
    last_step: u32,
    has_image: bool,
    pending_direction: Direction,
    typewriter: Typewriter,
    slide: SlideTransition,
    request_generation: u64,
}

impl<V: WalkthroughView> WalkthroughController<V> {
    #[must_use]
    pub fn new(api: Arc<dyn LessonApi>, view: V) -> Self {
        Self {
            api,
            view,
            example: None,
            current_step: 0,
            last_step: 0,
            has_image: false,
            pending_direction: Direction::Forward,
            typewriter: Typewriter::new(),
            slide: SlideTransition::new(),
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
    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    #[must_use]
    pub fn example_number(&self) -> Option<u32> {
        self.example.as_ref().map(|e| e.index().number())
    }

    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.slide.in_flight()
    }

    /// Open the page on the first example.
    ///
    /// # Errors
    ///
    /// Returns `WalkthroughError::Api` when the example cannot be fetched.
    pub async fn start(&mut self) -> Result<(), WalkthroughError> {
        self.load_example(ExampleIndex::First, EntryStep::First)
            .await
    }

    /// Fetch and display an example, landing on the given entry step.
    ///
    /// # Errors
    ///
    /// Returns `WalkthroughError::Api` on fetch or payload failures; the
    /// previous example stays on screen.
    pub async fn load_example(
        &mut self,
        slot: ExampleIndex,
        entry: EntryStep,
    ) -> Result<(), WalkthroughError> {
        self.request_generation += 1;
        let request = self.request_generation;

        let payload = match self.api.example(slot).await {
            Ok(payload) => payload,
            Err(err) => {
                self.view.show_banner(LOAD_FAILED_BANNER);
                return Err(err.into());
            }
        };
        if request != self.request_generation {
            // A later navigation superseded this fetch.
            return Ok(());
        }

        let example = match payload.into_example(slot) {
            Ok(example) => example,
            Err(err) => {
                self.view.show_banner(LOAD_FAILED_BANNER);
                return Err(err.into());
            }
        };

        let entry_step = match entry {
            EntryStep::First => 1,
            EntryStep::Last => example.total_steps(),
        };
        self.last_step = match entry {
            EntryStep::First => 0,
            EntryStep::Last => FROM_AHEAD,
        };
        self.view.set_question(example.question_text());
        self.example = Some(example);
        self.show_step(entry_step);
        Ok(())
    }

    /// Advance within the example, roll into the second example at the end
    /// of the first, or finish the walkthrough at the end of the second.
    ///
    /// Dropped while a slide is in flight.
    ///
    /// # Errors
    ///
    /// Returns `WalkthroughError` when a backend call is needed and fails.
    pub async fn next_step(&mut self) -> Result<(), WalkthroughError> {
        if self.slide.in_flight() {
            return Ok(());
        }
        let Some(example) = &self.example else {
            return Ok(());
        };
        if self.current_step < example.total_steps() {
            let next = self.current_step + 1;
            self.show_step(next);
            Ok(())
        } else {
            match example.index() {
                ExampleIndex::First => {
                    self.load_example(ExampleIndex::Second, EntryStep::First)
                        .await
                }
                ExampleIndex::Second => self.complete_examples().await,
            }
        }
    }

    /// Step back, crossing into the previous example's last step at a
    /// boundary. Dropped while a slide is in flight; a no-op on the very
    /// first step.
    ///
    /// # Errors
    ///
    /// Returns `WalkthroughError` when re-fetching the first example fails.
    pub async fn prev_step(&mut self) -> Result<(), WalkthroughError> {
        if self.slide.in_flight() {
            return Ok(());
        }
        let Some(example) = &self.example else {
            return Ok(());
        };
        if self.current_step > 1 {
            let previous = self.current_step - 1;
            self.show_step(previous);
            Ok(())
        } else if example.index() == ExampleIndex::Second {
            self.load_example(ExampleIndex::First, EntryStep::Last).await
        } else {
            Ok(())
        }
    }

    /// Tell the backend the walkthrough is done and move to practice.
    ///
    /// # Errors
    ///
    /// Returns `WalkthroughError::Api` on request failure, or
    /// `WalkthroughError::NoDestination` when the backend does not confirm.
    pub async fn complete_examples(&mut self) -> Result<(), WalkthroughError> {
        let response = match self.api.complete_examples().await {
            Ok(response) => response,
            Err(err) => {
                self.view.show_banner(LOAD_FAILED_BANNER);
                return Err(err.into());
            }
        };
        if response.is_success() {
            self.view.navigate(PRACTICE_PATH);
            Ok(())
        } else {
            self.view.show_banner(LOAD_FAILED_BANNER);
            Err(WalkthroughError::NoDestination)
        }
    }

    /// Wipe the session on the backend and leave the lesson.
    ///
    /// # Errors
    ///
    /// Returns `WalkthroughError::Api` when the reset request fails.
    pub async fn reset_lesson(&mut self) -> Result<(), WalkthroughError> {
        let response = self.api.reset().await?;
        let destination = response.redirect.as_deref().unwrap_or("/");
        self.view.navigate(destination);
        Ok(())
    }

    /// The host finished (or failed) fetching the image for `generation`.
    pub fn on_image_loaded(&mut self, generation: u64, ok: bool) {
        if !ok {
            if generation == self.slide.generation() {
                self.slide.abort();
                if let Some(step) = self
                    .example
                    .as_ref()
                    .and_then(|e| e.step(self.current_step))
                {
                    let display = step.image.display_text.clone();
                    let annotation = step.image.annotation.clone();
                    warn!(step = self.current_step, "step image failed to load");
                    self.view.show_image_fallback(&display, &annotation);
                }
            }
            return;
        }
        if !self.slide.image_loaded(generation) {
            return;
        }
        let Some(example) = &self.example else {
            return;
        };
        let image = ImageRef {
            path: example.index().image_path(self.current_step),
            generation,
        };
        if self.has_image {
            self.view.begin_slide(image, self.pending_direction);
        } else {
            // First paint: no prior image to slide away from.
            self.has_image = true;
            self.view.place_image(image);
            let _ = self.slide.settled(generation);
        }
    }

    /// The settle delay for `generation` elapsed.
    pub fn on_settle_complete(&mut self, generation: u64) {
        let _ = self.slide.settled(generation);
    }

    /// Reveal the next narration character, if one is due.
    pub fn narration_tick(&mut self) {
        let generation = self.typewriter.generation();
        if let TypeEvent::Char(ch) = self.typewriter.tick(generation) {
            self.view.append_narration(ch);
        }
    }

    #[must_use]
    pub fn narration_active(&self) -> bool {
        self.typewriter.is_active()
    }

    fn show_step(&mut self, step: u32) {
        let Some(example) = &self.example else {
            error!("show_step without a loaded example");
            return;
        };
        let Some(step_data) = example.step(step) else {
            error!(step, total = example.total_steps(), "step out of range");
            return;
        };

        let slot = example.index();
        let total = example.total_steps();
        let narration = resolve_narration(step, &step_data.narration);
        let image_path = slot.image_path(step);

        self.pending_direction = Direction::between(self.last_step, step);
        self.current_step = step;
        self.last_step = step;

        self.view
            .set_progress(f64::from(walkthrough_percent(slot, step, total)));
        self.view.set_nav(NavState {
            prev_enabled: !(slot == ExampleIndex::First && step == 1),
            next_enabled: true,
            next_label: next_label(slot, step, total),
        });
        self.view.announce(&format!(
            "Example {}, step {step} of {total}",
            slot.number()
        ));

        self.view.clear_narration();
        self.typewriter.start(&narration);

        let generation = self.slide.begin();
        self.view.start_image_load(ImageRef {
            path: image_path,
            generation,
        });
    }
}

fn next_label(slot: ExampleIndex, step: u32, total: u32) -> &'static str {
    if step < total {
        "Next Step"
    } else if slot == ExampleIndex::First {
        "Continue"
    } else {
        "Complete Examples"
    }
}
