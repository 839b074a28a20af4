//! Slide-transition state machine for the walkthrough image panel.
//!
//! A step change runs `Idle -> Loading -> Settling -> Idle`. Navigation is
//! dropped, not queued, while a transition is in flight; the generation
//! counter discards callbacks from a transition that has been superseded.

use std::time::Duration;

/// How long the host should let a slide settle before reporting back.
pub const SETTLE_DURATION: Duration = Duration::from_millis(550);

/// Marker for "the previous position is to the right of here", used when
/// stepping back across an example boundary.
pub const FROM_AHEAD: u32 = u32::MAX;

/// Which side a new step image slides in from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Derive the slide direction from where the page was and where it is
    /// going. A fresh page (`last == 0`) always slides forward.
    #[must_use]
    pub fn between(last_step: u32, current_step: u32) -> Self {
        if last_step == 0 || current_step > last_step {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Loading,
    Settling,
}

#[derive(Debug)]
pub struct SlideTransition {
    phase: Phase,
    generation: u64,
}

impl Default for SlideTransition {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            generation: 0,
        }
    }
}

impl SlideTransition {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new transition, superseding any in flight. Returns the
    /// generation that tags its callbacks.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.phase = Phase::Loading;
        self.generation
    }

    /// The image for generation `generation` finished loading. Returns
    /// `true` when the transition should proceed to its settle phase;
    /// `false` means the callback was stale and must be ignored.
    pub fn image_loaded(&mut self, generation: u64) -> bool {
        if generation == self.generation && self.phase == Phase::Loading {
            self.phase = Phase::Settling;
            true
        } else {
            false
        }
    }

    /// The settle delay for generation `generation` elapsed. Returns `true`
    /// when this completes the current transition.
    pub fn settled(&mut self, generation: u64) -> bool {
        if generation == self.generation && self.phase == Phase::Settling {
            self.phase = Phase::Idle;
            true
        } else {
            false
        }
    }

    /// Abandon the current transition (load failure).
    pub fn abort(&mut self) {
        self.phase = Phase::Idle;
    }

    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.phase != Phase::Idle
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
