//! The shared lesson progress model.
//!
//! Progress is a 0–100 figure derived from a fixed milestone table plus a
//! micro-progress interpolation inside the current milestone's 10-point
//! band. Both page controllers use the same table so the bar never jumps
//! when the student moves between examples and practice.

use crate::model::{ExampleIndex, LearningState, Stage};

/// Width of the interpolation band above each milestone's base value.
pub const STAGE_BAND: f32 = 10.0;

/// The practice page never reports below this, even for unknown stages.
const FLOOR: f32 = 20.0;
const CEIL: f32 = 100.0;

/// Base percentage for a milestone.
#[must_use]
pub fn base_percent(stage: Stage) -> f32 {
    match stage {
        Stage::Example11 => 10.0,
        Stage::Example12 => 20.0,
        Stage::Practice11 => 30.0,
        Stage::Practice12 => 40.0,
        Stage::Practice13 => 50.0,
        Stage::Example21 => 60.0,
        Stage::Example22 => 70.0,
        Stage::Practice21 => 80.0,
        Stage::Practice22 => 90.0,
        Stage::Stretch | Stage::Complete => 100.0,
    }
}

fn banded(base: f32, micro: f32) -> f32 {
    (base + micro.clamp(0.0, 1.0) * STAGE_BAND).min(CEIL)
}

/// Progress while walking through a worked example.
///
/// Interpolates `(current_step - 1) / total_steps` across the band above the
/// example's milestone base. `total_steps == 0` reports the bare base.
#[must_use]
pub fn walkthrough_percent(example: ExampleIndex, current_step: u32, total_steps: u32) -> f32 {
    let stage = match example {
        ExampleIndex::First => Stage::Example11,
        ExampleIndex::Second => Stage::Example12,
    };
    let base = base_percent(stage);
    if total_steps == 0 {
        return base;
    }
    let done = current_step.saturating_sub(1).min(total_steps);
    banded(base, done as f32 / total_steps as f32)
}

/// Progress for the practice page, from server-reported learning state.
///
/// While the server says an example is being shown, the figure sits on the
/// corresponding milestone base. In practice mode, `consecutive_correct`
/// against the stage's required count fills the band; hitting the required
/// count lands exactly on the next milestone's base.
#[must_use]
pub fn practice_percent(state: &LearningState) -> f32 {
    if state.showing_example {
        // Stage 2.1 with examples showing means the second example set.
        let base = if state.stage == Stage::Practice21 {
            base_percent(Stage::Example21)
        } else {
            base_percent(state.stage)
        };
        return base.clamp(FLOOR, CEIL);
    }

    let required = state.stage.required_consecutive().max(1);
    banded(
        base_percent(state.stage),
        state.consecutive_correct as f32 / required as f32,
    )
    .clamp(FLOOR, CEIL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn practice_state(stage: Stage, consecutive: u32) -> LearningState {
        LearningState {
            stage,
            consecutive_correct: consecutive,
            ..LearningState::default()
        }
    }

    #[test]
    fn walkthrough_starts_on_milestone_base() {
        let p = walkthrough_percent(ExampleIndex::First, 1, 3);
        assert!((p - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn walkthrough_fills_band_per_step() {
        let p = walkthrough_percent(ExampleIndex::First, 3, 3);
        assert!((p - (10.0 + 2.0 / 3.0 * STAGE_BAND)).abs() < 0.001);
        let second = walkthrough_percent(ExampleIndex::Second, 1, 3);
        assert!((second - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn one_correct_in_stage_one_one_reaches_next_base() {
        assert!((practice_percent(&practice_state(Stage::Practice11, 0)) - 30.0).abs() < 0.001);
        assert!((practice_percent(&practice_state(Stage::Practice11, 1)) - 40.0).abs() < 0.001);
    }

    #[test]
    fn streak_progress_is_monotonic() {
        for stage in [Stage::Practice11, Stage::Practice12, Stage::Practice13] {
            let required = stage.required_consecutive();
            let mut last = 0.0;
            for consecutive in 0..=required {
                let p = practice_percent(&practice_state(stage, consecutive));
                assert!(p >= last, "{stage} dipped at streak {consecutive}");
                last = p;
            }
            // Hitting the requirement lands exactly one band up.
            assert!((last - (base_percent(stage) + STAGE_BAND)).abs() < 0.001);
        }
    }

    #[test]
    fn overflowing_streak_is_capped_at_one_band() {
        let p = practice_percent(&practice_state(Stage::Practice13, 9));
        assert!((p - 60.0).abs() < 0.001);
    }

    #[test]
    fn showing_example_pins_to_example_base() {
        let mut state = practice_state(Stage::Practice21, 3);
        state.showing_example = true;
        assert!((practice_percent(&state) - 60.0).abs() < 0.001);

        let mut early = practice_state(Stage::Example12, 0);
        early.showing_example = true;
        assert!((practice_percent(&early) - 20.0).abs() < 0.001);
    }

    #[test]
    fn complete_is_full_bar() {
        let p = practice_percent(&practice_state(Stage::Complete, 0));
        assert!((p - 100.0).abs() < f32::EPSILON);
    }
}
