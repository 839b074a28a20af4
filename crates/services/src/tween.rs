//! Eased progress-bar animation.
//!
//! The bar glides from its displayed value to the latest target over a
//! fixed number of ticks and lands exactly on the target, never on a
//! rounding neighbour. Retargeting mid-flight restarts the glide from the
//! currently displayed value.

use std::time::Duration;

const TWEEN_TICKS: u32 = 30;

/// Cadence the host should tick an active tween at (~800ms total).
pub const PROGRESS_TICK: Duration = Duration::from_millis(27);

#[derive(Debug)]
pub struct ProgressTween {
    current: f64,
    target: f64,
    remaining: u32,
}

impl ProgressTween {
    #[must_use]
    pub fn new(initial: f64) -> Self {
        Self {
            current: initial,
            target: initial,
            remaining: 0,
        }
    }

    /// Begin gliding toward `target` from the displayed value.
    pub fn retarget(&mut self, target: f64) {
        if (target - self.current).abs() < f64::EPSILON {
            self.target = target;
            self.remaining = 0;
            return;
        }
        self.target = target;
        self.remaining = TWEEN_TICKS;
    }

    /// Advance one frame. Returns the value to display, or `None` when the
    /// tween is at rest and the host can stop ticking.
    pub fn tick(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.current = self.target;
        } else {
            let step = (self.target - self.current) / f64::from(self.remaining + 1);
            self.current += step;
        }
        Some(self.current)
    }

    #[must_use]
    pub fn displayed(&self) -> f64 {
        self.current
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.remaining > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lands_exactly_on_target() {
        let mut tween = ProgressTween::new(20.0);
        tween.retarget(30.0);

        let mut last = None;
        while let Some(value) = tween.tick() {
            last = Some(value);
        }
        assert_eq!(last, Some(30.0));
        assert!(!tween.is_animating());
    }

    #[test]
    fn values_are_monotonic_toward_target() {
        let mut tween = ProgressTween::new(40.0);
        tween.retarget(70.0);

        let mut previous = 40.0;
        while let Some(value) = tween.tick() {
            assert!(value >= previous);
            assert!(value <= 70.0);
            previous = value;
        }
    }

    #[test]
    fn retarget_mid_flight_restarts_from_displayed() {
        let mut tween = ProgressTween::new(20.0);
        tween.retarget(100.0);
        for _ in 0..10 {
            tween.tick();
        }
        let mid = tween.displayed();
        assert!(mid > 20.0 && mid < 100.0);

        tween.retarget(mid - 5.0);
        let mut last = mid;
        while let Some(value) = tween.tick() {
            last = value;
        }
        assert_eq!(last, mid - 5.0);
    }

    #[test]
    fn same_target_is_a_no_op() {
        let mut tween = ProgressTween::new(50.0);
        tween.retarget(50.0);
        assert_eq!(tween.tick(), None);
    }
}
