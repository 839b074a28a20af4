//! Character-at-a-time narration reveal.
//!
//! Purely tick-driven: the host owns the timer and calls
//! [`Typewriter::tick`] with the generation it was started with, so text
//! replaced mid-animation never leaks stale characters.

use std::time::Duration;

/// Cadence the host should tick an active typewriter at.
pub const TYPE_TICK: Duration = Duration::from_millis(40);

/// What a tick produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeEvent {
    /// Reveal this character.
    Char(char),
    /// The full text has been revealed; stop ticking.
    Done,
    /// The tick was stale or nothing is animating.
    Idle,
}

#[derive(Debug, Default)]
pub struct Typewriter {
    chars: Vec<char>,
    cursor: usize,
    generation: u64,
    active: bool,
}

impl Typewriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin revealing `text` from the start, cancelling any run in
    /// progress. Returns the generation the host must tick with.
    pub fn start(&mut self, text: &str) -> u64 {
        self.chars = text.chars().collect();
        self.cursor = 0;
        self.generation += 1;
        self.active = true;
        self.generation
    }

    /// Stop without finishing; subsequent ticks report [`TypeEvent::Idle`].
    pub fn cancel(&mut self) {
        self.active = false;
        self.generation += 1;
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Advance one character, if `generation` still names the current run.
    pub fn tick(&mut self, generation: u64) -> TypeEvent {
        if !self.active || generation != self.generation {
            return TypeEvent::Idle;
        }
        match self.chars.get(self.cursor) {
            Some(&ch) => {
                self.cursor += 1;
                TypeEvent::Char(ch)
            }
            None => {
                self.active = false;
                TypeEvent::Done
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveals_every_char_then_finishes() {
        let mut tw = Typewriter::new();
        let generation = tw.start("hi");
        assert_eq!(tw.tick(generation), TypeEvent::Char('h'));
        assert_eq!(tw.tick(generation), TypeEvent::Char('i'));
        assert_eq!(tw.tick(generation), TypeEvent::Done);
        assert_eq!(tw.tick(generation), TypeEvent::Idle);
    }

    #[test]
    fn restart_invalidates_old_ticks() {
        let mut tw = Typewriter::new();
        let old = tw.start("abcdef");
        assert_eq!(tw.tick(old), TypeEvent::Char('a'));

        let new = tw.start("xy");
        assert_eq!(tw.tick(old), TypeEvent::Idle);
        assert_eq!(tw.tick(new), TypeEvent::Char('x'));
    }

    #[test]
    fn cancel_goes_idle() {
        let mut tw = Typewriter::new();
        let generation = tw.start("text");
        tw.cancel();
        assert!(!tw.is_active());
        assert_eq!(tw.tick(generation), TypeEvent::Idle);
    }

    #[test]
    fn handles_multibyte_text() {
        let mut tw = Typewriter::new();
        let generation = tw.start("½≈");
        assert_eq!(tw.tick(generation), TypeEvent::Char('½'));
        assert_eq!(tw.tick(generation), TypeEvent::Char('≈'));
        assert_eq!(tw.tick(generation), TypeEvent::Done);
    }
}
