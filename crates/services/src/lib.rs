#![forbid(unsafe_code)]

//! Page controllers for the decimal-rounding lesson.
//!
//! Two controllers drive the two lesson pages: [`WalkthroughController`]
//! for the worked examples and [`PracticeController`] for the question
//! loop. Both are event-driven: the host delivers user input, completed
//! image loads, and timer ticks; the controllers mutate their view through
//! the traits in [`render`] and talk to the backend through
//! `backend::LessonApi`. No hidden timers, no global state.

pub mod error;
pub mod practice;
pub mod render;
pub mod transition;
pub mod tween;
pub mod typewriter;
pub mod walkthrough;

pub use lesson_core::time::Clock;

pub use error::{PracticeError, WalkthroughError};
pub use practice::PracticeController;
pub use walkthrough::WalkthroughController;
