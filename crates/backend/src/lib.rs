#![forbid(unsafe_code)]

//! The remote lesson service seam.
//!
//! The HTTP API is an external collaborator; this crate owns its wire
//! shapes, the [`LessonApi`] trait the controllers program against, the
//! retrying `reqwest` implementation, and a scripted fake for tests.

pub mod api;
pub mod fake;
pub mod http;
pub mod wire;

pub use api::{ApiError, LessonApi};
pub use fake::FakeLessonApi;
pub use http::{HttpLessonApi, RetryPolicy};
