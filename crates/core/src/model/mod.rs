pub mod example;
pub mod learning_state;
pub mod question;
pub mod stage;

pub use example::{ExampleError, ExampleIndex, LessonExample, LessonStep, StepImage};
pub use learning_state::LearningState;
pub use question::{Choice, PracticeQuestion, QuestionError};
pub use stage::{Stage, StageParseError};
