use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExampleError {
    #[error("example has no steps")]
    NoSteps,
    #[error("example declares {declared} steps but carries {actual}")]
    StepCountMismatch { declared: u32, actual: u32 },
}

/// Which of the two worked examples a walkthrough is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExampleIndex {
    First,
    Second,
}

impl ExampleIndex {
    /// 1-based example number as shown to the student.
    #[must_use]
    pub fn number(&self) -> u32 {
        match self {
            ExampleIndex::First => 1,
            ExampleIndex::Second => 2,
        }
    }

    #[must_use]
    pub fn from_number(n: u32) -> Option<Self> {
        match n {
            1 => Some(ExampleIndex::First),
            2 => Some(ExampleIndex::Second),
            _ => None,
        }
    }

    /// The endpoint path segment for this example (`first` / `second`).
    #[must_use]
    pub fn slug(&self) -> &'static str {
        match self {
            ExampleIndex::First => "first",
            ExampleIndex::Second => "second",
        }
    }

    /// Convention path for a step image asset, e.g.
    /// `/static/images/stage1_1_step2.jpg`.
    #[must_use]
    pub fn image_path(&self, step: u32) -> String {
        format!("/static/images/stage1_{}_step{step}.jpg", self.number())
    }
}

/// Whiteboard content for one step: the big display string plus its caption.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepImage {
    pub display_text: String,
    pub annotation: String,
    pub highlight_position: String,
}

/// One step of a worked example. Read-only once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonStep {
    pub image: StepImage,
    pub narration: String,
}

/// A complete worked example as served by the backend.
///
/// Immutable once constructed; navigating to a different example replaces
/// the whole value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonExample {
    index: ExampleIndex,
    question_text: String,
    steps: Vec<LessonStep>,
}

impl LessonExample {
    /// Build an example from server data, checking the declared step count.
    ///
    /// # Errors
    ///
    /// Returns `ExampleError::NoSteps` for an empty step list and
    /// `ExampleError::StepCountMismatch` when `total_steps` disagrees with
    /// the steps actually present.
    pub fn new(
        index: ExampleIndex,
        question_text: impl Into<String>,
        total_steps: u32,
        steps: Vec<LessonStep>,
    ) -> Result<Self, ExampleError> {
        if steps.is_empty() {
            return Err(ExampleError::NoSteps);
        }
        let actual = u32::try_from(steps.len()).unwrap_or(u32::MAX);
        if total_steps != actual {
            return Err(ExampleError::StepCountMismatch {
                declared: total_steps,
                actual,
            });
        }
        Ok(Self {
            index,
            question_text: question_text.into(),
            steps,
        })
    }

    #[must_use]
    pub fn index(&self) -> ExampleIndex {
        self.index
    }

    #[must_use]
    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    #[must_use]
    pub fn total_steps(&self) -> u32 {
        u32::try_from(self.steps.len()).unwrap_or(u32::MAX)
    }

    /// 1-based step lookup; out-of-range indices return `None`.
    #[must_use]
    pub fn step(&self, n: u32) -> Option<&LessonStep> {
        if n == 0 {
            return None;
        }
        self.steps.get(n as usize - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(text: &str) -> LessonStep {
        LessonStep {
            image: StepImage::default(),
            narration: text.to_string(),
        }
    }

    #[test]
    fn step_lookup_is_one_based() {
        let example = LessonExample::new(
            ExampleIndex::First,
            "Round 12.632 to 1 decimal place",
            2,
            vec![step("first"), step("second")],
        )
        .unwrap();

        assert_eq!(example.step(1).unwrap().narration, "first");
        assert_eq!(example.step(2).unwrap().narration, "second");
        assert!(example.step(0).is_none());
        assert!(example.step(3).is_none());
    }

    #[test]
    fn declared_count_must_match() {
        let err = LessonExample::new(ExampleIndex::Second, "q", 3, vec![step("only")]).unwrap_err();
        assert_eq!(
            err,
            ExampleError::StepCountMismatch {
                declared: 3,
                actual: 1
            }
        );
    }

    #[test]
    fn image_paths_follow_convention() {
        assert_eq!(
            ExampleIndex::First.image_path(2),
            "/static/images/stage1_1_step2.jpg"
        );
        assert_eq!(
            ExampleIndex::Second.image_path(3),
            "/static/images/stage1_2_step3.jpg"
        );
    }
}
