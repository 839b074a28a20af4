use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown lesson stage id: {0:?}")]
pub struct StageParseError(pub String);

/// A named milestone in the lesson sequence.
///
/// Stage ids are server-assigned strings: worked examples use the
/// `example_<section>_<slot>` form, practice stages the bare `"1.1"` form.
/// The two closing milestones are `"stretch"` and `"complete"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Stage {
    Example11,
    Example12,
    Practice11,
    Practice12,
    Practice13,
    Example21,
    Example22,
    Practice21,
    Practice22,
    Stretch,
    Complete,
}

impl Stage {
    /// The server's string id for this stage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Example11 => "example_1_1",
            Stage::Example12 => "example_1_2",
            Stage::Practice11 => "1.1",
            Stage::Practice12 => "1.2",
            Stage::Practice13 => "1.3",
            Stage::Example21 => "example_2_1",
            Stage::Example22 => "example_2_2",
            Stage::Practice21 => "2.1",
            Stage::Practice22 => "2.2",
            Stage::Stretch => "stretch",
            Stage::Complete => "complete",
        }
    }

    /// Consecutive correct answers required to clear this practice stage.
    ///
    /// Example and closing milestones report 1 so micro-progress math stays
    /// well-defined for any stage.
    #[must_use]
    pub fn required_consecutive(&self) -> u32 {
        match self {
            Stage::Practice13 => 2,
            _ => 1,
        }
    }

    /// True for the worked-example milestones.
    #[must_use]
    pub fn is_example(&self) -> bool {
        matches!(
            self,
            Stage::Example11 | Stage::Example12 | Stage::Example21 | Stage::Example22
        )
    }

    /// True once the lesson has nothing further to serve.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Stage::Complete)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = StageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "example_1_1" => Ok(Stage::Example11),
            "example_1_2" => Ok(Stage::Example12),
            "1.1" => Ok(Stage::Practice11),
            "1.2" => Ok(Stage::Practice12),
            "1.3" => Ok(Stage::Practice13),
            "example_2_1" => Ok(Stage::Example21),
            "example_2_2" => Ok(Stage::Example22),
            "2.1" => Ok(Stage::Practice21),
            "2.2" => Ok(Stage::Practice22),
            "stretch" => Ok(Stage::Stretch),
            "complete" => Ok(Stage::Complete),
            other => Err(StageParseError(other.to_string())),
        }
    }
}

impl TryFrom<String> for Stage {
    type Error = StageParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Stage> for String {
    fn from(stage: Stage) -> Self {
        stage.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Stage; 11] = [
        Stage::Example11,
        Stage::Example12,
        Stage::Practice11,
        Stage::Practice12,
        Stage::Practice13,
        Stage::Example21,
        Stage::Example22,
        Stage::Practice21,
        Stage::Practice22,
        Stage::Stretch,
        Stage::Complete,
    ];

    #[test]
    fn ids_round_trip() {
        for stage in ALL {
            assert_eq!(stage.as_str().parse::<Stage>().unwrap(), stage);
        }
    }

    #[test]
    fn unknown_id_is_rejected() {
        let err = "3.1".parse::<Stage>().unwrap_err();
        assert_eq!(err, StageParseError("3.1".to_string()));
    }

    #[test]
    fn mixed_practice_stage_needs_two_in_a_row() {
        assert_eq!(Stage::Practice13.required_consecutive(), 2);
        assert_eq!(Stage::Practice11.required_consecutive(), 1);
        assert_eq!(Stage::Stretch.required_consecutive(), 1);
    }
}
