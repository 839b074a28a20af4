use serde::{Deserialize, Serialize};

use crate::model::Stage;

/// Client-side cache of the server's learning state.
///
/// The server is authoritative: every successful response overwrites this
/// wholesale ("server wins"). The default is the locally-seeded state used
/// when the backend cannot be reached at page load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningState {
    pub stage: Stage,
    pub questions_attempted: u32,
    pub correct_answers: u32,
    pub consecutive_correct: u32,
    pub showing_example: bool,
}

impl Default for LearningState {
    fn default() -> Self {
        Self {
            stage: Stage::Practice11,
            questions_attempted: 0,
            correct_answers: 0,
            consecutive_correct: 0,
            showing_example: false,
        }
    }
}

impl LearningState {
    /// Local fallback bookkeeping for one answered question, used only when
    /// the server response omits a learning state.
    pub fn record_answer(&mut self, is_correct: bool) {
        self.questions_attempted += 1;
        if is_correct {
            self.correct_answers += 1;
            self.consecutive_correct += 1;
        } else {
            self.consecutive_correct = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_resets_streak() {
        let mut state = LearningState::default();
        state.record_answer(true);
        state.record_answer(true);
        assert_eq!(state.consecutive_correct, 2);
        assert_eq!(state.correct_answers, 2);

        state.record_answer(false);
        assert_eq!(state.consecutive_correct, 0);
        assert_eq!(state.correct_answers, 2);
        assert_eq!(state.questions_attempted, 3);
    }
}
