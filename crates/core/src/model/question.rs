use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("question has no answer choices")]
    NoChoices,
    #[error("correct letter {0:?} is not among the choices")]
    UnknownCorrectLetter(String),
}

/// One multiple-choice option, keyed by its letter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub letter: String,
    pub text: String,
}

/// A server-supplied multiple-choice question, replaced on every fetch.
///
/// Choices keep the wire's insertion order, which is also display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeQuestion {
    question_text: String,
    choices: Vec<Choice>,
    correct_letter: String,
}

impl PracticeQuestion {
    /// # Errors
    ///
    /// Returns `QuestionError::NoChoices` for an empty choice list and
    /// `QuestionError::UnknownCorrectLetter` when `correct_letter` does not
    /// name one of the choices.
    pub fn new(
        question_text: impl Into<String>,
        choices: Vec<Choice>,
        correct_letter: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        if choices.is_empty() {
            return Err(QuestionError::NoChoices);
        }
        let correct_letter = correct_letter.into();
        if !choices.iter().any(|c| c.letter == correct_letter) {
            return Err(QuestionError::UnknownCorrectLetter(correct_letter));
        }
        Ok(Self {
            question_text: question_text.into(),
            choices,
            correct_letter,
        })
    }

    #[must_use]
    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    #[must_use]
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    #[must_use]
    pub fn correct_letter(&self) -> &str {
        &self.correct_letter
    }

    #[must_use]
    pub fn choice(&self, letter: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.letter == letter)
    }

    #[must_use]
    pub fn is_correct(&self, letter: &str) -> bool {
        self.correct_letter == letter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices() -> Vec<Choice> {
        ["a", "b", "c"]
            .into_iter()
            .map(|letter| Choice {
                letter: letter.to_string(),
                text: format!("answer {letter}"),
            })
            .collect()
    }

    #[test]
    fn preserves_choice_order() {
        let q = PracticeQuestion::new("Round 2.47 to 1 decimal place", choices(), "b").unwrap();
        let letters: Vec<_> = q.choices().iter().map(|c| c.letter.as_str()).collect();
        assert_eq!(letters, ["a", "b", "c"]);
        assert!(q.is_correct("b"));
        assert!(!q.is_correct("a"));
    }

    #[test]
    fn correct_letter_must_exist() {
        let err = PracticeQuestion::new("q", choices(), "z").unwrap_err();
        assert_eq!(err, QuestionError::UnknownCorrectLetter("z".to_string()));
    }

    #[test]
    fn empty_choices_rejected() {
        let err = PracticeQuestion::new("q", Vec::new(), "a").unwrap_err();
        assert_eq!(err, QuestionError::NoChoices);
    }
}
