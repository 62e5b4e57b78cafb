//! Question records and difficulty tiers
//!
//! This module defines the immutable question data consumed by the session
//! core: the closed difficulty enumeration, the four-option question record
//! with its correctness invariant, and the errors reported at the question
//! repository boundary.

use std::fmt::Display;

use enum_map::Enum;
use serde::{Deserialize, Serialize};

use crate::constants;

/// Difficulty tier of a question
///
/// The declaration order is the fixed tier order used for progressive
/// selection: every easy question precedes every medium question precedes
/// every hard question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
pub enum Difficulty {
    /// Easy tier, worth the fewest points
    Easy,
    /// Medium tier
    Medium,
    /// Hard tier, worth the most points
    Hard,
}

impl Difficulty {
    /// All tiers in fixed ascending order
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Parses a difficulty label from tabular storage
    ///
    /// Labels are case-normalized before comparison. Unrecognized labels are
    /// rejected here rather than being allowed to silently fail difficulty
    /// filters later.
    ///
    /// # Errors
    ///
    /// Returns [`QuestionError::UnknownDifficulty`] if the label does not name
    /// a known tier.
    pub fn from_label(label: &str) -> Result<Self, QuestionError> {
        match label.trim().to_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(QuestionError::UnknownDifficulty(label.to_owned())),
        }
    }

    /// Points awarded for correctly answering a question of this tier
    pub fn points(self) -> u64 {
        match self {
            Self::Easy => constants::scoring::EASY_POINTS,
            Self::Medium => constants::scoring::MEDIUM_POINTS,
            Self::Hard => constants::scoring::HARD_POINTS,
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Easy => write!(f, "Easy"),
            Self::Medium => write!(f, "Medium"),
            Self::Hard => write!(f, "Hard"),
        }
    }
}

/// A single trivia question, immutable once loaded
///
/// Records are created by the question repository at load time and only read
/// afterwards. The constructor enforces that the correct option is one of the
/// four presented options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// The question text shown to players
    text: String,
    /// Difficulty tier, used for filtering, ordering and scoring
    difficulty: Difficulty,
    /// The four answer options, unordered
    options: [String; constants::question::OPTION_COUNT],
    /// The correct option, always equal to one of `options`
    correct_option: String,
    /// Explanation shown after the question is resolved
    explanation: String,
}

impl QuestionRecord {
    /// Creates a question record, checking the correctness invariant
    ///
    /// # Errors
    ///
    /// Returns [`QuestionError::CorrectOptionMissing`] if `correct_option`
    /// does not equal any of the four options.
    pub fn new(
        text: String,
        difficulty: Difficulty,
        options: [String; constants::question::OPTION_COUNT],
        correct_option: String,
        explanation: String,
    ) -> Result<Self, QuestionError> {
        if !options.contains(&correct_option) {
            return Err(QuestionError::CorrectOptionMissing { correct_option });
        }

        Ok(Self {
            text,
            difficulty,
            options,
            correct_option,
            explanation,
        })
    }

    /// Returns the question text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the difficulty tier
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Returns the four answer options in storage order
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Returns the correct option
    pub fn correct_option(&self) -> &str {
        &self.correct_option
    }

    /// Returns the explanation shown after answering
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Returns the four options in a fresh random order
    ///
    /// Recomputed for every question so repeated plays never leak the
    /// position of the correct option.
    pub fn shuffled_options(&self) -> Vec<String> {
        let mut options = self.options.to_vec();
        fastrand::shuffle(&mut options);
        options
    }
}

/// Errors detected while constructing question records
#[derive(Debug, Clone, thiserror::Error)]
pub enum QuestionError {
    /// The correct option is not among the four presented options
    #[error("correct option {correct_option:?} is not among the four options")]
    CorrectOptionMissing {
        /// The offending correct option
        correct_option: String,
    },
    /// A difficulty label from storage does not name a known tier
    #[error("unrecognized difficulty label {0:?}")]
    UnknownDifficulty(String),
}

/// Errors reported by the question repository collaborator
#[derive(Debug, Clone, thiserror::Error)]
pub enum RepositoryError {
    /// The repository yielded no questions at all; nothing is playable
    #[error("question repository yielded no questions")]
    NoQuestions,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn record(correct: &str) -> Result<QuestionRecord, QuestionError> {
        QuestionRecord::new(
            "Which book comes first?".to_owned(),
            Difficulty::Easy,
            [
                "Genesis".to_owned(),
                "Exodus".to_owned(),
                "Psalms".to_owned(),
                "Kings".to_owned(),
            ],
            correct.to_owned(),
            "Genesis opens the canon.".to_owned(),
        )
    }

    #[test]
    fn test_correct_option_must_be_among_options() {
        assert!(record("Genesis").is_ok());
        assert!(matches!(
            record("Proverbs"),
            Err(QuestionError::CorrectOptionMissing { correct_option }) if correct_option == "Proverbs"
        ));
    }

    #[test]
    fn test_from_label_case_normalization() {
        assert_eq!(Difficulty::from_label("EASY").unwrap(), Difficulty::Easy);
        assert_eq!(Difficulty::from_label(" medium ").unwrap(), Difficulty::Medium);
        assert_eq!(Difficulty::from_label("Hard").unwrap(), Difficulty::Hard);
        assert!(matches!(
            Difficulty::from_label("legendary"),
            Err(QuestionError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn test_points_table() {
        assert_eq!(Difficulty::Easy.points(), 5);
        assert_eq!(Difficulty::Medium.points(), 10);
        assert_eq!(Difficulty::Hard.points(), 15);
    }

    #[test]
    fn test_shuffled_options_is_a_permutation() {
        let record = record("Genesis").unwrap();
        let mut shuffled = record.shuffled_options();
        shuffled.sort();
        let mut original = record.options().to_vec();
        original.sort();
        assert_eq!(shuffled, original);
    }
}
