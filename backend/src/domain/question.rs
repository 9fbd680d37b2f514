//! Trivia questions and categories.

use serde_json::json;
use thiserror::Error;

use super::profile::{ProfileValidationError, require_text};
use super::search::SearchTerm;
use super::{CategoryId, QuestionId};

/// A trivia category, e.g. "Science" or "Art".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    /// Category label, serialised as `type` on the wire.
    pub kind: String,
}

/// Question difficulty, from 1 (easiest) to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Difficulty(u8);

impl Difficulty {
    /// Lowest accepted difficulty.
    pub const MIN: u8 = 1;
    /// Highest accepted difficulty.
    pub const MAX: u8 = 5;

    /// Validate a raw difficulty.
    ///
    /// # Errors
    /// Returns [`QuestionValidationError::DifficultyOutOfRange`] outside `1..=5`.
    pub fn new(raw: i64) -> Result<Self, QuestionValidationError> {
        u8::try_from(raw)
            .ok()
            .filter(|value| (Self::MIN..=Self::MAX).contains(value))
            .map(Self)
            .ok_or(QuestionValidationError::DifficultyOutOfRange { raw })
    }

    /// Raw difficulty value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// A persisted trivia question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub answer: String,
    pub difficulty: Difficulty,
    pub category: CategoryId,
}

/// Validation failures for new questions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionValidationError {
    /// A required text field was blank.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Wire name of the offending field.
        field: &'static str,
    },
    /// Difficulty outside `1..=5`.
    #[error("difficulty must be between 1 and 5, got {raw}")]
    DifficultyOutOfRange {
        /// Submitted value.
        raw: i64,
    },
}

impl QuestionValidationError {
    /// Wire name of the offending field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyField { field } => field,
            Self::DifficultyOutOfRange { .. } => "difficulty",
        }
    }
}

impl QuestionValidationError {
    const fn code(&self) -> &'static str {
        match self {
            Self::EmptyField { .. } => "empty_field",
            Self::DifficultyOutOfRange { .. } => "out_of_range",
        }
    }
}

impl From<QuestionValidationError> for super::Error {
    fn from(value: QuestionValidationError) -> Self {
        Self::invalid_request(value.to_string())
            .with_details(json!({ "field": value.field(), "code": value.code() }))
    }
}

impl From<ProfileValidationError> for QuestionValidationError {
    fn from(value: ProfileValidationError) -> Self {
        Self::EmptyField {
            field: value.field(),
        }
    }
}

/// Unvalidated question input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub text: String,
    pub answer: String,
    pub difficulty: i64,
    pub category: CategoryId,
}

/// Validated question ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub text: String,
    pub answer: String,
    pub difficulty: Difficulty,
    pub category: CategoryId,
}

impl TryFrom<QuestionDraft> for NewQuestion {
    type Error = QuestionValidationError;

    fn try_from(draft: QuestionDraft) -> Result<Self, Self::Error> {
        Ok(Self {
            text: require_text(draft.text, "question")?,
            answer: require_text(draft.answer, "answer")?,
            difficulty: Difficulty::new(draft.difficulty)?,
            category: draft.category,
        })
    }
}

/// Which questions a paginated listing draws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionFilter {
    /// Every question.
    All,
    /// Questions in one category.
    Category(CategoryId),
    /// Questions whose text contains the term.
    Search(SearchTerm),
}

impl QuestionFilter {
    /// In-memory predicate equivalent to the storage query.
    #[must_use]
    pub fn accepts(&self, question: &Question) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => question.category == *category,
            Self::Search(term) => term.matches(&question.text),
        }
    }
}
