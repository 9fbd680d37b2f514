//! Quiz question sampling.
//!
//! A quiz round asks for one more question from a category (or from every
//! category) that has not been asked yet. Sampling is uniform over the
//! remaining candidates; the random source is injected so tests can seed it.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use super::{CategoryId, Question, QuestionId};

/// Category selector for a quiz round. Category id 0 selects every category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizCategory {
    /// Draw from every question.
    All,
    /// Draw only from one category.
    Only(CategoryId),
}

impl QuizCategory {
    /// Interpret a category id from a quiz request.
    ///
    /// # Examples
    /// ```
    /// use trio::domain::{CategoryId, QuizCategory};
    ///
    /// assert_eq!(QuizCategory::from_id(0), QuizCategory::All);
    /// assert_eq!(QuizCategory::from_id(3), QuizCategory::Only(CategoryId::new(3)));
    /// ```
    #[must_use]
    pub fn from_id(id: i32) -> Self {
        if id == 0 {
            Self::All
        } else {
            Self::Only(CategoryId::new(id))
        }
    }
}

/// A request for the next quiz question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRound {
    pub category: QuizCategory,
    pub previous_questions: HashSet<QuestionId>,
}

/// Outcome of a quiz draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizDraw {
    /// A question that has not been asked yet.
    Question(Question),
    /// Every candidate has already been asked.
    Exhausted,
}

/// Draw one not-yet-asked question uniformly at random.
#[must_use]
pub fn draw<R>(candidates: Vec<Question>, previous: &HashSet<QuestionId>, rng: &mut R) -> QuizDraw
where
    R: Rng + ?Sized,
{
    let remaining: Vec<Question> = candidates
        .into_iter()
        .filter(|question| !previous.contains(&question.id))
        .collect();
    remaining
        .choose(rng)
        .cloned()
        .map_or(QuizDraw::Exhausted, QuizDraw::Question)
}
