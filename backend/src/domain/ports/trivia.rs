//! Driving ports for the trivia API.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{
    Category, CategoryId, Error, NewQuestion, Question, QuestionId, QuizDraw, QuizRound, SearchTerm,
};

/// A page of questions together with every category, as served by the
/// question browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionListing {
    pub questions: Page<Question>,
    pub categories: Vec<Category>,
}

/// Read side of the trivia API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TriviaQuery: Send + Sync {
    /// Every category.
    async fn categories(&self) -> Result<Vec<Category>, Error>;

    /// One page of all questions; an empty page is not found.
    async fn questions(&self, request: PageRequest) -> Result<QuestionListing, Error>;

    /// One page of questions whose text contains the term.
    async fn search_questions(
        &self,
        term: &SearchTerm,
        request: PageRequest,
    ) -> Result<Page<Question>, Error>;

    /// One page of a category's questions; an empty page is not found.
    async fn category_questions(
        &self,
        category: CategoryId,
        request: PageRequest,
    ) -> Result<Page<Question>, Error>;

    /// Next quiz question, excluding those already asked.
    async fn next_quiz_question(&self, round: QuizRound) -> Result<QuizDraw, Error>;
}

/// Write side of the trivia API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TriviaCommand: Send + Sync {
    /// Add a question.
    async fn create_question(&self, question: NewQuestion) -> Result<Question, Error>;

    /// Remove a question.
    async fn delete_question(&self, id: QuestionId) -> Result<QuestionId, Error>;
}
