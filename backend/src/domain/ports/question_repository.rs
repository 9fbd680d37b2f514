//! Driven ports for trivia questions and categories.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Category, CategoryId, NewQuestion, Question, QuestionFilter, QuestionId, QuizCategory};

use super::define_port_error;

define_port_error! {
    /// Errors raised by trivia persistence adapters.
    pub enum TriviaRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "trivia repository connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } => "trivia repository query failed: {message}",
        /// No question has the given id.
        QuestionNotFound { id: i32 } => "question {id} not found",
        /// The referenced category does not exist.
        UnknownCategory { id: i32 } => "category {id} does not exist",
    }
}

/// Port for reading and writing trivia questions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// One page of questions matching `filter`, ordered by id.
    ///
    /// The page total is the size of the matching set.
    async fn page(
        &self,
        filter: &QuestionFilter,
        request: PageRequest,
    ) -> Result<Page<Question>, TriviaRepositoryError>;

    /// Every question eligible for a quiz round.
    async fn quiz_candidates(
        &self,
        category: QuizCategory,
    ) -> Result<Vec<Question>, TriviaRepositoryError>;

    /// Insert a question.
    async fn create(&self, question: &NewQuestion) -> Result<Question, TriviaRepositoryError>;

    /// Delete a question.
    async fn delete(&self, id: QuestionId) -> Result<(), TriviaRepositoryError>;
}

/// Port for reading trivia categories.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Every category, ordered by id.
    async fn list(&self) -> Result<Vec<Category>, TriviaRepositoryError>;

    /// One category.
    async fn find(&self, id: CategoryId) -> Result<Option<Category>, TriviaRepositoryError>;
}
