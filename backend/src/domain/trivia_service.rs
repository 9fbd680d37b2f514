//! Trivia domain service.
//!
//! Implements [`TriviaQuery`] and [`TriviaCommand`] over the question and
//! category repositories. Quiz draws use an injected random source guarded
//! by a mutex so the service stays `Sync`.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::domain::ports::{
    CategoryRepository, QuestionListing, QuestionRepository, TriviaCommand, TriviaQuery,
    TriviaRepositoryError,
};
use crate::domain::quiz::draw;
use crate::domain::{
    Category, CategoryId, Error, NewQuestion, Question, QuestionFilter, QuestionId, QuizCategory,
    QuizDraw, QuizRound, SearchTerm,
};

/// Trivia service implementing the trivia driving ports.
pub struct TriviaService<Q, C> {
    questions: Arc<Q>,
    categories: Arc<C>,
    rng: Mutex<StdRng>,
}

impl<Q, C> TriviaService<Q, C> {
    /// Create a service whose quiz draws are seeded from OS entropy.
    #[must_use]
    pub fn new(questions: Arc<Q>, categories: Arc<C>) -> Self {
        Self::with_rng(questions, categories, StdRng::from_entropy())
    }

    /// Create a service with an explicit random source.
    #[must_use]
    pub fn with_rng(questions: Arc<Q>, categories: Arc<C>, rng: StdRng) -> Self {
        Self {
            questions,
            categories,
            rng: Mutex::new(rng),
        }
    }
}

fn map_trivia_error(error: TriviaRepositoryError) -> Error {
    match error {
        TriviaRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("trivia repository unavailable: {message}"))
        }
        TriviaRepositoryError::Query { message } => {
            Error::internal(format!("trivia repository error: {message}"))
        }
        TriviaRepositoryError::QuestionNotFound { id } => {
            Error::not_found(format!("question {id} not found"))
        }
        TriviaRepositoryError::UnknownCategory { id } => {
            Error::unprocessable(format!("category {id} does not exist"))
        }
    }
}

fn non_empty(page: Page<Question>) -> Result<Page<Question>, Error> {
    if page.is_empty() {
        Err(Error::not_found(format!(
            "page {} has no questions",
            page.number()
        )))
    } else {
        Ok(page)
    }
}

impl<Q, C> TriviaService<Q, C>
where
    Q: QuestionRepository,
    C: CategoryRepository,
{
    async fn page(
        &self,
        filter: &QuestionFilter,
        request: PageRequest,
    ) -> Result<Page<Question>, Error> {
        self.questions
            .page(filter, request)
            .await
            .map_err(map_trivia_error)
    }

    fn draw_from(&self, candidates: Vec<Question>, round: &QuizRound) -> Result<QuizDraw, Error> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| Error::internal("quiz random source poisoned"))?;
        Ok(draw(candidates, &round.previous_questions, &mut *rng))
    }
}

#[async_trait]
impl<Q, C> TriviaQuery for TriviaService<Q, C>
where
    Q: QuestionRepository,
    C: CategoryRepository,
{
    async fn categories(&self) -> Result<Vec<Category>, Error> {
        self.categories.list().await.map_err(map_trivia_error)
    }

    async fn questions(&self, request: PageRequest) -> Result<QuestionListing, Error> {
        let questions = non_empty(self.page(&QuestionFilter::All, request).await?)?;
        let categories = self.categories().await?;
        Ok(QuestionListing {
            questions,
            categories,
        })
    }

    async fn search_questions(
        &self,
        term: &SearchTerm,
        request: PageRequest,
    ) -> Result<Page<Question>, Error> {
        self.page(&QuestionFilter::Search(term.clone()), request)
            .await
    }

    async fn category_questions(
        &self,
        category: CategoryId,
        request: PageRequest,
    ) -> Result<Page<Question>, Error> {
        non_empty(self.page(&QuestionFilter::Category(category), request).await?)
    }

    async fn next_quiz_question(&self, round: QuizRound) -> Result<QuizDraw, Error> {
        let candidates = self
            .questions
            .quiz_candidates(round.category)
            .await
            .map_err(map_trivia_error)?;
        if candidates.is_empty() {
            let message = match round.category {
                QuizCategory::All => "there are no questions to play".to_owned(),
                QuizCategory::Only(id) => format!("category {id} has no questions to play"),
            };
            return Err(Error::unprocessable(message));
        }
        self.draw_from(candidates, &round)
    }
}

#[async_trait]
impl<Q, C> TriviaCommand for TriviaService<Q, C>
where
    Q: QuestionRepository,
    C: CategoryRepository,
{
    async fn create_question(&self, question: NewQuestion) -> Result<Question, Error> {
        let known = self
            .categories
            .find(question.category)
            .await
            .map_err(map_trivia_error)?;
        if known.is_none() {
            return Err(map_trivia_error(TriviaRepositoryError::unknown_category(
                question.category.get(),
            )));
        }
        self.questions
            .create(&question)
            .await
            .map_err(map_trivia_error)
    }

    async fn delete_question(&self, id: QuestionId) -> Result<QuestionId, Error> {
        self.questions.delete(id).await.map_err(map_trivia_error)?;
        Ok(id)
    }
}

#[cfg(test)]
#[path = "trivia_service_tests.rs"]
mod tests;
