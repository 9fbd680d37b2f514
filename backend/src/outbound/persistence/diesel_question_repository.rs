//! PostgreSQL-backed `QuestionRepository` implementation using Diesel ORM.
//!
//! Pages are read with a count and a slice inside one transaction so the
//! reported total matches the slice.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use pagination::{Page, PageRequest};

use crate::domain::ports::{QuestionRepository, TriviaRepositoryError};
use crate::domain::{NewQuestion, Question, QuestionFilter, QuestionId, QuizCategory};

use super::diesel_helpers::{StoreFailure, collect_rows, from_sql_count, to_sql_count};
use super::models::{NewQuestionRow, QuestionRow};
use super::pool::DbPool;
use super::schema::questions;

/// Diesel-backed implementation of the question repository port.
#[derive(Clone)]
pub struct DieselQuestionRepository {
    pool: DbPool,
}

impl DieselQuestionRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(super) fn map_failure(failure: impl Into<StoreFailure>) -> TriviaRepositoryError {
    match failure.into() {
        StoreFailure::Connection(message) => TriviaRepositoryError::connection(message),
        StoreFailure::Query(message) => TriviaRepositoryError::query(message),
        StoreFailure::UniqueViolation { .. } => {
            TriviaRepositoryError::query("unique constraint violated")
        }
        StoreFailure::ForeignKeyViolation { .. } => {
            TriviaRepositoryError::query("foreign key violation")
        }
    }
}

pub(super) fn map_diesel(error: diesel::result::Error) -> TriviaRepositoryError {
    map_failure(error)
}

fn filtered(filter: &QuestionFilter) -> questions::BoxedQuery<'static, Pg> {
    let query = questions::table.into_boxed();
    match filter {
        QuestionFilter::All => query,
        QuestionFilter::Category(category) => query.filter(questions::category.eq(category.get())),
        QuestionFilter::Search(term) => {
            query.filter(questions::question.ilike(term.like_pattern()))
        }
    }
}

fn rows_to_questions(rows: Vec<QuestionRow>) -> Result<Vec<Question>, TriviaRepositoryError> {
    collect_rows(
        rows.into_iter().map(QuestionRow::into_question),
        TriviaRepositoryError::query,
    )
}

#[async_trait]
impl QuestionRepository for DieselQuestionRepository {
    async fn page(
        &self,
        filter: &QuestionFilter,
        request: PageRequest,
    ) -> Result<Page<Question>, TriviaRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let owned_filter = filter.clone();
        let (total, rows) = conn
            .transaction(|tx| {
                async move {
                    let total: i64 = filtered(&owned_filter).count().get_result(tx).await?;
                    let rows: Vec<QuestionRow> = filtered(&owned_filter)
                        .select(QuestionRow::as_select())
                        .order_by(questions::id)
                        .offset(to_sql_count(request.offset()))
                        .limit(to_sql_count(request.limit()))
                        .load(tx)
                        .await?;
                    Ok((total, rows))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel)?;
        Ok(Page::new(
            rows_to_questions(rows)?,
            request,
            from_sql_count(total),
        ))
    }

    async fn quiz_candidates(
        &self,
        category: QuizCategory,
    ) -> Result<Vec<Question>, TriviaRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let filter = match category {
            QuizCategory::All => QuestionFilter::All,
            QuizCategory::Only(id) => QuestionFilter::Category(id),
        };
        let rows: Vec<QuestionRow> = filtered(&filter)
            .select(QuestionRow::as_select())
            .order_by(questions::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        rows_to_questions(rows)
    }

    async fn create(&self, question: &NewQuestion) -> Result<Question, TriviaRepositoryError> {
        let new_row = NewQuestionRow::from(question);
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: QuestionRow = conn
            .transaction(|tx| {
                async move {
                    diesel::insert_into(questions::table)
                        .values(&new_row)
                        .returning(QuestionRow::as_returning())
                        .get_result::<QuestionRow>(tx)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| match StoreFailure::from(err) {
                StoreFailure::ForeignKeyViolation { .. } => {
                    TriviaRepositoryError::unknown_category(question.category.get())
                }
                other => map_failure(other),
            })?;
        row.into_question().map_err(TriviaRepositoryError::query)
    }

    async fn delete(&self, id: QuestionId) -> Result<(), TriviaRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let deleted = conn
            .transaction(|tx| {
                async move { diesel::delete(questions::table.find(id.get())).execute(tx).await }
                    .scope_boxed()
            })
            .await
            .map_err(map_diesel)?;
        if deleted == 0 {
            return Err(TriviaRepositoryError::question_not_found(id.get()));
        }
        Ok(())
    }
}
