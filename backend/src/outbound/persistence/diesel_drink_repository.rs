//! PostgreSQL-backed `DrinkRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;

use crate::domain::ports::{DrinkRepository, DrinkRepositoryError};
use crate::domain::{Drink, DrinkId, DrinkPatch, NewDrink};

use super::diesel_helpers::{StoreFailure, collect_rows};
use super::models::{DrinkRow, DrinkUpdate, NewDrinkRow, encode_recipe};
use super::pool::DbPool;
use super::schema::drinks;

/// Diesel-backed implementation of the drink repository port.
#[derive(Clone)]
pub struct DieselDrinkRepository {
    pool: DbPool,
}

impl DieselDrinkRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<StoreFailure>) -> DrinkRepositoryError {
    match failure.into() {
        StoreFailure::Connection(message) => DrinkRepositoryError::connection(message),
        StoreFailure::Query(message) => DrinkRepositoryError::query(message),
        StoreFailure::UniqueViolation { .. } => {
            DrinkRepositoryError::query("unique constraint violated")
        }
        StoreFailure::ForeignKeyViolation { .. } => {
            DrinkRepositoryError::query("foreign key violation")
        }
    }
}

fn map_diesel(error: diesel::result::Error) -> DrinkRepositoryError {
    map_failure(error)
}

fn map_title_conflict(error: diesel::result::Error, title: &str) -> DrinkRepositoryError {
    match StoreFailure::from(error) {
        StoreFailure::UniqueViolation { .. } => DrinkRepositoryError::duplicate_title(title),
        other => map_failure(other),
    }
}

fn row_to_drink(row: DrinkRow) -> Result<Drink, DrinkRepositoryError> {
    row.into_drink().map_err(DrinkRepositoryError::query)
}

fn changeset(patch: &DrinkPatch) -> Result<DrinkUpdate<'_>, DrinkRepositoryError> {
    Ok(DrinkUpdate {
        title: patch.title.as_deref(),
        recipe: patch
            .recipe
            .as_ref()
            .map(encode_recipe)
            .transpose()
            .map_err(DrinkRepositoryError::query)?,
    })
}

#[async_trait]
impl DrinkRepository for DieselDrinkRepository {
    async fn list(&self) -> Result<Vec<Drink>, DrinkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<DrinkRow> = drinks::table
            .select(DrinkRow::as_select())
            .order_by(drinks::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        collect_rows(rows.into_iter().map(DrinkRow::into_drink), DrinkRepositoryError::query)
    }

    async fn create(&self, drink: &NewDrink) -> Result<Drink, DrinkRepositoryError> {
        let new_row = NewDrinkRow::new(drink).map_err(DrinkRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: DrinkRow = conn
            .transaction(|tx| {
                async move {
                    diesel::insert_into(drinks::table)
                        .values(&new_row)
                        .returning(DrinkRow::as_returning())
                        .get_result::<DrinkRow>(tx)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_title_conflict(err, &drink.title))?;
        row_to_drink(row)
    }

    async fn update(&self, id: DrinkId, patch: &DrinkPatch) -> Result<Drink, DrinkRepositoryError> {
        let changes = changeset(patch)?;
        let conflict_title = changes.title.unwrap_or_default();
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<DrinkRow> = conn
            .transaction(|tx| {
                async move {
                    // An empty patch is a plain read.
                    if changes.is_empty() {
                        drinks::table
                            .find(id.get())
                            .select(DrinkRow::as_select())
                            .first::<DrinkRow>(tx)
                            .await
                            .optional()
                    } else {
                        diesel::update(drinks::table.find(id.get()))
                            .set(&changes)
                            .returning(DrinkRow::as_returning())
                            .get_result::<DrinkRow>(tx)
                            .await
                            .optional()
                    }
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_title_conflict(err, conflict_title))?;
        row.map_or_else(
            || Err(DrinkRepositoryError::not_found(id.get())),
            row_to_drink,
        )
    }

    async fn delete(&self, id: DrinkId) -> Result<(), DrinkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let deleted = conn
            .transaction(|tx| {
                async move { diesel::delete(drinks::table.find(id.get())).execute(tx).await }
                    .scope_boxed()
            })
            .await
            .map_err(map_diesel)?;
        if deleted == 0 {
            return Err(DrinkRepositoryError::not_found(id.get()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::debug_query;
    use diesel::pg::Pg;
    use rstest::rstest;

    use crate::domain::RecipePart;

    #[rstest]
    fn query_failures_keep_their_message() {
        assert_eq!(
            map_failure(StoreFailure::Query("database error".to_owned())),
            DrinkRepositoryError::query("database error")
        );
    }

    #[rstest]
    fn missing_rows_surface_as_query_errors() {
        assert_eq!(
            map_diesel(diesel::result::Error::NotFound),
            DrinkRepositoryError::query("record not found")
        );
    }

    #[rstest]
    fn empty_patch_reads_instead_of_writing() {
        let patch = DrinkPatch::default();
        assert!(changeset(&patch).expect("changeset").is_empty());
    }

    #[rstest]
    fn title_patch_leaves_the_recipe_column_alone() {
        let patch = DrinkPatch::new(Some("Flat White".to_owned()), None).expect("valid patch");
        let changes = changeset(&patch).expect("changeset");
        assert!(!changes.is_empty());
        let rendered =
            debug_query::<Pg, _>(&diesel::update(drinks::table.find(7)).set(&changes)).to_string();
        assert!(rendered.contains("SET \"title\" = $1"), "{rendered}");
        assert!(!rendered.contains("\"recipe\""), "{rendered}");
    }

    #[rstest]
    fn recipe_patch_is_encoded_for_the_json_column() {
        let patch = DrinkPatch::new(
            None,
            Some(vec![RecipePart {
                color: "brown".to_owned(),
                name: "espresso".to_owned(),
                parts: 1,
            }]),
        )
        .expect("valid patch");
        let changes = changeset(&patch).expect("changeset");
        assert_eq!(changes.title, None);
        assert!(changes.recipe.is_some());
    }
}
