//! PostgreSQL-backed `ShowRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;

use crate::domain::ports::{ShowRepository, ShowRepositoryError};
use crate::domain::{ArtistId, Show, ShowDraft, ShowId, ShowListing, VenueId};

use super::diesel_helpers::StoreFailure;
use super::models::{NewShowRow, ShowListingTuple, ShowRow};
use super::pool::DbPool;
use super::schema::{artists, shows, venues};

/// Diesel-backed implementation of the show repository port.
#[derive(Clone)]
pub struct DieselShowRepository {
    pool: DbPool,
}

impl DieselShowRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<StoreFailure>) -> ShowRepositoryError {
    match failure.into() {
        StoreFailure::Connection(message) => ShowRepositoryError::connection(message),
        StoreFailure::Query(message) => ShowRepositoryError::query(message),
        StoreFailure::UniqueViolation { .. } => {
            ShowRepositoryError::query("unique constraint violated")
        }
        StoreFailure::ForeignKeyViolation { constraint } => {
            ShowRepositoryError::missing_reference(describe_reference(constraint.as_deref()))
        }
    }
}

/// Name the missing parent from the violated constraint.
fn describe_reference(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(name) if name.contains("venue") => "venue does not exist",
        Some(name) if name.contains("artist") => "artist does not exist",
        _ => "venue or artist does not exist",
    }
}

fn map_diesel(error: diesel::result::Error) -> ShowRepositoryError {
    map_failure(error)
}

fn to_listing(
    (id, venue_id, venue_name, artist_id, artist_name, artist_image_link, start_time): ShowListingTuple,
) -> ShowListing {
    ShowListing {
        id: ShowId::new(id),
        venue_id: VenueId::new(venue_id),
        venue_name,
        artist_id: ArtistId::new(artist_id),
        artist_name,
        artist_image_link,
        start_time,
    }
}

macro_rules! joined_shows {
    () => {
        shows::table
            .inner_join(venues::table)
            .inner_join(artists::table)
            .select((
                shows::id,
                shows::venue_id,
                venues::name,
                shows::artist_id,
                artists::name,
                artists::image_link,
                shows::start_time,
            ))
    };
}

#[async_trait]
impl ShowRepository for DieselShowRepository {
    async fn list(&self) -> Result<Vec<ShowListing>, ShowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<ShowListingTuple> = joined_shows!()
            .order_by((shows::start_time.desc(), shows::id))
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(rows.into_iter().map(to_listing).collect())
    }

    async fn find(&self, id: ShowId) -> Result<Option<ShowListing>, ShowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<ShowListingTuple> = joined_shows!()
            .filter(shows::id.eq(id.get()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        Ok(row.map(to_listing))
    }

    async fn create(&self, draft: &ShowDraft) -> Result<Show, ShowRepositoryError> {
        let new_row = NewShowRow::from(draft);
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: ShowRow = conn
            .transaction(|tx| {
                async move {
                    diesel::insert_into(shows::table)
                        .values(&new_row)
                        .returning(ShowRow::as_returning())
                        .get_result::<ShowRow>(tx)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel)?;
        Ok(Show::from(row))
    }

    async fn delete(&self, id: ShowId) -> Result<(), ShowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let deleted = conn
            .transaction(|tx| {
                async move { diesel::delete(shows::table.find(id.get())).execute(tx).await }
                    .scope_boxed()
            })
            .await
            .map_err(map_diesel)?;
        if deleted == 0 {
            return Err(ShowRepositoryError::not_found(id.get()));
        }
        Ok(())
    }
}
