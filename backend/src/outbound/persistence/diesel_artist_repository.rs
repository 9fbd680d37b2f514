//! PostgreSQL-backed `ArtistRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;

use crate::domain::ports::{ArtistRepository, ArtistRepositoryError};
use crate::domain::{Artist, ArtistId, ArtistSummary, Engagement, Profile, Scheduled, SearchTerm};

use super::diesel_helpers::{StoreFailure, group_show_times};
use super::models::{ArtistRow, ArtistSummaryRow, ArtistWrite, EngagementTuple};
use super::pool::DbPool;
use super::schema::{artists, shows, venues};

/// Diesel-backed implementation of the artist repository port.
#[derive(Clone)]
pub struct DieselArtistRepository {
    pool: DbPool,
}

impl DieselArtistRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<StoreFailure>) -> ArtistRepositoryError {
    match failure.into() {
        StoreFailure::Connection(message) => ArtistRepositoryError::connection(message),
        StoreFailure::Query(message) => ArtistRepositoryError::query(message),
        StoreFailure::UniqueViolation { constraint } => ArtistRepositoryError::query(format!(
            "unique constraint {} violated",
            constraint.as_deref().unwrap_or("<unnamed>")
        )),
        StoreFailure::ForeignKeyViolation { .. } => {
            ArtistRepositoryError::query("foreign key violation")
        }
    }
}

fn map_diesel(error: diesel::result::Error) -> ArtistRepositoryError {
    map_failure(error)
}

fn map_write_error(error: diesel::result::Error, profile: &Profile) -> ArtistRepositoryError {
    match StoreFailure::from(error) {
        StoreFailure::UniqueViolation { .. } => ArtistRepositoryError::duplicate_name(profile.name()),
        other => map_failure(other),
    }
}

fn row_to_artist(row: ArtistRow) -> Result<Artist, ArtistRepositoryError> {
    row.into_artist().map_err(ArtistRepositoryError::query)
}

/// Shows the artist plays; removed in the same transaction as the artist.
fn shows_by(
    id: ArtistId,
) -> diesel::dsl::Filter<shows::table, diesel::dsl::Eq<shows::artist_id, i32>> {
    shows::table.filter(shows::artist_id.eq(id.get()))
}

#[async_trait]
impl ArtistRepository for DieselArtistRepository {
    async fn list(&self) -> Result<Vec<ArtistSummary>, ArtistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<ArtistSummaryRow> = artists::table
            .select(ArtistSummaryRow::as_select())
            .order_by(artists::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(rows.into_iter().map(ArtistSummary::from).collect())
    }

    async fn search(
        &self,
        term: &SearchTerm,
    ) -> Result<Vec<Scheduled<ArtistSummary>>, ArtistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let pattern = term.like_pattern();
        let (rows, times) = conn
            .transaction(|tx| {
                async move {
                    let rows: Vec<ArtistSummaryRow> = artists::table
                        .filter(artists::name.ilike(pattern))
                        .select(ArtistSummaryRow::as_select())
                        .order_by(artists::id)
                        .load(tx)
                        .await?;
                    let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
                    let times: Vec<(i32, DateTime<Utc>)> = shows::table
                        .filter(shows::artist_id.eq_any(ids))
                        .select((shows::artist_id, shows::start_time))
                        .order_by(shows::start_time)
                        .load(tx)
                        .await?;
                    Ok((rows, times))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel)?;

        let mut grouped = group_show_times(times);
        Ok(rows
            .into_iter()
            .map(|row| Scheduled {
                show_times: grouped.remove(&row.id).unwrap_or_default(),
                subject: ArtistSummary::from(row),
            })
            .collect())
    }

    async fn find(&self, id: ArtistId) -> Result<Option<Artist>, ArtistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<ArtistRow> = artists::table
            .find(id.get())
            .select(ArtistRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        row.map(row_to_artist).transpose()
    }

    async fn find_with_engagements(
        &self,
        id: ArtistId,
    ) -> Result<Option<(Artist, Vec<Engagement>)>, ArtistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let loaded = conn
            .transaction(|tx| {
                async move {
                    let Some(row) = artists::table
                        .find(id.get())
                        .select(ArtistRow::as_select())
                        .first::<ArtistRow>(tx)
                        .await
                        .optional()?
                    else {
                        return Ok(None);
                    };
                    let engagements: Vec<EngagementTuple> = shows::table
                        .inner_join(venues::table)
                        .filter(shows::artist_id.eq(id.get()))
                        .select((
                            venues::id,
                            venues::name,
                            venues::image_link,
                            shows::start_time,
                        ))
                        .order_by(shows::start_time)
                        .load(tx)
                        .await?;
                    Ok(Some((row, engagements)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel)?;

        loaded
            .map(|(row, venue_rows)| {
                let engagements = venue_rows
                    .into_iter()
                    .map(|(venue_id, name, image_link, start_time)| Engagement {
                        counterpart_id: venue_id,
                        counterpart_name: name,
                        counterpart_image_link: image_link,
                        start_time,
                    })
                    .collect();
                Ok((row_to_artist(row)?, engagements))
            })
            .transpose()
    }

    async fn create(&self, profile: &Profile) -> Result<Artist, ArtistRepositoryError> {
        let write = ArtistWrite::from(profile);
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: ArtistRow = conn
            .transaction(|tx| {
                async move {
                    diesel::insert_into(artists::table)
                        .values(&write)
                        .returning(ArtistRow::as_returning())
                        .get_result::<ArtistRow>(tx)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_write_error(err, profile))?;
        row_to_artist(row)
    }

    async fn update(
        &self,
        id: ArtistId,
        profile: &Profile,
    ) -> Result<Artist, ArtistRepositoryError> {
        let write = ArtistWrite::from(profile);
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<ArtistRow> = conn
            .transaction(|tx| {
                async move {
                    diesel::update(artists::table.find(id.get()))
                        .set(&write)
                        .returning(ArtistRow::as_returning())
                        .get_result::<ArtistRow>(tx)
                        .await
                        .optional()
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_write_error(err, profile))?;
        row.map_or_else(
            || Err(ArtistRepositoryError::not_found(id.get())),
            row_to_artist,
        )
    }

    async fn delete(&self, id: ArtistId) -> Result<(), ArtistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let deleted = conn
            .transaction(|tx| {
                async move {
                    diesel::delete(shows_by(id)).execute(tx).await?;
                    diesel::delete(artists::table.find(id.get())).execute(tx).await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel)?;
        if deleted == 0 {
            return Err(ArtistRepositoryError::not_found(id.get()));
        }
        Ok(())
    }
}
