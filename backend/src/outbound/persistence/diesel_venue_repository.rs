//! PostgreSQL-backed `VenueRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{VenueRepository, VenueRepositoryError};
use crate::domain::{
    Engagement, Scheduled, SearchTerm, Venue, VenueId, VenueRecord, VenueSummary,
};

use super::diesel_helpers::{StoreFailure, group_show_times};
use super::models::{EngagementTuple, VenueRow, VenueSummaryRow, VenueWrite};
use super::pool::DbPool;
use super::schema::{artists, shows, venues};

/// Diesel-backed implementation of the venue repository port.
#[derive(Clone)]
pub struct DieselVenueRepository {
    pool: DbPool,
}

impl DieselVenueRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn scheduled(
        &self,
        term: Option<&SearchTerm>,
    ) -> Result<Vec<Scheduled<VenueSummary>>, VenueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let pattern = term.map(SearchTerm::like_pattern);
        let (rows, times) = conn
            .transaction(|tx| {
                async move {
                    let mut query = venues::table
                        .select(VenueSummaryRow::as_select())
                        .order_by(venues::id)
                        .into_boxed();
                    if let Some(like) = pattern {
                        query = query.filter(venues::name.ilike(like));
                    }
                    let rows: Vec<VenueSummaryRow> = query.load(tx).await?;
                    let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
                    let times: Vec<(i32, chrono::DateTime<chrono::Utc>)> = shows::table
                        .filter(shows::venue_id.eq_any(ids))
                        .select((shows::venue_id, shows::start_time))
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
                subject: VenueSummary::from(row),
            })
            .collect())
    }
}

fn map_failure(failure: impl Into<StoreFailure>) -> VenueRepositoryError {
    match failure.into() {
        StoreFailure::Connection(message) => VenueRepositoryError::connection(message),
        StoreFailure::Query(message) => VenueRepositoryError::query(message),
        StoreFailure::UniqueViolation { constraint } => VenueRepositoryError::query(format!(
            "unique constraint {} violated",
            constraint.as_deref().unwrap_or("<unnamed>")
        )),
        StoreFailure::ForeignKeyViolation { .. } => {
            VenueRepositoryError::query("foreign key violation")
        }
    }
}

fn map_diesel(error: diesel::result::Error) -> VenueRepositoryError {
    map_failure(error)
}

/// Writes report a unique violation as a taken name.
fn map_write_error(error: diesel::result::Error, record: &VenueRecord) -> VenueRepositoryError {
    match StoreFailure::from(error) {
        StoreFailure::UniqueViolation { .. } => {
            VenueRepositoryError::duplicate_name(record.profile().name())
        }
        other => map_failure(other),
    }
}

fn row_to_venue(row: VenueRow) -> Result<Venue, VenueRepositoryError> {
    row.into_venue().map_err(VenueRepositoryError::query)
}

fn to_engagement((id, name, image_link, start_time): EngagementTuple) -> Engagement {
    Engagement {
        counterpart_id: id,
        counterpart_name: name,
        counterpart_image_link: image_link,
        start_time,
    }
}

/// Shows booked at a venue; removed in the same transaction as the venue.
fn shows_at(
    id: VenueId,
) -> diesel::dsl::Filter<shows::table, diesel::dsl::Eq<shows::venue_id, i32>> {
    shows::table.filter(shows::venue_id.eq(id.get()))
}

#[async_trait]
impl VenueRepository for DieselVenueRepository {
    async fn list(&self) -> Result<Vec<Scheduled<VenueSummary>>, VenueRepositoryError> {
        self.scheduled(None).await
    }

    async fn search(
        &self,
        term: &SearchTerm,
    ) -> Result<Vec<Scheduled<VenueSummary>>, VenueRepositoryError> {
        self.scheduled(Some(term)).await
    }

    async fn find(&self, id: VenueId) -> Result<Option<Venue>, VenueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<VenueRow> = venues::table
            .find(id.get())
            .select(VenueRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        row.map(row_to_venue).transpose()
    }

    async fn find_with_engagements(
        &self,
        id: VenueId,
    ) -> Result<Option<(Venue, Vec<Engagement>)>, VenueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let loaded = conn
            .transaction(|tx| {
                async move {
                    let Some(row) = venues::table
                        .find(id.get())
                        .select(VenueRow::as_select())
                        .first::<VenueRow>(tx)
                        .await
                        .optional()?
                    else {
                        return Ok(None);
                    };
                    let engagements: Vec<EngagementTuple> = shows::table
                        .inner_join(artists::table)
                        .filter(shows::venue_id.eq(id.get()))
                        .select((
                            artists::id,
                            artists::name,
                            artists::image_link,
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
            .map(|(row, engagements)| {
                Ok((
                    row_to_venue(row)?,
                    engagements.into_iter().map(to_engagement).collect(),
                ))
            })
            .transpose()
    }

    async fn create(&self, record: &VenueRecord) -> Result<Venue, VenueRepositoryError> {
        let write = VenueWrite::from(record);
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: VenueRow = conn
            .transaction(|tx| {
                async move {
                    diesel::insert_into(venues::table)
                        .values(&write)
                        .returning(VenueRow::as_returning())
                        .get_result::<VenueRow>(tx)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_write_error(err, record))?;
        row_to_venue(row)
    }

    async fn update(
        &self,
        id: VenueId,
        record: &VenueRecord,
    ) -> Result<Venue, VenueRepositoryError> {
        let write = VenueWrite::from(record);
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<VenueRow> = conn
            .transaction(|tx| {
                async move {
                    diesel::update(venues::table.find(id.get()))
                        .set(&write)
                        .returning(VenueRow::as_returning())
                        .get_result::<VenueRow>(tx)
                        .await
                        .optional()
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_write_error(err, record))?;
        row.map_or_else(
            || Err(VenueRepositoryError::not_found(id.get())),
            row_to_venue,
        )
    }

    async fn delete(&self, id: VenueId) -> Result<(), VenueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let deleted = conn
            .transaction(|tx| {
                async move {
                    diesel::delete(shows_at(id)).execute(tx).await?;
                    diesel::delete(venues::table.find(id.get())).execute(tx).await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel)?;
        if deleted == 0 {
            return Err(VenueRepositoryError::not_found(id.get()));
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

    #[rstest]
    fn pool_failures_are_connection_errors() {
        let err = map_failure(StoreFailure::Connection("refused".to_owned()));
        assert_eq!(err, VenueRepositoryError::connection("refused"));
    }

    #[rstest]
    fn engagements_name_the_artist() {
        let start = chrono::DateTime::<chrono::Utc>::UNIX_EPOCH;
        let engagement = to_engagement((4, "Guns N Petals".to_owned(), None, start));
        assert_eq!(engagement.counterpart_id, 4);
        assert_eq!(engagement.counterpart_name, "Guns N Petals");
        assert_eq!(engagement.start_time, start);
    }

    #[rstest]
    fn venue_delete_also_clears_its_shows() {
        let rendered = debug_query::<Pg, _>(&diesel::delete(shows_at(VenueId::new(3)))).to_string();
        assert!(rendered.starts_with("DELETE FROM \"shows\""), "{rendered}");
        assert!(rendered.contains("\"shows\".\"venue_id\" = $1"), "{rendered}");
        assert!(rendered.contains("binds: [3]"), "{rendered}");
    }
}
