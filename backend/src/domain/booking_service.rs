//! Booking-site domain service.
//!
//! Implements [`BookingQuery`] and [`BookingCommand`] on top of the venue,
//! artist and show repositories. Upcoming counts and past/upcoming buckets
//! are derived here against the injected clock, never read from storage.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    ArtistRepository, ArtistRepositoryError, BookingCommand, BookingQuery, ShowRepository,
    ShowRepositoryError, VenueRepository, VenueRepositoryError,
};
use crate::domain::{
    Artist, ArtistDetail, ArtistId, ArtistListing, ArtistSummary, Error, Profile, SearchTerm, Show,
    ShowBuckets, ShowDraft, ShowId, ShowListing, Venue, VenueArea, VenueDetail, VenueId,
    VenueListing, VenueRecord, VenueSummary, group_into_areas,
};

/// Booking service implementing the booking driving ports.
#[derive(Clone)]
pub struct BookingService<V, A, S> {
    venues: Arc<V>,
    artists: Arc<A>,
    shows: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<V, A, S> BookingService<V, A, S> {
    /// Create a new service with the given repositories and clock.
    #[must_use]
    pub fn new(venues: Arc<V>, artists: Arc<A>, shows: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            venues,
            artists,
            shows,
            clock,
        }
    }
}

fn map_venue_error(error: VenueRepositoryError) -> Error {
    match error {
        VenueRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("venue repository unavailable: {message}"))
        }
        VenueRepositoryError::Query { message } => {
            Error::internal(format!("venue repository error: {message}"))
        }
        VenueRepositoryError::NotFound { id } => Error::not_found(format!("venue {id} not found")),
        VenueRepositoryError::DuplicateName { name } => {
            Error::unprocessable(format!("a venue named {name:?} already exists"))
        }
    }
}

fn map_artist_error(error: ArtistRepositoryError) -> Error {
    match error {
        ArtistRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("artist repository unavailable: {message}"))
        }
        ArtistRepositoryError::Query { message } => {
            Error::internal(format!("artist repository error: {message}"))
        }
        ArtistRepositoryError::NotFound { id } => {
            Error::not_found(format!("artist {id} not found"))
        }
        ArtistRepositoryError::DuplicateName { name } => {
            Error::unprocessable(format!("an artist named {name:?} already exists"))
        }
    }
}

fn map_show_error(error: ShowRepositoryError) -> Error {
    match error {
        ShowRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("show repository unavailable: {message}"))
        }
        ShowRepositoryError::Query { message } => {
            Error::internal(format!("show repository error: {message}"))
        }
        ShowRepositoryError::NotFound { id } => Error::not_found(format!("show {id} not found")),
        ShowRepositoryError::MissingReference { message } => Error::unprocessable(message),
    }
}

fn venue_missing(id: VenueId) -> Error {
    Error::not_found(format!("venue {id} not found"))
}

fn artist_missing(id: ArtistId) -> Error {
    Error::not_found(format!("artist {id} not found"))
}

#[async_trait]
impl<V, A, S> BookingQuery for BookingService<V, A, S>
where
    V: VenueRepository,
    A: ArtistRepository,
    S: ShowRepository,
{
    async fn venue_areas(&self) -> Result<Vec<VenueArea>, Error> {
        let now = self.clock.utc();
        let venues = self.venues.list().await.map_err(map_venue_error)?;
        let counted: Vec<(VenueSummary, usize)> = venues
            .into_iter()
            .map(|scheduled| {
                let upcoming = scheduled.upcoming_count(now);
                (scheduled.subject, upcoming)
            })
            .collect();
        Ok(group_into_areas(counted))
    }

    async fn search_venues(&self, term: &SearchTerm) -> Result<Vec<VenueListing>, Error> {
        let now = self.clock.utc();
        let matches = self.venues.search(term).await.map_err(map_venue_error)?;
        Ok(matches
            .into_iter()
            .map(|scheduled| VenueListing {
                num_upcoming_shows: scheduled.upcoming_count(now),
                id: scheduled.subject.id,
                name: scheduled.subject.name,
            })
            .collect())
    }

    async fn venue_detail(&self, id: VenueId) -> Result<VenueDetail, Error> {
        let (venue, engagements) = self
            .venues
            .find_with_engagements(id)
            .await
            .map_err(map_venue_error)?
            .ok_or_else(|| venue_missing(id))?;
        Ok(VenueDetail {
            venue,
            shows: ShowBuckets::partition(engagements, self.clock.utc()),
        })
    }

    async fn venue(&self, id: VenueId) -> Result<Venue, Error> {
        self.venues
            .find(id)
            .await
            .map_err(map_venue_error)?
            .ok_or_else(|| venue_missing(id))
    }

    async fn artists(&self) -> Result<Vec<ArtistSummary>, Error> {
        self.artists.list().await.map_err(map_artist_error)
    }

    async fn search_artists(&self, term: &SearchTerm) -> Result<Vec<ArtistListing>, Error> {
        let now = self.clock.utc();
        let matches = self.artists.search(term).await.map_err(map_artist_error)?;
        Ok(matches
            .into_iter()
            .map(|scheduled| ArtistListing {
                num_upcoming_shows: scheduled.upcoming_count(now),
                id: scheduled.subject.id,
                name: scheduled.subject.name,
            })
            .collect())
    }

    async fn artist_detail(&self, id: ArtistId) -> Result<ArtistDetail, Error> {
        let (artist, engagements) = self
            .artists
            .find_with_engagements(id)
            .await
            .map_err(map_artist_error)?
            .ok_or_else(|| artist_missing(id))?;
        Ok(ArtistDetail {
            artist,
            shows: ShowBuckets::partition(engagements, self.clock.utc()),
        })
    }

    async fn artist(&self, id: ArtistId) -> Result<Artist, Error> {
        self.artists
            .find(id)
            .await
            .map_err(map_artist_error)?
            .ok_or_else(|| artist_missing(id))
    }

    async fn shows(&self) -> Result<Vec<ShowListing>, Error> {
        self.shows.list().await.map_err(map_show_error)
    }

    async fn show(&self, id: ShowId) -> Result<ShowListing, Error> {
        self.shows
            .find(id)
            .await
            .map_err(map_show_error)?
            .ok_or_else(|| Error::not_found(format!("show {id} not found")))
    }
}

#[async_trait]
impl<V, A, S> BookingCommand for BookingService<V, A, S>
where
    V: VenueRepository,
    A: ArtistRepository,
    S: ShowRepository,
{
    async fn create_venue(&self, record: VenueRecord) -> Result<Venue, Error> {
        self.venues.create(&record).await.map_err(map_venue_error)
    }

    async fn update_venue(&self, id: VenueId, record: VenueRecord) -> Result<Venue, Error> {
        self.venues
            .update(id, &record)
            .await
            .map_err(map_venue_error)
    }

    async fn delete_venue(&self, id: VenueId) -> Result<VenueId, Error> {
        self.venues.delete(id).await.map_err(map_venue_error)?;
        Ok(id)
    }

    async fn create_artist(&self, profile: Profile) -> Result<Artist, Error> {
        self.artists.create(&profile).await.map_err(map_artist_error)
    }

    async fn update_artist(&self, id: ArtistId, profile: Profile) -> Result<Artist, Error> {
        self.artists
            .update(id, &profile)
            .await
            .map_err(map_artist_error)
    }

    async fn delete_artist(&self, id: ArtistId) -> Result<ArtistId, Error> {
        self.artists.delete(id).await.map_err(map_artist_error)?;
        Ok(id)
    }

    async fn create_show(&self, draft: ShowDraft) -> Result<Show, Error> {
        self.shows.create(&draft).await.map_err(map_show_error)
    }

    async fn delete_show(&self, id: ShowId) -> Result<ShowId, Error> {
        self.shows.delete(id).await.map_err(map_show_error)?;
        Ok(id)
    }
}

#[cfg(test)]
#[path = "booking_service_tests.rs"]
mod tests;
