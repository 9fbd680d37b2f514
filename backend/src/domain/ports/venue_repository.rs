//! Driven port for venue persistence.

use async_trait::async_trait;

use crate::domain::{Engagement, Scheduled, SearchTerm, Venue, VenueId, VenueRecord, VenueSummary};

use super::define_port_error;

define_port_error! {
    /// Errors raised by venue persistence adapters.
    pub enum VenueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "venue repository connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } => "venue repository query failed: {message}",
        /// No venue has the given id.
        NotFound { id: i32 } => "venue {id} not found",
        /// Another venue already uses the name.
        DuplicateName { name: String } => "a venue named {name:?} already exists",
    }
}

/// Port for reading and writing venues.
///
/// Listing and search results are ordered by id and carry the start times
/// of every show at the venue so callers can bucket them against their own
/// clock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VenueRepository: Send + Sync {
    /// Every venue with its show start times.
    async fn list(&self) -> Result<Vec<Scheduled<VenueSummary>>, VenueRepositoryError>;

    /// Venues whose name contains `term`, case-insensitively.
    async fn search(
        &self,
        term: &SearchTerm,
    ) -> Result<Vec<Scheduled<VenueSummary>>, VenueRepositoryError>;

    /// Load one venue.
    async fn find(&self, id: VenueId) -> Result<Option<Venue>, VenueRepositoryError>;

    /// Load one venue with its shows, in a single consistent read.
    ///
    /// Engagements name the performing artist and are ordered by start time.
    async fn find_with_engagements(
        &self,
        id: VenueId,
    ) -> Result<Option<(Venue, Vec<Engagement>)>, VenueRepositoryError>;

    /// Insert a venue.
    async fn create(&self, record: &VenueRecord) -> Result<Venue, VenueRepositoryError>;

    /// Replace every field of an existing venue.
    async fn update(&self, id: VenueId, record: &VenueRecord)
    -> Result<Venue, VenueRepositoryError>;

    /// Delete a venue and, by cascade, its shows.
    async fn delete(&self, id: VenueId) -> Result<(), VenueRepositoryError>;
}
