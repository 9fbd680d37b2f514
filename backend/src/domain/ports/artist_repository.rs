//! Driven port for artist persistence.

use async_trait::async_trait;

use crate::domain::{Artist, ArtistId, ArtistSummary, Engagement, Profile, Scheduled, SearchTerm};

use super::define_port_error;

define_port_error! {
    /// Errors raised by artist persistence adapters.
    pub enum ArtistRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "artist repository connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } => "artist repository query failed: {message}",
        /// No artist has the given id.
        NotFound { id: i32 } => "artist {id} not found",
        /// Another artist already uses the name.
        DuplicateName { name: String } => "an artist named {name:?} already exists",
    }
}

/// Port for reading and writing artists.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArtistRepository: Send + Sync {
    /// Every artist, ordered by id.
    async fn list(&self) -> Result<Vec<ArtistSummary>, ArtistRepositoryError>;

    /// Artists whose name contains `term`, with their show start times.
    async fn search(
        &self,
        term: &SearchTerm,
    ) -> Result<Vec<Scheduled<ArtistSummary>>, ArtistRepositoryError>;

    /// Load one artist.
    async fn find(&self, id: ArtistId) -> Result<Option<Artist>, ArtistRepositoryError>;

    /// Load one artist with their shows; engagements name the venue.
    async fn find_with_engagements(
        &self,
        id: ArtistId,
    ) -> Result<Option<(Artist, Vec<Engagement>)>, ArtistRepositoryError>;

    /// Insert an artist.
    async fn create(&self, profile: &Profile) -> Result<Artist, ArtistRepositoryError>;

    /// Replace every field of an existing artist.
    async fn update(&self, id: ArtistId, profile: &Profile)
    -> Result<Artist, ArtistRepositoryError>;

    /// Delete an artist and, by cascade, their shows.
    async fn delete(&self, id: ArtistId) -> Result<(), ArtistRepositoryError>;
}
