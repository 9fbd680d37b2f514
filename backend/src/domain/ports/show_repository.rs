//! Driven port for show persistence.

use async_trait::async_trait;

use crate::domain::{Show, ShowDraft, ShowId, ShowListing};

use super::define_port_error;

define_port_error! {
    /// Errors raised by show persistence adapters.
    pub enum ShowRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "show repository connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } => "show repository query failed: {message}",
        /// No show has the given id.
        NotFound { id: i32 } => "show {id} not found",
        /// The referenced venue or artist does not exist.
        MissingReference { message: String } => "show references a missing record: {message}",
    }
}

/// Port for reading and writing shows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShowRepository: Send + Sync {
    /// Every show joined with venue and artist names, latest first.
    async fn list(&self) -> Result<Vec<ShowListing>, ShowRepositoryError>;

    /// One joined show.
    async fn find(&self, id: ShowId) -> Result<Option<ShowListing>, ShowRepositoryError>;

    /// Book a show.
    async fn create(&self, draft: &ShowDraft) -> Result<Show, ShowRepositoryError>;

    /// Cancel a show.
    async fn delete(&self, id: ShowId) -> Result<(), ShowRepositoryError>;
}
