//! Driving ports for the booking site.

use async_trait::async_trait;

use crate::domain::{
    Artist, ArtistDetail, ArtistId, ArtistListing, ArtistSummary, Error, Profile, SearchTerm, Show,
    ShowDraft, ShowId, ShowListing, Venue, VenueArea, VenueDetail, VenueId, VenueListing,
    VenueRecord,
};

/// Read side of the booking site.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingQuery: Send + Sync {
    /// Venues grouped by city and state with live upcoming counts.
    async fn venue_areas(&self) -> Result<Vec<VenueArea>, Error>;

    /// Venues whose name contains the term.
    async fn search_venues(&self, term: &SearchTerm) -> Result<Vec<VenueListing>, Error>;

    /// Venue with past and upcoming shows.
    async fn venue_detail(&self, id: VenueId) -> Result<VenueDetail, Error>;

    /// Venue as stored, for the edit form.
    async fn venue(&self, id: VenueId) -> Result<Venue, Error>;

    /// Every artist.
    async fn artists(&self) -> Result<Vec<ArtistSummary>, Error>;

    /// Artists whose name contains the term.
    async fn search_artists(&self, term: &SearchTerm) -> Result<Vec<ArtistListing>, Error>;

    /// Artist with past and upcoming shows.
    async fn artist_detail(&self, id: ArtistId) -> Result<ArtistDetail, Error>;

    /// Artist as stored, for the edit form.
    async fn artist(&self, id: ArtistId) -> Result<Artist, Error>;

    /// Every show, latest first.
    async fn shows(&self) -> Result<Vec<ShowListing>, Error>;

    /// One show.
    async fn show(&self, id: ShowId) -> Result<ShowListing, Error>;
}

/// Write side of the booking site.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingCommand: Send + Sync {
    /// List a new venue.
    async fn create_venue(&self, record: VenueRecord) -> Result<Venue, Error>;

    /// Replace a venue's details.
    async fn update_venue(&self, id: VenueId, record: VenueRecord) -> Result<Venue, Error>;

    /// Remove a venue and its shows.
    async fn delete_venue(&self, id: VenueId) -> Result<VenueId, Error>;

    /// List a new artist.
    async fn create_artist(&self, profile: Profile) -> Result<Artist, Error>;

    /// Replace an artist's details.
    async fn update_artist(&self, id: ArtistId, profile: Profile) -> Result<Artist, Error>;

    /// Remove an artist and their shows.
    async fn delete_artist(&self, id: ArtistId) -> Result<ArtistId, Error>;

    /// Book a show.
    async fn create_show(&self, draft: ShowDraft) -> Result<Show, Error>;

    /// Cancel a show.
    async fn delete_show(&self, id: ShowId) -> Result<ShowId, Error>;
}
