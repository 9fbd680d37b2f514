//! Artists.

use super::profile::{Profile, ProfileDraft, ProfileValidationError};
use super::shows::ShowBuckets;
use super::ArtistId;

/// A persisted artist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artist {
    pub id: ArtistId,
    pub profile: Profile,
}

impl Artist {
    /// Listing name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.profile.name()
    }
}

/// Validate an artist draft into a storable profile.
///
/// # Errors
/// Returns [`ProfileValidationError`] when a required field is blank.
pub fn validate_artist(draft: ProfileDraft) -> Result<Profile, ProfileValidationError> {
    Profile::try_from(draft)
}

/// Minimal artist identity used by listings and search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistSummary {
    pub id: ArtistId,
    pub name: String,
}

/// Artist summary with its live upcoming show count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistListing {
    pub id: ArtistId,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// An artist together with their bucketed shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistDetail {
    pub artist: Artist,
    pub shows: ShowBuckets,
}
