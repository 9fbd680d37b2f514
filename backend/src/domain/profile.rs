//! Listing profile shared by venues and artists.
//!
//! Venues and artists carry the same public profile: a unique name, a home
//! city and state, contact links, a genre list and an optional "seeking"
//! advert. Venues add a street address on top (see [`super::venue`]).

use std::str::FromStr;

use serde_json::json;
use thiserror::Error;

/// Genre list, stored comma-joined and exposed as a list.
///
/// Entries are trimmed; empty entries are dropped.
///
/// # Examples
/// ```
/// use trio::domain::Genres;
///
/// let genres = Genres::from_stored("Jazz, Reggae,,Swing");
/// assert_eq!(genres.as_slice(), ["Jazz", "Reggae", "Swing"]);
/// assert_eq!(genres.to_stored(), "Jazz,Reggae,Swing");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Genres(Vec<String>);

impl Genres {
    /// Build from a list of genre names.
    #[must_use]
    pub fn new<I, S>(genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            genres
                .into_iter()
                .flat_map(|genre| {
                    genre
                        .as_ref()
                        .split(',')
                        .map(str::trim)
                        .filter(|part| !part.is_empty())
                        .map(str::to_owned)
                        .collect::<Vec<_>>()
                })
                .collect(),
        )
    }

    /// Parse the comma-joined storage form.
    #[must_use]
    pub fn from_stored(raw: &str) -> Self {
        Self::new([raw])
    }

    /// Render the comma-joined storage form.
    #[must_use]
    pub fn to_stored(&self) -> String {
        self.0.join(",")
    }

    /// Genre names in input order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Raised when a seeking flag is not one of the recognised spellings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised seeking flag {raw:?}; expected one of y, yes, true, on, 1, n, no, false, off, 0")]
pub struct SeekingFlagError {
    raw: String,
}

/// Whether a venue is seeking talent, or an artist is seeking venues.
///
/// Parsing replaces the HTML-form convention where only the literal `"y"`
/// meant "yes" with an explicit table; anything outside it is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeekingFlag {
    /// The listing is advertising.
    Seeking,
    /// The listing is not advertising.
    #[default]
    NotSeeking,
}

impl SeekingFlag {
    /// Whether the flag is set.
    #[must_use]
    pub const fn is_seeking(self) -> bool {
        matches!(self, Self::Seeking)
    }
}

impl From<bool> for SeekingFlag {
    fn from(value: bool) -> Self {
        if value {
            Self::Seeking
        } else {
            Self::NotSeeking
        }
    }
}

impl FromStr for SeekingFlag {
    type Err = SeekingFlagError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" | "true" | "on" | "1" => Ok(Self::Seeking),
            "n" | "no" | "false" | "off" | "0" | "" => Ok(Self::NotSeeking),
            _ => Err(SeekingFlagError {
                raw: raw.to_owned(),
            }),
        }
    }
}

/// Seeking advert: the flag plus its description.
///
/// ## Invariants
/// - A description is only kept while the flag is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seeking {
    flag: SeekingFlag,
    description: Option<String>,
}

impl Seeking {
    /// Combine a flag with an optional description, dropping the description
    /// when the flag is not set or the text is blank.
    #[must_use]
    pub fn new(flag: SeekingFlag, description: Option<String>) -> Self {
        let kept = if flag.is_seeking() {
            description
                .map(|text| text.trim().to_owned())
                .filter(|text| !text.is_empty())
        } else {
            None
        };
        Self {
            flag,
            description: kept,
        }
    }

    /// Whether the listing is advertising.
    #[must_use]
    pub const fn is_seeking(&self) -> bool {
        self.flag.is_seeking()
    }

    /// Advert text, present only while seeking.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Optional external links attached to a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links {
    /// Picture shown on listing cards.
    pub image_link: Option<String>,
    /// Facebook page.
    pub facebook_link: Option<String>,
    /// Own website.
    pub website_link: Option<String>,
}

impl Links {
    fn normalised(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|text| text.trim().to_owned())
                .filter(|text| !text.is_empty())
        }
        Self {
            image_link: clean(self.image_link),
            facebook_link: clean(self.facebook_link),
            website_link: clean(self.website_link),
        }
    }
}

/// Validation failures for listing profiles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileValidationError {
    /// A required text field was empty after trimming.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Wire name of the offending field.
        field: &'static str,
    },
}

impl ProfileValidationError {
    /// Wire name of the offending field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyField { field } => field,
        }
    }
}

impl From<ProfileValidationError> for super::Error {
    fn from(value: ProfileValidationError) -> Self {
        Self::invalid_request(value.to_string())
            .with_details(json!({ "field": value.field(), "code": "empty_field" }))
    }
}

/// Unvalidated profile input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub links: Links,
    pub seeking: SeekingFlag,
    pub seeking_description: Option<String>,
}

/// Validated public profile of a venue or artist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    name: String,
    city: String,
    state: String,
    phone: Option<String>,
    genres: Genres,
    links: Links,
    seeking: Seeking,
}

pub(crate) fn require_text(
    value: String,
    field: &'static str,
) -> Result<String, ProfileValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ProfileValidationError::EmptyField { field })
    } else {
        Ok(trimmed.to_owned())
    }
}

impl Profile {
    /// Listing name, unique per entity kind.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Home city.
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Home state.
    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Contact phone number.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Genres played or hosted.
    #[must_use]
    pub fn genres(&self) -> &Genres {
        &self.genres
    }

    /// External links.
    #[must_use]
    pub fn links(&self) -> &Links {
        &self.links
    }

    /// Seeking advert.
    #[must_use]
    pub fn seeking(&self) -> &Seeking {
        &self.seeking
    }
}

impl TryFrom<ProfileDraft> for Profile {
    type Error = ProfileValidationError;

    fn try_from(draft: ProfileDraft) -> Result<Self, Self::Error> {
        Ok(Self {
            name: require_text(draft.name, "name")?,
            city: require_text(draft.city, "city")?,
            state: require_text(draft.state, "state")?,
            phone: draft
                .phone
                .map(|phone| phone.trim().to_owned())
                .filter(|phone| !phone.is_empty()),
            genres: Genres::new(draft.genres),
            links: draft.links.normalised(),
            seeking: Seeking::new(draft.seeking, draft.seeking_description),
        })
    }
}
