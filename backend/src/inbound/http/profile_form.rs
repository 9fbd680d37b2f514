//! Wire shapes shared by the venue and artist forms.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Engagement, Links, Profile, ProfileDraft, format_start_time};
use crate::inbound::http::validation::{FieldName, FlagInput, parse_seeking_flag};

/// Profile fields common to venue and artist forms.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProfileFields {
    #[schema(example = "The Musical Hop")]
    pub name: String,
    #[schema(example = "San Francisco")]
    pub city: String,
    #[schema(example = "CA")]
    pub state: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub image_link: Option<String>,
    #[serde(default)]
    pub facebook_link: Option<String>,
    #[serde(default)]
    pub website_link: Option<String>,
    #[serde(default)]
    pub seeking_description: Option<String>,
}

impl ProfileFields {
    pub(crate) fn into_draft(
        self,
        seeking: Option<FlagInput>,
        seeking_field: FieldName,
    ) -> Result<ProfileDraft, crate::domain::Error> {
        Ok(ProfileDraft {
            name: self.name,
            city: self.city,
            state: self.state,
            phone: self.phone,
            genres: self.genres,
            links: Links {
                image_link: self.image_link,
                facebook_link: self.facebook_link,
                website_link: self.website_link,
            },
            seeking: parse_seeking_flag(seeking, seeking_field)?,
            seeking_description: self.seeking_description,
        })
    }
}

/// Profile fields as rendered in responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileBody {
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website_link: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub seeking_description: Option<String>,
}

impl From<&Profile> for ProfileBody {
    fn from(profile: &Profile) -> Self {
        let links = profile.links();
        Self {
            name: profile.name().to_owned(),
            genres: profile.genres().as_slice().to_vec(),
            city: profile.city().to_owned(),
            state: profile.state().to_owned(),
            phone: profile.phone().map(str::to_owned),
            website_link: links.website_link.clone(),
            facebook_link: links.facebook_link.clone(),
            image_link: links.image_link.clone(),
            seeking_description: profile.seeking().description().map(str::to_owned),
        }
    }
}

/// A bucketed show seen from a venue page.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ArtistShowBody {
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    #[schema(example = "2035-04-01 20:00:00")]
    pub start_time: String,
}

impl From<Engagement> for ArtistShowBody {
    fn from(engagement: Engagement) -> Self {
        Self {
            artist_id: engagement.counterpart_id,
            artist_name: engagement.counterpart_name,
            artist_image_link: engagement.counterpart_image_link,
            start_time: format_start_time(engagement.start_time),
        }
    }
}

/// A bucketed show seen from an artist page.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VenueShowBody {
    pub venue_id: i32,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    #[schema(example = "2035-04-01 20:00:00")]
    pub start_time: String,
}

impl From<Engagement> for VenueShowBody {
    fn from(engagement: Engagement) -> Self {
        Self {
            venue_id: engagement.counterpart_id,
            venue_name: engagement.counterpart_name,
            venue_image_link: engagement.counterpart_image_link,
            start_time: format_start_time(engagement.start_time),
        }
    }
}

/// Name search body used by venue and artist search.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct NameSearch {
    /// Case-insensitive substring; empty matches everything.
    #[serde(default)]
    pub search_term: String,
}

/// Search hit with its live upcoming show count.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListingBody {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// `{count, data}` search result.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SearchResponse {
    pub count: usize,
    pub data: Vec<ListingBody>,
}

impl SearchResponse {
    #[must_use]
    pub(crate) fn new(data: Vec<ListingBody>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// `{deleted: id}` body returned by delete endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeletedResponse {
    pub deleted: i32,
}
