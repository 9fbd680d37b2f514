//! Artist HTTP handlers.
//!
//! ```text
//! GET    /artists              every artist
//! POST   /artists/search       name search
//! POST   /artists/create       list an artist
//! GET    /artists/{id}         artist page with past and upcoming shows
//! GET    /artists/{id}/edit    current editable record
//! POST   /artists/{id}/edit    replace the record
//! DELETE /artists/{id}         remove the artist and their shows
//! ```

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Artist, ArtistDetail, ArtistId, Profile, SearchTerm, validate_artist};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{created, ok};
use crate::inbound::http::profile_form::{
    DeletedResponse, ListingBody, NameSearch, ProfileBody, ProfileFields, SearchResponse,
    VenueShowBody,
};
use crate::inbound::http::schemas::FailureSchema;
use crate::inbound::http::state::BookingState;
use crate::inbound::http::validation::{FieldName, FlagInput};

/// Create or edit form for an artist.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ArtistForm {
    #[serde(flatten)]
    pub profile: ProfileFields,
    /// Accepted spellings as for venues' `seeking_talent`.
    #[serde(default)]
    pub seeking_venue: Option<FlagInput>,
}

fn parse_artist_form(form: ArtistForm) -> ApiResult<Profile> {
    let draft = form
        .profile
        .into_draft(form.seeking_venue, FieldName::new("seeking_venue"))?;
    Ok(validate_artist(draft)?)
}

/// An artist as stored.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ArtistBody {
    pub id: i32,
    #[serde(flatten)]
    pub profile: ProfileBody,
    pub seeking_venue: bool,
}

impl From<&Artist> for ArtistBody {
    fn from(artist: &Artist) -> Self {
        Self {
            id: artist.id.get(),
            profile: ProfileBody::from(&artist.profile),
            seeking_venue: artist.profile.seeking().is_seeking(),
        }
    }
}

/// `{artist}` body.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ArtistResponse {
    pub artist: ArtistBody,
}

/// An artist with their bucketed shows.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ArtistDetailBody {
    #[serde(flatten)]
    pub artist: ArtistBody,
    pub past_shows: Vec<VenueShowBody>,
    pub upcoming_shows: Vec<VenueShowBody>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl From<ArtistDetail> for ArtistDetailBody {
    fn from(detail: ArtistDetail) -> Self {
        let past_shows_count = detail.shows.past_count();
        let upcoming_shows_count = detail.shows.upcoming_count();
        let (past, upcoming) = detail.shows.into_parts();
        Self {
            artist: ArtistBody::from(&detail.artist),
            past_shows: past.into_iter().map(VenueShowBody::from).collect(),
            upcoming_shows: upcoming.into_iter().map(VenueShowBody::from).collect(),
            past_shows_count,
            upcoming_shows_count,
        }
    }
}

/// `{artist}` body for the artist page.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ArtistDetailResponse {
    pub artist: ArtistDetailBody,
}

/// Artist id and name.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ArtistSummaryBody {
    pub id: i32,
    pub name: String,
}

/// `{artists}` body.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ArtistsResponse {
    pub artists: Vec<ArtistSummaryBody>,
}

/// List every artist.
#[utoipa::path(
    get,
    path = "/artists",
    responses(
        (status = 200, description = "Every artist", body = ArtistsResponse),
        (status = 503, description = "Database unavailable", body = FailureSchema)
    ),
    tags = ["artists"],
    operation_id = "listArtists"
)]
pub async fn list_artists(state: web::Data<BookingState>) -> ApiResult<HttpResponse> {
    let artists = state.query.artists().await?;
    Ok(ok(ArtistsResponse {
        artists: artists
            .into_iter()
            .map(|artist| ArtistSummaryBody {
                id: artist.id.get(),
                name: artist.name,
            })
            .collect(),
    }))
}

/// Search artists by name.
#[utoipa::path(
    post,
    path = "/artists/search",
    request_body = NameSearch,
    responses(
        (status = 200, description = "Matching artists", body = SearchResponse),
        (status = 400, description = "Malformed body", body = FailureSchema)
    ),
    tags = ["artists"],
    operation_id = "searchArtists"
)]
pub async fn search_artists(
    state: web::Data<BookingState>,
    payload: web::Json<NameSearch>,
) -> ApiResult<HttpResponse> {
    let term = SearchTerm::new(payload.into_inner().search_term);
    let matches = state.query.search_artists(&term).await?;
    Ok(ok(SearchResponse::new(
        matches
            .into_iter()
            .map(|listing| ListingBody {
                id: listing.id.get(),
                name: listing.name,
                num_upcoming_shows: listing.num_upcoming_shows,
            })
            .collect(),
    )))
}

/// Show an artist with their past and upcoming shows.
#[utoipa::path(
    get,
    path = "/artists/{id}",
    params(("id" = i32, Path, description = "Artist id")),
    responses(
        (status = 200, description = "Artist page", body = ArtistDetailResponse),
        (status = 404, description = "No such artist", body = FailureSchema)
    ),
    tags = ["artists"],
    operation_id = "getArtist"
)]
pub async fn show_artist(
    state: web::Data<BookingState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let detail = state
        .query
        .artist_detail(ArtistId::new(path.into_inner()))
        .await?;
    Ok(ok(ArtistDetailResponse {
        artist: ArtistDetailBody::from(detail),
    }))
}

/// List a new artist.
#[utoipa::path(
    post,
    path = "/artists/create",
    request_body = ArtistForm,
    responses(
        (status = 201, description = "Artist listed", body = ArtistResponse),
        (status = 400, description = "Invalid form", body = FailureSchema),
        (status = 422, description = "Name already taken", body = FailureSchema)
    ),
    tags = ["artists"],
    operation_id = "createArtist"
)]
pub async fn create_artist(
    state: web::Data<BookingState>,
    payload: web::Json<ArtistForm>,
) -> ApiResult<HttpResponse> {
    let profile = parse_artist_form(payload.into_inner())?;
    let artist = state.command.create_artist(profile).await?;
    Ok(created(ArtistResponse {
        artist: ArtistBody::from(&artist),
    }))
}

/// Fetch an artist for editing.
#[utoipa::path(
    get,
    path = "/artists/{id}/edit",
    params(("id" = i32, Path, description = "Artist id")),
    responses(
        (status = 200, description = "Current record", body = ArtistResponse),
        (status = 404, description = "No such artist", body = FailureSchema)
    ),
    tags = ["artists"],
    operation_id = "editArtistForm"
)]
pub async fn edit_artist_form(
    state: web::Data<BookingState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let artist = state.query.artist(ArtistId::new(path.into_inner())).await?;
    Ok(ok(ArtistResponse {
        artist: ArtistBody::from(&artist),
    }))
}

/// Replace an artist's record.
#[utoipa::path(
    post,
    path = "/artists/{id}/edit",
    params(("id" = i32, Path, description = "Artist id")),
    request_body = ArtistForm,
    responses(
        (status = 200, description = "Updated record", body = ArtistResponse),
        (status = 400, description = "Invalid form", body = FailureSchema),
        (status = 404, description = "No such artist", body = FailureSchema),
        (status = 422, description = "Name already taken", body = FailureSchema)
    ),
    tags = ["artists"],
    operation_id = "editArtist"
)]
pub async fn edit_artist(
    state: web::Data<BookingState>,
    path: web::Path<i32>,
    payload: web::Json<ArtistForm>,
) -> ApiResult<HttpResponse> {
    let profile = parse_artist_form(payload.into_inner())?;
    let artist = state
        .command
        .update_artist(ArtistId::new(path.into_inner()), profile)
        .await?;
    Ok(ok(ArtistResponse {
        artist: ArtistBody::from(&artist),
    }))
}

/// Delete an artist and their shows.
#[utoipa::path(
    delete,
    path = "/artists/{id}",
    params(("id" = i32, Path, description = "Artist id")),
    responses(
        (status = 200, description = "Artist deleted", body = DeletedResponse),
        (status = 404, description = "No such artist", body = FailureSchema)
    ),
    tags = ["artists"],
    operation_id = "deleteArtist"
)]
pub async fn delete_artist(
    state: web::Data<BookingState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let deleted = state
        .command
        .delete_artist(ArtistId::new(path.into_inner()))
        .await?;
    Ok(ok(DeletedResponse {
        deleted: deleted.get(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!("yes"), true)]
    #[case(json!("1"), true)]
    #[case(json!("no"), false)]
    #[case(json!(true), true)]
    fn seeking_venue_spellings(#[case] flag: serde_json::Value, #[case] expected: bool) {
        let form: ArtistForm = serde_json::from_value(json!({
            "name": "Guns N Petals",
            "city": "San Francisco",
            "state": "CA",
            "seeking_venue": flag,
        }))
        .expect("form deserialises");
        let profile = parse_artist_form(form).expect("valid form");
        assert_eq!(profile.seeking().is_seeking(), expected);
    }

    #[rstest]
    fn unknown_seeking_spelling_is_a_bad_request() {
        let form: ArtistForm = serde_json::from_value(json!({
            "name": "Guns N Petals",
            "city": "San Francisco",
            "state": "CA",
            "seeking_venue": "sometimes",
        }))
        .expect("form deserialises");
        let err = parse_artist_form(form).expect_err("unknown spelling");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}
