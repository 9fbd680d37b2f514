//! Venue HTTP handlers.
//!
//! ```text
//! GET    /venues              venues grouped by city and state
//! POST   /venues/search       name search
//! POST   /venues/create       list a venue
//! GET    /venues/{id}         venue page with past and upcoming shows
//! GET    /venues/{id}/edit    current editable record
//! POST   /venues/{id}/edit    replace the record
//! DELETE /venues/{id}         remove the venue and its shows
//! ```

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    SearchTerm, Venue, VenueArea, VenueDetail, VenueDraft, VenueId, VenueListing, VenueRecord,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{created, ok};
use crate::inbound::http::profile_form::{
    ArtistShowBody, DeletedResponse, ListingBody, NameSearch, ProfileBody, ProfileFields,
    SearchResponse,
};
use crate::inbound::http::schemas::FailureSchema;
use crate::inbound::http::state::BookingState;
use crate::inbound::http::validation::{FieldName, FlagInput};

/// Create or edit form for a venue.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VenueForm {
    #[serde(flatten)]
    pub profile: ProfileFields,
    #[schema(example = "1015 Folsom Street")]
    pub address: String,
    /// `y`, `yes`, `true`, `on`, `1` (or JSON `true`) mark the venue as
    /// seeking talent.
    #[serde(default)]
    pub seeking_talent: Option<FlagInput>,
}

fn parse_venue_form(form: VenueForm) -> ApiResult<VenueRecord> {
    let profile = form
        .profile
        .into_draft(form.seeking_talent, FieldName::new("seeking_talent"))?;
    let record = VenueRecord::try_from(VenueDraft {
        profile,
        address: form.address,
    })?;
    Ok(record)
}

/// A venue as stored.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VenueBody {
    pub id: i32,
    #[serde(flatten)]
    pub profile: ProfileBody,
    pub address: String,
    pub seeking_talent: bool,
}

impl From<&Venue> for VenueBody {
    fn from(venue: &Venue) -> Self {
        let profile = venue.record.profile();
        Self {
            id: venue.id.get(),
            profile: ProfileBody::from(profile),
            address: venue.record.address().to_owned(),
            seeking_talent: profile.seeking().is_seeking(),
        }
    }
}

/// `{venue}` body.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VenueResponse {
    pub venue: VenueBody,
}

/// A venue with its bucketed shows.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VenueDetailBody {
    #[serde(flatten)]
    pub venue: VenueBody,
    pub past_shows: Vec<ArtistShowBody>,
    pub upcoming_shows: Vec<ArtistShowBody>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl From<VenueDetail> for VenueDetailBody {
    fn from(detail: VenueDetail) -> Self {
        let past_shows_count = detail.shows.past_count();
        let upcoming_shows_count = detail.shows.upcoming_count();
        let (past, upcoming) = detail.shows.into_parts();
        Self {
            venue: VenueBody::from(&detail.venue),
            past_shows: past.into_iter().map(ArtistShowBody::from).collect(),
            upcoming_shows: upcoming.into_iter().map(ArtistShowBody::from).collect(),
            past_shows_count,
            upcoming_shows_count,
        }
    }
}

/// `{venue}` body for the venue page.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VenueDetailResponse {
    pub venue: VenueDetailBody,
}

/// Venues sharing a city and state.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AreaBody {
    pub city: String,
    pub state: String,
    pub venues: Vec<ListingBody>,
}

fn listing_body(listing: VenueListing) -> ListingBody {
    ListingBody {
        id: listing.id.get(),
        name: listing.name,
        num_upcoming_shows: listing.num_upcoming_shows,
    }
}

impl From<VenueArea> for AreaBody {
    fn from(area: VenueArea) -> Self {
        Self {
            city: area.city,
            state: area.state,
            venues: area.venues.into_iter().map(listing_body).collect(),
        }
    }
}

/// `{areas}` body.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AreasResponse {
    pub areas: Vec<AreaBody>,
}

/// List venues grouped by area.
#[utoipa::path(
    get,
    path = "/venues",
    responses(
        (status = 200, description = "Venues grouped by city and state", body = AreasResponse),
        (status = 503, description = "Database unavailable", body = FailureSchema)
    ),
    tags = ["venues"],
    operation_id = "listVenues"
)]
pub async fn list_venues(state: web::Data<BookingState>) -> ApiResult<HttpResponse> {
    let areas = state.query.venue_areas().await?;
    Ok(ok(AreasResponse {
        areas: areas.into_iter().map(AreaBody::from).collect(),
    }))
}

/// Search venues by name.
#[utoipa::path(
    post,
    path = "/venues/search",
    request_body = NameSearch,
    responses(
        (status = 200, description = "Matching venues", body = SearchResponse),
        (status = 400, description = "Malformed body", body = FailureSchema)
    ),
    tags = ["venues"],
    operation_id = "searchVenues"
)]
pub async fn search_venues(
    state: web::Data<BookingState>,
    payload: web::Json<NameSearch>,
) -> ApiResult<HttpResponse> {
    let term = SearchTerm::new(payload.into_inner().search_term);
    let matches = state.query.search_venues(&term).await?;
    Ok(ok(SearchResponse::new(
        matches.into_iter().map(listing_body).collect(),
    )))
}

/// Show a venue with its past and upcoming shows.
#[utoipa::path(
    get,
    path = "/venues/{id}",
    params(("id" = i32, Path, description = "Venue id")),
    responses(
        (status = 200, description = "Venue page", body = VenueDetailResponse),
        (status = 404, description = "No such venue", body = FailureSchema)
    ),
    tags = ["venues"],
    operation_id = "getVenue"
)]
pub async fn show_venue(
    state: web::Data<BookingState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let detail = state.query.venue_detail(VenueId::new(path.into_inner())).await?;
    Ok(ok(VenueDetailResponse {
        venue: VenueDetailBody::from(detail),
    }))
}

/// List a new venue.
#[utoipa::path(
    post,
    path = "/venues/create",
    request_body = VenueForm,
    responses(
        (status = 201, description = "Venue listed", body = VenueResponse),
        (status = 400, description = "Invalid form", body = FailureSchema),
        (status = 422, description = "Name already taken", body = FailureSchema)
    ),
    tags = ["venues"],
    operation_id = "createVenue"
)]
pub async fn create_venue(
    state: web::Data<BookingState>,
    payload: web::Json<VenueForm>,
) -> ApiResult<HttpResponse> {
    let record = parse_venue_form(payload.into_inner())?;
    let venue = state.command.create_venue(record).await?;
    Ok(created(VenueResponse {
        venue: VenueBody::from(&venue),
    }))
}

/// Fetch a venue for editing.
#[utoipa::path(
    get,
    path = "/venues/{id}/edit",
    params(("id" = i32, Path, description = "Venue id")),
    responses(
        (status = 200, description = "Current record", body = VenueResponse),
        (status = 404, description = "No such venue", body = FailureSchema)
    ),
    tags = ["venues"],
    operation_id = "editVenueForm"
)]
pub async fn edit_venue_form(
    state: web::Data<BookingState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let venue = state.query.venue(VenueId::new(path.into_inner())).await?;
    Ok(ok(VenueResponse {
        venue: VenueBody::from(&venue),
    }))
}

/// Replace a venue's record.
#[utoipa::path(
    post,
    path = "/venues/{id}/edit",
    params(("id" = i32, Path, description = "Venue id")),
    request_body = VenueForm,
    responses(
        (status = 200, description = "Updated record", body = VenueResponse),
        (status = 400, description = "Invalid form", body = FailureSchema),
        (status = 404, description = "No such venue", body = FailureSchema),
        (status = 422, description = "Name already taken", body = FailureSchema)
    ),
    tags = ["venues"],
    operation_id = "editVenue"
)]
pub async fn edit_venue(
    state: web::Data<BookingState>,
    path: web::Path<i32>,
    payload: web::Json<VenueForm>,
) -> ApiResult<HttpResponse> {
    let record = parse_venue_form(payload.into_inner())?;
    let venue = state
        .command
        .update_venue(VenueId::new(path.into_inner()), record)
        .await?;
    Ok(ok(VenueResponse {
        venue: VenueBody::from(&venue),
    }))
}

/// Delete a venue and its shows.
#[utoipa::path(
    delete,
    path = "/venues/{id}",
    params(("id" = i32, Path, description = "Venue id")),
    responses(
        (status = 200, description = "Venue deleted", body = DeletedResponse),
        (status = 404, description = "No such venue", body = FailureSchema)
    ),
    tags = ["venues"],
    operation_id = "deleteVenue"
)]
pub async fn delete_venue(
    state: web::Data<BookingState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let deleted = state
        .command
        .delete_venue(VenueId::new(path.into_inner()))
        .await?;
    Ok(ok(DeletedResponse {
        deleted: deleted.get(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn form() -> serde_json::Value {
        json!({
            "name": "The Dueling Pianos Bar",
            "city": "New York",
            "state": "NY",
            "address": "335 Delancey Street",
            "genres": ["Classical", "R&B", "Hip-Hop"],
            "seeking_talent": "y",
            "seeking_description": "Looking for a pianist"
        })
    }

    #[rstest]
    fn form_parses_into_a_record(form: serde_json::Value) {
        let parsed: VenueForm = serde_json::from_value(form).expect("form deserialises");
        let record = parse_venue_form(parsed).expect("valid form");
        assert_eq!(record.address(), "335 Delancey Street");
        assert!(record.profile().seeking().is_seeking());
        assert_eq!(
            record.profile().seeking().description(),
            Some("Looking for a pianist")
        );
    }

    #[rstest]
    fn description_is_dropped_when_not_seeking(mut form: serde_json::Value) {
        form["seeking_talent"] = json!(false);
        let parsed: VenueForm = serde_json::from_value(form).expect("form deserialises");
        let record = parse_venue_form(parsed).expect("valid form");
        assert_eq!(record.profile().seeking().description(), None);
    }

    #[rstest]
    fn blank_address_is_a_bad_request(mut form: serde_json::Value) {
        form["address"] = json!("   ");
        let parsed: VenueForm = serde_json::from_value(form).expect("form deserialises");
        let err = parse_venue_form(parsed).expect_err("blank address");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details().and_then(|d| d.get("field")), Some(&json!("address")));
    }

    #[rstest]
    fn venue_body_exposes_genres_as_a_list(form: serde_json::Value) {
        let parsed: VenueForm = serde_json::from_value(form).expect("form deserialises");
        let venue = Venue {
            id: VenueId::new(2),
            record: parse_venue_form(parsed).expect("valid form"),
        };
        let body = serde_json::to_value(VenueBody::from(&venue)).expect("body serialises");
        assert_eq!(body["genres"], json!(["Classical", "R&B", "Hip-Hop"]));
        assert_eq!(body["seeking_talent"], json!(true));
        assert_eq!(body["id"], json!(2));
    }
}
