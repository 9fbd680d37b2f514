//! Show HTTP handlers.
//!
//! ```text
//! GET    /shows           every show, latest first
//! POST   /shows/create    book a show
//! GET    /shows/{id}      one show
//! DELETE /shows/{id}      cancel a show
//! ```

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ArtistId, Show, ShowDraft, ShowId, ShowListing, VenueId, format_start_time};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{created, ok};
use crate::inbound::http::profile_form::DeletedResponse;
use crate::inbound::http::schemas::FailureSchema;
use crate::inbound::http::state::BookingState;
use crate::inbound::http::validation::{FieldName, IntegerInput, parse_start_time};

/// Booking form.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ShowForm {
    #[schema(value_type = i32, example = 4)]
    pub artist_id: IntegerInput,
    #[schema(value_type = i32, example = 1)]
    pub venue_id: IntegerInput,
    /// RFC 3339, or `YYYY-MM-DD HH:MM:SS` read as UTC.
    #[schema(example = "2035-04-01 20:00:00")]
    pub start_time: String,
}

fn parse_show_form(form: &ShowForm) -> ApiResult<ShowDraft> {
    Ok(ShowDraft {
        artist_id: ArtistId::new(form.artist_id.to_id(FieldName::new("artist_id"))?),
        venue_id: VenueId::new(form.venue_id.to_id(FieldName::new("venue_id"))?),
        start_time: parse_start_time(&form.start_time, FieldName::new("start_time"))?,
    })
}

/// A show row in the listing.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShowListingBody {
    pub id: i32,
    pub venue_id: i32,
    pub venue_name: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    #[schema(example = "2035-04-01 20:00:00")]
    pub start_time: String,
}

impl From<ShowListing> for ShowListingBody {
    fn from(show: ShowListing) -> Self {
        Self {
            id: show.id.get(),
            venue_id: show.venue_id.get(),
            venue_name: show.venue_name,
            artist_id: show.artist_id.get(),
            artist_name: show.artist_name,
            artist_image_link: show.artist_image_link,
            start_time: format_start_time(show.start_time),
        }
    }
}

/// `{shows}` body.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShowsResponse {
    pub shows: Vec<ShowListingBody>,
}

/// `{show}` body for a single listing row.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShowResponse {
    pub show: ShowListingBody,
}

/// A newly booked show.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookedShowBody {
    pub id: i32,
    pub venue_id: i32,
    pub artist_id: i32,
    pub start_time: String,
}

impl From<Show> for BookedShowBody {
    fn from(show: Show) -> Self {
        Self {
            id: show.id.get(),
            venue_id: show.venue_id.get(),
            artist_id: show.artist_id.get(),
            start_time: format_start_time(show.start_time),
        }
    }
}

/// `{show}` body returned on booking.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookedShowResponse {
    pub show: BookedShowBody,
}

/// List every show, latest first.
#[utoipa::path(
    get,
    path = "/shows",
    responses((status = 200, description = "Every show", body = ShowsResponse)),
    tags = ["shows"],
    operation_id = "listShows"
)]
pub async fn list_shows(state: web::Data<BookingState>) -> ApiResult<HttpResponse> {
    let shows = state.query.shows().await?;
    Ok(ok(ShowsResponse {
        shows: shows.into_iter().map(ShowListingBody::from).collect(),
    }))
}

/// Book a show.
#[utoipa::path(
    post,
    path = "/shows/create",
    request_body = ShowForm,
    responses(
        (status = 201, description = "Show booked", body = BookedShowResponse),
        (status = 400, description = "Invalid form or start time", body = FailureSchema),
        (status = 422, description = "Unknown venue or artist", body = FailureSchema)
    ),
    tags = ["shows"],
    operation_id = "createShow"
)]
pub async fn create_show(
    state: web::Data<BookingState>,
    payload: web::Json<ShowForm>,
) -> ApiResult<HttpResponse> {
    let draft = parse_show_form(&payload)?;
    let show = state.command.create_show(draft).await?;
    Ok(created(BookedShowResponse {
        show: BookedShowBody::from(show),
    }))
}

/// Fetch one show.
#[utoipa::path(
    get,
    path = "/shows/{id}",
    params(("id" = i32, Path, description = "Show id")),
    responses(
        (status = 200, description = "Show row", body = ShowResponse),
        (status = 404, description = "No such show", body = FailureSchema)
    ),
    tags = ["shows"],
    operation_id = "getShow"
)]
pub async fn show_show(
    state: web::Data<BookingState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let show = state.query.show(ShowId::new(path.into_inner())).await?;
    Ok(ok(ShowResponse {
        show: ShowListingBody::from(show),
    }))
}

/// Cancel a show.
#[utoipa::path(
    delete,
    path = "/shows/{id}",
    params(("id" = i32, Path, description = "Show id")),
    responses(
        (status = 200, description = "Show deleted", body = DeletedResponse),
        (status = 404, description = "No such show", body = FailureSchema)
    ),
    tags = ["shows"],
    operation_id = "deleteShow"
)]
pub async fn delete_show(
    state: web::Data<BookingState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let deleted = state
        .command
        .delete_show(ShowId::new(path.into_inner()))
        .await?;
    Ok(ok(DeletedResponse {
        deleted: deleted.get(),
    }))
}
