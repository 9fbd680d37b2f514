//! Route tables for the three applications and the shared fallbacks.
//!
//! Each resource lists its verbs explicitly and falls back to a 405
//! envelope, so a wrong verb on a known path never reads as "not found".
//! `OPTIONS` on a known path answers 204 for CORS preflight.
//!
//! Literal segments (`/venues/search`, `/venues/create`) are registered
//! before the `{id}` patterns they would otherwise collide with.

use actix_web::http::Method;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::debug;

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::{
    artists, categories, drinks, health, questions, quizzes, shows, venues,
};

async fn method_not_allowed(request: HttpRequest) -> ApiResult<HttpResponse> {
    if request.method() == Method::OPTIONS {
        return Ok(HttpResponse::NoContent().finish());
    }
    Err(Error::method_not_allowed(format!(
        "{} is not allowed on {}",
        request.method(),
        request.path()
    )))
}

/// Application-wide fallback for unknown paths.
pub async fn not_found(request: HttpRequest) -> ApiResult<HttpResponse> {
    debug!(path = request.path(), "no route matched");
    Err(Error::not_found("resource not found"))
}

fn resource(path: &str) -> actix_web::Resource {
    web::resource(path).default_service(web::to(method_not_allowed))
}

/// Malformed JSON bodies become 400 envelopes.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _request| {
        Error::invalid_request(format!("malformed request body: {err}")).into()
    })
}

/// Malformed query strings become 400 envelopes.
#[must_use]
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _request| {
        Error::invalid_request(format!("malformed query string: {err}")).into()
    })
}

/// Path segments that do not parse as ids name no resource.
#[must_use]
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|_err, request| {
        Error::not_found(format!("{} does not name a resource", request.path())).into()
    })
}

/// Liveness and readiness checks.
pub fn configure_health(cfg: &mut web::ServiceConfig) {
    cfg.service(resource("/health/ready").route(web::get().to(health::ready)))
        .service(resource("/health/live").route(web::get().to(health::live)));
}

/// Venues, artists and shows.
pub fn configure_booking(cfg: &mut web::ServiceConfig) {
    cfg.service(resource("/venues").route(web::get().to(venues::list_venues)))
        .service(resource("/venues/search").route(web::post().to(venues::search_venues)))
        .service(resource("/venues/create").route(web::post().to(venues::create_venue)))
        .service(
            resource("/venues/{id}")
                .route(web::get().to(venues::show_venue))
                .route(web::delete().to(venues::delete_venue)),
        )
        .service(
            resource("/venues/{id}/edit")
                .route(web::get().to(venues::edit_venue_form))
                .route(web::post().to(venues::edit_venue)),
        )
        .service(resource("/artists").route(web::get().to(artists::list_artists)))
        .service(resource("/artists/search").route(web::post().to(artists::search_artists)))
        .service(resource("/artists/create").route(web::post().to(artists::create_artist)))
        .service(
            resource("/artists/{id}")
                .route(web::get().to(artists::show_artist))
                .route(web::delete().to(artists::delete_artist)),
        )
        .service(
            resource("/artists/{id}/edit")
                .route(web::get().to(artists::edit_artist_form))
                .route(web::post().to(artists::edit_artist)),
        )
        .service(resource("/shows").route(web::get().to(shows::list_shows)))
        .service(resource("/shows/create").route(web::post().to(shows::create_show)))
        .service(
            resource("/shows/{id}")
                .route(web::get().to(shows::show_show))
                .route(web::delete().to(shows::delete_show)),
        );
}

/// Questions, categories and quizzes.
pub fn configure_trivia(cfg: &mut web::ServiceConfig) {
    cfg.service(resource("/categories").route(web::get().to(categories::list_categories)))
        .service(
            resource("/categories/{id}/questions")
                .route(web::get().to(categories::category_questions)),
        )
        .service(
            resource("/questions")
                .route(web::get().to(questions::list_questions))
                .route(web::post().to(questions::create_question)),
        )
        .service(
            resource("/questions/search").route(web::post().to(questions::search_questions)),
        )
        .service(
            resource("/questions/{id}").route(web::delete().to(questions::delete_question)),
        )
        .service(resource("/quizzes").route(web::post().to(quizzes::next_quiz_question)));
}

/// Drink menu.
pub fn configure_coffee(cfg: &mut web::ServiceConfig) {
    cfg.service(
        resource("/drinks")
            .route(web::get().to(drinks::list_drinks))
            .route(web::post().to(drinks::create_drink)),
    )
    .service(resource("/drinks-detail").route(web::get().to(drinks::drink_details)))
    .service(
        resource("/drinks/{id}")
            .route(web::patch().to(drinks::update_drink))
            .route(web::delete().to(drinks::delete_drink)),
    );
}
