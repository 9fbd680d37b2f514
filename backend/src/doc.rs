//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every booking, trivia and coffee-shop endpoint plus
//! the health checks. Response schemas are collected from the path
//! annotations; the failure envelope and error codes are registered
//! explicitly. The coffee-shop guard appears as a bearer JWT scheme.
//!
//! The document is served by Swagger UI in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ErrorCode;
use crate::inbound::http::schemas::FailureSchema;

/// Adds the bearer token scheme used by the drink endpoints.
struct BearerAddon;

impl Modify for BearerAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "RS256 access token from the identity provider; the `permissions` \
                         claim gates each drink operation.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&BearerAddon),
    info(
        title = "trio backend API",
        description = "Booking site, trivia game and coffee-shop menu served from one process.",
        license(name = "ISC", url = "https://opensource.org/license/isc-license-txt")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::venues::list_venues,
        crate::inbound::http::venues::search_venues,
        crate::inbound::http::venues::show_venue,
        crate::inbound::http::venues::create_venue,
        crate::inbound::http::venues::edit_venue_form,
        crate::inbound::http::venues::edit_venue,
        crate::inbound::http::venues::delete_venue,
        crate::inbound::http::artists::list_artists,
        crate::inbound::http::artists::search_artists,
        crate::inbound::http::artists::show_artist,
        crate::inbound::http::artists::create_artist,
        crate::inbound::http::artists::edit_artist_form,
        crate::inbound::http::artists::edit_artist,
        crate::inbound::http::artists::delete_artist,
        crate::inbound::http::shows::list_shows,
        crate::inbound::http::shows::create_show,
        crate::inbound::http::shows::show_show,
        crate::inbound::http::shows::delete_show,
        crate::inbound::http::categories::list_categories,
        crate::inbound::http::categories::category_questions,
        crate::inbound::http::questions::list_questions,
        crate::inbound::http::questions::create_question,
        crate::inbound::http::questions::delete_question,
        crate::inbound::http::questions::search_questions,
        crate::inbound::http::quizzes::next_quiz_question,
        crate::inbound::http::drinks::list_drinks,
        crate::inbound::http::drinks::drink_details,
        crate::inbound::http::drinks::create_drink,
        crate::inbound::http::drinks::update_drink,
        crate::inbound::http::drinks::delete_drink,
    ),
    components(schemas(FailureSchema, ErrorCode)),
    tags(
        (name = "health", description = "Liveness and readiness checks"),
        (name = "venues", description = "Booking site venues"),
        (name = "artists", description = "Booking site artists"),
        (name = "shows", description = "Shows joining venues and artists"),
        (name = "trivia", description = "Trivia questions, categories and quizzes"),
        (name = "coffee", description = "Coffee-shop drink menu")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    #[rstest]
    #[case("/venues/{id}")]
    #[case("/artists/search")]
    #[case("/shows/create")]
    #[case("/categories/{id}/questions")]
    #[case("/quizzes")]
    #[case("/drinks-detail")]
    #[case("/health/ready")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn failure_envelope_is_registered() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get("Failure").expect("Failure schema") {
            RefOr::T(Schema::Object(obj)) => {
                for field in ["success", "error", "code", "message", "traceId"] {
                    assert!(obj.properties.contains_key(field), "missing {field}");
                }
            }
            _ => panic!("expected object schema"),
        }
    }

    #[rstest]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
