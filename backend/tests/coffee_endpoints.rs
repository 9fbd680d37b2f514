//! End-to-end tests for the coffee-shop routes and their permission guard.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test as actix_test, web};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use trio::domain::ports::TokenVerificationError;
use trio::domain::{AccessGuard, CoffeeService};
use trio::inbound::http::health::HealthState;
use trio::inbound::http::state::CoffeeState;
use trio::server::{AppDependencies, build_app};
use trio::test_support::{InMemoryDrinkRepository, StaticTokenVerifier};

const MANAGER: &str = "manager-token";
const BARISTA: &str = "barista-token";
const LAPSED: &str = "lapsed-token";

#[fixture]
fn verifier() -> StaticTokenVerifier {
    StaticTokenVerifier::new()
        .granting(
            MANAGER,
            &[
                "get:drinks-detail",
                "post:drinks",
                "patch:drinks",
                "delete:drinks",
            ],
        )
        .granting(BARISTA, &["get:drinks-detail"])
        .answering(LAPSED, Err(TokenVerificationError::expired()))
}

fn deps(verifier: StaticTokenVerifier) -> AppDependencies {
    let service = Arc::new(CoffeeService::new(Arc::new(InMemoryDrinkRepository::new())));
    let guard = Arc::new(AccessGuard::new(Arc::new(verifier)));
    AppDependencies::new(web::Data::new(HealthState::new()))
        .with_coffee(CoffeeState::new(service.clone(), service, guard))
}

macro_rules! app {
    ($verifier:expr) => {
        actix_test::init_service(build_app(deps($verifier))).await
    };
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

fn matcha() -> Value {
    json!({
        "title": "Matcha Shake",
        "recipe": [
            {"color": "green", "name": "matcha", "parts": 1},
            {"color": "white", "name": "milk", "parts": 3}
        ]
    })
}

async fn send<S>(app: &S, request: actix_test::TestRequest) -> (StatusCode, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body: Value = actix_test::read_body_json(response).await;
    (status, body)
}

#[rstest]
#[actix_web::test]
async fn empty_menu_is_not_found(verifier: StaticTokenVerifier) {
    let app = app!(verifier);
    let (status, body) = send(&app, actix_test::TestRequest::get().uri("/drinks")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
}

#[rstest]
#[actix_web::test]
async fn manager_runs_the_menu_lifecycle(verifier: StaticTokenVerifier) {
    let app = app!(verifier);

    let (status, created) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/drinks")
            .insert_header(bearer(MANAGER))
            .set_json(matcha()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let drink = &created["drinks"][0];
    assert_eq!(drink["title"], json!("Matcha Shake"));
    let id = drink["id"].as_i64().expect("drink id");

    let (status, public) = send(&app, actix_test::TestRequest::get().uri("/drinks")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        public["drinks"][0]["recipe"][0],
        json!({"color": "green", "parts": 1})
    );

    let (status, detail) = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/drinks-detail")
            .insert_header(bearer(BARISTA)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["drinks"][0]["recipe"][1]["name"], json!("milk"));

    let (status, patched) = send(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/drinks/{id}"))
            .insert_header(bearer(MANAGER))
            .set_json(json!({"title": "Iced Matcha"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["drinks"][0]["title"], json!("Iced Matcha"));
    assert_eq!(patched["drinks"][0]["recipe"].as_array().map(Vec::len), Some(2));

    let (status, deleted) = send(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/drinks/{id}"))
            .insert_header(bearer(MANAGER)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["delete"], json!(id));

    let (status, _) = send(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/drinks/{id}"))
            .insert_header(bearer(MANAGER)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn duplicate_title_is_unprocessable(verifier: StaticTokenVerifier) {
    let app = app!(verifier);
    let create = || {
        actix_test::TestRequest::post()
            .uri("/drinks")
            .insert_header(bearer(MANAGER))
            .set_json(matcha())
    };
    let (first, _) = send(&app, create()).await;
    assert_eq!(first, StatusCode::OK);
    let (status, body) = send(&app, create()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], json!(422));
}

#[rstest]
#[case(None, StatusCode::UNAUTHORIZED)]
#[case(Some("Token abc"), StatusCode::UNAUTHORIZED)]
#[case(Some("Bearer"), StatusCode::UNAUTHORIZED)]
#[case(Some("Bearer stranger-token"), StatusCode::UNAUTHORIZED)]
#[case(Some("Bearer barista-token"), StatusCode::FORBIDDEN)]
#[actix_web::test]
async fn writes_are_guarded(
    verifier: StaticTokenVerifier,
    #[case] authorization: Option<&str>,
    #[case] expected: StatusCode,
) {
    let app = app!(verifier);
    let mut request = actix_test::TestRequest::post().uri("/drinks").set_json(matcha());
    if let Some(value) = authorization {
        request = request.insert_header(("Authorization", value));
    }
    let (status, body) = send(&app, request).await;
    assert_eq!(status, expected);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!(expected.as_u16()));
}

#[rstest]
#[actix_web::test]
async fn expired_token_is_flagged(verifier: StaticTokenVerifier) {
    let app = app!(verifier);
    let (status, body) = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/drinks-detail")
            .insert_header(bearer(LAPSED)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["details"]["code"], json!("token_expired"));
}
