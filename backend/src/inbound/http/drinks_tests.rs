//! Handler tests for the coffee-shop endpoints.

use std::sync::Arc;

use actix_web::{App, http::StatusCode, test as actix_test, web};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockAccessControl, MockDrinksCommand, MockDrinksQuery};
use crate::domain::{Error, Recipe, VerifiedClaims};

#[fixture]
fn water() -> Drink {
    Drink {
        id: DrinkId::new(1),
        title: "Water".to_owned(),
        recipe: Recipe::new(vec![RecipePart {
            color: "blue".to_owned(),
            name: "water".to_owned(),
            parts: 1,
        }])
        .expect("valid recipe"),
    }
}

fn granting(permission: Permission) -> MockAccessControl {
    let mut access = MockAccessControl::new();
    access
        .expect_authorize()
        .withf(move |_, requested| *requested == permission)
        .returning(|_, _| Ok(VerifiedClaims::default()));
    access
}

fn refusing() -> MockAccessControl {
    let mut access = MockAccessControl::new();
    access
        .expect_authorize()
        .returning(|_, _| Err(Error::forbidden("request is forbidden")));
    access
}

fn state(
    query: MockDrinksQuery,
    command: MockDrinksCommand,
    access: MockAccessControl,
) -> CoffeeState {
    CoffeeState::new(Arc::new(query), Arc::new(command), Arc::new(access))
}

async fn call(state: CoffeeState, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .route("/drinks", web::get().to(list_drinks))
            .route("/drinks", web::post().to(create_drink))
            .route("/drinks-detail", web::get().to(drink_details))
            .route("/drinks/{id}", web::patch().to(update_drink))
            .route("/drinks/{id}", web::delete().to(delete_drink)),
    )
    .await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body: Value = actix_test::read_body_json(response).await;
    (status, body)
}

#[rstest]
#[actix_web::test]
async fn public_menu_hides_ingredient_names(water: Drink) {
    let mut query = MockDrinksQuery::new();
    query.expect_menu().return_once(move || Ok(vec![water]));
    let (status, body) = call(
        state(query, MockDrinksCommand::new(), MockAccessControl::new()),
        actix_test::TestRequest::get().uri("/drinks"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "drinks": [{"id": 1, "title": "Water", "recipe": [{"color": "blue", "parts": 1}]}]
        })
    );
}

#[rstest]
#[actix_web::test]
async fn detail_requires_a_bearer_header() {
    let (status, body) = call(
        state(
            MockDrinksQuery::new(),
            MockDrinksCommand::new(),
            MockAccessControl::new(),
        ),
        actix_test::TestRequest::get().uri("/drinks-detail"),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!(401));
}

#[rstest]
#[actix_web::test]
async fn detail_shows_full_recipes(water: Drink) {
    let mut query = MockDrinksQuery::new();
    query.expect_menu().return_once(move || Ok(vec![water]));
    let (status, body) = call(
        state(
            query,
            MockDrinksCommand::new(),
            granting(Permission::GetDrinksDetail),
        ),
        actix_test::TestRequest::get()
            .uri("/drinks-detail")
            .insert_header(("Authorization", "Bearer token")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"][0]["recipe"][0]["name"], json!("water"));
}

#[rstest]
#[actix_web::test]
async fn refused_permission_leaves_the_menu_untouched() {
    let (status, body) = call(
        state(MockDrinksQuery::new(), MockDrinksCommand::new(), refusing()),
        actix_test::TestRequest::post()
            .uri("/drinks")
            .insert_header(("Authorization", "Bearer token"))
            .set_json(json!({"title": "Latte", "recipe": {"color": "brown", "name": "milk", "parts": 1}})),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], json!(403));
}

#[rstest]
#[actix_web::test]
async fn single_recipe_part_is_accepted_on_create() {
    let mut command = MockDrinksCommand::new();
    command
        .expect_create_drink()
        .withf(|drink| drink.title == "Latte" && drink.recipe.parts().len() == 1)
        .returning(|drink| {
            Ok(Drink {
                id: DrinkId::new(5),
                title: drink.title,
                recipe: drink.recipe,
            })
        });
    let (status, body) = call(
        state(MockDrinksQuery::new(), command, granting(Permission::PostDrinks)),
        actix_test::TestRequest::post()
            .uri("/drinks")
            .insert_header(("Authorization", "Bearer token"))
            .set_json(json!({"title": "Latte", "recipe": {"color": "brown", "name": "milk", "parts": 1}})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"][0]["id"], json!(5));
    assert_eq!(body["drinks"][0]["recipe"][0]["name"], json!("milk"));
}

#[rstest]
#[actix_web::test]
async fn patch_forwards_only_supplied_fields(water: Drink) {
    let mut command = MockDrinksCommand::new();
    command
        .expect_update_drink()
        .withf(|id, patch| *id == DrinkId::new(1) && patch.recipe.is_none())
        .return_once(move |_, patch| Ok(patch.apply(water)));
    let (status, body) = call(
        state(MockDrinksQuery::new(), command, granting(Permission::PatchDrinks)),
        actix_test::TestRequest::patch()
            .uri("/drinks/1")
            .insert_header(("Authorization", "Bearer token"))
            .set_json(json!({"title": "Sparkling Water"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"][0]["title"], json!("Sparkling Water"));
}

#[rstest]
#[actix_web::test]
async fn delete_reports_the_removed_id() {
    let mut command = MockDrinksCommand::new();
    command
        .expect_delete_drink()
        .returning(|id| Ok(id));
    let (status, body) = call(
        state(MockDrinksQuery::new(), command, granting(Permission::DeleteDrinks)),
        actix_test::TestRequest::delete()
            .uri("/drinks/3")
            .insert_header(("Authorization", "Bearer token")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "delete": 3}));
}
