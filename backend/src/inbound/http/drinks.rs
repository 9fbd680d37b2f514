//! Coffee-shop drink HTTP handlers.
//!
//! ```text
//! GET    /drinks          public menu, recipes without ingredient names
//! GET    /drinks-detail   full recipes          get:drinks-detail
//! POST   /drinks          add a drink           post:drinks
//! PATCH  /drinks/{id}     partial update        patch:drinks
//! DELETE /drinks/{id}     remove a drink        delete:drinks
//! ```
//!
//! Guarded handlers take [`BearerCredentials`] and ask the access guard for
//! the permission before touching the menu.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Drink, DrinkId, DrinkPatch, NewDrink, Permission, RecipePart, ShortRecipePart,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerCredentials;
use crate::inbound::http::envelope::ok;
use crate::inbound::http::schemas::FailureSchema;
use crate::inbound::http::state::CoffeeState;

/// Ingredient layer with its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipePartBody {
    #[schema(example = "blue")]
    pub color: String,
    #[schema(example = "water")]
    pub name: String,
    #[schema(example = 1)]
    pub parts: u32,
}

impl From<&RecipePart> for RecipePartBody {
    fn from(part: &RecipePart) -> Self {
        Self {
            color: part.color.clone(),
            name: part.name.clone(),
            parts: part.parts,
        }
    }
}

impl From<RecipePartBody> for RecipePart {
    fn from(body: RecipePartBody) -> Self {
        Self {
            color: body.color,
            name: body.name,
            parts: body.parts,
        }
    }
}

/// Ingredient layer as shown on the public menu.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShortRecipePartBody {
    pub color: String,
    pub parts: u32,
}

impl From<ShortRecipePart> for ShortRecipePartBody {
    fn from(part: ShortRecipePart) -> Self {
        Self {
            color: part.color,
            parts: part.parts,
        }
    }
}

/// A recipe sent as a single part or a list of parts.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum RecipeInput {
    Many(Vec<RecipePartBody>),
    One(RecipePartBody),
}

impl RecipeInput {
    fn into_parts(self) -> Vec<RecipePart> {
        match self {
            Self::Many(parts) => parts.into_iter().map(RecipePart::from).collect(),
            Self::One(part) => vec![RecipePart::from(part)],
        }
    }
}

/// Drink without ingredient names.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShortDrinkBody {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<ShortRecipePartBody>,
}

impl From<Drink> for ShortDrinkBody {
    fn from(drink: Drink) -> Self {
        Self {
            id: drink.id.get(),
            recipe: drink
                .recipe
                .short()
                .into_iter()
                .map(ShortRecipePartBody::from)
                .collect(),
            title: drink.title,
        }
    }
}

/// Drink with its full recipe.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LongDrinkBody {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<RecipePartBody>,
}

impl From<Drink> for LongDrinkBody {
    fn from(drink: Drink) -> Self {
        Self {
            id: drink.id.get(),
            recipe: drink.recipe.parts().iter().map(RecipePartBody::from).collect(),
            title: drink.title,
        }
    }
}

/// `{drinks}` body; the element shape depends on the endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DrinksResponse<T> {
    pub drinks: Vec<T>,
}

/// `{delete}` body.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DrinkDeletedResponse {
    pub delete: i32,
}

/// New drink form.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DrinkForm {
    #[schema(example = "Water")]
    pub title: String,
    pub recipe: RecipeInput,
}

/// Partial drink update.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct DrinkPatchForm {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<RecipeInput>,
}

/// Public menu.
#[utoipa::path(
    get,
    path = "/drinks",
    responses(
        (status = 200, description = "Menu with short recipes", body = DrinksResponse<ShortDrinkBody>),
        (status = 404, description = "Menu is empty", body = FailureSchema)
    ),
    tags = ["coffee"],
    operation_id = "listDrinks"
)]
pub async fn list_drinks(state: web::Data<CoffeeState>) -> ApiResult<HttpResponse> {
    let drinks = state.query.menu().await?;
    Ok(ok(DrinksResponse {
        drinks: drinks.into_iter().map(ShortDrinkBody::from).collect(),
    }))
}

/// Staff menu with full recipes.
#[utoipa::path(
    get,
    path = "/drinks-detail",
    responses(
        (status = 200, description = "Menu with full recipes", body = DrinksResponse<LongDrinkBody>),
        (status = 401, description = "Missing or invalid token", body = FailureSchema),
        (status = 403, description = "Permission missing", body = FailureSchema),
        (status = 404, description = "Menu is empty", body = FailureSchema)
    ),
    security(("bearer" = ["get:drinks-detail"])),
    tags = ["coffee"],
    operation_id = "listDrinkDetails"
)]
pub async fn drink_details(
    state: web::Data<CoffeeState>,
    credentials: BearerCredentials,
) -> ApiResult<HttpResponse> {
    state
        .access
        .authorize(credentials.token(), Permission::GetDrinksDetail)
        .await?;
    let drinks = state.query.menu().await?;
    Ok(ok(DrinksResponse {
        drinks: drinks.into_iter().map(LongDrinkBody::from).collect(),
    }))
}

/// Add a drink.
#[utoipa::path(
    post,
    path = "/drinks",
    request_body = DrinkForm,
    responses(
        (status = 200, description = "Drink created", body = DrinksResponse<LongDrinkBody>),
        (status = 400, description = "Invalid form", body = FailureSchema),
        (status = 401, description = "Missing or invalid token", body = FailureSchema),
        (status = 403, description = "Permission missing", body = FailureSchema),
        (status = 422, description = "Title already taken", body = FailureSchema)
    ),
    security(("bearer" = ["post:drinks"])),
    tags = ["coffee"],
    operation_id = "createDrink"
)]
pub async fn create_drink(
    state: web::Data<CoffeeState>,
    credentials: BearerCredentials,
    payload: web::Json<DrinkForm>,
) -> ApiResult<HttpResponse> {
    state
        .access
        .authorize(credentials.token(), Permission::PostDrinks)
        .await?;
    let form = payload.into_inner();
    let drink = NewDrink::new(form.title, form.recipe.into_parts())?;
    let stored = state.command.create_drink(drink).await?;
    Ok(ok(DrinksResponse {
        drinks: vec![LongDrinkBody::from(stored)],
    }))
}

/// Partially update a drink.
#[utoipa::path(
    patch,
    path = "/drinks/{id}",
    params(("id" = i32, Path, description = "Drink id")),
    request_body = DrinkPatchForm,
    responses(
        (status = 200, description = "Drink updated", body = DrinksResponse<LongDrinkBody>),
        (status = 400, description = "Invalid form", body = FailureSchema),
        (status = 401, description = "Missing or invalid token", body = FailureSchema),
        (status = 403, description = "Permission missing", body = FailureSchema),
        (status = 404, description = "No such drink", body = FailureSchema)
    ),
    security(("bearer" = ["patch:drinks"])),
    tags = ["coffee"],
    operation_id = "updateDrink"
)]
pub async fn update_drink(
    state: web::Data<CoffeeState>,
    credentials: BearerCredentials,
    path: web::Path<i32>,
    payload: web::Json<DrinkPatchForm>,
) -> ApiResult<HttpResponse> {
    state
        .access
        .authorize(credentials.token(), Permission::PatchDrinks)
        .await?;
    let form = payload.into_inner();
    let patch = DrinkPatch::new(form.title, form.recipe.map(RecipeInput::into_parts))?;
    let updated = state
        .command
        .update_drink(DrinkId::new(path.into_inner()), patch)
        .await?;
    Ok(ok(DrinksResponse {
        drinks: vec![LongDrinkBody::from(updated)],
    }))
}

/// Remove a drink.
#[utoipa::path(
    delete,
    path = "/drinks/{id}",
    params(("id" = i32, Path, description = "Drink id")),
    responses(
        (status = 200, description = "Drink deleted", body = DrinkDeletedResponse),
        (status = 401, description = "Missing or invalid token", body = FailureSchema),
        (status = 403, description = "Permission missing", body = FailureSchema),
        (status = 404, description = "No such drink", body = FailureSchema)
    ),
    security(("bearer" = ["delete:drinks"])),
    tags = ["coffee"],
    operation_id = "deleteDrink"
)]
pub async fn delete_drink(
    state: web::Data<CoffeeState>,
    credentials: BearerCredentials,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    state
        .access
        .authorize(credentials.token(), Permission::DeleteDrinks)
        .await?;
    let deleted = state
        .command
        .delete_drink(DrinkId::new(path.into_inner()))
        .await?;
    Ok(ok(DrinkDeletedResponse {
        delete: deleted.get(),
    }))
}

#[cfg(test)]
#[path = "drinks_tests.rs"]
mod tests;
