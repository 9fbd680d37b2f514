//! Trivia category HTTP handlers.
//!
//! ```text
//! GET /categories                       {"1": "Science", ...}
//! GET /categories/{id}/questions?page=N one page of a category
//! ```

use std::collections::BTreeMap;

use actix_web::{HttpResponse, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Category, CategoryId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::ok;
use crate::inbound::http::questions::QuestionBody;
use crate::inbound::http::schemas::FailureSchema;
use crate::inbound::http::state::TriviaState;
use crate::inbound::http::validation::PageQuery;

/// Category labels keyed by id; ids render as JSON object keys.
pub type CategoryMap = BTreeMap<i32, String>;

#[must_use]
pub(crate) fn category_map(categories: Vec<Category>) -> CategoryMap {
    categories
        .into_iter()
        .map(|category| (category.id.get(), category.kind))
        .collect()
}

/// `{categories}` body.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoriesResponse {
    #[schema(value_type = Object, example = json!({"1": "Science", "2": "Art"}))]
    pub categories: CategoryMap,
}

/// One page of a category's questions.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryQuestionsResponse {
    pub questions: Vec<QuestionBody>,
    /// Size of the category, not of the page.
    pub total_questions: usize,
    pub current_category: i32,
}

/// List every category.
#[utoipa::path(
    get,
    path = "/categories",
    responses((status = 200, description = "Category labels by id", body = CategoriesResponse)),
    tags = ["trivia"],
    operation_id = "listCategories"
)]
pub async fn list_categories(state: web::Data<TriviaState>) -> ApiResult<HttpResponse> {
    let categories = state.query.categories().await?;
    Ok(ok(CategoriesResponse {
        categories: category_map(categories),
    }))
}

/// One page of a category's questions.
#[utoipa::path(
    get,
    path = "/categories/{id}/questions",
    params(
        ("id" = i32, Path, description = "Category id"),
        ("page" = Option<i64>, Query, description = "1-based page; values below 1 read as 1")
    ),
    responses(
        (status = 200, description = "Questions in the category", body = CategoryQuestionsResponse),
        (status = 400, description = "Page is not an integer", body = FailureSchema),
        (status = 404, description = "Page is empty", body = FailureSchema)
    ),
    tags = ["trivia"],
    operation_id = "listCategoryQuestions"
)]
pub async fn category_questions(
    state: web::Data<TriviaState>,
    path: web::Path<i32>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let request = query.to_request()?;
    let category = CategoryId::new(path.into_inner());
    let page = state.query.category_questions(category, request).await?;
    let total_questions = page.total();
    Ok(ok(CategoryQuestionsResponse {
        questions: page.into_items().into_iter().map(QuestionBody::from).collect(),
        total_questions,
        current_category: category.get(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn categories_render_as_an_id_keyed_object() {
        let map = category_map(vec![
            Category {
                id: CategoryId::new(2),
                kind: "Art".to_owned(),
            },
            Category {
                id: CategoryId::new(1),
                kind: "Science".to_owned(),
            },
        ]);
        let value = serde_json::to_value(CategoriesResponse { categories: map })
            .expect("categories serialise");
        assert_eq!(
            value,
            json!({"categories": {"1": "Science", "2": "Art"}})
        );
    }
}
