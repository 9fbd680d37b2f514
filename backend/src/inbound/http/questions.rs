//! Trivia question HTTP handlers.
//!
//! ```text
//! GET    /questions?page=N          one page of every question
//! POST   /questions                 add a question
//! DELETE /questions/{id}            remove a question
//! POST   /questions/search?page=N   one page of a text search
//! ```

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CategoryId, NewQuestion, Question, QuestionDraft, QuestionId, SearchTerm};
use crate::inbound::http::ApiResult;
use crate::inbound::http::categories::{CategoryMap, category_map};
use crate::inbound::http::envelope::ok;
use crate::inbound::http::profile_form::DeletedResponse;
use crate::inbound::http::schemas::FailureSchema;
use crate::inbound::http::state::TriviaState;
use crate::inbound::http::validation::{FieldName, IntegerInput, PageQuery};

/// A question as rendered to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuestionBody {
    pub id: i32,
    #[schema(example = "What is the heaviest organ in the human body?")]
    pub question: String,
    pub answer: String,
    pub difficulty: u8,
    pub category: i32,
}

impl From<Question> for QuestionBody {
    fn from(question: Question) -> Self {
        Self {
            id: question.id.get(),
            question: question.text,
            answer: question.answer,
            difficulty: question.difficulty.get(),
            category: question.category.get(),
        }
    }
}

/// One page of every question plus the category labels.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuestionsResponse {
    pub questions: Vec<QuestionBody>,
    pub total_questions: usize,
    #[schema(value_type = Object)]
    pub categories: CategoryMap,
    #[schema(value_type = Option<i32>)]
    pub current_category: Option<i32>,
}

/// One page of search hits.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SearchQuestionsResponse {
    pub questions: Vec<QuestionBody>,
    /// Size of the matching set, not of the page.
    pub total_questions: usize,
    #[schema(value_type = Option<i32>)]
    pub current_category: Option<i32>,
}

/// New question form. `difficulty` and `category` accept numbers or
/// numeric strings.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct QuestionForm {
    pub question: String,
    pub answer: String,
    #[schema(value_type = i32, example = 3)]
    pub difficulty: IntegerInput,
    #[schema(value_type = i32, example = 1)]
    pub category: IntegerInput,
}

fn parse_question_form(form: QuestionForm) -> ApiResult<NewQuestion> {
    let draft = QuestionDraft {
        difficulty: form.difficulty.to_i64(FieldName::new("difficulty"))?,
        category: CategoryId::new(form.category.to_id(FieldName::new("category"))?),
        text: form.question,
        answer: form.answer,
    };
    Ok(NewQuestion::try_from(draft)?)
}

/// The stored question, echoed back.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreatedQuestionResponse {
    /// Id of the new question.
    pub created: i32,
    pub question: String,
    pub answer: String,
    pub difficulty: u8,
    pub category: i32,
}

/// Search body; the key is camel-cased on the wire.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct QuestionSearch {
    #[serde(default, rename = "searchTerm")]
    pub search_term: String,
}

/// One page of every question.
#[utoipa::path(
    get,
    path = "/questions",
    params(("page" = Option<i64>, Query, description = "1-based page; values below 1 read as 1")),
    responses(
        (status = 200, description = "Questions and categories", body = QuestionsResponse),
        (status = 400, description = "Page is not an integer", body = FailureSchema),
        (status = 404, description = "Page is empty", body = FailureSchema)
    ),
    tags = ["trivia"],
    operation_id = "listQuestions"
)]
pub async fn list_questions(
    state: web::Data<TriviaState>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let request = query.to_request()?;
    let listing = state.query.questions(request).await?;
    let total_questions = listing.questions.total();
    Ok(ok(QuestionsResponse {
        questions: listing
            .questions
            .into_items()
            .into_iter()
            .map(QuestionBody::from)
            .collect(),
        total_questions,
        categories: category_map(listing.categories),
        current_category: None,
    }))
}

/// Add a question.
#[utoipa::path(
    post,
    path = "/questions",
    request_body = QuestionForm,
    responses(
        (status = 200, description = "Question created", body = CreatedQuestionResponse),
        (status = 400, description = "Invalid form", body = FailureSchema),
        (status = 422, description = "Unknown category", body = FailureSchema)
    ),
    tags = ["trivia"],
    operation_id = "createQuestion"
)]
pub async fn create_question(
    state: web::Data<TriviaState>,
    payload: web::Json<QuestionForm>,
) -> ApiResult<HttpResponse> {
    let question = parse_question_form(payload.into_inner())?;
    let stored = state.command.create_question(question).await?;
    Ok(ok(CreatedQuestionResponse {
        created: stored.id.get(),
        question: stored.text,
        answer: stored.answer,
        difficulty: stored.difficulty.get(),
        category: stored.category.get(),
    }))
}

/// Remove a question.
#[utoipa::path(
    delete,
    path = "/questions/{id}",
    params(("id" = i32, Path, description = "Question id")),
    responses(
        (status = 200, description = "Question deleted", body = DeletedResponse),
        (status = 404, description = "No such question", body = FailureSchema)
    ),
    tags = ["trivia"],
    operation_id = "deleteQuestion"
)]
pub async fn delete_question(
    state: web::Data<TriviaState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let deleted = state
        .command
        .delete_question(QuestionId::new(path.into_inner()))
        .await?;
    Ok(ok(DeletedResponse {
        deleted: deleted.get(),
    }))
}

/// One page of questions whose text contains the term.
#[utoipa::path(
    post,
    path = "/questions/search",
    params(("page" = Option<i64>, Query, description = "1-based page; values below 1 read as 1")),
    request_body = QuestionSearch,
    responses(
        (status = 200, description = "Matching questions", body = SearchQuestionsResponse),
        (status = 400, description = "Malformed body or page", body = FailureSchema)
    ),
    tags = ["trivia"],
    operation_id = "searchQuestions"
)]
pub async fn search_questions(
    state: web::Data<TriviaState>,
    query: web::Query<PageQuery>,
    payload: web::Json<QuestionSearch>,
) -> ApiResult<HttpResponse> {
    let request = query.to_request()?;
    let term = SearchTerm::new(payload.into_inner().search_term);
    let page = state.query.search_questions(&term, request).await?;
    let total_questions = page.total();
    Ok(ok(SearchQuestionsResponse {
        questions: page.into_items().into_iter().map(QuestionBody::from).collect(),
        total_questions,
        current_category: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;
    use serde_json::json;

    fn form(difficulty: serde_json::Value, category: serde_json::Value) -> QuestionForm {
        serde_json::from_value(json!({
            "question": "Whose autobiography is entitled 'I Know Why the Caged Bird Sings'?",
            "answer": "Maya Angelou",
            "difficulty": difficulty,
            "category": category,
        }))
        .expect("form deserialises")
    }

    #[rstest]
    fn string_numbers_are_accepted() {
        let question = parse_question_form(form(json!("2"), json!("4"))).expect("valid form");
        assert_eq!(question.difficulty.get(), 2);
        assert_eq!(question.category, CategoryId::new(4));
    }

    #[rstest]
    #[case(json!(0), json!(4), "difficulty")]
    #[case(json!(6), json!(4), "difficulty")]
    #[case(json!("hard"), json!(4), "difficulty")]
    #[case(json!(2), json!("history"), "category")]
    fn invalid_fields_are_named(
        #[case] difficulty: serde_json::Value,
        #[case] category: serde_json::Value,
        #[case] field: &str,
    ) {
        let err = parse_question_form(form(difficulty, category)).expect_err("invalid form");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details().and_then(|d| d.get("field")), Some(&json!(field)));
    }

    #[rstest]
    fn search_key_is_camel_case() {
        let search: QuestionSearch =
            serde_json::from_value(json!({"searchTerm": "title"})).expect("search deserialises");
        assert_eq!(search.search_term, "title");
    }
}
