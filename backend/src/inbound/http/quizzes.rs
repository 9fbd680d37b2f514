//! Quiz HTTP handler.
//!
//! ```text
//! POST /quizzes  {"previous_questions": [..], "quiz_category": {"id": 0, "type": "click"}}
//! ```
//!
//! Category id 0 draws from every category. When every candidate has been
//! asked the response carries `"question": false`.

use std::collections::HashSet;

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Error, QuestionId, QuizCategory, QuizDraw, QuizRound};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::ok;
use crate::inbound::http::questions::QuestionBody;
use crate::inbound::http::schemas::FailureSchema;
use crate::inbound::http::state::TriviaState;
use crate::inbound::http::validation::IntegerInput;

/// Category selector as sent by the quiz client.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct QuizCategoryInput {
    #[serde(default)]
    #[schema(value_type = Option<i32>, example = 0)]
    pub id: Option<IntegerInput>,
    /// Display label; ignored.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Quiz round request.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct QuizRequest {
    #[serde(default)]
    pub previous_questions: Vec<i32>,
    #[serde(default)]
    pub quiz_category: Option<QuizCategoryInput>,
}

fn unresolvable(message: &str) -> Error {
    Error::unprocessable(message.to_owned()).with_details(json!({
        "field": "quiz_category",
        "code": "unresolvable_category",
    }))
}

fn parse_quiz_request(request: QuizRequest) -> ApiResult<QuizRound> {
    let category = request
        .quiz_category
        .ok_or_else(|| unresolvable("quiz_category is required"))?;
    let id = match category.id {
        None => return Err(unresolvable("quiz_category.id is required")),
        Some(IntegerInput::Number(value)) => i32::try_from(value).ok(),
        Some(IntegerInput::Text(raw)) => raw.trim().parse().ok(),
    }
    .ok_or_else(|| unresolvable("quiz_category.id must be an integer"))?;
    Ok(QuizRound {
        category: QuizCategory::from_id(id),
        previous_questions: request
            .previous_questions
            .into_iter()
            .map(QuestionId::new)
            .collect::<HashSet<_>>(),
    })
}

/// Next quiz question, or `false` once the pool is exhausted.
#[derive(Debug, Clone)]
pub enum NextQuestion {
    Question(QuestionBody),
    Exhausted,
}

impl Serialize for NextQuestion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Question(question) => question.serialize(serializer),
            Self::Exhausted => serializer.serialize_bool(false),
        }
    }
}

impl From<QuizDraw> for NextQuestion {
    fn from(draw: QuizDraw) -> Self {
        match draw {
            QuizDraw::Question(question) => Self::Question(QuestionBody::from(question)),
            QuizDraw::Exhausted => Self::Exhausted,
        }
    }
}

/// `{question}` body.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuizResponse {
    /// A question object, or `false`.
    #[schema(value_type = Object)]
    pub question: NextQuestion,
}

/// Draw the next unasked question.
#[utoipa::path(
    post,
    path = "/quizzes",
    request_body = QuizRequest,
    responses(
        (status = 200, description = "Next question or false", body = QuizResponse),
        (status = 400, description = "Malformed body", body = FailureSchema),
        (status = 422, description = "Category missing or without questions", body = FailureSchema)
    ),
    tags = ["trivia"],
    operation_id = "nextQuizQuestion"
)]
pub async fn next_quiz_question(
    state: web::Data<TriviaState>,
    payload: web::Json<QuizRequest>,
) -> ApiResult<HttpResponse> {
    let round = parse_quiz_request(payload.into_inner())?;
    let draw = state.query.next_quiz_question(round).await?;
    Ok(ok(QuizResponse {
        question: NextQuestion::from(draw),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CategoryId, ErrorCode};
    use rstest::rstest;
    use serde_json::Value;

    fn request(body: Value) -> QuizRequest {
        serde_json::from_value(body).expect("quiz request deserialises")
    }

    #[rstest]
    #[case(json!({"quiz_category": {"id": 0, "type": "click"}}), QuizCategory::All)]
    #[case(json!({"quiz_category": {"id": "0"}}), QuizCategory::All)]
    #[case(json!({"quiz_category": {"id": 3}}), QuizCategory::Only(CategoryId::new(3)))]
    #[case(json!({"quiz_category": {"id": "5"}}), QuizCategory::Only(CategoryId::new(5)))]
    fn categories_resolve(#[case] body: Value, #[case] expected: QuizCategory) {
        let round = parse_quiz_request(request(body)).expect("resolvable category");
        assert_eq!(round.category, expected);
        assert!(round.previous_questions.is_empty());
    }

    #[rstest]
    #[case(json!({"previous_questions": []}))]
    #[case(json!({"quiz_category": {"type": "Art"}}))]
    #[case(json!({"quiz_category": {"id": "art"}}))]
    #[case(json!({"quiz_category": {"id": 4_000_000_000_i64}}))]
    fn unresolvable_categories_are_unprocessable(#[case] body: Value) {
        let err = parse_quiz_request(request(body)).expect_err("unresolvable");
        assert_eq!(err.code(), ErrorCode::Unprocessable);
    }

    #[rstest]
    fn previous_questions_become_a_set() {
        let round = parse_quiz_request(request(json!({
            "previous_questions": [2, 4, 4],
            "quiz_category": {"id": 1},
        })))
        .expect("valid request");
        assert_eq!(round.previous_questions.len(), 2);
        assert!(round.previous_questions.contains(&QuestionId::new(4)));
    }

    #[rstest]
    fn exhausted_draw_serialises_as_false() {
        let value = serde_json::to_value(QuizResponse {
            question: NextQuestion::Exhausted,
        })
        .expect("response serialises");
        assert_eq!(value, json!({"question": false}));
    }
}
