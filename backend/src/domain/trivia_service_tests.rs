//! Tests for the trivia service.

use std::collections::HashSet;
use std::sync::Arc;

use pagination::PageNumber;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockCategoryRepository, MockQuestionRepository};
use crate::domain::{Difficulty, ErrorCode};

type TestService = TriviaService<MockQuestionRepository, MockCategoryRepository>;

fn make_service(questions: MockQuestionRepository, categories: MockCategoryRepository) -> TestService {
    TriviaService::with_rng(
        Arc::new(questions),
        Arc::new(categories),
        StdRng::seed_from_u64(11),
    )
}

fn question(id: i32, category: i32) -> Question {
    Question {
        id: QuestionId::new(id),
        text: format!("Question {id}?"),
        answer: format!("Answer {id}"),
        difficulty: Difficulty::new(2).expect("valid difficulty"),
        category: CategoryId::new(category),
    }
}

#[fixture]
fn category_one() -> Vec<Question> {
    (1..=12).map(|id| question(id, 1)).collect()
}

fn page_two() -> PageRequest {
    PageRequest::new(PageNumber::clamped(2))
}

#[rstest]
#[tokio::test]
async fn second_category_page_holds_the_last_two_questions(category_one: Vec<Question>) {
    let mut questions = MockQuestionRepository::new();
    questions
        .expect_page()
        .withf(|filter, _| *filter == QuestionFilter::Category(CategoryId::new(1)))
        .return_once(move |filter, request| {
            let matching = category_one
                .into_iter()
                .filter(|q| filter.accepts(q))
                .collect();
            Ok(Page::from_full(matching, request))
        });

    let page = make_service(questions, MockCategoryRepository::new())
        .category_questions(CategoryId::new(1), page_two())
        .await
        .expect("page loads");

    let ids: Vec<_> = page.items().iter().map(|q| q.id.get()).collect();
    assert_eq!(ids, vec![11, 12]);
    assert_eq!(page.total(), 12);
}

#[rstest]
#[tokio::test]
async fn empty_listing_page_is_not_found() {
    let mut questions = MockQuestionRepository::new();
    questions
        .expect_page()
        .return_once(|_, request| Ok(Page::new(Vec::new(), request, 3)));

    let error = make_service(questions, MockCategoryRepository::new())
        .questions(page_two())
        .await
        .expect_err("empty page");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn empty_search_page_is_not_an_error() {
    let mut questions = MockQuestionRepository::new();
    questions
        .expect_page()
        .return_once(|_, request| Ok(Page::new(Vec::new(), request, 0)));

    let page = make_service(questions, MockCategoryRepository::new())
        .search_questions(&SearchTerm::new("zebra"), PageRequest::default())
        .await
        .expect("search succeeds");
    assert!(page.is_empty());
}

#[rstest]
#[tokio::test]
async fn listing_includes_categories(category_one: Vec<Question>) {
    let mut questions = MockQuestionRepository::new();
    questions
        .expect_page()
        .return_once(move |_, request| Ok(Page::from_full(category_one, request)));
    let mut categories = MockCategoryRepository::new();
    categories.expect_list().return_once(|| {
        Ok(vec![Category {
            id: CategoryId::new(1),
            kind: "Science".to_owned(),
        }])
    });

    let listing = make_service(questions, categories)
        .questions(PageRequest::default())
        .await
        .expect("listing loads");
    assert_eq!(listing.questions.items().len(), 10);
    assert_eq!(listing.categories.len(), 1);
}

#[rstest]
#[tokio::test]
async fn quiz_over_all_categories_draws_an_unasked_question() {
    let mut questions = MockQuestionRepository::new();
    questions
        .expect_quiz_candidates()
        .withf(|category| *category == QuizCategory::All)
        .return_once(|_| Ok(vec![question(1, 1), question(2, 2), question(3, 3)]));
    let previous: HashSet<_> = [1, 3].into_iter().map(QuestionId::new).collect();

    let drawn = make_service(questions, MockCategoryRepository::new())
        .next_quiz_question(QuizRound {
            category: QuizCategory::from_id(0),
            previous_questions: previous,
        })
        .await
        .expect("draw succeeds");
    assert_eq!(drawn, QuizDraw::Question(question(2, 2)));
}

#[rstest]
#[tokio::test]
async fn quiz_with_nothing_left_is_exhausted() {
    let mut questions = MockQuestionRepository::new();
    questions
        .expect_quiz_candidates()
        .return_once(|_| Ok(vec![question(4, 2)]));

    let drawn = make_service(questions, MockCategoryRepository::new())
        .next_quiz_question(QuizRound {
            category: QuizCategory::from_id(2),
            previous_questions: [QuestionId::new(4)].into_iter().collect(),
        })
        .await
        .expect("draw succeeds");
    assert_eq!(drawn, QuizDraw::Exhausted);
}

#[rstest]
#[tokio::test]
async fn quiz_over_an_empty_category_is_unprocessable() {
    let mut questions = MockQuestionRepository::new();
    questions
        .expect_quiz_candidates()
        .return_once(|_| Ok(Vec::new()));

    let error = make_service(questions, MockCategoryRepository::new())
        .next_quiz_question(QuizRound {
            category: QuizCategory::from_id(42),
            previous_questions: HashSet::new(),
        })
        .await
        .expect_err("no candidates");
    assert_eq!(error.code(), ErrorCode::Unprocessable);
}

#[rstest]
#[tokio::test]
async fn creating_a_question_in_an_unknown_category_is_unprocessable() {
    let mut categories = MockCategoryRepository::new();
    categories.expect_find().return_once(|_| Ok(None));
    let mut questions = MockQuestionRepository::new();
    questions.expect_create().never();

    let error = make_service(questions, categories)
        .create_question(NewQuestion {
            text: "Who discovered penicillin?".to_owned(),
            answer: "Alexander Fleming".to_owned(),
            difficulty: Difficulty::new(3).expect("valid difficulty"),
            category: CategoryId::new(77),
        })
        .await
        .expect_err("unknown category");
    assert_eq!(error.code(), ErrorCode::Unprocessable);
}

#[rstest]
#[tokio::test]
async fn deleting_a_missing_question_is_not_found() {
    let mut questions = MockQuestionRepository::new();
    questions
        .expect_delete()
        .return_once(|id| Err(TriviaRepositoryError::question_not_found(id.get())));

    let error = make_service(questions, MockCategoryRepository::new())
        .delete_question(QuestionId::new(1000))
        .await
        .expect_err("missing question");
    assert_eq!(error.code(), ErrorCode::NotFound);
}
