use std::collections::HashSet;
use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::AppResult;
use crate::http_server::extract::ApiJson;
use crate::http_server::http_routes::{QuestionJson, lenient_number};
use crate::http_server::state::AppState;
use crate::services::quiz::{QuizCategory, QuizService};

#[derive(Debug, Deserialize)]
pub struct QuizCategoryInput {
    #[serde(deserialize_with = "lenient_number")]
    id: i64,
}

#[derive(Debug, Deserialize)]
pub struct QuizInput {
    previous_questions: Vec<i64>,
    quiz_category: QuizCategoryInput,
}

pub async fn next_quiz_question(
    State(app_state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<QuizInput>,
) -> AppResult<Json<Value>> {
    let previous: HashSet<i64> = input.previous_questions.into_iter().collect();
    let question = QuizService::new(app_state.db.clone())
        .next_question(QuizCategory::from(input.quiz_category.id), &previous)
        .await?;

    Ok(Json(json!({
        "success": true,
        "question": question.map(QuestionJson::from),
    })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::http_server::http_routes::tests::{send, test_app};
    use crate::services::category::CategoryService;
    use crate::services::question::QuestionService;
    use crate::services::question::tests::question_form;

    #[tokio::test]
    async fn test_quiz_round_ends_with_null() {
        let (app, db) = test_app().await;
        CategoryService::new(db.clone()).seed_defaults().await.unwrap();
        let questions = QuestionService::new(db);
        let mut ids = Vec::new();
        for i in 0..3 {
            let q = questions
                .create(question_form(&format!("Geography {i}"), 3))
                .await
                .unwrap();
            ids.push(q.id);
        }

        let (status, json) = send(
            &app,
            "POST",
            "/quizzes",
            Some(json!({
                "previous_questions": [ids[0], ids[1]],
                "quiz_category": {"type": "Geography", "id": "3"},
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["question"]["id"], ids[2]);

        let (status, json) = send(
            &app,
            "POST",
            "/quizzes",
            Some(json!({
                "previous_questions": ids,
                "quiz_category": {"id": 3},
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert!(json["question"].is_null());
    }

    #[tokio::test]
    async fn test_quiz_any_category() {
        let (app, db) = test_app().await;
        CategoryService::new(db.clone()).seed_defaults().await.unwrap();
        let question = QuestionService::new(db)
            .create(question_form("Who discovered penicillin?", 1))
            .await
            .unwrap();

        let (status, json) = send(
            &app,
            "POST",
            "/quizzes",
            Some(json!({
                "previous_questions": [],
                "quiz_category": {"type": "click", "id": 0},
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["question"]["id"], question.id);
    }

    #[tokio::test]
    async fn test_quiz_missing_previous_questions_is_422() {
        let (app, _db) = test_app().await;

        let (status, json) = send(
            &app,
            "POST",
            "/quizzes",
            Some(json!({ "quiz_category": {"id": 0} })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["success"], false);
    }
}
