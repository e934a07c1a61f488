use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::AppResult;
use crate::http_server::extract::{ApiJson, ApiPath, ApiQuery};
use crate::http_server::http_routes::{PageParams, QuestionJson, category_map, lenient_number};
use crate::http_server::state::AppState;
use crate::services::category::CategoryService;
use crate::services::question::{QuestionForm, QuestionService};

#[derive(Debug, Deserialize)]
pub struct QuestionInput {
    question: String,
    answer: String,
    #[serde(deserialize_with = "lenient_number")]
    category: i64,
    #[serde(deserialize_with = "lenient_number")]
    difficulty: i32,
}

impl From<QuestionInput> for QuestionForm {
    fn from(input: QuestionInput) -> Self {
        Self {
            question: input.question,
            answer: input.answer,
            category: input.category,
            difficulty: input.difficulty,
        }
    }
}

/// `POST /questions` either searches or creates, depending on the body.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum QuestionsPost {
    Search {
        #[serde(rename = "searchTerm")]
        search_term: String,
        #[serde(default)]
        page: Option<u64>,
    },
    Create(QuestionInput),
}

pub async fn list_questions(
    State(app_state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> AppResult<Json<Value>> {
    let result = QuestionService::new(app_state.db.clone())
        .list_page(params.page, app_state.questions_per_page)
        .await?;
    let categories = CategoryService::new(app_state.db.clone()).list().await?;

    let questions: Vec<QuestionJson> = result.items.into_iter().map(Into::into).collect();
    Ok(Json(json!({
        "success": true,
        "questions": questions,
        "total_questions": result.total_count,
        "current_category": null,
        "categories": category_map(categories),
    })))
}

pub async fn post_questions(
    State(app_state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<PageParams>,
    ApiJson(body): ApiJson<QuestionsPost>,
) -> AppResult<Json<Value>> {
    let service = QuestionService::new(app_state.db.clone());

    match body {
        QuestionsPost::Search { search_term, page } => {
            let result = service
                .search(&search_term, page.or(params.page), app_state.questions_per_page)
                .await?;

            let current_category: Vec<i64> =
                result.items.iter().map(|q| q.category_id).collect();
            let questions: Vec<QuestionJson> = result.items.into_iter().map(Into::into).collect();
            Ok(Json(json!({
                "success": true,
                "questions": questions,
                "total_questions": result.total_count,
                "current_category": current_category,
            })))
        }
        QuestionsPost::Create(input) => {
            let question = service.create(input.into()).await?;
            let total = service.count().await?;

            Ok(Json(json!({
                "success": true,
                "created": question.id,
                "total_questions": total,
            })))
        }
    }
}

pub async fn update_question(
    State(app_state): State<Arc<AppState>>,
    ApiPath(question_id): ApiPath<i64>,
    ApiJson(input): ApiJson<QuestionInput>,
) -> AppResult<Json<Value>> {
    let question = QuestionService::new(app_state.db.clone())
        .update(question_id, input.into())
        .await?;

    Ok(Json(json!({ "success": true, "updated": question.id })))
}

pub async fn delete_question(
    State(app_state): State<Arc<AppState>>,
    ApiPath(question_id): ApiPath<i64>,
) -> AppResult<Json<Value>> {
    QuestionService::new(app_state.db.clone())
        .delete(question_id)
        .await?;

    Ok(Json(json!({ "success": true, "deleted": question_id })))
}
