use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::AppResult;
use crate::http_server::extract::{ApiJson, ApiPath, ApiQuery};
use crate::http_server::http_routes::{PageParams, QuestionJson, category_map};
use crate::http_server::state::AppState;
use crate::services::category::CategoryService;
use crate::services::question::QuestionService;

#[derive(Debug, Deserialize)]
pub struct CategoryInput {
    #[serde(rename = "type")]
    kind: String,
}

pub async fn list_categories(State(app_state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    let categories = CategoryService::new(app_state.db.clone()).list().await?;

    Ok(Json(json!({
        "success": true,
        "categories": category_map(categories),
    })))
}

pub async fn create_category(
    State(app_state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<CategoryInput>,
) -> AppResult<Json<Value>> {
    let category = CategoryService::new(app_state.db.clone())
        .create(&input.kind)
        .await?;

    Ok(Json(json!({ "success": true, "created": category.id })))
}

pub async fn update_category(
    State(app_state): State<Arc<AppState>>,
    ApiPath(category_id): ApiPath<i64>,
    ApiJson(input): ApiJson<CategoryInput>,
) -> AppResult<Json<Value>> {
    let category = CategoryService::new(app_state.db.clone())
        .update(category_id, &input.kind)
        .await?;

    Ok(Json(json!({ "success": true, "updated": category.id })))
}

pub async fn delete_category(
    State(app_state): State<Arc<AppState>>,
    ApiPath(category_id): ApiPath<i64>,
) -> AppResult<Json<Value>> {
    CategoryService::new(app_state.db.clone())
        .delete(category_id)
        .await?;

    Ok(Json(json!({ "success": true, "deleted": category_id })))
}

pub async fn questions_by_category(
    State(app_state): State<Arc<AppState>>,
    ApiPath(category_id): ApiPath<i64>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> AppResult<Json<Value>> {
    let (category, result) = QuestionService::new(app_state.db.clone())
        .by_category(category_id, params.page, app_state.questions_per_page)
        .await?;

    let questions: Vec<QuestionJson> = result.items.into_iter().map(Into::into).collect();
    Ok(Json(json!({
        "success": true,
        "questions": questions,
        "total_questions": result.total_count,
        "current_category": category.kind,
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
    async fn test_list_categories() {
        let (app, db) = test_app().await;
        CategoryService::new(db).seed_defaults().await.unwrap();

        let (status, json) = send(&app, "GET", "/categories", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["categories"]["1"], "Science");
        assert_eq!(json["categories"]["6"], "Sports");
    }

    #[tokio::test]
    async fn test_category_lifecycle() {
        let (app, _db) = test_app().await;

        let (status, json) = send(&app, "POST", "/categories", Some(json!({"type": "Music"}))).await;
        assert_eq!(status, StatusCode::OK);
        let id = json["created"].as_i64().unwrap();

        let (status, json) = send(
            &app,
            "PATCH",
            &format!("/categories/{id}"),
            Some(json!({"type": "Musicals"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["updated"], id);

        let (status, json) = send(&app, "DELETE", &format!("/categories/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["deleted"], id);

        let (status, _) = send(&app, "DELETE", &format!("/categories/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_category_missing_type_is_422() {
        let (app, _db) = test_app().await;

        let (status, json) = send(&app, "POST", "/categories", Some(json!({"name": "Music"}))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_delete_category_in_use_is_422() {
        let (app, db) = test_app().await;
        let categories = CategoryService::new(db.clone());
        let art = categories.create("Art").await.unwrap();
        QuestionService::new(db)
            .create(question_form("Who painted the Mona Lisa?", art.id))
            .await
            .unwrap();

        let (status, json) = send(&app, "DELETE", &format!("/categories/{}", art.id), None).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["code"], 422);
    }

    #[tokio::test]
    async fn test_questions_by_category() {
        let (app, db) = test_app().await;
        let categories = CategoryService::new(db.clone());
        categories.seed_defaults().await.unwrap();
        let questions = QuestionService::new(db);
        questions
            .create(question_form("What is the heaviest organ?", 1))
            .await
            .unwrap();
        questions
            .create(question_form("Who painted the Mona Lisa?", 2))
            .await
            .unwrap();

        let (status, json) = send(&app, "GET", "/categories/2/questions", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["current_category"], "Art");
        assert_eq!(json["total_questions"], 1);
        assert_eq!(json["questions"][0]["category"], 2);

        let (status, json) = send(&app, "GET", "/categories/1000/questions", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], 404);
    }
}
