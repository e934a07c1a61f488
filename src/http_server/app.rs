use std::sync::Arc;

use async_graphql_axum::GraphQL;
use axum::{
    Router,
    http::{HeaderValue, Method, StatusCode, header},
    response::IntoResponse,
    routing::{get, patch, post},
};
use color_eyre::eyre::{Context, eyre};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{
    config::Config,
    database::Database,
    http_server::{
        error::ErrorEnvelope,
        graphql,
        http_routes::{categories, questions, quizzes},
        state::AppState,
    },
    ports::clock::SystemClock,
};

pub struct HttpServerConfig {
    pub port: u16,
    pub database: Database,
    pub config: Config,
}

async fn not_found() -> impl IntoResponse {
    ErrorEnvelope::new(StatusCode::NOT_FOUND, "Resource not found.")
}

async fn method_not_allowed() -> impl IntoResponse {
    ErrorEnvelope::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed.")
}

fn cors_layer(allowed_origin: Option<&str>) -> color_eyre::Result<CorsLayer> {
    let origin = match allowed_origin {
        Some(origin) => AllowOrigin::exact(
            HeaderValue::from_str(origin)
                .wrap_err_with(|| eyre!("Invalid allowed origin: {}", origin))?,
        ),
        None => AllowOrigin::any(),
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

/// Every route of both applications, without CORS.
pub fn router(app_state: Arc<AppState>) -> Router {
    let schema = graphql::create_schema(app_state.clone());

    Router::new()
        .route(
            "/graphql",
            get(graphql::graphql).post_service(GraphQL::new(schema)),
        )
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/{id}",
            patch(categories::update_category).delete(categories::delete_category),
        )
        .route(
            "/categories/{id}/questions",
            get(categories::questions_by_category),
        )
        .route(
            "/questions",
            get(questions::list_questions).post(questions::post_questions),
        )
        .route(
            "/questions/{id}",
            patch(questions::update_question).delete(questions::delete_question),
        )
        .route("/quizzes", post(quizzes::next_quiz_question))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

pub async fn start(
    HttpServerConfig {
        port,
        database,
        config,
    }: HttpServerConfig,
) -> color_eyre::Result<()> {
    let app_state = Arc::new(AppState {
        db: Arc::new(database),
        clock: Arc::new(SystemClock),
        questions_per_page: config.questions_per_page,
    });

    let cors_layer = cors_layer(config.allowed_origin.as_deref())?;
    let app = router(app_state).layer(ServiceBuilder::new().layer(cors_layer));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .wrap_err_with(|| eyre!("Failed to bind to port {}", port))?;
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .await
        .wrap_err("Failed to start HTTP server")?;

    Ok(())
}
