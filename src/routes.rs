use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use crate::app_state::AppState;

/// Build the status router
pub fn app_router() -> Router<AppState> {
    let api_v1 = Router::new()
        .nest("/tasks", crate::api::routes::task_routes::task_routes());

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", api_v1)
        .fallback(handler_404)
        .layer(CorsLayer::very_permissive())
}

async fn root() -> &'static str {
    "Server is running!"
}

async fn health_check() -> &'static str {
    "OK"
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        "The requested resource was not found",
    )
}
