//! Coordination task routes (e.g., /api/v1/tasks/*)

use axum::{routing::get, Router};
use crate::api::controller::task::TaskController;
use crate::app_state::AppState;

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(TaskController::list))
        .route("/summary", get(TaskController::summary))
        .route("/{workload}", get(TaskController::get))
}
