//! Task controller: read-only view over the coordination registry

use axum::extract::{Path, State};
use axum::Json;

use crate::api::dto::task_dto::TaskSummaryResponse;
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::core::state::runtime::coordination::coordination_runtime_state::TaskRecord;
use crate::errors::AppError;

pub struct TaskController;

impl TaskController {
    pub async fn list(
        State(state): State<AppState>,
    ) -> Result<Json<ApiResponse<Vec<TaskRecord>>>, AppError> {
        to_json(Ok(state.coordination.list().await))
    }

    pub async fn get(
        State(state): State<AppState>,
        Path(workload): Path<String>,
    ) -> Result<Json<ApiResponse<TaskRecord>>, AppError> {
        to_json(
            state
                .coordination
                .get(&workload)
                .await
                .ok_or_else(|| AppError::NotFound(format!("no coordination task for {}", workload))),
        )
    }

    pub async fn summary(
        State(state): State<AppState>,
    ) -> Result<Json<ApiResponse<TaskSummaryResponse>>, AppError> {
        to_json(Ok(TaskSummaryResponse {
            tracked: state.coordination.list().await.len(),
            running: state.coordination.running().await,
        }))
    }
}
