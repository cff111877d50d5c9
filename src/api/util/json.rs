use axum::Json;

use crate::api::dto::ApiResponse;
use crate::errors::AppError;

pub fn to_json<T: serde::Serialize>(
    result: Result<T, AppError>
) -> Result<Json<ApiResponse<T>>, AppError> {
    result.map(|value| Json(ApiResponse::ok(value)))
}
