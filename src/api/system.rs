use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime: u64,
    pub tasks: usize,
    pub users: usize,
}

/// GET /system/status
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SystemStatus>>, ApiError> {
    let tasks = state
        .store()
        .list_tasks()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to count tasks: {e}")))?;

    let users = state
        .store()
        .list_users()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to count users: {e}")))?;

    Ok(Json(ApiResponse::success(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.start_time.elapsed().as_secs(),
        tasks: tasks.len(),
        users: users.len(),
    })))
}
