use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, UserDto};

/// GET /users
/// All known users in creation order (the assignment enumeration order).
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    let users = state
        .store()
        .list_users()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to list users: {e}")))?;

    let users = users
        .into_iter()
        .map(|u| UserDto {
            id: u.id,
            username: u.username,
            email: u.email,
        })
        .collect();

    Ok(Json(ApiResponse::success(users)))
}
