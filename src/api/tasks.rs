use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{
    ApiError, ApiResponse, AppState, CreateTaskRequest, MessageResponse, UpdateTaskRequest,
};
use crate::services::board_service::{NewTask, TaskPatch, TaskView};

/// GET /tasks
/// All tasks, newest created first, with user references resolved.
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<TaskView>>>, ApiError> {
    let tasks = state.board_service().list_tasks().await?;
    Ok(Json(ApiResponse::success(tasks)))
}

/// POST /tasks
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TaskView>>), ApiError> {
    let input = NewTask {
        title: payload.title,
        description: payload.description,
        priority: payload.priority,
        assignee_id: payload.assignee_id,
    };

    let task = state
        .board_service()
        .create_task(input, &user.into())
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(task))))
}

/// PUT /tasks/{id}
/// Partial update conditioned on the version the caller last observed; a
/// stale version yields 409 with the current task in the body.
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<ApiResponse<TaskView>>, ApiError> {
    let patch = TaskPatch {
        title: payload.title,
        description: payload.description,
        status: payload.status,
        priority: payload.priority,
        assignee_id: payload.assignee_id,
    };

    let task = state
        .board_service()
        .update_task(id, patch, payload.version, &user.into())
        .await?;

    Ok(Json(ApiResponse::success(task)))
}

/// DELETE /tasks/{id}
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.board_service().delete_task(id, &user.into()).await?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Task deleted successfully".to_string(),
    })))
}

/// POST /tasks/{id}/smart-assign
/// Assign the task to the least-loaded user.
pub async fn smart_assign(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<TaskView>>, ApiError> {
    let task = state.board_service().smart_assign(id, &user.into()).await?;

    Ok(Json(ApiResponse::success(task)))
}
