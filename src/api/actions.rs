use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::{ActionsQuery, ApiError, ApiResponse, AppState};
use crate::services::board_service::ActionView;

/// The board UI shows the last 20 entries; the log itself is unbounded.
const DEFAULT_ACTION_LIMIT: u64 = 20;

/// GET /actions?limit=20
/// Most recent action-log entries, newest first.
pub async fn recent_actions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ActionsQuery>,
) -> Result<Json<ApiResponse<Vec<ActionView>>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_ACTION_LIMIT);
    let actions = state.board_service().recent_actions(limit).await?;

    Ok(Json(ApiResponse::success(actions)))
}
