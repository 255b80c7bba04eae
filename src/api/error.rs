use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

use super::ApiResponse;
use crate::services::auth_service::AuthError;
use crate::services::board_service::{BoardError, TaskView};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ValidationError(String),

    /// Version mismatch; the body carries the current authoritative task so
    /// the client can show a diff and resubmit with the fresh version.
    Conflict {
        message: String,
        current_task: Box<TaskView>,
    },

    InternalError(String),

    Unauthorized(String),
}

/// 409 body for the conflict-resolution flow.
#[derive(Debug, Serialize)]
struct ConflictBody {
    success: bool,
    error: String,
    conflict: bool,
    current_task: TaskView,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Conflict { message, .. } => write!(f, "Conflict: {}", message),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict {
                message,
                current_task,
            } => {
                let body = ConflictBody {
                    success: false,
                    error: message,
                    conflict: true,
                    current_task: *current_task,
                };
                return (StatusCode::CONFLICT, Json(body)).into_response();
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<BoardError> for ApiError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::NotFound => ApiError::NotFound("Task not found".to_string()),
            BoardError::Validation(msg) => ApiError::ValidationError(msg),
            BoardError::Conflict { current } => ApiError::Conflict {
                message: "Conflict detected".to_string(),
                current_task: current,
            },
            BoardError::NoEligibleUser => {
                ApiError::ValidationError("No users available for assignment".to_string())
            }
            BoardError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::UserNotFound => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            AuthError::Validation(msg) => ApiError::ValidationError(msg),
            AuthError::Database(msg) => ApiError::DatabaseError(msg),
            AuthError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}
