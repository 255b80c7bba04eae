use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::task::{TaskPriority, TaskStatus};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Returned from login/register: the identity plus the bearer credential for
/// non-browser clients.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserDto,
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub assignee_id: Option<i32>,
}

/// Partial update payload. A field that is absent leaves the task unchanged;
/// `assignee_id` distinguishes absent (unchanged) from null (clear).
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub assignee_id: Option<Option<i32>>,
    /// The version this caller last observed. Absent skips the conflict
    /// check (force write).
    pub version: Option<i64>,
}

/// Deserializes a field so that an explicit `null` becomes `Some(None)`
/// while an absent field stays `None` (via `#[serde(default)]`).
fn present_or_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct ActionsQuery {
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_absent_assignee_is_unchanged() {
        let req: UpdateTaskRequest = serde_json::from_str(r#"{"title": "New title"}"#).unwrap();
        assert_eq!(req.title.as_deref(), Some("New title"));
        assert_eq!(req.assignee_id, None);
    }

    #[test]
    fn test_update_request_null_assignee_clears() {
        let req: UpdateTaskRequest = serde_json::from_str(r#"{"assignee_id": null}"#).unwrap();
        assert_eq!(req.assignee_id, Some(None));
    }

    #[test]
    fn test_update_request_set_assignee() {
        let req: UpdateTaskRequest = serde_json::from_str(r#"{"assignee_id": 7}"#).unwrap();
        assert_eq!(req.assignee_id, Some(Some(7)));
    }

    #[test]
    fn test_update_request_status_wire_names() {
        let req: UpdateTaskRequest =
            serde_json::from_str(r#"{"status": "In Progress", "version": 3}"#).unwrap();
        assert_eq!(req.status, Some(TaskStatus::InProgress));
        assert_eq!(req.version, Some(3));
    }
}
