//! Domain service for the task board.
//!
//! The board service is the single mutation authority: it owns the
//! authoritative copy of every task, is the only component that increments a
//! task's version or appends to the action log, and serializes every
//! validate-then-apply section against all others.

use serde::Serialize;
use thiserror::Error;

use crate::domain::task::{TaskPriority, TaskStatus};

/// Errors specific to board mutations.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Task not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Version mismatch. Carries the full current authoritative record so
    /// the caller can present a side-by-side diff and resubmit with an
    /// explicit choice plus the now-current version. The server never merges.
    #[error("Version conflict")]
    Conflict { current: Box<TaskView> },

    #[error("No users available for assignment")]
    NoEligibleUser,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for BoardError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// A user reference as shown on cards and log entries.
#[derive(Debug, Clone, Serialize)]
pub struct UserRef {
    pub id: i32,
    pub username: String,
}

/// A task with its user references resolved to display identities.
#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assignee: Option<UserRef>,
    pub creator: UserRef,
    pub last_editor: UserRef,
    pub created_at: String,
    pub updated_at: String,
    /// Concurrency token only; `updated_at` is display-only.
    pub version: i64,
}

/// A resolved action-log entry.
#[derive(Debug, Clone, Serialize)]
pub struct ActionView {
    pub id: i32,
    pub kind: String,
    pub task_id: Option<i32>,
    /// `None` once the referenced task has been deleted; the details string
    /// still names it.
    pub task_title: Option<String>,
    pub user: UserRef,
    pub details: String,
    pub created_at: String,
}

/// Input for creating a task.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub assignee_id: Option<i32>,
}

/// Partial update: only fields carrying a value are applied, everything else
/// is left unchanged.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// `Some(None)` clears the assignee; `None` leaves it unchanged.
    pub assignee_id: Option<Option<i32>>,
}

/// The verified caller identity attached to every mutation.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: i32,
    pub username: String,
}

/// Domain service trait for the task board.
#[async_trait::async_trait]
pub trait BoardService: Send + Sync {
    /// Creates a task at version 1 in the Todo column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Validation`] for an empty, reserved, or
    /// duplicate title.
    async fn create_task(&self, input: NewTask, actor: &Identity) -> Result<TaskView, BoardError>;

    /// Applies a partial update conditioned on `expected_version`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Conflict`] carrying the current record when
    /// `expected_version` is stale; no mutation occurs in that case.
    async fn update_task(
        &self,
        task_id: i32,
        patch: TaskPatch,
        expected_version: Option<i64>,
        actor: &Identity,
    ) -> Result<TaskView, BoardError>;

    /// Removes a task. The action log keeps its history.
    async fn delete_task(&self, task_id: i32, actor: &Identity) -> Result<(), BoardError>;

    /// Assigns the task to the least-loaded user (ties broken by creation
    /// order).
    async fn smart_assign(&self, task_id: i32, actor: &Identity) -> Result<TaskView, BoardError>;

    /// All tasks, newest created first, user references resolved.
    async fn list_tasks(&self) -> Result<Vec<TaskView>, BoardError>;

    /// The most recent `limit` action-log entries, newest first.
    async fn recent_actions(&self, limit: u64) -> Result<Vec<ActionView>, BoardError>;
}
