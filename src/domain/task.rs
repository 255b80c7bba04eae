//! Core board vocabulary: column statuses, priorities, and action kinds.
//!
//! Enumerations are stored as plain strings in the database and parsed back
//! at the repository boundary, so every variant carries a stable `as_str`
//! representation that doubles as the wire format.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three board columns. Task titles may never collide with these names,
/// compared case-insensitively.
pub const RESERVED_COLUMN_NAMES: [&str; 3] = ["Todo", "In Progress", "Done"];

/// Returns true if `title` matches a reserved column name, ignoring case.
#[must_use]
pub fn is_reserved_title(title: &str) -> bool {
    RESERVED_COLUMN_NAMES
        .iter()
        .any(|name| name.eq_ignore_ascii_case(title.trim()))
}

/// Which column a task sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

impl TaskStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "Todo",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    /// Done tasks do not count toward a user's assignment load.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Done)
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Todo
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Todo" => Ok(Self::Todo),
            "In Progress" => Ok(Self::InProgress),
            "Done" => Ok(Self::Done),
            other => Err(format!("Unknown task status: {other}")),
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Self::Low),
            "Medium" => Ok(Self::Medium),
            "High" => Ok(Self::High),
            other => Err(format!("Unknown task priority: {other}")),
        }
    }
}

/// The kind of mutation an action-log row records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActionKind {
    Created,
    Updated,
    Deleted,
    SmartAssigned,
}

impl ActionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Updated => "Updated",
            Self::Deleted => "Deleted",
            Self::SmartAssigned => "SmartAssigned",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done] {
            assert_eq!(status.as_str().parse::<TaskStatus>(), Ok(status));
        }
        assert!("Doing".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_status_defaults_and_activity() {
        assert_eq!(TaskStatus::default(), TaskStatus::Todo);
        assert!(TaskStatus::Todo.is_active());
        assert!(TaskStatus::InProgress.is_active());
        assert!(!TaskStatus::Done.is_active());
    }

    #[test]
    fn test_priority_round_trip() {
        for priority in [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High] {
            assert_eq!(priority.as_str().parse::<TaskPriority>(), Ok(priority));
        }
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn test_reserved_titles_ignore_case() {
        assert!(is_reserved_title("Todo"));
        assert!(is_reserved_title("todo"));
        assert!(is_reserved_title("TODO"));
        assert!(is_reserved_title("in progress"));
        assert!(is_reserved_title("DONE"));
        assert!(is_reserved_title("  Done  "));
        assert!(!is_reserved_title("Backlog"));
        assert!(!is_reserved_title("Todos"));
    }

    #[test]
    fn test_status_serde_wire_format() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        let parsed: TaskStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(parsed, TaskStatus::InProgress);
    }
}
