//! Domain types for the task board.

pub mod events;
pub mod task;

pub use events::NotificationEvent;
pub use task::{ActionKind, RESERVED_COLUMN_NAMES, TaskPriority, TaskStatus, is_reserved_title};
