//! Domain events for the application.
//!
//! Every accepted mutation and every appended action-log row produces one of
//! these events. They are fanned out over the event bus to all connected
//! clients, including the client whose request caused the event; clients
//! reconcile idempotently by matching identifiers.

use serde::Serialize;

use crate::services::board_service::{ActionView, TaskView};

/// Events sent to connected clients via SSE (Server-Sent Events).
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum NotificationEvent {
    TaskCreated {
        task: TaskView,
    },
    TaskUpdated {
        task: TaskView,
    },
    TaskDeleted {
        task_id: i32,
    },
    ActionLogged {
        action: ActionView,
    },
}
