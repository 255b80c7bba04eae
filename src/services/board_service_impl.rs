//! `SeaORM` implementation of the `BoardService` trait.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::Set;
use tokio::sync::{Mutex, broadcast};

use crate::db::{Store, User};
use crate::domain::events::NotificationEvent;
use crate::domain::task::{ActionKind, TaskStatus, is_reserved_title};
use crate::entities::tasks;
use crate::services::board_service::{
    ActionView, BoardError, BoardService, Identity, NewTask, TaskPatch, TaskView, UserRef,
};

pub struct SeaOrmBoardService {
    store: Store,
    event_bus: broadcast::Sender<NotificationEvent>,
    /// Serializes every validate-then-apply section. Title uniqueness is a
    /// global constraint, so a single lock covers both the per-task version
    /// check and cross-task validation. Reads never take it.
    write_lock: Mutex<()>,
}

impl SeaOrmBoardService {
    #[must_use]
    pub fn new(store: Store, event_bus: broadcast::Sender<NotificationEvent>) -> Self {
        Self {
            store,
            event_bus,
            write_lock: Mutex::new(()),
        }
    }

    /// Fan-out never blocks or fails the originating mutation; a send error
    /// just means nobody is connected right now.
    fn publish(&self, event: NotificationEvent) {
        let _ = self.event_bus.send(event);
    }

    async fn username_map(&self) -> Result<HashMap<i32, String>, BoardError> {
        let users = self.store.list_users().await?;
        Ok(users.into_iter().map(|u| (u.id, u.username)).collect())
    }

    fn resolve(model: &tasks::Model, usernames: &HashMap<i32, String>) -> TaskView {
        let user_ref = |id: i32| UserRef {
            id,
            username: usernames
                .get(&id)
                .cloned()
                .unwrap_or_else(|| "unknown".to_string()),
        };

        TaskView {
            id: model.id,
            title: model.title.clone(),
            description: model.description.clone(),
            status: model.status.parse().unwrap_or_default(),
            priority: model.priority.parse().unwrap_or_default(),
            assignee: model.assignee_id.map(user_ref),
            creator: user_ref(model.creator_id),
            last_editor: user_ref(model.last_editor_id),
            created_at: model.created_at.clone(),
            updated_at: model.updated_at.clone(),
            version: model.version,
        }
    }

    async fn view_of(&self, model: &tasks::Model) -> Result<TaskView, BoardError> {
        let usernames = self.username_map().await?;
        Ok(Self::resolve(model, &usernames))
    }

    fn validate_title(title: &str) -> Result<(), BoardError> {
        if title.trim().is_empty() {
            return Err(BoardError::Validation(
                "Task title cannot be empty".to_string(),
            ));
        }
        if is_reserved_title(title) {
            return Err(BoardError::Validation(
                "Task title cannot match column names".to_string(),
            ));
        }
        Ok(())
    }

    async fn ensure_assignee_exists(&self, assignee_id: i32) -> Result<(), BoardError> {
        if self.store.get_user(assignee_id).await?.is_none() {
            return Err(BoardError::Validation(format!(
                "Unknown assignee: {assignee_id}"
            )));
        }
        Ok(())
    }

    /// Appends an action record and broadcasts it. Called only after the
    /// state change it describes has committed.
    async fn log_action(
        &self,
        kind: ActionKind,
        task_id: Option<i32>,
        actor: &Identity,
        details: String,
    ) -> Result<(), BoardError> {
        let record = self
            .store
            .append_action(kind.as_str(), task_id, actor.id, &details)
            .await?;

        let task_title = match record.task_id {
            Some(id) => self.store.get_task(id).await?.map(|t| t.title),
            None => None,
        };

        let action = ActionView {
            id: record.id,
            kind: record.kind,
            task_id: record.task_id,
            task_title,
            user: UserRef {
                id: actor.id,
                username: actor.username.clone(),
            },
            details: record.details,
            created_at: record.created_at,
        };

        self.publish(NotificationEvent::ActionLogged { action });
        Ok(())
    }
}

/// Greedy least-loaded selection over users paired with their active task
/// counts. Callers pass users in creation order, so a tie deterministically
/// goes to the earliest-created user. This is a simple load-balancing
/// heuristic, not a fairness optimization.
#[must_use]
pub fn pick_least_loaded<'a>(users: &'a [User], active_counts: &[u64]) -> Option<&'a User> {
    users
        .iter()
        .zip(active_counts)
        .min_by_key(|(_, count)| **count)
        .map(|(user, _)| user)
}

#[async_trait]
impl BoardService for SeaOrmBoardService {
    async fn create_task(&self, input: NewTask, actor: &Identity) -> Result<TaskView, BoardError> {
        let _guard = self.write_lock.lock().await;

        Self::validate_title(&input.title)?;
        if self.store.find_task_by_title(&input.title).await?.is_some() {
            return Err(BoardError::Validation(
                "Task title must be unique".to_string(),
            ));
        }
        if let Some(assignee_id) = input.assignee_id {
            self.ensure_assignee_exists(assignee_id).await?;
        }

        let now = chrono::Utc::now().to_rfc3339();
        let active = tasks::ActiveModel {
            title: Set(input.title),
            description: Set(input.description.unwrap_or_default()),
            status: Set(TaskStatus::Todo.as_str().to_string()),
            priority: Set(input.priority.unwrap_or_default().as_str().to_string()),
            assignee_id: Set(input.assignee_id),
            creator_id: Set(actor.id),
            last_editor_id: Set(actor.id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            version: Set(1),
            ..Default::default()
        };

        let model = self.store.insert_task(active).await?;

        self.log_action(
            ActionKind::Created,
            Some(model.id),
            actor,
            format!("Created task: {}", model.title),
        )
        .await?;

        let view = self.view_of(&model).await?;
        self.publish(NotificationEvent::TaskCreated { task: view.clone() });
        Ok(view)
    }

    async fn update_task(
        &self,
        task_id: i32,
        patch: TaskPatch,
        expected_version: Option<i64>,
        actor: &Identity,
    ) -> Result<TaskView, BoardError> {
        let _guard = self.write_lock.lock().await;

        let existing = self
            .store
            .get_task(task_id)
            .await?
            .ok_or(BoardError::NotFound)?;

        // The version check wins over any content comparison: even a no-op
        // update against a stale version forces the caller to reconcile.
        if let Some(expected) = expected_version
            && expected != existing.version
        {
            let current = self.view_of(&existing).await?;
            return Err(BoardError::Conflict {
                current: Box::new(current),
            });
        }

        if let Some(ref title) = patch.title
            && *title != existing.title
        {
            Self::validate_title(title)?;
            if self.store.title_taken_by_other(title, task_id).await? {
                return Err(BoardError::Validation(
                    "Task title must be unique".to_string(),
                ));
            }
        }

        if let Some(Some(assignee_id)) = patch.assignee_id {
            self.ensure_assignee_exists(assignee_id).await?;
        }

        let current_version = existing.version;
        let old_status = existing.status.clone();

        let mut active: tasks::ActiveModel = existing.into();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(status) = patch.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(priority) = patch.priority {
            active.priority = Set(priority.as_str().to_string());
        }
        if let Some(assignee_id) = patch.assignee_id {
            active.assignee_id = Set(assignee_id);
        }
        active.last_editor_id = Set(actor.id);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.version = Set(current_version + 1);

        let model = self.store.update_task(active).await?;

        let details = match patch.status {
            Some(status) if status.as_str() != old_status => {
                format!("Moved task from {old_status} to {status}")
            }
            _ => "Updated task".to_string(),
        };

        self.log_action(ActionKind::Updated, Some(model.id), actor, details)
            .await?;

        let view = self.view_of(&model).await?;
        self.publish(NotificationEvent::TaskUpdated { task: view.clone() });
        Ok(view)
    }

    async fn delete_task(&self, task_id: i32, actor: &Identity) -> Result<(), BoardError> {
        let _guard = self.write_lock.lock().await;

        let existing = self
            .store
            .get_task(task_id)
            .await?
            .ok_or(BoardError::NotFound)?;
        let title = existing.title;

        self.store.delete_task(task_id).await?;

        self.log_action(
            ActionKind::Deleted,
            Some(task_id),
            actor,
            format!("Deleted task: {title}"),
        )
        .await?;

        self.publish(NotificationEvent::TaskDeleted { task_id });
        Ok(())
    }

    async fn smart_assign(&self, task_id: i32, actor: &Identity) -> Result<TaskView, BoardError> {
        let _guard = self.write_lock.lock().await;

        let existing = self
            .store
            .get_task(task_id)
            .await?
            .ok_or(BoardError::NotFound)?;

        // Users come back in creation order; the tie-break depends on it.
        let users = self.store.list_users().await?;
        if users.is_empty() {
            return Err(BoardError::NoEligibleUser);
        }

        let mut active_counts = Vec::with_capacity(users.len());
        for user in &users {
            active_counts.push(self.store.count_active_assigned(user.id).await?);
        }

        let chosen = pick_least_loaded(&users, &active_counts).ok_or(BoardError::NoEligibleUser)?;
        let chosen_id = chosen.id;
        let chosen_username = chosen.username.clone();

        let current_version = existing.version;
        let mut active: tasks::ActiveModel = existing.into();
        active.assignee_id = Set(Some(chosen_id));
        active.last_editor_id = Set(actor.id);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.version = Set(current_version + 1);

        let model = self.store.update_task(active).await?;

        self.log_action(
            ActionKind::SmartAssigned,
            Some(model.id),
            actor,
            format!("Smart assigned to {chosen_username}"),
        )
        .await?;

        let view = self.view_of(&model).await?;
        self.publish(NotificationEvent::TaskUpdated { task: view.clone() });
        Ok(view)
    }

    async fn list_tasks(&self) -> Result<Vec<TaskView>, BoardError> {
        let models = self.store.list_tasks().await?;
        let usernames = self.username_map().await?;

        Ok(models
            .iter()
            .map(|model| Self::resolve(model, &usernames))
            .collect())
    }

    async fn recent_actions(&self, limit: u64) -> Result<Vec<ActionView>, BoardError> {
        let records = self.store.recent_actions(limit).await?;
        let usernames = self.username_map().await?;

        let titles: HashMap<i32, String> = self
            .store
            .list_tasks()
            .await?
            .into_iter()
            .map(|t| (t.id, t.title))
            .collect();

        Ok(records
            .into_iter()
            .map(|record| ActionView {
                id: record.id,
                kind: record.kind,
                task_id: record.task_id,
                task_title: record.task_id.and_then(|id| titles.get(&id).cloned()),
                user: UserRef {
                    id: record.user_id,
                    username: usernames
                        .get(&record.user_id)
                        .cloned()
                        .unwrap_or_else(|| "unknown".to_string()),
                },
                details: record.details,
                created_at: record.created_at,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user(id: i32, username: &str) -> User {
        User {
            id,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            api_key: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_pick_least_loaded_prefers_smallest_count() {
        let users = vec![test_user(1, "a"), test_user(2, "b"), test_user(3, "c")];
        let counts = vec![2, 0, 1];

        let chosen = pick_least_loaded(&users, &counts).expect("non-empty user set");
        assert_eq!(chosen.username, "b");
    }

    #[test]
    fn test_pick_least_loaded_tie_goes_to_first_user() {
        let users = vec![test_user(1, "a"), test_user(2, "b"), test_user(3, "c")];
        let counts = vec![1, 1, 1];

        let chosen = pick_least_loaded(&users, &counts).expect("non-empty user set");
        assert_eq!(chosen.id, 1);

        // Repeated calls over an unchanged set select the same user.
        let again = pick_least_loaded(&users, &counts).expect("non-empty user set");
        assert_eq!(again.id, chosen.id);
    }

    #[test]
    fn test_pick_least_loaded_empty_set() {
        assert!(pick_least_loaded(&[], &[]).is_none());
    }
}
