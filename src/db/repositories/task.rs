use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

use crate::domain::task::TaskStatus;
use crate::entities::tasks;

pub struct TaskRepository {
    conn: DatabaseConnection,
}

impl TaskRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<tasks::Model>> {
        let task = tasks::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query task by ID")?;

        Ok(task)
    }

    /// All tasks, newest created first. Ids are allocated in creation order,
    /// so descending id equals descending creation time.
    pub async fn list_newest_first(&self) -> Result<Vec<tasks::Model>> {
        let rows = tasks::Entity::find()
            .order_by_desc(tasks::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list tasks")?;

        Ok(rows)
    }

    pub async fn find_by_title(&self, title: &str) -> Result<Option<tasks::Model>> {
        let task = tasks::Entity::find()
            .filter(tasks::Column::Title.eq(title))
            .one(&self.conn)
            .await
            .context("Failed to query task by title")?;

        Ok(task)
    }

    /// True if some *other* task already holds `title`. Renaming a task to
    /// its own current title is not a collision.
    pub async fn title_taken_by_other(&self, title: &str, own_id: i32) -> Result<bool> {
        let count = tasks::Entity::find()
            .filter(tasks::Column::Title.eq(title))
            .filter(tasks::Column::Id.ne(own_id))
            .count(&self.conn)
            .await
            .context("Failed to check title uniqueness")?;

        Ok(count > 0)
    }

    pub async fn insert(&self, active: tasks::ActiveModel) -> Result<tasks::Model> {
        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert task")?;

        Ok(model)
    }

    pub async fn update(&self, active: tasks::ActiveModel) -> Result<tasks::Model> {
        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update task")?;

        Ok(model)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = tasks::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete task")?;

        Ok(result.rows_affected > 0)
    }

    /// Count of tasks assigned to `user_id` that still sit in an active
    /// column (Todo or In Progress). Done tasks do not count toward load.
    pub async fn count_active_assigned(&self, user_id: i32) -> Result<u64> {
        let count = tasks::Entity::find()
            .filter(tasks::Column::AssigneeId.eq(user_id))
            .filter(tasks::Column::Status.is_in([
                TaskStatus::Todo.as_str(),
                TaskStatus::InProgress.as_str(),
            ]))
            .count(&self.conn)
            .await
            .context("Failed to count active assignments")?;

        Ok(count)
    }
}
