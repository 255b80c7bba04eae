use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set};

use crate::entities::actions;

/// Append-only access to the action log. Rows are never updated or deleted.
pub struct ActionRepository {
    conn: DatabaseConnection,
}

impl ActionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn append(
        &self,
        kind: &str,
        task_id: Option<i32>,
        user_id: i32,
        details: &str,
    ) -> Result<actions::Model> {
        let active = actions::ActiveModel {
            kind: Set(kind.to_string()),
            task_id: Set(task_id),
            user_id: Set(user_id),
            details: Set(details.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to append action record")?;

        Ok(model)
    }

    /// The most recent `limit` records, newest first. Ids are allocated in
    /// append order, so descending id is exactly descending timestamp order
    /// even when two appends land in the same second.
    pub async fn recent(&self, limit: u64) -> Result<Vec<actions::Model>> {
        let rows = actions::Entity::find()
            .order_by_desc(actions::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to query recent actions")?;

        Ok(rows)
    }
}
