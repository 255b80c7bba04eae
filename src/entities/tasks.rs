use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub title: String,

    pub description: String,

    /// One of the three board column names
    pub status: String,

    /// Low | Medium | High
    pub priority: String,

    pub assignee_id: Option<i32>,

    /// Set once at creation, immutable afterwards
    pub creator_id: i32,

    pub last_editor_id: i32,

    pub created_at: String,

    pub updated_at: String,

    /// Optimistic-concurrency token; starts at 1, +1 per accepted mutation
    pub version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
