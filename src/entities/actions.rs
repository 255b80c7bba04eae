use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "actions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Created | Updated | Deleted | SmartAssigned
    pub kind: String,

    /// May dangle once the referenced task is deleted; rows are never retracted.
    pub task_id: Option<i32>,

    pub user_id: i32,

    pub details: String,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
