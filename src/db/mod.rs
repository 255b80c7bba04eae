use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::{actions, tasks};

pub mod migrator;
pub mod repositories;

pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.starts_with(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn task_repo(&self) -> repositories::task::TaskRepository {
        repositories::task::TaskRepository::new(self.conn.clone())
    }

    fn action_repo(&self) -> repositories::action::ActionRepository {
        repositories::action::ActionRepository::new(self.conn.clone())
    }

    // --- users ---

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list_all().await
    }

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<User> {
        self.user_repo()
            .create(username, email, password, security)
            .await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    // --- tasks ---

    pub async fn get_task(&self, id: i32) -> Result<Option<tasks::Model>> {
        self.task_repo().get(id).await
    }

    pub async fn list_tasks(&self) -> Result<Vec<tasks::Model>> {
        self.task_repo().list_newest_first().await
    }

    pub async fn find_task_by_title(&self, title: &str) -> Result<Option<tasks::Model>> {
        self.task_repo().find_by_title(title).await
    }

    pub async fn title_taken_by_other(&self, title: &str, own_id: i32) -> Result<bool> {
        self.task_repo().title_taken_by_other(title, own_id).await
    }

    pub async fn insert_task(&self, active: tasks::ActiveModel) -> Result<tasks::Model> {
        self.task_repo().insert(active).await
    }

    pub async fn update_task(&self, active: tasks::ActiveModel) -> Result<tasks::Model> {
        self.task_repo().update(active).await
    }

    pub async fn delete_task(&self, id: i32) -> Result<bool> {
        self.task_repo().delete(id).await
    }

    pub async fn count_active_assigned(&self, user_id: i32) -> Result<u64> {
        self.task_repo().count_active_assigned(user_id).await
    }

    // --- action log ---

    pub async fn append_action(
        &self,
        kind: &str,
        task_id: Option<i32>,
        user_id: i32,
        details: &str,
    ) -> Result<actions::Model> {
        self.action_repo()
            .append(kind, task_id, user_id, details)
            .await
    }

    pub async fn recent_actions(&self, limit: u64) -> Result<Vec<actions::Model>> {
        self.action_repo().recent(limit).await
    }
}
