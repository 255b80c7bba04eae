//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;

use crate::config::SecurityConfig;
use crate::db::{Store, User};
use crate::services::auth_service::{AuthError, AuthService, AuthenticatedUser};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            api_key: user.api_key,
        }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let is_valid = self.store.verify_user_password(username, password).await?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(user.into())
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        if username.trim().is_empty() {
            return Err(AuthError::Validation("Username is required".to_string()));
        }
        if email.trim().is_empty() {
            return Err(AuthError::Validation("Email is required".to_string()));
        }
        if password.len() < 8 {
            return Err(AuthError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        if self.store.get_user_by_username(username).await?.is_some()
            || self.store.get_user_by_email(email).await?.is_some()
        {
            return Err(AuthError::Validation("User already exists".to_string()));
        }

        let user = self
            .store
            .create_user(username, email, password, &self.security)
            .await?;

        tracing::info!("Registered user: {}", user.username);

        Ok(user.into())
    }

    async fn verify_api_key(&self, api_key: &str) -> Result<Option<AuthenticatedUser>, AuthError> {
        let user = self.store.verify_api_key(api_key).await?;
        Ok(user.map(AuthenticatedUser::from))
    }

    async fn lookup(&self, username: &str) -> Result<Option<AuthenticatedUser>, AuthError> {
        let user = self.store.get_user_by_username(username).await?;
        Ok(user.map(AuthenticatedUser::from))
    }
}
