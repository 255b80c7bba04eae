//! Domain service for authentication and account registration.
//!
//! The board core only ever sees a verified identity; this service is the
//! boundary where credentials are checked and bearer API keys are resolved.

use serde::Serialize;
use thiserror::Error;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A verified account: the identity plus its bearer credential.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub api_key: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and returns the identity plus bearer credential.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, username: &str, password: &str)
    -> Result<AuthenticatedUser, AuthError>;

    /// Creates a new account. Usernames and emails are unique.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] for missing fields, a short
    /// password, or an already-taken username/email.
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AuthError>;

    /// Resolves a bearer credential to the identity it was issued to.
    async fn verify_api_key(&self, api_key: &str) -> Result<Option<AuthenticatedUser>, AuthError>;

    /// Looks up an identity by username (the session-cookie path).
    async fn lookup(&self, username: &str) -> Result<Option<AuthenticatedUser>, AuthError>;
}
