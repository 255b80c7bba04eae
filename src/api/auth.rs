use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState, LoginRequest, RegisterRequest, SessionResponse, UserDto};
use crate::services::auth_service::AuthenticatedUser;
use crate::services::board_service::Identity;

/// Verified caller identity, attached to the request by the auth middleware
/// and extracted by handlers via `Extension<CurrentUser>`.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
}

impl From<CurrentUser> for Identity {
    fn from(user: CurrentUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Authentication middleware that checks:
/// 1. Session cookie (from login/register)
/// 2. `X-Api-Key` header
/// 3. `Authorization: Bearer <api_key>` header
///
/// Every request past this point carries a verified `CurrentUser`.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    // Check session first (fastest path for web UI)
    if let Ok(Some(username)) = session.get::<String>("user").await
        && let Ok(Some(user)) = state.auth_service().lookup(&username).await
    {
        attach_identity(&mut request, &user);
        return Ok(next.run(request).await);
    }

    if let Some(key) = extract_api_key(&headers)
        && let Ok(Some(user)) = state.auth_service().verify_api_key(&key).await
    {
        attach_identity(&mut request, &user);
        return Ok(next.run(request).await);
    }

    let response = (StatusCode::UNAUTHORIZED, "Unauthorized");
    Ok(response.into_response())
}

fn attach_identity(request: &mut Request, user: &AuthenticatedUser) {
    tracing::Span::current().record("user_id", user.username.as_str());
    request.extensions_mut().insert(CurrentUser {
        id: user.id,
        username: user.username.clone(),
    });
}

/// Extract API key from headers
fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    // Check X-Api-Key header
    if let Some(api_key) = headers.get("X-Api-Key")
        && let Ok(key_str) = api_key.to_str()
    {
        return Some(key_str.to_string());
    }

    // Check Authorization: Bearer header
    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
/// Create an account; opens a session and returns the bearer credential.
pub async fn register(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SessionResponse>>), ApiError> {
    let user = state
        .auth_service()
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    if let Err(e) = session.insert("user", &user.username).await {
        return Err(ApiError::internal(format!("Failed to create session: {e}")));
    }

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(session_response(user))),
    ))
}

/// POST /auth/login
/// Authenticate with username and password, returns the bearer credential.
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, ApiError> {
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let user = state
        .auth_service()
        .login(&payload.username, &payload.password)
        .await?;

    if let Err(e) = session.insert("user", &user.username).await {
        return Err(ApiError::internal(format!("Failed to create session: {e}")));
    }

    Ok(Json(ApiResponse::success(session_response(user))))
}

/// POST /auth/logout
/// Invalidate the current session
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    (StatusCode::OK, "Logged out")
}

fn session_response(user: AuthenticatedUser) -> SessionResponse {
    SessionResponse {
        user: UserDto {
            id: user.id,
            username: user.username,
            email: user.email,
        },
        api_key: user.api_key,
    }
}
