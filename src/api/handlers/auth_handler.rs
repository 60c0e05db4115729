//! Authentication handlers.

use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{IntoResponse, Json},
    routing::{get, post},
    Extension, Router,
};
use chrono::{DateTime, Utc};
use domain::UserResponse;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{PresentedToken, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::LoginOutcome;
use crate::types::{Created, MessageResponse};
use crate::utils::{clear_session_cookie, session_cookie};

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// User display name
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Sarah")]
    pub name: String,
    /// User email address
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    #[schema(example = "sarah@example.com")]
    pub email: String,
    /// User password (minimum 6 characters)
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    #[schema(example = "secret1", min_length = 6)]
    pub password: String,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User email address
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    #[schema(example = "sarah@example.com")]
    pub email: String,
    /// User password
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "secret1")]
    pub password: String,
}

/// Successful login body; the token is also set as a cookie
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Session token for bearer clients
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            id: outcome.user.id,
            name: outcome.user.name,
            email: outcome.user.email,
            token: outcome.token.value,
            expires_at: outcome.token.expires_at,
        }
    }
}

/// Public authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// Routes that need an authenticated session
pub fn session_routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Validation error or email already registered"),
        (status = 503, description = "Credential store unavailable")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<UserResponse>> {
    let user = state
        .auth_service
        .register(payload.name, payload.email, payload.password)
        .await?;

    Ok(Created(UserResponse::from(user)))
}

/// Login and receive a session token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, session cookie set", body = LoginResponse),
        (status = 400, description = "Malformed request"),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    let max_age = outcome.token.remaining_seconds(Utc::now());
    let cookie = session_cookie(&outcome.token.value, max_age, state.cookies);

    Ok(([(SET_COOKIE, cookie)], Json(LoginResponse::from(outcome))))
}

/// Revoke the presented session token
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Authentication",
    responses(
        (status = 200, description = "Logged out, session cookie cleared", body = MessageResponse),
        (status = 503, description = "Revocation list unavailable")
    ),
    security(("bearer_auth" = []), ("cookie_auth" = []))
)]
pub async fn logout(
    State(state): State<AppState>,
    PresentedToken(token): PresentedToken,
) -> AppResult<impl IntoResponse> {
    if let Some(token) = token {
        state.auth_service.logout(&token).await?;
    }

    Ok((
        [(SET_COOKIE, clear_session_cookie(state.cookies))],
        Json(MessageResponse::new("logged out")),
    ))
}

/// Get the user behind the current session
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Authentication",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing, invalid, expired or revoked token")
    ),
    security(("bearer_auth" = []), ("cookie_auth" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<UserResponse>> {
    let user = state.auth_service.profile(current_user.id).await?;
    Ok(Json(UserResponse::from(user)))
}
