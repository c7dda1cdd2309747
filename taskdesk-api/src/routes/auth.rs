/// Authentication endpoints
///
/// - `POST /api/auth/register` - Register a new `colaborador` account
/// - `POST /api/auth/login` - Login and get tokens
/// - `POST /api/auth/refresh` - Exchange a refresh token for an access token
///
/// These are the only `/api` routes that do not require a bearer token.

use super::{created, ok, Envelope, ValidatedJson};
use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Deserializer, Serialize};
use taskdesk_shared::services::{AuthSession, RegisterUser};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 2, max = 255, message = "Name must be between 2 and 255 characters"))]
    pub name: String,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Refresh token request
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Strips surrounding whitespace so validation sees the value that is stored
fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub token: String,
}

/// Register a new user
///
/// ```text
/// POST /api/auth/register
/// { "name": "Ana", "email": "ana@example.com", "password": "secret1" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Email already registered
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<AuthSession>>)> {
    let session = state
        .services
        .auth
        .register(RegisterUser {
            name: req.name,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(created("User registered successfully", session))
}

/// Login with email and password
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email or wrong password (same message)
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<Envelope<AuthSession>>> {
    let session = state.services.auth.login(&req.email, &req.password).await?;
    Ok(ok("Login successful", session))
}

/// Refresh the access token
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid or expired refresh token
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> ApiResult<Json<Envelope<RefreshResponse>>> {
    let token = state.services.auth.refresh(&req.refresh_token).await?;
    Ok(ok("Token refreshed successfully", RefreshResponse { token }))
}
