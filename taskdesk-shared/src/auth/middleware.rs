/// Request authentication for Axum
///
/// [`authenticate`] turns an `Authorization: Bearer <token>` header into an
/// [`AuthContext`]. The API server runs it in a `from_fn_with_state` layer and
/// inserts the context into request extensions; handlers then take
/// `AuthContext` as an extractor.
///
/// # Example
///
/// ```no_run
/// use taskdesk_shared::auth::middleware::AuthContext;
///
/// async fn protected_handler(auth: AuthContext) -> String {
///     format!("Hello, user {} ({})!", auth.user_id, auth.role.as_str())
/// }
/// ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::jwt::{validate_access_token, Claims, JwtError};
use crate::models::Role;

/// Identity of the caller of an authenticated request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: i32,

    pub role: Role,
}

impl AuthContext {
    pub fn new(user_id: i32, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn from_claims(claims: &Claims) -> Self {
        Self::new(claims.sub, claims.role)
    }
}

/// Authentication failure; every variant answers 401
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Authentication required")]
    MissingCredentials,

    #[error("Expected Bearer token")]
    InvalidFormat,

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid token")]
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": "Unauthorized",
            "message": self.to_string(),
            "status": StatusCode::UNAUTHORIZED.as_u16(),
        });
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

/// Extracts the raw token from the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidFormat)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(token)
}

/// Validates the bearer access token in `headers`
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers)?;

    let claims = validate_access_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })?;

    Ok(AuthContext::from_claims(&claims))
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .copied()
            .ok_or(AuthError::MissingCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{create_token, TokenType};
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_authenticate_valid_token() {
        let token = create_token(&Claims::new(5, Role::Gestor, TokenType::Access), SECRET).unwrap();

        let context = authenticate(&headers_with(&format!("Bearer {token}")), SECRET).unwrap();
        assert_eq!(context, AuthContext::new(5, Role::Gestor));
    }

    #[test]
    fn test_authenticate_missing_header() {
        assert!(matches!(
            authenticate(&HeaderMap::new(), SECRET),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_authenticate_wrong_scheme() {
        assert!(matches!(
            authenticate(&headers_with("Basic dXNlcjpwYXNz"), SECRET),
            Err(AuthError::InvalidFormat)
        ));
    }

    #[test]
    fn test_authenticate_rejects_refresh_token() {
        let token =
            create_token(&Claims::new(5, Role::Gestor, TokenType::Refresh), SECRET).unwrap();

        assert!(matches!(
            authenticate(&headers_with(&format!("Bearer {token}")), SECRET),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_auth_error_into_response() {
        let response = AuthError::InvalidToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
