/// JWT authentication layer
///
/// Validates the bearer access token and inserts the caller's
/// [`AuthContext`] into request extensions, where handlers pick it up as an
/// extractor. Missing, malformed and expired tokens all answer 401.

use crate::{app::AppState, error::ApiError};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use taskdesk_shared::auth::middleware::{authenticate, AuthContext};

pub async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_context: AuthContext = authenticate(req.headers(), state.jwt_secret())
        .map_err(|e| {
            tracing::debug!(error = %e, path = %req.uri().path(), "Rejected request");
            e
        })?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
