/// User endpoints
///
/// - `GET /api/users/me` - The caller's profile
/// - `PATCH /api/users/:id/role` - Change a user's role (admin only)

use super::{ok, parse_id, Envelope, ValidatedJson};
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use taskdesk_shared::{
    auth::middleware::AuthContext,
    models::{Role, User},
};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ChangeRoleRequest {
    pub role: Role,
}

pub async fn me(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Envelope<User>>> {
    let user = state.services.users.get_profile(&auth).await?;
    Ok(ok("User retrieved successfully", user))
}

/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin
/// - `400 Bad Request`: Unknown role, or an admin targeting themselves
/// - `404 Not Found`: No such user
pub async fn change_role(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<ChangeRoleRequest>,
) -> ApiResult<Json<Envelope<User>>> {
    let user_id = parse_id(&id, "user")?;
    let user = state
        .services
        .users
        .change_role(&auth, user_id, req.role)
        .await?;
    Ok(ok("User role updated successfully", user))
}
