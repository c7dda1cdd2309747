use std::sync::Arc;

use tracing::info;

use super::{current_caller, ServiceError, ServiceResult};
use crate::auth::authorization::require_capability;
use crate::auth::middleware::AuthContext;
use crate::models::{Capability, Role, User};
use crate::repositories::UserRepository;

const USER_NOT_FOUND: &str = "User not found";

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn get_profile(&self, caller: &AuthContext) -> ServiceResult<User> {
        self.users
            .find_by_id(caller.user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(USER_NOT_FOUND.to_string()))
    }

    /// Admin only. Admins cannot change their own role.
    ///
    /// The target's existing tokens keep the old role in their claims; the
    /// new one takes effect for project and role writes straight away and
    /// appears in tokens issued from the next refresh.
    pub async fn change_role(
        &self,
        caller: &AuthContext,
        target_id: i32,
        role: Role,
    ) -> ServiceResult<User> {
        let caller = current_caller(self.users.as_ref(), caller).await?;
        require_capability(caller.role, Capability::ManageUsers)?;

        if target_id == caller.user_id {
            return Err(ServiceError::Validation(
                "Administrators cannot change their own role".to_string(),
            ));
        }

        let user = self
            .users
            .update_role(target_id, role)
            .await?
            .ok_or_else(|| ServiceError::NotFound(USER_NOT_FOUND.to_string()))?;

        info!(
            user_id = user.id,
            role = role.as_str(),
            changed_by = caller.user_id,
            "User role changed"
        );
        Ok(user)
    }
}
