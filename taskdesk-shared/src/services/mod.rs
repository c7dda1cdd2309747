/// Business operations
///
/// Every operation takes the caller's identity explicitly and enforces the
/// rules in [`crate::auth::authorization`] before touching data. Checks run
/// in a fixed order: load the target (404 if missing), then check the
/// caller may act on it (403), then perform the write.
///
/// # Services
///
/// - [`AuthService`]: registration, login, token refresh, admin bootstrap
/// - [`TaskService`]: the caller's own tasks and their history
/// - [`TaskCommentService`]: comments on the caller's tasks
/// - [`TaskAttachmentService`]: files on the caller's tasks
/// - [`ProjectService`]: projects led by gestores
/// - [`UserService`]: profile lookup and role changes

pub mod attachment;
pub mod auth;
pub mod comment;
pub mod project;
pub mod task;
pub mod user;

pub use attachment::{AttachmentContent, NewAttachment, TaskAttachmentService};
pub use auth::{AuthService, AuthSession, RegisterUser};
pub use comment::TaskCommentService;
pub use project::ProjectService;
pub use task::TaskService;
pub use user::UserService;

use crate::auth::authorization::AuthzError;
use crate::auth::middleware::AuthContext;
use crate::auth::password::PasswordError;
use crate::repositories::{RepositoryError, Repositories, UserRepository};
use crate::storage::{FileStorage, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("{0}")]
    Internal(String),
}

impl From<AuthzError> for ServiceError {
    fn from(err: AuthzError) -> Self {
        ServiceError::Forbidden(err.to_string())
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Trims `value` and rejects it if nothing is left
pub(crate) fn required_text(value: &str, field: &str) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// The caller with the role currently stored for them
///
/// Tokens carry the role at issue time; privileged writes re-read it so a
/// role change applies immediately instead of when the token expires.
pub(crate) async fn current_caller(
    users: &dyn UserRepository,
    caller: &AuthContext,
) -> ServiceResult<AuthContext> {
    let user = users
        .find_by_id(caller.user_id)
        .await?
        .ok_or_else(|| ServiceError::Unauthorized("User no longer exists".to_string()))?;
    Ok(AuthContext::new(user.id, user.role))
}

/// All services, wired to one set of repositories
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub tasks: TaskService,
    pub comments: TaskCommentService,
    pub attachments: TaskAttachmentService,
    pub projects: ProjectService,
    pub users: UserService,
}

impl Services {
    pub fn new(repos: &Repositories, storage: FileStorage, jwt_secret: &str) -> Self {
        Self {
            auth: AuthService::new(repos.users.clone(), jwt_secret),
            tasks: TaskService::new(
                repos.tasks.clone(),
                repos.history.clone(),
                repos.attachments.clone(),
                storage.clone(),
            ),
            comments: TaskCommentService::new(repos.comments.clone(), repos.tasks.clone()),
            attachments: TaskAttachmentService::new(
                repos.attachments.clone(),
                repos.tasks.clone(),
                storage,
            ),
            projects: ProjectService::new(repos.projects.clone(), repos.users.clone()),
            users: UserService::new(repos.users.clone()),
        }
    }
}
