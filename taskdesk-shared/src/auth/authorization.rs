/// Authorization rules
///
/// All access decisions in TaskDesk come from this module:
///
/// 1. **Ownership**: tasks belong to their creator, comments to their
///    author, attachments to their uploader.
/// 2. **Capabilities**: what a role may do, from the table in
///    [`Role::capabilities`].
/// 3. **Project leadership**: a gestor manages the projects they lead; an
///    admin manages any project.
///
/// The predicates are pure. The `require_*` wrappers turn a failed check
/// into an [`AuthzError`] that services surface as 403 Forbidden.

use super::middleware::AuthContext;
use crate::models::{Capability, Project, Role, Task, TaskAttachment, TaskComment};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    #[error("You are not authorized to access this task")]
    NotTaskOwner,

    #[error("You can only modify your own comments")]
    NotCommentAuthor,

    #[error("You can only delete your own attachments")]
    NotAttachmentUploader,

    #[error("You can only modify projects you manage")]
    NotProjectManager,

    #[error("Your role does not allow: {}", .0.as_str())]
    MissingCapability(Capability),
}

pub fn is_owned_by(task: &Task, user_id: i32) -> bool {
    task.user_id == user_id
}

pub fn is_authored_by(comment: &TaskComment, user_id: i32) -> bool {
    comment.user_id == user_id
}

pub fn is_uploaded_by(attachment: &TaskAttachment, user_id: i32) -> bool {
    attachment.user_id == user_id
}

pub fn can_manage_projects(role: Role) -> bool {
    role.has_capability(Capability::ManageProjects)
}

pub fn can_modify_project(project: &Project, caller: &AuthContext) -> bool {
    if caller.role.has_capability(Capability::ManageAnyProject) {
        return true;
    }
    can_manage_projects(caller.role) && project.gestor_id == caller.user_id
}

pub fn can_manage_users(role: Role) -> bool {
    role.has_capability(Capability::ManageUsers)
}

pub fn require_capability(role: Role, capability: Capability) -> Result<(), AuthzError> {
    if role.has_capability(capability) {
        Ok(())
    } else {
        Err(AuthzError::MissingCapability(capability))
    }
}

pub fn require_task_owner(task: &Task, user_id: i32) -> Result<(), AuthzError> {
    if is_owned_by(task, user_id) {
        Ok(())
    } else {
        Err(AuthzError::NotTaskOwner)
    }
}

pub fn require_comment_author(comment: &TaskComment, user_id: i32) -> Result<(), AuthzError> {
    if is_authored_by(comment, user_id) {
        Ok(())
    } else {
        Err(AuthzError::NotCommentAuthor)
    }
}

pub fn require_attachment_uploader(
    attachment: &TaskAttachment,
    user_id: i32,
) -> Result<(), AuthzError> {
    if is_uploaded_by(attachment, user_id) {
        Ok(())
    } else {
        Err(AuthzError::NotAttachmentUploader)
    }
}

pub fn require_project_manager(project: &Project, caller: &AuthContext) -> Result<(), AuthzError> {
    if !can_manage_projects(caller.role) {
        return Err(AuthzError::MissingCapability(Capability::ManageProjects));
    }
    if can_modify_project(project, caller) {
        Ok(())
    } else {
        Err(AuthzError::NotProjectManager)
    }
}
