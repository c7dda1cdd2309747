/// Data model for TaskDesk
///
/// Plain data structures mapped from database rows. Persistence lives in
/// [`crate::repositories`]; authorization rules live in
/// [`crate::auth::authorization`].
///
/// # Models
///
/// - `user`: User accounts, roles and the role capability table
/// - `task`: Tasks owned by a single user
/// - `project`: Projects led by a gestor
/// - `comment`: Comments on tasks
/// - `attachment`: Files attached to tasks
/// - `history`: Append-only task history

pub mod attachment;
pub mod comment;
pub mod history;
pub mod project;
pub mod task;
pub mod user;

pub use attachment::{CreateTaskAttachment, TaskAttachment};
pub use comment::{CreateTaskComment, TaskComment};
pub use history::{CreateTaskHistoryEntry, HistoryAction, TaskHistoryEntry};
pub use project::{CreateProject, Project, UpdateProject};
pub use task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask};
pub use user::{Capability, CreateUser, Role, User};
