/// Persistence seams
///
/// Each entity has an async repository trait. Services depend only on the
/// traits (`Arc<dyn TaskRepository>` and so on), so the same business rules
/// run against PostgreSQL in production and against [`MemoryStore`] in tests.
///
/// Ordering guarantees shared by every implementation:
///
/// | Listing                       | Order                       |
/// |-------------------------------|-----------------------------|
/// | tasks of a user               | `created_at` DESC, `id` DESC |
/// | comments of a task            | `created_at` ASC, `id` ASC   |
/// | attachments of a task         | `created_at` DESC, `id` DESC |
/// | history of a task             | `created_at` ASC, `id` ASC   |
/// | projects                      | `deadline` ASC, `id` ASC     |

pub mod attachment;
pub mod comment;
pub mod history;
pub mod memory;
pub mod project;
pub mod task;
pub mod user;

use std::sync::Arc;

use sqlx::PgPool;

pub use attachment::{PgTaskAttachmentRepository, TaskAttachmentRepository};
pub use comment::{PgTaskCommentRepository, TaskCommentRepository};
pub use history::{PgTaskHistoryRepository, TaskHistoryRepository};
pub use memory::MemoryStore;
pub use project::{PgProjectRepository, ProjectRepository};
pub use task::{PgTaskRepository, TaskRepository};
pub use user::{PgUserRepository, UserRepository};

/// Repository error
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A unique constraint was violated (e.g. duplicate email)
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unique").to_string();
                return RepositoryError::Conflict(constraint);
            }
        }
        RepositoryError::Database(err)
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// One handle per repository, shared by all services
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub tasks: Arc<dyn TaskRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub comments: Arc<dyn TaskCommentRepository>,
    pub attachments: Arc<dyn TaskAttachmentRepository>,
    pub history: Arc<dyn TaskHistoryRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            tasks: Arc::new(PgTaskRepository::new(pool.clone())),
            projects: Arc::new(PgProjectRepository::new(pool.clone())),
            comments: Arc::new(PgTaskCommentRepository::new(pool.clone())),
            attachments: Arc::new(PgTaskAttachmentRepository::new(pool.clone())),
            history: Arc::new(PgTaskHistoryRepository::new(pool)),
        }
    }

    /// All repositories backed by one shared [`MemoryStore`]
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            tasks: store.clone(),
            projects: store.clone(),
            comments: store.clone(),
            attachments: store.clone(),
            history: store,
        }
    }
}
