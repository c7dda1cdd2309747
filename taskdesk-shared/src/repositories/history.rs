use async_trait::async_trait;
use sqlx::PgPool;

use super::RepositoryResult;
use crate::models::{CreateTaskHistoryEntry, TaskHistoryEntry};

/// Append-only; entries are removed only with their task
#[async_trait]
pub trait TaskHistoryRepository: Send + Sync {
    async fn append(&self, data: CreateTaskHistoryEntry) -> RepositoryResult<TaskHistoryEntry>;

    /// Oldest first
    async fn find_all_by_task_id(&self, task_id: i32)
        -> RepositoryResult<Vec<TaskHistoryEntry>>;
}

#[derive(Debug, Clone)]
pub struct PgTaskHistoryRepository {
    pool: PgPool,
}

impl PgTaskHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const HISTORY_COLUMNS: &str = "id, task_id, user_id, action, changes, created_at";

#[async_trait]
impl TaskHistoryRepository for PgTaskHistoryRepository {
    async fn append(&self, data: CreateTaskHistoryEntry) -> RepositoryResult<TaskHistoryEntry> {
        let entry = sqlx::query_as::<_, TaskHistoryEntry>(&format!(
            "INSERT INTO task_history (task_id, user_id, action, changes)
             VALUES ($1, $2, $3, $4)
             RETURNING {HISTORY_COLUMNS}"
        ))
        .bind(data.task_id)
        .bind(data.user_id)
        .bind(data.action)
        .bind(&data.changes)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn find_all_by_task_id(
        &self,
        task_id: i32,
    ) -> RepositoryResult<Vec<TaskHistoryEntry>> {
        let entries = sqlx::query_as::<_, TaskHistoryEntry>(&format!(
            "SELECT {HISTORY_COLUMNS} FROM task_history
             WHERE task_id = $1
             ORDER BY created_at ASC, id ASC"
        ))
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
