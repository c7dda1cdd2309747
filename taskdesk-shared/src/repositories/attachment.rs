use async_trait::async_trait;
use sqlx::PgPool;

use super::RepositoryResult;
use crate::models::{CreateTaskAttachment, TaskAttachment};

#[async_trait]
pub trait TaskAttachmentRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<TaskAttachment>>;

    /// Newest first
    async fn find_all_by_task_id(&self, task_id: i32) -> RepositoryResult<Vec<TaskAttachment>>;

    async fn create(&self, data: CreateTaskAttachment) -> RepositoryResult<TaskAttachment>;

    async fn delete(&self, id: i32) -> RepositoryResult<bool>;
}

#[derive(Debug, Clone)]
pub struct PgTaskAttachmentRepository {
    pool: PgPool,
}

impl PgTaskAttachmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ATTACHMENT_COLUMNS: &str =
    "id, task_id, user_id, filename, filepath, filesize, mimetype, created_at";

#[async_trait]
impl TaskAttachmentRepository for PgTaskAttachmentRepository {
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<TaskAttachment>> {
        let attachment = sqlx::query_as::<_, TaskAttachment>(&format!(
            "SELECT {ATTACHMENT_COLUMNS} FROM task_attachments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attachment)
    }

    async fn find_all_by_task_id(&self, task_id: i32) -> RepositoryResult<Vec<TaskAttachment>> {
        let attachments = sqlx::query_as::<_, TaskAttachment>(&format!(
            "SELECT {ATTACHMENT_COLUMNS} FROM task_attachments
             WHERE task_id = $1
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(attachments)
    }

    async fn create(&self, data: CreateTaskAttachment) -> RepositoryResult<TaskAttachment> {
        let attachment = sqlx::query_as::<_, TaskAttachment>(&format!(
            "INSERT INTO task_attachments (task_id, user_id, filename, filepath, filesize, mimetype)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ATTACHMENT_COLUMNS}"
        ))
        .bind(data.task_id)
        .bind(data.user_id)
        .bind(&data.filename)
        .bind(&data.filepath)
        .bind(data.filesize)
        .bind(&data.mimetype)
        .fetch_one(&self.pool)
        .await?;

        Ok(attachment)
    }

    async fn delete(&self, id: i32) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM task_attachments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
