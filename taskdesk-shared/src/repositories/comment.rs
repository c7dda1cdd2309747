use async_trait::async_trait;
use sqlx::PgPool;

use super::RepositoryResult;
use crate::models::{CreateTaskComment, TaskComment};

#[async_trait]
pub trait TaskCommentRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<TaskComment>>;

    /// Oldest first
    async fn find_all_by_task_id(&self, task_id: i32) -> RepositoryResult<Vec<TaskComment>>;

    async fn create(&self, data: CreateTaskComment) -> RepositoryResult<TaskComment>;

    async fn update_content(&self, id: i32, content: &str)
        -> RepositoryResult<Option<TaskComment>>;

    async fn delete(&self, id: i32) -> RepositoryResult<bool>;
}

#[derive(Debug, Clone)]
pub struct PgTaskCommentRepository {
    pool: PgPool,
}

impl PgTaskCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const COMMENT_COLUMNS: &str = "id, task_id, user_id, content, created_at, updated_at";

#[async_trait]
impl TaskCommentRepository for PgTaskCommentRepository {
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<TaskComment>> {
        let comment = sqlx::query_as::<_, TaskComment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM task_comments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn find_all_by_task_id(&self, task_id: i32) -> RepositoryResult<Vec<TaskComment>> {
        let comments = sqlx::query_as::<_, TaskComment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM task_comments
             WHERE task_id = $1
             ORDER BY created_at ASC, id ASC"
        ))
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn create(&self, data: CreateTaskComment) -> RepositoryResult<TaskComment> {
        let comment = sqlx::query_as::<_, TaskComment>(&format!(
            "INSERT INTO task_comments (task_id, user_id, content)
             VALUES ($1, $2, $3)
             RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(data.task_id)
        .bind(data.user_id)
        .bind(&data.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn update_content(
        &self,
        id: i32,
        content: &str,
    ) -> RepositoryResult<Option<TaskComment>> {
        let comment = sqlx::query_as::<_, TaskComment>(&format!(
            "UPDATE task_comments SET content = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn delete(&self, id: i32) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM task_comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
