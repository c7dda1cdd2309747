use async_trait::async_trait;
use sqlx::PgPool;

use super::RepositoryResult;
use crate::models::{CreateTask, Task, UpdateTask};

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Task>>;

    /// Newest first
    async fn find_all_by_user_id(&self, user_id: i32) -> RepositoryResult<Vec<Task>>;

    async fn create(&self, data: CreateTask) -> RepositoryResult<Task>;

    /// Returns `None` if the task no longer exists
    async fn update(&self, id: i32, data: UpdateTask) -> RepositoryResult<Option<Task>>;

    /// Comments, attachments and history go with the task
    async fn delete(&self, id: i32) -> RepositoryResult<bool>;
}

#[derive(Debug, Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const TASK_COLUMNS: &str =
    "id, user_id, title, description, status, priority, due_date, created_at, updated_at";

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn find_all_by_user_id(&self, user_id: i32) -> RepositoryResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn create(&self, data: CreateTask) -> RepositoryResult<Task> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (user_id, title, description, priority, due_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(data.user_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.priority)
        .bind(data.due_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    async fn update(&self, id: i32, data: UpdateTask) -> RepositoryResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                priority = COALESCE($5, priority),
                due_date = COALESCE($6, due_date),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.due_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn delete(&self, id: i32) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
