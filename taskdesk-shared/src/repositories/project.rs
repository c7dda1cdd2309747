use async_trait::async_trait;
use sqlx::PgPool;

use super::RepositoryResult;
use crate::models::{CreateProject, Project, UpdateProject};

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Project>>;

    /// Soonest deadline first
    async fn find_all(&self) -> RepositoryResult<Vec<Project>>;

    async fn create(&self, data: CreateProject) -> RepositoryResult<Project>;

    async fn update(&self, id: i32, data: UpdateProject) -> RepositoryResult<Option<Project>>;

    async fn delete(&self, id: i32) -> RepositoryResult<bool>;
}

#[derive(Debug, Clone)]
pub struct PgProjectRepository {
    pool: PgPool,
}

impl PgProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const PROJECT_COLUMNS: &str =
    "id, gestor_id, title, description, deadline, created_at, updated_at";

#[async_trait]
impl ProjectRepository for PgProjectRepository {
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY deadline ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn create(&self, data: CreateProject) -> RepositoryResult<Project> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "INSERT INTO projects (gestor_id, title, description, deadline)
             VALUES ($1, $2, $3, $4)
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(data.gestor_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.deadline)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    async fn update(&self, id: i32, data: UpdateProject) -> RepositoryResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "UPDATE projects SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                deadline = COALESCE($4, deadline),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.deadline)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn delete(&self, id: i32) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
