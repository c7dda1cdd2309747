/// Project model
///
/// Projects are led by the gestor (or admin) who created them.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id SERIAL PRIMARY KEY,
///     gestor_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     deadline TIMESTAMPTZ NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: i32,

    /// User who leads the project
    pub gestor_id: i32,

    pub title: String,

    pub description: Option<String>,

    pub deadline: DateTime<Utc>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    pub gestor_id: i32,

    pub title: String,

    pub description: Option<String>,

    pub deadline: DateTime<Utc>,
}

/// Only `Some` fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    pub title: Option<String>,

    pub description: Option<String>,

    pub deadline: Option<DateTime<Utc>>,
}

impl UpdateProject {
    pub fn apply_to(&self, project: &mut Project) {
        if let Some(ref title) = self.title {
            project.title = title.clone();
        }
        if let Some(ref description) = self.description {
            project.description = Some(description.clone());
        }
        if let Some(deadline) = self.deadline {
            project.deadline = deadline;
        }
    }
}
