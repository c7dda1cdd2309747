/// Task comment model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE task_comments (
///     id SERIAL PRIMARY KEY,
///     task_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     content TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskComment {
    pub id: i32,

    pub task_id: i32,

    /// Author
    pub user_id: i32,

    pub content: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskComment {
    pub task_id: i32,

    pub user_id: i32,

    pub content: String,
}
