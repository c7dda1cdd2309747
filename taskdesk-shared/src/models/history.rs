/// Task history log
///
/// Append-only record of writes made to a task. Rows are removed together
/// with their task.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_history_action AS ENUM ('created', 'updated', 'completed');
///
/// CREATE TABLE task_history (
///     id SERIAL PRIMARY KEY,
///     task_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     action task_history_action NOT NULL,
///     changes JSONB NOT NULL DEFAULT '{}',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_history_action", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HistoryAction {
    Created,
    Updated,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskHistoryEntry {
    pub id: i32,

    pub task_id: i32,

    /// User who performed the action
    pub user_id: i32,

    pub action: HistoryAction,

    /// Fields written by the action
    pub changes: JsonValue,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskHistoryEntry {
    pub task_id: i32,

    pub user_id: i32,

    pub action: HistoryAction,

    pub changes: JsonValue,
}
