/// Task attachment model
///
/// Attachment rows point at a file written by [`crate::storage::FileStorage`].
/// Attachments are never updated, only created and deleted.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE task_attachments (
///     id SERIAL PRIMARY KEY,
///     task_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     filename VARCHAR(255) NOT NULL,
///     filepath VARCHAR(500) NOT NULL,
///     filesize BIGINT NOT NULL,
///     mimetype VARCHAR(100) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskAttachment {
    pub id: i32,

    pub task_id: i32,

    /// Uploader
    pub user_id: i32,

    /// Original client-side file name
    pub filename: String,

    /// Location on the server; not exposed to clients
    #[serde(skip_serializing, default)]
    pub filepath: String,

    /// Size in bytes
    pub filesize: i64,

    pub mimetype: String,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskAttachment {
    pub task_id: i32,

    pub user_id: i32,

    pub filename: String,

    pub filepath: String,

    pub filesize: i64,

    pub mimetype: String,
}
