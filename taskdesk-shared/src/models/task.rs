/// Task model
///
/// A task belongs exclusively to the user who created it. Status moves from
/// `pending` to `completed` through the complete operation or a regular
/// update.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'completed');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id SERIAL PRIMARY KEY,
///     user_id INTEGER NOT NULL REFERENCES users(id) ON UPDATE CASCADE ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'pending',
///     priority task_priority,
///     due_date TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Task completion status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

/// Task owned by a single user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: i32,

    /// Owner
    pub user_id: i32,

    pub title: String,

    pub description: Option<String>,

    pub status: TaskStatus,

    pub priority: Option<TaskPriority>,

    pub due_date: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

/// Input for creating a new task (always starts `pending`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub user_id: i32,

    pub title: String,

    pub description: Option<String>,

    pub priority: Option<TaskPriority>,

    pub due_date: Option<DateTime<Utc>>,
}

/// Input for updating a task
///
/// Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl UpdateTask {
    /// Returns true if no field would be written
    pub fn is_empty(&self) -> bool {
        *self == UpdateTask::default()
    }

    /// JSON object of the fields being written, for the history log
    pub fn changes(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or_else(|_| JsonValue::Object(Default::default()))
    }

    /// Applies the update to an in-memory copy of a task
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(ref title) = self.title {
            task.title = title.clone();
        }
        if let Some(ref description) = self.description {
            task.description = Some(description.clone());
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = Some(priority);
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_task() -> Task {
        Task {
            id: 1,
            user_id: 1,
            title: "Task 1".to_string(),
            description: None,
            status: TaskStatus::Pending,
            priority: None,
            due_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_update_changes_only_lists_set_fields() {
        let update = UpdateTask {
            title: Some("Renamed".to_string()),
            priority: Some(TaskPriority::High),
            ..Default::default()
        };

        assert_eq!(update.changes(), json!({"title": "Renamed", "priority": "high"}));
        assert!(!update.is_empty());
        assert!(UpdateTask::default().is_empty());
    }

    #[test]
    fn test_apply_to_leaves_unset_fields() {
        let mut task = sample_task();
        let update = UpdateTask {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };

        update.apply_to(&mut task);

        assert!(task.is_completed());
        assert_eq!(task.title, "Task 1");
        assert!(task.priority.is_none());
    }

    #[test]
    fn test_status_defaults_to_pending() {
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
        assert_eq!(TaskStatus::Completed.as_str(), "completed");
        assert_eq!(TaskPriority::Medium.as_str(), "medium");
    }
}
