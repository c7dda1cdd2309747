use std::sync::Arc;

use serde_json::json;
use tracing::{error, info};

use super::{required_text, ServiceError, ServiceResult};
use crate::auth::authorization::require_task_owner;
use crate::models::{
    CreateTask, CreateTaskHistoryEntry, HistoryAction, Task, TaskHistoryEntry, TaskStatus,
    UpdateTask,
};
use crate::repositories::{TaskAttachmentRepository, TaskHistoryRepository, TaskRepository};
use crate::storage::FileStorage;

pub(crate) const TASK_NOT_FOUND: &str = "Task not found";

/// Loads a task and checks the caller owns it
pub(crate) async fn load_owned_task(
    tasks: &dyn TaskRepository,
    user_id: i32,
    task_id: i32,
) -> ServiceResult<Task> {
    let task = tasks
        .find_by_id(task_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(TASK_NOT_FOUND.to_string()))?;

    require_task_owner(&task, user_id)?;
    Ok(task)
}

#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskRepository>,
    history: Arc<dyn TaskHistoryRepository>,
    attachments: Arc<dyn TaskAttachmentRepository>,
    storage: FileStorage,
}

impl TaskService {
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        history: Arc<dyn TaskHistoryRepository>,
        attachments: Arc<dyn TaskAttachmentRepository>,
        storage: FileStorage,
    ) -> Self {
        Self {
            tasks,
            history,
            attachments,
            storage,
        }
    }

    pub async fn get_tasks(&self, user_id: i32) -> ServiceResult<Vec<Task>> {
        Ok(self.tasks.find_all_by_user_id(user_id).await?)
    }

    pub async fn get_task(&self, user_id: i32, task_id: i32) -> ServiceResult<Task> {
        load_owned_task(self.tasks.as_ref(), user_id, task_id).await
    }

    /// The caller becomes the owner; new tasks start `pending`
    pub async fn create_task(&self, user_id: i32, mut data: CreateTask) -> ServiceResult<Task> {
        data.user_id = user_id;
        data.title = required_text(&data.title, "Title")?;

        let task = self.tasks.create(data).await?;

        self.record(&task, user_id, HistoryAction::Created, json!({
            "title": task.title,
            "status": task.status,
        }))
        .await?;

        info!(task_id = task.id, user_id, "Task created");
        Ok(task)
    }

    pub async fn update_task(
        &self,
        user_id: i32,
        task_id: i32,
        mut data: UpdateTask,
    ) -> ServiceResult<Task> {
        load_owned_task(self.tasks.as_ref(), user_id, task_id).await?;

        if let Some(ref title) = data.title {
            data.title = Some(required_text(title, "Title")?);
        }
        let changes = data.changes();

        let task = self
            .tasks
            .update(task_id, data)
            .await?
            .ok_or_else(|| ServiceError::NotFound(TASK_NOT_FOUND.to_string()))?;

        self.record(&task, user_id, HistoryAction::Updated, changes).await?;
        Ok(task)
    }

    /// Sets status to `completed`; completing twice is allowed
    pub async fn complete_task(&self, user_id: i32, task_id: i32) -> ServiceResult<Task> {
        load_owned_task(self.tasks.as_ref(), user_id, task_id).await?;

        let update = UpdateTask {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        let task = self
            .tasks
            .update(task_id, update)
            .await?
            .ok_or_else(|| ServiceError::NotFound(TASK_NOT_FOUND.to_string()))?;

        self.record(&task, user_id, HistoryAction::Completed, json!({ "status": task.status }))
            .await?;

        info!(task_id, user_id, "Task completed");
        Ok(task)
    }

    /// Removes the task with its comments, attachments and history, then
    /// the attachment files
    pub async fn delete_task(&self, user_id: i32, task_id: i32) -> ServiceResult<()> {
        load_owned_task(self.tasks.as_ref(), user_id, task_id).await?;

        let attachments = self.attachments.find_all_by_task_id(task_id).await?;

        if !self.tasks.delete(task_id).await? {
            return Err(ServiceError::NotFound(TASK_NOT_FOUND.to_string()));
        }

        for attachment in &attachments {
            if let Err(e) = self.storage.remove(&attachment.filepath).await {
                error!(
                    attachment_id = attachment.id,
                    task_id,
                    error = %e,
                    "Failed to remove attachment file"
                );
            }
        }

        info!(task_id, user_id, files = attachments.len(), "Task deleted");
        Ok(())
    }

    pub async fn get_history(
        &self,
        user_id: i32,
        task_id: i32,
    ) -> ServiceResult<Vec<TaskHistoryEntry>> {
        load_owned_task(self.tasks.as_ref(), user_id, task_id).await?;
        Ok(self.history.find_all_by_task_id(task_id).await?)
    }

    async fn record(
        &self,
        task: &Task,
        user_id: i32,
        action: HistoryAction,
        changes: serde_json::Value,
    ) -> ServiceResult<()> {
        self.history
            .append(CreateTaskHistoryEntry {
                task_id: task.id,
                user_id,
                action,
                changes,
            })
            .await?;
        Ok(())
    }
}
