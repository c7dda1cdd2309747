use std::sync::Arc;

use tracing::{error, info};

use super::task::load_owned_task;
use super::{required_text, ServiceError, ServiceResult};
use crate::auth::authorization::require_attachment_uploader;
use crate::models::{CreateTaskAttachment, TaskAttachment};
use crate::repositories::{TaskAttachmentRepository, TaskRepository};
use crate::storage::{FileStorage, DEFAULT_MIMETYPE};

const ATTACHMENT_NOT_FOUND: &str = "Attachment not found";

/// An uploaded file as received from the client
#[derive(Debug, Clone)]
pub struct NewAttachment {
    pub filename: String,
    pub mimetype: Option<String>,
    pub bytes: Vec<u8>,
}

/// Attachment contents ready to be sent back
#[derive(Debug, Clone)]
pub struct AttachmentContent {
    pub attachment: TaskAttachment,
    pub bytes: Vec<u8>,
}

/// Listing, uploading and downloading require owning the task; deleting
/// requires being the uploader.
#[derive(Clone)]
pub struct TaskAttachmentService {
    attachments: Arc<dyn TaskAttachmentRepository>,
    tasks: Arc<dyn TaskRepository>,
    storage: FileStorage,
}

impl TaskAttachmentService {
    pub fn new(
        attachments: Arc<dyn TaskAttachmentRepository>,
        tasks: Arc<dyn TaskRepository>,
        storage: FileStorage,
    ) -> Self {
        Self {
            attachments,
            tasks,
            storage,
        }
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.storage.max_file_bytes()
    }

    pub async fn get_task_attachments(
        &self,
        user_id: i32,
        task_id: i32,
    ) -> ServiceResult<Vec<TaskAttachment>> {
        load_owned_task(self.tasks.as_ref(), user_id, task_id).await?;
        Ok(self.attachments.find_all_by_task_id(task_id).await?)
    }

    /// Writes the file, then the row; the file is removed if the row fails
    pub async fn upload_attachment(
        &self,
        user_id: i32,
        task_id: i32,
        upload: NewAttachment,
    ) -> ServiceResult<TaskAttachment> {
        load_owned_task(self.tasks.as_ref(), user_id, task_id).await?;

        let filename = required_text(&upload.filename, "File name")?;
        let mimetype = upload
            .mimetype
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MIMETYPE.to_string());

        let stored = self.storage.save(&filename, &upload.bytes).await?;

        let created = self
            .attachments
            .create(CreateTaskAttachment {
                task_id,
                user_id,
                filename,
                filepath: stored.path.clone(),
                filesize: stored.size,
                mimetype,
            })
            .await;

        match created {
            Ok(attachment) => {
                info!(
                    attachment_id = attachment.id,
                    task_id,
                    user_id,
                    filesize = attachment.filesize,
                    "Attachment uploaded"
                );
                Ok(attachment)
            }
            Err(e) => {
                if let Err(cleanup) = self.storage.remove(&stored.path).await {
                    error!(path = %stored.path, error = %cleanup, "Failed to remove orphaned upload");
                }
                Err(e.into())
            }
        }
    }

    pub async fn download_attachment(
        &self,
        user_id: i32,
        attachment_id: i32,
    ) -> ServiceResult<AttachmentContent> {
        let attachment = self.load_attachment(attachment_id).await?;
        load_owned_task(self.tasks.as_ref(), user_id, attachment.task_id).await?;

        let bytes = self.storage.read(&attachment.filepath).await.map_err(|e| {
            error!(attachment_id, error = %e, "Attachment file unreadable");
            ServiceError::NotFound("Attachment file not found".to_string())
        })?;

        Ok(AttachmentContent { attachment, bytes })
    }

    /// Removes the row, then the file
    pub async fn delete_attachment(&self, user_id: i32, attachment_id: i32) -> ServiceResult<()> {
        let attachment = self.load_attachment(attachment_id).await?;
        require_attachment_uploader(&attachment, user_id)?;

        if !self.attachments.delete(attachment_id).await? {
            return Err(ServiceError::NotFound(ATTACHMENT_NOT_FOUND.to_string()));
        }

        if let Err(e) = self.storage.remove(&attachment.filepath).await {
            error!(attachment_id, error = %e, "Failed to remove attachment file");
        }

        info!(attachment_id, user_id, "Attachment deleted");
        Ok(())
    }

    async fn load_attachment(&self, attachment_id: i32) -> ServiceResult<TaskAttachment> {
        self.attachments
            .find_by_id(attachment_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(ATTACHMENT_NOT_FOUND.to_string()))
    }
}
