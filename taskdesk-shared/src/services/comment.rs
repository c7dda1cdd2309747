use std::sync::Arc;

use tracing::info;

use super::task::load_owned_task;
use super::{required_text, ServiceError, ServiceResult};
use crate::auth::authorization::require_comment_author;
use crate::models::{CreateTaskComment, TaskComment};
use crate::repositories::{TaskCommentRepository, TaskRepository};

const COMMENT_NOT_FOUND: &str = "Comment not found";

/// Comments may be listed and added only by the task's owner, and edited or
/// removed only by their author.
#[derive(Clone)]
pub struct TaskCommentService {
    comments: Arc<dyn TaskCommentRepository>,
    tasks: Arc<dyn TaskRepository>,
}

impl TaskCommentService {
    pub fn new(comments: Arc<dyn TaskCommentRepository>, tasks: Arc<dyn TaskRepository>) -> Self {
        Self { comments, tasks }
    }

    pub async fn get_task_comments(
        &self,
        user_id: i32,
        task_id: i32,
    ) -> ServiceResult<Vec<TaskComment>> {
        load_owned_task(self.tasks.as_ref(), user_id, task_id).await?;
        Ok(self.comments.find_all_by_task_id(task_id).await?)
    }

    pub async fn create_comment(
        &self,
        user_id: i32,
        task_id: i32,
        content: &str,
    ) -> ServiceResult<TaskComment> {
        load_owned_task(self.tasks.as_ref(), user_id, task_id).await?;

        let comment = self
            .comments
            .create(CreateTaskComment {
                task_id,
                user_id,
                content: required_text(content, "Content")?,
            })
            .await?;

        info!(comment_id = comment.id, task_id, user_id, "Comment created");
        Ok(comment)
    }

    pub async fn update_comment(
        &self,
        user_id: i32,
        comment_id: i32,
        content: &str,
    ) -> ServiceResult<TaskComment> {
        let comment = self.load_comment(comment_id).await?;
        require_comment_author(&comment, user_id)?;

        let content = required_text(content, "Content")?;
        self.comments
            .update_content(comment_id, &content)
            .await?
            .ok_or_else(|| ServiceError::NotFound(COMMENT_NOT_FOUND.to_string()))
    }

    pub async fn delete_comment(&self, user_id: i32, comment_id: i32) -> ServiceResult<()> {
        let comment = self.load_comment(comment_id).await?;
        require_comment_author(&comment, user_id)?;

        if !self.comments.delete(comment_id).await? {
            return Err(ServiceError::NotFound(COMMENT_NOT_FOUND.to_string()));
        }

        info!(comment_id, user_id, "Comment deleted");
        Ok(())
    }

    async fn load_comment(&self, comment_id: i32) -> ServiceResult<TaskComment> {
        self.comments
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(COMMENT_NOT_FOUND.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateTask;
    use crate::repositories::Repositories;

    async fn setup() -> (TaskCommentService, Repositories, i32) {
        let repos = Repositories::in_memory();
        let task = repos
            .tasks
            .create(CreateTask {
                user_id: 1,
                title: "Task 1".to_string(),
                description: None,
                priority: None,
                due_date: None,
            })
            .await
            .unwrap();
        let service = TaskCommentService::new(repos.comments.clone(), repos.tasks.clone());
        (service, repos, task.id)
    }

    #[tokio::test]
    async fn test_owner_comments_in_order() {
        let (comments, _, task_id) = setup().await;

        comments.create_comment(1, task_id, "first").await.unwrap();
        comments.create_comment(1, task_id, "  second  ").await.unwrap();

        let listed = comments.get_task_comments(1, task_id).await.unwrap();
        let contents: Vec<&str> = listed.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_non_owner_cannot_list_or_comment() {
        let (comments, _, task_id) = setup().await;

        assert!(matches!(
            comments.create_comment(2, task_id, "hi").await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            comments.get_task_comments(2, task_id).await,
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_comment_on_missing_task() {
        let (comments, _, _) = setup().await;
        assert!(matches!(
            comments.create_comment(1, 404, "hi").await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_only_author_edits_or_deletes() {
        let (comments, repos, task_id) = setup().await;

        // A comment written by someone else on user 1's task
        let foreign = repos
            .comments
            .create(CreateTaskComment {
                task_id,
                user_id: 2,
                content: "from user 2".to_string(),
            })
            .await
            .unwrap();

        assert!(matches!(
            comments.update_comment(1, foreign.id, "edited").await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            comments.delete_comment(1, foreign.id).await,
            Err(ServiceError::Forbidden(_))
        ));

        let updated = comments.update_comment(2, foreign.id, "edited").await.unwrap();
        assert_eq!(updated.content, "edited");
        comments.delete_comment(2, foreign.id).await.unwrap();
        assert!(matches!(
            comments.delete_comment(2, foreign.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_content_rejected() {
        let (comments, _, task_id) = setup().await;
        assert!(matches!(
            comments.create_comment(1, task_id, "   ").await,
            Err(ServiceError::Validation(_))
        ));
    }
}
