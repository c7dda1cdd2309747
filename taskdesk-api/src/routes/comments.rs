/// Comment endpoints
///
/// - `GET    /api/tasks/:id/comments` - Comments on a task, oldest first
/// - `POST   /api/tasks/:id/comments` - Comment on a task you own
/// - `PUT    /api/comments/:id` - Edit your own comment
/// - `DELETE /api/comments/:id` - Delete your own comment
///
/// Owning the parent task does not let you edit someone else's comment.

use super::{created, done, ok, parse_id, Envelope, ValidatedJson};
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use taskdesk_shared::{auth::middleware::AuthContext, models::TaskComment};
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_content"))]
    pub content: String,
}

fn validate_content(content: &str) -> Result<(), ValidationError> {
    let len = content.trim().chars().count();
    if (1..=5000).contains(&len) {
        Ok(())
    } else {
        let mut error = ValidationError::new("length");
        error.message = Some("Content must be between 1 and 5000 characters".into());
        Err(error)
    }
}

pub async fn list_comments(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Vec<TaskComment>>>> {
    let task_id = parse_id(&id, "task")?;
    let comments = state
        .services
        .comments
        .get_task_comments(auth.user_id, task_id)
        .await?;
    Ok(ok("Comments retrieved successfully", comments))
}

pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<CommentRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<TaskComment>>)> {
    let task_id = parse_id(&id, "task")?;
    let comment = state
        .services
        .comments
        .create_comment(auth.user_id, task_id, &req.content)
        .await?;
    Ok(created("Comment created successfully", comment))
}

pub async fn update_comment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<CommentRequest>,
) -> ApiResult<Json<Envelope<TaskComment>>> {
    let comment_id = parse_id(&id, "comment")?;
    let comment = state
        .services
        .comments
        .update_comment(auth.user_id, comment_id, &req.content)
        .await?;
    Ok(ok("Comment updated successfully", comment))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<()>>> {
    let comment_id = parse_id(&id, "comment")?;
    state
        .services
        .comments
        .delete_comment(auth.user_id, comment_id)
        .await?;
    Ok(done("Comment deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_is_trimmed_before_length_check() {
        assert!(validate_content("  ok  ").is_ok());
        assert!(validate_content("    ").is_err());
        assert!(validate_content(&"x".repeat(5001)).is_err());
    }
}
