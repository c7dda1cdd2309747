/// Task endpoints
///
/// All routes act on the caller's own tasks. Reading or changing someone
/// else's task answers 403; a missing task answers 404.
///
/// - `GET    /api/tasks` - List the caller's tasks (newest first)
/// - `POST   /api/tasks` - Create a task
/// - `GET    /api/tasks/:id` - Get one task
/// - `PUT    /api/tasks/:id` - Update title, description, status, priority or due date
/// - `DELETE /api/tasks/:id` - Delete a task with its comments and attachments
/// - `PATCH  /api/tasks/:id/complete` - Mark as completed
/// - `GET    /api/tasks/:id/history` - Change log of the task

use super::{created, done, ok, parse_id, Envelope, ValidatedJson};
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use taskdesk_shared::{
    auth::middleware::AuthContext,
    models::{CreateTask, Task, TaskHistoryEntry, TaskPriority, TaskStatus, UpdateTask},
};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    pub priority: Option<TaskPriority>,

    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    pub priority: Option<TaskPriority>,

    pub due_date: Option<DateTime<Utc>>,
}

impl From<UpdateTaskRequest> for UpdateTask {
    fn from(req: UpdateTaskRequest) -> Self {
        UpdateTask {
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
            due_date: req.due_date,
        }
    }
}

pub async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Envelope<Vec<Task>>>> {
    let tasks = state.services.tasks.get_tasks(auth.user_id).await?;
    Ok(ok("Tasks retrieved successfully", tasks))
}

/// The caller becomes the owner; `user_id` in the body is never read
pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthContext,
    ValidatedJson(req): ValidatedJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<Task>>)> {
    let task = state
        .services
        .tasks
        .create_task(
            auth.user_id,
            CreateTask {
                user_id: auth.user_id,
                title: req.title,
                description: req.description,
                priority: req.priority,
                due_date: req.due_date,
            },
        )
        .await?;

    Ok(created("Task created successfully", task))
}

pub async fn get_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Task>>> {
    let task_id = parse_id(&id, "task")?;
    let task = state.services.tasks.get_task(auth.user_id, task_id).await?;
    Ok(ok("Task retrieved successfully", task))
}

pub async fn update_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateTaskRequest>,
) -> ApiResult<Json<Envelope<Task>>> {
    let task_id = parse_id(&id, "task")?;
    let task = state
        .services
        .tasks
        .update_task(auth.user_id, task_id, req.into())
        .await?;
    Ok(ok("Task updated successfully", task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<()>>> {
    let task_id = parse_id(&id, "task")?;
    state.services.tasks.delete_task(auth.user_id, task_id).await?;
    Ok(done("Task deleted successfully"))
}

pub async fn complete_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Task>>> {
    let task_id = parse_id(&id, "task")?;
    let task = state.services.tasks.complete_task(auth.user_id, task_id).await?;
    Ok(ok("Task marked as completed", task))
}

pub async fn task_history(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Vec<TaskHistoryEntry>>>> {
    let task_id = parse_id(&id, "task")?;
    let history = state.services.tasks.get_history(auth.user_id, task_id).await?;
    Ok(ok("Task history retrieved successfully", history))
}
