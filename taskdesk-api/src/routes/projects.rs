/// Project endpoints
///
/// Every authenticated user may read projects. Creating requires the gestor
/// or admin role; a gestor may change only the projects they lead, an admin
/// any project.
///
/// - `GET    /api/projects` - All projects, nearest deadline first
/// - `POST   /api/projects` - Create a project (gestor, admin)
/// - `GET    /api/projects/:id`
/// - `PUT    /api/projects/:id`
/// - `DELETE /api/projects/:id`

use super::{created, done, ok, parse_id, Envelope, ValidatedJson};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use taskdesk_shared::{
    auth::middleware::AuthContext,
    models::{CreateProject, Project, UpdateProject},
};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(required(message = "Deadline is required"))]
    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    pub deadline: Option<DateTime<Utc>>,
}

pub async fn list_projects(
    State(state): State<AppState>,
    _auth: AuthContext,
) -> ApiResult<Json<Envelope<Vec<Project>>>> {
    let projects = state.services.projects.get_projects().await?;
    Ok(ok("Projects retrieved successfully", projects))
}

/// # Errors
///
/// - `403 Forbidden`: Caller is a colaborador
pub async fn create_project(
    State(state): State<AppState>,
    auth: AuthContext,
    ValidatedJson(req): ValidatedJson<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<Project>>)> {
    let deadline = req
        .deadline
        .ok_or_else(|| ApiError::BadRequest("Deadline is required".to_string()))?;
    let project = state
        .services
        .projects
        .create_project(
            &auth,
            CreateProject {
                gestor_id: auth.user_id,
                title: req.title,
                description: req.description,
                deadline,
            },
        )
        .await?;

    Ok(created("Project created successfully", project))
}

pub async fn get_project(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Project>>> {
    let project_id = parse_id(&id, "project")?;
    let project = state.services.projects.get_project(project_id).await?;
    Ok(ok("Project retrieved successfully", project))
}

pub async fn update_project(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateProjectRequest>,
) -> ApiResult<Json<Envelope<Project>>> {
    let project_id = parse_id(&id, "project")?;
    let project = state
        .services
        .projects
        .update_project(
            &auth,
            project_id,
            UpdateProject {
                title: req.title,
                description: req.description,
                deadline: req.deadline,
            },
        )
        .await?;
    Ok(ok("Project updated successfully", project))
}

pub async fn delete_project(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<()>>> {
    let project_id = parse_id(&id, "project")?;
    state.services.projects.delete_project(&auth, project_id).await?;
    Ok(done("Project deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_required_on_create() {
        let req: CreateProjectRequest = serde_json::from_str(r#"{"title": "Launch"}"#).unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("deadline"));

        let req: CreateProjectRequest = serde_json::from_str(
            r#"{"title": "Launch", "deadline": "2030-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
    }
}
