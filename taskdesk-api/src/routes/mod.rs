/// API route handlers
///
/// Handlers are organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, token refresh
/// - `users`: Current profile and role changes
/// - `tasks`: Task CRUD, completion and history
/// - `comments`: Comments on a task
/// - `attachments`: Files on a task
/// - `projects`: Projects led by gestores
///
/// Every successful response is wrapped in an [`Envelope`].

pub mod attachments;
pub mod auth;
pub mod comments;
pub mod health;
pub mod projects;
pub mod tasks;
pub mod users;

use crate::error::{ApiError, ApiResult};
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;

/// Success body: `{ "message": ..., "data": ... }`
///
/// `data` is omitted for operations that return nothing, such as deletes.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 200 with data
pub fn ok<T: Serialize>(message: &str, data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        message: message.to_string(),
        data: Some(data),
    })
}

/// 201 with the created resource
pub fn created<T: Serialize>(message: &str, data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, ok(message, data))
}

/// 200 with a message only
pub fn done(message: &str) -> Json<Envelope<()>> {
    Json(Envelope {
        message: message.to_string(),
        data: None,
    })
}

/// Parses a numeric path id, answering 400 `Invalid <entity> ID` otherwise
pub fn parse_id(raw: &str, entity: &str) -> ApiResult<i32> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid {} ID", entity)))
}

/// JSON body extractor that also runs `validator` rules
///
/// Malformed JSON and failed rules both answer 400.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42", "task").unwrap(), 42);
        assert!(matches!(
            parse_id("abc", "task"),
            Err(ApiError::BadRequest(msg)) if msg == "Invalid task ID"
        ));
        assert!(parse_id("0", "comment").is_err());
        assert!(parse_id("-3", "project").is_err());
        assert!(parse_id("99999999999", "attachment").is_err());
    }

    #[test]
    fn test_done_omits_data() {
        let body = serde_json::to_value(&done("Task deleted successfully").0).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "Task deleted successfully" }));
    }

    #[test]
    fn test_created_status() {
        let (status, Json(body)) = created("Task created successfully", 7);
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.data, Some(7));
    }
}
