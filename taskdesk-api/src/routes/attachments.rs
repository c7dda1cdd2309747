/// Attachment endpoints
///
/// - `GET    /api/tasks/:id/attachments` - Files on a task you own, newest first
/// - `POST   /api/tasks/:id/attachments` - Upload (multipart, field `file`)
/// - `GET    /api/attachments/:id/download` - File bytes with the stored type
/// - `DELETE /api/attachments/:id` - Delete a file you uploaded
///
/// Uploads over `MAX_UPLOAD_BYTES` answer 413.

use super::{created, done, ok, parse_id, Envelope};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use taskdesk_shared::{
    auth::middleware::AuthContext,
    models::TaskAttachment,
    services::NewAttachment,
    storage::{StorageError, DEFAULT_MIMETYPE},
};

const FILE_FIELD: &str = "file";

pub async fn list_attachments(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Vec<TaskAttachment>>>> {
    let task_id = parse_id(&id, "task")?;
    let attachments = state
        .services
        .attachments
        .get_task_attachments(auth.user_id, task_id)
        .await?;
    Ok(ok("Attachments retrieved successfully", attachments))
}

/// Checks task ownership before reading the body, then reads the `file`
/// field, stopping as soon as it passes the size limit
pub async fn upload_attachment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<Envelope<TaskAttachment>>)> {
    let task_id = parse_id(&id, "task")?;
    state.services.tasks.get_task(auth.user_id, task_id).await?;

    let mut multipart = multipart?;
    let max = state.services.attachments.max_file_bytes();

    let mut upload = None;
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let mimetype = field.content_type().map(|m| m.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await? {
            let size = (bytes.len() + chunk.len()) as u64;
            if size > max {
                return Err(StorageError::TooLarge { size, max }.into());
            }
            bytes.extend_from_slice(&chunk);
        }

        upload = Some(NewAttachment {
            filename,
            mimetype,
            bytes,
        });
        break;
    }

    let upload =
        upload.ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;

    let attachment = state
        .services
        .attachments
        .upload_attachment(auth.user_id, task_id, upload)
        .await?;

    Ok(created("File uploaded successfully", attachment))
}

pub async fn download_attachment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let attachment_id = parse_id(&id, "attachment")?;
    let content = state
        .services
        .attachments
        .download_attachment(auth.user_id, attachment_id)
        .await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&content.attachment.mimetype)
            .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_MIMETYPE)),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        content_disposition(&content.attachment.filename),
    );

    Ok((headers, content.bytes).into_response())
}

pub async fn delete_attachment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<()>>> {
    let attachment_id = parse_id(&id, "attachment")?;
    state
        .services
        .attachments
        .delete_attachment(auth.user_id, attachment_id)
        .await?;
    Ok(done("Attachment deleted successfully"))
}

/// `filename` carries an ASCII fallback; non-ASCII names also get an
/// RFC 5987 `filename*` with the UTF-8 bytes percent-encoded
fn content_disposition(filename: &str) -> HeaderValue {
    let cleaned: String = filename
        .chars()
        .filter(|c| *c != '"' && *c != '\\' && !c.is_control())
        .collect();

    let value = if cleaned.is_ascii() {
        format!("attachment; filename=\"{}\"", cleaned)
    } else {
        let fallback: String = cleaned
            .chars()
            .map(|c| if c.is_ascii() { c } else { '_' })
            .collect();
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            urlencoding::encode(&cleaned)
        )
    };

    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
