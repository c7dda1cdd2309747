/// Attachment upload, download and deletion over multipart HTTP
mod common;

use axum::http::{header, Method, StatusCode};
use common::{json_request, multipart_request, TestContext};
use taskdesk_shared::models::Role;
use tower::ServiceExt;

#[tokio::test]
async fn test_upload_list_download() {
    let ctx = TestContext::new();
    let alice = ctx.create_user("Alice", Role::Colaborador).await;
    let task = ctx.create_task(&alice, "With files").await;

    let (status, body) = ctx.upload(&alice, task, "notes.txt", b"hello world").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "File uploaded successfully");
    assert_eq!(body["data"]["filename"], "notes.txt");
    assert_eq!(body["data"]["filesize"], 11);
    assert_eq!(body["data"]["mimetype"], "text/plain");
    assert_eq!(body["data"]["user_id"], alice.id());
    assert!(body["data"].get("filepath").is_none());
    let attachment = body["data"]["id"].as_i64().unwrap();

    let (status, body) = ctx
        .get(&format!("/api/tasks/{task}/attachments"), &alice.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = ctx
        .app
        .clone()
        .oneshot(json_request(
            Method::GET,
            &format!("/api/attachments/{attachment}/download"),
            Some(&alice.token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"notes.txt\""
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"hello world");
}

#[tokio::test]
async fn test_non_owner_cannot_upload_download_or_delete() {
    let ctx = TestContext::new();
    let alice = ctx.create_user("Alice", Role::Colaborador).await;
    let bob = ctx.create_user("Bob", Role::Colaborador).await;
    let task = ctx.create_task(&alice, "Private files").await;

    let (status, _) = ctx.upload(&bob, task, "evil.txt", b"x").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = ctx.upload(&alice, task, "secret.txt", b"classified").await;
    let attachment = body["data"]["id"].as_i64().unwrap();

    let (status, _) = ctx
        .get(&format!("/api/attachments/{attachment}/download"), &bob.token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx
        .delete(&format!("/api/attachments/{attachment}"), &bob.token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You can only delete your own attachments");

    let (status, _) = ctx
        .get(&format!("/api/tasks/{task}/attachments"), &bob.token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_removes_row_and_file() {
    let ctx = TestContext::new();
    let alice = ctx.create_user("Alice", Role::Colaborador).await;
    let task = ctx.create_task(&alice, "Cleanup").await;

    let (_, body) = ctx.upload(&alice, task, "old.txt", b"bye").await;
    let attachment = body["data"]["id"].as_i64().unwrap();
    let stored = ctx
        .repos
        .attachments
        .find_by_id(attachment as i32)
        .await
        .unwrap()
        .unwrap();
    assert!(std::path::Path::new(&stored.filepath).exists());

    let (status, body) = ctx
        .delete(&format!("/api/attachments/{attachment}"), &alice.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Attachment deleted successfully");
    assert!(!std::path::Path::new(&stored.filepath).exists());

    let (status, _) = ctx
        .get(&format!("/api/attachments/{attachment}/download"), &alice.token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let ctx = TestContext::with_max_upload(16);
    let alice = ctx.create_user("Alice", Role::Colaborador).await;
    let task = ctx.create_task(&alice, "Big file").await;

    let (status, body) = ctx.upload(&alice, task, "big.bin", &[7u8; 64]).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"], "PayloadTooLarge");

    let (_, body) = ctx
        .get(&format!("/api/tasks/{task}/attachments"), &alice.token)
        .await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_non_owner_upload_is_refused_before_reading_file() {
    let ctx = TestContext::with_max_upload(16);
    let alice = ctx.create_user("Alice", Role::Colaborador).await;
    let bob = ctx.create_user("Bob", Role::Colaborador).await;
    let task = ctx.create_task(&alice, "Private files").await;

    // Over the limit, but ownership is decided first
    let (status, body) = ctx.upload(&bob, task, "big.bin", &[7u8; 64]).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");

    let (status, _) = ctx.upload(&bob, 9999, "big.bin", &[7u8; 64]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_requires_file_field() {
    let ctx = TestContext::new();
    let alice = ctx.create_user("Alice", Role::Colaborador).await;
    let task = ctx.create_task(&alice, "Empty").await;

    // Not multipart at all
    let (status, _) = ctx
        .post(
            &format!("/api/tasks/{task}/attachments"),
            &alice.token,
            serde_json::json!({ "file": "nope" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Empty file
    let (status, body) = ctx.upload(&alice, task, "empty.txt", b"").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Uploaded file is empty");

    // Invalid task id
    let (status, body) = ctx
        .send(multipart_request(
            "/api/tasks/nope/attachments",
            &alice.token,
            "a.txt",
            "text/plain",
            b"a",
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid task ID");
}

#[tokio::test]
async fn test_deleting_task_cascades_to_comments_and_attachments() {
    let ctx = TestContext::new();
    let alice = ctx.create_user("Alice", Role::Colaborador).await;
    let task = ctx.create_task(&alice, "Parent").await;

    let comment = ctx.create_comment(&alice, task, "child comment").await;
    let (_, body) = ctx.upload(&alice, task, "child.txt", b"child").await;
    let attachment = body["data"]["id"].as_i64().unwrap();
    let uploads = ctx.config.uploads.dir.as_path();
    assert_eq!(std::fs::read_dir(uploads).unwrap().count(), 1);

    let (status, _) = ctx.delete(&format!("/api/tasks/{task}"), &alice.token).await;
    assert_eq!(status, StatusCode::OK);

    // Stored files go with the rows
    assert_eq!(std::fs::read_dir(uploads).unwrap().count(), 0);

    assert!(ctx.repos.comments.find_by_id(comment as i32).await.unwrap().is_none());
    assert!(ctx
        .repos
        .attachments
        .find_by_id(attachment as i32)
        .await
        .unwrap()
        .is_none());
    assert!(ctx
        .repos
        .history
        .find_all_by_task_id(task as i32)
        .await
        .unwrap()
        .is_empty());
}
