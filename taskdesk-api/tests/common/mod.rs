//! Shared helpers for the API tests
//!
//! Every test gets its own router over a fresh in-memory store and a
//! temporary upload directory, so tests run without PostgreSQL and in
//! parallel. Users are inserted straight into the store and handed a
//! signed access token; only the auth tests go through registration.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::collections::HashMap;
use taskdesk_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskdesk_shared::{
    auth::jwt::{create_token, Claims, TokenType},
    models::{CreateUser, Role, User},
    repositories::Repositories,
};
use tempfile::TempDir;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

const BOUNDARY: &str = "taskdesk-test-boundary";

pub struct TestContext {
    pub app: Router,
    pub repos: Repositories,
    pub config: Config,
    _uploads: TempDir,
}

/// A user with a valid access token
pub struct TestUser {
    pub user: User,
    pub token: String,
}

impl TestUser {
    pub fn id(&self) -> i32 {
        self.user.id
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_settings(&[])
    }

    pub fn with_max_upload(bytes: u64) -> Self {
        Self::with_settings(&[("MAX_UPLOAD_BYTES", &bytes.to_string())])
    }

    fn with_settings(extra: &[(&str, &str)]) -> Self {
        let uploads = TempDir::new().expect("Failed to create upload dir");

        let mut vars: HashMap<String, String> = HashMap::new();
        vars.insert("DATABASE_URL".into(), "postgresql://unused/taskdesk".into());
        vars.insert("JWT_SECRET".into(), JWT_SECRET.into());
        vars.insert("UPLOAD_DIR".into(), uploads.path().display().to_string());
        for (key, value) in extra {
            vars.insert(key.to_string(), value.to_string());
        }
        let config = Config::from_lookup(|key| vars.get(key).cloned()).expect("Invalid test config");

        let repos = Repositories::in_memory();
        let app = build_router(AppState::with_repositories(&repos, config.clone()));

        Self {
            app,
            repos,
            config,
            _uploads: uploads,
        }
    }

    pub async fn create_user(&self, name: &str, role: Role) -> TestUser {
        let user = self
            .repos
            .users
            .create(CreateUser {
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                password_hash: "not-a-real-hash".to_string(),
                role,
            })
            .await
            .expect("Failed to create user");

        let token = create_token(&Claims::new(user.id, role, TokenType::Access), JWT_SECRET)
            .expect("Failed to sign token");

        TestUser { user, token }
    }

    /// Sends a request and returns the status with the parsed JSON body
    /// (`Value::Null` for an empty or non-JSON body)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.expect("Request failed");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");

        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(json_request(Method::GET, uri, Some(token), None)).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request(Method::POST, uri, Some(token), Some(body))).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request(Method::PUT, uri, Some(token), Some(body))).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(json_request(Method::PATCH, uri, Some(token), body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(json_request(Method::DELETE, uri, Some(token), None)).await
    }

    /// Creates a task through the API and returns its id
    pub async fn create_task(&self, owner: &TestUser, title: &str) -> i64 {
        let (status, body) = self
            .post("/api/tasks", &owner.token, serde_json::json!({ "title": title }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create task failed: {body}");
        body["data"]["id"].as_i64().expect("task id")
    }

    pub async fn create_comment(&self, author: &TestUser, task_id: i64, content: &str) -> i64 {
        let (status, body) = self
            .post(
                &format!("/api/tasks/{task_id}/comments"),
                &author.token,
                serde_json::json!({ "content": content }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create comment failed: {body}");
        body["data"]["id"].as_i64().expect("comment id")
    }

    pub async fn upload(
        &self,
        uploader: &TestUser,
        task_id: i64,
        filename: &str,
        bytes: &[u8],
    ) -> (StatusCode, Value) {
        self.send(multipart_request(
            &format!("/api/tasks/{task_id}/attachments"),
            &uploader.token,
            filename,
            "text/plain",
            bytes,
        ))
        .await
    }
}

pub fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// A `multipart/form-data` request with a single `file` part
pub fn multipart_request(
    uri: &str,
    token: &str,
    filename: &str,
    content_type: &str,
    bytes: &[u8],
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}
