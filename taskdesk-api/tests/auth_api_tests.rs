/// Registration, login, token refresh and bearer-token enforcement
mod common;

use axum::http::{Method, StatusCode};
use common::{json_request, TestContext};
use serde_json::json;

async fn register(ctx: &TestContext, name: &str, email: &str, password: &str) -> (StatusCode, serde_json::Value) {
    ctx.send(json_request(
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "name": name, "email": email, "password": password })),
    ))
    .await
}

async fn login(ctx: &TestContext, email: &str, password: &str) -> (StatusCode, serde_json::Value) {
    ctx.send(json_request(
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    ))
    .await
}

#[tokio::test]
async fn test_register_creates_colaborador() {
    let ctx = TestContext::new();

    let (status, body) = register(&ctx, "Ana Souza", "Ana@Example.com", "secret1").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["data"]["user"]["role"], "colaborador");
    assert_eq!(body["data"]["user"]["email"], "ana@example.com");
    assert!(body["data"]["user"].get("password_hash").is_none());
    assert!(body["data"]["token"].is_string());
    assert!(body["data"]["refresh_token"].is_string());
}

#[tokio::test]
async fn test_padded_email_is_accepted() {
    let ctx = TestContext::new();

    let (status, body) = register(&ctx, "Ana", "  ana@example.com ", "secret1").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user"]["email"], "ana@example.com");

    let (status, _) = login(&ctx, " ana@example.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let ctx = TestContext::new();

    let (status, _) = register(&ctx, "Ana", "ana@example.com", "secret1").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = register(&ctx, "Other Ana", "ana@example.com", "secret2").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");
    assert_eq!(body["status"], 409);
}

#[tokio::test]
async fn test_register_validation_errors() {
    let ctx = TestContext::new();

    let (status, body) = register(&ctx, "A", "not-an-email", "123").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ValidationError");
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "name", "password"]);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let ctx = TestContext::new();

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let (status, body) = ctx.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadRequest");
}

#[tokio::test]
async fn test_login_and_use_token() {
    let ctx = TestContext::new();
    register(&ctx, "Bruno", "bruno@example.com", "secret1").await;

    let (status, body) = login(&ctx, "bruno@example.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");

    let token = body["data"]["token"].as_str().unwrap();
    let (status, me) = ctx.get("/api/users/me", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["data"]["name"], "Bruno");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let ctx = TestContext::new();
    register(&ctx, "Carla", "carla@example.com", "secret1").await;

    let (wrong_status, wrong_password) = login(&ctx, "carla@example.com", "nope12").await;
    let (unknown_status, unknown_email) = login(&ctx, "ghost@example.com", "secret1").await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password["message"], unknown_email["message"]);
    assert_eq!(wrong_password["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_refresh_issues_access_token() {
    let ctx = TestContext::new();
    let (_, body) = register(&ctx, "Dora", "dora@example.com", "secret1").await;
    let refresh_token = body["data"]["refresh_token"].as_str().unwrap().to_string();
    let access_token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, refreshed) = ctx
        .send(json_request(
            Method::POST,
            "/api/auth/refresh",
            None,
            Some(json!({ "refresh_token": refresh_token })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    let new_token = refreshed["data"]["token"].as_str().unwrap();
    let (status, _) = ctx.get("/api/tasks", new_token).await;
    assert_eq!(status, StatusCode::OK);

    // An access token is not a refresh token
    let (status, _) = ctx
        .send(json_request(
            Method::POST,
            "/api/auth/refresh",
            None,
            Some(json!({ "refresh_token": access_token })),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_cannot_access_api() {
    let ctx = TestContext::new();
    let (_, body) = register(&ctx, "Eva", "eva@example.com", "secret1").await;
    let refresh_token = body["data"]["refresh_token"].as_str().unwrap();

    let (status, _) = ctx.get("/api/tasks", refresh_token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send(json_request(Method::GET, "/api/tasks", None, None))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
    assert_eq!(body["status"], 401);

    let (status, _) = ctx.get("/api/projects", "garbage.token.value").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = axum::http::Request::builder()
        .uri("/api/users/me")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, body) = ctx.send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Expected Bearer token");
}

#[tokio::test]
async fn test_health_without_database() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send(json_request(Method::GET, "/health", None, None))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "not_configured");
}

#[tokio::test]
async fn test_security_headers_on_api_responses() {
    let ctx = TestContext::new();

    let response = tower::ServiceExt::oneshot(
        ctx.app.clone(),
        json_request(Method::GET, "/health", None, None),
    )
    .await
    .unwrap();

    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "DENY");
}
