//! Router-level tests. The pool connects lazily and none of these requests reach the database.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use jobboard::{app_router, AppState};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

fn app() -> Router {
    app_with_limit(1024 * 1024)
}

fn app_with_limit(limit: usize) -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://postgres@localhost:5432/jobboard_test")
        .unwrap();
    app_router(AppState::new(pool, "jobboard"), limit)
}

async fn send(app: Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(b) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(b.to_string())
        }
        None => Body::empty(),
    };
    let res = app.oneshot(req.body(body).unwrap()).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn get(uri: &str) -> (StatusCode, Value) {
    send(app(), Method::GET, uri, None).await
}

#[tokio::test]
async fn health_and_version_use_the_envelope() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["status"], "ok");

    let (status, body) = get("/version").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "jobboard");
}

#[tokio::test]
async fn malformed_query_is_rejected_before_the_database() {
    let (status, body) = get("/api/jobs?page=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["data"], Value::Null);

    let (status, _) = get("/api/jobs?skillIds=not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get("/api/blog-posts?status=Pending").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get("/api/companies?foundedYear=soon").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bad_ids_are_400() {
    for uri in ["/api/jobs/42", "/api/users/not-a-uuid", "/api/blog-views/xyz/stats"] {
        let (status, body) = get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["status"], "error");
    }
    let (status, _) = send(app(), Method::DELETE, "/api/skills/nope", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analytics_routes_take_priority_over_ids() {
    let (status, body) = get("/api/blog-views/analytics/trends?days=many").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().unwrap_or_default();
    assert!(message.contains("query string"), "{}", message);
}

#[tokio::test]
async fn invalid_bodies_are_400() {
    let (status, _) = send(app(), Method::POST, "/api/jobs", Some("{")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(app(), Method::POST, "/api/jobs", Some(r#"{"Title": "Backend Engineer"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "validation failed: description is required");

    let job = json!({
        "title": "Backend Engineer",
        "description": "Build APIs",
        "companyId": "00000000-0000-0000-0000-000000000001",
        "jobType": "Full-time",
        "status": "Open",
    });
    let (status, _) = send(app(), Method::POST, "/api/jobs", Some(&job.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let user = json!({"email": "dev@example.com", "password": "short"});
    let (status, _) = send(app(), Method::POST, "/api/users", Some(&user.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(app(), Method::POST, "/api/roles", Some("[]")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_routes_are_404_envelopes() {
    let (status, body) = get("/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");

    let (status, _) = get("/elsewhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_bodies_are_rejected() {
    let big = json!({"name": "x".repeat(256)}).to_string();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/roles")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, big.len())
        .body(Body::from(big))
        .unwrap();
    let res = app_with_limit(64).oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn body_without_json_content_type_is_415() {
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/roles")
        .body(Body::from(r#"{"name": "editor"}"#))
        .unwrap();
    let res = app().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "error");
}
