//! Router-level tests that need no database server. The pool is built
//! lazily against a closed port, so only requests that actually reach the
//! storage layer observe a connection failure.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use sqlx::mysql::MySqlPoolOptions;
use tower::ServiceExt;

use noteboard::config::DatabaseConfig;
use noteboard::db::NotesStorage;
use noteboard::router::{AppState, noteboard_router};

fn unreachable_app() -> Router {
    // TCP port 9 (discard) is assumed closed locally.
    let cfg = DatabaseConfig {
        host: "127.0.0.1".to_string(),
        port: 9,
        password: Some("unused".to_string()),
        max_connections: 2,
        acquire_timeout_secs: 1,
        ..DatabaseConfig::default()
    };
    let pool = MySqlPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(cfg.acquire_timeout())
        .connect_lazy_with(cfg.pool_options().expect("connect options"));
    noteboard_router(AppState::new(NotesStorage::new(pool)))
}

async fn send(
    app: Router,
    method: &str,
    path: &str,
    body: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("failed to build request");

    let resp = app.oneshot(request).await.expect("request failed");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, value)
}

#[tokio::test]
async fn register_rejects_blank_fields_before_touching_the_pool() {
    let (status, body) = send(
        unreachable_app(),
        "POST",
        "/register",
        Some(r#"{"username": "  ", "email": "", "password": ""}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn register_reports_unavailable_database_as_503() {
    let (status, body) = send(
        unreachable_app(),
        "POST",
        "/register",
        Some(r#"{"username": "ann", "email": "ann@example.com", "password": "hunter2"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "DB_UNAVAILABLE");
}

#[tokio::test]
async fn login_reports_unavailable_database_as_503() {
    let (status, body) = send(
        unreachable_app(),
        "POST",
        "/login",
        Some(r#"{"email": "ann@example.com", "password": "hunter2"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "DB_UNAVAILABLE");
}

#[tokio::test]
async fn list_notes_reports_unavailable_database_as_503() {
    let (status, body) = send(unreachable_app(), "GET", "/notes/1", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "DB_UNAVAILABLE");
}

#[tokio::test]
async fn note_listing_requires_a_numeric_user_id() {
    let (status, _) = send(unreachable_app(), "GET", "/notes/not-a-number", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
