use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use timetable_sync::api::router;
use timetable_sync::db;
use timetable_sync::state::AppState;
use timetable_sync::store::{MemorySyncStore, SqliteSyncStore};

fn memory_app() -> Router {
    router(AppState {
        store: Arc::new(MemorySyncStore::new()),
    })
}

async fn sqlite_app() -> Router {
    let pool = db::connect_in_memory()
        .await
        .expect("Failed to create database");
    router(AppState {
        store: Arc::new(SqliteSyncStore::new(pool)),
    })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/sync")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn timetable_payload() -> Value {
    json!({
        "2年春学期": {
            "月": { "1": { "name": "線形代数", "credits": 2 }, "2": null },
            "火": { "1": null, "2": { "name": "英語", "credits": 1 } }
        }
    })
}

async fn save_then_load(app: Router) {
    let started = Utc::now();

    let (status, saved) = send(&app, post_json(json!({ "data": timetable_payload() }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["success"], true);
    let id = saved["id"].as_str().expect("id in response").to_string();
    assert!(uuid::Uuid::parse_str(&id).is_ok());
    assert!(saved.get("data").is_none());

    let (status, loaded) = send(&app, get(&format!("/sync?id={}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loaded["success"], true);
    assert_eq!(loaded["data"], timetable_payload());

    let timestamp = DateTime::parse_from_rfc3339(loaded["timestamp"].as_str().unwrap())
        .unwrap()
        .with_timezone(&Utc);
    assert!(timestamp.timestamp_millis() >= started.timestamp_millis());
}

#[tokio::test]
async fn test_save_then_load_memory_store() {
    save_then_load(memory_app()).await;
}

#[tokio::test]
async fn test_save_then_load_sqlite_store() {
    save_then_load(sqlite_app().await).await;
}

#[tokio::test]
async fn test_save_with_existing_id_overwrites() {
    let app = sqlite_app().await;

    let (_, first) = send(&app, post_json(json!({ "data": { "v": 1, "keep": true } }))).await;
    let id = first["id"].as_str().unwrap().to_string();

    let (status, second) = send(&app, post_json(json!({ "data": { "v": 2 }, "id": id }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["id"], id.as_str());

    let (_, loaded) = send(&app, get(&format!("/sync?id={}", id))).await;
    assert_eq!(loaded["data"], json!({ "v": 2 }));
}

#[tokio::test]
async fn test_save_with_unknown_id_issues_new_id() {
    let app = memory_app();

    let (status, saved) = send(&app, post_json(json!({ "data": [1], "id": "made-up" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(saved["id"], "made-up");

    let (status, _) = send(&app, get("/sync?id=made-up")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_save_without_data_is_bad_request() {
    let app = memory_app();

    let (status, body) = send(&app, post_json(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());

    let (status, body) = send(&app, post_json(json!({ "data": null, "id": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_save_with_non_json_body_is_structured_bad_request() {
    let app = memory_app();
    let request = Request::builder()
        .method("POST")
        .uri("/sync")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_load_without_id_is_bad_request() {
    let app = memory_app();

    let (status, body) = send(&app, get("/sync")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, get("/sync?id=")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_load_unknown_id_is_not_found() {
    let app = sqlite_app().await;

    let (status, body) = send(&app, get("/sync?id=doesnotexist")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_health() {
    let app = sqlite_app().await;
    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cors_headers_present() {
    let app = memory_app();
    let request = Request::builder()
        .uri("/sync?id=doesnotexist")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
