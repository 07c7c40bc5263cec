use axum::http::StatusCode;
use http_body_util::BodyExt;
use jarvis_core::command::default_registry;
use jarvis_core::config::Config;
use jarvis_core::entity;
use jarvis_core::table::{MemoryStorage, TableStorage, WorkbookStorage};
use jarvis_server::{build_router, state_for_root, AppState};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn app_with(config: Config) -> (axum::Router, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    entity::ensure_tables(storage.as_ref()).unwrap();
    let state = AppState::new(storage.clone(), default_registry(), config);
    (build_router(state), storage)
}

fn app() -> (axum::Router, Arc<MemoryStorage>) {
    app_with(Config::default())
}

/// Send a GET request via `oneshot` and return (status, content-type, body text).
async fn get(app: axum::Router, uri: &str, host: Option<&str>) -> (StatusCode, String, String) {
    let mut req = axum::http::Request::builder().uri(uri);
    if let Some(host) = host {
        req = req.header("host", host);
    }
    let req = req.body(axum::body::Body::empty()).unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, String::from_utf8_lossy(&body).into_owned())
}

/// POST raw bytes to `/` and return (status, parsed JSON body).
async fn post_raw(app: axum::Router, body: Vec<u8>) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(body))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn post_json(app: axum::Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    post_raw(app, serde_json::to_vec(&body).unwrap()).await
}

// ---------------------------------------------------------------------------
// Read endpoint
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check() {
    let (app, _) = app();
    let (status, _, body) = get(app, "/?path=test", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Web app is working!");
}

#[tokio::test]
async fn unknown_path_is_not_found_text() {
    let (app, _) = app();
    let (status, _, body) = get(app.clone(), "/?path=admin", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Not found");

    let (status, _, body) = get(app, "/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Not found");
}

#[tokio::test]
async fn manifest_uses_host_header() {
    let (app, _) = app();
    let (status, ct, body) = get(
        app,
        "/?path=.well-known/ai-plugin.json",
        Some("jarvis.local:3141"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(ct.contains("application/json"));
    let manifest: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(manifest["name_for_human"], "KeithOS Command Plugin");
    assert_eq!(
        manifest["api"]["url"],
        "http://jarvis.local:3141?path=openapi.yaml"
    );
}

#[tokio::test]
async fn manifest_prefers_public_url() {
    let mut config = Config::default();
    config.server.public_url = Some("https://jarvis.example.com/".into());
    let (app, _) = app_with(config);
    let (_, _, body) = get(app, "/.well-known/ai-plugin.json", Some("ignored")).await;
    let manifest: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        manifest["api"]["url"],
        "https://jarvis.example.com?path=openapi.yaml"
    );
}

#[tokio::test]
async fn openapi_is_yaml_with_command_names() {
    let (app, _) = app();
    let (status, ct, body) = get(app.clone(), "/?path=openapi.yaml", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(ct.contains("yaml"));
    assert!(body.contains("openapi: 3.1.0"));
    assert!(body.contains("addProtocolEntry"));
    assert!(body.contains("agents.add"));

    let (status, _, direct) = get(app, "/openapi.yaml", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(direct, body);
}

// ---------------------------------------------------------------------------
// Write endpoint
// ---------------------------------------------------------------------------

#[tokio::test]
async fn command_success_envelope() {
    let (app, storage) = app();
    let (status, body) = post_json(
        app,
        json!({
            "commandLabel": "addProtocolEntry",
            "data": { "Rule ID": "SSP-JARVIS-LIVE-TEST", "Prompt Type": "System Protocol" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "status": "success", "result": "✅ Protocol logged: SSP-JARVIS-LIVE-TEST" })
    );
    assert_eq!(storage.get("KeithOS_Playbook").unwrap().rows.len(), 1);
}

#[tokio::test]
async fn unknown_command_envelope() {
    let (app, _) = app();
    let (status, body) = post_json(app, json!({ "commandLabel": "selfDestruct", "data": {} })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "unknown command: selfDestruct");
}

#[tokio::test]
async fn malformed_body_is_invalid_payload() {
    let (app, _) = app();
    let (status, body) = post_raw(app.clone(), b"{not json".to_vec()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let (status, body) = post_json(app, json!({ "data": {} })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("commandLabel"));
}

#[tokio::test]
async fn duplicate_key_is_conflict() {
    let (app, _) = app();
    let add = json!({ "commandLabel": "agents.add", "data": { "Agent Name": "Lyra" } });
    let (status, _) = post_json(app.clone(), add.clone()).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = post_json(app, add).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn missing_data_defaults_to_empty_object() {
    let (app, _) = app();
    let (status, body) = post_json(app, json!({ "commandLabel": "tones.list" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "result": [] }));
}

#[tokio::test]
async fn concurrent_adds_get_distinct_ids() {
    let (app, storage) = app();
    let mut handles = Vec::new();
    for i in 0..8 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            post_json(
                app,
                json!({ "commandLabel": "queue.add", "data": { "Task Description": format!("job {i}") } }),
            )
            .await
        }));
    }
    let mut keys = Vec::new();
    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        keys.push(body["result"]["key"].as_str().unwrap().to_string());
    }
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), 8);
    assert_eq!(storage.get("Agent_Queues").unwrap().rows.len(), 8);
}

// ---------------------------------------------------------------------------
// Workbook-backed state
// ---------------------------------------------------------------------------

#[tokio::test]
async fn state_for_root_requires_init() {
    let dir = TempDir::new().unwrap();
    assert!(state_for_root(dir.path()).is_err());

    let storage = WorkbookStorage::init(dir.path()).unwrap();
    entity::ensure_tables(&storage).unwrap();
    let app = build_router(state_for_root(dir.path()).unwrap());

    let (status, body) = post_json(
        app,
        json!({ "commandLabel": "apps.add", "data": { "App Name": "Jarvis", "Status": "Live" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["key"], "Jarvis");

    let reopened = WorkbookStorage::open(dir.path()).unwrap();
    assert_eq!(reopened.get("App_Index").unwrap().rows.len(), 1);
}
