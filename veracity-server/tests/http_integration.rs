//! HTTP integration tests for the Veracity server
//!
//! Full handler dispatch through the Axum router with `oneshot`, backed by a
//! file store in a temp directory and a manual clock so checks are instant.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{TimeZone, Utc};
use serde_json::json;
use tower::ServiceExt;
use veracity_core::{App, FileStore, HistoryStore, KeyValueStore, ManualClock, VeracityConfig};
use veracity_server::http::{build_router, HttpState};

struct TestServer {
    _dir: tempfile::TempDir,
    store: Arc<FileStore>,
    state: Arc<HttpState>,
}

impl TestServer {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = Arc::new(FileStore::new(dir.path().join("store.json")));
        let state = Self::state_for(store.clone());
        Self {
            _dir: dir,
            store,
            state,
        }
    }

    fn state_for(store: Arc<FileStore>) -> Arc<HttpState> {
        let config = VeracityConfig::default();
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 10, 18, 14, 0, 0).unwrap(),
        ));
        let app = App::from_config(&config, store, clock).expect("build app");
        Arc::new(HttpState::new(app, config))
    }

    /// A second server on the same store, as after a restart.
    fn restarted(&self) -> Arc<HttpState> {
        Self::state_for(self.store.clone())
    }
}

async fn send(state: Arc<HttpState>, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = build_router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ===========================================================================
// TEST 1: GET /version - returns version and service name
// ===========================================================================
#[tokio::test]
async fn test_version_endpoint() {
    let server = TestServer::new();
    let (status, body) = send(server.state.clone(), empty_request("GET", "/version")).await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["version"].is_string());
    assert_eq!(json["service"], "veracity");
}

// ===========================================================================
// TEST 2: POST /api/check - fake example scores 100% FAKE
// ===========================================================================
#[tokio::test]
async fn test_api_check_fake_example() {
    let server = TestServer::new();
    let req = json_request(
        "POST",
        "/api/check",
        json!({"text": "BREAKING: a miracle secret they don't want you to know"}),
    );
    let (status, body) = send(server.state.clone(), req).await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "FAKE");
    assert_eq!(json["confidence"], "High");
    assert_eq!(json["fakePercentage"], 100);
    assert_eq!(json["reliablePercentage"], 0);
    assert_eq!(json["reasons"].as_array().map(|r| r.len()), Some(3));
    assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
}

// ===========================================================================
// TEST 3: POST /api/check - blank text rejected with 400
// ===========================================================================
#[tokio::test]
async fn test_api_check_blank_text() {
    let server = TestServer::new();
    let req = json_request("POST", "/api/check", json!({"text": "  \n "}));
    let (status, body) = send(server.state.clone(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "error");
    assert!(!server.store.path().exists(), "nothing should be persisted");
}

// ===========================================================================
// TEST 4: eleven checks leave ten in history, newest first
// ===========================================================================
#[tokio::test]
async fn test_history_capped_at_ten() {
    let server = TestServer::new();
    for i in 0..11 {
        let req = json_request("POST", "/api/check", json!({"text": format!("story {}", i)}));
        let (status, _) = send(server.state.clone(), req).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(server.state.clone(), empty_request("GET", "/api/history")).await;
    assert_eq!(status, StatusCode::OK);
    let items: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(items.len(), 10);
    assert_eq!(items[0]["snippet"], "story 10...");
    assert_eq!(items[9]["snippet"], "story 1...");
}

// ===========================================================================
// TEST 5: history survives a restart on the same store
// ===========================================================================
#[tokio::test]
async fn test_history_survives_restart() {
    let server = TestServer::new();
    let req = json_request("POST", "/api/check", json!({"text": "official report verified"}));
    send(server.state.clone(), req).await;

    let restarted = server.restarted();
    let (_, body) = send(restarted, empty_request("GET", "/api/history")).await;
    let items: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["result"]["status"], "RELIABLE");
}

// ===========================================================================
// TEST 6: DELETE /api/history - 204, slot removed, restart sees nothing
// ===========================================================================
#[tokio::test]
async fn test_clear_history_removes_slot() {
    let server = TestServer::new();
    let req = json_request("POST", "/api/check", json!({"text": "urgent"}));
    send(server.state.clone(), req).await;
    assert!(server.store.get("fakeNewsHistory").unwrap().is_some());

    let (status, _) = send(server.state.clone(), empty_request("DELETE", "/api/history")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(server.store.get("fakeNewsHistory").unwrap(), None);

    let fresh = HistoryStore::load(server.store.clone(), "fakeNewsHistory", 10).unwrap();
    assert!(fresh.is_empty());
}

// ===========================================================================
// TEST 7: form submit redirects to the page, which shows the result
// ===========================================================================
#[tokio::test]
async fn test_form_check_then_page() {
    let server = TestServer::new();
    let resp = build_router(server.state.clone())
        .oneshot(form_request("/check", "article=Shocking+secret+cure"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/");

    let (status, body) = send(server.state.clone(), empty_request("GET", "/")).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("Status: FAKE"));
    assert!(html.contains("Recent Checks"));
    assert!(html.contains("Shocking secret cure..."));
}

// ===========================================================================
// TEST 8: blank form submit redirects with the empty-input notice
// ===========================================================================
#[tokio::test]
async fn test_form_check_blank_redirects_with_notice() {
    let server = TestServer::new();
    let resp = build_router(server.state.clone())
        .oneshot(form_request("/check", "article=+++"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/?notice=empty_input");

    let (_, body) = send(
        server.state.clone(),
        empty_request("GET", "/?notice=empty_input"),
    )
    .await;
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("Please enter an article to check"));
}

// ===========================================================================
// TEST 9: POST /clear drops input and result but keeps history
// ===========================================================================
#[tokio::test]
async fn test_form_clear_keeps_history() {
    let server = TestServer::new();
    let req = json_request("POST", "/api/check", json!({"text": "research shows"}));
    send(server.state.clone(), req).await;

    let (status, _) = send(server.state.clone(), form_request("/clear", "")).await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let (_, body) = send(server.state.clone(), empty_request("GET", "/api/state")).await;
    let state: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(state["input"], "");
    assert!(state["result"].is_null());
    assert_eq!(state["canSubmit"], false);

    let (_, body) = send(server.state.clone(), empty_request("GET", "/api/history")).await;
    let items: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(items.len(), 1);
}

// ===========================================================================
// TEST 10: corrupt slot on disk - server starts with empty history
// ===========================================================================
#[tokio::test]
async fn test_corrupt_slot_starts_empty() {
    let server = TestServer::new();
    server.store.set("fakeNewsHistory", "{broken").unwrap();

    let restarted = server.restarted();
    let (status, body) = send(restarted, empty_request("GET", "/api/history")).await;
    assert_eq!(status, StatusCode::OK);
    let items: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
    assert!(items.is_empty());
}

// ===========================================================================
// TEST 11: POST /api/check while a check is running - 409, input untouched
// ===========================================================================
#[tokio::test]
async fn test_api_check_busy_while_in_flight() {
    let server = TestServer::new();
    let pending = server
        .state
        .app
        .lock()
        .await
        .begin_check_with("first article")
        .unwrap();

    let req = json_request("POST", "/api/check", json!({"text": "intruder"}));
    let (status, body) = send(server.state.clone(), req).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "A check is already in progress");

    let (_, body) = send(server.state.clone(), empty_request("GET", "/api/state")).await;
    let state: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(state["input"], "first article");
    assert_eq!(state["loading"], true);

    let outcome = pending.run().await;
    server.state.app.lock().await.finish_check(outcome).unwrap();

    let (_, body) = send(server.state.clone(), empty_request("GET", "/api/history")).await;
    let items: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["snippet"], "first article...");
}

// ===========================================================================
// TEST 12: unparseable store file - next check rewrites it, restart sees it
// ===========================================================================
#[tokio::test]
async fn test_unparseable_store_file_replaced_by_next_check() {
    let server = TestServer::new();
    std::fs::write(server.store.path(), "garbage").unwrap();

    let restarted = server.restarted();
    let req = json_request("POST", "/api/check", json!({"text": "miracle cure"}));
    let (status, _) = send(restarted, req).await;
    assert_eq!(status, StatusCode::OK);

    let again = server.restarted();
    let (_, body) = send(again, empty_request("GET", "/api/history")).await;
    let items: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["result"]["status"], "FAKE");
}
