//! Veracity HTTP server
//!
//! Axum-based server for the fake news checker. Serves the HTML page and a
//! JSON API over one shared [`App`].
//!
//! Architecture: each endpoint has a thin axum handler that delegates to a pure
//! inner function. The inner functions are directly testable without axum
//! dispatch machinery.
//!
//! Endpoints:
//! - GET    /               - HTML page
//! - POST   /check          - form submit, redirects to /
//! - POST   /clear          - clear input and result, redirects to /
//! - POST   /history/clear  - clear history, redirects to /
//! - POST   /api/check      - run a check, returns the CheckResult
//! - GET    /api/state      - input, loading flag and current result
//! - GET    /api/history    - history items, newest first
//! - DELETE /api/history    - clear history
//! - GET    /health         - liveness and history size
//! - GET    /version        - server version info

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Mutex};
use veracity_core::{App, CheckResult, Notice, VeracityConfig};

use crate::page::{notice_code, notice_from_code, render_page, PageView};

/// Shared state for all HTTP handlers
pub struct HttpState {
    pub app: Mutex<App>,
    pub config: VeracityConfig,
}

impl HttpState {
    pub fn new(app: App, config: VeracityConfig) -> Self {
        Self {
            app: Mutex::new(app),
            config,
        }
    }
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/", get(page_handler))
        .route("/check", post(form_check_handler))
        .route("/clear", post(form_clear_handler))
        .route("/history/clear", post(form_clear_history_handler))
        .route("/api/check", post(check_handler))
        .route("/api/state", get(state_handler))
        .route(
            "/api/history",
            get(history_handler).delete(clear_history_handler),
        )
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .with_state(state)
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    app: App,
    config: VeracityConfig,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", config.http.host, config.http.port);
    let state = Arc::new(HttpState::new(app, config));

    let router = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Veracity listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Request DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckForm {
    #[serde(default)]
    pub article: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    pub notice: Option<String>,
}

// ============================================================================
// Inner (directly testable) business logic functions
// ============================================================================

/// Admit a check, then run and finish it on a detached task. The task owns
/// the completion, so a client that disconnects mid-check cannot leave the
/// app stuck in `loading`.
pub async fn run_check(state: &Arc<HttpState>, text: String) -> Result<CheckResult, Notice> {
    let pending = {
        let mut app = state.app.lock().await;
        app.begin_check_with(text)?
    };

    let task_state = state.clone();
    let task = tokio::spawn(async move {
        let outcome = pending.run().await;
        task_state.app.lock().await.finish_check(outcome)
    });

    match task.await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Check task failed: {}", e);
            Err(Notice::CheckFailed)
        }
    }
}

pub fn notice_status(notice: Notice) -> StatusCode {
    match notice {
        Notice::EmptyInput => StatusCode::BAD_REQUEST,
        Notice::Busy => StatusCode::CONFLICT,
        Notice::CheckFailed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_body(message: impl Into<String>) -> serde_json::Value {
    serde_json::json!({
        "error": message.into(),
        "status": "error",
    })
}

/// Inner check - validates the text and runs the scorer.
pub async fn check_inner(
    state: &Arc<HttpState>,
    req: CheckRequest,
) -> (StatusCode, serde_json::Value) {
    let start = Instant::now();
    let text = req.text.unwrap_or_default();

    match run_check(state, text).await {
        Ok(result) => {
            tracing::debug!("API check served in {}ms", start.elapsed().as_millis());
            match serde_json::to_value(&result) {
                Ok(body) => (StatusCode::OK, body),
                Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, error_body(e.to_string())),
            }
        }
        Err(notice) => (notice_status(notice), error_body(notice.message())),
    }
}

/// Inner state - current input, loading flag and displayed result.
pub async fn state_inner(state: &Arc<HttpState>) -> serde_json::Value {
    let app = state.app.lock().await;
    let s = app.state();
    serde_json::json!({
        "input": s.input,
        "charCount": s.char_count(),
        "loading": s.loading,
        "canSubmit": s.can_submit(),
        "result": s.result,
    })
}

/// Inner history - newest first.
pub async fn history_inner(state: &Arc<HttpState>) -> (StatusCode, serde_json::Value) {
    let app = state.app.lock().await;
    match serde_json::to_value(app.history()) {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, error_body(e.to_string())),
    }
}

/// Inner clear history - empties history and removes the storage slot.
pub async fn clear_history_inner(state: &Arc<HttpState>) -> (StatusCode, serde_json::Value) {
    let mut app = state.app.lock().await;
    match app.clear_history() {
        Ok(()) => (StatusCode::NO_CONTENT, serde_json::Value::Null),
        Err(e) => {
            tracing::error!("Failed to clear history: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, error_body(e.to_string()))
        }
    }
}

/// Inner health check.
pub async fn health_inner(state: &Arc<HttpState>) -> (StatusCode, serde_json::Value) {
    let app = state.app.lock().await;
    (
        StatusCode::OK,
        serde_json::json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "history_items": app.history().len(),
            "history_capacity": state.config.history.capacity,
            "loading": app.state().loading,
        }),
    )
}

/// Inner version - returns version info (pure, no IO).
pub fn version_inner() -> serde_json::Value {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "service": "veracity",
    })
}

/// Inner page - renders the HTML page for the current state.
pub async fn page_inner(state: &Arc<HttpState>, query: PageQuery) -> String {
    let app = state.app.lock().await;
    let notice = query.notice.as_deref().and_then(notice_from_code);
    render_page(&PageView {
        state: app.state(),
        history: app.history(),
        notice,
    })
}

fn back_to_page(notice: Option<Notice>) -> Redirect {
    match notice {
        Some(n) => Redirect::to(&format!("/?notice={}", notice_code(n))),
        None => Redirect::to("/"),
    }
}

// ============================================================================
// Axum handler wrappers (thin - delegate to inner functions)
// ============================================================================

pub async fn page_handler(
    State(state): State<Arc<HttpState>>,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    Html(page_inner(&state, query).await)
}

pub async fn form_check_handler(
    State(state): State<Arc<HttpState>>,
    Form(form): Form<CheckForm>,
) -> impl IntoResponse {
    back_to_page(run_check(&state, form.article).await.err())
}

pub async fn form_clear_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    state.app.lock().await.clear_input();
    back_to_page(None)
}

pub async fn form_clear_history_handler(
    State(state): State<Arc<HttpState>>,
) -> impl IntoResponse {
    let (status, _) = clear_history_inner(&state).await;
    if status.is_success() {
        back_to_page(None)
    } else {
        back_to_page(Some(Notice::CheckFailed))
    }
}

pub async fn check_handler(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<CheckRequest>,
) -> impl IntoResponse {
    let (status, body) = check_inner(&state, req).await;
    (status, Json(body))
}

pub async fn state_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    (StatusCode::OK, Json(state_inner(&state).await))
}

pub async fn history_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = history_inner(&state).await;
    (status, Json(body))
}

pub async fn clear_history_handler(State(state): State<Arc<HttpState>>) -> Response {
    let (status, body) = clear_history_inner(&state).await;
    if status == StatusCode::NO_CONTENT {
        status.into_response()
    } else {
        (status, Json(body)).into_response()
    }
}

pub async fn health_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = health_inner(&state).await;
    (status, Json(body))
}

pub async fn version_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(version_inner()))
}

// ============================================================================
// Unit Tests - call inner functions directly
// ============================================================================
