//! HTTP route handlers for the monitor API.
//!
//! Surface:
//! - `POST /api/monitor/batch` — run one monitor cycle over a message batch.
//! - `POST /api/monitor/tools` — replace the enabled tool set.
//! - `GET /api/sessions/{id}/state` — interview progression snapshot.
//! - `GET /health` — liveness plus session count.
//! - `GET /metrics` — Prometheus text exposition.
//!
//! Request validation happens before any session state is touched, so a
//! rejected batch never creates a session.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};
use vigil_core::transcript::{BatchMessage, Speaker};
use vigil_runtime::{MonitorOrchestrator, RuntimeError};

use crate::health::{self, HealthResponse};
use crate::metrics;

// ─────────────────────────────────────────────────────────────────────────────
// State
// ─────────────────────────────────────────────────────────────────────────────

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Orchestrator driving monitor cycles; owns the store and registry.
    pub orchestrator: Arc<MonitorOrchestrator>,
    /// Handle rendering the `/metrics` exposition.
    pub metrics: PrometheusHandle,
    /// When the server started.
    pub start_time: Instant,
}

/// Build the API router over shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/monitor/batch", post(submit_batch))
        .route("/api/monitor/tools", post(configure_tools))
        .route("/api/sessions/{id}/state", get(session_state))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// API-level error carrying the response status.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<RuntimeError> for ApiError {
    fn from(e: RuntimeError) -> Self {
        let status = match &e {
            RuntimeError::SessionNotFound { .. } => StatusCode::NOT_FOUND,
            RuntimeError::Provider(_) => StatusCode::BAD_GATEWAY,
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

/// One turn as submitted over the wire. `timestamp` is epoch milliseconds
/// and defaults to receipt time.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomingMessage {
    role: Speaker,
    content: String,
    #[serde(default)]
    timestamp: Option<i64>,
}

/// Body of `POST /api/monitor/batch`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchRequest {
    #[serde(default)]
    session_id: String,
    #[serde(default)]
    messages: Vec<IncomingMessage>,
}

/// Response of `POST /api/monitor/batch`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchResponse {
    instruction: String,
    session_id: String,
}

/// Body and response of `POST /api/monitor/tools`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToolsRequest {
    enabled_tools: Vec<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /api/monitor/batch
async fn submit_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, ApiError> {
    if req.session_id.trim().is_empty() {
        return Err(ApiError::bad_request("sessionId is required"));
    }
    if req.messages.is_empty() {
        return Err(ApiError::bad_request("messages must not be empty"));
    }

    let batch: Vec<BatchMessage> = req
        .messages
        .into_iter()
        .map(|m| match m.timestamp {
            Some(timestamp_ms) => BatchMessage {
                role: m.role,
                content: m.content,
                timestamp_ms,
            },
            None => BatchMessage::new(m.role, m.content),
        })
        .collect();

    debug!(session_id = %req.session_id, batch_len = batch.len(), "batch submitted");
    let outcome = state
        .orchestrator
        .process_batch(&req.session_id, batch)
        .await?;

    Ok(Json(BatchResponse {
        instruction: outcome.instruction,
        session_id: outcome.session_id,
    }))
}

/// POST /api/monitor/tools
async fn configure_tools(
    State(state): State<AppState>,
    Json(req): Json<ToolsRequest>,
) -> Json<ToolsRequest> {
    info!(enabled = ?req.enabled_tools, "enabled tool set replaced via API");
    state
        .orchestrator
        .registry()
        .set_enabled(req.enabled_tools.iter().cloned());
    Json(req)
}

/// GET /api/sessions/{id}/state
async fn session_state(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let snapshot = state.orchestrator.store().snapshot(&id).await?;
    Ok(Json(snapshot).into_response())
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let active_sessions = state.orchestrator.store().len();
    Json(health::health_check(state.start_time, active_sessions))
}

/// GET /metrics
async fn metrics_handler(State(state): State<AppState>) -> String {
    metrics::render(&state.metrics)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::ServiceExt;
    use vigil_llm::{ChatProvider, ChatRequest, ChatResponse, ProviderError, ProviderResult};
    use vigil_tools::{standard_registry, ProgressionConfig, ToolRegistry};

    use super::*;
    use vigil_runtime::SessionStore;

    /// Provider that always replies with fixed text.
    struct FixedProvider(&'static str);

    #[async_trait]
    impl ChatProvider for FixedProvider {
        fn model(&self) -> &str {
            "fixed"
        }

        async fn complete(&self, _request: &ChatRequest) -> ProviderResult<ChatResponse> {
            Ok(ChatResponse {
                text: Some(self.0.to_owned()),
                tool_calls: vec![],
            })
        }
    }

    /// Provider that always fails.
    struct FailingProvider;

    #[async_trait]
    impl ChatProvider for FailingProvider {
        fn model(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _request: &ChatRequest) -> ProviderResult<ChatResponse> {
            Err(ProviderError::Other {
                message: "connection reset".into(),
            })
        }
    }

    fn app_with(provider: Arc<dyn ChatProvider>, enabled: &[&str]) -> (Router, AppState) {
        let registry: ToolRegistry = standard_registry(ProgressionConfig::default());
        registry.set_enabled(enabled.iter().copied());
        let orchestrator = Arc::new(MonitorOrchestrator::new(
            Arc::new(SessionStore::new()),
            Arc::new(registry),
            provider,
        ));
        let state = AppState {
            orchestrator,
            metrics: PrometheusBuilder::new().build_recorder().handle(),
            start_time: Instant::now(),
        };
        (router(state.clone()), state)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn batch_requires_session_id() {
        let (app, state) = app_with(Arc::new(FixedProvider("ok")), &[]);
        let req = post_json(
            "/api/monitor/batch",
            json!({"sessionId": "  ", "messages": [{"role": "user", "content": "hi"}]}),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        // Rejected before any session state was touched.
        assert!(state.orchestrator.store().is_empty());
    }

    #[tokio::test]
    async fn batch_requires_messages() {
        let (app, state) = app_with(Arc::new(FixedProvider("ok")), &[]);
        let req = post_json(
            "/api/monitor/batch",
            json!({"sessionId": "s1", "messages": []}),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(state.orchestrator.store().is_empty());
        let body = body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("messages"));
    }

    #[tokio::test]
    async fn batch_returns_instruction_and_echoes_session() {
        // No tools enabled: the cycle short-circuits with the default
        // instruction and never calls the provider.
        let (app, state) = app_with(Arc::new(FailingProvider), &[]);
        let req = post_json(
            "/api/monitor/batch",
            json!({
                "sessionId": "s1",
                "messages": [
                    {"role": "user", "content": "I saw a falcon today"},
                    {"role": "assistant", "content": "Tell me about your last project"}
                ]
            }),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["instruction"], "No intervention needed.");
        assert_eq!(body["sessionId"], "s1");

        let session = state.orchestrator.store().get("s1").unwrap();
        assert_eq!(session.lock().await.conversation_history.len(), 2);
    }

    #[tokio::test]
    async fn batch_accepts_explicit_timestamps() {
        let (app, state) = app_with(Arc::new(FixedProvider("ok")), &[]);
        let req = post_json(
            "/api/monitor/batch",
            json!({
                "sessionId": "s1",
                "messages": [{"role": "user", "content": "hello", "timestamp": 1_700_000_000_000_i64}]
            }),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let session = state.orchestrator.store().get("s1").unwrap();
        let ctx = session.lock().await;
        assert_eq!(ctx.conversation_history[0].timestamp_ms, 1_700_000_000_000);
    }

    #[tokio::test]
    async fn provider_failure_maps_to_bad_gateway() {
        let (app, _state) = app_with(Arc::new(FailingProvider), &["detectAnimal"]);
        let req = post_json(
            "/api/monitor/batch",
            json!({
                "sessionId": "s1",
                "messages": [{"role": "user", "content": "I saw a falcon today"}]
            }),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(resp).await;
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn tools_endpoint_replaces_enabled_set() {
        let (app, state) = app_with(Arc::new(FixedProvider("ok")), &[]);
        let req = post_json(
            "/api/monitor/tools",
            json!({"enabledTools": ["detectAnimal", "detectEmotion"]}),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["enabledTools"], json!(["detectAnimal", "detectEmotion"]));
        assert_eq!(
            state.orchestrator.registry().enabled_names(),
            vec!["detectAnimal", "detectEmotion"]
        );
    }

    #[tokio::test]
    async fn tools_endpoint_accepts_unknown_names() {
        let (app, state) = app_with(Arc::new(FixedProvider("ok")), &[]);
        let req = post_json("/api/monitor/tools", json!({"enabledTools": ["notATool"]}));
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(state.orchestrator.registry().enabled_names().is_empty());
    }

    #[tokio::test]
    async fn session_state_unknown_session_is_404() {
        let (app, _state) = app_with(Arc::new(FixedProvider("ok")), &[]);
        let req = Request::builder()
            .uri("/api/sessions/nope/state")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn session_state_returns_snapshot() {
        let (app, _state) = app_with(Arc::new(FixedProvider("ok")), &[]);
        let batch = post_json(
            "/api/monitor/batch",
            json!({
                "sessionId": "s1",
                "messages": [{"role": "user", "content": "hello there"}]
            }),
        );
        let resp = app.clone().oneshot(batch).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let req = Request::builder()
            .uri("/api/sessions/s1/state")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["sessionId"], "s1");
        assert_eq!(body["turn"], 0);
        assert_eq!(body["concluded"], false);
        assert_eq!(body["evaluationCount"], 0);
    }

    #[tokio::test]
    async fn health_reports_session_count() {
        let (app, state) = app_with(Arc::new(FixedProvider("ok")), &[]);
        let _ = state.orchestrator.store().get_or_initialize("s1");

        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["active_sessions"], 1);
    }

    #[tokio::test]
    async fn metrics_endpoint_renders_text() {
        let (app, _state) = app_with(Arc::new(FixedProvider("ok")), &[]);
        let req = Request::builder()
            .uri("/metrics")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let (app, _state) = app_with(Arc::new(FixedProvider("ok")), &[]);
        let req = Request::builder()
            .uri("/nonexistent")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
