//! `VigilServer` — Axum HTTP server over the monitor runtime.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use vigil_runtime::MonitorOrchestrator;

use crate::config::ServerConfig;
use crate::routes::{self, AppState};
use crate::shutdown::ShutdownCoordinator;

/// The vigil HTTP server.
pub struct VigilServer {
    config: ServerConfig,
    orchestrator: Arc<MonitorOrchestrator>,
    metrics: PrometheusHandle,
    shutdown: Arc<ShutdownCoordinator>,
    start_time: Instant,
}

impl VigilServer {
    /// Create a new server over an orchestrator and installed metrics handle.
    pub fn new(
        config: ServerConfig,
        orchestrator: Arc<MonitorOrchestrator>,
        metrics: PrometheusHandle,
    ) -> Self {
        Self {
            config,
            orchestrator,
            metrics,
            shutdown: Arc::new(ShutdownCoordinator::new()),
            start_time: Instant::now(),
        }
    }

    /// Build the Axum router with all routes and middleware.
    pub fn router(&self) -> Router {
        let state = AppState {
            orchestrator: Arc::clone(&self.orchestrator),
            metrics: self.metrics.clone(),
            start_time: self.start_time,
        };

        routes::router(state)
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.request_timeout_secs,
            )))
    }

    /// Bind and serve until the shutdown coordinator fires.
    pub async fn serve(&self) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.config.bind_addr()).await?;
        let addr = listener.local_addr()?;
        info!(%addr, "vigil server listening");

        let cancel = self.shutdown.token();
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move { cancel.cancelled().await })
            .await
    }

    /// Get the shutdown coordinator.
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.shutdown
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the orchestrator.
    pub fn orchestrator(&self) -> &Arc<MonitorOrchestrator> {
        &self.orchestrator
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::ServiceExt;
    use vigil_llm::{ChatProvider, ChatRequest, ChatResponse, ProviderResult};
    use vigil_runtime::SessionStore;
    use vigil_tools::{standard_registry, ProgressionConfig};

    use super::*;

    struct NullProvider;

    #[async_trait]
    impl ChatProvider for NullProvider {
        fn model(&self) -> &str {
            "null"
        }

        async fn complete(&self, _request: &ChatRequest) -> ProviderResult<ChatResponse> {
            Ok(ChatResponse {
                text: None,
                tool_calls: vec![],
            })
        }
    }

    fn make_server() -> VigilServer {
        let orchestrator = Arc::new(MonitorOrchestrator::new(
            Arc::new(SessionStore::new()),
            Arc::new(standard_registry(ProgressionConfig::default())),
            Arc::new(NullProvider),
        ));
        VigilServer::new(
            ServerConfig::default(),
            orchestrator,
            PrometheusBuilder::new().build_recorder().handle(),
        )
    }

    #[test]
    fn server_with_default_config() {
        let server = make_server();
        assert_eq!(server.config().host, "127.0.0.1");
        assert_eq!(server.config().port, 0);
    }

    #[test]
    fn shutdown_coordinator_accessible() {
        let server = make_server();
        assert!(!server.shutdown().is_shutting_down());
    }

    #[tokio::test]
    async fn health_endpoint_through_full_stack() {
        let server = make_server();
        let app = server.router();

        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert!(parsed.get("uptime_secs").is_some());
        assert!(parsed.get("active_sessions").is_some());
    }

    #[tokio::test]
    async fn serve_stops_on_shutdown() {
        let server = make_server();
        let shutdown = Arc::clone(server.shutdown());

        let task = tokio::spawn(async move { server.serve().await });
        // Give the listener a moment to bind.
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.shutdown();

        let result = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("server did not stop after shutdown")
            .unwrap();
        assert!(result.is_ok());
    }
}
