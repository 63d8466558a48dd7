//! # vigil
//!
//! Interview monitor server binary — wires settings, tools, the provider,
//! and the HTTP server together.

#![deny(unsafe_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use vigil_core::interview::JobData;
use vigil_llm::{ChatProvider, OpenAiConfig, OpenAiProvider};
use vigil_runtime::{spawn_ingest, ConversationBuffer, MonitorOrchestrator, SessionStore};
use vigil_server::{metrics, ServerConfig, VigilServer};
use vigil_settings::{load_settings, VigilSettings};
use vigil_tools::{standard_registry, ProgressionConfig};

/// Vigil interview monitor server.
#[derive(Parser, Debug)]
#[command(name = "vigil", about = "Interview monitor server")]
struct Cli {
    /// Host to bind (overrides settings).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides settings; 0 for auto-assign).
    #[arg(long)]
    port: Option<u16>,

    /// Path to a JSON settings file.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Path to a JSON job description (question bank + intents).
    #[arg(long)]
    job_data: Option<PathBuf>,

    /// Minimum log level when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Initialize the global tracing subscriber with stderr output.
///
/// Call once at startup. `RUST_LOG` takes priority over `level`.
fn init_subscriber(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    let _ = subscriber.try_init();
}

fn load_job_data(path: &Path) -> Result<JobData> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read job data: {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid job data JSON: {}", path.display()))
}

fn build_provider(settings: &VigilSettings) -> Result<OpenAiProvider> {
    let provider = &settings.provider;
    let api_key = std::env::var(&provider.api_key_env)
        .with_context(|| format!("API key env var {} is not set", provider.api_key_env))?;
    let config = OpenAiConfig {
        api_base: provider.api_base.clone(),
        api_key,
        model: provider.model.clone(),
        request_timeout_secs: provider.request_timeout_secs,
    };
    OpenAiProvider::new(config).context("failed to build provider client")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_subscriber(&args.log_level);

    let settings = load_settings(args.settings.as_deref()).context("failed to load settings")?;
    if vigil_settings::init_settings(settings.clone()).is_err() {
        tracing::warn!("settings already initialized, using existing values");
    }

    let metrics_handle = metrics::install_recorder();

    let provider: Arc<dyn ChatProvider> = Arc::new(build_provider(&settings)?);
    tracing::info!(model = %settings.provider.model, "provider configured");

    let registry = standard_registry(ProgressionConfig {
        max_questions: settings.monitor.max_questions,
        min_advance_score: settings.monitor.min_advance_score,
    });
    registry.set_enabled(settings.tools.enabled.iter().cloned());
    tracing::info!(enabled = ?registry.enabled_names(), "tool registry ready");

    let store = match &args.job_data {
        Some(path) => {
            let job = load_job_data(path)?;
            tracing::info!(
                path = %path.display(),
                questions = job.questions.len(),
                intents = job.intents.len(),
                "job data loaded"
            );
            SessionStore::with_job_data(Arc::new(job))
        }
        None => SessionStore::new(),
    };

    let orchestrator = Arc::new(MonitorOrchestrator::new(
        Arc::new(store),
        Arc::new(registry),
        provider,
    ));

    let mut config = ServerConfig::from(&settings.server);
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let server = VigilServer::new(config, Arc::clone(&orchestrator), metrics_handle);

    // Utterance ingest for a realtime transport. HTTP batches bypass the
    // buffer; the sender stays open so a transport can be attached without
    // restarting the loop.
    let buffer = Arc::new(ConversationBuffer::new(settings.monitor.min_message_chars));
    let (_ingest_tx, ingest_rx) = mpsc::channel(256);
    let ingest_handle = spawn_ingest(
        buffer,
        Arc::clone(&orchestrator),
        ingest_rx,
        Duration::from_millis(settings.monitor.flush_interval_ms),
        server.shutdown().token(),
    );

    let shutdown = Arc::clone(server.shutdown());
    let _signal = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            shutdown.shutdown();
        }
    });

    server.serve().await.context("server error")?;

    server
        .shutdown()
        .graceful_shutdown(vec![ingest_handle], None)
        .await;
    tracing::info!("shutdown complete");
    Ok(())
}
