//! # vigil-server
//!
//! HTTP surface for the interview monitor:
//! - batch submission and tool configuration under `/api/monitor/*`
//! - progression snapshots under `/api/sessions/{id}/state`
//! - `/health` and `/metrics` for operations
//!
//! The server is a thin layer: validation and wire shapes live here, all
//! monitor semantics live in `vigil-runtime`.

#![deny(unsafe_code)]

pub mod config;
pub mod health;
pub mod metrics;
pub mod routes;
pub mod server;
pub mod shutdown;

pub use config::ServerConfig;
pub use health::HealthResponse;
pub use routes::AppState;
pub use server::VigilServer;
pub use shutdown::ShutdownCoordinator;
