//! # vigil-runtime
//!
//! The monitor runtime: session storage, conversation buffering, the
//! analyze/dispatch/synthesize orchestration cycle, and the transcript
//! ingest task.
//!
//! Layering:
//! - [`SessionStore`] owns per-session state behind per-session mutexes.
//! - [`ConversationBuffer`] pairs raw utterances into analyzable batches.
//! - [`MonitorOrchestrator`] runs the monitor cycle over a batch.
//! - [`spawn_ingest`] wires transport-delivered utterances into the above.

#![deny(unsafe_code)]

pub mod buffer;
pub mod errors;
pub mod ingest;
pub mod monitor;
pub mod store;

pub use buffer::ConversationBuffer;
pub use errors::{Result, RuntimeError};
pub use ingest::{spawn_ingest, Utterance};
pub use monitor::{MonitorOrchestrator, MonitorOutcome, ToolDispatch};
pub use store::{SessionHandle, SessionStore};
