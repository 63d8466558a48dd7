//! # vigil-core
//!
//! Foundation types for the vigil interview monitor.
//!
//! This crate provides the shared vocabulary that all other vigil crates
//! depend on:
//!
//! - **Transcript**: `Speaker`, `TranscriptEntry`, `BatchMessage`
//! - **Interview data**: `JobData` question bank and intents, `EvaluationResult`
//! - **Tool vocabulary**: `ToolDefinition` schemas, `ToolReply` results
//! - **Session state**: `SessionContext` with the running interview trackers

#![deny(unsafe_code)]

pub mod interview;
pub mod metrics;
pub mod session;
pub mod tools;
pub mod transcript;

pub use interview::{EvaluationResult, IntentScore, JobData, JobIntent, JobQuestion};
pub use session::{ContextUpdate, InterviewSnapshot, SessionContext};
pub use tools::{NextAction, ToolDefinition, ToolParameterSchema, ToolReply};
pub use transcript::{BatchMessage, Speaker, TranscriptEntry};
