//! # vigil-llm
//!
//! The Chat/Tool-Calling Provider boundary.
//!
//! Defines the [`ChatProvider`] trait the monitor orchestrator consumes —
//! one await-style `complete` call returning either free text or a list of
//! tool-call requests — plus an OpenAI-compatible HTTP implementation.
//! The core does not depend on which concrete provider serves this.

#![deny(unsafe_code)]

pub mod openai;
pub mod provider;

pub use openai::{OpenAiConfig, OpenAiProvider};
pub use provider::{
    ChatMessage, ChatProvider, ChatRequest, ChatResponse, ProviderError, ProviderResult,
    ToolCallRequest,
};
