//! # Provider Trait
//!
//! Core abstraction for chat/tool-calling backends. The monitor orchestrator
//! builds a [`ChatRequest`] (system prompt + messages + enabled tool schemas)
//! and receives a [`ChatResponse`] carrying either free text, tool-call
//! requests, or both. Await-once request/response: no streaming, no
//! caller-visible cancellation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vigil_core::tools::ToolDefinition;

/// Result type alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur during provider operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed (includes client-side timeouts).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Authentication failed (invalid or missing key).
    #[error("Auth error: {message}")]
    Auth {
        /// Error description.
        message: String,
    },

    /// Provider returned an API error.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },

    /// Provider returned a response the client could not interpret.
    #[error("Malformed response: {message}")]
    MalformedResponse {
        /// Error description.
        message: String,
    },

    /// Provider-specific error.
    #[error("{message}")]
    Other {
        /// Error description.
        message: String,
    },
}

impl ProviderError {
    /// Whether this error is retryable on a later cycle.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status().is_some_and(|s| {
                        s == reqwest::StatusCode::TOO_MANY_REQUESTS || s.is_server_error()
                    })
            }
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Json(_) | Self::Auth { .. } | Self::MalformedResponse { .. } | Self::Other { .. } => {
                false
            }
        }
    }

    /// Error category string for logging and metrics labels.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Http(_) => "network",
            Self::Json(_) | Self::MalformedResponse { .. } => "parse",
            Self::Auth { .. } => "auth",
            Self::Api { .. } => "api",
            Self::Other { .. } => "unknown",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request / response types
// ─────────────────────────────────────────────────────────────────────────────

/// A structured tool-call request emitted by the model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Provider-assigned call ID, echoed back in the tool response message.
    pub id: String,
    /// Tool name the model wants to invoke.
    pub name: String,
    /// Raw JSON argument string. Parsed at dispatch time; a parse failure
    /// fails closed into a tool-error result, never aborts the cycle.
    pub arguments: String,
}

/// A conversation message on the provider wire (discriminated by `role`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ChatMessage {
    /// User-side content (the rendered conversation excerpt).
    User {
        /// Message text.
        content: String,
    },
    /// A prior assistant turn, possibly carrying tool calls.
    Assistant {
        /// Assistant text, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        /// Tool calls issued in that turn.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCallRequest>,
    },
    /// A tool execution result fed back to the model.
    Tool {
        /// ID of the call this result answers.
        tool_call_id: String,
        /// Serialized tool reply payload.
        content: String,
    },
}

impl ChatMessage {
    /// Create a user message.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::User {
            content: text.into(),
        }
    }

    /// Create a tool response message.
    #[must_use]
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Tool {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
        }
    }
}

/// Full request for one provider completion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// System prompt for this completion.
    pub system_prompt: String,
    /// Conversation messages.
    pub messages: Vec<ChatMessage>,
    /// Tool schemas the model is allowed to call this turn.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

/// Provider response: free text, tool calls, or both.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Assistant text, if any.
    pub text: Option<String>,
    /// Tool-call requests in the order the model issued them.
    pub tool_calls: Vec<ToolCallRequest>,
}

impl ChatResponse {
    /// Whether the response carries any tool calls.
    #[must_use]
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Non-empty text content, if present.
    #[must_use]
    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Provider trait
// ─────────────────────────────────────────────────────────────────────────────

/// Core chat/tool-calling provider trait.
///
/// Implementors must be `Send + Sync` for use across async tasks. `complete`
/// is the orchestrator's only suspension point; a request runs to completion
/// or failure before the next batch for that session is considered.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Current model ID (e.g. `"gpt-4.1-nano"`).
    fn model(&self) -> &str;

    /// Issue one completion.
    async fn complete(&self, request: &ChatRequest) -> ProviderResult<ChatResponse>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_without_tool_calls() {
        let resp = ChatResponse {
            text: Some("No intervention needed.".into()),
            tool_calls: vec![],
        };
        assert!(!resp.has_tool_calls());
        assert_eq!(resp.text_content(), Some("No intervention needed."));
    }

    #[test]
    fn blank_text_is_not_content() {
        let resp = ChatResponse {
            text: Some("   ".into()),
            tool_calls: vec![],
        };
        assert!(resp.text_content().is_none());
    }

    #[test]
    fn response_with_tool_calls() {
        let resp = ChatResponse {
            text: None,
            tool_calls: vec![ToolCallRequest {
                id: "call-1".into(),
                name: "detectAnimal".into(),
                arguments: r#"{"animal":"cat"}"#.into(),
            }],
        };
        assert!(resp.has_tool_calls());
    }

    #[test]
    fn chat_message_serde_roles() {
        let user = ChatMessage::user("hello");
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["role"], "user");

        let tool = ChatMessage::tool("call-1", "{}");
        let json = serde_json::to_value(&tool).unwrap();
        assert_eq!(json["role"], "tool");
        assert_eq!(json["tool_call_id"], "call-1");
    }

    #[test]
    fn assistant_message_omits_empty_tool_calls() {
        let msg = ChatMessage::Assistant {
            content: Some("hi".into()),
            tool_calls: vec![],
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json.get("tool_calls").is_none());
    }

    #[test]
    fn api_error_retryable_classes() {
        let server = ProviderError::Api {
            status: 503,
            message: "overloaded".into(),
        };
        assert!(server.is_retryable());

        let client = ProviderError::Api {
            status: 400,
            message: "bad request".into(),
        };
        assert!(!client.is_retryable());
    }

    #[test]
    fn error_categories() {
        assert_eq!(
            ProviderError::Auth {
                message: "no key".into()
            }
            .category(),
            "auth"
        );
        assert_eq!(
            ProviderError::MalformedResponse {
                message: "no choices".into()
            }
            .category(),
            "parse"
        );
        assert_eq!(
            ProviderError::Api {
                status: 500,
                message: "boom".into()
            }
            .category(),
            "api"
        );
    }

    #[test]
    fn request_serde_roundtrip() {
        let req = ChatRequest {
            system_prompt: "You are a monitor.".into(),
            messages: vec![ChatMessage::user("user: hi")],
            tools: vec![],
        };
        let json = serde_json::to_string(&req).unwrap();
        let back: ChatRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req, back);
    }
}
