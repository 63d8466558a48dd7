//! # OpenAI-Compatible Provider
//!
//! [`ChatProvider`] implementation over the Chat Completions HTTP API.
//! Works against any OpenAI-compatible endpoint (the base URL is
//! configurable), sends tool schemas as `function` tools with
//! `tool_choice: "auto"`, and maps non-success statuses onto the
//! provider error taxonomy.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use vigil_core::metrics::{
    PROVIDER_ERRORS_TOTAL, PROVIDER_REQUESTS_TOTAL, PROVIDER_REQUEST_DURATION_MS,
};

use crate::provider::{
    ChatMessage, ChatProvider, ChatRequest, ChatResponse, ProviderError, ProviderResult,
    ToolCallRequest,
};

/// Default Chat Completions base URL.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Configuration for [`OpenAiProvider`].
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    /// API base URL, without the `/chat/completions` suffix.
    pub api_base: String,
    /// Bearer token.
    pub api_key: String,
    /// Model ID to request.
    pub model: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl OpenAiConfig {
    /// Config against the public OpenAI endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            api_key: api_key.into(),
            model: model.into(),
            request_timeout_secs: 30,
        }
    }
}

/// OpenAI-compatible Chat Completions provider.
#[derive(Debug)]
pub struct OpenAiProvider {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Build a provider with a dedicated HTTP client.
    ///
    /// The request timeout is enforced by the client; a timed-out call
    /// surfaces as a retryable [`ProviderError::Http`].
    pub fn new(config: OpenAiConfig) -> ProviderResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'))
    }

    fn build_body(&self, request: &ChatRequest) -> Value {
        let mut messages: Vec<Value> = Vec::with_capacity(request.messages.len() + 1);
        messages.push(serde_json::json!({
            "role": "system",
            "content": request.system_prompt,
        }));
        for msg in &request.messages {
            messages.push(wire_message(msg));
        }

        let mut body = serde_json::json!({
            "model": self.config.model,
            "messages": messages,
        });
        if !request.tools.is_empty() {
            let tools: Vec<Value> = request
                .tools
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.parameters,
                        },
                    })
                })
                .collect();
            body["tools"] = Value::Array(tools);
            body["tool_choice"] = Value::String("auto".into());
        }
        body
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: &ChatRequest) -> ProviderResult<ChatResponse> {
        let started = Instant::now();
        metrics::counter!(PROVIDER_REQUESTS_TOTAL).increment(1);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&self.build_body(request))
            .send()
            .await
            .inspect_err(|e| {
                metrics::counter!(PROVIDER_ERRORS_TOTAL, "category" => "network").increment(1);
                warn!(error = %e, "provider request failed");
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = extract_error_message(&response.text().await.unwrap_or_default());
            let err = if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN
            {
                ProviderError::Auth { message }
            } else {
                ProviderError::Api {
                    status: status.as_u16(),
                    message,
                }
            };
            metrics::counter!(PROVIDER_ERRORS_TOTAL, "category" => err.category())
                .increment(1);
            warn!(status = status.as_u16(), error = %err, "provider returned error status");
            return Err(err);
        }

        let completion: CompletionResponse = response.json().await?;
        let parsed = parse_completion(completion)?;

        metrics::histogram!(PROVIDER_REQUEST_DURATION_MS)
            .record(duration_ms(started.elapsed()));
        debug!(
            model = %self.config.model,
            tool_calls = parsed.tool_calls.len(),
            has_text = parsed.text.is_some(),
            "provider completion received"
        );
        Ok(parsed)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: WireAssistantMessage,
}

#[derive(Debug, Deserialize)]
struct WireAssistantMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    id: String,
    function: WireFunction,
}

#[derive(Debug, Deserialize)]
struct WireFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Serialize)]
struct WireOutgoingToolCall<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    call_type: &'static str,
    function: WireOutgoingFunction<'a>,
}

#[derive(Debug, Serialize)]
struct WireOutgoingFunction<'a> {
    name: &'a str,
    arguments: &'a str,
}

fn wire_message(msg: &ChatMessage) -> Value {
    match msg {
        ChatMessage::User { content } => serde_json::json!({
            "role": "user",
            "content": content,
        }),
        ChatMessage::Assistant {
            content,
            tool_calls,
        } => {
            let mut body = serde_json::json!({
                "role": "assistant",
                "content": content,
            });
            if !tool_calls.is_empty() {
                let calls: Vec<WireOutgoingToolCall<'_>> = tool_calls
                    .iter()
                    .map(|c| WireOutgoingToolCall {
                        id: &c.id,
                        call_type: "function",
                        function: WireOutgoingFunction {
                            name: &c.name,
                            arguments: &c.arguments,
                        },
                    })
                    .collect();
                body["tool_calls"] = serde_json::to_value(calls).unwrap_or(Value::Null);
            }
            body
        }
        ChatMessage::Tool {
            tool_call_id,
            content,
        } => serde_json::json!({
            "role": "tool",
            "tool_call_id": tool_call_id,
            "content": content,
        }),
    }
}

fn parse_completion(completion: CompletionResponse) -> ProviderResult<ChatResponse> {
    let choice = completion
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::MalformedResponse {
            message: "response had no choices".into(),
        })?;
    Ok(ChatResponse {
        text: choice.message.content,
        tool_calls: choice
            .message
            .tool_calls
            .into_iter()
            .map(|c| ToolCallRequest {
                id: c.id,
                name: c.function.name,
                arguments: c.function.arguments,
            })
            .collect(),
    })
}

/// Pull the `error.message` field out of an error body, falling back to the
/// raw text.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(ToOwned::to_owned)
        })
        .unwrap_or_else(|| {
            if body.is_empty() {
                "no body".into()
            } else {
                body.chars().take(256).collect()
            }
        })
}

#[allow(clippy::cast_precision_loss)]
fn duration_ms(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
