//! Tool definition and reply types.
//!
//! `ToolDefinition` is the schema the monitor model sees; `ToolReply` is what
//! a handler returns. Replies are plain data — tool failures (unknown name,
//! bad arguments, validation rejection) are carried as `success: false`
//! results and fed back to the model, never raised as process faults.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ─────────────────────────────────────────────────────────────────────────────
// Tool schema
// ─────────────────────────────────────────────────────────────────────────────

/// JSON Schema-compatible parameter definition for a tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolParameterSchema {
    /// Top-level JSON Schema type.
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Property definitions (when type is `object`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
    /// Required property names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Description of the schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Catch-all for additional JSON Schema properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ToolParameterSchema {
    /// An `object` schema with the given properties and required names.
    #[must_use]
    pub fn object(properties: Map<String, Value>, required: &[&str]) -> Self {
        Self {
            schema_type: "object".into(),
            properties: Some(properties),
            required: if required.is_empty() {
                None
            } else {
                Some(required.iter().map(|s| (*s).to_owned()).collect())
            },
            description: None,
            extra: Map::new(),
        }
    }
}

/// A tool definition sent to the monitor model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (unique identifier).
    pub name: String,
    /// Human-readable description — the model's trigger condition.
    pub description: String,
    /// JSON Schema for the tool's parameters.
    pub parameters: ToolParameterSchema,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tool reply
// ─────────────────────────────────────────────────────────────────────────────

/// Guidance for what the orchestrator should do after a tool executes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    /// Fetch and pose the next question.
    AskNextQuestion,
    /// Wrap up the interview.
    Conclude,
    /// Wait for the candidate's next utterance.
    WaitForUser,
    /// Hand off to another interview phase agent.
    TransferAgent,
}

/// Result of a tool execution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolReply {
    /// Whether the tool action succeeded.
    pub success: bool,
    /// Free-form payload consumed by the model and the dashboard.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
    /// Error description, present iff `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Routing hint for the orchestrator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_action: Option<NextAction>,
    /// A system message the tool dictates for the interviewing agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_instruction: Option<String>,
}

impl ToolReply {
    /// A successful reply with no payload.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            success: true,
            data: Map::new(),
            error: None,
            next_action: None,
            agent_instruction: None,
        }
    }

    /// A successful reply carrying a payload.
    #[must_use]
    pub fn with_data(data: Map<String, Value>) -> Self {
        Self {
            success: true,
            data,
            error: None,
            next_action: None,
            agent_instruction: None,
        }
    }

    /// A failure reply with an error description.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Map::new(),
            error: Some(message.into()),
            next_action: None,
            agent_instruction: None,
        }
    }

    /// Set the orchestrator routing hint.
    #[must_use]
    pub fn next_action(mut self, action: NextAction) -> Self {
        self.next_action = Some(action);
        self
    }

    /// The intervention instruction embedded in `data`, if any.
    ///
    /// Only non-empty strings count; interventions from failed replies are
    /// ignored by callers.
    #[must_use]
    pub fn intervention(&self) -> Option<&str> {
        self.data
            .get("intervention")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Render the reply body the model sees as a tool response.
    #[must_use]
    pub fn to_model_payload(&self) -> String {
        if self.success {
            serde_json::to_string(&Value::Object(self.data.clone()))
                .unwrap_or_else(|_| "{}".into())
        } else {
            serde_json::to_string(&serde_json::json!({
                "error": self.error.as_deref().unwrap_or("tool failed"),
            }))
            .unwrap_or_else(|_| "{}".into())
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
