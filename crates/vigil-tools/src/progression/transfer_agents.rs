//! Interview handoff to the next phase agent.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::info;
use vigil_core::session::SessionContext;
use vigil_core::tools::{NextAction, ToolDefinition, ToolParameterSchema, ToolReply};

use crate::errors::ToolError;
use crate::traits::MonitorTool;

/// Concludes the interview and reports the destination agent.
///
/// Requires a `conversation_context` carrying a numeric `overall_score`; an
/// incomplete context is a recoverable failure that leaves `concluded`
/// untouched.
pub struct TransferAgents;

#[async_trait]
impl MonitorTool for TransferAgents {
    fn name(&self) -> &str {
        "transferAgents"
    }

    fn definition(&self) -> ToolDefinition {
        let mut props = Map::new();
        let _ = props.insert(
            "destination_agent".into(),
            json!({
                "type": "string",
                "description": "Name of the agent taking over the conversation",
            }),
        );
        let _ = props.insert(
            "rationale_for_transfer".into(),
            json!({
                "type": "string",
                "description": "Why the interview is being handed off",
            }),
        );
        let _ = props.insert(
            "conversation_context".into(),
            json!({
                "type": "object",
                "properties": {
                    "overall_score": {
                        "type": "number",
                        "description": "Final overall score for the interview",
                    },
                },
                "required": ["overall_score"],
                "description": "Summary context handed to the destination agent",
            }),
        );
        ToolDefinition {
            name: self.name().into(),
            description: "Conclude the current interview phase and transfer the candidate \
                          to the destination agent"
                .into(),
            parameters: ToolParameterSchema::object(
                props,
                &["destination_agent", "rationale_for_transfer", "conversation_context"],
            ),
        }
    }

    async fn execute(
        &self,
        args: Value,
        ctx: &mut SessionContext,
    ) -> Result<ToolReply, ToolError> {
        let overall_score = args
            .get("conversation_context")
            .and_then(|c| c.get("overall_score"))
            .and_then(Value::as_f64);
        let Some(overall_score) = overall_score else {
            return Ok(ToolReply::failure(
                "conversation_context.overall_score must be a number. Resubmit the \
                 transfer with the complete conversation context.",
            ));
        };

        let destination = args
            .get("destination_agent")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_owned();

        ctx.concluded = true;
        info!(
            session_id = %ctx.session_id,
            destination = %destination,
            overall_score,
            "interview concluded, transferring"
        );

        let mut data = Map::new();
        let _ = data.insert("transferred".into(), json!(true));
        let _ = data.insert("destination".into(), json!(destination));
        let _ = data.insert("overall_score".into(), json!(overall_score));
        Ok(ToolReply::with_data(data).next_action(NextAction::TransferAgent))
    }
}
