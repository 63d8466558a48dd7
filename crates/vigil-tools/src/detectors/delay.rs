//! Interview-flow delay detector.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use vigil_core::session::SessionContext;
use vigil_core::tools::{ToolDefinition, ToolParameterSchema, ToolReply};

use super::string_arg;
use crate::errors::ToolError;
use crate::traits::MonitorTool;

/// Fires when the conversation drifts from interview objectives; the
/// intervention tells the interviewing agent how to get back on track.
pub struct DetectInterviewDelay;

#[async_trait]
impl MonitorTool for DetectInterviewDelay {
    fn name(&self) -> &str {
        "detectInterviewDelay"
    }

    fn definition(&self) -> ToolDefinition {
        let mut props = Map::new();
        let _ = props.insert(
            "delay_type".into(),
            json!({
                "type": "string",
                "enum": [
                    "off_topic", "too_detailed", "repetitive",
                    "tangential", "time_consuming",
                ],
                "description": "Type of delay detected",
            }),
        );
        let _ = props.insert(
            "suggested_action".into(),
            json!({
                "type": "string",
                "enum": ["redirect", "summarize", "move_on", "refocus", "time_check"],
                "description": "Suggested action to get back on track",
            }),
        );
        ToolDefinition {
            name: self.name().into(),
            description: "Call when the conversation is getting off-track from interview \
                          objectives or taking too long on one topic"
                .into(),
            parameters: ToolParameterSchema::object(props, &["delay_type"]),
        }
    }

    async fn execute(
        &self,
        args: Value,
        _ctx: &mut SessionContext,
    ) -> Result<ToolReply, ToolError> {
        let delay_type = string_arg(&args, "delay_type", "off_topic");
        let suggested_action = string_arg(&args, "suggested_action", "refocus");

        let intervention = format!(
            "INTERVIEW FLOW ISSUE: {delay_type} detected.\n\
TAKE ACTION: {suggested_action}\n\
- If redirect: \"Let's focus on [next topic]\"\n\
- If summarize: \"To summarize what you've shared...\"\n\
- If move_on: \"That's great insight. Moving forward...\"\n\
- If refocus: \"Let's get back to discussing...\"\n\
- If time_check: \"We have limited time, so...\""
        );

        let mut data = Map::new();
        let _ = data.insert("delay_type".into(), json!(delay_type));
        let _ = data.insert("suggested_action".into(), json!(suggested_action));
        let _ = data.insert("intervention".into(), json!(intervention));
        let _ = data.insert("action".into(), json!("manage_interview_flow"));
        Ok(ToolReply::with_data(data))
    }
}
