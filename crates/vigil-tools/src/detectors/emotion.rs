//! Strong-emotion detector.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use vigil_core::session::SessionContext;
use vigil_core::tools::{ToolDefinition, ToolParameterSchema, ToolReply};

use super::string_arg;
use crate::errors::ToolError;
use crate::traits::MonitorTool;

/// Fires on strong emotional signals; the intervention tells the interviewing
/// agent how to adjust tone.
pub struct DetectEmotion;

#[async_trait]
impl MonitorTool for DetectEmotion {
    fn name(&self) -> &str {
        "detectEmotion"
    }

    fn definition(&self) -> ToolDefinition {
        let mut props = Map::new();
        let _ = props.insert(
            "emotion".into(),
            json!({
                "type": "string",
                "enum": [
                    "happy", "sad", "angry", "excited", "nervous",
                    "confident", "frustrated", "anxious", "surprised",
                    "disappointed",
                ],
                "description": "The primary emotion detected",
            }),
        );
        let _ = props.insert(
            "intensity".into(),
            json!({
                "type": "number",
                "minimum": 1,
                "maximum": 10,
                "description": "Intensity of the emotion on a scale of 1-10",
            }),
        );
        let _ = props.insert(
            "context".into(),
            json!({
                "type": "string",
                "description": "What triggered this emotional response",
            }),
        );
        ToolDefinition {
            name: self.name().into(),
            description: "Call when strong emotions are detected in the conversation \
                          (excitement, frustration, nervousness, anger, joy, etc.)"
                .into(),
            parameters: ToolParameterSchema::object(props, &["emotion", "intensity"]),
        }
    }

    async fn execute(
        &self,
        args: Value,
        _ctx: &mut SessionContext,
    ) -> Result<ToolReply, ToolError> {
        let emotion = string_arg(&args, "emotion", "unknown");
        let intensity = args.get("intensity").and_then(Value::as_f64).unwrap_or(0.0);

        let intervention = format!(
            "EMOTION DETECTED: {emotion} (intensity: {intensity}/10).\n\
ADJUST your approach:\n\
- If intensity > 7: Be more supportive and empathetic\n\
- If negative emotion: Acknowledge their feelings before continuing\n\
- If positive emotion: Match their energy level appropriately"
        );

        let mut data = Map::new();
        let _ = data.insert("emotion".into(), json!(emotion));
        let _ = data.insert("intensity".into(), json!(intensity));
        let _ = data.insert("intervention".into(), json!(intervention));
        let _ = data.insert("action".into(), json!("adjust_tone"));
        Ok(ToolReply::with_data(data))
    }
}
