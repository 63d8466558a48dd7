//! Personal-information detector.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use vigil_core::session::SessionContext;
use vigil_core::tools::{ToolDefinition, ToolParameterSchema, ToolReply};

use super::string_arg;
use crate::errors::ToolError;
use crate::traits::MonitorTool;

/// Fires when the candidate shares personal information; the intervention
/// tells the interviewing agent how to hold professional boundaries.
pub struct DetectPersonalInfo;

#[async_trait]
impl MonitorTool for DetectPersonalInfo {
    fn name(&self) -> &str {
        "detectPersonalInfo"
    }

    fn definition(&self) -> ToolDefinition {
        let mut props = Map::new();
        let _ = props.insert(
            "info_type".into(),
            json!({
                "type": "string",
                "enum": [
                    "family", "relationship", "achievement", "struggle",
                    "hobby", "background", "other",
                ],
                "description": "Type of personal information shared",
            }),
        );
        let _ = props.insert(
            "sensitivity".into(),
            json!({
                "type": "string",
                "enum": ["low", "medium", "high"],
                "description": "Sensitivity level of the information shared",
            }),
        );
        ToolDefinition {
            name: self.name().into(),
            description: "Call when personal information is shared (family, relationships, \
                          personal struggles, achievements)"
                .into(),
            parameters: ToolParameterSchema::object(props, &["info_type"]),
        }
    }

    async fn execute(
        &self,
        args: Value,
        _ctx: &mut SessionContext,
    ) -> Result<ToolReply, ToolError> {
        let info_type = string_arg(&args, "info_type", "other");
        let sensitivity = string_arg(&args, "sensitivity", "low");

        let intervention = format!(
            "PERSONAL INFORMATION SHARED: {info_type} (sensitivity: {sensitivity}).\n\
RESPOND appropriately:\n\
- If high sensitivity: Acknowledge briefly and redirect to professional topics\n\
- If medium sensitivity: Show appropriate interest but maintain boundaries\n\
- If low sensitivity: Can engage naturally while staying professional"
        );

        let mut data = Map::new();
        let _ = data.insert("info_type".into(), json!(info_type));
        let _ = data.insert("sensitivity".into(), json!(sensitivity));
        let _ = data.insert("intervention".into(), json!(intervention));
        let _ = data.insert("action".into(), json!("manage_personal_boundary"));
        Ok(ToolReply::with_data(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn echoes_type_and_sensitivity() {
        let mut ctx = SessionContext::new("s1");
        let reply = DetectPersonalInfo
            .execute(
                json!({"info_type": "family", "sensitivity": "high"}),
                &mut ctx,
            )
            .await
            .unwrap();
        assert!(reply.success);
        assert!(reply
            .intervention()
            .unwrap()
            .contains("family (sensitivity: high)"));
        assert_eq!(
            reply.data.get("action"),
            Some(&json!("manage_personal_boundary"))
        );
    }

    #[tokio::test]
    async fn missing_sensitivity_defaults_low() {
        let mut ctx = SessionContext::new("s1");
        let reply = DetectPersonalInfo
            .execute(json!({"info_type": "hobby"}), &mut ctx)
            .await
            .unwrap();
        assert_eq!(reply.data.get("sensitivity"), Some(&json!("low")));
    }
}
