//! Animal-mention detector.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use vigil_core::session::SessionContext;
use vigil_core::tools::{ToolDefinition, ToolParameterSchema, ToolReply};

use super::string_arg;
use crate::errors::ToolError;
use crate::traits::MonitorTool;

/// Fires when the candidate mentions animals; the intervention steers the
/// interviewing agent toward cars and transportation instead.
pub struct DetectAnimal;

#[async_trait]
impl MonitorTool for DetectAnimal {
    fn name(&self) -> &str {
        "detectAnimal"
    }

    fn definition(&self) -> ToolDefinition {
        let mut props = Map::new();
        let _ = props.insert(
            "animal".into(),
            json!({
                "type": "string",
                "enum": ["cat", "dog", "bird", "fish"],
            }),
        );
        let _ = props.insert(
            "context".into(),
            json!({
                "type": "string",
                "description": "Brief context of the animal mention",
            }),
        );
        ToolDefinition {
            name: self.name().into(),
            description: "Call only when you detect animal-related words like cat, dog, pet, etc."
                .into(),
            parameters: ToolParameterSchema::object(props, &["animal"]),
        }
    }

    async fn execute(
        &self,
        args: Value,
        _ctx: &mut SessionContext,
    ) -> Result<ToolReply, ToolError> {
        let animal = string_arg(&args, "animal", "unknown");

        let intervention = format!(
            "INTERVENTION REQUIRED: Animal detected ({animal}).\n\
IMMEDIATELY redirect the conversation by asking about cars, vehicles, or transportation.\n\
Examples:\n\
- \"That's interesting! Speaking of getting around, what kind of car do you drive?\"\n\
- \"By the way, I'm curious about your transportation preferences. Do you prefer cars, public transit, or other vehicles?\"\n\
- \"Let's talk about something different - what's your dream car?\"\n\
Do NOT continue discussing animals. Smoothly transition to vehicle/transportation topics."
        );

        let mut data = Map::new();
        let _ = data.insert("animal".into(), json!(animal));
        let _ = data.insert("intervention".into(), json!(intervention));
        let _ = data.insert("action".into(), json!("redirect_to_cars"));
        Ok(ToolReply::with_data(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn intervention_redirects_to_cars() {
        let mut ctx = SessionContext::new("s1");
        let reply = DetectAnimal
            .execute(json!({"animal": "cat"}), &mut ctx)
            .await
            .unwrap();
        assert!(reply.success);
        assert_eq!(reply.data.get("animal"), Some(&json!("cat")));
        assert_eq!(reply.data.get("action"), Some(&json!("redirect_to_cars")));
        let intervention = reply.intervention().unwrap();
        assert!(intervention.contains("Animal detected (cat)"));
        assert!(intervention.contains("cars, vehicles, or transportation"));
    }

    #[tokio::test]
    async fn missing_animal_degrades_to_placeholder() {
        let mut ctx = SessionContext::new("s1");
        let reply = DetectAnimal.execute(json!({}), &mut ctx).await.unwrap();
        assert!(reply.success);
        assert_eq!(reply.data.get("animal"), Some(&json!("unknown")));
        assert!(reply.intervention().is_some());
    }

    #[test]
    fn schema_requires_animal() {
        let def = DetectAnimal.definition();
        assert_eq!(def.name, "detectAnimal");
        assert_eq!(
            def.parameters.required.as_deref(),
            Some(&["animal".to_owned()][..])
        );
    }
}
