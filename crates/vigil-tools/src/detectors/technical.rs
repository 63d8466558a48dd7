//! Technical-vocabulary detector.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use vigil_core::session::SessionContext;
use vigil_core::tools::{ToolDefinition, ToolParameterSchema, ToolReply};

use super::string_arg;
use crate::errors::ToolError;
use crate::traits::MonitorTool;

/// Fires when the candidate uses specialized vocabulary; the intervention
/// asks the interviewing agent to probe technical depth.
pub struct DetectTechnicalTerms;

#[async_trait]
impl MonitorTool for DetectTechnicalTerms {
    fn name(&self) -> &str {
        "detectTechnicalTerms"
    }

    fn definition(&self) -> ToolDefinition {
        let mut props = Map::new();
        let _ = props.insert(
            "terms".into(),
            json!({
                "type": "array",
                "items": {"type": "string"},
                "description": "List of technical terms detected",
            }),
        );
        let _ = props.insert(
            "category".into(),
            json!({
                "type": "string",
                "enum": [
                    "programming", "design", "business", "science",
                    "engineering", "medical", "legal", "finance", "other",
                ],
                "description": "Category of technical terms",
            }),
        );
        let _ = props.insert(
            "expertise_level".into(),
            json!({
                "type": "string",
                "enum": ["beginner", "intermediate", "advanced", "expert"],
                "description": "Assessed expertise level based on term usage",
            }),
        );
        ToolDefinition {
            name: self.name().into(),
            description: "Call when technical terms, jargon, or specialized vocabulary \
                          are used in conversation"
                .into(),
            parameters: ToolParameterSchema::object(props, &["terms", "category"]),
        }
    }

    async fn execute(
        &self,
        args: Value,
        _ctx: &mut SessionContext,
    ) -> Result<ToolReply, ToolError> {
        let terms: Vec<String> = args
            .get("terms")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(Value::as_str)
                    .map(ToOwned::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        let category = string_arg(&args, "category", "other");

        let intervention = format!(
            "TECHNICAL EXPERTISE DETECTED: {category} terms used ({}).\n\
FOLLOW UP with deeper technical questions:\n\
- Ask about specific experience with these technologies\n\
- Probe for practical applications they've worked on\n\
- Assess depth of knowledge vs. surface-level familiarity",
            terms.join(", ")
        );

        let mut data = Map::new();
        let _ = data.insert("terms".into(), json!(terms));
        let _ = data.insert("category".into(), json!(category));
        let _ = data.insert("intervention".into(), json!(intervention));
        let _ = data.insert("action".into(), json!("probe_technical_depth"));
        Ok(ToolReply::with_data(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn lists_terms_in_intervention() {
        let mut ctx = SessionContext::new("s1");
        let reply = DetectTechnicalTerms
            .execute(
                json!({"terms": ["kubernetes", "istio"], "category": "engineering"}),
                &mut ctx,
            )
            .await
            .unwrap();
        assert!(reply.success);
        let intervention = reply.intervention().unwrap();
        assert!(intervention.contains("engineering terms used (kubernetes, istio)"));
        assert_eq!(
            reply.data.get("action"),
            Some(&json!("probe_technical_depth"))
        );
    }

    #[tokio::test]
    async fn missing_terms_degrade_to_empty_list() {
        let mut ctx = SessionContext::new("s1");
        let reply = DetectTechnicalTerms
            .execute(json!({}), &mut ctx)
            .await
            .unwrap();
        assert!(reply.success);
        assert_eq!(reply.data.get("terms"), Some(&json!([])));
        assert_eq!(reply.data.get("category"), Some(&json!("other")));
    }
}
