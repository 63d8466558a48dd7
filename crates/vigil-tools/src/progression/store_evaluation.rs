//! Evaluation storage and advancement decision.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::debug;
use vigil_core::interview::EvaluationResult;
use vigil_core::session::SessionContext;
use vigil_core::tools::{NextAction, ToolDefinition, ToolParameterSchema, ToolReply};

use super::ProgressionConfig;
use crate::errors::ToolError;
use crate::traits::MonitorTool;

/// Folds an answer evaluation into the session trackers.
///
/// Every `intent_id` in the evaluation must exist in the job's declared
/// intents (when job data carries any); a violation is a recoverable failure
/// that leaves state untouched. The reply's `next_action` recommends
/// `conclude` once the turn count reaches `max_questions`, or immediately
/// when the running score drops below `min_advance_score` — a weak running
/// score ends the interview early, turns remaining or not. The turn counter
/// itself is the orchestrator's to increment.
pub struct StoreEvaluation {
    config: ProgressionConfig,
}

impl StoreEvaluation {
    /// Build with advancement thresholds.
    #[must_use]
    pub fn new(config: ProgressionConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl MonitorTool for StoreEvaluation {
    fn name(&self) -> &str {
        "storeEvaluation"
    }

    fn definition(&self) -> ToolDefinition {
        let mut props = Map::new();
        let _ = props.insert(
            "question".into(),
            json!({"type": "string", "description": "The question that was asked"}),
        );
        let _ = props.insert(
            "response".into(),
            json!({"type": "string", "description": "The candidate's answer"}),
        );
        let _ = props.insert(
            "analysis".into(),
            json!({"type": "string", "description": "Analysis of the answer"}),
        );
        let _ = props.insert(
            "average_score".into(),
            json!({
                "type": "number",
                "minimum": 0,
                "maximum": 100,
                "description": "Overall score for this answer",
            }),
        );
        let _ = props.insert(
            "intent_scores".into(),
            json!({
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "intent_id": {"type": "number"},
                        "intent_name": {"type": "string"},
                        "score": {"type": "number"},
                        "analysis": {"type": "string"},
                    },
                    "required": ["intent_id", "intent_name", "score"],
                },
                "description": "Per-intent scores for this answer",
            }),
        );
        let _ = props.insert(
            "agent_name".into(),
            json!({"type": "string", "description": "Name of the evaluating agent"}),
        );
        ToolDefinition {
            name: self.name().into(),
            description: "Store the evaluation of the candidate's latest answer and decide \
                          whether the interview should advance or conclude"
                .into(),
            parameters: ToolParameterSchema::object(
                props,
                &[
                    "question",
                    "response",
                    "analysis",
                    "average_score",
                    "intent_scores",
                    "agent_name",
                ],
            ),
        }
    }

    async fn execute(
        &self,
        args: Value,
        ctx: &mut SessionContext,
    ) -> Result<ToolReply, ToolError> {
        let evaluation: EvaluationResult = match serde_json::from_value(args) {
            Ok(e) => e,
            Err(e) => {
                return Ok(ToolReply::failure(format!(
                    "Evaluation did not match the expected shape ({e}). \
                     Resubmit with question, response, analysis, average_score, \
                     intent_scores and agent_name."
                )));
            }
        };

        // Intent validation against the job's declared intents, when present.
        if let Some(job) = ctx.job_data.as_deref() {
            if !job.intents.is_empty() {
                let invalid: Vec<i64> = evaluation
                    .intent_scores
                    .iter()
                    .map(|s| s.intent_id)
                    .filter(|id| !job.has_intent(*id))
                    .collect();
                if !invalid.is_empty() {
                    let valid: Vec<String> = job
                        .intents
                        .iter()
                        .map(|i| format!("{} ({})", i.intent_id, i.intent_name))
                        .collect();
                    return Ok(ToolReply::failure(format!(
                        "Unknown intent ids {invalid:?}. Retry with intents declared for \
                         this job: {}.",
                        valid.join(", ")
                    )));
                }
            }
        }

        ctx.record_evaluation(evaluation);

        let next_turn = ctx.current_turn + 1;
        let next_action = if next_turn >= self.config.max_questions
            || ctx.current_overall_score < self.config.min_advance_score
        {
            NextAction::Conclude
        } else {
            NextAction::AskNextQuestion
        };
        debug!(
            session_id = %ctx.session_id,
            overall_score = ctx.current_overall_score,
            next_turn,
            ?next_action,
            "evaluation stored"
        );

        let mut data = Map::new();
        let _ = data.insert("stored".into(), json!(true));
        let _ = data.insert("overall_score".into(), json!(ctx.current_overall_score));
        let _ = data.insert(
            "evaluation_count".into(),
            json!(ctx.current_evaluations.len()),
        );
        Ok(ToolReply::with_data(data).next_action(next_action))
    }
}
