//! Question selection from the job question bank.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;
use vigil_core::interview::JobQuestion;
use vigil_core::session::SessionContext;
use vigil_core::tools::{NextAction, ToolDefinition, ToolParameterSchema, ToolReply};

use crate::errors::ToolError;
use crate::traits::MonitorTool;

/// Selects the next interview question.
///
/// Prefers a bank question matching category (case-insensitive) and
/// difficulty, skipping previously asked texts; falls back to any unasked
/// bank question of that category; synthesizes a generic placeholder when
/// the bank has nothing left. Always succeeds and overwrites
/// `current_question`.
pub struct GetQuestion;

#[derive(Debug, Default, Deserialize)]
struct GetQuestionArgs {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    difficulty: Option<u8>,
    #[serde(default)]
    question_number: Option<u32>,
    #[serde(default)]
    previous_questions: Vec<String>,
}

#[async_trait]
impl MonitorTool for GetQuestion {
    fn name(&self) -> &str {
        "getQuestion"
    }

    fn definition(&self) -> ToolDefinition {
        let mut props = Map::new();
        let _ = props.insert(
            "category".into(),
            json!({
                "type": "string",
                "description": "Question category to draw from",
            }),
        );
        let _ = props.insert(
            "difficulty".into(),
            json!({
                "type": "number",
                "description": "Requested difficulty level",
            }),
        );
        let _ = props.insert(
            "question_number".into(),
            json!({
                "type": "number",
                "description": "Ordinal of the question being asked",
            }),
        );
        let _ = props.insert(
            "previous_questions".into(),
            json!({
                "type": "array",
                "items": {"type": "string"},
                "description": "Question texts already asked, to avoid repeats",
            }),
        );
        ToolDefinition {
            name: self.name().into(),
            description: "Fetch the next interview question from the job question bank \
                          by category and difficulty"
                .into(),
            parameters: ToolParameterSchema::object(props, &["category", "difficulty"]),
        }
    }

    async fn execute(
        &self,
        args: Value,
        ctx: &mut SessionContext,
    ) -> Result<ToolReply, ToolError> {
        // Malformed-but-schema-valid args degrade, never error.
        let args: GetQuestionArgs = serde_json::from_value(args).unwrap_or_default();
        let category = args.category.as_deref().unwrap_or("general");

        let question = select_question(ctx, category, args.difficulty, &args.previous_questions)
            .unwrap_or_else(|| synthesize_question(category, args.question_number));
        debug!(
            session_id = %ctx.session_id,
            question_id = %question.id,
            category,
            "question selected"
        );
        ctx.current_question = Some(question.clone());

        let mut data = Map::new();
        let _ = data.insert("question".into(), serde_json::to_value(&question)?);
        Ok(ToolReply::with_data(data).next_action(NextAction::WaitForUser))
    }
}

/// Pick from the bank: exact category + difficulty first, then category only.
fn select_question(
    ctx: &SessionContext,
    category: &str,
    difficulty: Option<u8>,
    previous: &[String],
) -> Option<JobQuestion> {
    let bank = &ctx.job_data.as_ref()?.questions;
    let unasked = |q: &&JobQuestion| {
        q.category.eq_ignore_ascii_case(category) && !previous.contains(&q.question)
    };

    if let Some(wanted) = difficulty {
        if let Some(q) = bank.iter().filter(unasked).find(|q| q.difficulty == wanted) {
            return Some(q.clone());
        }
    }
    bank.iter().find(unasked).cloned()
}

fn synthesize_question(category: &str, question_number: Option<u32>) -> JobQuestion {
    let ordinal = question_number.unwrap_or(1);
    JobQuestion {
        id: format!("generated-{category}-{ordinal}"),
        question: format!(
            "Tell me about a significant experience related to {category} in your career."
        ),
        category: category.to_owned(),
        difficulty: 1,
        expected_answer: None,
        question_type: Some("generated".into()),
    }
}
