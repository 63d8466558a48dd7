//! Interview reference data and evaluation types.
//!
//! `JobData` is immutable reference material (job description, scripted
//! question bank, weighted intents) loaded once at process start and shared
//! read-only across sessions. `EvaluationResult` is the per-answer scoring
//! record appended to a session as the interview progresses.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Job reference data
// ─────────────────────────────────────────────────────────────────────────────

/// A named evaluation dimension with a weighting (e.g. "React Proficiency").
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobIntent {
    /// Stable intent ID.
    pub intent_id: i64,
    /// Human-readable intent name.
    pub intent_name: String,
    /// What the intent measures.
    #[serde(default)]
    pub description: String,
    /// Relative weighting. Informational at this layer; the overall score is
    /// an unweighted mean across stored evaluations.
    #[serde(default)]
    pub weightage: f64,
}

/// A scripted question from the job's question bank.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobQuestion {
    /// Question ID (bank-assigned or synthesized).
    pub id: String,
    /// Question text.
    pub question: String,
    /// Topic/category label.
    pub category: String,
    /// Difficulty level (1 = easiest).
    pub difficulty: u8,
    /// Expected answer / evaluation criteria.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_answer: Option<String>,
    /// Question style (`qna`, `behavioral`, `technical`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_type: Option<String>,
}

/// Immutable per-job reference data shared read-only across sessions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JobData {
    /// Job title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Job description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Scripted question bank.
    #[serde(default)]
    pub questions: Vec<JobQuestion>,
    /// Declared evaluation intents.
    #[serde(default)]
    pub intents: Vec<JobIntent>,
}

impl JobData {
    /// Whether an intent with the given ID is declared for this job.
    #[must_use]
    pub fn has_intent(&self, intent_id: i64) -> bool {
        self.intents.iter().any(|i| i.intent_id == intent_id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Evaluation
// ─────────────────────────────────────────────────────────────────────────────

/// Score for one intent on one answer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntentScore {
    /// Intent ID from the job's declared intents.
    pub intent_id: i64,
    /// Intent name (echoed for readability).
    pub intent_name: String,
    /// Score 0–100 for this intent.
    pub score: f64,
    /// Optional per-intent analysis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}

/// The scoring record for one candidate answer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// The question text that was asked.
    pub question: String,
    /// ID of the question, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    /// The candidate's response.
    pub response: String,
    /// Overall analysis text.
    pub analysis: String,
    /// Weighted aggregate score for this answer, 0–100.
    pub average_score: f64,
    /// Per-intent scores.
    pub intent_scores: Vec<IntentScore>,
    /// Reference answer used for comparison.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_answer: Option<String>,
    /// Notes comparing the response against the reference answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison_notes: Option<String>,
    /// Category of the question.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_category: Option<String>,
    /// Name of the agent that performed the evaluation.
    pub agent_name: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_job() -> JobData {
        JobData {
            title: Some("Frontend Engineer".into()),
            description: None,
            questions: vec![JobQuestion {
                id: "q1".into(),
                question: "Explain the virtual DOM.".into(),
                category: "react".into(),
                difficulty: 2,
                expected_answer: Some("Diffing over an in-memory tree".into()),
                question_type: Some("technical".into()),
            }],
            intents: vec![JobIntent {
                intent_id: 7,
                intent_name: "React Proficiency".into(),
                description: String::new(),
                weightage: 0.6,
            }],
        }
    }

    #[test]
    fn has_intent_known_and_unknown() {
        let job = sample_job();
        assert!(job.has_intent(7));
        assert!(!job.has_intent(99));
    }

    #[test]
    fn job_data_deserializes_with_defaults() {
        let job: JobData = serde_json::from_value(json!({})).unwrap();
        assert!(job.questions.is_empty());
        assert!(job.intents.is_empty());
        assert!(job.title.is_none());
    }

    #[test]
    fn job_data_serde_roundtrip() {
        let job = sample_job();
        let json = serde_json::to_string(&job).unwrap();
        let back: JobData = serde_json::from_str(&json).unwrap();
        assert_eq!(job, back);
    }

    #[test]
    fn evaluation_result_serde_roundtrip() {
        let eval = EvaluationResult {
            question: "Explain the virtual DOM.".into(),
            question_id: Some("q1".into()),
            response: "It's a diffed in-memory tree.".into(),
            analysis: "Solid grasp of the core concept.".into(),
            average_score: 82.5,
            intent_scores: vec![IntentScore {
                intent_id: 7,
                intent_name: "React Proficiency".into(),
                score: 82.5,
                analysis: None,
            }],
            reference_answer: None,
            comparison_notes: None,
            question_category: Some("react".into()),
            agent_name: "technicalInterviewer".into(),
        };
        let json = serde_json::to_string(&eval).unwrap();
        let back: EvaluationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(eval, back);
    }

    #[test]
    fn optional_fields_omitted_from_wire() {
        let score = IntentScore {
            intent_id: 1,
            intent_name: "Communication".into(),
            score: 70.0,
            analysis: None,
        };
        let json = serde_json::to_value(&score).unwrap();
        assert!(json.get("analysis").is_none());
    }
}
