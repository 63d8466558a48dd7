//! Per-session interview state.
//!
//! `SessionContext` is the single mutable record for one candidate interview:
//! the conversation history, the running evaluation trackers, and the latest
//! synthesized instruction for the interviewing agent. It is owned by the
//! session store and mutated only while the per-session lock is held.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::interview::{EvaluationResult, JobData, JobQuestion};
use crate::transcript::TranscriptEntry;

/// Instruction used when the monitor has nothing to redirect.
pub const DEFAULT_INSTRUCTION: &str = "No intervention needed.";

// ─────────────────────────────────────────────────────────────────────────────
// Session context
// ─────────────────────────────────────────────────────────────────────────────

/// Mutable state for one interview session.
#[derive(Clone, Debug)]
pub struct SessionContext {
    /// Opaque session identifier, immutable after creation.
    pub session_id: String,
    /// Append-only chronological conversation history.
    pub conversation_history: Vec<TranscriptEntry>,
    /// Number of question/evaluation turns completed.
    pub current_turn: u32,
    /// The question currently posed to the candidate.
    pub current_question: Option<JobQuestion>,
    /// Append-only evaluation records.
    pub current_evaluations: Vec<EvaluationResult>,
    /// Arithmetic mean of all evaluation `average_score`s. Never stale:
    /// recomputed on every append. 0.0 when no evaluations exist.
    pub current_overall_score: f64,
    /// Set once a transfer/conclude tool fires. Callers stop issuing
    /// questions; the data model does not hard-block.
    pub concluded: bool,
    /// Latest synthesized instruction for the interviewing agent.
    /// Overwritten, not appended, each monitor cycle.
    pub monitor_instruction: String,
    /// Shared read-only job reference data.
    pub job_data: Option<Arc<JobData>>,
}

impl SessionContext {
    /// Create a fresh context with empty history and zeroed counters.
    #[must_use]
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            conversation_history: Vec::new(),
            current_turn: 0,
            current_question: None,
            current_evaluations: Vec::new(),
            current_overall_score: 0.0,
            concluded: false,
            monitor_instruction: String::new(),
            job_data: None,
        }
    }

    /// Append a transcript entry.
    pub fn record_entry(&mut self, entry: TranscriptEntry) {
        self.conversation_history.push(entry);
    }

    /// Append an evaluation and recompute the overall score.
    pub fn record_evaluation(&mut self, evaluation: EvaluationResult) {
        self.current_evaluations.push(evaluation);
        let total: f64 = self
            .current_evaluations
            .iter()
            .map(|e| e.average_score)
            .sum();
        self.current_overall_score = total / self.current_evaluations.len() as f64;
    }

    /// Shallow-merge an update: only the populated fields overwrite.
    pub fn apply(&mut self, update: ContextUpdate) {
        if let Some(instruction) = update.monitor_instruction {
            self.monitor_instruction = instruction;
        }
        if let Some(question) = update.current_question {
            self.current_question = Some(question);
        }
        if let Some(concluded) = update.concluded {
            self.concluded = concluded;
        }
        if let Some(job_data) = update.job_data {
            self.job_data = Some(job_data);
        }
    }

    /// Read-only progression snapshot for dashboards and the state API.
    #[must_use]
    pub fn snapshot(&self) -> InterviewSnapshot {
        InterviewSnapshot {
            session_id: self.session_id.clone(),
            turn: self.current_turn,
            overall_score: self.current_overall_score,
            current_question: self.current_question.clone(),
            concluded: self.concluded,
            evaluation_count: self.current_evaluations.len(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Partial update
// ─────────────────────────────────────────────────────────────────────────────

/// Partial-field update applied with shallow-merge semantics.
#[derive(Clone, Debug, Default)]
pub struct ContextUpdate {
    /// Replace the synthesized monitor instruction.
    pub monitor_instruction: Option<String>,
    /// Replace the current question.
    pub current_question: Option<JobQuestion>,
    /// Replace the concluded flag.
    pub concluded: Option<bool>,
    /// Attach job reference data.
    pub job_data: Option<Arc<JobData>>,
}

impl ContextUpdate {
    /// An update that only replaces the monitor instruction.
    #[must_use]
    pub fn instruction(text: impl Into<String>) -> Self {
        Self {
            monitor_instruction: Some(text.into()),
            ..Self::default()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Snapshot
// ─────────────────────────────────────────────────────────────────────────────

/// Read-only view of interview progression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSnapshot {
    /// Session identifier.
    pub session_id: String,
    /// Completed question/evaluation turns.
    pub turn: u32,
    /// Running mean of evaluation scores.
    pub overall_score: f64,
    /// The question currently posed, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question: Option<JobQuestion>,
    /// Whether the interview has concluded.
    pub concluded: bool,
    /// Number of stored evaluations.
    pub evaluation_count: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
