//! Interview-progression tools.
//!
//! These tools drive the scripted interview forward: fetching the next
//! question from the job's question bank, folding evaluations into the
//! session trackers, and handing off to the next interview phase. Validation
//! failures are recoverable business errors returned as failure replies with
//! actionable guidance; they never mutate state.

mod get_question;
mod store_evaluation;
mod transfer_agents;

pub use get_question::GetQuestion;
pub use store_evaluation::StoreEvaluation;
pub use transfer_agents::TransferAgents;

/// Thresholds governing interview advancement.
#[derive(Clone, Copy, Debug)]
pub struct ProgressionConfig {
    /// Questions asked before the interview wraps up.
    pub max_questions: u32,
    /// Overall score below which the interview concludes early.
    pub min_advance_score: f64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            max_questions: 5,
            min_advance_score: 50.0,
        }
    }
}
