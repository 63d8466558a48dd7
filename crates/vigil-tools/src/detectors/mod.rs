//! Conversation detector tools.
//!
//! Each detector fires when the monitor model notices a pattern in the
//! transcript and returns `success: true` with a payload containing the
//! echoed arguments, an `intervention` instruction string for the
//! interviewing agent, and an `action` tag for the dashboard. Detectors never
//! fail on missing optional fields; they degrade to placeholder values.

mod animal;
mod delay;
mod emotion;
mod personal;
mod technical;

pub use animal::DetectAnimal;
pub use delay::DetectInterviewDelay;
pub use emotion::DetectEmotion;
pub use personal::DetectPersonalInfo;
pub use technical::DetectTechnicalTerms;

use serde_json::Value;

/// Read an optional string argument, degrading to a placeholder.
fn string_arg(args: &Value, key: &str, fallback: &str) -> String {
    args.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback)
        .to_owned()
}
