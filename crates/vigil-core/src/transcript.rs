//! Conversation transcript types.
//!
//! Transcript entries form the per-session conversation history. Three
//! speakers: the candidate (wire name `user`), the interviewing assistant,
//! and system notices. Entries are append-only and chronological.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─────────────────────────────────────────────────────────────────────────────
// Speaker
// ─────────────────────────────────────────────────────────────────────────────

/// Who produced a conversational turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The interview candidate (wire name `user`).
    #[serde(rename = "user")]
    Candidate,
    /// The interviewing agent.
    Assistant,
    /// System notices (injected instructions, lifecycle markers).
    System,
}

impl Speaker {
    /// Wire/prompt label for this speaker (`user`, `assistant`, `system`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Candidate => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transcript entry
// ─────────────────────────────────────────────────────────────────────────────

/// One stored turn in a session's conversation history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptEntry {
    /// Unique entry ID (UUID v7, unique within the session).
    pub id: String,
    /// Epoch milliseconds when the turn occurred.
    pub timestamp_ms: i64,
    /// Who spoke.
    pub speaker: Speaker,
    /// The spoken/written text.
    pub message: String,
    /// Optional per-turn score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Optional structured payload (tool-call metadata for reconstruction).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl TranscriptEntry {
    /// Create an entry timestamped now.
    #[must_use]
    pub fn new(speaker: Speaker, message: impl Into<String>) -> Self {
        Self::at(speaker, message, Utc::now().timestamp_millis())
    }

    /// Create an entry with an explicit timestamp.
    #[must_use]
    pub fn at(speaker: Speaker, message: impl Into<String>, timestamp_ms: i64) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            timestamp_ms,
            speaker,
            message: message.into(),
            score: None,
            data: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Batch message
// ─────────────────────────────────────────────────────────────────────────────

/// One turn as submitted for monitor analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchMessage {
    /// Who spoke.
    pub role: Speaker,
    /// Turn text.
    pub content: String,
    /// Epoch milliseconds.
    pub timestamp_ms: i64,
}

impl BatchMessage {
    /// Create a batch message timestamped now.
    #[must_use]
    pub fn new(role: Speaker, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp_ms: Utc::now().timestamp_millis(),
        }
    }

    /// Render as a `role: content` prompt line.
    #[must_use]
    pub fn render(&self) -> String {
        format!("{}: {}", self.role.as_str(), self.content)
    }
}

/// Render a batch as newline-joined `role: content` lines for the model.
#[must_use]
pub fn render_batch(batch: &[BatchMessage]) -> String {
    batch
        .iter()
        .map(BatchMessage::render)
        .collect::<Vec<_>>()
        .join("\n")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speaker_wire_names() {
        assert_eq!(
            serde_json::to_string(&Speaker::Candidate).unwrap(),
            "\"user\""
        );
        assert_eq!(
            serde_json::to_string(&Speaker::Assistant).unwrap(),
            "\"assistant\""
        );
        assert_eq!(serde_json::to_string(&Speaker::System).unwrap(), "\"system\"");
    }

    #[test]
    fn speaker_as_str_matches_serde() {
        for speaker in [Speaker::Candidate, Speaker::Assistant, Speaker::System] {
            let json = serde_json::to_string(&speaker).unwrap();
            assert_eq!(json, format!("\"{}\"", speaker.as_str()));
        }
    }

    #[test]
    fn entry_ids_are_unique() {
        let a = TranscriptEntry::new(Speaker::Candidate, "hello");
        let b = TranscriptEntry::new(Speaker::Candidate, "hello");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn entry_at_uses_given_timestamp() {
        let entry = TranscriptEntry::at(Speaker::Assistant, "hi", 1234);
        assert_eq!(entry.timestamp_ms, 1234);
        assert!(entry.score.is_none());
        assert!(entry.data.is_none());
    }

    #[test]
    fn entry_serde_roundtrip() {
        let entry = TranscriptEntry::at(Speaker::System, "note", 99);
        let json = serde_json::to_string(&entry).unwrap();
        let back: TranscriptEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }

    #[test]
    fn batch_message_render() {
        let msg = BatchMessage {
            role: Speaker::Candidate,
            content: "I have a cat".into(),
            timestamp_ms: 0,
        };
        assert_eq!(msg.render(), "user: I have a cat");
    }

    #[test]
    fn render_batch_joins_lines() {
        let batch = vec![
            BatchMessage {
                role: Speaker::Candidate,
                content: "hello".into(),
                timestamp_ms: 0,
            },
            BatchMessage {
                role: Speaker::Assistant,
                content: "hi there".into(),
                timestamp_ms: 1,
            },
        ];
        assert_eq!(render_batch(&batch), "user: hello\nassistant: hi there");
    }

    #[test]
    fn render_batch_empty_is_empty_string() {
        assert_eq!(render_batch(&[]), "");
    }
}
