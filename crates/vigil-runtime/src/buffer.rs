//! Conversation buffer with exchange pairing.
//!
//! Per session: one pending candidate slot, one pending assistant slot, and
//! a queue of finalized messages. A complete candidate/assistant pair is the
//! batch-ready trigger; an interval-driven expiry flush promotes stale
//! pendings so a lone utterance still reaches the monitor. All mutation for
//! one session happens under a single mutex — `add` and `flush` are critical
//! sections so a pending message cannot be lost to a race between them.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::trace;
use vigil_core::transcript::{BatchMessage, Speaker};

/// An utterance waiting for its counterpart.
#[derive(Clone, Debug)]
struct Pending {
    text: String,
    received_at: Instant,
}

#[derive(Debug, Default)]
struct Slots {
    candidate: Option<Pending>,
    assistant: Option<Pending>,
    queue: Vec<BatchMessage>,
}

/// Per-session pairing buffer.
pub struct ConversationBuffer {
    sessions: DashMap<String, Arc<Mutex<Slots>>>,
    /// Inputs shorter than this are rejected as noise.
    min_message_chars: usize,
}

impl ConversationBuffer {
    /// Create a buffer with the given noise threshold.
    #[must_use]
    pub fn new(min_message_chars: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            min_message_chars,
        }
    }

    fn slots(&self, session_id: &str) -> Arc<Mutex<Slots>> {
        Arc::clone(
            self.sessions
                .entry(session_id.to_owned())
                .or_default()
                .value(),
        )
    }

    /// Store an utterance in its speaker's pending slot.
    ///
    /// Input shorter than the noise threshold is dropped without any state
    /// change. An unflushed pending of the same speaker is overwritten
    /// (last-write-wins). Returns `true` when this call completed a pair and
    /// moved it to the queue.
    pub fn add(&self, session_id: &str, speaker: Speaker, text: &str) -> bool {
        if text.chars().count() < self.min_message_chars {
            trace!(session_id, speaker = speaker.as_str(), "noise input dropped");
            return false;
        }

        let slots = self.slots(session_id);
        let mut slots = slots.lock();
        let pending = Pending {
            text: text.to_owned(),
            received_at: Instant::now(),
        };
        match speaker {
            Speaker::Candidate => slots.candidate = Some(pending),
            Speaker::Assistant => slots.assistant = Some(pending),
            // Only the two conversational roles pair; system text never
            // stands in for an assistant turn.
            Speaker::System => {
                trace!(session_id, "system utterance ignored by pairing");
                return false;
            }
        }

        if let (Some(candidate), Some(assistant)) =
            (slots.candidate.clone(), slots.assistant.clone())
        {
            slots.candidate = None;
            slots.assistant = None;
            let now_ms = chrono::Utc::now().timestamp_millis();
            // Candidate is stamped 1 ms earlier to preserve conversational
            // order in the rendered batch.
            slots.queue.push(BatchMessage {
                role: Speaker::Candidate,
                content: candidate.text,
                timestamp_ms: now_ms - 1,
            });
            slots.queue.push(BatchMessage {
                role: Speaker::Assistant,
                content: assistant.text,
                timestamp_ms: now_ms,
            });
            trace!(session_id, "exchange pair queued");
            return true;
        }
        false
    }

    /// Atomically drain the queue. Empty result is a no-op, not an error.
    #[must_use]
    pub fn flush(&self, session_id: &str) -> Vec<BatchMessage> {
        let Some(slots) = self.sessions.get(session_id).map(|e| Arc::clone(e.value())) else {
            return Vec::new();
        };
        let mut slots = slots.lock();
        std::mem::take(&mut slots.queue)
    }

    /// Promote pending slots older than `max_age` into the queue and drain.
    ///
    /// Bounds monitor latency when no pairing completes: a lone utterance is
    /// released after the flush interval instead of waiting forever for its
    /// counterpart. Promoted entries keep chronological order.
    #[must_use]
    pub fn flush_expired(&self, session_id: &str, max_age: Duration) -> Vec<BatchMessage> {
        let Some(slots) = self.sessions.get(session_id).map(|e| Arc::clone(e.value())) else {
            return Vec::new();
        };
        let mut slots = slots.lock();

        let now_ms = chrono::Utc::now().timestamp_millis();
        let mut expired: Vec<(Instant, Speaker, String)> = Vec::new();
        if slots
            .candidate
            .as_ref()
            .is_some_and(|p| p.received_at.elapsed() >= max_age)
        {
            if let Some(p) = slots.candidate.take() {
                expired.push((p.received_at, Speaker::Candidate, p.text));
            }
        }
        if slots
            .assistant
            .as_ref()
            .is_some_and(|p| p.received_at.elapsed() >= max_age)
        {
            if let Some(p) = slots.assistant.take() {
                expired.push((p.received_at, Speaker::Assistant, p.text));
            }
        }
        expired.sort_by_key(|(at, _, _)| *at);
        for (_, role, content) in expired {
            slots.queue.push(BatchMessage {
                role,
                content,
                timestamp_ms: now_ms,
            });
        }
        std::mem::take(&mut slots.queue)
    }

    /// Sessions currently holding buffer state.
    #[must_use]
    pub fn session_ids(&self) -> Vec<String> {
        self.sessions.iter().map(|e| e.key().clone()).collect()
    }

    /// Drop all buffer state for a session.
    pub fn remove(&self, session_id: &str) {
        let _ = self.sessions.remove(session_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> ConversationBuffer {
        ConversationBuffer::new(3)
    }

    #[test]
    fn pairing_produces_ordered_two_entry_batch() {
        let buf = buffer();
        assert!(!buf.add("s1", Speaker::Candidate, "I have a cat"));
        assert!(buf.add("s1", Speaker::Assistant, "Tell me more"));

        let batch = buf.flush("s1");
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].role, Speaker::Candidate);
        assert_eq!(batch[0].content, "I have a cat");
        assert_eq!(batch[1].role, Speaker::Assistant);
        assert_eq!(batch[1].content, "Tell me more");
        assert!(batch[0].timestamp_ms < batch[1].timestamp_ms);

        // Pending slots are clear afterward.
        assert!(buf.flush("s1").is_empty());
        assert!(!buf.add("s1", Speaker::Candidate, "another message"));
    }

    #[test]
    fn short_input_is_a_no_op() {
        let buf = buffer();
        assert!(!buf.add("s1", Speaker::Candidate, "hi"));
        assert!(!buf.add("s1", Speaker::Candidate, ""));
        // The slot stayed empty: a later assistant message does not pair.
        assert!(!buf.add("s1", Speaker::Assistant, "and yourself?"));
        assert!(buf.flush("s1").is_empty());
    }

    #[test]
    fn same_speaker_last_write_wins() {
        let buf = buffer();
        assert!(!buf.add("s1", Speaker::Candidate, "first draft"));
        assert!(!buf.add("s1", Speaker::Candidate, "actual answer"));
        assert!(buf.add("s1", Speaker::Assistant, "go on"));
        let batch = buf.flush("s1");
        assert_eq!(batch[0].content, "actual answer");
    }

    #[test]
    fn system_utterance_never_pairs() {
        let buf = buffer();
        assert!(!buf.add("s1", Speaker::Candidate, "I have a cat"));
        assert!(!buf.add("s1", Speaker::System, "connection re-established"));
        assert!(buf.flush("s1").is_empty());
        // The candidate is still pending and pairs with a real assistant turn.
        assert!(buf.add("s1", Speaker::Assistant, "Tell me more"));
        let batch = buf.flush("s1");
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1].content, "Tell me more");
    }

    #[test]
    fn flush_unknown_session_is_empty() {
        let buf = buffer();
        assert!(buf.flush("nope").is_empty());
    }

    #[test]
    fn sessions_are_independent() {
        let buf = buffer();
        assert!(!buf.add("a", Speaker::Candidate, "from a"));
        assert!(!buf.add("b", Speaker::Assistant, "from b"));
        assert!(buf.flush("a").is_empty());
        assert!(buf.flush("b").is_empty());
    }

    #[test]
    fn flush_expired_promotes_stale_pending() {
        let buf = buffer();
        assert!(!buf.add("s1", Speaker::Candidate, "anyone there?"));
        // Zero max-age makes the pending immediately stale.
        let batch = buf.flush_expired("s1", Duration::ZERO);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].role, Speaker::Candidate);
        assert_eq!(batch[0].content, "anyone there?");
    }

    #[test]
    fn flush_expired_respects_max_age() {
        let buf = buffer();
        assert!(!buf.add("s1", Speaker::Candidate, "fresh message"));
        let batch = buf.flush_expired("s1", Duration::from_secs(60));
        assert!(batch.is_empty());
        // Still pending: pairs normally afterwards.
        assert!(buf.add("s1", Speaker::Assistant, "reply arrives"));
    }

    #[test]
    fn flush_expired_drains_queued_pairs_too() {
        let buf = buffer();
        assert!(!buf.add("s1", Speaker::Candidate, "question?"));
        assert!(buf.add("s1", Speaker::Assistant, "answer."));
        let batch = buf.flush_expired("s1", Duration::from_secs(60));
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn remove_clears_state() {
        let buf = buffer();
        assert!(!buf.add("s1", Speaker::Candidate, "hello there"));
        buf.remove("s1");
        assert!(!buf.add("s1", Speaker::Assistant, "no pair now"));
        assert!(buf.flush("s1").is_empty());
    }
}
