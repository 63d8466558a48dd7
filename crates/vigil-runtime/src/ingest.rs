//! Transcript ingest task.
//!
//! Bridges the realtime transport to the monitor: raw utterances arrive on a
//! channel, flow through the [`ConversationBuffer`], and completed batches
//! trigger monitor cycles. An interval tick releases stale pendings so a
//! lone utterance still reaches the monitor within the flush interval.
//! Cycle errors are logged, never fatal to the task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use vigil_core::transcript::Speaker;

use crate::buffer::ConversationBuffer;
use crate::monitor::MonitorOrchestrator;

/// One raw utterance from the transport.
#[derive(Clone, Debug)]
pub struct Utterance {
    /// Session the utterance belongs to.
    pub session_id: String,
    /// Who spoke.
    pub speaker: Speaker,
    /// Raw text.
    pub text: String,
}

/// Spawn the ingest loop.
///
/// Runs until the channel closes or `cancel` fires.
pub fn spawn_ingest(
    buffer: Arc<ConversationBuffer>,
    orchestrator: Arc<MonitorOrchestrator>,
    mut rx: mpsc::Receiver<Utterance>,
    flush_interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(flush_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        info!("transcript ingest started");

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!("transcript ingest stopping");
                    break;
                }
                utterance = rx.recv() => {
                    let Some(utterance) = utterance else {
                        debug!("utterance channel closed, ingest stopping");
                        break;
                    };
                    let paired = buffer.add(
                        &utterance.session_id,
                        utterance.speaker,
                        &utterance.text,
                    );
                    if paired {
                        let batch = buffer.flush(&utterance.session_id);
                        run_cycle(&orchestrator, &utterance.session_id, batch).await;
                    }
                }
                _ = ticker.tick() => {
                    for session_id in buffer.session_ids() {
                        let batch = buffer.flush_expired(&session_id, flush_interval);
                        run_cycle(&orchestrator, &session_id, batch).await;
                    }
                }
            }
        }
    })
}

async fn run_cycle(
    orchestrator: &MonitorOrchestrator,
    session_id: &str,
    batch: Vec<vigil_core::transcript::BatchMessage>,
) {
    if batch.is_empty() {
        return;
    }
    if let Err(e) = orchestrator.process_batch(session_id, batch).await {
        warn!(session_id, error = %e, "monitor cycle failed on ingested batch");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
