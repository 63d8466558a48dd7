//! Monitor orchestrator — the analyze → dispatch → synthesize cycle.
//!
//! One cycle per batch, per session, with the session mutex held throughout:
//! 1. No enabled tools: append the batch to history and short-circuit with
//!    the default instruction, zero provider calls.
//! 2. Append the batch to conversation history.
//! 3. One analysis call with the monitor system prompt, the rendered batch,
//!    and the enabled tool schemas.
//! 4. Dispatch returned tool calls sequentially in model order. Argument
//!    parse failures fail closed into failure replies; every reply is fed
//!    back to the model transcript as a tool message.
//! 5. Synthesize: tool-declared interventions win (joined by a blank line);
//!    otherwise one follow-up call over the tool results; otherwise the
//!    model's direct text; otherwise the default instruction.
//! 6. Persist the instruction into the session context.
//!
//! A provider failure aborts the cycle, leaves an error-flavored instruction
//! in the context so downstream state reflects the failure, and surfaces as
//! [`RuntimeError::Provider`]. No automatic retry.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use vigil_core::metrics::{MONITOR_CYCLES_TOTAL, MONITOR_CYCLE_DURATION_MS};
use vigil_core::session::DEFAULT_INSTRUCTION;
use vigil_core::transcript::{render_batch, BatchMessage, TranscriptEntry};
use vigil_llm::{ChatMessage, ChatProvider, ChatRequest, ChatResponse};
use vigil_tools::ToolRegistry;

use crate::errors::{Result, RuntimeError};
use crate::store::SessionStore;

/// Fixed system prompt for the analysis call.
const MONITOR_SYSTEM_PROMPT: &str = "You are a Master AI conversation monitor. Your job is to:\n\
1. Analyze conversation exchanges between participants\n\
2. ONLY call tools when you clearly detect the specified conditions\n\
3. If no clear triggers detected, respond with \"No intervention needed.\"\n\
4. Do NOT call tools for unrelated conversations";

/// One dispatched tool call within a cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolDispatch {
    /// Tool name as requested by the model.
    pub name: String,
    /// Whether the reply reported success.
    pub success: bool,
}

/// Result of one monitor cycle.
#[derive(Clone, Debug)]
pub struct MonitorOutcome {
    /// Session the cycle ran for.
    pub session_id: String,
    /// Final synthesized instruction, as persisted.
    pub instruction: String,
    /// Tool calls dispatched, in model order.
    pub tool_dispatches: Vec<ToolDispatch>,
    /// Provider round-trips made this cycle.
    pub provider_calls: u32,
}

/// Drives monitor cycles over the session store.
pub struct MonitorOrchestrator {
    store: Arc<SessionStore>,
    registry: Arc<ToolRegistry>,
    provider: Arc<dyn ChatProvider>,
}

impl MonitorOrchestrator {
    /// Wire an orchestrator over its collaborators.
    #[must_use]
    pub fn new(
        store: Arc<SessionStore>,
        registry: Arc<ToolRegistry>,
        provider: Arc<dyn ChatProvider>,
    ) -> Self {
        Self {
            store,
            registry,
            provider,
        }
    }

    /// The session store this orchestrator runs over.
    #[must_use]
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// The tool registry this orchestrator dispatches through.
    #[must_use]
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Run one monitor cycle for a batch of finalized messages.
    ///
    /// Lazily initializes the session and holds its mutex for the whole
    /// cycle, so concurrent batches for one session serialize.
    #[instrument(skip(self, batch), fields(session_id = %session_id, batch_len = batch.len()))]
    pub async fn process_batch(
        &self,
        session_id: &str,
        batch: Vec<BatchMessage>,
    ) -> Result<MonitorOutcome> {
        let started = Instant::now();
        let handle = self.store.get_or_initialize(session_id);
        let mut ctx = handle.lock().await;

        for msg in &batch {
            ctx.record_entry(TranscriptEntry::at(msg.role, &msg.content, msg.timestamp_ms));
        }

        // No enabled tools: nothing to analyze for, skip the provider.
        if !self.registry.any_enabled() {
            debug!(session_id, "no tools enabled, skipping analysis");
            ctx.monitor_instruction = DEFAULT_INSTRUCTION.to_owned();
            metrics::counter!(MONITOR_CYCLES_TOTAL, "outcome" => "short_circuit").increment(1);
            return Ok(MonitorOutcome {
                session_id: session_id.to_owned(),
                instruction: DEFAULT_INSTRUCTION.to_owned(),
                tool_dispatches: Vec::new(),
                provider_calls: 0,
            });
        }

        let excerpt = render_batch(&batch);
        let definitions = self.registry.enabled_definitions();
        let tool_summary: Vec<String> = definitions
            .iter()
            .map(|d| format!("{}: {}", d.name, d.description))
            .collect();
        let system_prompt = format!(
            "{MONITOR_SYSTEM_PROMPT}\n\nAvailable tools: {}\nAvailable tools descriptions: {}",
            definitions
                .iter()
                .map(|d| d.name.clone())
                .collect::<Vec<_>>()
                .join(", "),
            tool_summary.join("; "),
        );

        let mut messages = vec![ChatMessage::user(format!(
            "Analyze this conversation exchange and determine if intervention is needed. \
             If you detect any trigger, you MUST call the appropriate tools:\n\n{excerpt}"
        ))];
        let request = ChatRequest {
            system_prompt: system_prompt.clone(),
            messages: messages.clone(),
            tools: definitions,
        };

        let mut provider_calls = 1_u32;
        let response = match self.provider.complete(&request).await {
            Ok(response) => response,
            Err(e) => return Err(self.fail_cycle(&mut ctx, session_id, e)),
        };

        let mut dispatches = Vec::new();
        let instruction = if response.has_tool_calls() {
            let interventions = self
                .dispatch_tool_calls(&mut ctx, &response, &mut messages, &mut dispatches)
                .await;

            if interventions.is_empty() {
                // No tool declared an intervention: ask the model to
                // synthesize over the tool results.
                provider_calls += 1;
                let followup = ChatRequest {
                    system_prompt,
                    messages,
                    tools: Vec::new(),
                };
                match self.provider.complete(&followup).await {
                    Ok(r) => r
                        .text_content()
                        .unwrap_or(DEFAULT_INSTRUCTION)
                        .to_owned(),
                    Err(e) => return Err(self.fail_cycle(&mut ctx, session_id, e)),
                }
            } else {
                interventions.join("\n\n")
            }
        } else {
            response
                .text_content()
                .unwrap_or(DEFAULT_INSTRUCTION)
                .to_owned()
        };

        ctx.monitor_instruction = instruction.clone();
        info!(
            session_id,
            tool_calls = dispatches.len(),
            provider_calls,
            "monitor cycle complete"
        );
        metrics::counter!(MONITOR_CYCLES_TOTAL, "outcome" => "ok").increment(1);
        metrics::histogram!(MONITOR_CYCLE_DURATION_MS)
            .record(started.elapsed().as_secs_f64() * 1000.0);

        Ok(MonitorOutcome {
            session_id: session_id.to_owned(),
            instruction,
            tool_dispatches: dispatches,
            provider_calls,
        })
    }

    /// Dispatch tool calls sequentially in model order, collecting non-empty
    /// interventions and extending the model transcript with each reply.
    async fn dispatch_tool_calls(
        &self,
        ctx: &mut vigil_core::session::SessionContext,
        response: &ChatResponse,
        messages: &mut Vec<ChatMessage>,
        dispatches: &mut Vec<ToolDispatch>,
    ) -> Vec<String> {
        messages.push(ChatMessage::Assistant {
            content: response.text.clone(),
            tool_calls: response.tool_calls.clone(),
        });

        let mut interventions = Vec::new();
        for call in &response.tool_calls {
            // Parse failure fails closed into a failure reply; the cycle
            // continues and the model sees the error.
            let reply = match serde_json::from_str::<Value>(&call.arguments) {
                Ok(args) => self.registry.execute(&call.name, args, ctx).await,
                Err(e) => {
                    warn!(tool_name = %call.name, error = %e, "tool arguments did not parse");
                    vigil_core::tools::ToolReply::failure(format!(
                        "invalid arguments: {e}"
                    ))
                }
            };

            if reply.success && advances_turn(&call.name) {
                ctx.current_turn += 1;
            }
            if let Some(intervention) = reply.intervention() {
                interventions.push(intervention.to_owned());
            }
            dispatches.push(ToolDispatch {
                name: call.name.clone(),
                success: reply.success,
            });
            messages.push(ChatMessage::tool(&call.id, reply.to_model_payload()));
        }
        interventions
    }

    /// Persist the failure state and convert the error.
    fn fail_cycle(
        &self,
        ctx: &mut vigil_core::session::SessionContext,
        session_id: &str,
        error: vigil_llm::ProviderError,
    ) -> RuntimeError {
        warn!(session_id, error = %error, category = error.category(), "monitor cycle aborted");
        ctx.monitor_instruction = format!("Error processing conversation: {error}");
        metrics::counter!(MONITOR_CYCLES_TOTAL, "outcome" => "provider_error").increment(1);
        RuntimeError::Provider(error)
    }
}

/// Progression tools whose successful dispatch advances the turn counter.
fn advances_turn(tool_name: &str) -> bool {
    matches!(tool_name, "getQuestion" | "storeEvaluation")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
