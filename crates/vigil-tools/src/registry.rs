//! Tool registry — central index of all registered tools.
//!
//! The [`ToolRegistry`] maps tool names to their [`MonitorTool`]
//! implementations and tracks the runtime-mutable *enabled* subset. Only
//! enabled tools are advertised to the model; dispatch of an unknown name is
//! a normal outcome (models hallucinate names) and yields a failure reply,
//! never a fault.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, warn};
use vigil_core::metrics::{TOOL_EXECUTIONS_TOTAL, TOOL_EXECUTION_DURATION_MS};
use vigil_core::session::SessionContext;
use vigil_core::tools::{ToolDefinition, ToolReply};

use crate::traits::MonitorTool;

/// Central registry with an insertion-ordered tool list and a mutable
/// enabled subset.
pub struct ToolRegistry {
    /// Registration order is preserved; schemas are emitted in this order.
    tools: Vec<Arc<dyn MonitorTool>>,
    /// Names currently advertised to the model. Process-wide.
    enabled: RwLock<HashSet<String>>,
}

impl ToolRegistry {
    /// Create an empty registry with nothing enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            enabled: RwLock::new(HashSet::new()),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name while
    /// keeping its original position.
    pub fn register(&mut self, tool: Arc<dyn MonitorTool>) {
        debug!(tool_name = tool.name(), "tool registered");
        if let Some(slot) = self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            *slot = tool;
        } else {
            self.tools.push(tool);
        }
    }

    /// Look up a tool by name, enabled or not.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn MonitorTool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    /// Whether a tool with the given name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name() == name)
    }

    /// All registered tool names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_owned()).collect()
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Enabled subset
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the enabled subset. Unknown names are accepted silently; they
    /// simply never match a registered tool.
    pub fn set_enabled<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: HashSet<String> = names.into_iter().map(Into::into).collect();
        debug!(enabled = ?set, "enabled tool set replaced");
        *self.enabled.write() = set;
    }

    /// Currently enabled names in registration order (only names that match
    /// a registered tool).
    #[must_use]
    pub fn enabled_names(&self) -> Vec<String> {
        let enabled = self.enabled.read();
        self.tools
            .iter()
            .filter(|t| enabled.contains(t.name()))
            .map(|t| t.name().to_owned())
            .collect()
    }

    /// Schemas of enabled tools in registration order.
    #[must_use]
    pub fn enabled_definitions(&self) -> Vec<ToolDefinition> {
        let enabled = self.enabled.read();
        self.tools
            .iter()
            .filter(|t| enabled.contains(t.name()))
            .map(|t| t.definition())
            .collect()
    }

    /// Whether any tool is currently enabled.
    #[must_use]
    pub fn any_enabled(&self) -> bool {
        let enabled = self.enabled.read();
        self.tools.iter().any(|t| enabled.contains(t.name()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dispatch
    // ─────────────────────────────────────────────────────────────────────────

    /// Execute a tool by name.
    ///
    /// Unknown names and handler errors are folded into failure replies; the
    /// caller feeds the reply back to the model either way.
    pub async fn execute(
        &self,
        name: &str,
        args: Value,
        ctx: &mut SessionContext,
    ) -> ToolReply {
        let Some(tool) = self.get(name) else {
            warn!(tool_name = name, "unknown tool requested");
            metrics::counter!(TOOL_EXECUTIONS_TOTAL, "tool" => name.to_owned(), "outcome" => "unknown")
                .increment(1);
            return ToolReply::failure(format!("Unknown tool: {name}"));
        };

        let started = Instant::now();
        let reply = match tool.execute(args, ctx).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(tool_name = name, error = %e, "tool execution failed");
                ToolReply::failure(e.to_string())
            }
        };

        let outcome = if reply.success { "ok" } else { "error" };
        metrics::counter!(TOOL_EXECUTIONS_TOTAL, "tool" => name.to_owned(), "outcome" => outcome)
            .increment(1);
        metrics::histogram!(TOOL_EXECUTION_DURATION_MS, "tool" => name.to_owned())
            .record(started.elapsed().as_secs_f64() * 1000.0);
        debug!(
            tool_name = name,
            success = reply.success,
            duration_ms = started.elapsed().as_millis() as u64,
            "tool executed"
        );
        reply
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
