//! Core trait for monitor tools.
//!
//! Defines [`MonitorTool`] — the trait every tool implements. A tool receives
//! the model's JSON arguments plus mutable access to the session context, and
//! returns a [`ToolReply`]. Handlers are deterministic given `(args, ctx)`
//! aside from time-stamping, and degrade to placeholder results for
//! malformed-but-schema-valid input instead of erroring.

use async_trait::async_trait;
use serde_json::Value;
use vigil_core::session::SessionContext;
use vigil_core::tools::{ToolDefinition, ToolReply};

use crate::errors::ToolError;

/// The core trait every monitor tool implements.
///
/// Each tool provides:
/// - **Schema** via [`definition()`](MonitorTool::definition) — sent to the model
/// - **Execution** via [`execute()`](MonitorTool::execute) — invoked with JSON args
#[async_trait]
pub trait MonitorTool: Send + Sync {
    /// Tool name — the exact string sent to/from the model.
    fn name(&self) -> &str;

    /// Generate the [`ToolDefinition`] schema for the model.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool against the session context.
    async fn execute(
        &self,
        args: Value,
        ctx: &mut SessionContext,
    ) -> Result<ToolReply, ToolError>;
}
