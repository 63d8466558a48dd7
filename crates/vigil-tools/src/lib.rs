//! # vigil-tools
//!
//! The monitor tool system: the [`MonitorTool`] trait, the
//! [`ToolRegistry`] with its runtime-mutable enabled subset, the
//! conversation detectors, and the interview-progression tools.
//!
//! Tool semantics:
//! - Unknown names and handler errors become failure replies the model can
//!   read, never process faults.
//! - Detectors always succeed, degrading missing arguments to placeholders.
//! - Progression tools treat validation failures as recoverable business
//!   errors that leave session state unchanged.

#![deny(unsafe_code)]

pub mod detectors;
pub mod errors;
pub mod progression;
pub mod registry;
pub mod traits;

pub use detectors::{
    DetectAnimal, DetectEmotion, DetectInterviewDelay, DetectPersonalInfo, DetectTechnicalTerms,
};
pub use errors::ToolError;
pub use progression::{GetQuestion, ProgressionConfig, StoreEvaluation, TransferAgents};
pub use registry::ToolRegistry;
pub use traits::MonitorTool;

use std::sync::Arc;

/// Build a registry with the full standard tool set registered.
///
/// Nothing is enabled yet; call [`ToolRegistry::set_enabled`] with the
/// configured names.
#[must_use]
pub fn standard_registry(config: ProgressionConfig) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(DetectAnimal));
    registry.register(Arc::new(DetectEmotion));
    registry.register(Arc::new(DetectTechnicalTerms));
    registry.register(Arc::new(DetectPersonalInfo));
    registry.register(Arc::new(DetectInterviewDelay));
    registry.register(Arc::new(GetQuestion));
    registry.register(Arc::new(StoreEvaluation::new(config)));
    registry.register(Arc::new(TransferAgents));
    registry
}
