//! Runtime errors.

use vigil_llm::ProviderError;

/// Result alias for runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Errors crossing the runtime boundary.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// No session with the given ID exists. Updates never auto-create;
    /// callers must initialize first.
    #[error("session not found: {session_id}")]
    SessionNotFound {
        /// The unknown session ID.
        session_id: String,
    },

    /// The provider call failed; the monitor cycle was aborted.
    #[error("provider call failed: {0}")]
    Provider(#[from] ProviderError),
}

impl RuntimeError {
    /// Session-not-found error for the given ID.
    #[must_use]
    pub fn session_not_found(session_id: impl Into<String>) -> Self {
        Self::SessionNotFound {
            session_id: session_id.into(),
        }
    }
}
