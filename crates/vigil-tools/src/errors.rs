//! Tool execution errors.
//!
//! Tool errors never cross the orchestration boundary as process faults: the
//! registry folds them into failure replies that are fed back to the model.

/// Errors a tool handler can raise.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Arguments did not deserialize or failed validation.
    #[error("invalid arguments: {message}")]
    InvalidArguments {
        /// What was wrong with the arguments.
        message: String,
    },

    /// Handler failed internally.
    #[error("{message}")]
    Internal {
        /// Error description.
        message: String,
    },
}

impl ToolError {
    /// Invalid-arguments error from any displayable source.
    #[must_use]
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidArguments {
            message: err.to_string(),
        }
    }
}
