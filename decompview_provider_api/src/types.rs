use serde::{Deserialize, Serialize};

/// Summary information about a registered decompiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecompilerSummary {
    /// Stable identifier for the decompiler.
    pub id: String,
    /// Human-friendly name for display.
    pub name: String,
}

impl DecompilerSummary {
    /// Construct a new summary.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Errors surfaced by decompiler providers.
#[derive(Debug, thiserror::Error)]
pub enum DecompilerError {
    /// Engine is not usable in the current environment.
    #[error("decompiler is unavailable: {reason}")]
    Unavailable {
        /// Why the engine cannot run.
        reason: String,
    },
    /// Generic failure surfaced by the engine.
    #[error("{message}")]
    Failure {
        /// Human-readable error message.
        message: String,
    },
}

impl DecompilerError {
    /// Helper to construct a failure from any displayable message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }
}

/// Convenience result alias for decompiler operations.
pub type DecompilerResult<T> = std::result::Result<T, DecompilerError>;
