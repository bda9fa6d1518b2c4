// =============================================================================
// Error types for the TMO pipeline
// =============================================================================
//
// Undefined (NaN) values inside a Signal are NOT errors. These variants cover
// calls that cannot produce a Signal at all.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, TmoError>;

/// Errors surfaced by the TMO pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TmoError {
    /// Paired input series have different lengths.
    #[error("length mismatch: open has {open} values, close has {close}")]
    LengthMismatch { open: usize, close: usize },

    /// A configuration field is out of range, or two settings conflict.
    #[error("invalid config '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    /// Input is shorter than the largest configured window.
    #[error("insufficient history: need at least {required} bars, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },
}

impl TmoError {
    pub(crate) fn invalid_config(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
