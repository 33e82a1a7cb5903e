//! Error types for fstr

use thiserror::Error;

/// Result type alias using fstr's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in fstr operations
#[derive(Error, Debug)]
pub enum Error {
    /// Operation called on a graph that does not support it
    #[error("Invalid operation '{op}': {reason}")]
    InvalidOperation {
        /// The operation name
        op: &'static str,
        /// Why the graph does not support it
        reason: String,
    },

    /// Gradient or weight vector length does not match the arc count
    #[error("Shape mismatch: expected {expected} arc weights, got {got}")]
    ShapeMismatch {
        /// Expected number of weights (the graph's arc count)
        expected: usize,
        /// Actual number of weights supplied
        got: usize,
    },

    /// Forward scoring failed to drain an accept node's in-degree
    #[error("Graph has a cycle, self-loop or is disconnected")]
    CycleDetected,
}

impl Error {
    /// Create an invalid operation error
    pub fn invalid_operation(op: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOperation {
            op,
            reason: reason.into(),
        }
    }

    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: usize, got: usize) -> Self {
        Self::ShapeMismatch { expected, got }
    }
}
