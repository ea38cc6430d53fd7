//! Error types for mask construction.

use thiserror::Error;

/// Errors raised when building or validating a mask.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaskError {
    /// The number of bound values does not match the shape.
    #[error("{shape} expects {expected} bound values, got {found}")]
    BoundCount {
        /// Shape name.
        shape: &'static str,
        /// Bound count of the shape.
        expected: usize,
        /// Bound count that was supplied.
        found: usize,
    },

    /// The bound values are inconsistent (negative extent, min above max, ...).
    #[error("invalid {shape} bounds: {reason}")]
    InvalidBounds {
        /// Shape name.
        shape: &'static str,
        /// What is wrong with them.
        reason: String,
    },

    /// Envelope for a bounding box must be positive.
    #[error("bounding box envelope must be positive, got {0}")]
    InvalidEnvelope(f64),
}

/// Result type for mask operations.
pub type Result<T> = std::result::Result<T, MaskError>;
