//! Error types for intersector configuration.

use thiserror::Error;

/// Errors that can occur when configuring the intersectors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntersectError {
    /// Invalid iteration settings.
    #[error("invalid intersector settings: {0}")]
    InvalidConfig(String),
}

/// Result type for intersector operations.
pub type Result<T> = std::result::Result<T, IntersectError>;
