//! Error types for navigation setup.

use thiserror::Error;
use tracknav_intersect::IntersectError;

/// Errors that can occur when configuring a navigator.
///
/// Navigation itself never fails with an error: lost tracks end in
/// [`NavigationStatus::Abort`](crate::NavigationStatus::Abort).
#[derive(Error, Debug)]
pub enum NavigationError {
    /// Inconsistent navigation settings.
    #[error("invalid navigation config: {0}")]
    InvalidConfig(String),

    /// Invalid Newton settings.
    #[error(transparent)]
    Newton(#[from] IntersectError),

    /// Settings file could not be parsed.
    #[error("failed to parse navigation config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for navigation setup.
pub type Result<T> = std::result::Result<T, NavigationError>;
