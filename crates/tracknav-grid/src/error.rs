//! Error types for grid construction and population.

use thiserror::Error;

/// Errors that can occur when building or filling a grid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// Fewer edge ranges than axes.
    #[error("no edge range for axis {0}")]
    MissingEdgeRange(usize),

    /// An axis without bins.
    #[error("axis {0} has no bins")]
    EmptyAxis(usize),

    /// The edge range points past the end of the edge table.
    #[error("axis {axis}: edges [{offset}, {end}) exceed table of {len}")]
    EdgeRangeOutOfBounds {
        /// Axis index.
        axis: usize,
        /// First edge.
        offset: usize,
        /// One past the last edge.
        end: usize,
        /// Length of the edge table.
        len: usize,
    },

    /// Bin edges are not strictly increasing.
    #[error("axis {0}: bin edges must be strictly increasing")]
    NonMonotonicEdges(usize),

    /// A raw buffer could not be viewed as edges or edge ranges.
    #[error("cannot view buffer: {0}")]
    Cast(String),

    /// An attach populator ran out of slots in a bin.
    #[error("bin {0} is full")]
    BinFull(usize),
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
