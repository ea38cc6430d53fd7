#![warn(missing_docs)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

//! Binned spatial grids for surface and volume lookup.
//!
//! # Architecture
//!
//! - [`Axis`]: value-to-bin mapping with closed, open or circular bounds and
//!   regular or irregular binning, plus bin and metric search windows
//! - [`MultiAxis`]: `D` axes over one [`EdgeStorage`], either [`Owned`] or
//!   [`Borrowed`] from a flat buffer
//! - [`Grid`]: per-bin value storage filled by a [`Populator`]
//! - [`serializer`]: multi-bin to flat index, axis 0 fastest

mod axis;
pub mod error;
mod grid;
mod multi_axis;
pub mod serializer;

pub use axis::{
    wrap, Axis, AxisBinning, AxisBounds, AxisLabel, AxisSpec, BinRange, EdgeRange, SearchWindow,
};
pub use error::{GridError, Result};
pub use grid::{Grid, Populator};
pub use multi_axis::{Borrowed, EdgeStorage, MultiAxis, Owned};
