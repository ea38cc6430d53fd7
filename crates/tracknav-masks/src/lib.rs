#![warn(missing_docs)]

//! Bounded surface shapes for tracknav.
//!
//! A [`Mask`] is a closed-enum [`Shape`] together with its bound values and
//! the volume reached through the surface. Masks answer two questions for
//! the intersectors and the navigator:
//!
//! - is a point, given in the shape's local frame, inside the bounds
//!   (within an additive tolerance)?
//! - what is the smallest local box around the shape?
//!
//! They also express global points in the shape's local and measurement
//! frames ([`Mask::project`]).

pub mod bbox;
pub mod error;
mod mask;
mod shape;

pub use bbox::BoundingBox;
pub use error::{MaskError, Result};
pub use mask::{Mask, Projection};
pub use shape::{LocalFrame, Shape, ShapeInfo, MAX_BOUNDS};
