#![warn(missing_docs)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

//! Trajectory-surface intersection for tracknav.
//!
//! # Architecture
//!
//! - [`Trajectory`]: a straight [`Ray`] or a [`Helix`] in a homogeneous field
//! - [`Surface`]: barcode + [`Mask`](tracknav_masks::Mask) + placement
//! - [`intersect()`]: closed dispatch on trajectory kind and mask shape to the
//!   closed-form (plane, cylinder, cone, wire, box) or Newton (helix)
//!   intersectors
//! - [`Intersection`]: the classified result, ordered by path length
//!
//! # Example
//!
//! ```
//! use tracknav_intersect::{intersect, NewtonConfig, Ray, Surface};
//! use tracknav_masks::Mask;
//! use tracknav_math::{Barcode, Point3, SurfaceId, Transform, Vec3};
//!
//! let plane = Surface::new(
//!     Barcode::new(0, SurfaceId::Sensitive, 0),
//!     Mask::rectangle(20.0, 20.0),
//!     Transform::from_z_axis(Point3::new(50.0, 0.0, 0.0), &Vec3::x()),
//! );
//! let ray = Ray::new(Point3::origin(), Vec3::x());
//! let hits = intersect(&ray.into(), &plane, 1e-6, &NewtonConfig::default());
//! assert!(hits[0].is_inside());
//! assert!((hits[0].path - 50.0).abs() < 1e-12);
//! ```

pub mod config;
pub mod error;
pub mod intersect;
mod intersection;
mod quadratic;
mod surface;
mod trajectory;

pub use config::NewtonConfig;
pub use error::{IntersectError, Result};
pub use intersect::{intersect, update};
pub use intersection::{
    nearest_inside, sort_by_path, Intersection, IntersectionDirection, IntersectionStatus,
};
pub use quadratic::QuadraticEquation;
pub use surface::Surface;
pub use trajectory::{Helix, Ray, Trajectory};
