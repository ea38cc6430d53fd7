#![warn(missing_docs)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

//! Detector geometry for tracknav: the volume/surface store navigation runs
//! against.
//!
//! # Architecture
//!
//! - [`Detector`]: validated, immutable store of [`Volume`]s and surfaces,
//!   read through the [`Geometry`] trait
//! - [`SurfaceFinder`]: per-volume candidate lookup, brute force or a
//!   [`SurfaceGrid`] on a reference cylinder or disc
//! - [`VolumeFinder`]: point-to-volume lookup, brute force or a cylindrical grid
//! - [`VolumeGraph`]: portal connectivity between volumes
//! - [`builder`]: telescope and toy barrel detectors
//! - [`scan`]: navigation-free intersection of every surface along rays,
//!   parallelized over directions with rayon

pub mod builder;
mod detector;
pub mod error;
mod finder;
mod graph;
pub mod scan;
mod volume;
mod volume_finder;

pub use builder::{telescope, toy_barrel, TelescopeConfig, ToyBarrelConfig};
pub use detector::{Detector, Geometry};
pub use error::{GeometryError, Result};
pub use finder::{SurfaceFinder, SurfaceGrid};
pub use graph::VolumeGraph;
pub use scan::{ray_scan, shoot, volume_trace, ScanConfig, ScanRecord};
pub use volume::Volume;
pub use volume_finder::VolumeFinder;
