#![warn(missing_docs)]

//! Track navigation through segmented detectors.
//!
//! Re-exports the tracknav crates and their most used types. A track is
//! described by a [`Trajectory`]; the [`Navigator`] keeps a per-track
//! [`NavigationState`] listing the surfaces ahead, switching volumes
//! through portals until the track leaves the world.
//!
//! # Example
//!
//! ```
//! use tracknav::{
//!     telescope, NavigationConfig, NavigationState, NavigationStatus, Navigator, Point3, Ray,
//!     TelescopeConfig, Trajectory, Vec3,
//! };
//!
//! let mut traj: Trajectory = Ray::new(Point3::origin(), Vec3::x())
//!     .with_overstep_tolerance(-0.1)
//!     .into();
//! let detector = telescope(&traj, &TelescopeConfig::default()).unwrap();
//! let nav = Navigator::new(&detector, NavigationConfig::default()).unwrap();
//!
//! let mut state = NavigationState::new();
//! nav.init(&mut state, &traj);
//! let mut modules = 0;
//! while state.heartbeat() {
//!     traj = traj.advanced(state.distance_to_next());
//!     state.set_high_trust();
//!     nav.update(&mut state, &traj);
//!     if state.status() == NavigationStatus::OnModule {
//!         modules += 1;
//!     }
//! }
//! assert!(state.is_complete());
//! assert_eq!(modules, 4);
//! ```

pub use tracknav_geometry;
pub use tracknav_grid;
pub use tracknav_intersect;
pub use tracknav_masks;
pub use tracknav_math;
pub use tracknav_navigation;

pub use tracknav_geometry::{
    telescope, toy_barrel, Detector, Geometry, TelescopeConfig, ToyBarrelConfig, Volume,
};
pub use tracknav_intersect::{
    intersect, Helix, Intersection, IntersectionStatus, NewtonConfig, Ray, Surface, Trajectory,
};
pub use tracknav_masks::{Mask, Shape};
pub use tracknav_math::{Barcode, Point3, SurfaceId, Transform, Vec3, DINDEX_INVALID};
pub use tracknav_navigation::{
    Inspector, NavigationConfig, NavigationState, NavigationStatus, Navigator, TrustLevel,
};
