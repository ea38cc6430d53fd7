#![warn(missing_docs)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

//! Navigation for tracknav: steers a track through a detector one surface
//! at a time.
//!
//! # Architecture
//!
//! - [`Navigator`]: stateless; builds and refreshes candidate caches
//!   against a shared [`Geometry`](tracknav_geometry::Geometry)
//! - [`NavigationState`]: per-track candidates, status and [`TrustLevel`]
//! - [`Inspector`]: hooks observing every navigation call
//! - [`NavigationConfig`]: tolerances, loadable from TOML
//!
//! # Example
//!
//! ```ignore
//! let nav = Navigator::new(&detector, NavigationConfig::default())?;
//! let mut state = NavigationState::new();
//! nav.init(&mut state, &traj);
//! while state.heartbeat() {
//!     traj = traj.advanced(state.distance_to_next());
//!     state.set_high_trust();
//!     nav.update(&mut state, &traj);
//! }
//! ```

pub mod config;
pub mod error;
pub mod inspector;
mod navigator;
mod state;

pub use config::NavigationConfig;
pub use error::{NavigationError, Result};
pub use inspector::{Inspector, ObjectTracer, PrintInspector, Snapshot, VoidInspector};
pub use navigator::Navigator;
pub use state::{NavigationState, NavigationStatus, TrustLevel};
