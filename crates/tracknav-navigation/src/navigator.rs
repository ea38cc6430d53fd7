//! The navigator: keeps a track's candidate cache in step with its position.
//!
//! A driver (a propagator or a test loop) moves the track and tells the
//! navigator how much it changed through the trust level. `update` does
//! the least work that trust level allows:
//!
//! | trust     | work                                                  |
//! |-----------|-------------------------------------------------------|
//! | `Full`    | reclassify the next candidate if it is reached        |
//! | `High`    | re-intersect the candidates ahead, re-sort            |
//! | `Fair`    | re-intersect every cached candidate, drop lost ones   |
//! | `NoTrust` | rebuild from the volume's surface finder (`init`)     |
//!
//! Running out of candidates on a portal switches to the linked volume;
//! running out elsewhere triggers one rebuild before the track is declared
//! lost.
//!
//! Candidates are evaluated with an overstep tolerance of at least the
//! on-surface tolerance, so a surface the driver stepped onto stays
//! reachable when its recomputed path comes out slightly negative.

use tracing::{debug, trace, warn};
use tracknav_geometry::Geometry;
use tracknav_intersect::{intersect, sort_by_path, update, Intersection, Trajectory};
use tracknav_math::DINDEX_INVALID;

use crate::config::NavigationConfig;
use crate::error::Result;
use crate::inspector::Inspector;
use crate::state::{NavigationState, NavigationStatus, TrustLevel};

/// Stateless navigator over a shared geometry.
///
/// One navigator serves any number of tracks; all per-track data lives in
/// [`NavigationState`].
#[derive(Debug, Clone)]
pub struct Navigator<'d, G: Geometry> {
    geometry: &'d G,
    config: NavigationConfig,
}

impl<'d, G: Geometry> Navigator<'d, G> {
    /// Navigator with validated settings.
    pub fn new(geometry: &'d G, config: NavigationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { geometry, config })
    }

    /// The geometry navigated through.
    pub fn geometry(&self) -> &'d G {
        self.geometry
    }

    /// Navigation settings.
    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// Locate the track and build its candidate cache from scratch.
    ///
    /// Returns the heartbeat: false if the track could not be placed in a
    /// volume, has nothing ahead of it, or left the world.
    pub fn init<I: Inspector>(&self, state: &mut NavigationState<I>, traj: &Trajectory) -> bool {
        let traj = &self.reachable_from(traj);
        state.heartbeat = true;
        if state.status == NavigationStatus::Unknown || state.volume >= self.geometry.n_volumes() {
            let position = traj.position();
            match self.geometry.volume_by_pos(&position) {
                Some(volume) => state.volume = volume,
                None => {
                    warn!(?position, "track outside of every volume");
                    state.abort();
                    state.run_inspector("init: no volume");
                    return false;
                }
            }
        }

        if !self.refill(state, traj) {
            state.run_inspector("init: no candidates");
            return false;
        }
        self.resolve(state, traj);
        state.run_inspector("init");
        state.heartbeat
    }

    /// Bring the candidate cache up to date after the track moved.
    ///
    /// Returns the heartbeat. Calling it again without moving the track
    /// leaves the state unchanged.
    pub fn update<I: Inspector>(&self, state: &mut NavigationState<I>, traj: &Trajectory) -> bool {
        if state.status == NavigationStatus::Unknown {
            return self.init(state, traj);
        }
        if !state.heartbeat {
            return false;
        }

        let traj = &self.reachable_from(traj);
        match state.trust {
            TrustLevel::Full => {
                let reached = state
                    .next_candidate()
                    .is_some_and(|c| self.is_on_surface(c.path));
                if state.status == NavigationStatus::TowardsObject && reached {
                    self.classify(state);
                }
            }
            TrustLevel::High => {
                if !self.refresh_ahead(state, traj) {
                    debug!(volume = state.volume, "candidate ahead lost, re-evaluating all");
                    if !self.refresh_all(state, traj) {
                        return self.init(state, traj);
                    }
                }
            }
            TrustLevel::Fair => {
                if !self.refresh_all(state, traj) {
                    return self.init(state, traj);
                }
            }
            TrustLevel::NoTrust => return self.init(state, traj),
        }

        self.resolve(state, traj);
        if state.status != NavigationStatus::Abort {
            state.trust = TrustLevel::Full;
        }
        state.run_inspector("update");
        state.heartbeat
    }

    /// `traj` with its overstep tolerance widened to the on-surface tolerance.
    fn reachable_from(&self, traj: &Trajectory) -> Trajectory {
        let overstep = traj
            .overstep_tolerance()
            .min(-self.config.on_surface_tolerance);
        traj.with_overstep_tolerance(overstep)
    }

    fn is_on_surface(&self, path: f64) -> bool {
        path.abs() < self.config.on_surface_tolerance
    }

    fn is_reachable(&self, hit: &Intersection, traj: &Trajectory) -> bool {
        hit.is_inside()
            && hit.path >= traj.overstep_tolerance()
            && hit.path <= self.config.path_limit
    }

    /// Rebuild the candidates of the current volume and classify.
    ///
    /// Aborts and returns false if nothing is reachable.
    fn refill<I: Inspector>(&self, state: &mut NavigationState<I>, traj: &Trajectory) -> bool {
        let mut indices = Vec::new();
        self.geometry.surface_candidates(
            state.volume,
            traj,
            &self.config.window(),
            &self.config.newton,
            &mut indices,
        );

        let mut candidates = Vec::with_capacity(indices.len());
        for index in indices {
            let Some(surface) = self.geometry.surface_at(index) else {
                continue;
            };
            candidates.extend(
                intersect(traj, surface, self.config.mask_tolerance, &self.config.newton)
                    .into_iter()
                    .filter(|hit| self.is_reachable(hit, traj)),
            );
        }
        sort_by_path(&mut candidates);
        trace!(volume = state.volume, candidates = candidates.len(), "filled candidates");

        if candidates.is_empty() {
            warn!(volume = state.volume, "no reachable surface");
            state.reset_candidates(candidates);
            state.abort();
            return false;
        }
        state.reset_candidates(candidates);
        state.trust = TrustLevel::Full;
        self.classify(state);
        true
    }

    /// Re-intersect the candidates ahead; false if one of them is lost.
    fn refresh_ahead<I: Inspector>(&self, state: &mut NavigationState<I>, traj: &Trajectory) -> bool {
        let next = state.next;
        for record in state.candidates.iter_mut().skip(next) {
            let Some(surface) = self.geometry.surface(record.surface) else {
                return false;
            };
            let inside = update(
                traj,
                surface,
                record,
                self.config.mask_tolerance,
                &self.config.newton,
            );
            if !inside || record.path > self.config.path_limit {
                return false;
            }
        }
        sort_by_path(&mut state.candidates[next..]);
        self.classify(state);
        true
    }

    /// Re-intersect every cached candidate and keep the reachable ones.
    ///
    /// False if none is left.
    fn refresh_all<I: Inspector>(&self, state: &mut NavigationState<I>, traj: &Trajectory) -> bool {
        let mut kept = Vec::with_capacity(state.candidates.len());
        for mut record in state.candidates.drain(..) {
            let Some(surface) = self.geometry.surface(record.surface) else {
                continue;
            };
            update(
                traj,
                surface,
                &mut record,
                self.config.mask_tolerance,
                &self.config.newton,
            );
            if self.is_reachable(&record, traj) {
                kept.push(record);
            }
        }
        sort_by_path(&mut kept);
        // both crossings of a cylinder collapse onto the nearest one
        let tolerance = self.config.on_surface_tolerance;
        kept.dedup_by(|a, b| a.surface == b.surface && (a.path - b.path).abs() < tolerance);

        if kept.is_empty() {
            return false;
        }
        state.reset_candidates(kept);
        self.classify(state);
        true
    }

    /// Set the status from the next candidate; a reached candidate becomes
    /// the current one.
    fn classify<I: Inspector>(&self, state: &mut NavigationState<I>) {
        let Some((path, portal)) = state.next_candidate().map(|c| (c.path, c.is_portal())) else {
            return;
        };
        if self.is_on_surface(path) {
            state.status = if portal {
                NavigationStatus::OnPortal
            } else {
                NavigationStatus::OnModule
            };
            state.current = Some(state.next);
            state.next += 1;
        } else {
            state.status = NavigationStatus::TowardsObject;
            state.current = None;
        }
    }

    /// Handle an exhausted cache: follow portals, leave the world, or
    /// rebuild once before aborting.
    fn resolve<I: Inspector>(&self, state: &mut NavigationState<I>, traj: &Trajectory) {
        let mut rebuilt = false;
        // every switch enters a new volume; more than that means a loop
        for _ in 0..=self.geometry.n_volumes() {
            if !state.heartbeat || !state.is_exhausted() {
                return;
            }
            if state.status == NavigationStatus::OnPortal {
                let link = state.current().map_or(DINDEX_INVALID, |c| c.volume_link);
                if link == DINDEX_INVALID {
                    debug!(volume = state.volume, "left the world");
                    state.leave_world();
                    return;
                }
                debug!(from = state.volume, to = link, "volume switch");
                state.volume = link;
            } else if rebuilt {
                warn!(volume = state.volume, "track lost");
                state.abort();
                return;
            } else {
                rebuilt = true;
            }
            if !self.refill(state, traj) {
                return;
            }
        }
        warn!(volume = state.volume, "volume switches do not settle");
        state.abort();
    }
}
