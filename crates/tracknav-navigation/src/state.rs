//! Per-track navigation state.

use tracknav_intersect::Intersection;
use tracknav_math::{Barcode, DINDEX_INVALID};

use crate::inspector::{Inspector, Snapshot, VoidInspector};

/// Where the track stands relative to the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationStatus {
    /// Navigation failed; the track is lost.
    Abort,
    /// The track left the world through a portal.
    OnTarget,
    /// Not initialized yet.
    Unknown,
    /// Between objects, heading to the next candidate.
    TowardsObject,
    /// On a sensitive or passive surface.
    OnModule,
    /// On a portal.
    OnPortal,
}

/// Confidence in the cached candidates, from none to full.
///
/// Drivers lower it after they changed the track; the navigator always
/// leaves it at `Full`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TrustLevel {
    /// Rebuild the candidates from scratch.
    NoTrust,
    /// Re-evaluate every cached candidate.
    Fair,
    /// Only the candidates ahead may have moved.
    High,
    /// Nothing changed since the last update.
    Full,
}

/// Candidate cache and status of one track.
///
/// `candidates[next..]` are the objects still ahead, sorted by path.
/// `current`, if set, indexes the candidate the track sits on.
#[derive(Debug, Clone)]
pub struct NavigationState<I: Inspector = VoidInspector> {
    pub(crate) candidates: Vec<Intersection>,
    pub(crate) next: usize,
    pub(crate) current: Option<usize>,
    pub(crate) status: NavigationStatus,
    pub(crate) trust: TrustLevel,
    pub(crate) volume: usize,
    pub(crate) heartbeat: bool,
    inspector: I,
}

impl Default for NavigationState<VoidInspector> {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationState<VoidInspector> {
    /// Fresh state without an inspector.
    pub fn new() -> Self {
        Self::with_inspector(VoidInspector)
    }
}

impl<I: Inspector> NavigationState<I> {
    /// Fresh state reporting to `inspector`.
    pub fn with_inspector(inspector: I) -> Self {
        Self {
            candidates: Vec::new(),
            next: 0,
            current: None,
            status: NavigationStatus::Unknown,
            trust: TrustLevel::NoTrust,
            volume: 0,
            heartbeat: false,
            inspector,
        }
    }

    /// Navigation status.
    pub fn status(&self) -> NavigationStatus {
        self.status
    }

    /// Trust in the cached candidates.
    pub fn trust_level(&self) -> TrustLevel {
        self.trust
    }

    /// Current volume; `DINDEX_INVALID` once the world is left.
    pub fn volume(&self) -> usize {
        self.volume
    }

    /// False once navigation ended, by leaving the world or by aborting.
    pub fn heartbeat(&self) -> bool {
        self.heartbeat
    }

    /// Number of candidates still ahead.
    pub fn n_candidates(&self) -> usize {
        self.candidates.len().saturating_sub(self.next)
    }

    /// Candidates still ahead, nearest first.
    pub fn candidates(&self) -> &[Intersection] {
        self.candidates.get(self.next..).unwrap_or_default()
    }

    /// The candidate the track sits on, if any.
    pub fn current(&self) -> Option<&Intersection> {
        self.current.and_then(|i| self.candidates.get(i))
    }

    /// Barcode of the object the track sits on, or an invalid barcode.
    pub fn current_object(&self) -> Barcode {
        self.current().map_or_else(Barcode::invalid, |c| c.surface)
    }

    /// The nearest candidate ahead, if any.
    pub fn next_candidate(&self) -> Option<&Intersection> {
        self.candidates.get(self.next)
    }

    /// Barcode of the nearest candidate ahead, or an invalid barcode.
    pub fn next_object(&self) -> Barcode {
        self.next_candidate()
            .map_or_else(Barcode::invalid, |c| c.surface)
    }

    /// Path to the nearest candidate ahead, as of the last update.
    ///
    /// Infinite when no candidate is left.
    pub fn distance_to_next(&self) -> f64 {
        self.next_candidate().map_or(f64::INFINITY, |c| c.path)
    }

    /// True if no candidate is left ahead.
    pub fn is_exhausted(&self) -> bool {
        self.next >= self.candidates.len()
    }

    /// True on a sensitive or passive surface.
    pub fn is_on_module(&self) -> bool {
        self.status == NavigationStatus::OnModule
    }

    /// True on a portal.
    pub fn is_on_portal(&self) -> bool {
        self.status == NavigationStatus::OnPortal
    }

    /// True once the track left the world.
    pub fn is_complete(&self) -> bool {
        self.status == NavigationStatus::OnTarget && !self.heartbeat
    }

    /// The attached inspector.
    pub fn inspector(&self) -> &I {
        &self.inspector
    }

    /// The attached inspector, mutably.
    pub fn inspector_mut(&mut self) -> &mut I {
        &mut self.inspector
    }

    /// Lower the trust to `High`; never raises it.
    pub fn set_high_trust(&mut self) {
        self.trust = self.trust.min(TrustLevel::High);
    }

    /// Lower the trust to `Fair`; never raises it.
    pub fn set_fair_trust(&mut self) {
        self.trust = self.trust.min(TrustLevel::Fair);
    }

    /// Drop all trust; the next update starts over.
    pub fn set_no_trust(&mut self) {
        self.trust = TrustLevel::NoTrust;
    }

    /// Stop navigation.
    pub fn abort(&mut self) {
        self.status = NavigationStatus::Abort;
        self.heartbeat = false;
    }

    /// Copy of the observable state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status,
            trust_level: self.trust,
            volume: self.volume,
            n_candidates: self.n_candidates(),
            distance_to_next: self.distance_to_next(),
            current: self.current().copied(),
        }
    }

    pub(crate) fn run_inspector(&mut self, message: &str) {
        let snapshot = self.snapshot();
        self.inspector.inspect(&snapshot, message);
    }

    /// Replace the candidates and forget the position in them.
    pub(crate) fn reset_candidates(&mut self, candidates: Vec<Intersection>) {
        self.candidates = candidates;
        self.next = 0;
        self.current = None;
    }

    pub(crate) fn leave_world(&mut self) {
        self.status = NavigationStatus::OnTarget;
        self.heartbeat = false;
        self.volume = DINDEX_INVALID;
    }
}
