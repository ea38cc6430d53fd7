//! Hooks that observe the navigation state after every `init` and `update`.

use std::fmt::{self, Write};

use tracing::trace;
use tracknav_intersect::Intersection;

use crate::state::{NavigationStatus, TrustLevel};

/// Copy of the navigation state handed to inspectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Navigation status.
    pub status: NavigationStatus,
    /// Trust in the cached candidates.
    pub trust_level: TrustLevel,
    /// Current volume.
    pub volume: usize,
    /// Candidates still ahead.
    pub n_candidates: usize,
    /// Path to the next candidate.
    pub distance_to_next: f64,
    /// Candidate the track currently sits on.
    pub current: Option<Intersection>,
}

/// Observer of navigation steps.
pub trait Inspector {
    /// Called with the state after a navigation call; `message` names the call.
    fn inspect(&mut self, snapshot: &Snapshot, message: &str);
}

/// Inspector that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoidInspector;

impl Inspector for VoidInspector {
    fn inspect(&mut self, _snapshot: &Snapshot, _message: &str) {}
}

/// Accumulates a readable trace of the navigation.
#[derive(Debug, Clone, Default)]
pub struct PrintInspector {
    log: String,
}

impl PrintInspector {
    /// The trace so far.
    pub fn log(&self) -> &str {
        &self.log
    }
}

impl Inspector for PrintInspector {
    fn inspect(&mut self, s: &Snapshot, message: &str) {
        trace!(
            message,
            volume = s.volume,
            status = ?s.status,
            trust = ?s.trust_level,
            candidates = s.n_candidates,
            "navigation step"
        );
        let _ = writeln!(
            self.log,
            "{message}: volume {} | {:?} | trust {:?} | {} candidates | next at {:.4}",
            s.volume, s.status, s.trust_level, s.n_candidates, s.distance_to_next
        );
        if let Some(current) = &s.current {
            let _ = writeln!(self.log, "    on [{}] at {:?}", current.surface, current.p3);
        }
    }
}

impl fmt::Display for PrintInspector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.log)
    }
}

/// Records every object the navigator reports having reached.
#[derive(Debug, Clone, Default)]
pub struct ObjectTracer {
    objects: Vec<Intersection>,
}

impl ObjectTracer {
    /// Reached objects in order.
    pub fn objects(&self) -> &[Intersection] {
        &self.objects
    }
}

impl Inspector for ObjectTracer {
    fn inspect(&mut self, s: &Snapshot, _message: &str) {
        let reached = matches!(
            s.status,
            NavigationStatus::OnModule | NavigationStatus::OnPortal | NavigationStatus::OnTarget
        );
        let Some(current) = s.current.filter(|_| reached) else {
            return;
        };
        // repeated calls on the same surface record it once
        if self.objects.last().map(|o| o.surface) != Some(current.surface) {
            self.objects.push(current);
        }
    }
}

impl<A: Inspector, B: Inspector> Inspector for (A, B) {
    fn inspect(&mut self, snapshot: &Snapshot, message: &str) {
        self.0.inspect(snapshot, message);
        self.1.inspect(snapshot, message);
    }
}
