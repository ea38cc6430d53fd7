//! Classified result of a trajectory-surface intersection.

use tracknav_math::{Barcode, Point2, Point3, DINDEX_INVALID};

/// Where the trajectory meets the surface relative to the surface bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IntersectionStatus {
    /// No solution, or the solution lies behind the overstep tolerance.
    #[default]
    Missed,
    /// The unbounded surface is hit outside the mask.
    Outside,
    /// The surface is hit inside the mask.
    Inside,
    /// The trajectory sits on the target surface.
    OnTarget,
}

/// Whether the hit lies ahead of or behind the trajectory's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IntersectionDirection {
    /// Non-negative path length.
    #[default]
    Along,
    /// Negative path length.
    Opposite,
}

impl IntersectionDirection {
    /// Direction from the sign bit of a path length.
    pub fn from_path(path: f64) -> Self {
        if path.is_sign_negative() {
            Self::Opposite
        } else {
            Self::Along
        }
    }
}

/// One solution of a trajectory-surface intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Path length from the trajectory's position to the hit.
    pub path: f64,
    /// Global position of the hit.
    pub p3: Point3,
    /// Hit in the surface's measurement frame.
    pub p2: Point2,
    /// Classification of the hit.
    pub status: IntersectionStatus,
    /// Sign of the path length.
    pub direction: IntersectionDirection,
    /// Surface that was intersected.
    pub surface: Barcode,
    /// Volume reached through the surface.
    pub volume_link: usize,
    /// Cosine of the angle between trajectory and surface normal.
    pub cos_incidence_angle: f64,
}

impl Default for Intersection {
    fn default() -> Self {
        Self {
            path: f64::INFINITY,
            p3: Point3::origin(),
            p2: Point2::origin(),
            status: IntersectionStatus::Missed,
            direction: IntersectionDirection::Along,
            surface: Barcode::invalid(),
            volume_link: DINDEX_INVALID,
            cos_incidence_angle: 1.0,
        }
    }
}

impl Intersection {
    /// A missed intersection with `surface`.
    pub fn missed(surface: Barcode) -> Self {
        Self {
            surface,
            ..Self::default()
        }
    }

    /// True if the hit is within the surface bounds.
    pub fn is_inside(&self) -> bool {
        self.status == IntersectionStatus::Inside
    }

    /// True if the intersected surface is a portal.
    pub fn is_portal(&self) -> bool {
        self.surface.is_portal()
    }
}

/// Sort intersections by ascending path length.
pub fn sort_by_path(hits: &mut [Intersection]) {
    hits.sort_by(|a, b| a.path.total_cmp(&b.path));
}

/// The valid hit with the smallest path, or the first record if none is valid.
pub fn nearest_inside(hits: &[Intersection]) -> Intersection {
    hits.iter()
        .filter(|h| h.is_inside())
        .min_by(|a, b| a.path.total_cmp(&b.path))
        .or_else(|| hits.first())
        .copied()
        .unwrap_or_default()
}
