//! Trajectories the intersectors can sample: straight rays and helices.
//!
//! The stepper that propagates a track is not part of this crate; a
//! trajectory is a local model of the track at its current position.

use tracknav_masks::BoundingBox;
use tracknav_math::{Dir3, Point3, Vec3};

/// Curvature below which a helix is treated as a straight line.
const STRAIGHT_CURVATURE: f64 = 1e-12;

/// A ray in 3D space defined by origin and direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Unit direction of the ray.
    pub direction: Dir3,
    /// Precomputed reciprocal of direction components for fast slab tests.
    inv_direction: Vec3,
    /// Sign of direction components (0 if positive, 1 if negative).
    sign: [usize; 3],
    overstep_tolerance: f64,
}

impl Ray {
    /// Create a new ray from origin and direction (normalized internally).
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        let dir = Dir3::new_normalize(direction);
        let inv = Vec3::new(1.0 / dir.x, 1.0 / dir.y, 1.0 / dir.z);
        Self {
            origin,
            direction: dir,
            inv_direction: inv,
            sign: [
                usize::from(inv.x < 0.0),
                usize::from(inv.y < 0.0),
                usize::from(inv.z < 0.0),
            ],
            overstep_tolerance: 0.0,
        }
    }

    /// Set the (non-positive) path length behind the origin that still counts
    /// as reachable.
    pub fn with_overstep_tolerance(mut self, tolerance: f64) -> Self {
        self.overstep_tolerance = tolerance;
        self
    }

    /// Path length behind the origin that still counts as reachable.
    pub fn overstep_tolerance(&self) -> f64 {
        self.overstep_tolerance
    }

    /// Point at path length `s`.
    pub fn at(&self, s: f64) -> Point3 {
        self.origin + self.direction.as_ref() * s
    }

    /// Unit direction as a plain vector.
    pub fn dir(&self) -> Vec3 {
        self.direction.into_inner()
    }

    /// The same ray with its origin moved by `s` along the direction.
    pub fn advanced(&self, s: f64) -> Self {
        Self {
            origin: self.at(s),
            ..*self
        }
    }

    /// Ray-box test using the slab method.
    ///
    /// Returns the entry and exit path lengths, which may be negative when
    /// the box lies (partly) behind the origin.
    pub fn intersect_aabb(&self, bbox: &BoundingBox) -> Option<(f64, f64)> {
        let bounds = [bbox.min, bbox.max];
        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;

        for axis in 0..3 {
            let near = (bounds[self.sign[axis]][axis] - self.origin[axis]) * self.inv_direction[axis];
            let far =
                (bounds[1 - self.sign[axis]][axis] - self.origin[axis]) * self.inv_direction[axis];
            // 0 * inf for an origin on a slab parallel to the ray
            if near.is_nan() || far.is_nan() {
                continue;
            }
            t_min = t_min.max(near);
            t_max = t_max.min(far);
        }

        (t_max >= t_min).then_some((t_min, t_max))
    }
}

/// Helix of a charged particle in a homogeneous magnetic field.
///
/// With field direction `h0`, initial direction `t0`, `n0 = h0 x t0` and
/// `delta = h0 . t0`:
///
/// ```text
/// pos(s) = p0 + delta s h0 + sin(K s) / K (t0 - delta h0) + (1 - cos(K s)) / K n0
/// dir(s) = delta h0 + cos(K s) (t0 - delta h0) + sin(K s) n0
/// ```
///
/// where `K = -q/p |B|` is the curvature of the path.
#[derive(Debug, Clone, Copy)]
pub struct Helix {
    pos0: Point3,
    t0: Vec3,
    h0: Vec3,
    n0: Vec3,
    delta: f64,
    k: f64,
    overstep_tolerance: f64,
}

impl Helix {
    /// Helix through `pos` with direction `dir`, charge over momentum `qop`
    /// in the field `b_field`.
    pub fn new(pos: Point3, dir: &Vec3, qop: f64, b_field: &Vec3) -> Self {
        let field = b_field.norm();
        let h0 = if field > 0.0 { b_field / field } else { Vec3::z() };
        Self::from_parts(pos, dir.normalize(), h0, -qop * field, 0.0)
    }

    fn from_parts(pos0: Point3, t0: Vec3, h0: Vec3, k: f64, overstep_tolerance: f64) -> Self {
        Self {
            pos0,
            t0,
            h0,
            n0: h0.cross(&t0),
            delta: h0.dot(&t0),
            k,
            overstep_tolerance,
        }
    }

    /// Set the (non-positive) path length behind the origin that still counts
    /// as reachable.
    pub fn with_overstep_tolerance(mut self, tolerance: f64) -> Self {
        self.overstep_tolerance = tolerance;
        self
    }

    /// Path length behind the origin that still counts as reachable.
    pub fn overstep_tolerance(&self) -> f64 {
        self.overstep_tolerance
    }

    /// Signed path curvature.
    pub fn curvature(&self) -> f64 {
        self.k
    }

    fn is_straight(&self) -> bool {
        self.k.abs() < STRAIGHT_CURVATURE
    }

    /// Point at path length `s`.
    pub fn pos(&self, s: f64) -> Point3 {
        if self.is_straight() {
            return self.pos0 + self.t0 * s;
        }
        let (sin_ks, cos_ks) = (self.k * s).sin_cos();
        let transverse = self.t0 - self.h0 * self.delta;
        self.pos0
            + self.h0 * (self.delta * s)
            + transverse * (sin_ks / self.k)
            + self.n0 * ((1.0 - cos_ks) / self.k)
    }

    /// Unit tangent at path length `s`.
    pub fn dir(&self, s: f64) -> Vec3 {
        if self.is_straight() {
            return self.t0;
        }
        let (sin_ks, cos_ks) = (self.k * s).sin_cos();
        let transverse = self.t0 - self.h0 * self.delta;
        self.h0 * self.delta + transverse * cos_ks + self.n0 * sin_ks
    }

    /// Tangent ray at the helix origin.
    pub fn tangent(&self) -> Ray {
        Ray::new(self.pos0, self.t0).with_overstep_tolerance(self.overstep_tolerance)
    }

    /// The same helix restarted at path length `s`.
    pub fn advanced(&self, s: f64) -> Self {
        Self::from_parts(
            self.pos(s),
            self.dir(s).normalize(),
            self.h0,
            self.k,
            self.overstep_tolerance,
        )
    }
}

/// A trajectory the navigator can follow.
#[derive(Debug, Clone, Copy)]
pub enum Trajectory {
    /// Straight line.
    Ray(Ray),
    /// Helix in a homogeneous field.
    Helix(Helix),
}

impl Trajectory {
    /// Point at path length `s`.
    pub fn pos(&self, s: f64) -> Point3 {
        match self {
            Self::Ray(ray) => ray.at(s),
            Self::Helix(helix) => helix.pos(s),
        }
    }

    /// Unit tangent at path length `s`.
    pub fn dir(&self, s: f64) -> Vec3 {
        match self {
            Self::Ray(ray) => ray.dir(),
            Self::Helix(helix) => helix.dir(s),
        }
    }

    /// Current position.
    pub fn position(&self) -> Point3 {
        self.pos(0.0)
    }

    /// Current direction.
    pub fn direction(&self) -> Vec3 {
        self.dir(0.0)
    }

    /// Path length behind the origin that still counts as reachable.
    pub fn overstep_tolerance(&self) -> f64 {
        match self {
            Self::Ray(ray) => ray.overstep_tolerance(),
            Self::Helix(helix) => helix.overstep_tolerance(),
        }
    }

    /// The same trajectory restarted at path length `s`.
    pub fn advanced(&self, s: f64) -> Self {
        match self {
            Self::Ray(ray) => Self::Ray(ray.advanced(s)),
            Self::Helix(helix) => Self::Helix(helix.advanced(s)),
        }
    }

    /// The same trajectory with another overstep tolerance.
    pub fn with_overstep_tolerance(&self, tolerance: f64) -> Self {
        match self {
            Self::Ray(ray) => Self::Ray(ray.with_overstep_tolerance(tolerance)),
            Self::Helix(helix) => Self::Helix(helix.with_overstep_tolerance(tolerance)),
        }
    }
}

impl From<Ray> for Trajectory {
    fn from(ray: Ray) -> Self {
        Self::Ray(ray)
    }
}

impl From<Helix> for Trajectory {
    fn from(helix: Helix) -> Self {
        Self::Helix(helix)
    }
}
