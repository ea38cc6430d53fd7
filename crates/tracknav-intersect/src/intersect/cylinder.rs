//! Ray-cylinder intersection (quadratic equation).

use tracknav_math::{Point3, Vec3};

use crate::intersection::Intersection;
use crate::quadratic::QuadraticEquation;
use crate::surface::Surface;
use crate::trajectory::Ray;

use super::{candidate, QUADRATIC_TOLERANCE};

/// Below this `|d_x|` the concentric intersector solves in the swapped frame.
const SWAP_THRESHOLD: f64 = 1e-3;

/// Quadratic in the path length for a line `origin + s dir` against the
/// cylinder of `surface` (axis = placement z, radius = first bound).
///
/// With `sz` the axis and `sc` the placement origin:
/// `|(origin - sc + s dir) x sz|^2 = r^2`.
pub(crate) fn cylinder_quadratic(origin: &Point3, dir: &Vec3, surface: &Surface) -> QuadraticEquation {
    let r = surface.mask.bounds()[0];
    let sz = surface.transform.z();
    let sc = surface.transform.translation_vector();

    let pc_cross_sz = (origin - sc).cross(&sz);
    let rd_cross_sz = dir.cross(&sz);
    let a = rd_cross_sz.norm_squared();
    let b = 2.0 * rd_cross_sz.dot(&pc_cross_sz);
    let c = pc_cross_sz.norm_squared() - r * r;
    QuadraticEquation::new(a, b, c, QUADRATIC_TOLERANCE)
}

/// Intersect a ray with a cylinder surface.
///
/// Both solutions are classified independently: slot 0 holds the smaller
/// path, slot 1 the larger. A single (double) root fills slot 0 only; no
/// real root leaves both slots `Missed`.
pub fn intersect_cylinder(ray: &Ray, surface: &Surface, mask_tolerance: f64) -> [Intersection; 2] {
    let dir = ray.dir();
    let qe = cylinder_quadratic(&ray.origin, &dir, surface);
    let build = |path: f64| {
        candidate(
            surface,
            ray.at(path),
            &dir,
            path,
            mask_tolerance,
            ray.overstep_tolerance(),
        )
    };
    let missed = Intersection::missed(surface.barcode);
    match qe.solutions() {
        2 => [build(qe.smaller()), build(qe.larger())],
        1 => [build(qe.smaller()), missed],
        _ => [missed, missed],
    }
}

/// Intersect a ray with a portal cylinder: only the nearest reachable
/// crossing is returned.
pub fn intersect_portal_cylinder(ray: &Ray, surface: &Surface, mask_tolerance: f64) -> Intersection {
    let dir = ray.dir();
    let overstep = ray.overstep_tolerance();
    let qe = cylinder_quadratic(&ray.origin, &dir, surface);

    let path = match qe.solutions() {
        0 => return Intersection::missed(surface.barcode),
        1 => qe.smaller(),
        _ if qe.larger() < overstep => return Intersection::missed(surface.barcode),
        _ if qe.smaller() >= overstep => qe.smaller(),
        _ => qe.larger(),
    };
    candidate(surface, ray.at(path), &dir, path, mask_tolerance, overstep)
}

/// Intersect a ray with a cylinder whose axis is the global z axis.
///
/// Solves the circle equation in the transverse plane; the coordinates are
/// swapped when the ray runs (almost) along y to keep the slope finite.
/// Returns the nearest reachable crossing.
pub fn intersect_concentric_cylinder(
    ray: &Ray,
    surface: &Surface,
    mask_tolerance: f64,
) -> Intersection {
    let r = surface.mask.bounds()[0];
    let dir = ray.dir();
    let overstep = ray.overstep_tolerance();

    if dir.x.hypot(dir.y) < QUADRATIC_TOLERANCE {
        return Intersection::missed(surface.barcode);
    }

    let swap = dir.x.abs() < SWAP_THRESHOLD;
    let (ox, oy, dx, dy) = if swap {
        (ray.origin.y, ray.origin.x, dir.y, dir.x)
    } else {
        (ray.origin.x, ray.origin.y, dir.x, dir.y)
    };

    // y = k x + d
    let k = dy / dx;
    let d = oy - k * ox;
    let qe = QuadraticEquation::new(1.0 + k * k, 2.0 * k * d, d * d - r * r, QUADRATIC_TOLERANCE);

    let to_path = |x: f64| (x - ox) / dx;
    let path = match qe.solutions() {
        0 => return Intersection::missed(surface.barcode),
        1 => to_path(qe.smaller()),
        _ => {
            let (t0, t1) = (to_path(qe.smaller()), to_path(qe.larger()));
            let (near, far) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
            if near >= overstep {
                near
            } else {
                far
            }
        }
    };
    candidate(surface, ray.at(path), &dir, path, mask_tolerance, overstep)
}
