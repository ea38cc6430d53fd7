//! Ray-cone intersection (quadratic equation in the cone's local frame).

use crate::intersection::Intersection;
use crate::quadratic::QuadraticEquation;
use crate::surface::Surface;
use crate::trajectory::Ray;
use tracknav_math::{Point3, Vec3};

use super::{candidate, QUADRATIC_TOLERANCE};

/// Quadratic for `x^2 + y^2 = (z tan(alpha))^2` along a local line.
pub(crate) fn cone_quadratic(origin: &Point3, dir: &Vec3, surface: &Surface) -> QuadraticEquation {
    let tan_alpha = surface.mask.bounds()[0];
    let t2 = tan_alpha * tan_alpha;
    let lo = surface.transform.point_to_local(origin);
    let ld = surface.transform.vector_to_local(dir);

    let a = ld.x * ld.x + ld.y * ld.y - t2 * ld.z * ld.z;
    let b = 2.0 * (lo.x * ld.x + lo.y * ld.y - t2 * lo.z * ld.z);
    let c = lo.x * lo.x + lo.y * lo.y - t2 * lo.z * lo.z;
    QuadraticEquation::new(a, b, c, QUADRATIC_TOLERANCE)
}

/// Intersect a ray with a cone surface.
///
/// The implicit equation describes both nappes; the mask's z range selects
/// the physical one. Slot layout as for cylinders.
pub fn intersect_cone(ray: &Ray, surface: &Surface, mask_tolerance: f64) -> [Intersection; 2] {
    let dir = ray.dir();
    let qe = cone_quadratic(&ray.origin, &dir, surface);
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
