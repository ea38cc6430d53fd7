//! Helix-surface intersection (Newton-Raphson on the path length).
//!
//! Every intersector seeds the iteration from the straight-line solution
//! along the helix tangent and refines it until successive path estimates
//! agree within [`NewtonConfig::tolerance`]. A vanishing derivative or an
//! exhausted iteration budget yields a `Missed` record.

use tracing::trace;
use tracknav_math::perp;

use crate::config::NewtonConfig;
use crate::intersection::{Intersection, IntersectionStatus};
use crate::quadratic::QuadraticEquation;
use crate::surface::Surface;
use crate::trajectory::Helix;

use super::cone::cone_quadratic;
use super::cylinder::cylinder_quadratic;
use super::{candidate, PARALLEL_TOLERANCE};

/// Fraction of the straight-line root used as starting point.
const SEED_SCALE: f64 = 0.95;

/// Newton-Raphson on `f(s)`; `eval` returns `(f(s), f'(s))`.
fn newton(config: &NewtonConfig, seed: f64, eval: impl Fn(f64) -> (f64, f64)) -> Option<f64> {
    let mut s = seed;
    for _ in 0..config.max_iterations {
        let (value, derivative) = eval(s);
        if derivative == 0.0 || !derivative.is_finite() {
            return None;
        }
        let next = s - value / derivative;
        if (next - s).abs() < config.tolerance {
            return Some(next);
        }
        s = next;
    }
    None
}

fn build(
    helix: &Helix,
    surface: &Surface,
    path: Option<f64>,
    mask_tolerance: f64,
) -> Intersection {
    match path {
        Some(s) => candidate(
            surface,
            helix.pos(s),
            &helix.dir(s),
            s,
            mask_tolerance,
            helix.overstep_tolerance(),
        ),
        None => {
            trace!(surface = %surface.barcode, "helix intersection did not converge");
            Intersection::missed(surface.barcode)
        }
    }
}

/// Two starting points from the tangent-line solutions, or `fallback` twice.
fn seeds(qe: &QuadraticEquation, fallback: f64) -> [f64; 2] {
    match qe.solutions() {
        0 => [fallback, fallback],
        1 => [SEED_SCALE * qe.smaller(); 2],
        _ => [SEED_SCALE * qe.smaller(), SEED_SCALE * qe.larger()],
    }
}

/// Run Newton from each distinct seed.
fn solve_pair(
    helix: &Helix,
    surface: &Surface,
    config: &NewtonConfig,
    seeds: [f64; 2],
    mask_tolerance: f64,
    eval: impl Fn(f64) -> (f64, f64),
) -> [Intersection; 2] {
    let first = build(helix, surface, newton(config, seeds[0], &eval), mask_tolerance);
    if (seeds[0] - seeds[1]).abs() < config.tolerance {
        return [first, Intersection::missed(surface.barcode)];
    }
    let second = build(helix, surface, newton(config, seeds[1], &eval), mask_tolerance);
    [first, second]
}

/// Intersect a helix with a planar surface.
pub fn helix_plane(
    helix: &Helix,
    surface: &Surface,
    mask_tolerance: f64,
    config: &NewtonConfig,
) -> Intersection {
    let normal = surface.transform.z();
    let center = surface.transform.translation_vector();

    let start_denom = normal.dot(&helix.dir(0.0));
    let seed = if start_denom.abs() > PARALLEL_TOLERANCE {
        normal.dot(&(center - helix.pos(0.0))) / start_denom
    } else {
        0.0
    };

    let path = newton(config, seed, |s| {
        (
            normal.dot(&(helix.pos(s) - center)),
            normal.dot(&helix.dir(s)),
        )
    });
    build(helix, surface, path, mask_tolerance)
}

/// Intersect a helix with a cylinder surface.
///
/// After convergence the hit must also lie on the radius within the mask
/// tolerance, otherwise it is `Outside`.
pub fn helix_cylinder(
    helix: &Helix,
    surface: &Surface,
    mask_tolerance: f64,
    config: &NewtonConfig,
) -> [Intersection; 2] {
    let r = surface.mask.bounds()[0];
    let sz = surface.transform.z();
    let sc = surface.transform.translation_vector();

    let start_dir = helix.dir(0.0);
    let qe = cylinder_quadratic(&helix.pos(0.0), &start_dir, surface);
    let fallback = r * perp(&start_dir);

    let mut hits = solve_pair(
        helix,
        surface,
        config,
        seeds(&qe, fallback),
        mask_tolerance,
        |s| {
            let crp = (helix.pos(s) - sc).cross(&sz);
            let dcr = helix.dir(s).cross(&sz);
            (crp.norm_squared() - r * r, 2.0 * crp.dot(&dcr))
        },
    );

    for hit in hits.iter_mut().filter(|h| h.is_inside()) {
        let local = surface.transform.point_to_local(&hit.p3);
        if (r - perp(&local.coords)).abs() >= mask_tolerance + 5.0 * f64::EPSILON {
            hit.status = IntersectionStatus::Outside;
        }
    }
    hits
}

/// Intersect a helix with a cone surface.
pub fn helix_cone(
    helix: &Helix,
    surface: &Surface,
    mask_tolerance: f64,
    config: &NewtonConfig,
) -> [Intersection; 2] {
    let tan_alpha = surface.mask.bounds()[0];
    let t2 = tan_alpha * tan_alpha;
    let trf = &surface.transform;

    let qe = cone_quadratic(&helix.pos(0.0), &helix.dir(0.0), surface);
    solve_pair(helix, surface, config, seeds(&qe, 0.0), mask_tolerance, |s| {
        let p = trf.point_to_local(&helix.pos(s));
        let d = trf.vector_to_local(&helix.dir(s));
        (
            p.x * p.x + p.y * p.y - t2 * p.z * p.z,
            2.0 * (p.x * d.x + p.y * d.y - t2 * p.z * d.z),
        )
    })
}

/// Intersect a helix with a wire: the point of closest approach.
///
/// The derivative drops the curvature term, which keeps the iteration
/// stable for the small bending over a wire cell.
pub fn helix_line(
    helix: &Helix,
    surface: &Surface,
    mask_tolerance: f64,
    config: &NewtonConfig,
) -> Intersection {
    let wire_dir = surface.transform.z();
    let wire_pos = surface.transform.translation_vector();

    let seed = {
        let d = helix.dir(0.0);
        let zd = wire_dir.dot(&d);
        let denom = 1.0 - zd * zd;
        if denom > PARALLEL_TOLERANCE {
            let offset = wire_pos - helix.pos(0.0);
            (offset.dot(&d) - zd * offset.dot(&wire_dir)) / denom
        } else {
            return Intersection::missed(surface.barcode);
        }
    };

    let path = newton(config, seed, |s| {
        let d = helix.dir(s);
        let w = helix.pos(s) - wire_pos;
        let w_perp = w - wire_dir * w.dot(&wire_dir);
        let zd = wire_dir.dot(&d);
        (d.dot(&w_perp), 1.0 - zd * zd)
    });
    let mut is = build(helix, surface, path, mask_tolerance);
    if let Some(s) = path {
        is.cos_incidence_angle = wire_dir.dot(&helix.dir(s)).abs();
    }
    is
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tracknav_masks::Mask;
    use tracknav_math::{Barcode, Point3, SurfaceId, Transform, Vec3};

    fn sensitive(mask: Mask, transform: Transform) -> Surface {
        Surface::new(Barcode::new(0, SurfaceId::Sensitive, 0), mask, transform)
    }

    #[test]
    fn test_helix_plane_hits_curved_point() {
        // radius 100 circle in the xy plane, bending towards +y
        let helix = Helix::new(Point3::origin(), &Vec3::x(), -0.01, &Vec3::z());
        let plane = sensitive(
            Mask::rectangle(100.0, 100.0),
            Transform::from_axes(Point3::new(50.0, 0.0, 0.0), &Vec3::x(), &Vec3::y()),
        );
        let hit = helix_plane(&helix, &plane, 1e-6, &NewtonConfig::default());
        assert!(hit.is_inside());
        // x = R sin(s / R) = 50
        assert_relative_eq!(hit.path, 100.0 * (0.5f64).asin(), epsilon = 1e-6);
        assert_relative_eq!(hit.p3.x, 50.0, epsilon = 1e-6);
        let expected_y = 100.0 - (100.0f64.powi(2) - 50.0f64.powi(2)).sqrt();
        assert_relative_eq!(hit.p3.y, expected_y, epsilon = 1e-6);
    }

    #[test]
    fn test_helix_cylinder_radial_track() {
        // concentric cylinder of radius 30 around the helix origin
        let helix = Helix::new(Point3::origin(), &Vec3::new(1.0, 0.0, 0.5), -0.002, &Vec3::z());
        let cyl = sensitive(Mask::cylinder(30.0, -100.0, 100.0), Transform::identity());
        let config = NewtonConfig::default();
        let hits = helix_cylinder(&helix, &cyl, 1e-6, &config);
        let inside: Vec<_> = hits.iter().filter(|h| h.is_inside()).collect();
        assert_eq!(inside.len(), 1);
        let hit = inside[0];
        assert!(hit.path > 0.0);
        assert_relative_eq!(perp(&hit.p3.coords), 30.0, epsilon = 1e-4);
        assert_relative_eq!((helix.pos(hit.path) - hit.p3).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_helix_cylinder_iteration_cap() {
        let helix = Helix::new(Point3::origin(), &Vec3::x(), -0.002, &Vec3::z());
        let cyl = sensitive(Mask::cylinder(30.0, -100.0, 100.0), Transform::identity());
        let config = NewtonConfig {
            tolerance: 1e-4,
            max_iterations: 1,
        };
        let hits = helix_cylinder(&helix, &cyl, 1e-6, &config);
        assert!(hits.iter().all(|h| !h.is_inside()));
    }

    #[test]
    fn test_helix_cylinder_radial_check_uses_mask_tolerance() {
        // a loose Newton tolerance stops after one step, off the radius by
        // a few hundredths of a millimeter
        let helix = Helix::new(Point3::origin(), &Vec3::x(), -0.002, &Vec3::z());
        let cyl = sensitive(Mask::cylinder(30.0, -100.0, 100.0), Transform::identity());
        let config = NewtonConfig {
            tolerance: 10.0,
            max_iterations: 1000,
        };
        let tight = helix_cylinder(&helix, &cyl, 1e-6, &config);
        assert!(tight.iter().all(|h| !h.is_inside()));

        let loose = helix_cylinder(&helix, &cyl, 0.5, &config);
        assert_eq!(loose.iter().filter(|h| h.is_inside()).count(), 1);
    }

    #[test]
    fn test_helix_line() {
        let helix = Helix::new(Point3::new(0.0, 0.0, 0.0), &Vec3::x(), -1e-4, &Vec3::z());
        let wire = sensitive(Mask::line(5.0, 50.0), Transform::translation(20.0, 0.0, 0.0));
        let hit = helix_line(&helix, &wire, 1e-6, &NewtonConfig::default());
        assert!(hit.is_inside());
        assert_relative_eq!(hit.p3.x, 20.0, epsilon = 1e-3);
        // sagitta of a radius 1e4 circle after 20 mm
        assert_relative_eq!(hit.p2.x.abs(), 0.02, epsilon = 1e-3);
    }

    #[test]
    fn test_helix_cone_straight_limit() {
        let helix = Helix::new(Point3::new(-20.0, 0.0, 10.0), &Vec3::x(), 0.0, &Vec3::z());
        let cone = sensitive(Mask::cone(1.0, 0.0, 20.0), Transform::identity());
        let hits = helix_cone(&helix, &cone, 1e-6, &NewtonConfig::default());
        assert!(hits.iter().all(|h| h.is_inside()));
        assert_relative_eq!(hits[0].path, 10.0, epsilon = 1e-6);
        assert_relative_eq!(hits[1].path, 30.0, epsilon = 1e-6);
    }
}
