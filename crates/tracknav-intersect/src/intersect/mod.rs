//! Trajectory-surface intersection algorithms.
//!
//! Each shape family has a dedicated intersector; [`intersect`] dispatches
//! on the trajectory kind and the mask shape with a single `match`.

mod cone;
mod cuboid;
mod cylinder;
mod helix;
mod line;
mod plane;

pub use cone::intersect_cone;
pub use cuboid::intersect_cuboid;
pub use cylinder::{intersect_concentric_cylinder, intersect_cylinder, intersect_portal_cylinder};
pub use helix::{helix_cone, helix_cylinder, helix_line, helix_plane};
pub use line::intersect_line;
pub use plane::intersect_plane;

use tracknav_masks::Shape;
use tracknav_math::{Point3, Vec3};

use crate::config::NewtonConfig;
use crate::intersection::{nearest_inside, Intersection, IntersectionDirection, IntersectionStatus};
use crate::surface::Surface;
use crate::trajectory::{Helix, Ray, Trajectory};

/// Tolerance on the leading coefficient / discriminant of the quadratics.
pub(crate) const QUADRATIC_TOLERANCE: f64 = f64::EPSILON;

/// Below this `|n . d|` a trajectory counts as parallel to a plane.
pub(crate) const PARALLEL_TOLERANCE: f64 = 1e-12;

/// Intersect a trajectory with a surface.
///
/// Returns every solution the intersector produces (one or two records),
/// including `Missed` and `Outside` ones; callers keep what they need.
pub fn intersect(
    trajectory: &Trajectory,
    surface: &Surface,
    mask_tolerance: f64,
    newton: &NewtonConfig,
) -> Vec<Intersection> {
    match trajectory {
        Trajectory::Ray(ray) => intersect_ray(ray, surface, mask_tolerance),
        Trajectory::Helix(helix) => intersect_helix(helix, surface, mask_tolerance, newton),
    }
}

fn intersect_ray(ray: &Ray, surface: &Surface, tol: f64) -> Vec<Intersection> {
    match surface.mask.shape() {
        Shape::Rectangle | Shape::Trapezoid | Shape::Ring | Shape::Annulus => {
            vec![intersect_plane(ray, surface, tol)]
        }
        Shape::Cylinder { .. } => intersect_cylinder(ray, surface, tol).to_vec(),
        Shape::PortalCylinder => vec![intersect_portal_cylinder(ray, surface, tol)],
        Shape::ConcentricCylinder => vec![intersect_concentric_cylinder(ray, surface, tol)],
        Shape::Cone => intersect_cone(ray, surface, tol).to_vec(),
        Shape::Line { .. } => vec![intersect_line(ray, surface, tol)],
        Shape::Cuboid => intersect_cuboid(ray, surface, tol).to_vec(),
        Shape::Cylinder3 => vec![Intersection::missed(surface.barcode)],
    }
}

fn intersect_helix(
    helix: &Helix,
    surface: &Surface,
    tol: f64,
    newton: &NewtonConfig,
) -> Vec<Intersection> {
    match surface.mask.shape() {
        Shape::Rectangle | Shape::Trapezoid | Shape::Ring | Shape::Annulus => {
            vec![helix_plane(helix, surface, tol, newton)]
        }
        Shape::Cylinder { .. } => helix_cylinder(helix, surface, tol, newton).to_vec(),
        Shape::PortalCylinder | Shape::ConcentricCylinder => {
            vec![nearest_inside(&helix_cylinder(helix, surface, tol, newton))]
        }
        Shape::Cone => helix_cone(helix, surface, tol, newton).to_vec(),
        Shape::Line { .. } => vec![helix_line(helix, surface, tol, newton)],
        // volume boxes only need the local straight-line estimate
        Shape::Cuboid => intersect_cuboid(&helix.tangent(), surface, tol).to_vec(),
        Shape::Cylinder3 => vec![Intersection::missed(surface.barcode)],
    }
}

/// Re-evaluate a cached intersection against the trajectory's current state.
///
/// Keeps the nearest solution inside the mask. Returns true if the updated
/// record is still `Inside`.
pub fn update(
    trajectory: &Trajectory,
    surface: &Surface,
    record: &mut Intersection,
    mask_tolerance: f64,
    newton: &NewtonConfig,
) -> bool {
    *record = nearest_inside(&intersect(trajectory, surface, mask_tolerance, newton));
    record.is_inside()
}

/// Classify the solution at `path`, reached at global `p3` with direction `dir`.
pub(crate) fn candidate(
    surface: &Surface,
    p3: Point3,
    dir: &Vec3,
    path: f64,
    mask_tolerance: f64,
    overstep_tolerance: f64,
) -> Intersection {
    let mut is = Intersection::missed(surface.barcode);
    // NaN paths fail this comparison too
    if !(path >= overstep_tolerance) {
        return is;
    }
    let projection = surface.mask.project(&surface.transform, &p3, dir);
    is.path = path;
    is.p3 = p3;
    is.p2 = projection.measurement;
    is.direction = IntersectionDirection::from_path(path);
    is.volume_link = surface.volume_link();
    is.status = if surface.mask.is_inside(&projection.local, mask_tolerance) {
        IntersectionStatus::Inside
    } else {
        IntersectionStatus::Outside
    };
    is.cos_incidence_angle = dir.dot(&surface.normal(&p3)).abs();
    is
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracknav_masks::Mask;
    use tracknav_math::{Barcode, SurfaceId, Transform};

    fn barrel_surface(mask: Mask) -> Surface {
        Surface::new(Barcode::new(0, SurfaceId::Sensitive, 1), mask, Transform::identity())
    }

    #[test]
    fn test_dispatch_counts() {
        let ray: Trajectory = Ray::new(Point3::origin(), Vec3::x()).into();
        let newton = NewtonConfig::default();
        let cyl = barrel_surface(Mask::cylinder(10.0, -5.0, 5.0));
        assert_eq!(intersect(&ray, &cyl, 0.0, &newton).len(), 2);
        let portal = barrel_surface(Mask::portal_cylinder(10.0, -5.0, 5.0));
        assert_eq!(intersect(&ray, &portal, 0.0, &newton).len(), 1);
        let volume = barrel_surface(Mask::cylinder3(0.0, 10.0, -3.0, 3.0, -5.0, 5.0));
        let hits = intersect(&ray, &volume, 0.0, &newton);
        assert_eq!(hits[0].status, IntersectionStatus::Missed);
    }

    #[test]
    fn test_update_moves_path() {
        let surface = barrel_surface(Mask::portal_cylinder(10.0, -5.0, 5.0));
        let ray = Ray::new(Point3::origin(), Vec3::x());
        let newton = NewtonConfig::default();
        let mut record = intersect_portal_cylinder(&ray, &surface, 0.0);
        assert!((record.path - 10.0).abs() < 1e-9);

        let moved: Trajectory = ray.advanced(4.0).into();
        assert!(update(&moved, &surface, &mut record, 0.0, &newton));
        assert!((record.path - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_helix_and_ray_agree_without_field() {
        let helix = Helix::new(Point3::origin(), &Vec3::new(1.0, 0.2, 0.1), 0.1, &Vec3::zeros());
        let ray = Ray::new(Point3::origin(), Vec3::new(1.0, 0.2, 0.1));
        let newton = NewtonConfig::default();
        let plane = Surface::new(
            Barcode::new(0, SurfaceId::Sensitive, 0),
            Mask::rectangle(50.0, 50.0),
            Transform::from_z_axis(Point3::new(30.0, 0.0, 0.0), &Vec3::x()),
        );
        let h = intersect(&helix.into(), &plane, 1e-6, &newton);
        let r = intersect(&ray.into(), &plane, 1e-6, &newton);
        assert!(h[0].is_inside() && r[0].is_inside());
        assert!((h[0].path - r[0].path).abs() < 1e-6);
    }
}
