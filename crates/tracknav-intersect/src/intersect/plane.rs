//! Ray-plane intersection (closed form).

use crate::intersection::Intersection;
use crate::surface::Surface;
use crate::trajectory::Ray;

use super::{candidate, PARALLEL_TOLERANCE};

/// Intersect a ray with a planar surface (rectangle, trapezoid, ring, annulus).
///
/// The plane passes through the placement origin with the local z axis
/// as normal. Parallel rays and hits behind the overstep tolerance are
/// `Missed`.
pub fn intersect_plane(ray: &Ray, surface: &Surface, mask_tolerance: f64) -> Intersection {
    let normal = surface.transform.z();
    let center = surface.transform.translation_vector();
    let dir = ray.dir();

    let denom = dir.dot(&normal);
    if denom.abs() < PARALLEL_TOLERANCE {
        return Intersection::missed(surface.barcode);
    }

    let path = normal.dot(&(center - ray.origin)) / denom;
    candidate(
        surface,
        ray.at(path),
        &dir,
        path,
        mask_tolerance,
        ray.overstep_tolerance(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intersection::{IntersectionDirection, IntersectionStatus};
    use approx::assert_relative_eq;
    use tracknav_masks::Mask;
    use tracknav_math::{Barcode, Point3, SurfaceId, Transform, Vec3};

    fn plane_at_x(x: f64, half: f64) -> Surface {
        Surface::new(
            Barcode::new(0, SurfaceId::Sensitive, 0),
            Mask::rectangle(half, half),
            Transform::from_z_axis(Point3::new(x, 0.0, 0.0), &Vec3::x()),
        )
    }

    #[test]
    fn test_plane_ahead() {
        let ray = Ray::new(Point3::origin(), Vec3::x());
        let hit = intersect_plane(&ray, &plane_at_x(50.0, 20.0), 1e-6);
        assert_eq!(hit.status, IntersectionStatus::Inside);
        assert_eq!(hit.direction, IntersectionDirection::Along);
        assert_relative_eq!(hit.path, 50.0, epsilon = 1e-12);
        assert!(hit.p2.x.abs() < 1e-12 && hit.p2.y.abs() < 1e-12);
        assert_relative_eq!(hit.cos_incidence_angle, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_plane_behind() {
        let surface = plane_at_x(-10.0, 20.0);
        let ray = Ray::new(Point3::origin(), Vec3::x());
        assert_eq!(
            intersect_plane(&ray, &surface, 1e-6).status,
            IntersectionStatus::Missed
        );

        // allowing backward intersections
        let back = ray.with_overstep_tolerance(-f64::MAX);
        let hit = intersect_plane(&back, &surface, 1e-6);
        assert_eq!(hit.status, IntersectionStatus::Inside);
        assert_eq!(hit.direction, IntersectionDirection::Opposite);
        assert_relative_eq!(hit.path, -10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_plane_outside_and_parallel() {
        let surface = plane_at_x(50.0, 20.0);
        let off = Ray::new(Point3::new(0.0, 30.0, 0.0), Vec3::x());
        assert_eq!(
            intersect_plane(&off, &surface, 1e-6).status,
            IntersectionStatus::Outside
        );
        let parallel = Ray::new(Point3::origin(), Vec3::y());
        assert_eq!(
            intersect_plane(&parallel, &surface, 1e-6).status,
            IntersectionStatus::Missed
        );
    }

    #[test]
    fn test_plane_oblique_incidence() {
        let ray = Ray::new(Point3::origin(), Vec3::new(1.0, 1.0, 0.0));
        let hit = intersect_plane(&ray, &plane_at_x(10.0, 20.0), 1e-6);
        assert_relative_eq!(hit.path, 10.0 * 2f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(hit.cos_incidence_angle, 1.0 / 2f64.sqrt(), epsilon = 1e-12);
        // local y axis of from_z_axis(x) is an arbitrary perpendicular: check the radius
        assert_relative_eq!(hit.p2.coords.norm(), 10.0, epsilon = 1e-9);
    }
}
