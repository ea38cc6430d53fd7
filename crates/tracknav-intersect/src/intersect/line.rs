//! Ray-wire intersection: point of closest approach to the wire axis.

use crate::intersection::Intersection;
use crate::surface::Surface;
use crate::trajectory::Ray;

use super::candidate;

/// Below this `1 - (d . z)^2` the ray runs along the wire.
const ALONG_WIRE: f64 = 1e-5;

/// Intersect a ray with a wire (line surface).
///
/// The "intersection" is the point of closest approach between the ray and
/// the wire axis; its measurement is the signed distance to the wire and
/// the position along it.
pub fn intersect_line(ray: &Ray, surface: &Surface, mask_tolerance: f64) -> Intersection {
    let wire_dir = surface.transform.z();
    let wire_pos = surface.transform.translation_vector();
    let dir = ray.dir();

    let zd = wire_dir.dot(&dir);
    let denom = 1.0 - zd * zd;
    if denom < ALONG_WIRE {
        return Intersection::missed(surface.barcode);
    }

    let offset = wire_pos - ray.origin;
    let td = offset.dot(&dir);
    let tz = offset.dot(&wire_dir);
    let path = (td - zd * tz) / denom;

    let mut is = candidate(
        surface,
        ray.at(path),
        &dir,
        path,
        mask_tolerance,
        ray.overstep_tolerance(),
    );
    is.cos_incidence_angle = zd.abs();
    is
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intersection::IntersectionStatus;
    use approx::assert_relative_eq;
    use tracknav_masks::Mask;
    use tracknav_math::{Barcode, Point3, SurfaceId, Transform, Vec3};

    fn wire() -> Surface {
        // wire along global z through (10, 0, 0)
        Surface::new(
            Barcode::new(0, SurfaceId::Sensitive, 0),
            Mask::line(1.0, 50.0),
            Transform::translation(10.0, 0.0, 0.0),
        )
    }

    #[test]
    fn test_closest_approach() {
        let ray = Ray::new(Point3::new(0.0, 0.5, 3.0), Vec3::x());
        let hit = intersect_line(&ray, &wire(), 1e-6);
        assert_eq!(hit.status, IntersectionStatus::Inside);
        assert_relative_eq!(hit.path, 10.0, epsilon = 1e-12);
        assert_relative_eq!(hit.p2.x.abs(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(hit.p2.y, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_outside_cell_and_parallel() {
        let far = Ray::new(Point3::new(0.0, 1.5, 0.0), Vec3::x());
        assert_eq!(intersect_line(&far, &wire(), 1e-6).status, IntersectionStatus::Outside);

        let along = Ray::new(Point3::new(10.0, 0.5, 0.0), Vec3::z());
        assert_eq!(intersect_line(&along, &wire(), 1e-6).status, IntersectionStatus::Missed);
    }

    #[test]
    fn test_tilted_ray() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 1.0));
        let hit = intersect_line(&ray, &wire(), 1e-6);
        // a line crossing the wire axis: distance zero at (10, 0, 10)
        assert_relative_eq!(hit.p3, Point3::new(10.0, 0.0, 10.0), epsilon = 1e-9);
        assert!(hit.p2.x.abs() < 1e-9);
    }
}
