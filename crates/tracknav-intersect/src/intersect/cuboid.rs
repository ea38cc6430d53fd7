//! Ray-box intersection for cuboid volume bounds (slab method).

use tracknav_masks::BoundingBox;
use tracknav_math::Point3;

use crate::intersection::Intersection;
use crate::surface::Surface;
use crate::trajectory::Ray;

use super::candidate;

/// Entry and exit of a ray through a cuboid, in that order.
pub fn intersect_cuboid(ray: &Ray, surface: &Surface, mask_tolerance: f64) -> [Intersection; 2] {
    let missed = Intersection::missed(surface.barcode);
    let b = surface.mask.bounds();
    let bbox = BoundingBox::new(Point3::new(b[0], b[1], b[2]), Point3::new(b[3], b[4], b[5]));

    let trf = &surface.transform;
    let local = Ray::new(trf.point_to_local(&ray.origin), trf.vector_to_local(&ray.dir()));
    let Some((entry, exit)) = local.intersect_aabb(&bbox) else {
        return [missed, missed];
    };

    let dir = ray.dir();
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
    [build(entry), build(exit)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intersection::IntersectionStatus;
    use approx::assert_relative_eq;
    use tracknav_masks::Mask;
    use tracknav_math::{Barcode, SurfaceId, Transform, Vec3};

    fn unit_box() -> Surface {
        Surface::new(
            Barcode::new(0, SurfaceId::Passive, 0),
            Mask::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0)),
            Transform::translation(5.0, 0.0, 0.0),
        )
    }

    #[test]
    fn test_entry_and_exit() {
        let ray = Ray::new(Point3::new(0.0, 0.5, 0.5), Vec3::x());
        let [entry, exit] = intersect_cuboid(&ray, &unit_box(), 1e-9);
        assert!(entry.is_inside() && exit.is_inside());
        assert_relative_eq!(entry.path, 5.0, epsilon = 1e-12);
        assert_relative_eq!(exit.path, 6.0, epsilon = 1e-12);
        assert_relative_eq!(entry.cos_incidence_angle, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_origin_inside_box() {
        let ray = Ray::new(Point3::new(5.5, 0.5, 0.5), Vec3::x());
        let [entry, exit] = intersect_cuboid(&ray, &unit_box(), 1e-9);
        assert_eq!(entry.status, IntersectionStatus::Missed);
        assert_relative_eq!(exit.path, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_miss() {
        let ray = Ray::new(Point3::new(0.0, 5.0, 0.5), Vec3::x());
        let hits = intersect_cuboid(&ray, &unit_box(), 1e-9);
        assert!(hits.iter().all(|h| h.status == IntersectionStatus::Missed));
    }
}
