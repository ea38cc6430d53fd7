//! Placed, bounded surface: what the intersectors work on.

use tracknav_masks::{BoundingBox, Mask, Result, Shape};
use tracknav_math::{perp, Barcode, Point3, Transform, Vec3};

/// A surface of the detector: identity, boundary and placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    /// Identity of the surface.
    pub barcode: Barcode,
    /// Boundary and volume link.
    pub mask: Mask,
    /// Placement of the mask's local frame.
    pub transform: Transform,
}

impl Surface {
    /// New surface.
    pub fn new(barcode: Barcode, mask: Mask, transform: Transform) -> Self {
        Self {
            barcode,
            mask,
            transform,
        }
    }

    /// True for portals.
    pub fn is_portal(&self) -> bool {
        self.barcode.is_portal()
    }

    /// Volume reached through this surface.
    pub fn volume_link(&self) -> usize {
        self.mask.volume_link()
    }

    /// Global axis-aligned box around the surface.
    pub fn global_bounds(&self, envelope: f64) -> Result<BoundingBox> {
        Ok(self.mask.local_min_bounds(envelope)?.to_global(&self.transform))
    }

    /// Unit normal of the surface at global point `p`.
    pub fn normal(&self, p: &Point3) -> Vec3 {
        let trf = &self.transform;
        let local = trf.point_to_local(p);
        let radial = |loc: &Point3| {
            let r = perp(&loc.coords);
            if r > 0.0 {
                Vec3::new(loc.x / r, loc.y / r, 0.0)
            } else {
                Vec3::x()
            }
        };
        let local_normal = match self.mask.shape() {
            Shape::Rectangle | Shape::Trapezoid | Shape::Ring | Shape::Annulus => Vec3::z(),
            Shape::Cylinder { .. }
            | Shape::PortalCylinder
            | Shape::ConcentricCylinder
            | Shape::Line { .. }
            | Shape::Cylinder3 => radial(&local),
            Shape::Cone => {
                let tan_alpha = self.mask.bounds()[0];
                let r = radial(&local);
                Vec3::new(r.x, r.y, -tan_alpha * local.z.signum()).normalize()
            }
            Shape::Cuboid => cuboid_face_normal(self.mask.bounds(), &local),
        };
        trf.vector_to_global(&local_normal)
    }
}

/// Normal of the cuboid face closest to `local`.
fn cuboid_face_normal(b: &[f64], local: &Point3) -> Vec3 {
    let mut best = (f64::INFINITY, Vec3::z());
    for i in 0..3 {
        for (bound, sign) in [(b[i], -1.0), (b[i + 3], 1.0)] {
            let d = (local[i] - bound).abs();
            if d < best.0 {
                let mut n = Vec3::zeros();
                n[i] = sign;
                best = (d, n);
            }
        }
    }
    best.1
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tracknav_math::SurfaceId;

    fn surface(mask: Mask, transform: Transform) -> Surface {
        Surface::new(Barcode::new(0, SurfaceId::Sensitive, 0), mask, transform)
    }

    #[test]
    fn test_plane_normal_follows_placement() {
        let s = surface(
            Mask::rectangle(1.0, 1.0),
            Transform::from_z_axis(Point3::new(5.0, 0.0, 0.0), &Vec3::x()),
        );
        assert_relative_eq!(s.normal(&Point3::new(5.0, 0.3, 0.2)), Vec3::x(), epsilon = 1e-12);
    }

    #[test]
    fn test_cylinder_normal_is_radial() {
        let s = surface(Mask::cylinder(10.0, -5.0, 5.0), Transform::identity());
        assert_relative_eq!(s.normal(&Point3::new(0.0, 10.0, 2.0)), Vec3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_cuboid_normal() {
        let s = surface(
            Mask::cuboid(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0)),
            Transform::identity(),
        );
        assert_relative_eq!(s.normal(&Point3::new(0.2, -1.0, 0.1)), -Vec3::y());
    }

    #[test]
    fn test_global_bounds() {
        let s = surface(Mask::rectangle(2.0, 3.0), Transform::translation(0.0, 0.0, 10.0));
        let bb = s.global_bounds(0.5).unwrap();
        assert_relative_eq!(bb.min.z, 9.5);
        assert_relative_eq!(bb.max.y, 3.5);
    }
}
