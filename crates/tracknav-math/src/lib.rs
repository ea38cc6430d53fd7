#![warn(missing_docs)]

//! Math types for the tracknav geometry and navigation crates.
//!
//! Thin wrappers around nalgebra providing the types a track navigator
//! needs: points, vectors, rigid placements of surfaces and volumes,
//! angle helpers, and the packed [`Barcode`] that identifies geometry
//! objects.

mod barcode;

pub use barcode::{Barcode, SurfaceId};

use nalgebra::{Matrix3, Matrix4, Unit, Vector2, Vector3, Vector4};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A point in a 2D local (measurement) frame.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

/// Sentinel for "no index", used for volume links that leave the world.
pub const DINDEX_INVALID: usize = usize::MAX;

/// Rigid placement of a local frame in the global frame.
///
/// Stores the local-to-global matrix and its inverse, so that both
/// directions of the frame change cost a single matrix product.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    matrix: Matrix4<f64>,
    inverse: Matrix4<f64>,
}

impl Transform {
    /// Identity placement.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
            inverse: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self::from_rotation_translation(Matrix3::identity(), Vec3::new(dx, dy, dz))
    }

    /// Rotation about the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let r = Matrix3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c);
        Self::from_rotation_translation(r, Vec3::zeros())
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let r = Matrix3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c);
        Self::from_rotation_translation(r, Vec3::zeros())
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let r = Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0);
        Self::from_rotation_translation(r, Vec3::zeros())
    }

    /// Rotation about an arbitrary axis through the origin by `angle` radians.
    ///
    /// Uses Rodrigues' rotation formula.
    pub fn rotation_about_axis(axis: &Dir3, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let (x, y, z) = (axis.x, axis.y, axis.z);
        let r = Matrix3::new(
            t * x * x + c,
            t * x * y - s * z,
            t * x * z + s * y,
            t * x * y + s * z,
            t * y * y + c,
            t * y * z - s * x,
            t * x * z - s * y,
            t * y * z + s * x,
            t * z * z + c,
        );
        Self::from_rotation_translation(r, Vec3::zeros())
    }

    /// Placement from an origin, a local z axis and a hint for the local x axis.
    ///
    /// The x hint is orthogonalized against z; if it is (nearly) parallel
    /// to z, an arbitrary perpendicular direction is used instead.
    pub fn from_axes(origin: Point3, z_axis: &Vec3, x_hint: &Vec3) -> Self {
        let z = z_axis.normalize();
        let projected = x_hint - z * x_hint.dot(&z);
        let x = if projected.norm() > 1e-12 {
            projected.normalize()
        } else {
            orthogonal(&z)
        };
        let y = z.cross(&x);
        let r = Matrix3::from_columns(&[x, y, z]);
        Self::from_rotation_translation(r, origin.coords)
    }

    /// Placement with the given local z axis at `origin`.
    pub fn from_z_axis(origin: Point3, z_axis: &Vec3) -> Self {
        let z = z_axis.normalize();
        Self::from_axes(origin, &z, &orthogonal(&z))
    }

    fn from_rotation_translation(r: Matrix3<f64>, t: Vec3) -> Self {
        let mut matrix = Matrix4::identity();
        matrix.fixed_view_mut::<3, 3>(0, 0).copy_from(&r);
        matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(&t);

        let rt = r.transpose();
        let mut inverse = Matrix4::identity();
        inverse.fixed_view_mut::<3, 3>(0, 0).copy_from(&rt);
        inverse.fixed_view_mut::<3, 1>(0, 3).copy_from(&(-(rt * t)));

        Self { matrix, inverse }
    }

    /// Compose: `self` then `other` (self * other), i.e. `other` is applied first.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
            inverse: other.inverse * self.inverse,
        }
    }

    /// The inverse placement.
    pub fn inverse(&self) -> Self {
        Self {
            matrix: self.inverse,
            inverse: self.matrix,
        }
    }

    /// The local-to-global matrix.
    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// Origin of the local frame in global coordinates.
    pub fn translation_vector(&self) -> Point3 {
        Point3::new(self.matrix[(0, 3)], self.matrix[(1, 3)], self.matrix[(2, 3)])
    }

    /// Local x axis in global coordinates.
    pub fn x(&self) -> Vec3 {
        self.column(0)
    }

    /// Local y axis in global coordinates.
    pub fn y(&self) -> Vec3 {
        self.column(1)
    }

    /// Local z axis in global coordinates (plane normal, cylinder axis).
    pub fn z(&self) -> Vec3 {
        self.column(2)
    }

    fn column(&self, i: usize) -> Vec3 {
        Vec3::new(self.matrix[(0, i)], self.matrix[(1, i)], self.matrix[(2, i)])
    }

    /// Local point to global point.
    pub fn point_to_global(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Global point to local point.
    pub fn point_to_local(&self, p: &Point3) -> Point3 {
        let v = self.inverse * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Local direction to global direction (ignores translation).
    pub fn vector_to_global(&self, v: &Vec3) -> Vec3 {
        let r = self.matrix * Vector4::new(v.x, v.y, v.z, 0.0);
        Vec3::new(r.x, r.y, r.z)
    }

    /// Global direction to local direction (ignores translation).
    pub fn vector_to_local(&self, v: &Vec3) -> Vec3 {
        let r = self.inverse * Vector4::new(v.x, v.y, v.z, 0.0);
        Vec3::new(r.x, r.y, r.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Some unit vector perpendicular to `v` (which must be normalized).
pub fn orthogonal(v: &Vec3) -> Vec3 {
    let helper = if v.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
    v.cross(&helper).normalize()
}

/// Azimuthal angle of `v` in `(-pi, pi]`.
pub fn phi(v: &Vec3) -> f64 {
    v.y.atan2(v.x)
}

/// Polar angle of `v` with respect to the z axis.
pub fn theta(v: &Vec3) -> f64 {
    perp(v).atan2(v.z)
}

/// Transverse distance of `v` from the z axis.
pub fn perp(v: &Vec3) -> f64 {
    v.x.hypot(v.y)
}

/// Wrap an angle into `[-pi, pi)`.
pub fn wrap_phi(angle: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in mm.
    pub linear: f64,
    /// Angular tolerance in radians.
    pub angular: f64,
}

impl Tolerance {
    /// Default tolerances (1e-6 mm linear, 1e-9 rad angular).
    pub const DEFAULT: Self = Self {
        linear: 1e-6,
        angular: 1e-9,
    };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_translation_round_trip() {
        let t = Transform::translation(10.0, 20.0, 30.0);
        let p = Point3::new(1.0, 2.0, 3.0);
        let g = t.point_to_global(&p);
        assert_relative_eq!(g, Point3::new(11.0, 22.0, 33.0), epsilon = 1e-12);
        assert_relative_eq!(t.point_to_local(&g), p, epsilon = 1e-12);
        // directions are not translated
        let v = Vec3::new(0.0, 1.0, 0.0);
        assert_relative_eq!(t.vector_to_global(&v), v, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_z_90() {
        let t = Transform::rotation_z(PI / 2.0);
        let p = t.point_to_global(&Point3::new(1.0, 0.0, 0.0));
        assert!(p.x.abs() < 1e-12);
        assert!((p.y - 1.0).abs() < 1e-12);
        let back = t.point_to_local(&p);
        assert!((back.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_compose_and_inverse() {
        let shift = Transform::translation(1.0, 0.0, 0.0);
        let turn = Transform::rotation_z(PI / 2.0);
        // shift first, then turn: (0,0,0) -> (1,0,0) -> (0,1,0)
        let composed = turn.then(&shift);
        let p = composed.point_to_global(&Point3::origin());
        assert_relative_eq!(p, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);

        let q = Point3::new(5.0, -6.0, 7.0);
        let round = composed.inverse().point_to_global(&composed.point_to_global(&q));
        assert_relative_eq!(round, q, epsilon = 1e-12);
    }

    #[test]
    fn test_from_axes_is_orthonormal() {
        let t = Transform::from_axes(
            Point3::new(1.0, 2.0, 3.0),
            &Vec3::new(1.0, 1.0, 0.0),
            &Vec3::new(0.0, 0.0, 1.0),
        );
        let (x, y, z) = (t.x(), t.y(), t.z());
        assert_relative_eq!(x.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(y.norm(), 1.0, epsilon = 1e-12);
        assert!(x.dot(&z).abs() < 1e-12);
        assert!(y.dot(&z).abs() < 1e-12);
        assert_relative_eq!(x.cross(&y), z, epsilon = 1e-12);
        assert_relative_eq!(x, Vec3::z(), epsilon = 1e-12);
        assert_relative_eq!(t.translation_vector(), Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_from_axes_parallel_hint() {
        let t = Transform::from_axes(Point3::origin(), &Vec3::x(), &Vec3::x());
        assert!(t.x().dot(&Vec3::x()).abs() < 1e-12);
        assert_relative_eq!(t.z(), Vec3::x(), epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_about_axis() {
        let axis = Dir3::new_normalize(Vec3::new(1.0, 1.0, 0.0));
        let t = Transform::rotation_about_axis(&axis, PI);
        let r = t.point_to_global(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(r, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_angle_helpers() {
        let v = Vec3::new(0.0, 2.0, 2.0);
        assert_relative_eq!(phi(&v), PI / 2.0);
        assert_relative_eq!(theta(&v), PI / 4.0);
        assert_relative_eq!(perp(&v), 2.0);
        assert_relative_eq!(wrap_phi(3.0 * PI / 2.0), -PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(wrap_phi(-PI / 4.0), -PI / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tolerance_points_equal() {
        let tol = Tolerance::DEFAULT;
        let a = Point3::new(1.0, 2.0, 3.0);
        assert!(tol.points_equal(&a, &Point3::new(1.0 + 1e-7, 2.0, 3.0)));
        assert!(!tol.points_equal(&a, &Point3::new(1.001, 2.0, 3.0)));
    }
}
