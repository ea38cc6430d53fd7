//! Shape + bounds + volume link, with inside tests and frame projections.

use std::f64::consts::TAU;

use tracknav_math::{perp, phi, Point2, Point3, Transform, Vec3, DINDEX_INVALID};

use crate::bbox::BoundingBox;
use crate::error::{MaskError, Result};
use crate::shape::{LocalFrame, Shape, MAX_BOUNDS};

/// Radial slack of the cylinder radius check, in units of the mask tolerance.
const RADIAL_CHECK_FACTOR: f64 = 10.0;

/// A global point expressed in a mask's frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Point in the frame the inside test works in.
    pub local: Point3,
    /// Point in the 2D measurement frame.
    pub measurement: Point2,
}

/// Boundary of a surface or volume: a shape, its bound values and the
/// volume reached when the surface is crossed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mask {
    shape: Shape,
    bounds: [f64; MAX_BOUNDS],
    volume_link: usize,
    unbounded: bool,
}

impl Mask {
    fn from_slice(shape: Shape, values: &[f64]) -> Self {
        let mut bounds = [0.0; MAX_BOUNDS];
        bounds[..values.len()].copy_from_slice(values);
        Self {
            shape,
            bounds,
            volume_link: DINDEX_INVALID,
            unbounded: false,
        }
    }

    /// Mask from a shape and its bound values, checking count and consistency.
    pub fn new(shape: Shape, values: &[f64]) -> Result<Self> {
        let expected = shape.n_bounds();
        if values.len() != expected {
            return Err(MaskError::BoundCount {
                shape: shape.name(),
                expected,
                found: values.len(),
            });
        }
        let mask = Self::from_slice(shape, values);
        mask.validate()?;
        Ok(mask)
    }

    /// Rectangle with half lengths `half_x`, `half_y`.
    pub fn rectangle(half_x: f64, half_y: f64) -> Self {
        Self::from_slice(Shape::Rectangle, &[half_x, half_y])
    }

    /// Trapezoid with half lengths in x at `-half_y` and `+half_y`.
    pub fn trapezoid(half_x_neg_y: f64, half_x_pos_y: f64, half_y: f64) -> Self {
        Self::from_slice(
            Shape::Trapezoid,
            &[half_x_neg_y, half_x_pos_y, half_y, 1.0 / (2.0 * half_y)],
        )
    }

    /// Ring between `inner_r` and `outer_r` (a disc for `inner_r == 0`).
    pub fn ring(inner_r: f64, outer_r: f64) -> Self {
        Self::from_slice(Shape::Ring, &[inner_r, outer_r])
    }

    /// Disc sector between two radii and two azimuthal angles.
    pub fn annulus(min_r: f64, max_r: f64, min_phi: f64, max_phi: f64) -> Self {
        Self::from_slice(Shape::Annulus, &[min_r, max_r, min_phi, max_phi])
    }

    /// Cylinder of radius `r` between `lower_z` and `upper_z`.
    pub fn cylinder(r: f64, lower_z: f64, upper_z: f64) -> Self {
        Self::from_slice(Shape::Cylinder { check_radius: false }, &[r, lower_z, upper_z])
    }

    /// Cylinder that also checks the local point lies on its radius.
    pub fn cylinder_checked(r: f64, lower_z: f64, upper_z: f64) -> Self {
        Self::from_slice(Shape::Cylinder { check_radius: true }, &[r, lower_z, upper_z])
    }

    /// Cylinder used as a portal.
    pub fn portal_cylinder(r: f64, lower_z: f64, upper_z: f64) -> Self {
        Self::from_slice(Shape::PortalCylinder, &[r, lower_z, upper_z])
    }

    /// Cylinder around the global z axis.
    pub fn concentric_cylinder(r: f64, lower_z: f64, upper_z: f64) -> Self {
        Self::from_slice(Shape::ConcentricCylinder, &[r, lower_z, upper_z])
    }

    /// Cone with apex at the local origin, opening along local z.
    pub fn cone(tan_half_angle: f64, min_z: f64, max_z: f64) -> Self {
        Self::from_slice(Shape::Cone, &[tan_half_angle, min_z, max_z])
    }

    /// Wire with a radial cell of `cross_section`.
    pub fn line(cross_section: f64, half_z: f64) -> Self {
        Self::from_slice(Shape::Line { square: false }, &[cross_section, half_z])
    }

    /// Wire with a square cell of half width `cross_section`.
    pub fn square_line(cross_section: f64, half_z: f64) -> Self {
        Self::from_slice(Shape::Line { square: true }, &[cross_section, half_z])
    }

    /// Axis-aligned box between `min` and `max`.
    pub fn cuboid(min: Point3, max: Point3) -> Self {
        Self::from_slice(Shape::Cuboid, &[min.x, min.y, min.z, max.x, max.y, max.z])
    }

    /// Cylindrical shell sector.
    pub fn cylinder3(
        min_r: f64,
        max_r: f64,
        min_phi: f64,
        max_phi: f64,
        min_z: f64,
        max_z: f64,
    ) -> Self {
        Self::from_slice(
            Shape::Cylinder3,
            &[min_r, min_phi, min_z, max_r, max_phi, max_z],
        )
    }

    /// Set the volume reached through this surface.
    pub fn with_volume_link(mut self, volume: usize) -> Self {
        self.volume_link = volume;
        self
    }

    /// Drop the boundary check: every local point is inside.
    pub fn unbounded(mut self) -> Self {
        self.unbounded = true;
        self
    }

    /// Shape of the mask.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Bound values, in the layout documented on [`Shape`].
    pub fn bounds(&self) -> &[f64] {
        &self.bounds[..self.shape.n_bounds()]
    }

    /// Volume reached through this surface, or `DINDEX_INVALID` for the world exit.
    pub fn volume_link(&self) -> usize {
        self.volume_link
    }

    /// True if the boundary check is disabled.
    pub fn is_unbounded(&self) -> bool {
        self.unbounded
    }

    /// Check the bound values for consistency.
    pub fn validate(&self) -> Result<()> {
        let b = &self.bounds;
        let name = self.shape.name();
        let check = |ok: bool, reason: &str| {
            if ok && b.iter().all(|v| !v.is_nan()) {
                Ok(())
            } else {
                Err(MaskError::InvalidBounds {
                    shape: name,
                    reason: reason.to_string(),
                })
            }
        };
        match self.shape {
            Shape::Rectangle => check(b[0] >= 0.0 && b[1] >= 0.0, "negative half length"),
            Shape::Trapezoid => check(
                b[0] >= 0.0 && b[1] >= 0.0 && b[2] > 0.0,
                "half lengths must be positive",
            ),
            Shape::Ring => check(0.0 <= b[0] && b[0] <= b[1], "radii out of order"),
            Shape::Annulus => {
                check(0.0 <= b[0] && b[0] <= b[1], "radii out of order")?;
                check(b[2] <= b[3], "phi range out of order")
            }
            Shape::Cylinder { .. } | Shape::PortalCylinder | Shape::ConcentricCylinder => {
                check(b[0] > 0.0, "radius must be positive")?;
                check(b[1] <= b[2], "z range out of order")
            }
            Shape::Cone => {
                check(b[0] > 0.0, "opening angle must be positive")?;
                check(b[1] <= b[2], "z range out of order")
            }
            Shape::Line { .. } => check(b[0] >= 0.0 && b[1] >= 0.0, "negative extent"),
            Shape::Cuboid => check((0..3).all(|i| b[i] <= b[i + 3]), "min above max"),
            Shape::Cylinder3 => {
                check(0.0 <= b[0] && b[0] <= b[3], "radii out of order")?;
                check(b[1] <= b[4], "phi range out of order")?;
                check(b[2] <= b[5], "z range out of order")
            }
        }
    }

    /// Inside test of a point given in the shape's local frame.
    ///
    /// `tol` widens (or, when negative, narrows) every boundary.
    pub fn is_inside(&self, local: &Point3, tol: f64) -> bool {
        if self.unbounded {
            return true;
        }
        let b = &self.bounds;
        match self.shape {
            Shape::Rectangle => local.x.abs() <= b[0] + tol && local.y.abs() <= b[1] + tol,
            Shape::Trapezoid => {
                let rel_y = (b[2] + local.y) * b[3];
                let half_x = b[0] + rel_y * (b[1] - b[0]);
                local.y.abs() <= b[2] + tol && local.x.abs() <= half_x + tol
            }
            Shape::Ring => in_range(local.x, b[0], b[1], tol),
            Shape::Annulus => {
                in_range(local.x, b[0], b[1], tol)
                    && phi_in_range(local.y, b[2], b[3], angular_tolerance(tol, local.x))
            }
            Shape::Cylinder { check_radius: false }
            | Shape::PortalCylinder
            | Shape::ConcentricCylinder => in_range(local.y, b[1], b[2], tol),
            Shape::Cylinder { check_radius: true } => {
                let slack = RADIAL_CHECK_FACTOR * tol.max(f64::EPSILON * b[0]);
                (local.x - b[0]).abs() <= slack && in_range(local.z, b[1], b[2], tol)
            }
            Shape::Cone => in_range(local.z, b[1], b[2], tol),
            Shape::Line { square: false } => {
                local.x.abs() <= b[0] + tol && local.y.abs() <= b[1] + tol
            }
            Shape::Line { square: true } => {
                local.x.abs() <= b[0] + tol
                    && local.y.abs() <= b[0] + tol
                    && local.z.abs() <= b[1] + tol
            }
            Shape::Cuboid => (0..3).all(|i| in_range(local[i], b[i], b[i + 3], tol)),
            Shape::Cylinder3 => {
                in_range(local.x, b[0], b[3], tol)
                    && in_range(local.z, b[2], b[5], tol)
                    && phi_in_range(local.y, b[1], b[4], angular_tolerance(tol, local.x))
            }
        }
    }

    /// Express a global point (reached with global direction `dir`) in this
    /// mask's local and measurement frames, for placement `trf`.
    pub fn project(&self, trf: &Transform, global: &Point3, dir: &Vec3) -> Projection {
        let loc = trf.point_to_local(global);
        let b = &self.bounds;
        match self.shape.frame() {
            LocalFrame::Cartesian2 => Projection {
                local: Point3::new(loc.x, loc.y, 0.0),
                measurement: Point2::new(loc.x, loc.y),
            },
            LocalFrame::Polar2 => {
                let (r, ph) = (perp(&loc.coords), phi(&loc.coords));
                Projection {
                    local: Point3::new(r, ph, 0.0),
                    measurement: Point2::new(r, ph),
                }
            }
            LocalFrame::Cylindrical2 => {
                let r_phi = b[0] * phi(&loc.coords);
                Projection {
                    local: Point3::new(r_phi, loc.z, 0.0),
                    measurement: Point2::new(r_phi, loc.z),
                }
            }
            LocalFrame::Cylindrical3 => {
                let (r, ph) = (perp(&loc.coords), phi(&loc.coords));
                let arc_r = if self.shape.is_cylinder() { b[0] } else { r };
                Projection {
                    local: Point3::new(r, ph, loc.z),
                    measurement: Point2::new(arc_r * ph, loc.z),
                }
            }
            LocalFrame::Line2 => {
                let r = signed_radius(&loc, &trf.vector_to_local(dir));
                Projection {
                    local: Point3::new(r, loc.z, 0.0),
                    measurement: Point2::new(r, loc.z),
                }
            }
            LocalFrame::Cartesian3 => {
                let measurement = match self.shape {
                    Shape::Line { .. } => {
                        Point2::new(signed_radius(&loc, &trf.vector_to_local(dir)), loc.z)
                    }
                    _ => Point2::new(loc.x, loc.y),
                };
                Projection {
                    local: loc,
                    measurement,
                }
            }
        }
    }

    /// Smallest local axis-aligned box around the shape, grown by `envelope`.
    pub fn local_min_bounds(&self, envelope: f64) -> Result<BoundingBox> {
        if envelope <= 0.0 || envelope.is_nan() {
            return Err(MaskError::InvalidEnvelope(envelope));
        }
        let b = &self.bounds;
        let (min, max) = match self.shape {
            Shape::Rectangle => ([-b[0], -b[1], 0.0], [b[0], b[1], 0.0]),
            Shape::Trapezoid => {
                let hx = b[0].max(b[1]);
                ([-hx, -b[2], 0.0], [hx, b[2], 0.0])
            }
            Shape::Ring | Shape::Annulus => ([-b[1], -b[1], 0.0], [b[1], b[1], 0.0]),
            Shape::Cylinder { .. } | Shape::PortalCylinder | Shape::ConcentricCylinder => {
                ([-b[0], -b[0], b[1]], [b[0], b[0], b[2]])
            }
            Shape::Cone => {
                let r = b[0] * b[1].abs().max(b[2].abs());
                ([-r, -r, b[1]], [r, r, b[2]])
            }
            Shape::Line { .. } => ([-b[0], -b[0], -b[1]], [b[0], b[0], b[1]]),
            Shape::Cuboid => ([b[0], b[1], b[2]], [b[3], b[4], b[5]]),
            Shape::Cylinder3 => ([-b[3], -b[3], b[2]], [b[3], b[3], b[5]]),
        };
        let mut bbox = BoundingBox::new(Point3::from(min), Point3::from(max));
        bbox.expand(envelope);
        Ok(bbox)
    }
}

fn in_range(v: f64, lo: f64, hi: f64, tol: f64) -> bool {
    v >= lo - tol && v <= hi + tol
}

/// Linear tolerance at radius `r` as an angle.
fn angular_tolerance(tol: f64, r: f64) -> f64 {
    if r > f64::EPSILON {
        tol / r
    } else {
        tol
    }
}

/// Periodic test of `phi` against `[min, max]`.
fn phi_in_range(phi: f64, min: f64, max: f64, tol: f64) -> bool {
    let span = max - min;
    if span + 2.0 * tol >= TAU {
        return true;
    }
    let d = (phi - min).rem_euclid(TAU);
    d <= span + tol || d >= TAU - tol
}

/// Distance of `loc` from the local z axis, signed by the side of the wire
/// the trajectory passes on.
fn signed_radius(loc: &Point3, local_dir: &Vec3) -> f64 {
    let r = perp(&loc.coords);
    let side = local_dir.cross(&Vec3::z()).dot(&Vec3::new(loc.x, loc.y, 0.0));
    if side < 0.0 {
        -r
    } else {
        r
    }
}
