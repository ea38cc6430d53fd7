//! Closed set of boundary shapes and their static metadata.

use std::fmt;

/// Local coordinate frame a shape's inside test works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalFrame {
    /// `(x, y, 0)` on a plane.
    Cartesian2,
    /// `(x, y, z)` in the placement frame.
    Cartesian3,
    /// `(r, phi, 0)` on a plane.
    Polar2,
    /// `(r * phi, z, 0)` on a cylinder of fixed radius.
    Cylindrical2,
    /// `(r, phi, z)` around the local z axis.
    Cylindrical3,
    /// `(signed radial distance, z, 0)` around a wire.
    Line2,
}

/// Static description of a shape: name, bound count, measurement dimension
/// and local frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeInfo {
    /// Human readable name.
    pub name: &'static str,
    /// Number of bound values the shape uses.
    pub n_bounds: usize,
    /// Dimension of the measurement frame.
    pub meas_dim: usize,
    /// Frame of the inside test.
    pub frame: LocalFrame,
}

const RECTANGLE: ShapeInfo = ShapeInfo {
    name: "rectangle2D",
    n_bounds: 2,
    meas_dim: 2,
    frame: LocalFrame::Cartesian2,
};

const TRAPEZOID: ShapeInfo = ShapeInfo {
    name: "trapezoid2D",
    n_bounds: 4,
    meas_dim: 2,
    frame: LocalFrame::Cartesian2,
};

const RING: ShapeInfo = ShapeInfo {
    name: "ring2D",
    n_bounds: 2,
    meas_dim: 2,
    frame: LocalFrame::Polar2,
};

const ANNULUS: ShapeInfo = ShapeInfo {
    name: "annulus2D",
    n_bounds: 4,
    meas_dim: 2,
    frame: LocalFrame::Polar2,
};

const CYLINDER: ShapeInfo = ShapeInfo {
    name: "cylinder2D",
    n_bounds: 3,
    meas_dim: 2,
    frame: LocalFrame::Cylindrical2,
};

const CYLINDER_RADIAL: ShapeInfo = ShapeInfo {
    name: "cylinder2D",
    n_bounds: 3,
    meas_dim: 2,
    frame: LocalFrame::Cylindrical3,
};

const PORTAL_CYLINDER: ShapeInfo = ShapeInfo {
    name: "portal_cylinder2D",
    n_bounds: 3,
    meas_dim: 2,
    frame: LocalFrame::Cylindrical2,
};

const CONCENTRIC_CYLINDER: ShapeInfo = ShapeInfo {
    name: "concentric_cylinder2D",
    n_bounds: 3,
    meas_dim: 2,
    frame: LocalFrame::Cylindrical2,
};

const CONE: ShapeInfo = ShapeInfo {
    name: "cone2D",
    n_bounds: 3,
    meas_dim: 2,
    frame: LocalFrame::Cylindrical3,
};

const LINE: ShapeInfo = ShapeInfo {
    name: "line_radial",
    n_bounds: 2,
    meas_dim: 2,
    frame: LocalFrame::Line2,
};

const LINE_SQUARE: ShapeInfo = ShapeInfo {
    name: "line_square",
    n_bounds: 2,
    meas_dim: 2,
    frame: LocalFrame::Cartesian3,
};

const CUBOID: ShapeInfo = ShapeInfo {
    name: "cuboid3D",
    n_bounds: 6,
    meas_dim: 3,
    frame: LocalFrame::Cartesian3,
};

const CYLINDER3: ShapeInfo = ShapeInfo {
    name: "cylinder3D",
    n_bounds: 6,
    meas_dim: 3,
    frame: LocalFrame::Cylindrical3,
};

/// Largest bound count of any shape.
pub const MAX_BOUNDS: usize = 6;

/// Boundary shape of a surface or volume.
///
/// The bound layout per variant:
///
/// | shape | bounds |
/// |---|---|
/// | `Rectangle` | `[half_x, half_y]` |
/// | `Trapezoid` | `[half_x at -half_y, half_x at +half_y, half_y, 1 / (2 half_y)]` |
/// | `Ring` | `[inner_r, outer_r]` |
/// | `Annulus` | `[min_r, max_r, min_phi, max_phi]` |
/// | `Cylinder`, `PortalCylinder`, `ConcentricCylinder` | `[r, lower_z, upper_z]` |
/// | `Cone` | `[tan(half opening angle), min_z, max_z]`, apex at the local origin |
/// | `Line` | `[cross_section, half_z]` |
/// | `Cuboid` | `[min_x, min_y, min_z, max_x, max_y, max_z]` |
/// | `Cylinder3` | `[min_r, min_phi, min_z, max_r, max_phi, max_z]` |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Planar rectangle.
    Rectangle,
    /// Planar trapezoid, symmetric in x.
    Trapezoid,
    /// Planar ring (disc when the inner radius is zero).
    Ring,
    /// Planar disc sector.
    Annulus,
    /// Cylinder surface; `check_radius` adds a radial consistency check.
    Cylinder {
        /// Check that the local point lies on the radius.
        check_radius: bool,
    },
    /// Cylinder used as a volume boundary; only the nearest crossing matters.
    PortalCylinder,
    /// Cylinder whose axis is the global z axis.
    ConcentricCylinder,
    /// Cone around the local z axis.
    Cone,
    /// Wire with radial (`square == false`) or square cross-section.
    Line {
        /// Square cell instead of a radial one.
        square: bool,
    },
    /// Axis-aligned box, used for volume bounds.
    Cuboid,
    /// Cylindrical shell sector, used for volume bounds.
    Cylinder3,
}

impl Shape {
    /// Static metadata of this shape.
    pub fn info(&self) -> &'static ShapeInfo {
        match self {
            Self::Rectangle => &RECTANGLE,
            Self::Trapezoid => &TRAPEZOID,
            Self::Ring => &RING,
            Self::Annulus => &ANNULUS,
            Self::Cylinder { check_radius: false } => &CYLINDER,
            Self::Cylinder { check_radius: true } => &CYLINDER_RADIAL,
            Self::PortalCylinder => &PORTAL_CYLINDER,
            Self::ConcentricCylinder => &CONCENTRIC_CYLINDER,
            Self::Cone => &CONE,
            Self::Line { square: false } => &LINE,
            Self::Line { square: true } => &LINE_SQUARE,
            Self::Cuboid => &CUBOID,
            Self::Cylinder3 => &CYLINDER3,
        }
    }

    /// Name of the shape.
    pub fn name(&self) -> &'static str {
        self.info().name
    }

    /// Number of bound values.
    pub fn n_bounds(&self) -> usize {
        self.info().n_bounds
    }

    /// Frame the inside test works in.
    pub fn frame(&self) -> LocalFrame {
        self.info().frame
    }

    /// True for shapes lying in the local xy plane.
    pub fn is_planar(&self) -> bool {
        matches!(
            self,
            Self::Rectangle | Self::Trapezoid | Self::Ring | Self::Annulus
        )
    }

    /// True for the cylinder family.
    pub fn is_cylinder(&self) -> bool {
        matches!(
            self,
            Self::Cylinder { .. } | Self::PortalCylinder | Self::ConcentricCylinder
        )
    }

    /// True for shapes that bound volumes rather than surfaces.
    pub fn is_volume(&self) -> bool {
        matches!(self, Self::Cuboid | Self::Cylinder3)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
