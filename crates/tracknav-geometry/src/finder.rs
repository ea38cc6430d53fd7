//! Per-volume surface finders: brute force or a 2D grid on a reference surface.

use std::f64::consts::PI;

use tracknav_grid::{
    AxisBinning, AxisBounds, AxisLabel, AxisSpec, EdgeRange, Grid, MultiAxis, Owned, Populator,
    SearchWindow,
};
use tracknav_intersect::{intersect, nearest_inside, NewtonConfig, Surface, Trajectory};
use tracknav_masks::Mask;
use tracknav_math::{Barcode, Point3, Transform};

use crate::error::{GeometryError, Result};

/// Mask tolerance used when intersecting the (unbounded) reference surface.
const REFERENCE_TOLERANCE: f64 = 1.0;

/// How a volume narrows down the surfaces worth intersecting.
#[derive(Debug, Clone, Default)]
pub enum SurfaceFinder {
    /// Every surface of the volume is a candidate.
    #[default]
    BruteForce,
    /// Surfaces binned on a reference surface.
    Grid(SurfaceGrid),
}

/// Surfaces binned in the local 2D frame of an unbounded reference surface.
///
/// Cylinder references bin `(r * phi, z)`, disc references `(r, phi)`.
#[derive(Debug, Clone)]
pub struct SurfaceGrid {
    reference: Surface,
    grid: Grid<usize, 2>,
}

impl SurfaceGrid {
    /// Grid on a cylinder of `radius` around the placement z axis.
    pub fn cylinder(
        transform: Transform,
        radius: f64,
        z_range: [f64; 2],
        n_phi: u32,
        n_z: u32,
        capacity: usize,
    ) -> Result<Self> {
        if radius <= 0.0 {
            return Err(GeometryError::InvalidConfig(format!(
                "grid radius must be positive, got {radius}"
            )));
        }
        let reference = Surface::new(
            Barcode::invalid(),
            Mask::cylinder(radius, z_range[0], z_range[1]).unbounded(),
            transform,
        );
        let axes = MultiAxis::new(
            [
                AxisSpec::new(AxisLabel::RPhi, AxisBounds::Circular, AxisBinning::Regular),
                AxisSpec::new(AxisLabel::Z, AxisBounds::Closed, AxisBinning::Regular),
            ],
            Owned::new(
                vec![EdgeRange::new(0, n_phi), EdgeRange::new(2, n_z)],
                vec![-PI * radius, PI * radius, z_range[0], z_range[1]],
            ),
        )?;
        Ok(Self {
            reference,
            grid: Grid::new(axes, Populator::Attach { capacity }),
        })
    }

    /// Grid on a disc perpendicular to the placement z axis.
    pub fn disc(
        transform: Transform,
        r_range: [f64; 2],
        n_r: u32,
        n_phi: u32,
        capacity: usize,
    ) -> Result<Self> {
        let reference = Surface::new(
            Barcode::invalid(),
            Mask::ring(r_range[0], r_range[1]).unbounded(),
            transform,
        );
        let axes = MultiAxis::new(
            [
                AxisSpec::new(AxisLabel::R, AxisBounds::Closed, AxisBinning::Regular),
                AxisSpec::new(AxisLabel::Phi, AxisBounds::Circular, AxisBinning::Regular),
            ],
            Owned::new(
                vec![EdgeRange::new(0, n_r), EdgeRange::new(2, n_phi)],
                vec![r_range[0], r_range[1], -PI, PI],
            ),
        )?;
        Ok(Self {
            reference,
            grid: Grid::new(axes, Populator::Attach { capacity }),
        })
    }

    /// Reference surface the grid lives on.
    pub fn reference(&self) -> &Surface {
        &self.reference
    }

    /// Underlying grid of surface indices.
    pub fn grid(&self) -> &Grid<usize, 2> {
        &self.grid
    }

    /// Local grid coordinates of a global point.
    fn local(&self, global: &Point3) -> [f64; 2] {
        let m = self
            .reference
            .mask
            .project(&self.reference.transform, global, &self.reference.transform.z())
            .measurement;
        [m.x, m.y]
    }

    /// Register surface `index` in the bins around its center.
    pub fn populate(&mut self, surface: &Surface, index: usize, window: &SearchWindow) -> Result<()> {
        let center = surface.transform.translation_vector();
        let p = self.local(&center);
        self.grid.populate_range(&p, window, index)?;
        Ok(())
    }

    /// Surfaces near the point where `traj` crosses the reference surface.
    ///
    /// Falls back to the current position when the trajectory never reaches
    /// the reference.
    pub fn candidates(
        &self,
        traj: &Trajectory,
        window: &SearchWindow,
        newton: &NewtonConfig,
        out: &mut Vec<usize>,
    ) {
        let hit = nearest_inside(&intersect(traj, &self.reference, REFERENCE_TOLERANCE, newton));
        let lookup = if hit.is_inside() {
            hit.p3
        } else {
            traj.position()
        };
        for index in self.grid.search(&self.local(&lookup), window) {
            if !out.contains(&index) {
                out.push(index);
            }
        }
    }
}
