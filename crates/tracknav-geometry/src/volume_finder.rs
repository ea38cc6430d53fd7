//! Volume lookup by global position.

use std::f64::consts::PI;

use tracknav_grid::{
    AxisBinning, AxisBounds, AxisLabel, AxisSpec, EdgeRange, Grid, MultiAxis, Owned, Populator,
};
use tracknav_math::{perp, phi, Point3, Tolerance};

use crate::error::{GeometryError, Result};
use crate::volume::Volume;

/// Locates the volume containing a point.
#[derive(Debug, Clone, Default)]
pub enum VolumeFinder {
    /// Test every volume's bounds.
    #[default]
    BruteForce,
    /// Cylindrical `(r, phi, z)` grid holding one volume index per bin.
    Grid(Grid<usize, 3>),
}

impl VolumeFinder {
    /// Build a cylindrical grid and fill each bin with the volume containing
    /// its center.
    ///
    /// `r` and `z` are open irregular axes (points beyond them find no
    /// volume), `phi` is circular with `n_phi` regular bins.
    pub fn cylindrical(
        r_edges: &[f64],
        n_phi: u32,
        z_edges: &[f64],
        volumes: &[Volume],
    ) -> Result<Self> {
        if r_edges.len() < 2 || z_edges.len() < 2 {
            return Err(GeometryError::InvalidConfig(
                "volume grid needs at least two r and z edges".into(),
            ));
        }
        let n_r = (r_edges.len() - 1) as u32;
        let n_z = (z_edges.len() - 1) as u32;
        let mut edges = Vec::with_capacity(r_edges.len() + z_edges.len() + 2);
        edges.extend_from_slice(r_edges);
        edges.extend_from_slice(&[-PI, PI]);
        edges.extend_from_slice(z_edges);

        let axes = MultiAxis::new(
            [
                AxisSpec::new(AxisLabel::R, AxisBounds::Open, AxisBinning::Irregular),
                AxisSpec::new(AxisLabel::Phi, AxisBounds::Circular, AxisBinning::Regular),
                AxisSpec::new(AxisLabel::Z, AxisBounds::Open, AxisBinning::Irregular),
            ],
            Owned::new(
                vec![
                    EdgeRange::new(0, n_r),
                    EdgeRange::new(n_r + 1, n_phi),
                    EdgeRange::new(n_r + 3, n_z),
                ],
                edges,
            ),
        )?;
        let mut grid = Grid::new(axes, Populator::Replace);

        let nbins = grid.nbins();
        for ir in 0..nbins[0] {
            let r = grid.axes().axis(0).bin_center(ir);
            for iphi in 0..nbins[1] {
                let ph = grid.axes().axis(1).bin_center(iphi);
                for iz in 0..nbins[2] {
                    let z = grid.axes().axis(2).bin_center(iz);
                    if !(r.is_finite() && z.is_finite()) {
                        continue;
                    }
                    let center = Point3::new(r * ph.cos(), r * ph.sin(), z);
                    if let Some(v) = volumes
                        .iter()
                        .find(|v| v.contains(&center, Tolerance::DEFAULT.linear))
                    {
                        grid.populate_bin(&[ir, iphi, iz], v.index())?;
                    }
                }
            }
        }
        Ok(VolumeFinder::Grid(grid))
    }

    /// Index of the volume containing `p`.
    pub fn find(&self, p: &Point3, volumes: &[Volume]) -> Option<usize> {
        match self {
            VolumeFinder::BruteForce => volumes
                .iter()
                .find(|v| v.contains(p, Tolerance::DEFAULT.linear))
                .map(Volume::index),
            VolumeFinder::Grid(grid) => grid
                .lookup(&[perp(&p.coords), phi(&p.coords), p.z])
                .first()
                .copied(),
        }
    }
}
