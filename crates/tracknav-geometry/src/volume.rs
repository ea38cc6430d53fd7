//! Detector volumes: bounds, placement and the surfaces they contain.

use tracknav_grid::SearchWindow;
use tracknav_intersect::{NewtonConfig, Trajectory};
use tracknav_masks::Mask;
use tracknav_math::{Point3, Transform, Vec3};

use crate::finder::SurfaceFinder;

/// A navigation volume.
///
/// Surfaces are referenced by their index in the detector's surface store;
/// portals are kept apart because they are candidates on every lookup.
#[derive(Debug, Clone)]
pub struct Volume {
    index: usize,
    bounds: Mask,
    transform: Transform,
    surfaces: Vec<usize>,
    portals: Vec<usize>,
    finder: SurfaceFinder,
}

impl Volume {
    /// Empty volume with brute-force surface lookup.
    pub fn new(index: usize, bounds: Mask, transform: Transform) -> Self {
        Self {
            index,
            bounds,
            transform,
            surfaces: Vec::new(),
            portals: Vec::new(),
            finder: SurfaceFinder::BruteForce,
        }
    }

    /// Replace the surface finder.
    pub fn with_finder(mut self, finder: SurfaceFinder) -> Self {
        self.finder = finder;
        self
    }

    /// Register a surface (non-portal) by detector index.
    pub fn add_surface(&mut self, index: usize) {
        self.surfaces.push(index);
    }

    /// Register a portal by detector index.
    pub fn add_portal(&mut self, index: usize) {
        self.portals.push(index);
    }

    /// Index of the volume in its detector.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Volume boundary shape (cuboid or cylinder3).
    pub fn bounds(&self) -> &Mask {
        &self.bounds
    }

    /// Placement of the boundary shape.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Sensitive and passive surfaces.
    pub fn surfaces(&self) -> &[usize] {
        &self.surfaces
    }

    /// Portals.
    pub fn portals(&self) -> &[usize] {
        &self.portals
    }

    /// Surface finder.
    pub fn finder(&self) -> &SurfaceFinder {
        &self.finder
    }

    /// Mutable surface finder, for builders.
    pub fn finder_mut(&mut self) -> &mut SurfaceFinder {
        &mut self.finder
    }

    /// True if the global point lies within the volume bounds.
    pub fn contains(&self, p: &Point3, tol: f64) -> bool {
        let local = self.bounds.project(&self.transform, p, &Vec3::z()).local;
        self.bounds.is_inside(&local, tol)
    }

    /// Append the surfaces worth intersecting along `traj`, portals last.
    pub fn surface_candidates(
        &self,
        traj: &Trajectory,
        window: &SearchWindow,
        newton: &NewtonConfig,
        out: &mut Vec<usize>,
    ) {
        match &self.finder {
            SurfaceFinder::BruteForce => out.extend_from_slice(&self.surfaces),
            SurfaceFinder::Grid(grid) => grid.candidates(traj, window, newton, out),
        }
        out.extend_from_slice(&self.portals);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_cylinder3_contains() {
        let v = Volume::new(
            0,
            Mask::cylinder3(10.0, 20.0, -PI, PI, -50.0, 50.0),
            Transform::identity(),
        );
        assert!(v.contains(&Point3::new(15.0, 0.0, 0.0), 1e-6));
        assert!(v.contains(&Point3::new(0.0, -12.0, 49.0), 1e-6));
        assert!(!v.contains(&Point3::new(5.0, 0.0, 0.0), 1e-6));
        assert!(!v.contains(&Point3::new(15.0, 0.0, 60.0), 1e-6));
    }

    #[test]
    fn test_cuboid_contains_and_candidates() {
        let mut v = Volume::new(
            3,
            Mask::cuboid(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0)),
            Transform::translation(10.0, 0.0, 0.0),
        );
        assert!(v.contains(&Point3::new(10.5, 0.0, 0.0), 1e-6));
        assert!(!v.contains(&Point3::origin(), 1e-6));

        v.add_surface(4);
        v.add_portal(7);
        v.add_surface(5);
        let ray = tracknav_intersect::Ray::new(Point3::origin(), Vec3::x());
        let mut out = Vec::new();
        v.surface_candidates(
            &ray.into(),
            &SearchWindow::default(),
            &NewtonConfig::default(),
            &mut out,
        );
        assert_eq!(out, vec![4, 5, 7]);
    }
}
