//! Detector builders: a telescope of planes and a toy barrel.

use std::f64::consts::PI;

use tracing::{debug, info};
use tracknav_grid::SearchWindow;
use tracknav_intersect::{Surface, Trajectory};
use tracknav_masks::{BoundingBox, Mask};
use tracknav_math::{Barcode, Point3, SurfaceId, Transform, Vec3, DINDEX_INVALID};

use crate::detector::Detector;
use crate::error::{GeometryError, Result};
use crate::finder::{SurfaceFinder, SurfaceGrid};
use crate::volume::Volume;
use crate::volume_finder::VolumeFinder;

/// Parameters of a telescope detector.
#[derive(Debug, Clone, PartialEq)]
pub struct TelescopeConfig {
    /// Path lengths along the pilot trajectory at which planes are placed.
    pub positions: Vec<f64>,
    /// Half length of each plane along its local x.
    pub half_x: f64,
    /// Half length of each plane along its local y.
    pub half_y: f64,
    /// Margin added around the planes for the volume box.
    pub envelope: f64,
}

impl Default for TelescopeConfig {
    fn default() -> Self {
        Self {
            positions: vec![20.0, 40.0, 60.0, 80.0, 100.0],
            half_x: 20.0,
            half_y: 20.0,
            envelope: 1.0,
        }
    }
}

/// Parameters of the toy barrel detector.
#[derive(Debug, Clone, PartialEq)]
pub struct ToyBarrelConfig {
    /// Outer radius of each volume, from the beampipe outwards.
    pub radii: Vec<f64>,
    /// Staves per barrel layer; one entry per volume after the beampipe.
    pub staves: Vec<u32>,
    /// Half length in z of all volumes.
    pub half_z: f64,
    /// Radius of the passive beampipe wall.
    pub beampipe_radius: f64,
}

impl Default for ToyBarrelConfig {
    fn default() -> Self {
        Self {
            radii: vec![25.0, 60.0, 100.0, 150.0],
            staves: vec![12, 20, 30],
            half_z: 500.0,
            beampipe_radius: 20.0,
        }
    }
}

impl ToyBarrelConfig {
    /// Check radii ordering and stave counts.
    pub fn validate(&self) -> Result<()> {
        if self.radii.is_empty() || self.staves.len() + 1 != self.radii.len() {
            return Err(GeometryError::InvalidConfig(format!(
                "{} radii need {} stave counts, got {}",
                self.radii.len(),
                self.radii.len().saturating_sub(1),
                self.staves.len()
            )));
        }
        if !self.radii.windows(2).all(|w| w[0] < w[1]) {
            return Err(GeometryError::InvalidConfig("radii must increase".into()));
        }
        if !(0.0 < self.beampipe_radius && self.beampipe_radius < self.radii[0]) {
            return Err(GeometryError::InvalidConfig(
                "beampipe must lie inside the first volume".into(),
            ));
        }
        if self.half_z <= 0.0 {
            return Err(GeometryError::InvalidConfig("half_z must be positive".into()));
        }
        if self.staves.iter().any(|&n| n < 3) {
            return Err(GeometryError::InvalidConfig(
                "layers need at least three staves".into(),
            ));
        }
        Ok(())
    }
}

/// Append a surface to `surfaces` and register it with `volume`.
fn push_surface(
    surfaces: &mut Vec<Surface>,
    volume: &mut Volume,
    id: SurfaceId,
    mask: Mask,
    transform: Transform,
) -> usize {
    let index = surfaces.len();
    surfaces.push(Surface::new(
        Barcode::new(volume.index(), id, index),
        mask,
        transform,
    ));
    if id == SurfaceId::Portal {
        volume.add_portal(index);
    } else {
        volume.add_surface(index);
    }
    index
}

/// Planes placed perpendicular to a pilot trajectory.
///
/// Every plane is sensitive except the last, which is a portal out of the
/// world. All planes share one box volume that also contains the pilot's
/// starting point.
pub fn telescope(pilot: &Trajectory, config: &TelescopeConfig) -> Result<Detector> {
    if config.positions.is_empty() {
        return Err(GeometryError::InvalidConfig("telescope needs planes".into()));
    }
    if !config.positions.windows(2).all(|w| w[0] < w[1]) {
        return Err(GeometryError::InvalidConfig(
            "plane positions must increase".into(),
        ));
    }
    if config.half_x <= 0.0 || config.half_y <= 0.0 {
        return Err(GeometryError::InvalidConfig("plane size must be positive".into()));
    }

    let mut surfaces: Vec<Surface> = Vec::with_capacity(config.positions.len());
    let mut bbox = BoundingBox::empty();
    bbox.include_point(&pilot.pos(0.0));

    let last = config.positions.len() - 1;
    for (index, &s) in config.positions.iter().enumerate() {
        let transform = Transform::from_z_axis(pilot.pos(s), &pilot.dir(s));
        let rectangle = Mask::rectangle(config.half_x, config.half_y);
        let (id, mask) = if index == last {
            (SurfaceId::Portal, rectangle.with_volume_link(DINDEX_INVALID))
        } else {
            (SurfaceId::Sensitive, rectangle.with_volume_link(0))
        };
        let surface = Surface::new(Barcode::new(0, id, index), mask, transform);
        bbox.include(&surface.global_bounds(config.envelope)?);
        surfaces.push(surface);
    }
    bbox.expand(config.envelope);

    let mut volume = Volume::new(0, Mask::cuboid(bbox.min, bbox.max), Transform::identity());
    for (index, surface) in surfaces.iter().enumerate() {
        if surface.is_portal() {
            volume.add_portal(index);
        } else {
            volume.add_surface(index);
        }
    }
    info!(planes = surfaces.len(), "built telescope detector");
    Detector::new("telescope", vec![volume], surfaces, VolumeFinder::BruteForce)
}

/// Beampipe plus concentric barrel layers of staves.
///
/// Volume 0 holds a passive beampipe wall; each further volume holds one
/// layer of rectangular staves at its mid radius, found through a cylinder
/// grid. Cylinder portals connect neighboring volumes, the outermost one
/// and the end-cap discs leave the world.
pub fn toy_barrel(config: &ToyBarrelConfig) -> Result<Detector> {
    config.validate()?;
    let hz = config.half_z;
    let mut surfaces = Vec::new();
    let mut volumes = Vec::with_capacity(config.radii.len());

    for (v, &r_out) in config.radii.iter().enumerate() {
        let r_in = if v == 0 { 0.0 } else { config.radii[v - 1] };
        let mut volume = Volume::new(
            v,
            Mask::cylinder3(r_in, r_out, -PI, PI, -hz, hz),
            Transform::identity(),
        );

        if v == 0 {
            push_surface(
                &mut surfaces,
                &mut volume,
                SurfaceId::Passive,
                Mask::cylinder(config.beampipe_radius, -hz, hz).with_volume_link(0),
                Transform::identity(),
            );
        } else {
            let n = config.staves[v - 1];
            let r_mid = 0.5 * (r_in + r_out);
            let half_x = 1.1 * PI * r_mid / f64::from(n);
            let mut grid = SurfaceGrid::cylinder(Transform::identity(), r_mid, [-hz, hz], n, 1, 3)?;
            for k in 0..n {
                let phi = -PI + (f64::from(k) + 0.5) * 2.0 * PI / f64::from(n);
                let radial = Vec3::new(phi.cos(), phi.sin(), 0.0);
                let tangential = Vec3::new(-phi.sin(), phi.cos(), 0.0);
                let transform = Transform::from_axes(Point3::from(radial * r_mid), &radial, &tangential);
                let index = push_surface(
                    &mut surfaces,
                    &mut volume,
                    SurfaceId::Sensitive,
                    Mask::rectangle(half_x, hz).with_volume_link(v),
                    transform,
                );
                grid.populate(&surfaces[index], index, &SearchWindow::Bins([1, 1]))?;
            }
            volume = volume.with_finder(SurfaceFinder::Grid(grid));
            debug!(volume = v, staves = n, radius = r_mid, "built barrel layer");

            push_surface(
                &mut surfaces,
                &mut volume,
                SurfaceId::Portal,
                Mask::portal_cylinder(r_in, -hz, hz).with_volume_link(v - 1),
                Transform::identity(),
            );
        }

        let outer_link = if v + 1 < config.radii.len() { v + 1 } else { DINDEX_INVALID };
        push_surface(
            &mut surfaces,
            &mut volume,
            SurfaceId::Portal,
            Mask::portal_cylinder(r_out, -hz, hz).with_volume_link(outer_link),
            Transform::identity(),
        );
        for z in [-hz, hz] {
            push_surface(
                &mut surfaces,
                &mut volume,
                SurfaceId::Portal,
                Mask::ring(r_in, r_out).with_volume_link(DINDEX_INVALID),
                Transform::translation(0.0, 0.0, z),
            );
        }
        volumes.push(volume);
    }

    let mut r_edges = vec![0.0];
    r_edges.extend_from_slice(&config.radii);
    let volume_finder = VolumeFinder::cylindrical(&r_edges, 1, &[-hz, hz], &volumes)?;
    info!(
        volumes = volumes.len(),
        surfaces = surfaces.len(),
        "built toy barrel detector"
    );
    Detector::new("toy_barrel", volumes, surfaces, volume_finder)
}
