//! The detector store and the read-only `Geometry` interface navigation uses.

use tracing::debug;
use tracknav_grid::SearchWindow;
use tracknav_intersect::{NewtonConfig, Surface, Trajectory};
use tracknav_masks::Mask;
use tracknav_math::{Barcode, Point3, Transform, DINDEX_INVALID};

use crate::error::{GeometryError, Result};
use crate::volume::Volume;
use crate::volume_finder::VolumeFinder;

/// Read access to a detector description.
///
/// Implementations are immutable after construction and shared by
/// reference across threads.
pub trait Geometry: Sync {
    /// Number of volumes.
    fn n_volumes(&self) -> usize;

    /// Volume by index.
    fn volume(&self, index: usize) -> Option<&Volume>;

    /// Index of the volume containing `p`.
    fn volume_by_pos(&self, p: &Point3) -> Option<usize>;

    /// Number of surfaces, portals included.
    fn n_surfaces(&self) -> usize;

    /// Surface by store index.
    fn surface_at(&self, index: usize) -> Option<&Surface>;

    /// Surface identified by `barcode`.
    fn surface(&self, barcode: Barcode) -> Option<&Surface> {
        self.surface_at(barcode.index())
            .filter(|s| s.barcode == barcode)
    }

    /// Boundary of the surface identified by `barcode`.
    fn mask(&self, barcode: Barcode) -> Option<&Mask> {
        self.surface(barcode).map(|s| &s.mask)
    }

    /// Placement of the surface identified by `barcode`.
    fn transform(&self, barcode: Barcode) -> Option<&Transform> {
        self.surface(barcode).map(|s| &s.transform)
    }

    /// Portal indices of a volume; empty for unknown volumes.
    fn portals(&self, volume: usize) -> &[usize] {
        self.volume(volume).map(Volume::portals).unwrap_or_default()
    }

    /// Append the indices of the surfaces of `volume` worth intersecting
    /// along `traj`, portals included.
    fn surface_candidates(
        &self,
        volume: usize,
        traj: &Trajectory,
        window: &SearchWindow,
        newton: &NewtonConfig,
        out: &mut Vec<usize>,
    ) {
        if let Some(v) = self.volume(volume) {
            v.surface_candidates(traj, window, newton, out);
        }
    }
}

/// Flat store of volumes and surfaces.
///
/// Surfaces live in one list indexed by their barcode index; volumes refer
/// to them by that index.
#[derive(Debug, Clone)]
pub struct Detector {
    name: String,
    volumes: Vec<Volume>,
    surfaces: Vec<Surface>,
    volume_finder: VolumeFinder,
}

impl Detector {
    /// Assemble and validate a detector.
    pub fn new(
        name: impl Into<String>,
        volumes: Vec<Volume>,
        surfaces: Vec<Surface>,
        volume_finder: VolumeFinder,
    ) -> Result<Self> {
        let det = Self {
            name: name.into(),
            volumes,
            surfaces,
            volume_finder,
        };
        det.validate()?;
        debug!(
            name = %det.name,
            volumes = det.volumes.len(),
            surfaces = det.surfaces.len(),
            "built detector"
        );
        Ok(det)
    }

    fn validate(&self) -> Result<()> {
        let n_volumes = self.volumes.len();
        for (position, surface) in self.surfaces.iter().enumerate() {
            let barcode = surface.barcode;
            if barcode.index() != position {
                return Err(GeometryError::SurfaceIndexMismatch { position, barcode });
            }
            if barcode.volume() >= n_volumes {
                return Err(GeometryError::UnknownVolume(barcode.volume()));
            }
            surface.mask.validate()?;
            let link = surface.volume_link();
            if surface.is_portal() && link != DINDEX_INVALID && link >= n_volumes {
                return Err(GeometryError::InvalidLink { barcode, link });
            }
        }

        for (position, volume) in self.volumes.iter().enumerate() {
            if volume.index() != position {
                return Err(GeometryError::VolumeIndexMismatch {
                    position,
                    index: volume.index(),
                });
            }
            let shape = volume.bounds().shape();
            if !shape.is_volume() {
                return Err(GeometryError::InvalidVolumeBounds {
                    volume: position,
                    shape: shape.name(),
                });
            }
            volume.bounds().validate()?;
            for &index in volume.surfaces().iter().chain(volume.portals()) {
                let surface = self.surfaces.get(index).ok_or(GeometryError::UnknownSurface {
                    volume: position,
                    surface: index,
                    count: self.surfaces.len(),
                })?;
                if surface.barcode.volume() != position {
                    return Err(GeometryError::WrongVolume {
                        volume: position,
                        barcode: surface.barcode,
                    });
                }
            }
            for &index in volume.portals() {
                if !self.surfaces[index].is_portal() {
                    return Err(GeometryError::NotAPortal(self.surfaces[index].barcode));
                }
            }
        }
        Ok(())
    }

    /// Detector name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All volumes.
    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }

    /// All surfaces, portals included.
    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    /// Volume lookup strategy.
    pub fn volume_finder(&self) -> &VolumeFinder {
        &self.volume_finder
    }
}

impl Geometry for Detector {
    fn n_volumes(&self) -> usize {
        self.volumes.len()
    }

    fn volume(&self, index: usize) -> Option<&Volume> {
        self.volumes.get(index)
    }

    fn volume_by_pos(&self, p: &Point3) -> Option<usize> {
        self.volume_finder.find(p, &self.volumes)
    }

    fn n_surfaces(&self) -> usize {
        self.surfaces.len()
    }

    fn surface_at(&self, index: usize) -> Option<&Surface> {
        self.surfaces.get(index)
    }
}
