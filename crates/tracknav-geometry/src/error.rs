//! Error types for detector construction.

use thiserror::Error;
use tracknav_grid::GridError;
use tracknav_masks::MaskError;
use tracknav_math::Barcode;

/// Errors that can occur when assembling a detector.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A volume index that is not part of the detector.
    #[error("volume {0} does not exist")]
    UnknownVolume(usize),

    /// A volume stored at the wrong position.
    #[error("volume stored at {position} has index {index}")]
    VolumeIndexMismatch {
        /// Position in the volume list.
        position: usize,
        /// Index carried by the volume.
        index: usize,
    },

    /// A surface whose barcode index differs from its storage position.
    #[error("surface stored at {position} has barcode [{barcode}]")]
    SurfaceIndexMismatch {
        /// Position in the surface list.
        position: usize,
        /// Barcode of the surface.
        barcode: Barcode,
    },

    /// A volume refers to a surface that does not exist.
    #[error("volume {volume} refers to surface {surface}, detector has {count}")]
    UnknownSurface {
        /// Referring volume.
        volume: usize,
        /// Surface index.
        surface: usize,
        /// Number of surfaces.
        count: usize,
    },

    /// A surface registered with a volume other than the one in its barcode.
    #[error("surface [{barcode}] registered with volume {volume}")]
    WrongVolume {
        /// Registering volume.
        volume: usize,
        /// Barcode of the surface.
        barcode: Barcode,
    },

    /// A portal link that is neither a volume nor the world exit.
    #[error("portal [{barcode}] links to unknown volume {link}")]
    InvalidLink {
        /// Barcode of the portal.
        barcode: Barcode,
        /// Linked volume.
        link: usize,
    },

    /// A surface in a volume's portal list that is not a portal.
    #[error("surface [{0}] is listed as portal but is not one")]
    NotAPortal(Barcode),

    /// Volume bounds with a surface shape.
    #[error("volume {volume}: bounds shape {shape} is not a volume shape")]
    InvalidVolumeBounds {
        /// Volume index.
        volume: usize,
        /// Offending shape name.
        shape: &'static str,
    },

    /// Inconsistent builder parameters.
    #[error("invalid builder configuration: {0}")]
    InvalidConfig(String),

    /// A mask failed validation.
    #[error(transparent)]
    Mask(#[from] MaskError),

    /// A grid could not be built or filled.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeometryError>;
