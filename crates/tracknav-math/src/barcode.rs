//! Packed geometry object identifier.

use std::fmt;

const VOLUME_BITS: u32 = 12;
const ID_BITS: u32 = 4;
const INDEX_BITS: u32 = 40;
const EXTRA_BITS: u32 = 8;

const VOLUME_SHIFT: u32 = 0;
const ID_SHIFT: u32 = VOLUME_SHIFT + VOLUME_BITS;
const INDEX_SHIFT: u32 = ID_SHIFT + ID_BITS;
const EXTRA_SHIFT: u32 = INDEX_SHIFT + INDEX_BITS;

const fn mask(bits: u32) -> u64 {
    (1u64 << bits) - 1
}

/// Kind of surface a barcode refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceId {
    /// Sensitive (measurement) surface.
    Sensitive,
    /// Boundary between two volumes, or between a volume and the outside world.
    Portal,
    /// Passive material surface.
    Passive,
    /// Unset.
    Invalid,
}

impl SurfaceId {
    const fn to_bits(self) -> u64 {
        match self {
            Self::Sensitive => 0,
            Self::Portal => 1,
            Self::Passive => 2,
            Self::Invalid => mask(ID_BITS),
        }
    }

    const fn from_bits(bits: u64) -> Self {
        match bits {
            0 => Self::Sensitive,
            1 => Self::Portal,
            2 => Self::Passive,
            _ => Self::Invalid,
        }
    }
}

/// Identity of a surface in the detector: volume, kind, index and an extra tag.
///
/// The fields are packed into a single `u64` (12 bits volume, 4 bits kind,
/// 40 bits index, 8 bits extra). All bits set marks a field as invalid.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Barcode(u64);

impl Barcode {
    /// Barcode with every field invalid.
    pub const fn invalid() -> Self {
        Self(u64::MAX)
    }

    /// New barcode for surface `index` of kind `id` in `volume`.
    pub const fn new(volume: usize, id: SurfaceId, index: usize) -> Self {
        Self::invalid()
            .with_volume(volume)
            .with_id(id)
            .with_index(index)
            .with_extra(0)
    }

    const fn set(self, shift: u32, bits: u32, value: u64) -> Self {
        let m = mask(bits) << shift;
        Self((self.0 & !m) | ((value << shift) & m))
    }

    const fn get(self, shift: u32, bits: u32) -> u64 {
        (self.0 >> shift) & mask(bits)
    }

    /// Replace the volume field.
    pub const fn with_volume(self, volume: usize) -> Self {
        self.set(VOLUME_SHIFT, VOLUME_BITS, volume as u64)
    }

    /// Replace the kind field.
    pub const fn with_id(self, id: SurfaceId) -> Self {
        self.set(ID_SHIFT, ID_BITS, id.to_bits())
    }

    /// Replace the index field.
    pub const fn with_index(self, index: usize) -> Self {
        self.set(INDEX_SHIFT, INDEX_BITS, index as u64)
    }

    /// Replace the extra field.
    pub const fn with_extra(self, extra: u8) -> Self {
        self.set(EXTRA_SHIFT, EXTRA_BITS, extra as u64)
    }

    /// Volume index.
    pub const fn volume(self) -> usize {
        self.get(VOLUME_SHIFT, VOLUME_BITS) as usize
    }

    /// Surface kind.
    pub const fn id(self) -> SurfaceId {
        SurfaceId::from_bits(self.get(ID_SHIFT, ID_BITS))
    }

    /// Surface index in the detector's surface store.
    pub const fn index(self) -> usize {
        self.get(INDEX_SHIFT, INDEX_BITS) as usize
    }

    /// Extra tag.
    pub const fn extra(self) -> u8 {
        self.get(EXTRA_SHIFT, EXTRA_BITS) as u8
    }

    /// Raw packed value.
    pub const fn value(self) -> u64 {
        self.0
    }

    /// True if any of the volume, kind or index fields is unset.
    pub const fn is_invalid(self) -> bool {
        self.get(VOLUME_SHIFT, VOLUME_BITS) == mask(VOLUME_BITS)
            || self.get(ID_SHIFT, ID_BITS) == mask(ID_BITS)
            || self.get(INDEX_SHIFT, INDEX_BITS) == mask(INDEX_BITS)
    }

    /// True for portal surfaces.
    pub const fn is_portal(self) -> bool {
        matches!(self.id(), SurfaceId::Portal)
    }

    /// True for sensitive surfaces.
    pub const fn is_sensitive(self) -> bool {
        matches!(self.id(), SurfaceId::Sensitive)
    }
}

impl Default for Barcode {
    fn default() -> Self {
        Self::invalid()
    }
}

impl fmt::Debug for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Barcode")
            .field("volume", &self.volume())
            .field("id", &self.id())
            .field("index", &self.index())
            .field("extra", &self.extra())
            .finish()
    }
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "vol = {}, id = {:?}, index = {}, extra = {}",
            self.volume(),
            self.id(),
            self.index(),
            self.extra()
        )
    }
}
