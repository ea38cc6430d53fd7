//! D-dimensional axis collections over owned or borrowed edge storage.

use crate::axis::{Axis, AxisBinning, AxisSpec, BinRange, EdgeRange, SearchWindow};
use crate::error::{GridError, Result};

/// Backing store for edge ranges and bin edges.
///
/// Lookups behave identically for every implementation, so a grid built in
/// memory and one viewed from a flat buffer agree bin for bin.
pub trait EdgeStorage {
    /// One entry per axis.
    fn edge_ranges(&self) -> &[EdgeRange];
    /// Flat edge table shared by all axes.
    fn edges(&self) -> &[f64];
}

/// Edge data owned by the axes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Owned {
    ranges: Vec<EdgeRange>,
    edges: Vec<f64>,
}

impl Owned {
    /// Take ownership of edge ranges and edges.
    pub fn new(ranges: Vec<EdgeRange>, edges: Vec<f64>) -> Self {
        Self { ranges, edges }
    }
}

impl EdgeStorage for Owned {
    fn edge_ranges(&self) -> &[EdgeRange] {
        &self.ranges
    }

    fn edges(&self) -> &[f64] {
        &self.edges
    }
}

/// Edge data borrowed from an external buffer.
#[derive(Debug, Clone, Copy)]
pub struct Borrowed<'a> {
    ranges: &'a [EdgeRange],
    edges: &'a [f64],
}

impl<'a> Borrowed<'a> {
    /// Borrow typed slices.
    pub fn new(ranges: &'a [EdgeRange], edges: &'a [f64]) -> Self {
        Self { ranges, edges }
    }

    /// View raw byte buffers, e.g. a memory-mapped geometry file.
    ///
    /// Fails if a buffer is misaligned or its length is not a multiple of
    /// the element size.
    pub fn from_bytes(ranges: &'a [u8], edges: &'a [u8]) -> Result<Self> {
        let ranges = bytemuck::try_cast_slice(ranges).map_err(|e| GridError::Cast(e.to_string()))?;
        let edges = bytemuck::try_cast_slice(edges).map_err(|e| GridError::Cast(e.to_string()))?;
        Ok(Self { ranges, edges })
    }
}

impl EdgeStorage for Borrowed<'_> {
    fn edge_ranges(&self) -> &[EdgeRange] {
        self.ranges
    }

    fn edges(&self) -> &[f64] {
        self.edges
    }
}

/// `D` axes sharing one edge store.
#[derive(Debug, Clone)]
pub struct MultiAxis<const D: usize, S: EdgeStorage = Owned> {
    specs: [AxisSpec; D],
    storage: S,
}

impl<const D: usize, S: EdgeStorage> MultiAxis<D, S> {
    /// Combine axis descriptions with their edge data.
    ///
    /// Axis `i` uses edge range `i`. Every range must lie within the edge
    /// table and describe at least one bin; regular spans must be non-empty
    /// and irregular edges strictly increasing.
    pub fn new(specs: [AxisSpec; D], storage: S) -> Result<Self> {
        let ranges = storage.edge_ranges();
        let edges = storage.edges();
        for (i, spec) in specs.iter().enumerate() {
            let range = ranges.get(i).ok_or(GridError::MissingEdgeRange(i))?;
            if range.nbins == 0 {
                return Err(GridError::EmptyAxis(i));
            }
            let offset = range.offset as usize;
            let end = match spec.binning {
                AxisBinning::Regular => offset + 2,
                AxisBinning::Irregular => offset + range.nbins as usize + 1,
            };
            if end > edges.len() {
                return Err(GridError::EdgeRangeOutOfBounds {
                    axis: i,
                    offset,
                    end,
                    len: edges.len(),
                });
            }
            if !edges[offset..end].windows(2).all(|w| w[0] < w[1]) {
                return Err(GridError::NonMonotonicEdges(i));
            }
        }
        Ok(Self { specs, storage })
    }

    /// View of axis `i`.
    pub fn axis(&self, i: usize) -> Axis<'_> {
        Axis::new(
            self.specs[i],
            self.storage.edge_ranges()[i],
            self.storage.edges(),
        )
    }

    /// Axis descriptions.
    pub fn specs(&self) -> &[AxisSpec; D] {
        &self.specs
    }

    /// Edge store.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Number of bins per axis.
    pub fn nbins(&self) -> [usize; D] {
        std::array::from_fn(|i| self.axis(i).nbins())
    }

    /// Multi-bin of a point.
    pub fn bins(&self, p: &[f64; D]) -> [usize; D] {
        std::array::from_fn(|i| self.axis(i).bin(p[i]))
    }

    /// Per-axis bin ranges of the same window around a point.
    pub fn bin_ranges(&self, p: &[f64; D], window: &SearchWindow) -> [BinRange; D] {
        std::array::from_fn(|i| self.axis(i).range(p[i], window))
    }

    /// Copy into owned storage.
    pub fn to_owning(&self) -> MultiAxis<D, Owned> {
        MultiAxis {
            specs: self.specs,
            storage: Owned::new(
                self.storage.edge_ranges().to_vec(),
                self.storage.edges().to_vec(),
            ),
        }
    }
}
