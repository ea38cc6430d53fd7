//! Single grid axis: value-to-bin mapping and neighborhood ranges.
//!
//! An axis is a lightweight view over an [`EdgeRange`] and the shared edge
//! table of its [`MultiAxis`](crate::MultiAxis). Regular axes read the two
//! entries `edges[offset]` (min) and `edges[offset + 1]` (max); irregular
//! axes read the `nbins + 1` entries starting at `offset`.

use bytemuck::{Pod, Zeroable};

/// Location of one axis' data in the shared edge table.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct EdgeRange {
    /// Index of the first edge.
    pub offset: u32,
    /// Number of regular (in-range) bins.
    pub nbins: u32,
}

impl EdgeRange {
    /// New edge range.
    pub const fn new(offset: u32, nbins: u32) -> Self {
        Self { offset, nbins }
    }
}

/// What happens to values beyond the axis span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisBounds {
    /// Clamped into the first / last bin.
    Closed,
    /// Collected in an extra underflow (bin 0) and overflow (bin n + 1) bin.
    Open,
    /// Periodic; bin indices wrap around.
    Circular,
}

/// Bin edge layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisBinning {
    /// Equidistant bins between min and max.
    Regular,
    /// Explicit, strictly increasing edges.
    Irregular,
}

/// Coordinate an axis measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisLabel {
    /// Cartesian x.
    X,
    /// Cartesian y.
    Y,
    /// Cartesian or cylindrical z.
    Z,
    /// Radius.
    R,
    /// Azimuth.
    Phi,
    /// Arc length `r * phi` on a cylinder.
    RPhi,
}

/// Full description of an axis apart from its edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisSpec {
    /// Measured coordinate.
    pub label: AxisLabel,
    /// Out-of-span behavior.
    pub bounds: AxisBounds,
    /// Edge layout.
    pub binning: AxisBinning,
}

impl AxisSpec {
    /// New axis description.
    pub const fn new(label: AxisLabel, bounds: AxisBounds, binning: AxisBinning) -> Self {
        Self {
            label,
            bounds,
            binning,
        }
    }
}

/// Neighborhood around a lookup value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchWindow {
    /// Number of bins below and above the central bin.
    Bins([usize; 2]),
    /// Distance below and above the value.
    Metric([f64; 2]),
}

impl Default for SearchWindow {
    fn default() -> Self {
        SearchWindow::Bins([0, 0])
    }
}

/// Inclusive bin interval. On circular axes `lo > hi` means the interval
/// wraps through the last bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinRange {
    /// First bin.
    pub lo: usize,
    /// Last bin.
    pub hi: usize,
}

impl BinRange {
    /// New inclusive range.
    pub const fn new(lo: usize, hi: usize) -> Self {
        Self { lo, hi }
    }

    /// True if the range runs over the end of a circular axis.
    pub fn is_wrapped(&self) -> bool {
        self.lo > self.hi
    }

    /// Bin indices of the range on an axis with `nbins` bins.
    pub fn indices(&self, nbins: usize) -> impl Iterator<Item = usize> {
        let (first, second) = if self.is_wrapped() {
            (self.lo..nbins, 0..self.hi + 1)
        } else {
            (self.lo..self.hi + 1, 0..0)
        };
        first.chain(second)
    }
}

/// Wrap a (possibly negative) bin index onto `[0, nbins)`.
pub fn wrap(ibin: isize, nbins: usize) -> usize {
    ibin.rem_euclid(nbins as isize) as usize
}

/// Borrowed view of one axis.
#[derive(Debug, Clone, Copy)]
pub struct Axis<'a> {
    spec: AxisSpec,
    range: EdgeRange,
    edges: &'a [f64],
}

impl<'a> Axis<'a> {
    /// View an axis; `edges` is the full shared table.
    ///
    /// The range must fit the table, which [`MultiAxis::new`](crate::MultiAxis::new)
    /// checks.
    pub fn new(spec: AxisSpec, range: EdgeRange, edges: &'a [f64]) -> Self {
        Self { spec, range, edges }
    }

    /// Axis description.
    pub fn spec(&self) -> AxisSpec {
        self.spec
    }

    /// Measured coordinate.
    pub fn label(&self) -> AxisLabel {
        self.spec.label
    }

    /// Number of in-range bins.
    fn n_regular(&self) -> usize {
        self.range.nbins as usize
    }

    /// Total number of bins, including under- and overflow on open axes.
    pub fn nbins(&self) -> usize {
        match self.spec.bounds {
            AxisBounds::Open => self.n_regular() + 2,
            AxisBounds::Closed | AxisBounds::Circular => self.n_regular(),
        }
    }

    /// Edges owned by this axis.
    fn own_edges(&self) -> &'a [f64] {
        let offset = self.range.offset as usize;
        let len = match self.spec.binning {
            AxisBinning::Regular => 2,
            AxisBinning::Irregular => self.n_regular() + 1,
        };
        &self.edges[offset..offset + len]
    }

    /// Lower end of the axis span.
    pub fn min(&self) -> f64 {
        self.own_edges()[0]
    }

    /// Upper end of the axis span.
    pub fn max(&self) -> f64 {
        let edges = self.own_edges();
        edges[edges.len() - 1]
    }

    /// `[min, max]` of the axis.
    pub fn span(&self) -> [f64; 2] {
        [self.min(), self.max()]
    }

    /// Mean bin width over the span.
    pub fn bin_width(&self) -> f64 {
        (self.max() - self.min()) / self.n_regular() as f64
    }

    /// Unmapped bin index: -1 below the span, `n` at or above its end.
    fn raw_bin(&self, v: f64) -> isize {
        match self.spec.binning {
            AxisBinning::Regular => ((v - self.min()) / self.bin_width()).floor() as isize,
            AxisBinning::Irregular => {
                self.own_edges().partition_point(|e| *e <= v) as isize - 1
            }
        }
    }

    /// Map an unmapped index according to the axis bounds.
    fn map(&self, raw: isize) -> usize {
        let n = self.n_regular() as isize;
        match self.spec.bounds {
            AxisBounds::Closed => raw.clamp(0, n - 1) as usize,
            AxisBounds::Open => {
                if raw < 0 {
                    0
                } else if raw >= n {
                    (n + 1) as usize
                } else {
                    (raw + 1) as usize
                }
            }
            AxisBounds::Circular => wrap(raw, self.n_regular()),
        }
    }

    /// Bin of a value.
    pub fn bin(&self, v: f64) -> usize {
        self.map(self.raw_bin(v))
    }

    /// Inclusive bin range covering the window around `v`.
    ///
    /// Closed and open ranges are clamped to the axis; circular ranges wrap
    /// and cover the whole axis once the window spans every bin.
    pub fn range(&self, v: f64, window: &SearchWindow) -> BinRange {
        let last = self.nbins() - 1;
        match (self.spec.bounds, *window) {
            (AxisBounds::Circular, SearchWindow::Bins([lo, hi])) => {
                let n = self.n_regular();
                if lo + hi + 1 >= n {
                    return BinRange::new(0, last);
                }
                let center = self.raw_bin(v);
                BinRange::new(
                    wrap(center - lo as isize, n),
                    wrap(center + hi as isize, n),
                )
            }
            (AxisBounds::Circular, SearchWindow::Metric([lo, hi])) => {
                let n = self.n_regular();
                let first = self.raw_bin(v - lo);
                let second = self.raw_bin(v + hi);
                if second - first + 1 >= n as isize {
                    return BinRange::new(0, last);
                }
                BinRange::new(wrap(first, n), wrap(second, n))
            }
            (_, SearchWindow::Bins([lo, hi])) => {
                let center = self.bin(v) as isize;
                BinRange::new(
                    (center - lo as isize).clamp(0, last as isize) as usize,
                    (center + hi as isize).clamp(0, last as isize) as usize,
                )
            }
            (_, SearchWindow::Metric([lo, hi])) => BinRange::new(self.bin(v - lo), self.bin(v + hi)),
        }
    }

    /// Lower and upper edge of a (mapped) bin.
    ///
    /// Underflow and overflow bins of open axes extend to infinity.
    pub fn bin_edges(&self, ibin: usize) -> [f64; 2] {
        let regular = match self.spec.bounds {
            AxisBounds::Open => {
                if ibin == 0 {
                    return [f64::NEG_INFINITY, self.min()];
                }
                if ibin > self.n_regular() {
                    return [self.max(), f64::INFINITY];
                }
                ibin - 1
            }
            AxisBounds::Closed | AxisBounds::Circular => ibin,
        };
        match self.spec.binning {
            AxisBinning::Regular => {
                let w = self.bin_width();
                let lo = self.min() + regular as f64 * w;
                [lo, lo + w]
            }
            AxisBinning::Irregular => {
                let edges = self.own_edges();
                [edges[regular], edges[regular + 1]]
            }
        }
    }

    /// Center value of a (mapped) bin; infinite for open under/overflow.
    pub fn bin_center(&self, ibin: usize) -> f64 {
        let [lo, hi] = self.bin_edges(ibin);
        if lo.is_infinite() {
            lo
        } else if hi.is_infinite() {
            hi
        } else {
            0.5 * (lo + hi)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    const TOL: f64 = 1e-7;

    fn regular(label: AxisLabel, bounds: AxisBounds) -> AxisSpec {
        AxisSpec::new(label, bounds, AxisBinning::Regular)
    }

    #[test]
    fn test_open_regular_axis() {
        let edges = [-10.0, -5.0, -3.0, 7.0, 7.0, 14.0, 20.0];
        let axis = Axis::new(
            regular(AxisLabel::X, AxisBounds::Open),
            EdgeRange::new(2, 10),
            &edges,
        );
        assert_eq!(axis.nbins(), 12);
        assert_relative_eq!(axis.min(), -3.0);
        assert_relative_eq!(axis.max(), 7.0);

        assert_eq!(axis.bin(-4.0), 0);
        assert_eq!(axis.bin(2.5), 6);
        assert_eq!(axis.bin(8.0), 11);

        let bins = |w: [usize; 2]| axis.range(2.5, &SearchWindow::Bins(w));
        assert_eq!(bins([0, 0]), BinRange::new(6, 6));
        assert_eq!(bins([0, 1]), BinRange::new(6, 7));
        assert_eq!(bins([1, 1]), BinRange::new(5, 7));
        assert_eq!(bins([4, 4]), BinRange::new(2, 10));
        assert_eq!(bins([5, 5]), BinRange::new(1, 11));
        assert_eq!(axis.range(1.5, &SearchWindow::Bins([4, 4])), BinRange::new(1, 9));
        assert_eq!(axis.range(5.5, &SearchWindow::Bins([5, 5])), BinRange::new(4, 11));

        let metric = |w: [f64; 2]| axis.range(2.5, &SearchWindow::Metric(w));
        assert_eq!(metric([0.01, 0.01]), BinRange::new(6, 6));
        assert_eq!(metric([1.0, 1.0]), BinRange::new(5, 7));
        assert_eq!(metric([10.0, 10.0]), BinRange::new(0, 11));
    }

    #[test]
    fn test_closed_regular_axis() {
        let edges = [-10.0, -3.0, -3.0, 7.0, 7.0, 14.0];
        let axis = Axis::new(
            regular(AxisLabel::X, AxisBounds::Closed),
            EdgeRange::new(2, 10),
            &edges,
        );
        assert_eq!(axis.nbins(), 10);
        assert_eq!(axis.bin(-4.0), 0);
        assert_eq!(axis.bin(2.5), 5);
        assert_eq!(axis.bin(8.0), 9);

        assert_eq!(axis.range(2.5, &SearchWindow::Bins([5, 5])), BinRange::new(0, 9));
        assert_eq!(axis.range(1.5, &SearchWindow::Bins([4, 4])), BinRange::new(0, 8));
        assert_eq!(axis.range(5.5, &SearchWindow::Bins([5, 5])), BinRange::new(3, 9));
    }

    #[test]
    fn test_circular_axis() {
        let step = PI / 72.0;
        let edges = [-PI + step, PI - step];
        let axis = Axis::new(
            regular(AxisLabel::Phi, AxisBounds::Circular),
            EdgeRange::new(0, 36),
            &edges,
        );
        assert_eq!(axis.nbins(), 36);
        assert_eq!(axis.bin(axis.max() + TOL), 0);
        assert_eq!(axis.bin(axis.min() - TOL), 35);

        let v = PI + TOL;
        assert_eq!(axis.range(v, &SearchWindow::Bins([0, 0])), BinRange::new(0, 0));
        assert_eq!(axis.range(v, &SearchWindow::Bins([1, 1])), BinRange::new(35, 1));
        assert_eq!(axis.range(v, &SearchWindow::Bins([2, 2])), BinRange::new(34, 2));
        let w = axis.bin_width();
        assert_eq!(
            axis.range(v, &SearchWindow::Metric([2.0 * w, 2.0 * w])),
            BinRange::new(34, 2)
        );
        assert_eq!(axis.range(v, &SearchWindow::Bins([20, 20])), BinRange::new(0, 35));
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap(-1, 36), 35);
        assert_eq!(wrap(36, 36), 0);
        assert_eq!(wrap(40, 36), 4);
        assert_eq!(wrap(-37, 36), 35);
    }

    #[test]
    fn test_wrapped_range_indices() {
        let range = BinRange::new(34, 2);
        assert!(range.is_wrapped());
        let bins: Vec<_> = range.indices(36).collect();
        assert_eq!(bins, vec![34, 35, 0, 1, 2]);
        let plain: Vec<_> = BinRange::new(3, 5).indices(36).collect();
        assert_eq!(plain, vec![3, 4, 5]);
    }

    #[test]
    fn test_values_on_edges() {
        // an edge value belongs to the bin it opens; the upper bound to the last bin
        let edges = [-10.0, -3.0, -3.0, 7.0, 7.0, 14.0];
        let axis = Axis::new(
            regular(AxisLabel::X, AxisBounds::Closed),
            EdgeRange::new(2, 10),
            &edges,
        );
        assert_eq!(axis.bin(-3.0), 0);
        assert_eq!(axis.bin(2.0), 5);
        assert_eq!(axis.bin(7.0), 9);

        let edges = [-100.0, -3.0, 1.0, 2.0, 4.0, 8.0, 12.0, 15.0, 18.0];
        let axis = Axis::new(
            AxisSpec::new(AxisLabel::Z, AxisBounds::Closed, AxisBinning::Irregular),
            EdgeRange::new(1, 6),
            &edges,
        );
        assert_eq!(axis.bin(-3.0), 0);
        assert_eq!(axis.bin(2.0), 2);
        assert_eq!(axis.bin(12.0), 5);
        assert_eq!(axis.bin(15.0), 5);
    }

    #[test]
    fn test_irregular_closed_axis() {
        let edges = [-100.0, -3.0, 1.0, 2.0, 4.0, 8.0, 12.0, 15.0, 18.0];
        let axis = Axis::new(
            AxisSpec::new(AxisLabel::Z, AxisBounds::Closed, AxisBinning::Irregular),
            EdgeRange::new(1, 6),
            &edges,
        );
        assert_eq!(axis.nbins(), 6);
        assert_relative_eq!(axis.min(), -3.0);
        assert_relative_eq!(axis.max(), 15.0);

        assert_eq!(axis.bin(-2.0), 0);
        assert_eq!(axis.bin(10.0), 4);
        assert_eq!(axis.bin(5.8), 3);
        assert_eq!(axis.bin(-4.0), 0);
        assert_eq!(axis.bin(17.0), 5);

        assert_eq!(axis.range(3.0, &SearchWindow::Bins([0, 0])), BinRange::new(2, 2));
        assert_eq!(axis.range(3.0, &SearchWindow::Bins([1, 1])), BinRange::new(1, 3));
        assert_eq!(axis.range(3.0, &SearchWindow::Bins([0, 1])), BinRange::new(2, 3));
        assert_eq!(axis.range(0.0, &SearchWindow::Bins([1, 1])), BinRange::new(0, 1));
        assert_eq!(axis.range(10.0, &SearchWindow::Bins([2, 2])), BinRange::new(2, 5));

        assert_eq!(
            axis.range(3.0, &SearchWindow::Metric([1.5, 0.2])),
            BinRange::new(1, 2)
        );
        assert_eq!(
            axis.range(3.0, &SearchWindow::Metric([4.0, 5.5])),
            BinRange::new(0, 4)
        );
        assert_eq!(axis.bin_edges(3), [4.0, 8.0]);
    }

    #[test]
    fn test_open_bin_edges() {
        let edges = [0.0, 10.0];
        let axis = Axis::new(regular(AxisLabel::R, AxisBounds::Open), EdgeRange::new(0, 5), &edges);
        assert_eq!(axis.bin_edges(0), [f64::NEG_INFINITY, 0.0]);
        assert_eq!(axis.bin_edges(1), [0.0, 2.0]);
        assert_eq!(axis.bin_edges(6), [10.0, f64::INFINITY]);
        assert_relative_eq!(axis.bin_center(3), 5.0);
    }
}
