//! Populated grids: a multi-axis plus per-bin value storage.

use tracing::debug;

use crate::axis::{BinRange, SearchWindow};
use crate::error::{GridError, Result};
use crate::multi_axis::{EdgeStorage, MultiAxis, Owned};
use crate::serializer::serialize;

/// How values are filled into a bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Populator {
    /// One value per bin; a new value overwrites the old one.
    Replace,
    /// Up to `capacity` distinct values per bin.
    Attach {
        /// Slots per bin.
        capacity: usize,
    },
}

impl Populator {
    fn slots(&self) -> usize {
        match self {
            Populator::Replace => 1,
            Populator::Attach { capacity } => (*capacity).max(1),
        }
    }
}

/// A `D`-dimensional grid storing values of type `T` per bin.
///
/// Bins are addressed through the serialized index (axis 0 fastest) into a
/// flat slot buffer with `slots` entries per bin.
#[derive(Debug, Clone)]
pub struct Grid<T, const D: usize, S: EdgeStorage = Owned> {
    axes: MultiAxis<D, S>,
    populator: Populator,
    nbins: [usize; D],
    values: Vec<T>,
    counts: Vec<usize>,
}

impl<T, const D: usize, S> Grid<T, D, S>
where
    T: Copy + PartialEq + Default,
    S: EdgeStorage,
{
    /// Empty grid over `axes`.
    pub fn new(axes: MultiAxis<D, S>, populator: Populator) -> Self {
        let nbins = axes.nbins();
        let total: usize = nbins.iter().product();
        debug!(bins = total, ?populator, "created grid");
        Self {
            axes,
            populator,
            nbins,
            values: vec![T::default(); total * populator.slots()],
            counts: vec![0; total],
        }
    }

    /// The grid's axes.
    pub fn axes(&self) -> &MultiAxis<D, S> {
        &self.axes
    }

    /// Fill strategy.
    pub fn populator(&self) -> Populator {
        self.populator
    }

    /// Number of bins per axis.
    pub fn nbins(&self) -> [usize; D] {
        self.nbins
    }

    /// Total number of bins.
    pub fn n_bins(&self) -> usize {
        self.counts.len()
    }

    /// Flat index of a multi-bin.
    pub fn serialize(&self, mbin: &[usize; D]) -> usize {
        serialize(&self.nbins, mbin)
    }

    /// Values stored in a multi-bin.
    pub fn at(&self, mbin: &[usize; D]) -> &[T] {
        let gbin = self.serialize(mbin);
        let start = gbin * self.populator.slots();
        &self.values[start..start + self.counts[gbin]]
    }

    /// Values stored in the bin containing `p`.
    pub fn lookup(&self, p: &[f64; D]) -> &[T] {
        self.at(&self.axes.bins(p))
    }

    /// Fill `value` into a multi-bin.
    ///
    /// Attaching a value already present is a no-op.
    pub fn populate_bin(&mut self, mbin: &[usize; D], value: T) -> Result<()> {
        let gbin = self.serialize(mbin);
        let slots = self.populator.slots();
        let start = gbin * slots;
        match self.populator {
            Populator::Replace => {
                self.values[start] = value;
                self.counts[gbin] = 1;
            }
            Populator::Attach { .. } => {
                let count = self.counts[gbin];
                if self.values[start..start + count].contains(&value) {
                    return Ok(());
                }
                if count == slots {
                    return Err(GridError::BinFull(gbin));
                }
                self.values[start + count] = value;
                self.counts[gbin] = count + 1;
            }
        }
        Ok(())
    }

    /// Fill `value` into the bin containing `p`.
    pub fn populate(&mut self, p: &[f64; D], value: T) -> Result<()> {
        let mbin = self.axes.bins(p);
        self.populate_bin(&mbin, value)
    }

    /// Fill `value` into every bin of the window around `p`.
    pub fn populate_range(&mut self, p: &[f64; D], window: &SearchWindow, value: T) -> Result<()> {
        let ranges = self.axes.bin_ranges(p, window);
        let mut bins = Vec::new();
        for_each_bin(&ranges, &self.nbins, |mbin| bins.push(*mbin));
        for mbin in &bins {
            self.populate_bin(mbin, value)?;
        }
        Ok(())
    }

    /// Distinct values of all bins in the window around `p`.
    pub fn search(&self, p: &[f64; D], window: &SearchWindow) -> Vec<T> {
        let ranges = self.axes.bin_ranges(p, window);
        let mut found = Vec::new();
        for_each_bin(&ranges, &self.nbins, |mbin| {
            for value in self.at(mbin) {
                if !found.contains(value) {
                    found.push(*value);
                }
            }
        });
        found
    }

    /// Iterate `(multi-bin, values)` over all non-empty bins.
    pub fn iter_bins(&self) -> impl Iterator<Item = ([usize; D], &[T])> + '_ {
        (0..self.n_bins()).filter_map(move |gbin| {
            let count = self.counts[gbin];
            (count > 0).then(|| {
                let start = gbin * self.populator.slots();
                (
                    crate::serializer::deserialize(&self.nbins, gbin),
                    &self.values[start..start + count],
                )
            })
        })
    }
}

/// Visit every multi-bin of the Cartesian product of `ranges`.
fn for_each_bin<const D: usize>(
    ranges: &[BinRange; D],
    nbins: &[usize; D],
    mut visit: impl FnMut(&[usize; D]),
) {
    let lists: [Vec<usize>; D] = std::array::from_fn(|i| ranges[i].indices(nbins[i]).collect());
    if lists.iter().any(Vec::is_empty) {
        return;
    }
    let mut cursor = [0usize; D];
    loop {
        let mbin: [usize; D] = std::array::from_fn(|i| lists[i][cursor[i]]);
        visit(&mbin);

        let mut axis = 0;
        loop {
            if axis == D {
                return;
            }
            cursor[axis] += 1;
            if cursor[axis] < lists[axis].len() {
                break;
            }
            cursor[axis] = 0;
            axis += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::{AxisBinning, AxisBounds, AxisLabel, AxisSpec, EdgeRange};
    use crate::multi_axis::Borrowed;
    use std::f64::consts::PI;

    fn xy_axes() -> MultiAxis<2> {
        let spec = |label| AxisSpec::new(label, AxisBounds::Closed, AxisBinning::Regular);
        MultiAxis::new(
            [spec(AxisLabel::X), spec(AxisLabel::Y)],
            Owned::new(
                vec![EdgeRange::new(0, 10), EdgeRange::new(2, 10)],
                vec![0.0, 10.0, 0.0, 10.0],
            ),
        )
        .unwrap()
    }

    #[test]
    fn test_replace_populator() {
        let mut grid: Grid<usize, 2> = Grid::new(xy_axes(), Populator::Replace);
        assert_eq!(grid.n_bins(), 100);
        assert!(grid.lookup(&[2.5, 3.5]).is_empty());

        grid.populate(&[2.5, 3.5], 7).unwrap();
        grid.populate(&[2.1, 3.9], 8).unwrap();
        assert_eq!(grid.lookup(&[2.5, 3.5]), &[8]);
        assert_eq!(grid.at(&[2, 3]), &[8]);
    }

    #[test]
    fn test_attach_populator() {
        let mut grid: Grid<usize, 2> = Grid::new(xy_axes(), Populator::Attach { capacity: 2 });
        grid.populate(&[0.5, 0.5], 1).unwrap();
        grid.populate(&[0.5, 0.5], 1).unwrap();
        grid.populate(&[0.5, 0.5], 2).unwrap();
        assert_eq!(grid.at(&[0, 0]), &[1, 2]);
        assert_eq!(grid.populate(&[0.5, 0.5], 3), Err(GridError::BinFull(0)));
    }

    #[test]
    fn test_populate_range_and_search() {
        let mut grid: Grid<usize, 2> = Grid::new(xy_axes(), Populator::Attach { capacity: 4 });
        grid.populate_range(&[5.5, 5.5], &SearchWindow::Bins([1, 1]), 3).unwrap();
        for x in 4..=6 {
            for y in 4..=6 {
                assert_eq!(grid.at(&[x, y]), &[3]);
            }
        }
        assert!(grid.at(&[3, 5]).is_empty());
        assert_eq!(grid.iter_bins().count(), 9);

        grid.populate(&[7.5, 5.5], 4).unwrap();
        let mut found = grid.search(&[6.5, 5.5], &SearchWindow::Bins([1, 1]));
        found.sort_unstable();
        assert_eq!(found, vec![3, 4]);
        assert!(grid.search(&[0.5, 0.5], &SearchWindow::Bins([0, 0])).is_empty());
    }

    #[test]
    fn test_circular_search_wraps() {
        let specs = [
            AxisSpec::new(AxisLabel::Phi, AxisBounds::Circular, AxisBinning::Regular),
            AxisSpec::new(AxisLabel::Z, AxisBounds::Closed, AxisBinning::Regular),
        ];
        let ranges = [EdgeRange::new(0, 8), EdgeRange::new(2, 1)];
        let edges = [-PI, PI, -1.0, 1.0];
        let axes = MultiAxis::new(specs, Borrowed::new(&ranges, &edges)).unwrap();
        let mut grid: Grid<u32, 2, _> = Grid::new(axes, Populator::Attach { capacity: 1 });
        grid.populate(&[-PI + 0.1, 0.0], 10).unwrap();
        grid.populate(&[PI - 0.1, 0.0], 20).unwrap();
        grid.populate(&[0.1, 0.0], 30).unwrap();

        let mut found = grid.search(&[PI - 0.1, 0.0], &SearchWindow::Bins([1, 1]));
        found.sort_unstable();
        assert_eq!(found, vec![10, 20]);
    }

    #[test]
    fn test_for_each_bin_order() {
        let mut visited = Vec::new();
        for_each_bin(
            &[BinRange::new(0, 1), BinRange::new(3, 0)],
            &[2, 4],
            |m| visited.push(*m),
        );
        assert_eq!(
            visited,
            vec![[0, 3], [1, 3], [0, 0], [1, 0]]
        );
    }
}
