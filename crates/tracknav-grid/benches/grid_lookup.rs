//! Benchmarks for grid bin lookup and neighborhood search.
//!
//! Run with: cargo bench -p tracknav-grid
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p tracknav-grid -- --save-baseline main
//! 2. After changes: cargo bench -p tracknav-grid -- --baseline main

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::f64::consts::PI;
use tracknav_grid::{
    AxisBinning, AxisBounds, AxisLabel, AxisSpec, EdgeRange, Grid, MultiAxis, Owned, Populator,
    SearchWindow,
};

// =============================================================================
// Test Grid Generation
// =============================================================================

/// Cylindrical (r*phi, z) grid with one entry per bin.
fn create_cylinder_grid(n_phi: u32, n_z: u32) -> Grid<usize, 2> {
    let radius = 50.0;
    let specs = [
        AxisSpec::new(AxisLabel::RPhi, AxisBounds::Circular, AxisBinning::Regular),
        AxisSpec::new(AxisLabel::Z, AxisBounds::Closed, AxisBinning::Regular),
    ];
    let storage = Owned::new(
        vec![EdgeRange::new(0, n_phi), EdgeRange::new(2, n_z)],
        vec![-PI * radius, PI * radius, -500.0, 500.0],
    );
    let Ok(axes) = MultiAxis::new(specs, storage) else {
        panic!("invalid benchmark axes");
    };
    let mut grid = Grid::new(axes, Populator::Attach { capacity: 4 });
    let nbins = grid.nbins();
    for iphi in 0..nbins[0] {
        for iz in 0..nbins[1] {
            let _ = grid.populate_bin(&[iphi, iz], iphi * nbins[1] + iz);
        }
    }
    grid
}

/// Deterministic lookup points spread over the grid.
fn create_points(count: usize) -> Vec<[f64; 2]> {
    (0..count)
        .map(|i| {
            let t = i as f64 / count as f64;
            [(2.0 * t - 1.0) * PI * 50.0, (t * 7.0).fract() * 1000.0 - 500.0]
        })
        .collect()
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_lookup");
    let points = create_points(1024);

    for (n_phi, n_z) in [(16, 10), (128, 100)] {
        let grid = create_cylinder_grid(n_phi, n_z);
        let name = format!("{n_phi}x{n_z}");

        group.bench_with_input(BenchmarkId::new("bin", &name), &grid, |b, grid| {
            b.iter(|| {
                for p in &points {
                    black_box(grid.lookup(black_box(p)));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("search_1x1", &name), &grid, |b, grid| {
            let window = SearchWindow::Bins([1, 1]);
            b.iter(|| {
                for p in &points {
                    black_box(grid.search(black_box(p), &window));
                }
            });
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(benches, bench_lookup);
criterion_main!(benches);
