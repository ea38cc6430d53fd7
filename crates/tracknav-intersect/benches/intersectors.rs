//! Benchmarks for the ray and helix intersectors.
//!
//! Run with: cargo bench -p tracknav-intersect

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tracknav_intersect::{intersect, Helix, NewtonConfig, Ray, Surface, Trajectory};
use tracknav_masks::Mask;
use tracknav_math::{Barcode, Point3, SurfaceId, Transform, Vec3};

// =============================================================================
// Test Surfaces
// =============================================================================

fn surfaces() -> Vec<(&'static str, Surface)> {
    let bc = Barcode::new(0, SurfaceId::Sensitive, 0);
    vec![
        (
            "rectangle",
            Surface::new(
                bc,
                Mask::rectangle(50.0, 50.0),
                Transform::from_z_axis(Point3::new(100.0, 0.0, 0.0), &Vec3::x()),
            ),
        ),
        (
            "cylinder",
            Surface::new(bc, Mask::cylinder(100.0, -500.0, 500.0), Transform::identity()),
        ),
        (
            "portal_cylinder",
            Surface::new(bc, Mask::portal_cylinder(100.0, -500.0, 500.0), Transform::identity()),
        ),
        (
            "concentric_cylinder",
            Surface::new(
                bc,
                Mask::concentric_cylinder(100.0, -500.0, 500.0),
                Transform::identity(),
            ),
        ),
    ]
}

/// Tracks fanning out from the origin in the transverse plane.
fn directions(count: usize) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let phi = -0.5 + i as f64 / count as f64;
            Vec3::new(phi.cos(), phi.sin(), 0.1)
        })
        .collect()
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_ray(c: &mut Criterion) {
    let mut group = c.benchmark_group("ray");
    let newton = NewtonConfig::default();
    let rays: Vec<Trajectory> = directions(256)
        .into_iter()
        .map(|d| Ray::new(Point3::origin(), d).into())
        .collect();

    for (name, surface) in surfaces() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &surface, |b, surface| {
            b.iter(|| {
                for ray in &rays {
                    black_box(intersect(black_box(ray), surface, 1e-6, &newton));
                }
            });
        });
    }
    group.finish();
}

fn bench_helix(c: &mut Criterion) {
    let mut group = c.benchmark_group("helix");
    let newton = NewtonConfig::default();
    let b_field = Vec3::new(0.0, 0.0, 2.0);
    let helices: Vec<Trajectory> = directions(256)
        .into_iter()
        .map(|d| Helix::new(Point3::origin(), &d, -0.001, &b_field).into())
        .collect();

    for (name, surface) in surfaces() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &surface, |b, surface| {
            b.iter(|| {
                for helix in &helices {
                    black_box(intersect(black_box(helix), surface, 1e-6, &newton));
                }
            });
        });
    }
    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(benches, bench_ray, bench_helix);
criterion_main!(benches);
