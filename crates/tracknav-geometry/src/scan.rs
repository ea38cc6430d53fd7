//! Particle-gun scans: every surface along a trajectory, without navigation.
//!
//! The scan is the reference the navigator is compared against. It
//! intersects all surfaces of the detector, so it is slow but cannot miss a
//! candidate the finders would have dropped.

use rayon::prelude::*;
use tracing::debug;
use tracknav_intersect::{intersect, sort_by_path, Intersection, NewtonConfig, Ray, Trajectory};
use tracknav_math::{Point3, Vec3, DINDEX_INVALID};

use crate::detector::Geometry;

/// Margin around surfaces for the ray bounding-box prune.
const PRUNE_ENVELOPE: f64 = 0.1;

/// Two portal crossings closer than this belong to the same boundary.
const BOUNDARY_TOLERANCE: f64 = 1e-4;

/// All `Inside` intersections of `traj` with the geometry, sorted by path.
pub fn shoot<G: Geometry>(
    geometry: &G,
    traj: &Trajectory,
    mask_tolerance: f64,
    newton: &NewtonConfig,
) -> Vec<Intersection> {
    let mut hits = Vec::new();
    for index in 0..geometry.n_surfaces() {
        let Some(surface) = geometry.surface_at(index) else {
            continue;
        };
        if let Trajectory::Ray(ray) = traj {
            if !surface.mask.is_unbounded() {
                if let Ok(bbox) = surface.global_bounds(PRUNE_ENVELOPE) {
                    if ray.intersect_aabb(&bbox).is_none() {
                        continue;
                    }
                }
            }
        }
        hits.extend(
            intersect(traj, surface, mask_tolerance, newton)
                .into_iter()
                .filter(Intersection::is_inside),
        );
    }
    sort_by_path(&mut hits);
    hits
}

/// Sequence of volumes a sorted scan record passes through.
///
/// Starts with `start` and ends with `DINDEX_INVALID` once a portal leaves
/// the world. Each boundary shows up as two portal hits, the exit portal of
/// one volume and the entry portal of the next. Returns `None` if a portal
/// hit belongs to neither side of the current boundary.
pub fn volume_trace(hits: &[Intersection], start: usize) -> Option<Vec<usize>> {
    let mut trace = vec![start];
    let mut current = start;
    let mut previous = DINDEX_INVALID;
    let mut switch_path = f64::NEG_INFINITY;

    for hit in hits.iter().filter(|h| h.is_portal()) {
        let volume = hit.surface.volume();
        let link = hit.volume_link;
        let at_switch = (hit.path - switch_path).abs() < BOUNDARY_TOLERANCE;
        if volume == current && link == previous && at_switch {
            continue;
        }
        if volume != current {
            // entry portal sorted before the exit portal it pairs with
            if link == current {
                continue;
            }
            return None;
        }
        previous = current;
        current = link;
        switch_path = hit.path;
        trace.push(current);
        if current == DINDEX_INVALID {
            break;
        }
    }
    Some(trace)
}

/// Angular grid of a scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Common origin of all rays.
    pub origin: Point3,
    /// Number of polar angle steps.
    pub n_theta: usize,
    /// Number of azimuth steps.
    pub n_phi: usize,
    /// Polar angle range `[min, max]`.
    pub theta_range: [f64; 2],
    /// Mask tolerance for the intersectors.
    pub mask_tolerance: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            origin: Point3::origin(),
            n_theta: 10,
            n_phi: 10,
            theta_range: [0.1, std::f64::consts::PI - 0.1],
            mask_tolerance: 1e-6,
        }
    }
}

/// Result of one scan direction.
#[derive(Debug, Clone)]
pub struct ScanRecord {
    /// Ray direction.
    pub direction: Vec3,
    /// Sorted intersections.
    pub hits: Vec<Intersection>,
    /// Volumes passed, if the portal sequence is consistent.
    pub trace: Option<Vec<usize>>,
}

/// Shoot rays over a theta/phi grid in parallel.
pub fn ray_scan<G: Geometry>(geometry: &G, config: &ScanConfig) -> Vec<ScanRecord> {
    let newton = NewtonConfig::default();
    let start = geometry.volume_by_pos(&config.origin);
    let [theta_min, theta_max] = config.theta_range;
    let d_theta = if config.n_theta > 1 {
        (theta_max - theta_min) / (config.n_theta - 1) as f64
    } else {
        0.0
    };
    let d_phi = std::f64::consts::TAU / config.n_phi.max(1) as f64;

    let records: Vec<ScanRecord> = (0..config.n_theta * config.n_phi)
        .into_par_iter()
        .map(|k| {
            let theta = theta_min + (k / config.n_phi.max(1)) as f64 * d_theta;
            let phi = -std::f64::consts::PI + (k % config.n_phi.max(1)) as f64 * d_phi;
            let direction = Vec3::new(
                theta.sin() * phi.cos(),
                theta.sin() * phi.sin(),
                theta.cos(),
            );
            let ray = Ray::new(config.origin, direction);
            let hits = shoot(geometry, &ray.into(), config.mask_tolerance, &newton);
            let trace = start.and_then(|s| volume_trace(&hits, s));
            ScanRecord {
                direction,
                hits,
                trace,
            }
        })
        .collect();

    debug!(rays = records.len(), "finished ray scan");
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{telescope, toy_barrel, TelescopeConfig, ToyBarrelConfig};
    use crate::graph::VolumeGraph;
    use approx::assert_relative_eq;

    #[test]
    fn test_shoot_telescope() {
        let pilot: Trajectory = Ray::new(Point3::origin(), Vec3::x()).into();
        let det = telescope(&pilot, &TelescopeConfig::default()).unwrap();
        let hits = shoot(&det, &pilot, 1e-6, &NewtonConfig::default());
        assert_eq!(hits.len(), 5);
        for (hit, expected) in hits.iter().zip([20.0, 40.0, 60.0, 80.0, 100.0]) {
            assert_relative_eq!(hit.path, expected, epsilon = 1e-9);
        }
        assert!(hits[4].is_portal());
        assert_eq!(volume_trace(&hits, 0), Some(vec![0, DINDEX_INVALID]));
    }

    #[test]
    fn test_shoot_barrel_radially() {
        let det = toy_barrel(&ToyBarrelConfig::default()).unwrap();
        let ray: Trajectory = Ray::new(Point3::origin(), Vec3::new(1.0, 0.2, 0.0)).into();
        let hits = shoot(&det, &ray, 1e-6, &NewtonConfig::default());

        // beampipe wall, 3 staves (one per layer), 2 portals per boundary
        // crossed and the world exit
        let sensitive = hits.iter().filter(|h| h.surface.is_sensitive()).count();
        assert_eq!(sensitive, 3);
        assert_eq!(hits.iter().filter(|h| h.is_portal()).count(), 7);
        assert!(hits.windows(2).all(|w| w[0].path <= w[1].path));
        assert_eq!(volume_trace(&hits, 0), Some(vec![0, 1, 2, 3, DINDEX_INVALID]));
    }

    #[test]
    fn test_parallel_scan_connectivity() {
        let det = toy_barrel(&ToyBarrelConfig::default()).unwrap();
        let graph = VolumeGraph::new(&det);
        let config = ScanConfig {
            n_theta: 6,
            n_phi: 8,
            ..ScanConfig::default()
        };
        let records = ray_scan(&det, &config);
        assert_eq!(records.len(), 48);
        for record in &records {
            let Some(trace) = &record.trace else {
                panic!("inconsistent portals along {:?}", record.direction);
            };
            assert_eq!(trace.first(), Some(&0));
            assert_eq!(trace.last(), Some(&DINDEX_INVALID));
            for step in trace.windows(2) {
                let to = if step[1] == DINDEX_INVALID {
                    graph.n_volumes()
                } else {
                    step[1]
                };
                assert!(graph.edges(step[0], to) > 0, "{step:?} not in graph");
            }
        }
    }
}
