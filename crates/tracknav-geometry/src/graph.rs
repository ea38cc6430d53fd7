//! Volume connectivity through portals.

use std::collections::VecDeque;
use std::fmt;

use tracknav_math::DINDEX_INVALID;

use crate::detector::Geometry;

/// Adjacency of volumes as given by their portals' volume links.
///
/// The matrix has `n + 1` columns; the last one counts portals that leave
/// the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeGraph {
    n_volumes: usize,
    adjacency: Vec<usize>,
}

impl VolumeGraph {
    /// Build the graph of a geometry.
    pub fn new<G: Geometry>(geometry: &G) -> Self {
        let n = geometry.n_volumes();
        let mut adjacency = vec![0; n * (n + 1)];
        for from in 0..n {
            for &index in geometry.portals(from) {
                let Some(portal) = geometry.surface_at(index) else {
                    continue;
                };
                let link = portal.volume_link();
                let to = if link == DINDEX_INVALID { n } else { link };
                adjacency[from * (n + 1) + to] += 1;
            }
        }
        Self {
            n_volumes: n,
            adjacency,
        }
    }

    /// Number of volumes.
    pub fn n_volumes(&self) -> usize {
        self.n_volumes
    }

    /// Number of portals from `from` into `to`; `to == n_volumes` is the world.
    pub fn edges(&self, from: usize, to: usize) -> usize {
        self.adjacency[from * (self.n_volumes + 1) + to]
    }

    /// Volumes (or the world, as `n_volumes`) reachable in one step.
    pub fn neighbors(&self, from: usize) -> impl Iterator<Item = usize> + '_ {
        (0..=self.n_volumes).filter(move |&to| self.edges(from, to) > 0)
    }

    /// True if some portal of `volume` leaves the world.
    pub fn leaves_world(&self, volume: usize) -> bool {
        self.edges(volume, self.n_volumes) > 0
    }

    /// True if every volume is reachable from volume 0 and the world is
    /// reachable from every volume.
    pub fn is_connected(&self) -> bool {
        if self.n_volumes == 0 {
            return true;
        }
        let reached = self.reachable_from(0);
        reached.iter().take(self.n_volumes).all(|&r| r)
            && (0..self.n_volumes).all(|v| self.reachable_from(v)[self.n_volumes])
    }

    fn reachable_from(&self, start: usize) -> Vec<bool> {
        let mut seen = vec![false; self.n_volumes + 1];
        let mut queue = VecDeque::from([start]);
        seen[start] = true;
        while let Some(v) = queue.pop_front() {
            if v == self.n_volumes {
                continue;
            }
            for to in self.neighbors(v) {
                if !seen[to] {
                    seen[to] = true;
                    queue.push_back(to);
                }
            }
        }
        seen
    }
}

impl fmt::Display for VolumeGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[>>] volume graph: {} nodes", self.n_volumes)?;
        for from in 0..self.n_volumes {
            writeln!(f, "[>>] node {from}")?;
            for to in self.neighbors(from) {
                let n = self.edges(from, to);
                if to == self.n_volumes {
                    writeln!(f, "    -> leaving world ({n})")?;
                } else {
                    writeln!(f, "    -> {to} ({n})")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{telescope, toy_barrel, TelescopeConfig, ToyBarrelConfig};
    use tracknav_intersect::{Ray, Trajectory};
    use tracknav_math::{Point3, Vec3};

    #[test]
    fn test_barrel_graph() {
        let det = toy_barrel(&ToyBarrelConfig::default()).unwrap();
        let graph = VolumeGraph::new(&det);
        assert_eq!(graph.n_volumes(), 4);
        assert_eq!(graph.edges(0, 1), 1);
        assert_eq!(graph.edges(1, 0), 1);
        assert_eq!(graph.edges(1, 2), 1);
        assert_eq!(graph.edges(0, 2), 0);
        // two end-cap discs everywhere, plus the outer cylinder of the last layer
        assert_eq!(graph.edges(0, 4), 2);
        assert_eq!(graph.edges(3, 4), 3);
        assert_eq!(graph.neighbors(2).collect::<Vec<_>>(), vec![1, 3, 4]);
        assert!(graph.leaves_world(1));
        assert!(graph.is_connected());

        let report = graph.to_string();
        assert!(report.contains("[>>] node 3"));
        assert!(report.contains("-> leaving world (3)"));
    }

    #[test]
    fn test_telescope_graph() {
        let pilot: Trajectory = Ray::new(Point3::origin(), Vec3::x()).into();
        let det = telescope(&pilot, &TelescopeConfig::default()).unwrap();
        let graph = VolumeGraph::new(&det);
        assert_eq!(graph.edges(0, 1), 1);
        assert!(graph.is_connected());
    }
}
