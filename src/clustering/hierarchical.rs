use crate::clustering::cluster::{Cluster, DimensionPolicy, Point};
use crate::clustering::matrix::DistanceMatrix;
use crate::clustering::utils::validate_points;
use crate::core::error::{ClusteringError, ClusteringResult};
use crate::core::float::ClusterFloat;
use crate::distances::{DistanceMetric, EuclideanDistance};
use log::{debug, info, warn};
use std::sync::Arc;

pub struct AgnesParams<F: ClusterFloat> {
    pub distance_metric: Arc<dyn DistanceMetric<F>>,
    /// Merging stops once this many clusters remain.
    pub floor: usize,
    pub dimension_policy: DimensionPolicy,
}

impl<F: ClusterFloat> AgnesParams<F> {
    pub const DEFAULT_FLOOR: usize = 20;

    pub fn with_floor(floor: usize) -> Self {
        Self {
            floor,
            ..Self::default()
        }
    }
}

impl<F: ClusterFloat> Default for AgnesParams<F> {
    fn default() -> Self {
        Self {
            distance_metric: Arc::new(EuclideanDistance),
            floor: Self::DEFAULT_FLOOR,
            dimension_policy: DimensionPolicy::Lenient,
        }
    }
}

/// One step of the dendrogram: the cluster at `absorbed` was folded into the
/// cluster at `survivor` (positions in the partition at the time of the merge).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge<F> {
    pub survivor: usize,
    pub absorbed: usize,
    /// Single-link distance between the two clusters.
    pub distance: F,
    /// Size of the survivor after the merge.
    pub size: usize,
}

/// Bottom-up single-link clustering cut at a fixed number of clusters.
pub struct AgglomerativeClustering<'a, F: ClusterFloat> {
    pub clusters: Vec<Cluster<F>>,
    pub merges: Vec<Merge<F>>,
    pub data: &'a [Point<F>],
    pub params: AgnesParams<F>,
    partition: Vec<Vec<usize>>,
}

impl<'a, F: ClusterFloat> AgglomerativeClustering<'a, F> {
    pub fn new(params: AgnesParams<F>, data: &'a [Point<F>]) -> Self {
        Self {
            clusters: Vec::new(),
            merges: Vec::new(),
            data,
            params,
            partition: Vec::new(),
        }
    }

    /// Merges the two closest clusters until `floor` clusters remain.
    pub fn fit(&mut self) -> ClusteringResult<()> {
        if self.params.floor == 0 {
            return Err(ClusteringError::InvalidConfiguration(
                "floor must be at least 1".to_string(),
            ));
        }
        validate_points(self.data, self.params.dimension_policy)?;
        let matrix = DistanceMatrix::build(self.data, self.params.distance_metric.as_ref())?;

        let n = self.data.len();
        info!(
            "Running AGNES over {} points down to {} clusters",
            n, self.params.floor
        );
        if n <= self.params.floor {
            warn!(
                "Dataset has {} points, not more than the floor of {}; nothing to merge",
                n, self.params.floor
            );
        }

        self.partition = (0..n).map(|pos| vec![pos]).collect();
        self.merges.clear();
        while self.partition.len() > self.params.floor {
            let Some((survivor, absorbed, distance)) = closest_pair(&matrix, &self.partition)
            else {
                break;
            };
            self.merge(survivor, absorbed, distance);
        }

        self.clusters = self
            .partition
            .iter()
            .map(|positions| Cluster::gather(self.data, positions))
            .collect();
        info!(
            "AGNES finished after {} merges with {} clusters",
            self.merges.len(),
            self.clusters.len()
        );
        Ok(())
    }

    /// Moves every member of `absorbed` into `survivor`; the partition closes the gap.
    fn merge(&mut self, survivor: usize, absorbed: usize, distance: F) {
        let members = self.partition.remove(absorbed);
        self.partition[survivor].extend(members);
        let size = self.partition[survivor].len();
        debug!(
            "Merged cluster {} into cluster {} at distance {} (size {})",
            absorbed, survivor, distance, size
        );
        self.merges.push(Merge {
            survivor,
            absorbed,
            distance,
            size,
        });
    }

    /// Cluster index of every point, by dataset position.
    pub fn labels(&self) -> Vec<usize> {
        let mut labels = vec![0usize; self.data.len()];
        for (c_idx, positions) in self.partition.iter().enumerate() {
            for &pos in positions {
                labels[pos] = c_idx;
            }
        }
        labels
    }
}

/// Pair of partition indices `(i, j)`, `i < j`, with the smallest single-link
/// distance. Ties go to the pair seen first in row-major scan order.
fn closest_pair<F: ClusterFloat>(
    matrix: &DistanceMatrix<F>,
    partition: &[Vec<usize>],
) -> Option<(usize, usize, F)> {
    let mut best: Option<(usize, usize, F)> = None;
    for (i, ci) in partition.iter().enumerate() {
        for (j, cj) in partition.iter().enumerate().skip(i + 1) {
            let distance = matrix.single_link(ci, cj);
            if best.map_or(true, |(_, _, min)| distance < min) {
                best = Some((i, j, distance));
            }
        }
    }
    best
}
