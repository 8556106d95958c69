use crate::clustering::cluster::{Cluster, DimensionPolicy, Point};
use crate::clustering::utils::{compute_mean, feature_bounds, validate_points};
use crate::core::error::{ClusteringError, ClusteringResult};
use crate::core::float::ClusterFloat;
use crate::distances::{DistanceMetric, EuclideanDistance};
use log::{debug, info, trace, warn};
use ndarray::Array1;
use rand::distr::{Distribution, Uniform};
use rand::rngs::SmallRng;
use rand::{rng, Rng, SeedableRng};
use serde::Deserialize;
use std::sync::Arc;

/// When an assignment pass counts as stable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum Convergence {
    /// Stop when every cluster has as many points as after the previous pass.
    /// Points swapping between clusters can go unnoticed.
    #[default]
    ClusterSizes,
    /// Stop when no point changed cluster. Stricter than `ClusterSizes`.
    Membership,
}

pub struct KMeansParams<F: ClusterFloat> {
    pub distance_metric: Arc<dyn DistanceMetric<F>>,
    pub k: usize,
    /// Upper bound on assignment passes.
    pub max_iterations: usize,
    pub convergence: Convergence,
    pub rng_seed: Option<u64>,
    pub dimension_policy: DimensionPolicy,
}

impl<F: ClusterFloat> KMeansParams<F> {
    pub const DEFAULT_MAX_ITERATIONS: usize = 100;

    pub fn with_k(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }
}

impl<F: ClusterFloat> Default for KMeansParams<F> {
    fn default() -> Self {
        Self {
            distance_metric: Arc::new(EuclideanDistance),
            k: 2,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            convergence: Convergence::ClusterSizes,
            rng_seed: None,
            dimension_policy: DimensionPolicy::Lenient,
        }
    }
}

/// Lloyd-style k-means with centroids drawn uniformly from each feature's range.
pub struct KMeans<'a, F: ClusterFloat> {
    /// Exactly `k` clusters, some possibly empty.
    pub clusters: Vec<Cluster<F>>,
    /// Centroids used for the final assignment pass.
    pub centroids: Vec<Array1<F>>,
    pub iterations: usize,
    pub converged: bool,
    pub data: &'a [Point<F>],
    pub params: KMeansParams<F>,
    assignments: Vec<usize>,
}

impl<'a, F: ClusterFloat> KMeans<'a, F> {
    pub fn new(params: KMeansParams<F>, data: &'a [Point<F>]) -> Self {
        Self {
            clusters: Vec::new(),
            centroids: Vec::new(),
            iterations: 0,
            converged: false,
            data,
            params,
            assignments: Vec::new(),
        }
    }

    /// Runs k-means with a generator seeded from `rng_seed` (or entropy).
    pub fn fit(&mut self) -> ClusteringResult<()> {
        let mut rng = self.get_rng();
        self.fit_with_rng(&mut rng)
    }

    /// Runs k-means drawing the initial centroids from `rng`.
    pub fn fit_with_rng<R: Rng>(&mut self, rng: &mut R) -> ClusteringResult<()> {
        self.validate_params()?;
        let dim = validate_points(self.data, self.params.dimension_policy)?;
        let k = self.params.k;
        info!(
            "Running k-means over {} points with k = {} ({} features)",
            self.data.len(),
            k,
            dim
        );

        self.initialize_centroids(dim, rng)?;
        self.assignments.clear();
        self.iterations = 0;
        self.converged = false;
        let mut previous_sizes = vec![0usize; k];

        loop {
            self.iterations += 1;
            let assignments = self.assign_points();
            let previous = std::mem::replace(&mut self.assignments, assignments);
            let sizes = self.cluster_sizes();
            debug!("Iteration {}: cluster sizes {:?}", self.iterations, sizes);

            let stable = match self.params.convergence {
                Convergence::ClusterSizes => sizes == previous_sizes,
                Convergence::Membership => previous == self.assignments,
            };
            if stable {
                self.converged = true;
                break;
            }
            if self.iterations >= self.params.max_iterations {
                warn!(
                    "k-means stopped after {} iterations without converging",
                    self.iterations
                );
                break;
            }

            self.update_centroids(dim);
            previous_sizes = sizes;
        }

        self.clusters = self
            .members()
            .iter()
            .map(|positions| Cluster::gather(self.data, positions))
            .collect();
        info!(
            "k-means finished after {} iterations (converged: {})",
            self.iterations, self.converged
        );
        Ok(())
    }

    fn validate_params(&self) -> ClusteringResult<()> {
        if self.params.k == 0 {
            return Err(ClusteringError::InvalidConfiguration(
                "k must be at least 1".to_string(),
            ));
        }
        if self.params.max_iterations == 0 {
            return Err(ClusteringError::InvalidConfiguration(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns a random number generator based on the seed (or entropy).
    fn get_rng(&self) -> SmallRng {
        match self.params.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut rng()),
        }
    }

    /// Draws each centroid coordinate uniformly from that feature's observed range.
    /// Fails when a range is too wide to sample, e.g. `[-1e308, 1e308]`.
    fn initialize_centroids<R: Rng>(&mut self, dim: usize, rng: &mut R) -> ClusteringResult<()> {
        let samplers = feature_bounds(self.data, dim)
            .into_iter()
            .enumerate()
            .map(|(feature, (lo, hi))| {
                Uniform::<F>::new_inclusive(lo, hi).map_err(|e| {
                    ClusteringError::DegenerateInput(format!(
                        "feature {} range [{}, {}] cannot be sampled: {}",
                        feature, lo, hi, e
                    ))
                })
            })
            .collect::<ClusteringResult<Vec<_>>>()?;

        self.centroids = (0..self.params.k)
            .map(|_| {
                samplers
                    .iter()
                    .map(|sampler| sampler.sample(&mut *rng))
                    .collect::<Array1<F>>()
            })
            .collect();
        Ok(())
    }

    /// Index of the nearest centroid for every point. Ties go to the lower index.
    fn assign_points(&self) -> Vec<usize> {
        let metric = &self.params.distance_metric;
        self.data
            .iter()
            .map(|point| {
                self.centroids
                    .iter()
                    .enumerate()
                    .fold((0, F::infinity()), |(best, min_dist), (idx, centroid)| {
                        let dist = metric.compute(&point.coords.view(), &centroid.view());
                        if dist < min_dist {
                            (idx, dist)
                        } else {
                            (best, min_dist)
                        }
                    })
                    .0
            })
            .collect()
    }

    /// Moves every centroid to the mean of its members. Empty clusters keep
    /// their previous centroid.
    fn update_centroids(&mut self, dim: usize) {
        for (c_idx, positions) in self.members().iter().enumerate() {
            match compute_mean(self.data, positions, dim) {
                Some(mean) => self.centroids[c_idx] = mean,
                None => trace!("Cluster {} is empty; keeping its centroid", c_idx),
            }
        }
    }

    /// Dataset positions of each cluster's members, in dataset order.
    fn members(&self) -> Vec<Vec<usize>> {
        let mut members = vec![Vec::new(); self.params.k];
        for (pos, &c_idx) in self.assignments.iter().enumerate() {
            members[c_idx].push(pos);
        }
        members
    }

    fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.params.k];
        for &c_idx in &self.assignments {
            sizes[c_idx] += 1;
        }
        sizes
    }

    /// Cluster index of every point, by dataset position.
    pub fn labels(&self) -> Vec<usize> {
        self.assignments.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn create_test_data() -> Vec<Point<f64>> {
        Point::from_rows(vec![
            vec![1.0, 2.0],
            vec![1.5, 2.5],
            vec![8.0, 8.0],
            vec![8.5, 8.5],
            vec![4.0, 4.0],
            vec![4.5, 4.5],
        ])
    }

    fn seeded(k: usize, seed: u64) -> KMeansParams<f64> {
        KMeansParams {
            rng_seed: Some(seed),
            ..KMeansParams::with_k(k)
        }
    }

    #[test]
    fn test_initial_centroids_lie_within_feature_ranges() {
        let data = create_test_data();
        let mut kmeans = KMeans::new(seeded(4, 7), &data);
        let mut rng = SmallRng::seed_from_u64(7);
        kmeans.initialize_centroids(2, &mut rng).unwrap();

        assert_eq!(kmeans.centroids.len(), 4);
        for centroid in &kmeans.centroids {
            assert_eq!(centroid.len(), 2);
            assert!((1.0..=8.5).contains(&centroid[0]));
            assert!((2.0..=8.5).contains(&centroid[1]));
        }
    }

    #[test]
    fn test_unsamplable_feature_range_is_rejected() {
        let data = Point::from_rows(vec![vec![-1e308], vec![1e308]]);
        let mut kmeans = KMeans::new(seeded(2, 1), &data);
        assert!(matches!(
            kmeans.fit(),
            Err(ClusteringError::DegenerateInput(_))
        ));
        assert!(kmeans.clusters.is_empty());
        assert_eq!(kmeans.iterations, 0);
    }

    #[test]
    fn test_assignment_ties_go_to_first_centroid() {
        let data = Point::from_rows(vec![vec![5.0]]);
        let mut kmeans = KMeans::new(seeded(2, 1), &data);
        kmeans.centroids = vec![array![4.0], array![6.0]];
        assert_eq!(kmeans.assign_points(), vec![0]);
    }

    #[test]
    fn test_empty_cluster_keeps_previous_centroid() {
        let data = Point::from_rows(vec![vec![0.0], vec![1.0]]);
        let mut kmeans = KMeans::new(seeded(2, 1), &data);
        kmeans.centroids = vec![array![0.2], array![100.0]];
        kmeans.assignments = kmeans.assign_points();
        assert_eq!(kmeans.cluster_sizes(), vec![2, 0]);

        kmeans.update_centroids(1);
        assert_eq!(kmeans.centroids, vec![array![0.5], array![100.0]]);
    }

    #[test]
    fn test_fit_partitions_every_point() {
        let data = create_test_data();
        let mut kmeans = KMeans::new(seeded(3, 42), &data);
        kmeans.fit().expect("Clustering failed");

        assert_eq!(kmeans.clusters.len(), 3);
        assert_eq!(kmeans.centroids.len(), 3);
        assert_eq!(
            kmeans.clusters.iter().map(Cluster::len).sum::<usize>(),
            data.len()
        );
        assert_eq!(kmeans.labels().len(), data.len());
    }

    #[test]
    fn test_seed_makes_runs_reproducible() {
        let data = create_test_data();
        let mut first = KMeans::new(seeded(3, 9), &data);
        let mut second = KMeans::new(seeded(3, 9), &data);
        first.fit().unwrap();
        second.fit().unwrap();

        assert_eq!(first.labels(), second.labels());
        assert_eq!(first.centroids, second.centroids);
        assert_eq!(first.iterations, second.iterations);
    }

    #[test]
    fn test_more_clusters_than_points() {
        let data = Point::from_rows(vec![vec![0.0], vec![1.0]]);
        let mut kmeans = KMeans::new(seeded(5, 3), &data);
        kmeans.fit().unwrap();

        assert_eq!(kmeans.clusters.len(), 5);
        assert!(kmeans.clusters.iter().filter(|c| c.is_empty()).count() >= 3);
        assert_eq!(kmeans.clusters.iter().map(Cluster::len).sum::<usize>(), 2);
    }

    #[test]
    fn test_iteration_cap() {
        let data = create_test_data();
        let params = KMeansParams {
            max_iterations: 1,
            ..seeded(2, 5)
        };
        let mut kmeans = KMeans::new(params, &data);
        kmeans.fit().unwrap();

        // the first pass never matches the all-zero size vector
        assert_eq!(kmeans.iterations, 1);
        assert!(!kmeans.converged);
        assert_eq!(kmeans.clusters.iter().map(Cluster::len).sum::<usize>(), data.len());
    }

    #[test]
    fn test_invalid_params() {
        let data = create_test_data();
        let mut kmeans = KMeans::new(seeded(0, 1), &data);
        assert!(matches!(
            kmeans.fit(),
            Err(ClusteringError::InvalidConfiguration(_))
        ));

        let params = KMeansParams {
            max_iterations: 0,
            ..seeded(2, 1)
        };
        let mut kmeans = KMeans::new(params, &data);
        assert!(matches!(
            kmeans.fit(),
            Err(ClusteringError::InvalidConfiguration(_))
        ));
    }
}
