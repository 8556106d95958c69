use crate::clustering::cluster::{Cluster, Point};
use crate::core::error::{ClusteringError, ClusteringResult};
use crate::core::float::ClusterFloat;
use crate::distances::{DistanceMetric, EuclideanDistance};
use serde::Deserialize;
use std::sync::Arc;

/// How a point's mean distance to its own cluster is averaged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum Cohesion {
    /// Average over all members, the point itself included at distance zero.
    #[default]
    AllMembers,
    /// Average over the other members only; zero for a singleton.
    OtherMembers,
}

/// Scores clusters with the silhouette coefficient: `(b - a) / max(a, b)` per
/// point, where `a` is the mean distance to the point's own cluster and `b`
/// the smallest mean distance to any other cluster.
pub struct SilhouetteEvaluator<F: ClusterFloat> {
    pub distance_metric: Arc<dyn DistanceMetric<F>>,
    pub cohesion: Cohesion,
}

impl<F: ClusterFloat> Default for SilhouetteEvaluator<F> {
    fn default() -> Self {
        Self {
            distance_metric: Arc::new(EuclideanDistance),
            cohesion: Cohesion::default(),
        }
    }
}

impl<F: ClusterFloat> SilhouetteEvaluator<F> {
    pub fn new(distance_metric: Arc<dyn DistanceMetric<F>>, cohesion: Cohesion) -> Self {
        Self {
            distance_metric,
            cohesion,
        }
    }

    /// Mean silhouette of the members of `cluster`, contrasted with the other
    /// non-empty clusters of `clusters`.
    ///
    /// `cluster` is recognised inside `clusters` by identity or by identical
    /// member ids. Fails when `cluster` is empty or no other non-empty cluster
    /// exists.
    pub fn score(&self, cluster: &Cluster<F>, clusters: &[Cluster<F>]) -> ClusteringResult<F> {
        if cluster.is_empty() {
            return Err(ClusteringError::DegenerateInput(
                "cannot score an empty cluster".to_string(),
            ));
        }
        let others: Vec<&Cluster<F>> = clusters
            .iter()
            .filter(|other| !other.is_empty() && !is_same(other, cluster))
            .collect();
        if others.is_empty() {
            return Err(ClusteringError::DegenerateInput(
                "silhouette needs at least two non-empty clusters".to_string(),
            ));
        }

        let total = cluster
            .iter()
            .fold(F::zero(), |acc, p| acc + self.point_score(p, cluster, &others));
        Ok(total / F::from_count(cluster.len()))
    }

    /// Scores every cluster of a partition; empty clusters get `None`.
    pub fn score_all(&self, clusters: &[Cluster<F>]) -> ClusteringResult<Vec<Option<F>>> {
        clusters
            .iter()
            .map(|cluster| {
                if cluster.is_empty() {
                    Ok(None)
                } else {
                    self.score(cluster, clusters).map(Some)
                }
            })
            .collect()
    }

    /// Silhouette of a single point `p` of `cluster`.
    pub fn point_score(&self, p: &Point<F>, cluster: &Cluster<F>, others: &[&Cluster<F>]) -> F {
        let a = self.cohesion(p, cluster);
        let b = self.separation(p, others);
        let scale = a.max(b);
        if scale == F::zero() {
            F::zero()
        } else {
            (b - a) / scale
        }
    }

    /// `a(p)`: mean distance from `p` to its own cluster.
    pub fn cohesion(&self, p: &Point<F>, cluster: &Cluster<F>) -> F {
        match self.cohesion {
            Cohesion::AllMembers => self.mean_distance(p, cluster),
            Cohesion::OtherMembers => {
                let (sum, count) = cluster
                    .iter()
                    .filter(|q| q.id != p.id)
                    .fold((F::zero(), 0usize), |(sum, count), q| {
                        (sum + self.distance(p, q), count + 1)
                    });
                if count == 0 {
                    F::zero()
                } else {
                    sum / F::from_count(count)
                }
            }
        }
    }

    /// `b(p)`: smallest mean distance from `p` to any of `others`.
    pub fn separation(&self, p: &Point<F>, others: &[&Cluster<F>]) -> F {
        others
            .iter()
            .map(|other| self.mean_distance(p, other))
            .fold(F::infinity(), |min, d| min.min(d))
    }

    fn mean_distance(&self, p: &Point<F>, cluster: &Cluster<F>) -> F {
        if cluster.is_empty() {
            return F::zero();
        }
        let sum = cluster
            .iter()
            .fold(F::zero(), |acc, q| acc + self.distance(p, q));
        sum / F::from_count(cluster.len())
    }

    #[inline]
    fn distance(&self, p: &Point<F>, q: &Point<F>) -> F {
        self.distance_metric
            .compute(&p.coords.view(), &q.coords.view())
    }
}

/// Silhouette score of `cluster` within `clusters` under Euclidean distance.
pub fn silhouette_coefficient<F: ClusterFloat>(
    cluster: &Cluster<F>,
    clusters: &[Cluster<F>],
) -> ClusteringResult<F> {
    SilhouetteEvaluator::default().score(cluster, clusters)
}

fn is_same<F: ClusterFloat>(a: &Cluster<F>, b: &Cluster<F>) -> bool {
    std::ptr::eq(a, b) || a.ids().eq(b.ids())
}
