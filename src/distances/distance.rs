use crate::core::float::ClusterFloat;
use ndarray::{s, Array1, ArrayView1, CowArray, Ix1};
use ndarray_stats::DeviationExt;
use std::fmt::Debug;

/// Trait defining the interface for distance metrics
pub trait DistanceMetric<F: ClusterFloat>: Send + Sync + Debug {
    /// Computes the distance between two points. Points of different lengths are
    /// compared as if the shorter one were padded with zeros.
    fn compute(&self, point1: &ArrayView1<F>, point2: &ArrayView1<F>) -> F;
}

/// [Euclidean Distance](https://en.wikipedia.org/wiki/Euclidean_distance)
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanDistance;

impl<F: ClusterFloat> DistanceMetric<F> for EuclideanDistance {
    #[inline]
    fn compute(&self, point1: &ArrayView1<F>, point2: &ArrayView1<F>) -> F {
        let len = point1.len().max(point2.len());
        let (a, b) = (padded(point1, len), padded(point2, len));
        // sq_l2_dist only fails on empty input, where the distance is zero
        a.sq_l2_dist(&b)
            .map(|d| d.sqrt())
            .unwrap_or_else(|_| F::zero())
    }
}

/// [Manhattan Distance](https://en.wikipedia.org/wiki/Taxicab_geometry)
#[derive(Debug, Clone, Copy, Default)]
pub struct ManhattanDistance;

impl<F: ClusterFloat> DistanceMetric<F> for ManhattanDistance {
    #[inline]
    fn compute(&self, point1: &ArrayView1<F>, point2: &ArrayView1<F>) -> F {
        let len = point1.len().max(point2.len());
        let (a, b) = (padded(point1, len), padded(point2, len));
        a.l1_dist(&b).unwrap_or_else(|_| F::zero())
    }
}

/// Euclidean distance over plain slices.
pub fn euclidean<F: ClusterFloat>(p1: &[F], p2: &[F]) -> F {
    EuclideanDistance.compute(&ArrayView1::from(p1), &ArrayView1::from(p2))
}

/// Manhattan distance over plain slices.
pub fn manhattan<F: ClusterFloat>(p1: &[F], p2: &[F]) -> F {
    ManhattanDistance.compute(&ArrayView1::from(p1), &ArrayView1::from(p2))
}

/// Borrows `point` when it already has `len` coordinates, otherwise copies it
/// into a zero-filled vector of that length.
fn padded<'a, F: ClusterFloat>(point: &'a ArrayView1<F>, len: usize) -> CowArray<'a, F, Ix1> {
    if point.len() == len {
        CowArray::from(point.view())
    } else {
        let mut owned = Array1::zeros(len);
        owned.slice_mut(s![..point.len()]).assign(point);
        CowArray::from(owned)
    }
}
