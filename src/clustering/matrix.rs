use crate::clustering::cluster::Point;
use crate::core::error::{ClusteringError, ClusteringResult};
use crate::core::float::ClusterFloat;
use crate::distances::{DistanceMetric, EuclideanDistance};
use fxhash::FxHashMap;
use log::debug;
use ndarray::Array2;

/// Symmetric cache of pairwise point distances for one clustering run.
///
/// Rows and columns follow the order of the dataset the matrix was built from;
/// `get` resolves point ids to those positions. The matrix has no notion of
/// invalidation: a changed dataset needs a new matrix.
#[derive(Debug, Clone)]
pub struct DistanceMatrix<F> {
    distances: Array2<F>,
    positions: FxHashMap<usize, usize>,
}

impl<F: ClusterFloat> DistanceMatrix<F> {
    /// Computes every pairwise distance of `points` under `metric`.
    pub fn build(points: &[Point<F>], metric: &dyn DistanceMetric<F>) -> ClusteringResult<Self> {
        let n = points.len();
        let mut positions = FxHashMap::default();
        for (pos, point) in points.iter().enumerate() {
            if positions.insert(point.id, pos).is_some() {
                return Err(ClusteringError::DegenerateInput(format!(
                    "point id {} appears more than once",
                    point.id
                )));
            }
        }

        let mut distances = Array2::<F>::zeros((n, n));
        for (x, px) in points.iter().enumerate() {
            for (y, py) in points.iter().enumerate().skip(x) {
                let d = metric.compute(&px.coords.view(), &py.coords.view());
                distances[[x, y]] = d;
                distances[[y, x]] = d;
            }
        }
        debug!("Built {}x{} distance matrix", n, n);

        Ok(Self {
            distances,
            positions,
        })
    }

    /// Builds the matrix under Euclidean distance.
    pub fn euclidean(points: &[Point<F>]) -> ClusteringResult<Self> {
        Self::build(points, &EuclideanDistance)
    }

    /// Distance between the points with ids `x` and `y`, if both were in the dataset.
    pub fn get(&self, x: usize, y: usize) -> Option<F> {
        let (&px, &py) = (self.positions.get(&x)?, self.positions.get(&y)?);
        Some(self.distances[[px, py]])
    }

    /// Distance between the points at dataset positions `x` and `y`.
    #[inline]
    pub(crate) fn at(&self, x: usize, y: usize) -> F {
        self.distances[[x, y]]
    }

    /// Minimum distance over all cross pairs of two groups of dataset positions.
    pub fn single_link(&self, a: &[usize], b: &[usize]) -> F {
        a.iter()
            .flat_map(|&x| b.iter().map(move |&y| self.at(x, y)))
            .fold(F::infinity(), |min, d| min.min(d))
    }

    pub fn len(&self) -> usize {
        self.distances.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
