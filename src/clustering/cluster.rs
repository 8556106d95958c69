use crate::core::float::ClusterFloat;
use ndarray::{Array1, ArrayView2};
use serde::Deserialize;

/// How a dataset with vectors of differing lengths is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum DimensionPolicy {
    /// Shorter vectors are compared as if padded with zeros.
    #[default]
    Lenient,
    /// Every vector must have the same length as the first one.
    Strict,
}

/// A feature vector with an identity that is unique within its dataset.
/// The id is only used to index the distance matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Point<F> {
    pub id: usize,
    pub coords: Array1<F>,
}

impl<F: ClusterFloat> Point<F> {
    pub fn new(id: usize, coords: Vec<F>) -> Self {
        Self {
            id,
            coords: Array1::from(coords),
        }
    }

    /// Builds a dataset from rows, numbering points `0..n` in input order.
    pub fn from_rows(rows: Vec<Vec<F>>) -> Vec<Self> {
        rows.into_iter()
            .enumerate()
            .map(|(id, coords)| Self::new(id, coords))
            .collect()
    }

    /// Builds a dataset from the rows of a matrix.
    pub fn from_array(data: ArrayView2<F>) -> Vec<Self> {
        data.rows()
            .into_iter()
            .enumerate()
            .map(|(id, row)| Self {
                id,
                coords: row.to_owned(),
            })
            .collect()
    }

    pub fn dim(&self) -> usize {
        self.coords.len()
    }
}

/// An insertion-ordered group of points. Clusters in one partition are disjoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster<F> {
    pub points: Vec<Point<F>>,
}

impl<F> Default for Cluster<F> {
    fn default() -> Self {
        Self { points: Vec::new() }
    }
}

impl<F: ClusterFloat> Cluster<F> {
    pub fn new(points: Vec<Point<F>>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point<F>> {
        self.points.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.points.iter().map(|p| p.id)
    }

    pub fn contains_id(&self, id: usize) -> bool {
        self.points.iter().any(|p| p.id == id)
    }

    /// Copies the points at `positions` out of `data`, keeping the given order.
    pub(crate) fn gather(data: &[Point<F>], positions: &[usize]) -> Self {
        Self {
            points: positions.iter().map(|&pos| data[pos].clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cluster, Point};
    use ndarray::array;

    #[test]
    fn test_from_rows_assigns_sequential_ids() {
        let points = Point::from_rows(vec![vec![1.0, 2.0], vec![3.0], vec![]]);
        assert_eq!(points.len(), 3);
        assert_eq!(points.iter().map(|p| p.id).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(points[1].dim(), 1);
        assert_eq!(points[2].dim(), 0);
    }

    #[test]
    fn test_from_array() {
        let data = array![[1.0, 2.0], [3.0, 4.0]];
        let points = Point::from_array(data.view());
        assert_eq!(points[1].id, 1);
        assert_eq!(points[1].coords, array![3.0, 4.0]);
    }

    #[test]
    fn test_gather_keeps_order() {
        let points = Point::from_rows(vec![vec![0.0], vec![1.0], vec![2.0]]);
        let cluster = Cluster::gather(&points, &[2, 0]);
        assert_eq!(cluster.ids().collect::<Vec<_>>(), vec![2, 0]);
        assert!(cluster.contains_id(0));
        assert!(!cluster.contains_id(1));
        assert_eq!(cluster.len(), 2);
    }
}
