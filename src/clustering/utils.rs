use crate::clustering::cluster::{DimensionPolicy, Point};
use crate::core::error::{ClusteringError, ClusteringResult};
use crate::core::float::ClusterFloat;
use ndarray::{s, Array1};

/// Checks a dataset before any computation and returns its working
/// dimensionality (the longest vector length).
pub fn validate_points<F: ClusterFloat>(
    data: &[Point<F>],
    policy: DimensionPolicy,
) -> ClusteringResult<usize> {
    let first = data
        .first()
        .ok_or_else(|| ClusteringError::DegenerateInput("dataset is empty".to_string()))?;

    if let Some(point) = data.iter().find(|p| p.coords.iter().any(|c| !c.is_finite())) {
        return Err(ClusteringError::DegenerateInput(format!(
            "point {} has a non-finite coordinate",
            point.id
        )));
    }

    if policy == DimensionPolicy::Strict {
        if let Some(point) = data.iter().find(|p| p.dim() != first.dim()) {
            return Err(ClusteringError::DimensionMismatch {
                id: point.id,
                expected: first.dim(),
                found: point.dim(),
            });
        }
    }

    Ok(data.iter().map(Point::dim).max().unwrap_or(0))
}

/// Observed `(min, max)` of every feature; missing coordinates count as zero.
pub fn feature_bounds<F: ClusterFloat>(data: &[Point<F>], dim: usize) -> Vec<(F, F)> {
    (0..dim)
        .map(|feature| {
            data.iter()
                .map(|p| p.coords.get(feature).copied().unwrap_or_else(F::zero))
                .fold((F::infinity(), F::neg_infinity()), |(lo, hi), v| {
                    (lo.min(v), hi.max(v))
                })
        })
        .collect()
}

/// Coordinate-wise mean of the points at `positions`, padded to `dim`.
/// Returns `None` for an empty selection, whose mean is undefined.
pub fn compute_mean<F: ClusterFloat>(
    data: &[Point<F>],
    positions: &[usize],
    dim: usize,
) -> Option<Array1<F>> {
    if positions.is_empty() {
        return None;
    }
    let mut sum = Array1::<F>::zeros(dim);
    for &pos in positions {
        let coords = &data[pos].coords;
        let mut head = sum.slice_mut(s![..coords.len()]);
        head += coords;
    }
    let count = F::from_count(positions.len());
    Some(sum.mapv(|v| v / count))
}
