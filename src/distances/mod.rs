pub mod distance;

pub use distance::{euclidean, manhattan, DistanceMetric, EuclideanDistance, ManhattanDistance};
