//! clusterfit: agglomerative and k-means clustering of numeric feature vectors
//!
//! Partitions are scored with the silhouette coefficient.
//!
//! # Modules
//! - `distances`: Euclidean and Manhattan distance over vectors of possibly unequal length.
//! - `clustering`: the distance matrix, the AGNES and k-means engines, and silhouette scoring.
//! - `core`: the float bound shared by all engines and the error type.

pub mod clustering;
pub mod core;
pub mod distances;

pub use crate::clustering::{
    silhouette_coefficient, AgglomerativeClustering, AgnesParams, Cluster, Config, KMeans,
    KMeansParams, Point, SilhouetteEvaluator,
};
pub use crate::core::{ClusterFloat, ClusteringError, ClusteringResult};
