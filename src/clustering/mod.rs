pub mod cluster;
pub mod config;
pub mod hierarchical;
pub mod kmeans;
pub mod matrix;
pub mod silhouette;
pub mod utils;

pub use cluster::{Cluster, DimensionPolicy, Point};
pub use config::Config;
pub use hierarchical::{AgglomerativeClustering, AgnesParams, Merge};
pub use kmeans::{Convergence, KMeans, KMeansParams};
pub use matrix::DistanceMatrix;
pub use silhouette::{silhouette_coefficient, Cohesion, SilhouetteEvaluator};
