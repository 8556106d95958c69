use crate::clustering::cluster::DimensionPolicy;
use crate::clustering::hierarchical::AgnesParams;
use crate::clustering::kmeans::{Convergence, KMeansParams};
use crate::clustering::silhouette::{Cohesion, SilhouetteEvaluator};
use crate::core::error::{ClusteringError, ClusteringResult};
use crate::core::float::ClusterFloat;
use crate::distances::{DistanceMetric, EuclideanDistance, ManhattanDistance};
use log::{error, LevelFilter};
use serde::Deserialize;
use std::{fmt, sync::Arc};

#[derive(Debug, Deserialize)]
pub struct AgnesConfig {
    #[serde(default = "default_floor")]
    pub floor: usize,
}

impl Default for AgnesConfig {
    fn default() -> Self {
        Self {
            floor: default_floor(),
        }
    }
}

fn default_floor() -> usize {
    AgnesParams::<f64>::DEFAULT_FLOOR
}

#[derive(Debug, Deserialize)]
pub struct KMeansConfig {
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default)]
    pub convergence: Convergence,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: default_k(),
            max_iterations: default_max_iterations(),
            convergence: Convergence::default(),
            seed: None,
        }
    }
}

fn default_k() -> usize {
    2
}

fn default_max_iterations() -> usize {
    KMeansParams::<f64>::DEFAULT_MAX_ITERATIONS
}

fn default_distance_metric() -> String {
    "Euclidean".to_string()
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String, // Log level, e.g., "info", "debug", "warn", "error"
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_distance_metric")]
    pub distance_metric: String, // E.g., "Euclidean"
    #[serde(default)]
    pub dimension_policy: DimensionPolicy,
    #[serde(default)]
    pub cohesion: Cohesion,
    #[serde(default)]
    pub agnes: AgnesConfig,
    #[serde(default)]
    pub kmeans: KMeansConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration:")?;
        writeln!(f, "  Distance Metric: {}", self.distance_metric)?;
        writeln!(f, "  Dimension Policy: {:?}", self.dimension_policy)?;
        writeln!(f, "  Silhouette Cohesion: {:?}", self.cohesion)?;
        writeln!(f, "  AGNES:")?;
        writeln!(f, "    Floor: {}", self.agnes.floor)?;
        writeln!(f, "  K-Means:")?;
        writeln!(f, "    K: {}", self.kmeans.k)?;
        writeln!(f, "    Max Iterations: {}", self.kmeans.max_iterations)?;
        writeln!(f, "    Convergence: {:?}", self.kmeans.convergence)?;
        if let Some(seed) = self.kmeans.seed {
            writeln!(f, "    Seed: {}", seed)?;
        } else {
            writeln!(f, "    Seed: None")?;
        }
        writeln!(f, "  Logging:")?;
        writeln!(f, "    Level: {}", self.logging.level)?;
        Ok(())
    }
}

impl Config {
    /// Reads the YAML configuration file and returns a `Config` instance.
    pub fn from_file(file_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let file_content = std::fs::read_to_string(file_path)?;
        Self::from_yaml_str(&file_content)
    }

    /// Parses and validates a YAML configuration.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ClusteringResult<()> {
        self.metric::<f64>()?;

        // Validate numeric parameters
        if self.agnes.floor == 0 {
            return Err(invalid("agnes.floor must be greater than 0"));
        }
        if self.kmeans.k == 0 {
            return Err(invalid("kmeans.k must be greater than 0"));
        }
        if self.kmeans.max_iterations == 0 {
            return Err(invalid("kmeans.max_iterations must be greater than 0"));
        }

        self.level_filter().map(|_| ())
    }

    fn metric<F: ClusterFloat>(&self) -> ClusteringResult<Arc<dyn DistanceMetric<F>>> {
        match self.distance_metric.as_str() {
            "Euclidean" => Ok(Arc::new(EuclideanDistance)),
            "Manhattan" => Ok(Arc::new(ManhattanDistance)),
            other => Err(ClusteringError::InvalidConfiguration(format!(
                "Unsupported distance metric: {}",
                other
            ))),
        }
    }

    /// Converts the `agnes` section into `AgnesParams`.
    pub fn to_agnes_params<F: ClusterFloat>(&self) -> ClusteringResult<AgnesParams<F>> {
        Ok(AgnesParams {
            distance_metric: self.metric()?,
            floor: self.agnes.floor,
            dimension_policy: self.dimension_policy,
        })
    }

    /// Converts the `kmeans` section into `KMeansParams`.
    pub fn to_kmeans_params<F: ClusterFloat>(&self) -> ClusteringResult<KMeansParams<F>> {
        Ok(KMeansParams {
            distance_metric: self.metric()?,
            k: self.kmeans.k,
            max_iterations: self.kmeans.max_iterations,
            convergence: self.kmeans.convergence,
            rng_seed: self.kmeans.seed,
            dimension_policy: self.dimension_policy,
        })
    }

    pub fn to_silhouette_evaluator<F: ClusterFloat>(
        &self,
    ) -> ClusteringResult<SilhouetteEvaluator<F>> {
        Ok(SilhouetteEvaluator::new(
            self.metric()?,
            self.cohesion,
        ))
    }

    fn level_filter(&self) -> ClusteringResult<LevelFilter> {
        match self.logging.level.to_lowercase().as_str() {
            "trace" => Ok(LevelFilter::Trace),
            "debug" => Ok(LevelFilter::Debug),
            "info" => Ok(LevelFilter::Info),
            "warn" => Ok(LevelFilter::Warn),
            "error" => Ok(LevelFilter::Error),
            _ => Err(ClusteringError::InvalidConfiguration(format!(
                "Unsupported log level: {}",
                self.logging.level
            ))),
        }
    }

    /// Sets up logging based on the logging level in the configuration.
    pub fn setup_logging(&self) -> ClusteringResult<()> {
        let level_filter = self.level_filter()?;

        if let Err(e) = env_logger::Builder::new()
            .filter_level(level_filter)
            .try_init()
        {
            error!("Failed to initialize logger: {}", e);
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            distance_metric: default_distance_metric(),
            dimension_policy: DimensionPolicy::default(),
            cohesion: Cohesion::default(),
            agnes: AgnesConfig::default(),
            kmeans: KMeansConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn invalid(msg: &str) -> ClusteringError {
    ClusteringError::InvalidConfiguration(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "
distance_metric: Manhattan
dimension_policy: Strict
cohesion: OtherMembers
agnes:
  floor: 4
kmeans:
  k: 3
  max_iterations: 50
  convergence: Membership
  seed: 42
logging:
  level: debug
";

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_yaml_str(FULL).expect("config should parse");
        assert_eq!(config.distance_metric, "Manhattan");
        assert_eq!(config.dimension_policy, DimensionPolicy::Strict);
        assert_eq!(config.cohesion, Cohesion::OtherMembers);
        assert_eq!(config.agnes.floor, 4);
        assert_eq!(config.kmeans.k, 3);
        assert_eq!(config.kmeans.convergence, Convergence::Membership);
        assert_eq!(config.kmeans.seed, Some(42));

        let params = config.to_kmeans_params::<f64>().unwrap();
        assert_eq!(params.k, 3);
        assert_eq!(params.max_iterations, 50);
        assert_eq!(params.rng_seed, Some(42));
        let agnes = config.to_agnes_params::<f64>().unwrap();
        assert_eq!(agnes.floor, 4);
        assert_eq!(agnes.dimension_policy, DimensionPolicy::Strict);
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config = Config::from_yaml_str("kmeans:\n  k: 5\n").unwrap();
        assert_eq!(config.distance_metric, "Euclidean");
        assert_eq!(config.agnes.floor, 20);
        assert_eq!(config.kmeans.k, 5);
        assert_eq!(config.kmeans.max_iterations, 100);
        assert_eq!(config.kmeans.convergence, Convergence::ClusterSizes);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.cohesion, Cohesion::AllMembers);
    }

    #[test]
    fn test_empty_sections_use_defaults() {
        let config = Config::from_yaml_str("agnes: {}\nkmeans: {}\n").unwrap();
        assert_eq!(config.agnes.floor, 20);
        assert_eq!(config.kmeans.k, 2);
        assert_eq!(config.kmeans.max_iterations, 100);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(Config::from_yaml_str("distance_metric: Cosine\n").is_err());
        assert!(Config::from_yaml_str("agnes:\n  floor: 0\n").is_err());
        assert!(Config::from_yaml_str("kmeans:\n  k: 0\n").is_err());
        assert!(Config::from_yaml_str("logging:\n  level: loud\n").is_err());
    }

    #[test]
    fn test_display_lists_parameters() {
        let rendered = Config::default().to_string();
        assert!(rendered.contains("Floor: 20"));
        assert!(rendered.contains("Seed: None"));
    }
}
