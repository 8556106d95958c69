#[cfg(test)]
mod tests {
    use std::fs;

    use clusterfit::clustering::{AgglomerativeClustering, Config, KMeans, Point};
    use tempfile::TempDir;

    const CONFIG: &str = "
distance_metric: Euclidean
agnes:
  floor: 2
kmeans:
  k: 2
  seed: 7
logging:
  level: warn
";

    #[test]
    fn test_load_config_and_run_both_engines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, CONFIG).unwrap();

        let config = Config::from_file(path.to_str().unwrap()).expect("Failed to load configuration");
        config.setup_logging().unwrap();

        let data = Point::from_rows(vec![vec![0.0], vec![1.0], vec![10.0], vec![11.0]]);

        let mut agnes = AgglomerativeClustering::new(config.to_agnes_params().unwrap(), &data);
        agnes.fit().unwrap();
        assert_eq!(agnes.clusters.len(), 2);

        let mut kmeans = KMeans::new(config.to_kmeans_params().unwrap(), &data);
        kmeans.fit().unwrap();
        assert_eq!(kmeans.clusters.len(), 2);

        let evaluator = config.to_silhouette_evaluator().unwrap();
        let scores = evaluator.score_all(&agnes.clusters).unwrap();
        assert!(scores.iter().all(|s| s.unwrap() > 0.8));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.yaml");
        assert!(Config::from_file(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "kmeans:\n  k: 0\n").unwrap();
        assert!(Config::from_file(path.to_str().unwrap()).is_err());
    }
}
