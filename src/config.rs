//! Run configuration: the route allow-set and source/destination paths.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// Configuration for one filtering run.
///
/// Stored as a plain JSON object on disk:
/// ```json
/// {
///   "allowed_route_ids": ["3048", "3144", "3175"],
///   "source_directory": "gtfs_extracted",
///   "destination_directory": "assets/gtfs"
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// Route ids to retain; every other route is dropped.
    pub allowed_route_ids: HashSet<String>,
    /// Directory holding the source routes.txt, trips.txt, stop_times.txt.
    pub source_directory: PathBuf,
    /// Directory receiving the filtered and published tables.
    pub destination_directory: PathBuf,
}

impl FilterConfig {
    /// Loads and validates the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {path}"))?;
        let config: FilterConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing config file {path}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects an empty allow-set, which would silently filter every route
    /// away.
    pub fn validate(&self) -> Result<()> {
        if self.allowed_route_ids.is_empty() {
            bail!("allowed_route_ids is empty; supply at least one route id");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filter.json");
        fs::write(
            &path,
            r#"{
                "allowed_route_ids": ["3048", "3144"],
                "source_directory": "gtfs_extracted",
                "destination_directory": "assets/gtfs"
            }"#,
        )
        .unwrap();

        let config = FilterConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.allowed_route_ids.len(), 2);
        assert!(config.allowed_route_ids.contains("3048"));
        assert_eq!(config.source_directory, PathBuf::from("gtfs_extracted"));
    }

    #[test]
    fn test_load_rejects_empty_allow_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filter.json");
        fs::write(
            &path,
            r#"{
                "allowed_route_ids": [],
                "source_directory": "in",
                "destination_directory": "out"
            }"#,
        )
        .unwrap();

        assert!(FilterConfig::load(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filter.json");
        fs::write(&path, "not json").unwrap();

        assert!(FilterConfig::load(path.to_str().unwrap()).is_err());
    }
}
