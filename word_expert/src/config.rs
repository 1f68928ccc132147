//! Engine configuration, loaded from TOML.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{EngineError, Result};

/// Tunables for a processing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Capacity of the working-memory recency lists.
    pub recent_limit: usize,

    /// Whether narrative sentences are folded into episodic memory.
    pub fold_episodes: bool,

    /// Action head -> script (MOP) instantiated when that action is read.
    pub scripts: BTreeMap<String, String>,

    /// Action head -> relationship kind created between actor and thing.
    pub relationships: BTreeMap<String, String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            recent_limit: 16,
            fold_episodes: true,
            scripts: BTreeMap::from([("INGEST".to_string(), "MopMeal".to_string())]),
            relationships: BTreeMap::from([("MARRY".to_string(), "Spouse".to_string())]),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.recent_limit, 16);
        assert!(config.fold_episodes);
        assert_eq!(config.scripts.get("INGEST").map(String::as_str), Some("MopMeal"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str("recent_limit = 4").unwrap();
        assert_eq!(config.recent_limit, 4);
        assert!(config.fold_episodes);
        assert!(config.relationships.contains_key("MARRY"));
    }

    #[test]
    fn test_full_toml() {
        let config = EngineConfig::from_toml_str(
            r#"
            fold_episodes = false

            [scripts]
            PTRANS = "MopDelivery"

            [relationships]
            "#,
        )
        .unwrap();

        assert!(!config.fold_episodes);
        assert_eq!(config.scripts.len(), 1);
        assert!(config.relationships.is_empty());
    }

    #[test]
    fn test_invalid_toml() {
        let result = EngineConfig::from_toml_str("recent_limit = \"many\"");
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = EngineConfig::load("/definitely/not/here.toml");
        assert!(matches!(result, Err(EngineError::Io { .. })));
    }
}
