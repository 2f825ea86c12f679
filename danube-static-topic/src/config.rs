use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::errors::{Result, StaticTopicError};

/// Static topic mapping configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StaticTopicConfig {
    /// Directory where remapping plans are staged (defaults to the platform temp dir)
    pub staging_dir: Option<PathBuf>,
    /// Minimum epoch increment of a new plan over the current max epoch
    pub epoch_step: i64,
    /// Seed for the queue allocator, for reproducible plans
    pub allocator_seed: Option<u64>,
}

impl Default for StaticTopicConfig {
    fn default() -> Self {
        Self {
            staging_dir: None,
            epoch_step: 1000,
            allocator_seed: None,
        }
    }
}

impl StaticTopicConfig {
    /// Parses the configuration from YAML, missing fields take their defaults
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| StaticTopicError::InvalidConfig(e.to_string()))
    }

    /// Resolved staging directory
    pub fn staging_dir(&self) -> PathBuf {
        self.staging_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = StaticTopicConfig::default();
        assert_eq!(config.epoch_step, 1000);
        assert!(config.allocator_seed.is_none());
        assert_eq!(config.staging_dir(), std::env::temp_dir());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
staging_dir: /var/lib/danube/remap
allocator_seed: 42
"#;
        let config = StaticTopicConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.staging_dir(), PathBuf::from("/var/lib/danube/remap"));
        assert_eq!(config.allocator_seed, Some(42));
        assert_eq!(config.epoch_step, 1000);
    }

    #[test]
    fn test_invalid_yaml_is_rejected() {
        let err = StaticTopicConfig::from_yaml_str("epoch_step: [not, a, number]").unwrap_err();
        assert!(matches!(err, StaticTopicError::InvalidConfig(_)));
    }
}
