use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_MAX_PIPELINES: u8 = 8;

/// Settings for a [`Context`](crate::Context).
///
/// ```yaml
/// max_pipelines: 4
/// worker_threads: 2
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContextConfig {
    /// Upper bound on live pipelines.
    pub max_pipelines: u8,
    /// Worker pool size; `None` lets the pool pick one thread per core.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_threads: Option<usize>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_pipelines: DEFAULT_MAX_PIPELINES,
            worker_threads: None,
        }
    }
}

impl ContextConfig {
    pub fn with_max_pipelines(max_pipelines: u8) -> Self {
        Self {
            max_pipelines,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_pipelines == 0 {
            return Err(Error::Config("max_pipelines must be > 0".to_owned()));
        }
        if self.worker_threads == Some(0) {
            return Err(Error::Config("worker_threads must be > 0".to_owned()));
        }
        Ok(())
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(raw)
            .map_err(|error| Error::Config(format!("failed to parse context config: {error}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|error| {
            Error::Config(format!("failed to read {}: {error}", path.display()))
        })?;
        Self::from_yaml_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::{ContextConfig, DEFAULT_MAX_PIPELINES};
    use crate::error::Error;

    #[test]
    fn missing_fields_take_defaults() {
        let config = ContextConfig::from_yaml_str("worker_threads: 3\n").unwrap();
        assert_eq!(config.max_pipelines, DEFAULT_MAX_PIPELINES);
        assert_eq!(config.worker_threads, Some(3));

        let config = ContextConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, ContextConfig::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = ContextConfig::from_yaml_str("max_pipelines: 2\nqueues: 4\n").unwrap_err();
        assert!(
            matches!(&error, Error::Config(message) if message.contains("queues")),
            "unexpected error: {error}"
        );
    }

    #[test]
    fn zero_capacity_and_zero_threads_are_invalid() {
        assert!(ContextConfig::with_max_pipelines(0).validate().is_err());
        assert!(ContextConfig::from_yaml_str("worker_threads: 0").is_err());
        assert!(ContextConfig::from_yaml_str("max_pipelines: 300").is_err());
    }

    #[test]
    fn round_trips_through_yaml() {
        let config = ContextConfig {
            max_pipelines: 2,
            worker_threads: Some(4),
        };
        let raw = serde_yaml::to_string(&config).unwrap();
        assert_eq!(ContextConfig::from_yaml_str(&raw).unwrap(), config);
    }
}
