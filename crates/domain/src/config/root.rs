use super::cache::{CacheBackend, CacheConfig};
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::RefreshType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub log_level: Option<String>,
    pub backend: Option<CacheBackend>,
    pub size: Option<usize>,
    pub auto_refresh_interval_secs: Option<u64>,
}

impl Config {
    /// Load from a TOML file, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_toml(&content)
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(backend) = overrides.backend {
            self.cache.backend = backend;
        }
        if let Some(size) = overrides.size {
            self.cache.size = size;
        }
        if let Some(interval) = overrides.auto_refresh_interval_secs {
            self.cache.auto_refresh_interval_secs = interval;
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let cache = &self.cache;

        if cache.backend == CacheBackend::Lru && cache.size == 0 {
            return Err(ConfigError::Validation(
                "cache.size must be greater than 0 for the lru backend".into(),
            ));
        }

        if cache.backend == CacheBackend::Map && cache.item_ttl_secs > 0 {
            return Err(ConfigError::Validation(
                "cache.item_ttl_secs is only supported by the lru backend".into(),
            ));
        }

        if cache.refresh_type == RefreshType::Batch
            && cache.refresh_batch_size.unwrap_or(0) == 0
        {
            return Err(ConfigError::Validation(
                "cache.refresh_batch_size must be greater than 0 when refresh_type = \"batch\""
                    .into(),
            ));
        }

        if !self.logging.has_valid_level() {
            return Err(ConfigError::Validation(format!(
                "unknown logging.level '{}'",
                self.logging.level
            )));
        }

        Ok(())
    }
}
