//! Runtime configuration for the sync host.
//!
//! Loaded from an optional `asset-sync.{yaml,toml,json}` file in the working
//! directory, then overridden by `ASSET_SYNC__*` environment variables
//! (`ASSET_SYNC__STORE__URI`, `ASSET_SYNC__LOG_LEVEL`, ...).
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! store:
//!   backend: "mongo"
//!   uri: "mongodb://localhost:27017"
//!   database: "digitile"
//! log_level: "info,asset_sync=debug"
//! log_json: true
//! concurrency: 16
//! ```

use config::{Config, Environment, File, FileFormat};
use lookup::StoreConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to load configuration: {0}")]
    Source(#[from] config::ConfigError),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level configuration of the sync host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Where the file type, category, tag and user collections live.
    #[serde(default)]
    pub store: StoreConfig,

    /// `tracing-subscriber` env-filter directive.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    #[serde(default)]
    pub log_json: bool,

    /// Maximum number of events processed at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            log_level: default_log_level(),
            log_json: false,
            concurrency: default_concurrency(),
        }
    }
}

impl SyncConfig {
    /// Load configuration from the optional config file and the environment.
    pub fn load() -> Result<Self, ConfigLoadError> {
        let builder = Config::builder()
            .add_source(File::with_name("asset-sync").required(false))
            .add_source(Environment::with_prefix("ASSET_SYNC").separator("__"));

        let config: SyncConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: SyncConfig = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        if let StoreConfig::Mongo { uri, database } = &self.store {
            if uri.trim().is_empty() {
                return Err(ConfigLoadError::Validation(
                    "store.uri must not be empty".to_string(),
                ));
            }
            if database.trim().is_empty() {
                return Err(ConfigLoadError::Validation(
                    "store.database must not be empty".to_string(),
                ));
            }
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "log_level must not be empty".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(ConfigLoadError::Validation(
                "concurrency must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_concurrency() -> usize {
    8
}
