//! Configuration
//!
//! Layered with the `config` crate, lowest to highest precedence: built-in
//! defaults, the global file `$XDG_CONFIG_HOME/factory-context/config.toml`,
//! the workspace file `<workspace>/factory-context.toml`, and environment
//! variables `FACTORY_CTX__<SECTION>__<KEY>`.

mod facade;
pub mod merge;
pub mod paths;
pub mod sources;
pub mod workspace;

pub use facade::ConfigLoader;
pub use workspace::storage_paths::StorageConfig;

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Application name used for config directories and file names.
pub const APP_NAME: &str = "factory-context";

/// Prefix of environment overrides, e.g. `FACTORY_CTX__QUERY__DEFAULT_LIMIT`.
pub const ENV_PREFIX: &str = "FACTORY_CTX";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactoryConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FactoryConfig {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.analysis.trend_window == 0 {
            return Err(ApiError::ConfigError(
                "analysis.trend_window must be at least 1".to_string(),
            ));
        }
        self.storage.validate()
    }
}

fn default_limit() -> usize {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Result cap applied when a query request gives no `limit`
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}

fn default_trend_window() -> usize {
    crate::analysis::DEFAULT_TREND_WINDOW
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Most recent production records considered by trend analysis
    #[serde(default = "default_trend_window")]
    pub trend_window: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            trend_window: default_trend_window(),
        }
    }
}
