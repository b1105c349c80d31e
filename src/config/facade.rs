//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::FactoryConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file, workspace file and environment.
    pub fn load(workspace_root: &Path) -> Result<FactoryConfig, ConfigError> {
        MergeService::load(workspace_root)
    }

    /// Load configuration from a specific file, replacing both file layers.
    pub fn load_from_file(path: &Path) -> Result<FactoryConfig, ConfigError> {
        MergeService::load_from_file(path)
    }
}
