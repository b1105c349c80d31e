//! MergeService: orchestrates sources, applies merge policy, deserializes to FactoryConfig.

use crate::config::sources::{environment, global_file, workspace_file};
use crate::config::FactoryConfig;
use config::ConfigError;
use std::path::Path;

use super::policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from workspace and standard sources.
    /// Precedence: defaults (lowest) -> global file -> workspace file -> environment (highest).
    pub fn load(workspace_root: &Path) -> Result<FactoryConfig, ConfigError> {
        let global = crate::config::paths::xdg_root::global_config_path().ok();
        Self::load_layers(workspace_root, global.as_deref())
    }

    /// Same as [`MergeService::load`] with an explicit global file location.
    pub fn load_layers(
        workspace_root: &Path,
        global_path: Option<&Path>,
    ) -> Result<FactoryConfig, ConfigError> {
        let builder = policy::builder_with_defaults()?;
        let builder = match global_path {
            Some(path) => global_file::add_to_builder(builder, path)?,
            None => builder,
        };
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<FactoryConfig, ConfigError> {
        use config::File;

        let builder = policy::builder_with_defaults()?;
        let builder = builder.add_source(File::from(path).required(true));
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }
}
