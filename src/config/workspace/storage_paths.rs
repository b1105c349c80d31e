//! StorageConfig and resolve_paths for the domain resource files.

use crate::error::ApiError;
use crate::types::Domain;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `<domain>_data.csv` files (relative to workspace root)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Per-domain file overrides, relative to `data_dir` unless absolute
    #[serde(default)]
    pub files: HashMap<String, PathBuf>,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ApiError> {
        for key in self.files.keys() {
            key.parse::<Domain>().map_err(|_| {
                ApiError::ConfigError(format!(
                    "storage.files.{} does not name a domain (expected one of {})",
                    key,
                    Domain::names().join(", ")
                ))
            })?;
        }
        Ok(())
    }

    /// Resolve the data directory and per-domain overrides to filesystem paths.
    pub fn resolve_paths(
        &self,
        workspace_root: &Path,
    ) -> Result<(PathBuf, HashMap<Domain, PathBuf>), ApiError> {
        let data_dir = workspace_root.join(&self.data_dir);
        let mut files = HashMap::with_capacity(self.files.len());
        for (key, file) in &self.files {
            let domain = key
                .parse::<Domain>()
                .map_err(|e| ApiError::ConfigError(format!("storage.files: {}", e)))?;
            files.insert(domain, data_dir.join(file));
        }
        Ok((data_dir, files))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            files: HashMap::new(),
        }
    }
}
