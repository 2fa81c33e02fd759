//! Engine configuration

use claimflow_types::{WorkflowError, WorkflowResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which templates the engine loads at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Register the four built-in templates
    pub include_builtin_catalog: bool,
    /// Extra TOML catalog files, loaded in order after the built-ins
    pub catalog_paths: Vec<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            include_builtin_catalog: true,
            catalog_paths: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(contents: &str) -> WorkflowResult<Self> {
        toml::from_str(contents).map_err(|e| WorkflowError::Config(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> WorkflowResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| WorkflowError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    pub fn without_builtin_catalog(mut self) -> Self {
        self.include_builtin_catalog = false;
        self
    }

    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_paths.push(path.into());
        self
    }
}
