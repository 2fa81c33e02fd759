//! CLI configuration

use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;
use claimflow_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// CLI configuration
///
/// ```toml
/// default_output = "json"
///
/// [engine]
/// include_builtin_catalog = true
/// catalog_paths = ["/etc/claimflow/prior-auth.toml"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CliConfig {
    /// Which templates to load
    pub engine: EngineConfig,

    /// Output format when `--output` is not given
    pub default_output: Option<OutputFormat>,
}

impl CliConfig {
    /// Load configuration from file. A missing file yields the defaults.
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => match Self::default_config_path() {
                Some(p) => p,
                None => return Ok(CliConfig::default()),
            },
        };

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: CliConfig =
                toml::from_str(&contents).map_err(|e| CliError::Config(e.to_string()))?;
            tracing::debug!(path = %config_path.display(), "Configuration loaded");
            Ok(config)
        } else {
            Ok(CliConfig::default())
        }
    }

    /// `<config dir>/claimflow/config.toml`, if the platform has a config dir
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("claimflow").join("config.toml"))
    }
}
