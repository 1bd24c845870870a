//! CLI configuration

use crate::error::{CliError, CliResult};
use activation_engine::{EngineConfig, Family};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CliConfig {
    /// Families used when neither the command line nor the manifest names any
    pub default_families: Vec<Family>,

    /// Engine and family settings
    pub engine: EngineConfig,
}

impl CliConfig {
    /// Read the config file at `path`, or the per-user file when `None`.
    ///
    /// A file that does not exist leaves every setting at its default.
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => user_config_file()?,
        };

        if !path.is_file() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(
            path = %path.display(),
            families = config.default_families.len(),
            "loaded config"
        );
        Ok(config)
    }
}

/// `<config dir>/activation/config.toml`
fn user_config_file() -> CliResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("activation").join("config.toml"))
        .ok_or_else(|| CliError::Config("no per-user config directory on this platform".into()))
}
