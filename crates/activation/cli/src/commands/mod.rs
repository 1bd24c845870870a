//! CLI command implementations

pub mod order;
pub mod resolve;

use std::path::PathBuf;

use activation_engine::{Family, ModuleRegistry};
use clap::Args;

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::manifest::Manifest;

/// Where the modules and facts come from
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Manifest file (toml, yaml or json)
    #[arg(short, long)]
    pub manifest: PathBuf,

    /// Built-in families to include (dispatch, datasource, cache, jms)
    #[arg(short, long, value_delimiter = ',')]
    pub family: Vec<Family>,
}

impl SourceArgs {
    /// Load the manifest and build its registry
    pub fn load(&self, config: &CliConfig) -> CliResult<(Manifest, ModuleRegistry)> {
        let manifest = Manifest::load(&self.manifest)?;
        let registry = manifest.registry(&self.family, &config.default_families, &config.engine)?;
        Ok((manifest, registry))
    }
}
