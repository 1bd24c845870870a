//! Built-in module families
//!
//! Each family is a set of module descriptors whose conditions encode one
//! well-known activation decision:
//!
//! - [`dispatch`]: default dispatcher and its registration wrapper
//! - [`datasource`]: embedded vs pooled data source, at most one
//! - [`cache`]: one cache manager chosen by property or availability
//! - [`jms`]: listener container infrastructure

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::module::ModuleDescriptor;

pub mod cache;
pub mod datasource;
pub mod dispatch;
pub mod jms;

/// A named built-in family
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    Dispatch,
    Datasource,
    Cache,
    Jms,
}

impl Family {
    pub const ALL: [Family; 4] = [Family::Dispatch, Family::Datasource, Family::Cache, Family::Jms];

    pub fn as_str(&self) -> &'static str {
        match self {
            Family::Dispatch => "dispatch",
            Family::Datasource => "datasource",
            Family::Cache => "cache",
            Family::Jms => "jms",
        }
    }

    /// Module descriptors for this family
    pub fn modules(&self, config: &EngineConfig) -> Vec<ModuleDescriptor> {
        match self {
            Family::Dispatch => dispatch::modules(&config.dispatch),
            Family::Datasource => datasource::modules(&config.datasource),
            Family::Cache => cache::modules(&config.cache),
            Family::Jms => jms::modules(),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Family {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Family::ALL
            .into_iter()
            .find(|family| family.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown module family '{}'", value))
    }
}

/// Modules of several families, in the order given
pub fn modules_for(families: &[Family], config: &EngineConfig) -> Vec<ModuleDescriptor> {
    families
        .iter()
        .flat_map(|family| family.modules(config))
        .collect()
}
