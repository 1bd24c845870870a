//! Fact queries and property resolution failures

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::component::ComponentScope;

/// A point query against the environment.
///
/// Queries are immutable values; the snapshot uses them as cache keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FactQuery {
    TypeAvailable { name: String },
    PropertyValue { key: String },
    ComponentPresent { target: String, scope: ComponentScope },
    ExternalCapability { name: String },
}

impl FactQuery {
    pub fn type_available(name: impl Into<String>) -> Self {
        Self::TypeAvailable { name: name.into() }
    }

    pub fn property_value(key: impl Into<String>) -> Self {
        Self::PropertyValue { key: key.into() }
    }

    pub fn component_present(target: impl Into<String>, scope: ComponentScope) -> Self {
        Self::ComponentPresent {
            target: target.into(),
            scope,
        }
    }

    pub fn external_capability(name: impl Into<String>) -> Self {
        Self::ExternalCapability { name: name.into() }
    }

    /// Answers to this query cannot change within one resolution run
    pub fn is_cacheable(&self) -> bool {
        matches!(
            self,
            Self::TypeAvailable { .. } | Self::ExternalCapability { .. }
        )
    }
}

impl fmt::Display for FactQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeAvailable { name } => write!(f, "type-available({name})"),
            Self::PropertyValue { key } => write!(f, "property({key})"),
            Self::ComponentPresent { target, scope } => {
                write!(f, "component-present({target}, {scope:?})")
            }
            Self::ExternalCapability { name } => write!(f, "capability({name})"),
        }
    }
}

/// A property value exists but cannot be resolved
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PropertyResolutionError {
    #[error("could not resolve placeholder '{placeholder}' in value of '{key}'")]
    UnresolvablePlaceholder { key: String, placeholder: String },

    #[error("malformed value for '{key}': {reason}")]
    Malformed { key: String, reason: String },
}

impl PropertyResolutionError {
    pub fn key(&self) -> &str {
        match self {
            Self::UnresolvablePlaceholder { key, .. } => key,
            Self::Malformed { key, .. } => key,
        }
    }
}
