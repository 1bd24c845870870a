//! Component metadata as seen by conditions
//!
//! A component descriptor is declaration metadata only. The engine never
//! holds or constructs live components.

use serde::{Deserialize, Serialize};

/// Where a component known to the environment came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentOrigin {
    /// Declared but not yet instantiated
    #[default]
    Definition,

    /// Registered directly as an already-constructed instance
    Singleton,
}

/// Metadata about a component the environment already knows about
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    /// Registered name
    pub name: String,

    /// Fully qualified type name
    #[serde(rename = "type")]
    pub type_name: String,

    /// Preferred candidate when several share a type
    #[serde(default)]
    pub primary: bool,

    #[serde(default)]
    pub origin: ComponentOrigin,
}

impl ComponentDescriptor {
    /// Create a declared (not instantiated) component
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            primary: false,
            origin: ComponentOrigin::Definition,
        }
    }

    /// Create an already-constructed singleton
    pub fn singleton(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            origin: ComponentOrigin::Singleton,
            ..Self::new(name, type_name)
        }
    }

    /// Mark as the primary candidate for its type
    pub fn as_primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn is_of_type(&self, type_name: &str) -> bool {
        self.type_name == type_name
    }

    pub fn is_singleton(&self) -> bool {
        self.origin == ComponentOrigin::Singleton
    }
}

/// How a component presence check identifies its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentScope {
    #[default]
    ByName,
    ByType,
}

/// A component a module contributes when it activates
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProvidedComponent {
    pub name: String,

    #[serde(rename = "type")]
    pub type_name: String,
}

impl ProvidedComponent {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    /// Descriptor registered into the fact snapshot on activation
    pub fn to_descriptor(&self) -> ComponentDescriptor {
        ComponentDescriptor::new(&self.name, &self.type_name)
    }
}
