//! Identifiers for modules and exclusivity groups
//!
//! Both are plain strings wrapped in newtypes so a module id can never be
//! passed where a group id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a candidate configuration module
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ModuleId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifier of an exclusivity group
///
/// At most one module sharing a group id ends a resolution run activated.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for GroupId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_id_display() {
        let id = ModuleId::new("pooled-datasource");
        assert_eq!(id.to_string(), "pooled-datasource");
        assert_eq!(id.as_str(), "pooled-datasource");
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let id = GroupId::from("cache-manager");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"cache-manager\"");

        let parsed: ModuleId = serde_json::from_str("\"dispatcher\"").unwrap();
        assert_eq!(parsed, ModuleId::from("dispatcher"));
    }
}
