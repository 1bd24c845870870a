//! In-memory fact provider for tests and manifests

use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};

use activation_types::{ComponentDescriptor, ComponentOrigin, PropertyResolutionError};
use serde::{Deserialize, Serialize};

use crate::provider::FactProvider;

/// Fact provider backed by fixed, in-memory facts.
///
/// Used by tests and by the CLI, where the facts come from a manifest.
/// Property values may reference other properties as `${name}`; a reference
/// to an unknown property makes the value unresolvable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticFactProvider {
    types: BTreeSet<String>,
    properties: BTreeMap<String, String>,
    components: Vec<ComponentDescriptor>,
    capabilities: BTreeSet<String>,
    #[serde(skip)]
    type_lookups: Cell<usize>,
}

impl StaticFactProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, name: impl Into<String>) -> Self {
        self.types.insert(name.into());
        self
    }

    pub fn with_types<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// A property whose value references a placeholder nobody defines
    pub fn with_unresolvable_property(
        self,
        key: impl Into<String>,
        placeholder: impl AsRef<str>,
    ) -> Self {
        let value = format!("${{{}}}", placeholder.as_ref());
        self.with_property(key, value)
    }

    /// A declared component
    pub fn with_component(mut self, component: ComponentDescriptor) -> Self {
        self.components.push(component);
        self
    }

    /// An already-constructed singleton
    pub fn with_singleton(mut self, component: ComponentDescriptor) -> Self {
        self.components.push(ComponentDescriptor {
            origin: ComponentOrigin::Singleton,
            ..component
        });
        self
    }

    pub fn with_capability(mut self, name: impl Into<String>) -> Self {
        self.capabilities.insert(name.into());
        self
    }

    /// Number of `type_available` calls served so far
    pub fn type_lookups(&self) -> usize {
        self.type_lookups.get()
    }

    fn resolve_placeholders(&self, key: &str, raw: &str) -> Result<String, PropertyResolutionError> {
        let mut resolved = String::with_capacity(raw.len());
        let mut rest = raw;

        while let Some(start) = rest.find("${") {
            resolved.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find('}').ok_or_else(|| PropertyResolutionError::Malformed {
                key: key.to_string(),
                reason: "unterminated placeholder".into(),
            })?;
            let placeholder = &after[..end];
            let value = self.properties.get(placeholder).ok_or_else(|| {
                PropertyResolutionError::UnresolvablePlaceholder {
                    key: key.to_string(),
                    placeholder: placeholder.to_string(),
                }
            })?;
            resolved.push_str(value);
            rest = &after[end + 1..];
        }

        resolved.push_str(rest);
        Ok(resolved)
    }
}

impl FactProvider for StaticFactProvider {
    fn type_available(&self, name: &str) -> bool {
        self.type_lookups.set(self.type_lookups.get() + 1);
        self.types.contains(name)
    }

    fn component_named(&self, name: &str) -> Option<ComponentDescriptor> {
        self.components.iter().find(|c| c.name == name).cloned()
    }

    fn components_of_type(
        &self,
        type_name: &str,
        include_non_primary: bool,
        _force_instantiate: bool,
    ) -> BTreeSet<String> {
        self.components
            .iter()
            .filter(|c| c.is_of_type(type_name))
            .filter(|c| include_non_primary || c.primary)
            .map(|c| c.name.clone())
            .collect()
    }

    fn try_property_value(&self, key: &str) -> Result<Option<String>, PropertyResolutionError> {
        match self.properties.get(key) {
            Some(raw) => self.resolve_placeholders(key, raw).map(Some),
            None => Ok(None),
        }
    }

    fn external_capability(&self, name: &str) -> bool {
        self.capabilities.contains(name)
    }
}
