//! Fact snapshot: the provider plus everything activated so far
//!
//! The snapshot is owned by the resolver for the length of one run. Modules
//! that activate append their provided components; nothing is ever removed.
//! Conditions only ever see a [`FactView`], which is read-only and bound to
//! the evaluating module's phase.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use activation_types::{ComponentDescriptor, ComponentScope, FactQuery, Phase, PropertyResolutionError};
use tracing::{trace, warn};

use crate::provider::FactProvider;

/// Append-only view of the environment accumulated during resolution
pub struct FactSnapshot<'p> {
    provider: &'p dyn FactProvider,
    activated: BTreeMap<String, ComponentDescriptor>,
    probe_cache: RefCell<HashMap<FactQuery, bool>>,
}

impl<'p> FactSnapshot<'p> {
    pub fn new(provider: &'p dyn FactProvider) -> Self {
        Self {
            provider,
            activated: BTreeMap::new(),
            probe_cache: RefCell::new(HashMap::new()),
        }
    }

    /// Read-only view for conditions evaluated in `phase`
    pub fn view(&self, phase: Phase) -> FactView<'_> {
        FactView {
            snapshot: self,
            phase,
        }
    }

    /// Any component holding `name`, whatever the phase.
    ///
    /// Name ownership is global: a singleton hidden from definition-phase
    /// conditions still holds its name.
    pub fn component_named(&self, name: &str) -> Option<ComponentDescriptor> {
        self.activated
            .get(name)
            .cloned()
            .or_else(|| self.provider.component_named(name))
    }

    /// Record the components of one activated module, all or none.
    ///
    /// On failure returns the first name that is already held, either by the
    /// environment or earlier in `components`.
    pub(crate) fn register_all(&mut self, components: Vec<ComponentDescriptor>) -> Result<(), String> {
        let mut claimed = BTreeSet::new();
        for component in &components {
            if self.component_named(&component.name).is_some() || !claimed.insert(component.name.as_str()) {
                return Err(component.name.clone());
            }
        }
        for component in components {
            self.activated.insert(component.name.clone(), component);
        }
        Ok(())
    }

    /// Whether `name` is held by a component an activated module contributed
    pub(crate) fn is_contributed(&self, name: &str) -> bool {
        self.activated.contains_key(name)
    }

    /// Components contributed by modules activated so far, by name
    pub fn activated_components(&self) -> impl Iterator<Item = &ComponentDescriptor> {
        self.activated.values()
    }

    fn probe(&self, query: FactQuery) -> bool {
        if let Some(answer) = self.probe_cache.borrow().get(&query) {
            return *answer;
        }

        let answer = match &query {
            FactQuery::TypeAvailable { name } => self.provider.type_available(name),
            FactQuery::ExternalCapability { name } => self.provider.external_capability(name),
            other => {
                debug_assert!(!other.is_cacheable());
                return false;
            }
        };
        trace!(query = %query, answer, "probed environment");
        self.probe_cache.borrow_mut().insert(query, answer);
        answer
    }
}

/// Read-only, phase-bound view of a [`FactSnapshot`]
#[derive(Clone, Copy)]
pub struct FactView<'a> {
    snapshot: &'a FactSnapshot<'a>,
    phase: Phase,
}

impl<'a> FactView<'a> {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Cached per type name for the run
    pub fn type_available(&self, name: &str) -> bool {
        self.snapshot.probe(FactQuery::type_available(name))
    }

    /// Cached per capability name for the run
    pub fn external_capability(&self, name: &str) -> bool {
        self.snapshot.probe(FactQuery::external_capability(name))
    }

    pub fn property(&self, key: &str) -> Result<Option<String>, PropertyResolutionError> {
        self.snapshot.provider.try_property_value(key)
    }

    /// Property lookup where unresolvable values read as unset
    pub fn property_value(&self, key: &str) -> Option<String> {
        match self.property(key) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "ignoring unresolvable property");
                None
            }
        }
    }

    /// Whether the property resolves to a non-blank value
    pub fn property_has_text(&self, key: &str) -> bool {
        self.property_value(key)
            .map(|value| !value.trim().is_empty())
            .unwrap_or(false)
    }

    /// Component registered under `name` and visible in this phase
    pub fn component_named(&self, name: &str) -> Option<ComponentDescriptor> {
        if let Some(component) = self.snapshot.activated.get(name) {
            return Some(component.clone());
        }
        self.snapshot
            .provider
            .component_named(name)
            .filter(|component| self.is_visible(component))
    }

    pub fn contains_component(&self, name: &str) -> bool {
        self.component_named(name).is_some()
    }

    /// Whether an activated module contributed the component named `name`
    pub fn is_contributed(&self, name: &str) -> bool {
        self.snapshot.is_contributed(name)
    }

    /// Names of visible components of `type_name`, including activated ones
    pub fn component_names_for_type(&self, type_name: &str) -> BTreeSet<String> {
        self.names_for_type(type_name, true)
    }

    /// Names of visible components of `type_name` marked primary
    pub fn primary_component_names_for_type(&self, type_name: &str) -> BTreeSet<String> {
        self.names_for_type(type_name, false)
    }

    /// Boolean answer to a fact query
    pub fn holds(&self, query: &FactQuery) -> bool {
        match query {
            FactQuery::TypeAvailable { name } => self.type_available(name),
            FactQuery::ExternalCapability { name } => self.external_capability(name),
            FactQuery::PropertyValue { key } => self.property_value(key).is_some(),
            FactQuery::ComponentPresent { target, scope } => match scope {
                ComponentScope::ByName => self.contains_component(target),
                ComponentScope::ByType => !self.component_names_for_type(target).is_empty(),
            },
        }
    }

    fn names_for_type(&self, type_name: &str, include_non_primary: bool) -> BTreeSet<String> {
        let mut names: BTreeSet<String> = self
            .snapshot
            .provider
            .components_of_type(type_name, include_non_primary, false)
            .into_iter()
            .filter(|name| {
                self.snapshot
                    .provider
                    .component_named(name)
                    .map(|component| self.is_visible(&component))
                    .unwrap_or(true)
            })
            .collect();

        names.extend(
            self.snapshot
                .activated
                .values()
                .filter(|component| component.is_of_type(type_name))
                .filter(|component| include_non_primary || component.primary)
                .map(|component| component.name.clone()),
        );
        names
    }

    /// Singletons are invisible to definition-phase conditions
    fn is_visible(&self, component: &ComponentDescriptor) -> bool {
        !component.is_singleton() || self.phase.observes_singletons()
    }
}
