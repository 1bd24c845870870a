//! The fact-query interface the engine consumes
//!
//! Everything the engine knows about the environment comes through a
//! [`FactProvider`]. Tests supply synthetic providers (see
//! [`crate::mocks::StaticFactProvider`]); real deployments back it with
//! type probing, the component registry and property sources.

use std::collections::BTreeSet;
use std::sync::Arc;

use activation_types::{ComponentDescriptor, PropertyResolutionError};

/// Point queries about the runtime environment.
///
/// Implementations must be pure lookups: the same query within one
/// resolution run must return the same answer.
pub trait FactProvider {
    /// Whether the named type can be resolved in the active type universe
    fn type_available(&self, name: &str) -> bool;

    /// Descriptor of the component registered under `name`
    fn component_named(&self, name: &str) -> Option<ComponentDescriptor>;

    /// Names of components of the given type.
    ///
    /// With `include_non_primary = false` only components marked primary are
    /// returned. `force_instantiate` allows the provider to construct lazy
    /// components to learn their type; the engine always passes `false`.
    fn components_of_type(
        &self,
        type_name: &str,
        include_non_primary: bool,
        force_instantiate: bool,
    ) -> BTreeSet<String>;

    /// Raw property lookup, reporting resolution failures
    fn try_property_value(&self, key: &str) -> Result<Option<String>, PropertyResolutionError>;

    /// Property lookup that fails soft: resolution errors read as unset
    fn property_value(&self, key: &str) -> Option<String> {
        self.try_property_value(key).ok().flatten()
    }

    /// Whether an external subsystem (e.g. a naming service) is reachable
    fn external_capability(&self, name: &str) -> bool;
}

macro_rules! forward_fact_provider {
    ($($wrapper:ty),*) => {$(
        impl<T: FactProvider + ?Sized> FactProvider for $wrapper {
            fn type_available(&self, name: &str) -> bool {
                (**self).type_available(name)
            }

            fn component_named(&self, name: &str) -> Option<ComponentDescriptor> {
                (**self).component_named(name)
            }

            fn components_of_type(
                &self,
                type_name: &str,
                include_non_primary: bool,
                force_instantiate: bool,
            ) -> BTreeSet<String> {
                (**self).components_of_type(type_name, include_non_primary, force_instantiate)
            }

            fn try_property_value(
                &self,
                key: &str,
            ) -> Result<Option<String>, PropertyResolutionError> {
                (**self).try_property_value(key)
            }

            fn property_value(&self, key: &str) -> Option<String> {
                (**self).property_value(key)
            }

            fn external_capability(&self, name: &str) -> bool {
                (**self).external_capability(name)
            }
        }
    )*};
}

forward_fact_provider!(&T, Box<T>, Arc<T>);
