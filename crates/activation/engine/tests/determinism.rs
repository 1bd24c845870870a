//! Property tests: resolution is deterministic and groups stay exclusive.

use std::collections::BTreeMap;

use activation_engine::{
    ActivationResolver, Condition, FactProvider, ModuleDescriptor, ModuleRegistry, StaticFactProvider,
};
use activation_types::{ComponentDescriptor, Phase};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

const TYPES: [&str; 4] = ["t.Alpha", "t.Beta", "t.Gamma", "t.Delta"];
const NAMES: [&str; 4] = ["alpha", "beta", "gamma", "delta"];

fn arb_condition() -> impl Strategy<Value = Condition> {
    let leaf = prop_oneof![
        prop::sample::select(TYPES.to_vec()).prop_map(Condition::type_available),
        prop::sample::select(NAMES.to_vec()).prop_map(Condition::component_present),
        prop::sample::select(NAMES.to_vec()).prop_map(Condition::component_absent),
        Just(Condition::property("app.mode")),
    ];
    leaf.prop_recursive(2, 8, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..3).prop_map(Condition::all_of),
            prop::collection::vec(inner.clone(), 0..3).prop_map(Condition::any_of),
            inner.prop_map(Condition::not),
        ]
    })
}

fn arb_module(index: usize) -> impl Strategy<Value = ModuleDescriptor> {
    (
        -3i32..3,
        any::<bool>(),
        prop::option::of(prop::sample::select(vec!["g1", "g2"])),
        prop::collection::vec(arb_condition(), 0..3),
        prop::option::of(prop::sample::select(NAMES.to_vec())),
    )
        .prop_map(move |(precedence, late, group, conditions, provides)| {
            let mut builder = ModuleDescriptor::builder(format!("m{}", index))
                .precedence(precedence)
                .phase(if late { Phase::Instantiation } else { Phase::Definition })
                .conditions(conditions);
            if let Some(group) = group {
                builder = builder.group(group);
            }
            if let Some(name) = provides {
                builder = builder.provides(name, "t.Alpha");
            }
            builder.build()
        })
}

fn arb_modules() -> impl Strategy<Value = Vec<ModuleDescriptor>> {
    (1usize..8).prop_flat_map(|count| (0..count).map(arb_module).collect::<Vec<_>>())
}

fn arb_provider() -> impl Strategy<Value = StaticFactProvider> {
    (
        prop::sample::subsequence(TYPES.to_vec(), 0..=TYPES.len()),
        any::<bool>(),
        prop::sample::subsequence(NAMES.to_vec(), 0..=2),
    )
        .prop_map(|(types, mode, singletons)| {
            let mut provider = StaticFactProvider::new().with_types(types);
            if mode {
                provider = provider.with_property("app.mode", "on");
            }
            for name in singletons {
                provider = provider.with_singleton(ComponentDescriptor::singleton(name, "t.Alpha"));
            }
            provider
        })
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Two runs over the same inputs serialize to the same bytes.
    #[test]
    fn resolution_is_deterministic(modules in arb_modules(), provider in arb_provider()) {
        let registry = ModuleRegistry::with_modules(modules).unwrap();
        let resolver = ActivationResolver::new(registry, provider);

        let first = serde_json::to_string(&resolver.resolve().unwrap()).unwrap();
        let second = serde_json::to_string(&resolver.resolve().unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Every module is decided once and no group has two winners.
    #[test]
    fn at_most_one_activation_per_group(modules in arb_modules(), provider in arb_provider()) {
        let count = modules.len();
        let registry = ModuleRegistry::with_modules(modules).unwrap();
        let report = ActivationResolver::new(registry, provider).resolve().unwrap();

        prop_assert_eq!(report.len(), count);

        let mut winners: BTreeMap<String, usize> = BTreeMap::new();
        for decision in report.matched() {
            if let Some(group) = &decision.group {
                *winners.entry(group.to_string()).or_default() += 1;
            }
        }
        prop_assert!(winners.values().all(|&wins| wins == 1));
    }

    /// A provided name is never claimed by two activated modules.
    #[test]
    fn provided_names_are_unique(modules in arb_modules(), provider in arb_provider()) {
        let registry = ModuleRegistry::with_modules(modules.clone()).unwrap();
        let resolver = ActivationResolver::new(registry, provider);
        let report = resolver.resolve().unwrap();

        let mut claimed = Vec::new();
        for decision in report.matched() {
            let module = modules.iter().find(|m| m.id() == &decision.module_id).unwrap();
            for provided in module.provides() {
                prop_assert!(!claimed.contains(&provided.name));
                prop_assert!(resolver.provider().component_named(&provided.name).is_none());
                claimed.push(provided.name.clone());
            }
        }
    }
}
