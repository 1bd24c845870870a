//! Module registry and evaluation ordering
//!
//! Ordering is computed in one pass per resolution run:
//!
//! 1. Base order: phase (definition first), then precedence ascending, then
//!    registration order.
//! 2. Runs-after / runs-before edges applied with a stable topological sort;
//!    among modules whose predecessors are all placed, the one earliest in
//!    the base order goes next.
//!
//! The result is a strict total order that depends only on the registered
//! module set.

use std::collections::{BTreeSet, HashMap};

use activation_types::ModuleId;
use tracing::{debug, warn};

use crate::error::{ActivationError, Result};
use crate::module::ModuleDescriptor;

/// Registered modules, in registration order
#[derive(Debug, Default, Clone)]
pub struct ModuleRegistry {
    modules: Vec<ModuleDescriptor>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from modules in declaration order
    pub fn with_modules(modules: impl IntoIterator<Item = ModuleDescriptor>) -> Result<Self> {
        let mut registry = Self::new();
        registry.register_all(modules)?;
        Ok(registry)
    }

    pub fn register(&mut self, module: ModuleDescriptor) -> Result<()> {
        if self.get(module.id().as_str()).is_some() {
            return Err(ActivationError::DuplicateModule(module.id().clone()));
        }
        debug!(module = %module.id(), "registered module");
        self.modules.push(module);
        Ok(())
    }

    pub fn register_all(&mut self, modules: impl IntoIterator<Item = ModuleDescriptor>) -> Result<()> {
        for module in modules {
            self.register(module)?;
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&ModuleDescriptor> {
        self.modules.iter().find(|m| m.id().as_str() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.modules.iter()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Modules in the order the resolver evaluates them
    pub fn evaluation_order(&self) -> Result<Vec<&ModuleDescriptor>> {
        let modules = &self.modules;

        let mut base: Vec<usize> = (0..modules.len()).collect();
        base.sort_by_key(|&i| (modules[i].phase(), modules[i].precedence(), i));

        let mut rank = vec![0usize; modules.len()];
        for (position, &index) in base.iter().enumerate() {
            rank[index] = position;
        }

        let index_of: HashMap<&str, usize> = modules
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id().as_str(), i))
            .collect();

        let mut successors: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); modules.len()];
        for (index, module) in modules.iter().enumerate() {
            for predecessor in module.runs_after() {
                if let Some(&from) = lookup(&index_of, module, predecessor) {
                    add_edge(modules, &mut successors, from, index)?;
                }
            }
            for successor in module.runs_before() {
                if let Some(&to) = lookup(&index_of, module, successor) {
                    add_edge(modules, &mut successors, index, to)?;
                }
            }
        }

        let mut in_degree = vec![0usize; modules.len()];
        for targets in &successors {
            for &to in targets {
                in_degree[to] += 1;
            }
        }

        // Keyed by base rank so the earliest ready module always goes first.
        let mut ready: BTreeSet<usize> = (0..modules.len())
            .filter(|&i| in_degree[i] == 0)
            .map(|i| rank[i])
            .collect();

        let mut ordered = Vec::with_capacity(modules.len());
        while let Some(next_rank) = ready.pop_first() {
            let index = base[next_rank];
            ordered.push(&modules[index]);
            for &to in &successors[index] {
                in_degree[to] -= 1;
                if in_degree[to] == 0 {
                    ready.insert(rank[to]);
                }
            }
        }

        if ordered.len() < modules.len() {
            let stuck = base
                .iter()
                .filter(|&&i| in_degree[i] > 0)
                .map(|&i| modules[i].id().clone())
                .collect();
            return Err(ActivationError::OrderingCycle { modules: stuck });
        }

        Ok(ordered)
    }
}

fn lookup<'a>(
    index_of: &'a HashMap<&str, usize>,
    module: &ModuleDescriptor,
    reference: &ModuleId,
) -> Option<&'a usize> {
    let found = index_of.get(reference.as_str());
    if found.is_none() {
        warn!(
            module = %module.id(),
            reference = %reference,
            "ordering reference to unknown module ignored"
        );
    }
    found
}

/// Record `from` before `to`, unless phase ordering already guarantees it
fn add_edge(
    modules: &[ModuleDescriptor],
    successors: &mut [BTreeSet<usize>],
    from: usize,
    to: usize,
) -> Result<()> {
    let (before, after) = (&modules[from], &modules[to]);
    if before.phase() < after.phase() {
        return Ok(());
    }
    if before.phase() > after.phase() {
        return Err(ActivationError::PhaseOrderConflict {
            module: after.id().clone(),
            module_phase: after.phase(),
            predecessor: before.id().clone(),
            predecessor_phase: before.phase(),
        });
    }
    successors[from].insert(to);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use activation_types::Phase;

    fn ids(order: &[&ModuleDescriptor]) -> Vec<String> {
        order.iter().map(|m| m.id().to_string()).collect()
    }

    fn module(id: &str, precedence: i32) -> ModuleDescriptor {
        ModuleDescriptor::builder(id).precedence(precedence).build()
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = ModuleRegistry::new();
        registry.register(module("a", 0)).unwrap();
        let err = registry.register(module("a", 1)).unwrap_err();
        assert!(matches!(err, ActivationError::DuplicateModule(id) if id.as_str() == "a"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_precedence_then_registration_order() {
        let registry = ModuleRegistry::with_modules([
            module("late", 5),
            module("first-tie", 1),
            module("second-tie", 1),
            module("earliest", -3),
        ])
        .unwrap();

        let order = registry.evaluation_order().unwrap();
        assert_eq!(ids(&order), ["earliest", "first-tie", "second-tie", "late"]);
    }

    #[test]
    fn test_definition_phase_precedes_instantiation() {
        let registry = ModuleRegistry::with_modules([
            ModuleDescriptor::builder("instance")
                .precedence(-100)
                .phase(Phase::Instantiation)
                .build(),
            module("definition", 100),
        ])
        .unwrap();

        let order = registry.evaluation_order().unwrap();
        assert_eq!(ids(&order), ["definition", "instance"]);
    }

    #[test]
    fn test_runs_after_overrides_precedence() {
        let registry = ModuleRegistry::with_modules([
            ModuleDescriptor::builder("registration")
                .precedence(0)
                .runs_after("dispatcher")
                .build(),
            module("other", 1),
            module("dispatcher", 2),
        ])
        .unwrap();

        let order = registry.evaluation_order().unwrap();
        assert_eq!(ids(&order), ["other", "dispatcher", "registration"]);
    }

    #[test]
    fn test_runs_before_edge() {
        let registry = ModuleRegistry::with_modules([
            module("a", 0),
            ModuleDescriptor::builder("b").precedence(5).runs_before("a").build(),
        ])
        .unwrap();

        let order = registry.evaluation_order().unwrap();
        assert_eq!(ids(&order), ["b", "a"]);
    }

    #[test]
    fn test_unknown_reference_ignored() {
        let registry = ModuleRegistry::with_modules([
            ModuleDescriptor::builder("a").runs_after("missing").build(),
            module("b", 0),
        ])
        .unwrap();

        assert_eq!(ids(&registry.evaluation_order().unwrap()), ["a", "b"]);
    }

    #[test]
    fn test_cycle_detected() {
        let registry = ModuleRegistry::with_modules([
            ModuleDescriptor::builder("a").runs_after("b").build(),
            ModuleDescriptor::builder("b").runs_after("a").build(),
            module("c", 0),
        ])
        .unwrap();

        match registry.evaluation_order() {
            Err(ActivationError::OrderingCycle { modules }) => {
                let stuck: Vec<&str> = modules.iter().map(ModuleId::as_str).collect();
                assert_eq!(stuck, ["a", "b"]);
            }
            other => panic!("expected cycle, got {:?}", other.map(|o| ids(&o))),
        }
    }

    #[test]
    fn test_cross_phase_edges() {
        let satisfied = ModuleRegistry::with_modules([
            ModuleDescriptor::builder("factory")
                .phase(Phase::Instantiation)
                .runs_after("configurer")
                .build(),
            module("configurer", 0),
        ])
        .unwrap();
        assert_eq!(
            ids(&satisfied.evaluation_order().unwrap()),
            ["configurer", "factory"]
        );

        let conflicting = ModuleRegistry::with_modules([
            ModuleDescriptor::builder("early").runs_after("late").build(),
            ModuleDescriptor::builder("late").phase(Phase::Instantiation).build(),
        ])
        .unwrap();
        assert!(matches!(
            conflicting.evaluation_order(),
            Err(ActivationError::PhaseOrderConflict { .. })
        ));
    }
}
