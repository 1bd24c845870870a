//! Activation resolver
//!
//! Walks the registry in evaluation order against a fresh [`FactSnapshot`],
//! applying exclusivity rules and recording exactly one decision per module.
//!
//! For each module:
//!
//! 1. If its exclusivity group is already satisfied, it is rejected without
//!    evaluating its conditions.
//! 2. Its conditions are evaluated (implicit AllOf) through a view bound to
//!    the module's phase.
//! 3. If they match, each provided name is checked against every known
//!    component, whatever the phase; an existing holder rejects the module.
//! 4. Otherwise the module activates: its components are added to the
//!    snapshot, visible to every later module, and its group is satisfied.
//!
//! Required groups left without an activation are reported only after the
//! whole pass, so every candidate still gets a decision.

use std::collections::{BTreeMap, BTreeSet};

use activation_types::{
    ActivationDecision, ActivationReport, ComponentDescriptor, GroupId, ModuleId, Outcome,
};
use tracing::{debug, info, warn};

use crate::condition::evaluate_all;
use crate::config::ResolverConfig;
use crate::error::{ActivationError, Result};
use crate::module::ModuleDescriptor;
use crate::provider::FactProvider;
use crate::registry::ModuleRegistry;
use crate::snapshot::FactSnapshot;

/// Decides which registered modules activate against a fact provider
pub struct ActivationResolver<P> {
    registry: ModuleRegistry,
    provider: P,
    config: ResolverConfig,
}

impl<P: FactProvider> ActivationResolver<P> {
    pub fn new(registry: ModuleRegistry, provider: P) -> Self {
        Self {
            registry,
            provider,
            config: ResolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Run one resolution pass.
    ///
    /// Each call starts from an empty snapshot, so repeated calls against an
    /// unchanged provider yield identical reports.
    pub fn resolve(&self) -> Result<ActivationReport> {
        let order = self.registry.evaluation_order()?;
        let mut snapshot = FactSnapshot::new(&self.provider);
        let mut satisfied: BTreeMap<GroupId, ModuleId> = BTreeMap::new();
        let mut report = ActivationReport::new();

        info!(modules = order.len(), "resolving module activations");

        for module in order {
            let mut decision = self.decide(module, &snapshot, &satisfied);

            if decision.matched {
                let components = module.provides().iter().map(|p| p.to_descriptor()).collect();
                if let Err(name) = snapshot.register_all(components) {
                    warn!(module = %module.id(), name = %name, "provided name already held");
                    decision = ActivationDecision::rejected(
                        module.id().clone(),
                        module.group().cloned(),
                        format!("component '{}' already registered", name),
                    );
                }
            }

            if decision.matched {
                if let Some(group) = module.group() {
                    satisfied.insert(group.clone(), module.id().clone());
                }
                info!(
                    module = %module.id(),
                    provides = ?module.provided_names(),
                    "module activated"
                );
            } else {
                debug!(
                    module = %module.id(),
                    reason = %decision.reason(),
                    "module not activated"
                );
            }

            report.record(decision);
        }

        let unsatisfied = unsatisfied_requirements(&self.registry, &report);
        info!(
            activated = report.matched().count(),
            evaluated = report.len(),
            "resolution complete"
        );

        if unsatisfied.is_empty() {
            return Ok(report);
        }

        for requirement in &unsatisfied {
            warn!(requirement = %requirement, "required activation missing");
        }
        if self.config.fail_on_missing_required {
            return Err(ActivationError::MissingRequiredActivation {
                unsatisfied,
                report: Box::new(report),
            });
        }
        Ok(report)
    }

    fn decide(
        &self,
        module: &ModuleDescriptor,
        snapshot: &FactSnapshot<'_>,
        satisfied: &BTreeMap<GroupId, ModuleId>,
    ) -> ActivationDecision {
        let id = module.id().clone();
        let group = module.group().cloned();

        if let Some(winner) = module.group().and_then(|g| satisfied.get(g)) {
            let reason = format!(
                "exclusivity group '{}' already satisfied by '{}'",
                module.group().map(GroupId::as_str).unwrap_or_default(),
                winner
            );
            return ActivationDecision::rejected(id, group, reason);
        }

        let facts = snapshot.view(module.phase());
        let outcome = evaluate_all(module.conditions(), &facts);
        debug!(
            module = %id,
            phase = %module.phase(),
            matched = outcome.is_match(),
            "evaluated conditions"
        );
        if !outcome.is_match() {
            return ActivationDecision::from_outcome(id, group, outcome);
        }

        if let Some(conflict) = name_conflict(module, snapshot) {
            return ActivationDecision::rejected(id, group, conflict);
        }

        let names: Vec<&str> = module.provides().iter().map(|p| p.name.as_str()).collect();
        let mut activated = outcome;
        activated.absorb(Outcome::matching(if names.is_empty() {
            "activated".to_string()
        } else {
            format!("activated; provides '{}'", names.join("', '"))
        }));
        ActivationDecision::from_outcome(id, group, activated)
    }
}

/// Reason the module may not claim one of its provided names, if any.
///
/// Checked against every known component, including singletons the
/// module's phase cannot observe.
fn name_conflict(module: &ModuleDescriptor, snapshot: &FactSnapshot<'_>) -> Option<String> {
    module.provides().iter().find_map(|provided| {
        snapshot
            .component_named(&provided.name)
            .map(|existing: ComponentDescriptor| {
                if existing.is_of_type(&provided.type_name) {
                    format!("component '{}' already present", provided.name)
                } else {
                    format!(
                        "non-default component found with that name: '{}' ({})",
                        existing.name, existing.type_name
                    )
                }
            })
    })
}

/// Required groups (or ungrouped required modules) that nothing satisfied
fn unsatisfied_requirements(registry: &ModuleRegistry, report: &ActivationReport) -> Vec<String> {
    let mut unsatisfied = BTreeSet::new();
    for module in registry.iter().filter(|m| m.is_required()) {
        match module.group() {
            Some(group) => {
                if report.group_winner(group.as_str()).is_none() {
                    unsatisfied.insert(format!("group '{}'", group));
                }
            }
            None => {
                if !report.is_matched(module.id().as_str()) {
                    unsatisfied.insert(format!("module '{}'", module.id()));
                }
            }
        }
    }
    unsatisfied.into_iter().collect()
}
