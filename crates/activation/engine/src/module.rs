//! Module descriptors
//!
//! A module is a candidate unit of functionality: a flat list of conditions
//! (implicitly AND-ed), a precedence, a phase, optional exclusivity group
//! and the components it would provide. Descriptors are immutable once
//! built.

use std::collections::BTreeSet;

use activation_types::{GroupId, ModuleId, Phase, Precedence, ProvidedComponent};
use serde::{Deserialize, Serialize};

use crate::condition::Condition;

/// A candidate configuration module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    id: ModuleId,

    #[serde(default)]
    precedence: i32,

    #[serde(default)]
    phase: Phase,

    #[serde(default)]
    conditions: Vec<Condition>,

    #[serde(default)]
    group: Option<GroupId>,

    #[serde(default)]
    provides: Vec<ProvidedComponent>,

    #[serde(default)]
    required: bool,

    #[serde(default)]
    runs_after: Vec<ModuleId>,

    #[serde(default)]
    runs_before: Vec<ModuleId>,
}

impl ModuleDescriptor {
    pub fn builder(id: impl Into<ModuleId>) -> ModuleDescriptorBuilder {
        ModuleDescriptorBuilder::new(id)
    }

    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    pub fn precedence(&self) -> i32 {
        self.precedence
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn group(&self) -> Option<&GroupId> {
        self.group.as_ref()
    }

    pub fn provides(&self) -> &[ProvidedComponent] {
        &self.provides
    }

    pub fn provided_names(&self) -> BTreeSet<&str> {
        self.provides.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn runs_after(&self) -> &[ModuleId] {
        &self.runs_after
    }

    pub fn runs_before(&self) -> &[ModuleId] {
        &self.runs_before
    }
}

/// Builder for [`ModuleDescriptor`]
#[derive(Debug, Clone)]
pub struct ModuleDescriptorBuilder {
    descriptor: ModuleDescriptor,
}

impl ModuleDescriptorBuilder {
    pub fn new(id: impl Into<ModuleId>) -> Self {
        Self {
            descriptor: ModuleDescriptor {
                id: id.into(),
                precedence: Precedence::DEFAULT,
                phase: Phase::Definition,
                conditions: Vec::new(),
                group: None,
                provides: Vec::new(),
                required: false,
                runs_after: Vec::new(),
                runs_before: Vec::new(),
            },
        }
    }

    pub fn precedence(mut self, precedence: i32) -> Self {
        self.descriptor.precedence = precedence;
        self
    }

    pub fn phase(mut self, phase: Phase) -> Self {
        self.descriptor.phase = phase;
        self
    }

    /// Add a condition; all conditions must match
    pub fn condition(mut self, condition: Condition) -> Self {
        self.descriptor.conditions.push(condition);
        self
    }

    pub fn conditions(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.descriptor.conditions.extend(conditions);
        self
    }

    pub fn group(mut self, group: impl Into<GroupId>) -> Self {
        self.descriptor.group = Some(group.into());
        self
    }

    pub fn provides(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.descriptor
            .provides
            .push(ProvidedComponent::new(name, type_name));
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.descriptor.required = required;
        self
    }

    pub fn runs_after(mut self, predecessor: impl Into<ModuleId>) -> Self {
        self.descriptor.runs_after.push(predecessor.into());
        self
    }

    pub fn runs_before(mut self, successor: impl Into<ModuleId>) -> Self {
        self.descriptor.runs_before.push(successor.into());
        self
    }

    pub fn build(self) -> ModuleDescriptor {
        self.descriptor
    }
}
