//! Activation decisions and the report that collects them
//!
//! A report is created fresh for every resolution run and lists one decision
//! per evaluated module, in evaluation order. It holds no timestamps or
//! generated ids, so identical inputs render byte-identical reports.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::ids::{GroupId, ModuleId};
use crate::outcome::Outcome;

/// Final decision for one module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationDecision {
    pub module_id: ModuleId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupId>,

    pub matched: bool,

    /// Ordered reasons, most specific last
    pub reason_trail: Vec<String>,

    /// Choices made while matching, for the wiring layer
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub selections: BTreeMap<String, String>,
}

impl ActivationDecision {
    /// Build a decision from a condition outcome
    pub fn from_outcome(module_id: ModuleId, group: Option<GroupId>, outcome: Outcome) -> Self {
        let (matched, reason_trail, selections) = outcome.into_parts();
        Self {
            module_id,
            group,
            matched,
            reason_trail,
            selections,
        }
    }

    /// A non-matching decision with a single reason
    pub fn rejected(
        module_id: ModuleId,
        group: Option<GroupId>,
        reason: impl Into<String>,
    ) -> Self {
        Self::from_outcome(module_id, group, Outcome::no_match(reason))
    }

    pub fn selection(&self, key: &str) -> Option<&str> {
        self.selections.get(key).map(String::as_str)
    }

    pub fn reason(&self) -> String {
        self.reason_trail.join("; ")
    }
}

/// Ordered record of every decision made in one resolution run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationReport {
    decisions: Vec<ActivationDecision>,
}

impl ActivationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a decision; each module is decided exactly once.
    pub fn record(&mut self, decision: ActivationDecision) {
        debug_assert!(
            self.decision(decision.module_id.as_str()).is_none(),
            "module decided twice"
        );
        self.decisions.push(decision);
    }

    pub fn decisions(&self) -> &[ActivationDecision] {
        &self.decisions
    }

    pub fn decision(&self, module_id: &str) -> Option<&ActivationDecision> {
        self.decisions
            .iter()
            .find(|d| d.module_id.as_str() == module_id)
    }

    /// Whether the module was evaluated and activated
    pub fn is_matched(&self, module_id: &str) -> bool {
        self.decision(module_id).map(|d| d.matched).unwrap_or(false)
    }

    pub fn matched(&self) -> impl Iterator<Item = &ActivationDecision> {
        self.decisions.iter().filter(|d| d.matched)
    }

    pub fn unmatched(&self) -> impl Iterator<Item = &ActivationDecision> {
        self.decisions.iter().filter(|d| !d.matched)
    }

    /// Winner of an exclusivity group, if any
    pub fn group_winner(&self, group: &str) -> Option<&ActivationDecision> {
        self.matched()
            .find(|d| d.group.as_ref().map(GroupId::as_str) == Some(group))
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
}

impl fmt::Display for ActivationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ACTIVATION REPORT")?;
        writeln!(f, "=================")?;
        writeln!(f)?;
        writeln!(f, "Positive matches:")?;
        writeln!(f, "-----------------")?;
        write_section(f, self.matched())?;
        writeln!(f)?;
        writeln!(f, "Negative matches:")?;
        writeln!(f, "-----------------")?;
        write_section(f, self.unmatched())
    }
}

fn write_section<'a>(
    f: &mut fmt::Formatter<'_>,
    decisions: impl Iterator<Item = &'a ActivationDecision>,
) -> fmt::Result {
    let mut empty = true;
    for decision in decisions {
        empty = false;
        match &decision.group {
            Some(group) => writeln!(f, "   {} [{}]:", decision.module_id, group)?,
            None => writeln!(f, "   {}:", decision.module_id)?,
        }
        for reason in &decision.reason_trail {
            writeln!(f, "      - {}", reason)?;
        }
        for (key, value) in &decision.selections {
            writeln!(f, "      * {} = {}", key, value)?;
        }
    }
    if empty {
        writeln!(f, "   None")?;
    }
    Ok(())
}
