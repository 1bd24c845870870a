//! Conditions and condition trees
//!
//! A [`Condition`] is a tagged predicate value. All variants, including
//! nested `AllOf` / `AnyOf` groups, go through the single
//! [`Condition::evaluate`] function, which always returns an [`Outcome`].
//! Fact lookups that fail are reported as a non-match, never as an error.

use std::fmt;
use std::sync::Arc;

use activation_types::{ComponentScope, ConditionMessage, Outcome};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::snapshot::FactView;

/// Named predicate for logic that the built-in variants cannot express.
///
/// Implementations receive a read-only view and must not assume anything
/// about evaluation order beyond what the module ordering guarantees.
pub trait ConditionPredicate: Send + Sync + fmt::Debug {
    /// Short name used in reasons and logs
    fn name(&self) -> &str;

    fn evaluate(&self, facts: &FactView<'_>) -> Outcome;
}

/// A predicate over the fact snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    /// The named type resolves in the active type universe
    TypeAvailable { name: String },

    /// The property is set and, if `expected` is given, equals it
    PropertyValue {
        key: String,
        #[serde(default)]
        expected: Option<String>,
        #[serde(default)]
        match_if_missing: bool,
    },

    /// The property resolves to a non-blank value
    PropertyHasText { key: String },

    ComponentPresent {
        target: String,
        #[serde(default)]
        scope: ComponentScope,
    },

    ComponentAbsent {
        target: String,
        #[serde(default)]
        scope: ComponentScope,
    },

    /// Exactly one component of the type, or exactly one primary among several
    SingleCandidate { type_name: String },

    ExternalCapability { name: String },

    Not { condition: Box<Condition> },

    /// Every condition matches; stops at the first that does not
    AllOf { conditions: Vec<Condition> },

    /// Some condition matches; stops at the first that does
    AnyOf { conditions: Vec<Condition> },

    #[serde(skip)]
    Custom(Arc<dyn ConditionPredicate>),
}

impl Condition {
    pub fn type_available(name: impl Into<String>) -> Self {
        Self::TypeAvailable { name: name.into() }
    }

    /// Property is set to any value
    pub fn property(key: impl Into<String>) -> Self {
        Self::PropertyValue {
            key: key.into(),
            expected: None,
            match_if_missing: false,
        }
    }

    pub fn property_equals(key: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::PropertyValue {
            key: key.into(),
            expected: Some(expected.into()),
            match_if_missing: false,
        }
    }

    pub fn property_has_text(key: impl Into<String>) -> Self {
        Self::PropertyHasText { key: key.into() }
    }

    pub fn component_present(name: impl Into<String>) -> Self {
        Self::ComponentPresent {
            target: name.into(),
            scope: ComponentScope::ByName,
        }
    }

    pub fn component_of_type_present(type_name: impl Into<String>) -> Self {
        Self::ComponentPresent {
            target: type_name.into(),
            scope: ComponentScope::ByType,
        }
    }

    pub fn component_absent(name: impl Into<String>) -> Self {
        Self::ComponentAbsent {
            target: name.into(),
            scope: ComponentScope::ByName,
        }
    }

    pub fn component_of_type_absent(type_name: impl Into<String>) -> Self {
        Self::ComponentAbsent {
            target: type_name.into(),
            scope: ComponentScope::ByType,
        }
    }

    pub fn single_candidate(type_name: impl Into<String>) -> Self {
        Self::SingleCandidate {
            type_name: type_name.into(),
        }
    }

    pub fn external_capability(name: impl Into<String>) -> Self {
        Self::ExternalCapability { name: name.into() }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(condition: Condition) -> Self {
        Self::Not {
            condition: Box::new(condition),
        }
    }

    pub fn all_of(conditions: Vec<Condition>) -> Self {
        Self::AllOf { conditions }
    }

    pub fn any_of(conditions: Vec<Condition>) -> Self {
        Self::AnyOf { conditions }
    }

    pub fn custom(predicate: impl ConditionPredicate + 'static) -> Self {
        Self::Custom(Arc::new(predicate))
    }

    /// Evaluate against a read-only view of the facts
    pub fn evaluate(&self, facts: &FactView<'_>) -> Outcome {
        match self {
            Self::TypeAvailable { name } => {
                let message = ConditionMessage::for_condition("TypeAvailable");
                if facts.type_available(name) {
                    Outcome::matching(message.found("required type").items([name]))
                } else {
                    Outcome::no_match(message.did_not_find("required type").items([name]))
                }
            }

            Self::PropertyValue {
                key,
                expected,
                match_if_missing,
            } => property_value(key, expected.as_deref(), *match_if_missing, facts),

            Self::PropertyHasText { key } => {
                let message = ConditionMessage::for_condition("PropertyHasText");
                match facts.property(key) {
                    Ok(Some(value)) if !value.trim().is_empty() => {
                        Outcome::matching(message.because(format!("'{}' is set", key)))
                    }
                    Ok(Some(_)) => Outcome::no_match(message.because(format!("'{}' is blank", key))),
                    Ok(None) => Outcome::no_match(message.did_not_find("property").items([key])),
                    Err(err) => {
                        warn!(key = %key, error = %err, "property could not be resolved");
                        Outcome::no_match(message.because(format!("could not resolve '{}': {}", key, err)))
                    }
                }
            }

            Self::ComponentPresent { target, scope } => component_presence(target, *scope, facts),

            Self::ComponentAbsent { target, scope } => {
                let present = component_presence(target, *scope, facts);
                let label = scoped_label("ComponentAbsent", target, *scope);
                let message = ConditionMessage::for_condition(label);
                if present.is_match() {
                    let found = present_names(target, *scope, facts);
                    Outcome::no_match(message.found_many("component", "components").items(found))
                } else {
                    match scope {
                        ComponentScope::ByName => {
                            Outcome::matching(message.did_not_find("component").items([target]))
                        }
                        ComponentScope::ByType => Outcome::matching(
                            message.did_not_find_many("component", "components").at_all(),
                        ),
                    }
                }
            }

            Self::SingleCandidate { type_name } => single_candidate(type_name, facts),

            Self::ExternalCapability { name } => {
                let message = ConditionMessage::for_condition("ExternalCapability");
                if facts.external_capability(name) {
                    Outcome::matching(message.available(name))
                } else {
                    Outcome::no_match(message.not_available(name))
                }
            }

            Self::Not { condition } => {
                let inner = condition.evaluate(facts);
                let trail = inner
                    .trail()
                    .iter()
                    .map(|reason| format!("not: {}", reason))
                    .collect();
                Outcome::from_trail(!inner.is_match(), trail)
            }

            Self::AllOf { conditions } => evaluate_all(conditions, facts),

            Self::AnyOf { conditions } => evaluate_any(conditions, facts),

            Self::Custom(predicate) => predicate.evaluate(facts),
        }
    }

    /// Short label for logs
    pub fn label(&self) -> String {
        match self {
            Self::TypeAvailable { name } => format!("type-available({})", name),
            Self::PropertyValue { key, .. } => format!("property({})", key),
            Self::PropertyHasText { key } => format!("property-has-text({})", key),
            Self::ComponentPresent { target, .. } => format!("component-present({})", target),
            Self::ComponentAbsent { target, .. } => format!("component-absent({})", target),
            Self::SingleCandidate { type_name } => format!("single-candidate({})", type_name),
            Self::ExternalCapability { name } => format!("capability({})", name),
            Self::Not { condition } => format!("not({})", condition.label()),
            Self::AllOf { conditions } => format!("all-of[{}]", conditions.len()),
            Self::AnyOf { conditions } => format!("any-of[{}]", conditions.len()),
            Self::Custom(predicate) => predicate.name().to_string(),
        }
    }
}

/// Conjunction over a module's condition list.
///
/// On failure the outcome carries only the failing condition's reasons; on
/// success it carries every condition's reasons in order.
pub fn evaluate_all(conditions: &[Condition], facts: &FactView<'_>) -> Outcome {
    let mut combined = Outcome::from_trail(true, Vec::new());
    for condition in conditions {
        let outcome = condition.evaluate(facts);
        if !outcome.is_match() {
            return outcome;
        }
        combined.absorb(outcome);
    }
    combined
}

/// Disjunction in declared order, one trail entry per evaluated condition
pub fn evaluate_any(conditions: &[Condition], facts: &FactView<'_>) -> Outcome {
    let mut trail = Vec::with_capacity(conditions.len());
    for condition in conditions {
        let outcome = condition.evaluate(facts);
        if outcome.is_match() {
            trail.push(format!("matched: {}", outcome.reason()));
            let (_, _, selections) = outcome.into_parts();
            return selections.into_iter().fold(
                Outcome::from_trail(true, trail),
                |outcome, (key, value)| outcome.with_selection(key, value),
            );
        }
        trail.push(format!("did not find: {}", outcome.reason()));
    }
    Outcome::from_trail(false, trail)
}

fn property_value(
    key: &str,
    expected: Option<&str>,
    match_if_missing: bool,
    facts: &FactView<'_>,
) -> Outcome {
    let message = ConditionMessage::for_condition("PropertyValue");
    let value = match facts.property(key) {
        Ok(value) => value,
        Err(err) => {
            warn!(key, error = %err, "property could not be resolved");
            return Outcome::no_match(message.because(format!("could not resolve '{}': {}", key, err)));
        }
    };

    match (value, expected) {
        (None, _) if match_if_missing => {
            Outcome::matching(message.because(format!("'{}' is not set and matches if missing", key)))
        }
        (None, _) => Outcome::no_match(message.did_not_find("property").items([key])),
        (Some(_), None) => Outcome::matching(message.found("property").items([key])),
        (Some(actual), Some(expected)) => {
            if actual.trim().eq_ignore_ascii_case(expected.trim()) {
                Outcome::matching(message.found("property").items([format!("{}={}", key, actual)]))
            } else {
                Outcome::no_match(message.because(format!(
                    "'{}' is '{}', expected '{}'",
                    key, actual, expected
                )))
            }
        }
    }
}

fn component_presence(target: &str, scope: ComponentScope, facts: &FactView<'_>) -> Outcome {
    let message = ConditionMessage::for_condition(scoped_label("ComponentPresent", target, scope));
    let found = present_names(target, scope, facts);
    if found.is_empty() {
        match scope {
            ComponentScope::ByName => Outcome::no_match(message.did_not_find("component").items([target])),
            ComponentScope::ByType => {
                Outcome::no_match(message.did_not_find_many("component", "components").at_all())
            }
        }
    } else {
        Outcome::matching(message.found_many("component", "components").items(found))
    }
}

fn present_names(target: &str, scope: ComponentScope, facts: &FactView<'_>) -> Vec<String> {
    match scope {
        ComponentScope::ByName => facts
            .component_named(target)
            .map(|component| vec![component.name])
            .unwrap_or_default(),
        ComponentScope::ByType => facts.component_names_for_type(target).into_iter().collect(),
    }
}

fn single_candidate(type_name: &str, facts: &FactView<'_>) -> Outcome {
    let message = ConditionMessage::for_condition(format!("SingleCandidate type '{}'", type_name));
    let names = facts.component_names_for_type(type_name);

    match names.len() {
        0 => Outcome::no_match(message.did_not_find_many("component", "components").at_all()),
        1 => Outcome::matching(message.found("a single component").items(&names)),
        _ => {
            let primaries = facts.primary_component_names_for_type(type_name);
            if primaries.len() == 1 {
                Outcome::matching(message.found("a single primary component").items(&primaries))
            } else {
                Outcome::no_match(format!(
                    "{} and {} primary",
                    message.found_many("component", "multiple components").items(&names),
                    if primaries.is_empty() { "none is" } else { "more than one is" }
                ))
            }
        }
    }
}

fn scoped_label(base: &str, target: &str, scope: ComponentScope) -> String {
    match scope {
        ComponentScope::ByName => base.to_string(),
        ComponentScope::ByType => format!("{} type '{}'", base, target),
    }
}
