//! Condition outcomes and the messages that explain them
//!
//! Every condition and condition tree produces an [`Outcome`]; evaluation
//! never fails. Reasons are built with [`ConditionMessage`] so they read the
//! same across conditions, e.g. `"PooledDataSource found supported provider
//! 'com.zaxxer.hikari.HikariDataSource'"`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of evaluating a condition or condition tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    matched: bool,
    trail: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    selections: BTreeMap<String, String>,
}

impl Outcome {
    /// A matching outcome with a single reason
    pub fn matching(reason: impl Into<String>) -> Self {
        Self::from_trail(true, vec![reason.into()])
    }

    /// A non-matching outcome with a single reason
    pub fn no_match(reason: impl Into<String>) -> Self {
        Self::from_trail(false, vec![reason.into()])
    }

    pub fn from_trail(matched: bool, trail: Vec<String>) -> Self {
        Self {
            matched,
            trail,
            selections: BTreeMap::new(),
        }
    }

    /// Record a choice made while matching (e.g. which provider won)
    pub fn with_selection(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.selections.insert(key.into(), value.into());
        self
    }

    pub fn is_match(&self) -> bool {
        self.matched
    }

    pub fn trail(&self) -> &[String] {
        &self.trail
    }

    pub fn selections(&self) -> &BTreeMap<String, String> {
        &self.selections
    }

    /// All trail entries joined into one line
    pub fn reason(&self) -> String {
        self.trail.join("; ")
    }

    /// Fold another matching outcome's reasons and selections into this one.
    pub fn absorb(&mut self, other: Outcome) {
        self.trail.extend(other.trail);
        self.selections.extend(other.selections);
    }

    pub fn into_parts(self) -> (bool, Vec<String>, BTreeMap<String, String>) {
        (self.matched, self.trail, self.selections)
    }
}

/// Builder for consistent human-readable condition reasons
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionMessage {
    condition: String,
}

impl ConditionMessage {
    pub fn for_condition(condition: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
        }
    }

    pub fn because(&self, reason: impl AsRef<str>) -> String {
        format!("{} {}", self.condition, reason.as_ref())
    }

    pub fn found_exactly(&self, result: impl AsRef<str>) -> String {
        format!("{} found {}", self.condition, result.as_ref())
    }

    pub fn available(&self, item: impl AsRef<str>) -> String {
        format!("{} {} is available", self.condition, item.as_ref())
    }

    pub fn not_available(&self, item: impl AsRef<str>) -> String {
        format!("{} {} is not available", self.condition, item.as_ref())
    }

    pub fn found<'a>(&'a self, article: &'a str) -> ItemsBuilder<'a> {
        self.found_many(article, article)
    }

    pub fn found_many<'a>(&'a self, singular: &'a str, plural: &'a str) -> ItemsBuilder<'a> {
        ItemsBuilder {
            message: self,
            verb: "found",
            singular,
            plural,
        }
    }

    pub fn did_not_find<'a>(&'a self, article: &'a str) -> ItemsBuilder<'a> {
        self.did_not_find_many(article, article)
    }

    pub fn did_not_find_many<'a>(&'a self, singular: &'a str, plural: &'a str) -> ItemsBuilder<'a> {
        ItemsBuilder {
            message: self,
            verb: "did not find",
            singular,
            plural,
        }
    }
}

/// Second half of a `found` / `did not find` message
#[derive(Debug)]
pub struct ItemsBuilder<'a> {
    message: &'a ConditionMessage,
    verb: &'static str,
    singular: &'a str,
    plural: &'a str,
}

impl ItemsBuilder<'_> {
    /// List the items, quoted. An empty list reads as "did not find any".
    pub fn items<I, S>(self, items: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let quoted: Vec<String> = items
            .into_iter()
            .map(|item| format!("'{}'", item.as_ref()))
            .collect();

        match quoted.len() {
            0 => self.at_all(),
            1 => format!(
                "{} {} {} {}",
                self.message.condition, self.verb, self.singular, quoted[0]
            ),
            _ => format!(
                "{} {} {} {}",
                self.message.condition,
                self.verb,
                self.plural,
                quoted.join(", ")
            ),
        }
    }

    pub fn at_all(self) -> String {
        format!("{} did not find any {}", self.message.condition, self.plural)
    }
}
