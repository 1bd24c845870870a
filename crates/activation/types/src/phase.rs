//! Evaluation phase and precedence

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage at which a module's conditions are evaluated.
///
/// Definition-phase conditions only observe declared component metadata.
/// Instantiation-phase conditions may also observe singletons that have
/// already been constructed. Every Definition-phase module is evaluated
/// before any Instantiation-phase module.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Definition,
    Instantiation,
}

impl Phase {
    /// Whether conditions in this phase may see already-constructed singletons
    pub fn observes_singletons(&self) -> bool {
        matches!(self, Phase::Instantiation)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Definition => f.write_str("definition"),
            Phase::Instantiation => f.write_str("instantiation"),
        }
    }
}

/// Numeric precedence; lower values are evaluated first.
pub struct Precedence;

impl Precedence {
    pub const HIGHEST: i32 = i32::MIN;
    pub const DEFAULT: i32 = 0;
    pub const LOWEST: i32 = i32::MAX;
}
