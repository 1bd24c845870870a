use activation_types::{ActivationReport, ModuleId, Phase};
use thiserror::Error;

/// Errors from registering or resolving modules.
///
/// Condition evaluation never produces an error; these cover registry
/// inconsistencies and unsatisfied required activations only.
#[derive(Error, Debug)]
pub enum ActivationError {
    #[error("module already registered: {0}")]
    DuplicateModule(ModuleId),

    #[error("runs-after edges form a cycle through: {}", join_ids(.modules))]
    OrderingCycle { modules: Vec<ModuleId> },

    #[error("{module} ({module_phase}) cannot run after {predecessor} ({predecessor_phase})")]
    PhaseOrderConflict {
        module: ModuleId,
        module_phase: Phase,
        predecessor: ModuleId,
        predecessor_phase: Phase,
    },

    #[error("no activation for required {}", .unsatisfied.join(", "))]
    MissingRequiredActivation {
        unsatisfied: Vec<String>,
        report: Box<ActivationReport>,
    },
}

impl ActivationError {
    /// Full report of the run, when the error was raised after resolution
    pub fn report(&self) -> Option<&ActivationReport> {
        match self {
            Self::MissingRequiredActivation { report, .. } => Some(report),
            _ => None,
        }
    }
}

fn join_ids(ids: &[ModuleId]) -> String {
    ids.iter()
        .map(ModuleId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for activation operations
pub type Result<T> = std::result::Result<T, ActivationError>;
