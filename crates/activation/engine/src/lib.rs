//! Activation Engine: decides which candidate modules activate.
//!
//! Given a set of [`ModuleDescriptor`]s and a [`FactProvider`] describing the
//! environment, the [`ActivationResolver`] walks the modules in a
//! deterministic order and records one decision per module in an
//! [`ActivationReport`](activation_types::ActivationReport).
//!
//! ## Guarantees
//!
//! - **Determinism**: the same registry and facts produce the same report,
//!   including reason text.
//! - **Append-only snapshot**: a module that activates makes its components
//!   visible to every later module; nothing is ever withdrawn.
//! - **Exclusivity**: at most one module per group activates, and the first
//!   in evaluation order wins.
//! - **Phase visibility**: already-instantiated singletons are only observed
//!   by instantiation-phase conditions.
//!
//! ## Evaluation order
//!
//! 1. Definition-phase modules before instantiation-phase modules
//! 2. Lower precedence value first
//! 3. Registration order
//! 4. `runs_after` / `runs_before` edges override the above

#![deny(unsafe_code)]

pub mod condition;
pub mod config;
pub mod error;
pub mod families;
pub mod mocks;
pub mod module;
pub mod provider;
pub mod registry;
pub mod resolver;
pub mod snapshot;

pub use condition::{evaluate_all, evaluate_any, Condition, ConditionPredicate};
pub use config::{
    CacheFamilyConfig, DataSourceFamilyConfig, DispatchFamilyConfig, EmbeddedEngine, EngineConfig,
    ResolverConfig,
};
pub use error::{ActivationError, Result};
pub use families::{modules_for, Family};
pub use mocks::StaticFactProvider;
pub use module::{ModuleDescriptor, ModuleDescriptorBuilder};
pub use provider::FactProvider;
pub use registry::ModuleRegistry;
pub use resolver::ActivationResolver;
pub use snapshot::{FactSnapshot, FactView};
