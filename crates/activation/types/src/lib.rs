//! # Activation Types
//!
//! Pure data shared by the activation engine and its collaborators.
//!
//! - [`ModuleId`] / [`GroupId`]: identifiers for candidate modules and
//!   exclusivity groups
//! - [`Phase`] / [`Precedence`]: evaluation stage and ordering key
//! - [`ComponentDescriptor`]: metadata about a component the environment
//!   already declares (never a live instance)
//! - [`FactQuery`]: a point query against the environment
//! - [`Outcome`] / [`ConditionMessage`]: result of a condition plus its
//!   human-readable reasoning
//! - [`ActivationDecision`] / [`ActivationReport`]: what the resolver emits
//!
//! Nothing in this crate evaluates anything.

#![deny(unsafe_code)]

pub mod component;
pub mod fact;
pub mod ids;
pub mod outcome;
pub mod phase;
pub mod report;

pub use component::{ComponentDescriptor, ComponentOrigin, ComponentScope, ProvidedComponent};
pub use fact::{FactQuery, PropertyResolutionError};
pub use ids::{GroupId, ModuleId};
pub use outcome::{ConditionMessage, ItemsBuilder, Outcome};
pub use phase::{Phase, Precedence};
pub use report::{ActivationDecision, ActivationReport};
