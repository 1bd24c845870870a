//! Primary dispatch resolution
//!
//! Two dependent stages decide whether the default dispatcher and its
//! registration wrapper are created:
//!
//! - Stage A ([`DefaultDispatcherCondition`]) only asks whether the reserved
//!   dispatcher name is free. Other dispatchers under other names do not
//!   block it.
//! - Stage B ([`DispatcherRegistrationCondition`]) runs after Stage A has
//!   been decided. It requires the reserved name to be held by a dispatcher
//!   (or nobody), the reserved dispatcher to be the only dispatcher if any
//!   exist, and the reserved registration name to be free.
//!
//! The multipart alias belongs to the default dispatcher and only activates
//! when Stage A did ([`DefaultDispatcherActivated`]).

use activation_types::{ConditionMessage, Outcome, Precedence};

use crate::condition::{Condition, ConditionPredicate};
use crate::config::DispatchFamilyConfig;
use crate::module::ModuleDescriptor;
use crate::snapshot::FactView;

pub const DISPATCHER_MODULE: &str = "dispatcher";
pub const REGISTRATION_MODULE: &str = "dispatcher-registration";
pub const MULTIPART_ALIAS_MODULE: &str = "multipart-resolver-alias";

/// Stage A: the reserved dispatcher name is free
#[derive(Debug, Clone)]
pub struct DefaultDispatcherCondition {
    dispatcher_name: String,
    dispatcher_type: String,
}

impl DefaultDispatcherCondition {
    pub fn new(config: &DispatchFamilyConfig) -> Self {
        Self {
            dispatcher_name: config.dispatcher_name.clone(),
            dispatcher_type: config.dispatcher_type.clone(),
        }
    }
}

impl ConditionPredicate for DefaultDispatcherCondition {
    fn name(&self) -> &str {
        "Default dispatcher"
    }

    fn evaluate(&self, facts: &FactView<'_>) -> Outcome {
        let message = ConditionMessage::for_condition(self.name());
        let dispatchers = facts.component_names_for_type(&self.dispatcher_type);

        if dispatchers.contains(&self.dispatcher_name) {
            return Outcome::no_match(
                message
                    .found("dispatcher component")
                    .items([&self.dispatcher_name]),
            );
        }
        if facts.contains_component(&self.dispatcher_name) {
            return Outcome::no_match(
                message
                    .found("non dispatcher component")
                    .items([&self.dispatcher_name]),
            );
        }
        if dispatchers.is_empty() {
            return Outcome::matching(
                message
                    .did_not_find_many("dispatcher component", "dispatcher components")
                    .at_all(),
            );
        }
        Outcome::matching(format!(
            "{} and none is named '{}'",
            message
                .found_many("dispatcher component", "dispatcher components")
                .items(&dispatchers),
            self.dispatcher_name
        ))
    }
}

/// Stage B: a registration wrapper for the reserved dispatcher may be created
#[derive(Debug, Clone)]
pub struct DispatcherRegistrationCondition {
    dispatcher_name: String,
    dispatcher_type: String,
    registration_name: String,
    registration_type: String,
}

impl DispatcherRegistrationCondition {
    pub fn new(config: &DispatchFamilyConfig) -> Self {
        Self {
            dispatcher_name: config.dispatcher_name.clone(),
            dispatcher_type: config.dispatcher_type.clone(),
            registration_name: config.registration_name.clone(),
            registration_type: config.registration_type.clone(),
        }
    }

    fn check_dispatcher(&self, facts: &FactView<'_>, message: &ConditionMessage) -> Option<Outcome> {
        if let Some(holder) = facts.component_named(&self.dispatcher_name) {
            if !holder.is_of_type(&self.dispatcher_type) {
                return Some(Outcome::no_match(
                    message
                        .found("non dispatcher component")
                        .items([&self.dispatcher_name]),
                ));
            }
        }

        let dispatchers = facts.component_names_for_type(&self.dispatcher_type);
        let sole_default = dispatchers.len() == 1 && dispatchers.contains(&self.dispatcher_name);
        if dispatchers.is_empty() || sole_default {
            return None;
        }
        Some(Outcome::no_match(format!(
            "{} and '{}' is not the only one",
            message
                .found_many("dispatcher component", "dispatcher components")
                .items(&dispatchers),
            self.dispatcher_name
        )))
    }

    fn check_registration(&self, facts: &FactView<'_>, message: &ConditionMessage) -> Outcome {
        let registrations = facts.component_names_for_type(&self.registration_type);
        let name_taken = facts.contains_component(&self.registration_name);

        if registrations.is_empty() {
            if name_taken {
                return Outcome::no_match(
                    message
                        .found("non registration component")
                        .items([&self.registration_name]),
                );
            }
            return Outcome::matching(
                message
                    .did_not_find_many("registration component", "registration components")
                    .at_all(),
            );
        }
        if registrations.contains(&self.registration_name) {
            return Outcome::no_match(
                message
                    .found("registration component")
                    .items([&self.registration_name]),
            );
        }
        if name_taken {
            return Outcome::no_match(
                message
                    .found("non registration component")
                    .items([&self.registration_name]),
            );
        }
        Outcome::matching(format!(
            "{} and none is named '{}'",
            message
                .found_many("registration component", "registration components")
                .items(&registrations),
            self.registration_name
        ))
    }
}

impl ConditionPredicate for DispatcherRegistrationCondition {
    fn name(&self) -> &str {
        "Dispatcher registration"
    }

    fn evaluate(&self, facts: &FactView<'_>) -> Outcome {
        let message = ConditionMessage::for_condition(self.name());
        if let Some(rejected) = self.check_dispatcher(facts, &message) {
            return rejected;
        }
        self.check_registration(facts, &message)
    }
}

/// The reserved dispatcher was contributed by Stage A in this run
#[derive(Debug, Clone)]
pub struct DefaultDispatcherActivated {
    dispatcher_name: String,
}

impl DefaultDispatcherActivated {
    pub fn new(config: &DispatchFamilyConfig) -> Self {
        Self {
            dispatcher_name: config.dispatcher_name.clone(),
        }
    }
}

impl ConditionPredicate for DefaultDispatcherActivated {
    fn name(&self) -> &str {
        "Default dispatcher activated"
    }

    fn evaluate(&self, facts: &FactView<'_>) -> Outcome {
        let message = ConditionMessage::for_condition(self.name());
        if facts.is_contributed(&self.dispatcher_name) {
            Outcome::matching(
                message
                    .found("default dispatcher")
                    .items([&self.dispatcher_name]),
            )
        } else {
            Outcome::no_match(
                message
                    .did_not_find("default dispatcher")
                    .items([&self.dispatcher_name]),
            )
        }
    }
}

/// Dispatcher, registration and multipart alias modules
pub fn modules(config: &DispatchFamilyConfig) -> Vec<ModuleDescriptor> {
    let on_type_path = [
        Condition::type_available(&config.dispatcher_type),
        Condition::type_available(&config.registration_api_type),
    ];

    vec![
        ModuleDescriptor::builder(DISPATCHER_MODULE)
            .precedence(Precedence::HIGHEST)
            .conditions(on_type_path.clone())
            .condition(Condition::custom(DefaultDispatcherCondition::new(config)))
            .provides(&config.dispatcher_name, &config.dispatcher_type)
            .build(),
        ModuleDescriptor::builder(REGISTRATION_MODULE)
            .precedence(Precedence::HIGHEST)
            .runs_after(DISPATCHER_MODULE)
            .conditions(on_type_path.clone())
            .condition(Condition::custom(DispatcherRegistrationCondition::new(config)))
            .provides(&config.registration_name, &config.registration_type)
            .build(),
        ModuleDescriptor::builder(MULTIPART_ALIAS_MODULE)
            .precedence(Precedence::HIGHEST)
            .runs_after(DISPATCHER_MODULE)
            .conditions(on_type_path)
            .condition(Condition::custom(DefaultDispatcherActivated::new(config)))
            .condition(Condition::component_of_type_present(&config.multipart_resolver_type))
            .condition(Condition::component_absent(&config.multipart_resolver_name))
            .provides(&config.multipart_resolver_name, &config.multipart_resolver_type)
            .build(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::StaticFactProvider;
    use crate::snapshot::FactSnapshot;
    use activation_types::{ComponentDescriptor, Phase};

    fn config() -> DispatchFamilyConfig {
        DispatchFamilyConfig::default()
    }

    fn stage_a(provider: &StaticFactProvider) -> Outcome {
        let snapshot = FactSnapshot::new(provider);
        DefaultDispatcherCondition::new(&config()).evaluate(&snapshot.view(Phase::Definition))
    }

    fn stage_b(provider: &StaticFactProvider) -> Outcome {
        let snapshot = FactSnapshot::new(provider);
        DispatcherRegistrationCondition::new(&config()).evaluate(&snapshot.view(Phase::Definition))
    }

    #[test]
    fn test_stage_a_free_name() {
        let outcome = stage_a(&StaticFactProvider::new());
        assert!(outcome.is_match());
        assert_eq!(
            outcome.reason(),
            "Default dispatcher did not find any dispatcher components"
        );
    }

    #[test]
    fn test_stage_a_other_dispatcher_under_other_name() {
        let provider = StaticFactProvider::new()
            .with_component(ComponentDescriptor::new("custom", config().dispatcher_type));
        let outcome = stage_a(&provider);
        assert!(outcome.is_match());
        assert!(outcome.reason().ends_with("and none is named 'dispatcherServlet'"));
    }

    #[test]
    fn test_stage_a_reserved_name_taken() {
        let by_dispatcher = StaticFactProvider::new()
            .with_component(ComponentDescriptor::new("dispatcherServlet", config().dispatcher_type));
        assert!(!stage_a(&by_dispatcher).is_match());

        let by_other = StaticFactProvider::new()
            .with_component(ComponentDescriptor::new("dispatcherServlet", "com.example.Unrelated"));
        let outcome = stage_a(&by_other);
        assert!(!outcome.is_match());
        assert!(outcome.reason().contains("non dispatcher component"));
    }

    #[test]
    fn test_alias_requires_contributed_dispatcher() {
        let provider = StaticFactProvider::new()
            .with_component(ComponentDescriptor::new("dispatcherServlet", config().dispatcher_type));
        let snapshot = FactSnapshot::new(&provider);
        let outcome = DefaultDispatcherActivated::new(&config()).evaluate(&snapshot.view(Phase::Definition));
        assert!(!outcome.is_match());
        assert_eq!(
            outcome.reason(),
            "Default dispatcher activated did not find default dispatcher 'dispatcherServlet'"
        );
    }

    #[test]
    fn test_stage_b_rejects_foreign_holder_of_reserved_name() {
        let provider = StaticFactProvider::new()
            .with_component(ComponentDescriptor::new("dispatcherServlet", "com.example.Unrelated"));
        let outcome = stage_b(&provider);
        assert!(!outcome.is_match());
        assert!(outcome.reason().contains("non dispatcher component"));
    }

    #[test]
    fn test_stage_b_requires_sole_default_dispatcher() {
        let provider = StaticFactProvider::new()
            .with_component(ComponentDescriptor::new("dispatcherServlet", config().dispatcher_type))
            .with_component(ComponentDescriptor::new("adminDispatcher", config().dispatcher_type));
        let outcome = stage_b(&provider);
        assert!(!outcome.is_match());
        assert!(outcome.reason().contains("is not the only one"));
    }

    #[test]
    fn test_stage_b_registration_checks() {
        let free = StaticFactProvider::new()
            .with_component(ComponentDescriptor::new("dispatcherServlet", config().dispatcher_type));
        assert!(stage_b(&free).is_match());

        let reserved = StaticFactProvider::new().with_component(ComponentDescriptor::new(
            "dispatcherServletRegistration",
            config().registration_type,
        ));
        assert!(!stage_b(&reserved).is_match());

        let foreign = StaticFactProvider::new().with_component(ComponentDescriptor::new(
            "dispatcherServletRegistration",
            "com.example.Unrelated",
        ));
        let outcome = stage_b(&foreign);
        assert!(!outcome.is_match());
        assert!(outcome.reason().contains("non registration component"));

        let others = StaticFactProvider::new()
            .with_component(ComponentDescriptor::new("h2Console", config().registration_type));
        let outcome = stage_b(&others);
        assert!(outcome.is_match());
        assert!(outcome.reason().ends_with("none is named 'dispatcherServletRegistration'"));
    }
}
