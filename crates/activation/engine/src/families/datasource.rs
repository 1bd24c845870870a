//! Embedded vs pooled data source
//!
//! Both modules share the `datasource` group, so at most one activates. The
//! pooled condition is also consulted by the embedded condition: whenever a
//! pooled provider could be used, the embedded engine backs off.

use activation_types::{ConditionMessage, Outcome};

use crate::condition::{Condition, ConditionPredicate};
use crate::config::{DataSourceFamilyConfig, EmbeddedEngine};
use crate::module::ModuleDescriptor;
use crate::snapshot::FactView;

pub const GROUP: &str = "datasource";
pub const EMBEDDED_MODULE: &str = "embedded-datasource";
pub const POOLED_MODULE: &str = "pooled-datasource";

/// Selection key for the chosen provider implementation
pub const PROVIDER_SELECTION: &str = "datasource.provider";
/// Selection key for the chosen embedded engine
pub const ENGINE_SELECTION: &str = "datasource.embedded-engine";

/// The provider type was set explicitly through a property
#[derive(Debug, Clone)]
pub struct ExplicitProviderType {
    type_property: String,
}

impl ExplicitProviderType {
    pub fn new(type_property: impl Into<String>) -> Self {
        Self {
            type_property: type_property.into(),
        }
    }
}

impl ConditionPredicate for ExplicitProviderType {
    fn name(&self) -> &str {
        "ExplicitDataSourceType"
    }

    fn evaluate(&self, facts: &FactView<'_>) -> Outcome {
        let message = ConditionMessage::for_condition(self.name());
        match facts.property_value(&self.type_property) {
            Some(provider) if provider.trim().eq_ignore_ascii_case("false") => Outcome::no_match(
                message.because(format!("{} is set to 'false'", self.type_property)),
            ),
            Some(provider) if !provider.trim().is_empty() => {
                Outcome::matching(message.found("provider type").items([&provider]))
                    .with_selection(PROVIDER_SELECTION, provider.trim())
            }
            _ => Outcome::no_match(message.did_not_find("property").items([&self.type_property])),
        }
    }
}

/// A vendor pool implementation is on the type path; the first in the
/// preference list wins
#[derive(Debug, Clone)]
pub struct PooledProviderAvailable {
    vendors: Vec<String>,
}

impl PooledProviderAvailable {
    pub fn new(vendors: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            vendors: vendors.into_iter().map(Into::into).collect(),
        }
    }
}

impl ConditionPredicate for PooledProviderAvailable {
    fn name(&self) -> &str {
        "PooledDataSource"
    }

    fn evaluate(&self, facts: &FactView<'_>) -> Outcome {
        let message = ConditionMessage::for_condition(self.name());
        match self.vendors.iter().find(|vendor| facts.type_available(vendor)) {
            Some(vendor) => Outcome::matching(message.found("supported provider").items([vendor]))
                .with_selection(PROVIDER_SELECTION, vendor),
            None => Outcome::no_match(message.did_not_find("supported provider").at_all()),
        }
    }
}

/// Pooled matches on an explicit provider type or an available vendor
pub fn pooled_condition(config: &DataSourceFamilyConfig) -> Condition {
    Condition::any_of(vec![
        Condition::custom(ExplicitProviderType::new(&config.type_property)),
        Condition::custom(PooledProviderAvailable::new(config.pooled_vendors.iter())),
    ])
}

/// Embedded engine is used only when nothing points at a real database
#[derive(Debug, Clone)]
pub struct EmbeddedDatabaseCondition {
    url_property: String,
    pooled: Condition,
    engines: Vec<EmbeddedEngine>,
}

impl EmbeddedDatabaseCondition {
    pub fn new(config: &DataSourceFamilyConfig) -> Self {
        Self {
            url_property: config.url_property.clone(),
            pooled: pooled_condition(config),
            engines: config.embedded_engines.clone(),
        }
    }
}

impl ConditionPredicate for EmbeddedDatabaseCondition {
    fn name(&self) -> &str {
        "EmbeddedDataSource"
    }

    fn evaluate(&self, facts: &FactView<'_>) -> Outcome {
        let message = ConditionMessage::for_condition(self.name());

        // Unresolvable values count as unset
        if facts.property_has_text(&self.url_property) {
            return Outcome::no_match(message.because(format!("{} is set", self.url_property)));
        }
        if self.pooled.evaluate(facts).is_match() {
            return Outcome::no_match(message.found_exactly("supported pooled data source"));
        }

        match self.engines.iter().find(|engine| facts.type_available(&engine.marker)) {
            Some(engine) => Outcome::matching(message.found("embedded database").items([&engine.name]))
                .with_selection(ENGINE_SELECTION, &engine.name),
            None => Outcome::no_match(message.did_not_find("embedded database").at_all()),
        }
    }
}

/// The embedded and pooled modules, in that order
pub fn modules(config: &DataSourceFamilyConfig) -> Vec<ModuleDescriptor> {
    let shared = [
        Condition::type_available(&config.datasource_type),
        Condition::type_available(&config.embedded_support_type),
    ];
    let no_existing = [
        Condition::component_of_type_absent(&config.datasource_type),
        Condition::component_of_type_absent(&config.xa_datasource_type),
    ];

    vec![
        ModuleDescriptor::builder(EMBEDDED_MODULE)
            .group(GROUP)
            .required(config.required)
            .conditions(shared.clone())
            .condition(Condition::custom(EmbeddedDatabaseCondition::new(config)))
            .conditions(no_existing.clone())
            .provides(&config.component_name, &config.datasource_type)
            .build(),
        ModuleDescriptor::builder(POOLED_MODULE)
            .group(GROUP)
            .required(config.required)
            .conditions(shared)
            .condition(pooled_condition(config))
            .conditions(no_existing)
            .provides(&config.component_name, &config.datasource_type)
            .build(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::StaticFactProvider;
    use crate::snapshot::FactSnapshot;
    use activation_types::Phase;

    const HIKARI: &str = "com.zaxxer.hikari.HikariDataSource";
    const DBCP2: &str = "org.apache.commons.dbcp2.BasicDataSource";

    fn evaluate(predicate: &dyn ConditionPredicate, provider: &StaticFactProvider) -> Outcome {
        let snapshot = FactSnapshot::new(provider);
        predicate.evaluate(&snapshot.view(Phase::Definition))
    }

    #[test]
    fn test_first_vendor_wins() {
        let provider = StaticFactProvider::new().with_types([DBCP2, HIKARI]);
        let outcome = evaluate(
            &PooledProviderAvailable::new(DataSourceFamilyConfig::default().pooled_vendors),
            &provider,
        );
        assert!(outcome.is_match());
        assert_eq!(outcome.selections().get(PROVIDER_SELECTION).map(String::as_str), Some(HIKARI));
    }

    #[test]
    fn test_explicit_type_selects_provider() {
        let provider = StaticFactProvider::new()
            .with_property("spring.datasource.type", "com.example.CustomPool");
        let outcome = evaluate(&ExplicitProviderType::new("spring.datasource.type"), &provider);
        assert!(outcome.is_match());
        assert_eq!(
            outcome.selections().get(PROVIDER_SELECTION).map(String::as_str),
            Some("com.example.CustomPool")
        );
    }

    #[test]
    fn test_explicit_type_false_is_unset() {
        let provider = StaticFactProvider::new().with_property("spring.datasource.type", "FALSE");
        let outcome = evaluate(&ExplicitProviderType::new("spring.datasource.type"), &provider);
        assert!(!outcome.is_match());
        assert_eq!(
            outcome.reason(),
            "ExplicitDataSourceType spring.datasource.type is set to 'false'"
        );
        assert!(outcome.selections().is_empty());
    }

    #[test]
    fn test_embedded_picks_first_engine() {
        let provider =
            StaticFactProvider::new().with_types(["org.hsqldb.jdbcDriver", "org.apache.derby.jdbc.EmbeddedDriver"]);
        let outcome = evaluate(&EmbeddedDatabaseCondition::new(&DataSourceFamilyConfig::default()), &provider);
        assert!(outcome.is_match());
        assert_eq!(outcome.selections().get(ENGINE_SELECTION).map(String::as_str), Some("DERBY"));
        assert_eq!(outcome.reason(), "EmbeddedDataSource found embedded database 'DERBY'");
    }

    #[test]
    fn test_embedded_backs_off() {
        let config = DataSourceFamilyConfig::default();
        let condition = EmbeddedDatabaseCondition::new(&config);

        let with_url = StaticFactProvider::new()
            .with_type("org.h2.Driver")
            .with_property("spring.datasource.url", "jdbc:postgresql://db/app");
        let outcome = evaluate(&condition, &with_url);
        assert!(!outcome.is_match());
        assert_eq!(outcome.reason(), "EmbeddedDataSource spring.datasource.url is set");

        let with_pool = StaticFactProvider::new().with_types(["org.h2.Driver", HIKARI]);
        let outcome = evaluate(&condition, &with_pool);
        assert!(!outcome.is_match());
        assert_eq!(outcome.reason(), "EmbeddedDataSource found supported pooled data source");

        let nothing = StaticFactProvider::new();
        assert_eq!(
            evaluate(&condition, &nothing).reason(),
            "EmbeddedDataSource did not find any embedded database"
        );
    }

    #[test]
    fn test_blank_or_unresolved_url_counts_as_unset() {
        let condition = EmbeddedDatabaseCondition::new(&DataSourceFamilyConfig::default());

        let blank = StaticFactProvider::new()
            .with_type("org.h2.Driver")
            .with_property("spring.datasource.url", "   ");
        assert!(evaluate(&condition, &blank).is_match());

        let unresolved = StaticFactProvider::new()
            .with_type("org.h2.Driver")
            .with_unresolvable_property("spring.datasource.url", "DB_URL");
        assert!(evaluate(&condition, &unresolved).is_match());
    }
}
