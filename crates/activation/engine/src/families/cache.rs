//! Cache manager selection
//!
//! One module per supported cache type, all in the `cache-manager` group and
//! ordered by the type's position in [`CacheType::ALL`]. The first type whose
//! condition holds provides the cache manager.

use std::fmt;
use std::str::FromStr;

use activation_types::{ConditionMessage, Outcome};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::condition::{Condition, ConditionPredicate};
use crate::config::CacheFamilyConfig;
use crate::module::ModuleDescriptor;
use crate::snapshot::FactView;

pub const GROUP: &str = "cache-manager";
pub const TYPE_SELECTION: &str = "cache.type";

/// Supported cache types, in auto-detection order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheType {
    Generic,
    JCache,
    EhCache,
    Hazelcast,
    Infinispan,
    Couchbase,
    Redis,
    Caffeine,
    Simple,
    None,
}

/// What has to be present for a cache type to be auto-detected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackingMarker {
    /// A component of this type is registered
    Component(&'static str),
    /// This type is on the type path
    Type(&'static str),
    Always,
    /// Only when named explicitly
    Never,
}

impl CacheType {
    pub const ALL: [CacheType; 10] = [
        CacheType::Generic,
        CacheType::JCache,
        CacheType::EhCache,
        CacheType::Hazelcast,
        CacheType::Infinispan,
        CacheType::Couchbase,
        CacheType::Redis,
        CacheType::Caffeine,
        CacheType::Simple,
        CacheType::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheType::Generic => "generic",
            CacheType::JCache => "jcache",
            CacheType::EhCache => "ehcache",
            CacheType::Hazelcast => "hazelcast",
            CacheType::Infinispan => "infinispan",
            CacheType::Couchbase => "couchbase",
            CacheType::Redis => "redis",
            CacheType::Caffeine => "caffeine",
            CacheType::Simple => "simple",
            CacheType::None => "none",
        }
    }

    /// Case-insensitive; `-` and `_` are ignored
    pub fn parse(value: &str) -> Option<CacheType> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL.into_iter().find(|ty| ty.as_str() == normalized)
    }

    pub fn module_id(&self) -> String {
        format!("{}-cache", self.as_str())
    }

    pub fn backing_marker(&self) -> BackingMarker {
        match self {
            CacheType::Generic => BackingMarker::Component("org.springframework.cache.Cache"),
            CacheType::JCache => BackingMarker::Type("javax.cache.Caching"),
            CacheType::EhCache => BackingMarker::Type("net.sf.ehcache.Cache"),
            CacheType::Hazelcast => BackingMarker::Type("com.hazelcast.core.HazelcastInstance"),
            CacheType::Infinispan => {
                BackingMarker::Type("org.infinispan.spring.embedded.provider.SpringEmbeddedCacheManager")
            }
            CacheType::Couchbase => BackingMarker::Type("com.couchbase.client.java.Cluster"),
            CacheType::Redis => {
                BackingMarker::Type("org.springframework.data.redis.connection.RedisConnectionFactory")
            }
            CacheType::Caffeine => BackingMarker::Type("com.github.benmanes.caffeine.cache.Caffeine"),
            CacheType::Simple => BackingMarker::Always,
            CacheType::None => BackingMarker::Never,
        }
    }

    /// Type of the cache manager this module provides
    pub fn manager_type(&self) -> &'static str {
        match self {
            CacheType::Generic => "org.springframework.cache.support.SimpleCacheManager",
            CacheType::JCache => "org.springframework.cache.jcache.JCacheCacheManager",
            CacheType::EhCache => "org.springframework.cache.ehcache.EhCacheCacheManager",
            CacheType::Hazelcast => "com.hazelcast.spring.cache.HazelcastCacheManager",
            CacheType::Infinispan => "org.infinispan.spring.embedded.provider.SpringEmbeddedCacheManager",
            CacheType::Couchbase => "org.springframework.data.couchbase.cache.CouchbaseCacheManager",
            CacheType::Redis => "org.springframework.data.redis.cache.RedisCacheManager",
            CacheType::Caffeine => "org.springframework.cache.caffeine.CaffeineCacheManager",
            CacheType::Simple => "org.springframework.cache.concurrent.ConcurrentMapCacheManager",
            CacheType::None => "org.springframework.cache.support.NoOpCacheManager",
        }
    }
}

impl fmt::Display for CacheType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        CacheType::parse(value).ok_or_else(|| format!("unknown cache type '{}'", value))
    }
}

/// Explicit `spring.cache.type` wins; otherwise the backing marker decides
#[derive(Debug, Clone)]
pub struct CacheTypeCondition {
    cache_type: CacheType,
    type_property: String,
    label: String,
}

impl CacheTypeCondition {
    pub fn new(cache_type: CacheType, type_property: impl Into<String>) -> Self {
        Self {
            cache_type,
            type_property: type_property.into(),
            label: format!("Cache type '{}'", cache_type),
        }
    }

    fn matched(&self, reason: String) -> Outcome {
        Outcome::matching(reason).with_selection(TYPE_SELECTION, self.cache_type.as_str())
    }

    fn detect(&self, facts: &FactView<'_>, message: &ConditionMessage) -> Outcome {
        match self.cache_type.backing_marker() {
            BackingMarker::Component(type_name) => {
                let caches = facts.component_names_for_type(type_name);
                if caches.is_empty() {
                    Outcome::no_match(message.did_not_find_many("cache component", "cache components").at_all())
                } else {
                    self.matched(message.found_many("cache component", "cache components").items(&caches))
                }
            }
            BackingMarker::Type(type_name) => {
                if facts.type_available(type_name) {
                    self.matched(message.available(type_name))
                } else {
                    Outcome::no_match(message.not_available(type_name))
                }
            }
            BackingMarker::Always => self.matched(message.because("is the fallback")),
            BackingMarker::Never => {
                Outcome::no_match(message.because("is only used when configured explicitly"))
            }
        }
    }
}

impl ConditionPredicate for CacheTypeCondition {
    fn name(&self) -> &str {
        &self.label
    }

    fn evaluate(&self, facts: &FactView<'_>) -> Outcome {
        let message = ConditionMessage::for_condition(self.name());
        let configured = match facts.property(&self.type_property) {
            Ok(value) => value.filter(|value| !value.trim().is_empty()),
            Err(err) => {
                warn!(key = %self.type_property, error = %err, "cache type could not be resolved");
                return Outcome::no_match(
                    message.because(format!("could not resolve {}: {}", self.type_property, err)),
                );
            }
        };

        let Some(configured) = configured else {
            return self.detect(facts, &message);
        };
        match CacheType::parse(&configured) {
            Some(requested) if requested == self.cache_type => {
                self.matched(message.because(format!("{} is '{}'", self.type_property, configured.trim())))
            }
            Some(_) => Outcome::no_match(message.because(format!(
                "{} is '{}'",
                self.type_property,
                configured.trim()
            ))),
            None => {
                warn!(key = %self.type_property, value = %configured, "unknown cache type");
                Outcome::no_match(message.because(format!(
                    "{} names unknown cache type '{}'",
                    self.type_property,
                    configured.trim()
                )))
            }
        }
    }
}

/// One module per cache type
pub fn modules(config: &CacheFamilyConfig) -> Vec<ModuleDescriptor> {
    CacheType::ALL
        .into_iter()
        .enumerate()
        .map(|(ordinal, cache_type)| {
            ModuleDescriptor::builder(cache_type.module_id())
                .precedence(ordinal as i32)
                .group(GROUP)
                .required(config.required)
                .condition(Condition::component_of_type_absent(&config.cache_manager_type))
                .condition(Condition::custom(CacheTypeCondition::new(
                    cache_type,
                    &config.type_property,
                )))
                .provides(&config.component_name, cache_type.manager_type())
                .build()
        })
        .collect()
}
