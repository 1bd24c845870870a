//! Engine configuration
//!
//! Loaded by the caller (the CLI reads TOML); every section has defaults so
//! an empty document is a valid configuration.

use serde::{Deserialize, Serialize};

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub resolver: ResolverConfig,
    pub dispatch: DispatchFamilyConfig,
    pub datasource: DataSourceFamilyConfig,
    pub cache: CacheFamilyConfig,
}

/// Resolver behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Return an error when a required group ends without an activation.
    /// When false the shortfall is only logged.
    pub fail_on_missing_required: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fail_on_missing_required: true,
        }
    }
}

/// Reserved names and types for primary dispatch resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchFamilyConfig {
    pub dispatcher_name: String,
    pub registration_name: String,
    pub dispatcher_type: String,
    pub registration_type: String,
    /// Servlet registration API that must be on the type path
    pub registration_api_type: String,
    pub multipart_resolver_name: String,
    pub multipart_resolver_type: String,
}

impl Default for DispatchFamilyConfig {
    fn default() -> Self {
        Self {
            dispatcher_name: "dispatcherServlet".into(),
            registration_name: "dispatcherServletRegistration".into(),
            dispatcher_type: "org.springframework.web.servlet.DispatcherServlet".into(),
            registration_type: "org.springframework.boot.web.servlet.ServletRegistrationBean".into(),
            registration_api_type: "javax.servlet.ServletRegistration".into(),
            multipart_resolver_name: "multipartResolver".into(),
            multipart_resolver_type: "org.springframework.web.multipart.MultipartResolver".into(),
        }
    }
}

/// An embedded database engine and the type that marks it available
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedEngine {
    pub name: String,
    pub marker: String,
}

impl EmbeddedEngine {
    pub fn new(name: impl Into<String>, marker: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            marker: marker.into(),
        }
    }
}

/// Embedded-vs-pooled data source resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSourceFamilyConfig {
    /// Connection address; when it has text, embedded never matches
    pub url_property: String,
    /// Explicit provider type; when set, pooled matches
    pub type_property: String,
    pub component_name: String,
    pub datasource_type: String,
    pub xa_datasource_type: String,
    pub embedded_support_type: String,
    /// Pooled vendor markers in preference order
    pub pooled_vendors: Vec<String>,
    /// Embedded engines in preference order
    pub embedded_engines: Vec<EmbeddedEngine>,
    pub required: bool,
}

impl Default for DataSourceFamilyConfig {
    fn default() -> Self {
        Self {
            url_property: "spring.datasource.url".into(),
            type_property: "spring.datasource.type".into(),
            component_name: "dataSource".into(),
            datasource_type: "javax.sql.DataSource".into(),
            xa_datasource_type: "javax.sql.XADataSource".into(),
            embedded_support_type:
                "org.springframework.jdbc.datasource.embedded.EmbeddedDatabaseType".into(),
            pooled_vendors: vec![
                "com.zaxxer.hikari.HikariDataSource".into(),
                "org.apache.tomcat.jdbc.pool.DataSource".into(),
                "org.apache.commons.dbcp2.BasicDataSource".into(),
            ],
            embedded_engines: vec![
                EmbeddedEngine::new("H2", "org.h2.Driver"),
                EmbeddedEngine::new("DERBY", "org.apache.derby.jdbc.EmbeddedDriver"),
                EmbeddedEngine::new("HSQL", "org.hsqldb.jdbcDriver"),
            ],
            required: false,
        }
    }
}

/// Cache manager selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheFamilyConfig {
    pub type_property: String,
    pub component_name: String,
    pub cache_manager_type: String,
    pub required: bool,
}

impl Default for CacheFamilyConfig {
    fn default() -> Self {
        Self {
            type_property: "spring.cache.type".into(),
            component_name: "cacheManager".into(),
            cache_manager_type: "org.springframework.cache.CacheManager".into(),
            required: false,
        }
    }
}
