//! Resolution manifests
//!
//! A manifest bundles the facts to resolve against with the modules to
//! resolve. The format follows the file extension: `.toml`, `.yaml`/`.yml`,
//! anything else is read as JSON.
//!
//! ```yaml
//! families: [datasource]
//! facts:
//!   types: [javax.sql.DataSource, org.h2.Driver]
//!   properties:
//!     spring.cache.type: simple
//! modules:
//!   - id: audit-log
//!     conditions:
//!       - kind: property_value
//!         key: audit.enabled
//!         expected: "true"
//! ```

use std::path::Path;

use activation_engine::{modules_for, EngineConfig, Family, ModuleDescriptor, ModuleRegistry, StaticFactProvider};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Facts plus the modules to resolve against them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub facts: StaticFactProvider,
    pub families: Vec<Family>,
    pub modules: Vec<ModuleDescriptor>,
}

impl Manifest {
    pub fn load(path: &Path) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let manifest = match extension.as_deref() {
            Some("toml") => toml::from_str(&contents)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)?,
            _ => serde_json::from_str(&contents)?,
        };
        debug!(path = %path.display(), "loaded manifest");
        Ok(manifest)
    }

    /// Registry of family modules followed by the manifest's own modules.
    ///
    /// `families` from the command line win over the manifest's list, which
    /// wins over the configured defaults.
    pub fn registry(
        &self,
        families: &[Family],
        defaults: &[Family],
        config: &EngineConfig,
    ) -> CliResult<ModuleRegistry> {
        let selected = [families, self.families.as_slice(), defaults]
            .into_iter()
            .find(|list| !list.is_empty())
            .unwrap_or_default();

        if selected.is_empty() && self.modules.is_empty() {
            return Err(CliError::Manifest("no modules or families to resolve".into()));
        }

        let mut registry = ModuleRegistry::with_modules(modules_for(selected, config))?;
        registry.register_all(self.modules.iter().cloned())?;
        debug!(families = ?selected, modules = registry.len(), "built registry");
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use activation_engine::FactProvider;
    use std::io::Write;

    fn write_manifest(suffix: &str, body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_yaml() {
        let file = write_manifest(
            ".yaml",
            r#"
families: [datasource]
facts:
  types: [javax.sql.DataSource, org.h2.Driver]
  properties:
    spring.datasource.url: ""
  components:
    - name: auditSink
      type: com.example.AuditSink
      primary: true
modules:
  - id: audit-log
    precedence: 10
    conditions:
      - kind: component_present
        target: auditSink
"#,
        );

        let manifest = Manifest::load(file.path()).unwrap();
        assert_eq!(manifest.families, [Family::Datasource]);
        assert!(manifest.facts.type_available("org.h2.Driver"));
        assert!(manifest.facts.component_named("auditSink").unwrap().primary);
        assert_eq!(manifest.modules[0].id().as_str(), "audit-log");
        assert_eq!(manifest.modules[0].precedence(), 10);
    }

    #[test]
    fn test_load_toml_and_json() {
        let toml = write_manifest(
            ".toml",
            r#"
families = ["cache"]

[facts]
capabilities = ["jndi"]
"#,
        );
        let manifest = Manifest::load(toml.path()).unwrap();
        assert!(manifest.facts.external_capability("jndi"));

        let json = write_manifest(".json", r#"{"modules":[{"id":"solo"}]}"#);
        let manifest = Manifest::load(json.path()).unwrap();
        assert_eq!(manifest.modules.len(), 1);
        assert!(manifest.families.is_empty());
    }

    #[test]
    fn test_family_selection_precedence() {
        let manifest = Manifest {
            families: vec![Family::Cache],
            ..Manifest::default()
        };
        let config = EngineConfig::default();

        let registry = manifest.registry(&[Family::Jms], &[Family::Dispatch], &config).unwrap();
        assert!(registry.get("jms-annotation-processing").is_some());
        assert!(registry.get("simple-cache").is_none());

        let registry = manifest.registry(&[], &[Family::Dispatch], &config).unwrap();
        assert!(registry.get("simple-cache").is_some());
        assert!(registry.get("dispatcher").is_none());
    }

    #[test]
    fn test_empty_manifest_rejected() {
        let err = Manifest::default()
            .registry(&[], &[], &EngineConfig::default())
            .unwrap_err();
        assert!(matches!(err, CliError::Manifest(_)));
    }

    #[test]
    fn test_module_clashing_with_family_rejected() {
        let manifest = Manifest {
            families: vec![Family::Dispatch],
            modules: vec![ModuleDescriptor::builder("dispatcher").build()],
            ..Manifest::default()
        };
        let err = manifest.registry(&[], &[], &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::Activation(_)));
    }
}
