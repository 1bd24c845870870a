//! `order`: print the evaluation order without evaluating conditions

use activation_engine::ModuleDescriptor;
use serde::Serialize;
use tabled::Tabled;

use super::SourceArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{self, OutputFormat};

/// Table row for evaluation order display
#[derive(Debug, Serialize, Tabled)]
pub struct OrderRow {
    /// Position in evaluation order, from 1
    pub position: usize,
    pub id: String,
    pub phase: String,
    pub precedence: i32,
    /// Exclusivity group, or `-`
    pub group: String,
}

impl OrderRow {
    fn new(position: usize, module: &ModuleDescriptor) -> Self {
        Self {
            position,
            id: module.id().to_string(),
            phase: module.phase().to_string(),
            precedence: module.precedence(),
            group: module
                .group()
                .map(|group| group.to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Rows for every module, in evaluation order
pub fn rows(modules: &[&ModuleDescriptor]) -> Vec<OrderRow> {
    modules
        .iter()
        .enumerate()
        .map(|(index, module)| OrderRow::new(index + 1, module))
        .collect()
}

pub fn execute(source: &SourceArgs, config: &CliConfig, format: OutputFormat) -> CliResult<()> {
    let (_, registry) = source.load(config)?;
    let order = registry.evaluation_order()?;
    println!("{}", output::render_rows(&rows(&order), format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use activation_engine::{modules_for, EngineConfig, Family, ModuleRegistry};

    #[test]
    fn test_rows_follow_evaluation_order() {
        let registry =
            ModuleRegistry::with_modules(modules_for(&[Family::Jms, Family::Dispatch], &EngineConfig::default()))
                .unwrap();
        let order = registry.evaluation_order().unwrap();
        let rows = rows(&order);

        assert_eq!(rows[0].id, "dispatcher");
        assert_eq!(rows[0].position, 1);
        assert_eq!(rows[0].precedence, i32::MIN);
        let last = rows.last().unwrap();
        assert_eq!(last.id, "jms-listener-container-factory");
        assert_eq!(last.phase, "instantiation");
        assert_eq!(last.group, "-");
    }
}
