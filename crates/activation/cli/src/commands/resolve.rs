//! `resolve`: run the engine and print the report

use activation_engine::ActivationResolver;
use tracing::info;

use super::SourceArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{self, print_success, print_warning, OutputFormat};

pub fn execute(source: &SourceArgs, config: &CliConfig, format: OutputFormat) -> CliResult<()> {
    let (manifest, registry) = source.load(config)?;
    let resolver =
        ActivationResolver::new(registry, manifest.facts).with_config(config.engine.resolver.clone());

    match resolver.resolve() {
        Ok(report) => {
            println!("{}", output::render_report(&report, format)?);
            if format == OutputFormat::Text {
                let activated = report.matched().count();
                let summary = format!("{} of {} modules activated", activated, report.len());
                if activated == 0 {
                    print_warning(&summary);
                } else {
                    print_success(&summary);
                }
            }
            info!(manifest = %source.manifest.display(), "resolution finished");
            Ok(())
        }
        Err(err) => {
            if let Some(report) = err.report() {
                println!("{}", output::render_report(report, format)?);
            }
            Err(err.into())
        }
    }
}
