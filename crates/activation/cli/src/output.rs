//! Output formatting utilities

use activation_types::ActivationReport;
use colored::*;
use serde::Serialize;
use tabled::{Table, Tabled};

use crate::error::CliResult;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Render rows as a table, or serialize them
pub fn render_rows<T: Serialize + Tabled>(rows: &[T], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Text if rows.is_empty() => Ok("No results".dimmed().to_string()),
        OutputFormat::Text => Ok(Table::new(rows).to_string()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(rows)?),
    }
}

/// Render a single value; text falls back to YAML
pub fn render_value<T: Serialize>(value: &T, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Text | OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
    }
}

/// Render an activation report
pub fn render_report(report: &ActivationReport, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Text => Ok(report.to_string()),
        _ => render_value(report, format),
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}
