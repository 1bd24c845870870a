//! Activation CLI - resolve module activations from a manifest
//!
//! This CLI lets operators and developers:
//! - Resolve a manifest's modules and built-in families into an activation report
//! - Inspect the evaluation order the resolver would use
//! - Show the effective engine configuration

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod manifest;
mod output;

use commands::{order, resolve, SourceArgs};
pub use config::CliConfig;
pub use error::{CliError, CliResult};
pub use manifest::Manifest;
pub use output::OutputFormat;

/// Activation CLI application
#[derive(Parser)]
#[command(name = "activation")]
#[command(about = "Resolve conditional module activations", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ACTIVATION_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text", global = true)]
    output: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Resolve activations and print the report
    Resolve {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print the evaluation order
    Order {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Show configuration
    Config,
}

/// Run using the current process arguments.
pub fn run() -> CliResult<()> {
    run_with_args(std::env::args_os())
}

/// Run using the provided argument iterator.
pub fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    // Logs go to stderr so reports on stdout stay machine-readable
    let filter = if cli.verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();

    let config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Resolve { source } => resolve::execute(&source, &config, cli.output),
        Commands::Order { source } => order::execute(&source, &config, cli.output),
        Commands::Config => {
            println!("{}", output::render_value(&config, cli.output)?);
            Ok(())
        }
    }
}
