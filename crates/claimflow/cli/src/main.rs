//! claimflow CLI - inspect workflow templates and evaluate progress
//!
//! This CLI gives operators a terminal view of the workflow engine:
//! - List and inspect registered templates
//! - Evaluate progress for a set of completed steps
//! - Query a single step's status
//! - Validate catalog files before deploying them

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;

use claimflow_engine::{InstanceManager, TemplateRegistry};
use commands::{progress, template, validate};
use config::CliConfig;
use error::{CliError, CliResult};
use output::{print_error, print_warning, OutputFormat};

/// claimflow CLI application
#[derive(Parser)]
#[command(name = "claimflow")]
#[command(about = "claimflow - healthcare claims workflow progression", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "CLAIMFLOW_CONFIG")]
    config: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, global = true)]
    output: Option<OutputFormat>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Skip the built-in template catalog
    #[arg(long, global = true)]
    no_builtin: bool,

    /// Extra catalog file to load (repeatable)
    #[arg(long = "catalog", global = true, value_name = "FILE")]
    catalogs: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// List registered templates
    Templates,

    /// Show a template's steps
    Show {
        /// Template ID
        template_id: String,
    },

    /// Evaluate progress for a set of completed steps
    Progress {
        /// Template ID
        template_id: String,

        /// Completed step IDs, applied in order
        #[arg(long, value_delimiter = ',')]
        completed: Vec<String>,
    },

    /// Report one step's status
    Status {
        /// Template ID
        template_id: String,

        /// Step ID
        step_id: String,

        /// Completed step IDs, applied in order
        #[arg(long, value_delimiter = ',')]
        completed: Vec<String>,
    },

    /// Validate a catalog file
    Validate {
        /// TOML catalog file
        file: PathBuf,
    },

    /// Show configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries command output
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = run(cli) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let mut config = CliConfig::load(cli.config.as_deref())?;
    if cli.no_builtin {
        config.engine.include_builtin_catalog = false;
    }
    config.engine.catalog_paths.extend(cli.catalogs);
    let format = cli.output.or(config.default_output).unwrap_or_default();

    match cli.command {
        Commands::Validate { file } => validate::validate(&file, format),
        Commands::Config => match format {
            OutputFormat::Json => output::print_single(&config),
            OutputFormat::Table => {
                let rendered =
                    toml::to_string_pretty(&config).map_err(|e| CliError::Config(e.to_string()))?;
                print!("{}", rendered);
                Ok(())
            }
        },
        Commands::Templates => template::list(&load_registry(&config)?, format),
        Commands::Show { template_id } => {
            template::show(&load_registry(&config)?, &template_id, format)
        }
        Commands::Progress {
            template_id,
            completed,
        } => {
            let manager = InstanceManager::new(Arc::new(load_registry(&config)?));
            progress::progress(&manager, &template_id, &completed, format)
        }
        Commands::Status {
            template_id,
            step_id,
            completed,
        } => {
            let manager = InstanceManager::new(Arc::new(load_registry(&config)?));
            progress::status(&manager, &template_id, &step_id, &completed, format)
        }
    }
}

fn load_registry(config: &CliConfig) -> CliResult<TemplateRegistry> {
    let (registry, report) = TemplateRegistry::from_config(&config.engine)?;
    for (id, err) in &report.rejected {
        print_warning(&format!("Skipped template '{}': {}", id, err));
    }
    Ok(registry)
}
