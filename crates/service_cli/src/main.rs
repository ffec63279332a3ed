//! ntsgarch CLI - Command Line Operations for NTS-GARCH Option Pricing
//!
//! This is the operational entry point for the NTS-GARCH pricer.
//!
//! # Commands
//!
//! - `ntsgarch price` - Price European calls and puts for one parameter set
//! - `ntsgarch study` - Run a Halton-sampled batch study with chunked CSV output
//! - `ntsgarch check` - Print the resolved configuration and worker count
//!
//! # Configuration
//!
//! Values come from defaults, then the `--config` TOML file, then `NTS_*`
//! environment variables, then command-line flags.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pricer_study::StudyConfig;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod error;

pub use error::{CliError, Result};

/// NTS-GARCH Monte Carlo option pricer
#[derive(Parser)]
#[command(name = "ntsgarch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price European options for one parameter set
    Price(commands::price::PriceArgs),

    /// Run a batch pricing study
    Study(commands::study::StudyArgs),

    /// Check configuration and runtime environment
    Check,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = StudyConfig::resolve(cli.config.as_deref())?;
    init_tracing(if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    });

    if let Some(path) = &cli.config {
        info!(path = %path.display(), "configuration loaded");
    }

    match cli.command {
        Commands::Price(args) => commands::price::run(config, &args),
        Commands::Study(args) => commands::study::run(config, &args),
        Commands::Check => commands::check::run(&config),
    }
}
