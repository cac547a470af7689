//! CLI for the appcat catalog generator.

mod commands;

use anyhow::Result;
use appcat_core::config::{self, AppcatConfig};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use commands::{run_checksum, run_reconcile};

/// Top-level CLI. With no subcommand, performs one reconciliation pass.
#[derive(Debug, Parser)]
#[command(name = "appcat")]
#[command(about = "appcat: keep the application catalog in sync with upstream releases", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/appcat/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Check every tracked application upstream and update the catalog (default).
    Run(RunArgs),

    /// Compute SHA-256 and size of a file (e.g. to verify a downloaded artifact).
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Source list to read instead of the configured one.
    #[arg(long, value_name = "PATH")]
    pub sources: Option<PathBuf>,

    /// Catalog file to reconcile instead of the configured one.
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Reconcile and report without writing the catalog.
    #[arg(long)]
    pub dry_run: bool,

    /// Drop catalog entries whose application left the source list.
    #[arg(long)]
    pub prune_removed: bool,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = load_config(cli.config.as_deref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            None => run_reconcile(&cfg, &RunArgs::default())?,
            Some(CliCommand::Run(args)) => run_reconcile(&cfg, &args)?,
            Some(CliCommand::Checksum { path }) => run_checksum(&path)?,
        }

        Ok(())
    }
}

/// An explicit `--config` must load. The default location falls back to
/// built-in defaults when it cannot be created (e.g. read-only home in CI).
fn load_config(explicit: Option<&Path>) -> Result<AppcatConfig> {
    match explicit {
        Some(path) => config::load_from_path(path),
        None => Ok(config::load_or_init().unwrap_or_else(|e| {
            tracing::warn!("using default config: {:#}", e);
            AppcatConfig::default()
        })),
    }
}
