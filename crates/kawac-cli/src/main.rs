//! kawac CLI - mixed Kawa/Java build driver.

mod build;
mod colors;
mod doctor;
mod map;
mod workspace;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kawac_core::AmbientSettings;

#[derive(Parser)]
#[command(name = "kawac")]
#[command(about = "Build mixed Kawa/Java modules")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (also turns on strict Kawa diagnostics by default)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit debug symbols unless a module says otherwise
    #[arg(long, global = true)]
    debug: bool,

    /// Print the compiler commands instead of running them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Path to kawac.toml (default: nearest one in the current directory or its parents)
    #[arg(short, long, global = true)]
    manifest: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile modules in dependency order
    Build {
        /// Build only this module (and the modules it depends on)
        #[arg(long)]
        module: Option<String>,
    },

    /// Show the predicted class file for every source
    Map {
        /// Map only this module
        #[arg(long)]
        module: Option<String>,

        /// Print the mapping as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check the Kawa and Java toolchains
    Doctor,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Helper to format kawac-core errors with recovery hints
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(kawac_err) = err.downcast_ref::<kawac_core::Error>() {
            anyhow::anyhow!("{}", kawac_err.with_hint())
        } else {
            err
        }
    };

    let ambient = AmbientSettings {
        dry_run: cli.dry_run,
        verbose: cli.verbose,
        debug: cli.debug,
    };
    let manifest = cli.manifest.as_deref();

    match cli.command {
        Commands::Build { module } => {
            build::execute(manifest, module.as_deref(), &ambient).map_err(format_error)?;
        }

        Commands::Map { module, json } => {
            map::execute(manifest, module.as_deref(), json).map_err(format_error)?;
        }

        Commands::Doctor => doctor::execute().map_err(format_error)?,
    }

    Ok(())
}
