//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod export;
mod params;
mod show;
mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use girder_core::ProjectRegistry;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Validate a project declaration script
    Validate {
        /// Path to the declaration script
        script: PathBuf,
    },
    /// Show a human-readable summary of a project declaration
    Show {
        /// Path to the declaration script
        script: PathBuf,
    },
    /// Print the effective parameter set
    Params {
        /// Path to the declaration script
        script: PathBuf,

        /// Resolve parameters for one build type instead of project scope
        #[arg(short, long)]
        build_type: Option<String>,
    },
    /// Export the validated project as JSON
    Export {
        /// Path to the declaration script
        script: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Validate { script } => validate::run(&script),
        Commands::Show { script } => show::run(&script),
        Commands::Params { script, build_type } => params::run(&script, build_type.as_deref()),
        Commands::Export { script, pretty } => export::run(&script, pretty),
    }
}

/// Read a declaration script and load it into a validated registry
pub(crate) fn load_script(script: &Path) -> Result<ProjectRegistry> {
    let source = std::fs::read_to_string(script)
        .with_context(|| format!("Failed to read script file: {}", script.display()))?;

    girder_dsl::load_registry(&source)
        .with_context(|| format!("Failed to load project declaration: {}", script.display()))
}
