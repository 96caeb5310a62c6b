//! Validate command handler

use std::path::Path;

use anyhow::Result;
use colored::*;

use crate::commands::load_script;

/// Load and validate a declaration, printing a short summary on success
///
/// A failed load propagates as an error, so the process exits non-zero.
pub fn run(script: &Path) -> Result<()> {
    let registry = load_script(script)?;

    println!(
        "{}",
        format!("✓ {} is a valid project declaration", script.display())
            .green()
            .bold()
    );
    println!(
        "  Build types: {}",
        registry.build_types().len().to_string().cyan()
    );
    println!(
        "  Parameters:  {}",
        registry.params().len().to_string().cyan()
    );
    println!(
        "  Trackers:    {}",
        registry.trackers().len().to_string().cyan()
    );

    Ok(())
}
