//! Export command handler

use std::path::Path;

use anyhow::Result;

use crate::commands::load_script;

/// Serialize the validated project to JSON on stdout
pub fn run(script: &Path, pretty: bool) -> Result<()> {
    let registry = load_script(script)?;

    let json = if pretty {
        serde_json::to_string_pretty(registry.project())?
    } else {
        serde_json::to_string(registry.project())?
    };
    println!("{}", json);

    Ok(())
}
