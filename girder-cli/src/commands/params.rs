//! Params command handler
//!
//! Prints a parameter set: either the project scope as declared, or the
//! effective set for one build type with the override chain applied.

use std::path::Path;

use anyhow::Result;
use colored::*;
use girder_core::{Parameter, ParameterDisplay};

use crate::commands::load_script;

/// Print the requested parameter set
pub fn run(script: &Path, build_type: Option<&str>) -> Result<()> {
    let registry = load_script(script)?;

    match build_type {
        Some(id) => {
            let effective = registry.effective_params(id)?;
            println!(
                "{}",
                format!("Effective parameters for build type '{}':", id).bold()
            );
            for param in effective {
                print_param(param);
            }
        }
        None => {
            println!("{}", "Project parameters:".bold());
            for param in registry.params() {
                print_param(param);
            }
        }
    }

    Ok(())
}

pub(crate) fn print_param(param: &Parameter) {
    let required = if param.allow_empty { "" } else { "*" };
    let hidden = if param.display == ParameterDisplay::Hidden {
        " (hidden)"
    } else {
        ""
    };
    println!(
        "  {}{} = {:?}{}",
        param.name.cyan(),
        required.red(),
        param.value,
        hidden.dimmed()
    );
}
