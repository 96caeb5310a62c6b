//! Show command handler
//!
//! Human-readable summary of a whole project declaration: header, parameter
//! table, issue trackers, and build types with their template lists and
//! overrides.

use std::path::Path;

use anyhow::Result;
use colored::*;

use crate::commands::load_script;
use crate::commands::params::print_param;

/// Print the full project summary
pub fn run(script: &Path) -> Result<()> {
    let registry = load_script(script)?;
    let project = registry.project();

    let title = project
        .name
        .as_deref()
        .or(project.id.as_deref())
        .unwrap_or("(unnamed project)");
    println!("{}", title.bold());
    if let Some(id) = &project.id {
        println!("  Id:      {}", id.cyan());
    }
    if let Some(version) = &project.version {
        println!("  Version: {}", version.dimmed());
    }
    if let Some(description) = &project.description {
        println!("  {}", description.dimmed());
    }

    if !registry.params().is_empty() {
        println!();
        println!("{}", "Parameters:".bold());
        for param in registry.params() {
            print_param(param);
        }
    }

    if !registry.trackers().is_empty() {
        println!();
        println!("{}", "Issue trackers:".bold());
        for tracker in registry.trackers() {
            println!(
                "  {} {} {}",
                tracker.display_name.cyan(),
                "->".dimmed(),
                tracker.repository_url
            );
        }
    }

    for build_type in registry.build_types() {
        println!();
        println!("{} {}", "Build type:".bold(), build_type.id.cyan());
        println!("  Name: {}", build_type.name.bold());
        if let Some(description) = &build_type.description {
            println!("  {}", description.dimmed());
        }
        if !build_type.templates.is_empty() {
            println!(
                "  Templates: {}",
                build_type
                    .templates
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
                    .dimmed()
            );
        }
        if !build_type.params.is_empty() {
            println!("  Overrides:");
            for param in &build_type.params {
                print_param(param);
            }
        }
    }

    Ok(())
}
