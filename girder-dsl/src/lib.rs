//! Girder DSL
//!
//! Loader for the Girder project-configuration DSL. A configuration is a Lua
//! script that returns a single project table; this crate provides:
//! - A restricted sandbox the script is evaluated in (no io, os, require)
//! - A `project` helper module available to scripts
//! - A parser that turns the evaluated table into [`girder_core::Project`]
//!   and a loader that validates it into a [`girder_core::ProjectRegistry`]

pub mod parser;
pub mod sandbox;

pub use parser::{load_registry, parse_project};
pub use sandbox::create_sandbox;

pub use girder_core::{Project, ProjectRegistry};
