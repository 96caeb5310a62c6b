//! Girder Core
//!
//! Core types for the Girder CI configuration toolkit.
//!
//! This crate contains:
//! - Domain types: the declared configuration entities (Project, Parameter,
//!   BuildType, TemplateRef, IssueTracker)
//! - Registry: the validated, read-only view an external CI engine consumes

pub mod domain;
pub mod error;
pub mod registry;

pub use domain::build_type::{BuildType, TemplateRef};
pub use domain::parameter::{Parameter, ParameterDisplay};
pub use domain::project::{IssueTracker, Project};
pub use error::{ConfigError, Result};
pub use registry::ProjectRegistry;
