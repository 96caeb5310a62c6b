//! Project domain types

use serde::{Deserialize, Serialize};

use super::build_type::BuildType;
use super::parameter::Parameter;

/// Issue tracker linkage declared on the project
///
/// Static metadata only; the CI engine owns the integration itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueTracker {
    pub id: String,
    pub display_name: String,
    pub repository_url: String,
}

/// A declared CI project
///
/// The top-level entity of a configuration script: parameters, feature
/// integrations, and build types. Exactly one project is declared per
/// script; everything is read-only once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    /// DSL schema version carried from the declaration, if any.
    pub version: Option<String>,
    #[serde(default)]
    pub params: Vec<Parameter>,
    #[serde(default)]
    pub trackers: Vec<IssueTracker>,
    #[serde(default)]
    pub build_types: Vec<BuildType>,
}

impl Project {
    /// Look up a project-scoped parameter by name (last declaration wins).
    pub fn param(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().rev().find(|p| p.name == name)
    }

    /// Look up a build type by id.
    pub fn build_type(&self, id: &str) -> Option<&BuildType> {
        self.build_types.iter().find(|b| b.id == id)
    }
}
