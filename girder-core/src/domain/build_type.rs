//! Build type domain types

use std::fmt;

use serde::{Deserialize, Serialize};

use super::parameter::Parameter;

/// Opaque reference to an externally defined build template
///
/// Resolution and semantics belong to the consuming CI engine; the
/// configuration only carries the absolute identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateRef(String);

impl TemplateRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named, independently triggerable build configuration
///
/// Templates are an ordered list; the external engine applies them in the
/// declared order. Parameters declared here shadow project parameters of the
/// same name for this build type only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildType {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub templates: Vec<TemplateRef>,
    #[serde(default)]
    pub params: Vec<Parameter>,
}

impl BuildType {
    /// Look up a build-type-scoped parameter by name.
    ///
    /// When the same name is declared more than once in this scope, the
    /// last declaration wins.
    pub fn param(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().rev().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_ref_is_opaque_string() {
        let template = TemplateRef::new("MinecraftForge_BuildUsingGradle");
        assert_eq!(template.as_str(), "MinecraftForge_BuildUsingGradle");
        assert_eq!(template.to_string(), "MinecraftForge_BuildUsingGradle");
    }

    #[test]
    fn test_last_declaration_wins_within_scope() {
        let build_type = BuildType {
            id: "Build".to_string(),
            name: "Build".to_string(),
            description: None,
            templates: Vec::new(),
            params: vec![
                Parameter::new("docker_jdk_version", "8"),
                Parameter::new("docker_jdk_version", "11"),
            ],
        };
        assert_eq!(build_type.param("docker_jdk_version").unwrap().value, "11");
        assert!(build_type.param("git_branch_spec").is_none());
    }
}
