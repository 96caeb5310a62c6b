//! Project registry
//!
//! The validated, indexed, read-only view over a declared [`Project`]. This
//! is what an external CI engine would consume: it is built once at load
//! time, never mutated, and answers parameter-resolution queries with the
//! override chain applied (build-type declarations shadow project defaults).

use std::collections::{HashMap, HashSet};

use crate::domain::build_type::BuildType;
use crate::domain::parameter::Parameter;
use crate::domain::project::{IssueTracker, Project};
use crate::error::{ConfigError, Result};

/// Validated registry over a single declared project
#[derive(Debug, Clone)]
pub struct ProjectRegistry {
    project: Project,
    build_type_index: HashMap<String, usize>,
}

impl ProjectRegistry {
    /// Build a registry from a declared project
    ///
    /// Validation enforced here:
    /// - build type ids are unique across the project
    /// - every parameter with `allow_empty = false` resolves to a non-empty
    ///   value in every build type's effective set (a build-type override
    ///   can satisfy the constraint for a project declaration, and vice
    ///   versa can only be declared empty if it allows emptiness itself)
    ///
    /// # Errors
    /// Returns [`ConfigError::DuplicateBuildType`] or
    /// [`ConfigError::MissingRequiredParameter`].
    pub fn new(project: Project) -> Result<Self> {
        let mut build_type_index = HashMap::new();
        for (idx, build_type) in project.build_types.iter().enumerate() {
            if build_type_index
                .insert(build_type.id.clone(), idx)
                .is_some()
            {
                return Err(ConfigError::DuplicateBuildType(build_type.id.clone()));
            }
        }

        if project.build_types.is_empty() {
            // No build types to resolve against: the project scope itself
            // must satisfy the emptiness constraints.
            for param in dedup_last_wins(&project.params) {
                if !param.is_satisfied() {
                    return Err(ConfigError::missing_required(&param.name, "project"));
                }
            }
        } else {
            for build_type in &project.build_types {
                for param in resolve(&project.params, build_type) {
                    if !param.is_satisfied() {
                        return Err(ConfigError::missing_required(
                            &param.name,
                            format!("build type '{}'", build_type.id),
                        ));
                    }
                }
            }
        }

        tracing::debug!(
            build_types = project.build_types.len(),
            params = project.params.len(),
            trackers = project.trackers.len(),
            "project registry validated"
        );

        Ok(Self {
            project,
            build_type_index,
        })
    }

    /// The underlying declared project
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Project-scoped parameters in declaration order
    pub fn params(&self) -> &[Parameter] {
        &self.project.params
    }

    /// Declared issue trackers
    pub fn trackers(&self) -> &[IssueTracker] {
        &self.project.trackers
    }

    /// Declared build types in declaration order
    pub fn build_types(&self) -> &[BuildType] {
        &self.project.build_types
    }

    /// Look up a build type by id
    pub fn build_type(&self, id: &str) -> Option<&BuildType> {
        self.build_type_index
            .get(id)
            .map(|&idx| &self.project.build_types[idx])
    }

    /// The effective parameter set for one build type
    ///
    /// Project parameters in declaration order with build-type overrides
    /// substituted in place, followed by parameters declared only on the
    /// build type. Within one scope, the last declaration of a name wins.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownBuildType`] if the id is not declared.
    pub fn effective_params(&self, build_type_id: &str) -> Result<Vec<&Parameter>> {
        let build_type = self
            .build_type(build_type_id)
            .ok_or_else(|| ConfigError::UnknownBuildType(build_type_id.to_string()))?;
        Ok(resolve(&self.project.params, build_type))
    }
}

/// Collapse repeated names within one scope, keeping declaration order of
/// first appearance and the value of the last declaration.
fn dedup_last_wins(params: &[Parameter]) -> Vec<&Parameter> {
    let mut order: Vec<&str> = Vec::new();
    let mut chosen: HashMap<&str, &Parameter> = HashMap::new();
    for param in params {
        if !chosen.contains_key(param.name.as_str()) {
            order.push(&param.name);
        }
        chosen.insert(&param.name, param);
    }
    order.into_iter().map(|name| chosen[name]).collect()
}

/// Apply the override chain for one build type: build-type scope shadows
/// project scope, build-type-only parameters are appended in order.
fn resolve<'a>(project_params: &'a [Parameter], build_type: &'a BuildType) -> Vec<&'a Parameter> {
    let base = dedup_last_wins(project_params);
    let overrides = dedup_last_wins(&build_type.params);

    let mut shadowed: HashSet<&str> = HashSet::new();
    let mut effective = Vec::with_capacity(base.len() + overrides.len());

    for param in base {
        match overrides.iter().find(|o| o.name == param.name) {
            Some(over) => {
                shadowed.insert(over.name.as_str());
                effective.push(*over);
            }
            None => effective.push(param),
        }
    }
    for over in overrides {
        if !shadowed.contains(over.name.as_str()) {
            effective.push(over);
        }
    }

    effective
}
