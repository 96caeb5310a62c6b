//! Error types for configuration loading and validation

use thiserror::Error;

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration validation failures
///
/// The taxonomy is limited to what can go wrong in a declaration: duplicate
/// identifiers and required parameters left empty. There is no runtime
/// recovery path; all of these are load-time failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Two build types declare the same id within one project
    #[error("duplicate build type id '{0}'")]
    DuplicateBuildType(String),

    /// A parameter with `allow_empty = false` resolves to an empty value
    #[error("required parameter '{name}' has an empty value in {scope}")]
    MissingRequiredParameter {
        /// Parameter name
        name: String,
        /// Scope the empty value was observed in ("project" or a build type)
        scope: String,
    },

    /// A lookup referenced a build type id that is not declared
    #[error("unknown build type id '{0}'")]
    UnknownBuildType(String),
}

impl ConfigError {
    /// Create a missing-required-parameter error for a given scope
    pub fn missing_required(name: impl Into<String>, scope: impl Into<String>) -> Self {
        Self::MissingRequiredParameter {
            name: name.into(),
            scope: scope.into(),
        }
    }

    /// Check if this error is a duplicate-identifier failure
    pub fn is_duplicate_id(&self) -> bool {
        matches!(self, Self::DuplicateBuildType(_))
    }
}
