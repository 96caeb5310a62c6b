//! Parameter domain types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a parameter is presented in the CI server UI.
///
/// Hidden parameters are still part of the configuration and participate in
/// the override chain; the display mode is metadata for the consuming UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterDisplay {
    #[default]
    Visible,
    Hidden,
}

impl FromStr for ParameterDisplay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visible" => Ok(ParameterDisplay::Visible),
            "hidden" => Ok(ParameterDisplay::Hidden),
            other => Err(format!(
                "unknown display mode '{}' (expected 'visible' or 'hidden')",
                other
            )),
        }
    }
}

impl fmt::Display for ParameterDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterDisplay::Visible => write!(f, "visible"),
            ParameterDisplay::Hidden => write!(f, "hidden"),
        }
    }
}

/// A named configuration parameter
///
/// Declared either at project scope or inside a single build type. A
/// build-type declaration shadows the project declaration of the same name
/// for that build type only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    /// Default value handed to the CI engine when nothing overrides it.
    pub value: String,
    pub label: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub display: ParameterDisplay,
    #[serde(default = "default_allow_empty")]
    pub allow_empty: bool,
}

fn default_allow_empty() -> bool {
    true
}

impl Parameter {
    /// Create a parameter with no UI metadata, visible, allowing empty.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            label: None,
            description: None,
            display: ParameterDisplay::Visible,
            allow_empty: true,
        }
    }

    /// Whether the declaration satisfies its own emptiness constraint.
    pub fn is_satisfied(&self) -> bool {
        self.allow_empty || !self.value.is_empty()
    }
}
