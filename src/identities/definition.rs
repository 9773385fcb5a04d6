//! Identity Definition Types
//!
//! YAML schema for named notation presets.

use serde::{Deserialize, Serialize};

use crate::notation::Params;

/// A named notation preset
///
/// In YAML files the name is the map key:
///
/// ```yaml
/// Circle/Sphere:
///   expr: sum(Dim^2) = r^2
///   params: { r: 5 }
///   description: Circle (2D) or Sphere (3D)
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityDefinition {
    /// Display name (filled from the YAML map key)
    #[serde(skip)]
    pub name: String,

    /// Notation template
    #[serde(rename = "expr")]
    pub notation: String,

    /// Default parameter values
    #[serde(default)]
    pub params: Params,

    #[serde(default)]
    pub description: String,

    /// Smallest dimension the notation makes sense in
    #[serde(default = "default_min_dim")]
    pub min_dim: usize,
}

fn default_min_dim() -> usize {
    1
}

impl IdentityDefinition {
    pub fn new(name: impl Into<String>, notation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            notation: notation.into(),
            params: Params::new(),
            description: String::new(),
            min_dim: default_min_dim(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: f64) -> Self {
        self.params.insert(name, value);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_min_dim(mut self, min_dim: usize) -> Self {
        self.min_dim = min_dim;
        self
    }

    /// Check if the identity can be expanded in `dimension`
    pub fn supports(&self, dimension: usize) -> bool {
        dimension >= self.min_dim
    }

    /// Defaults merged with caller overrides (overrides win)
    pub fn merged_params(&self, overrides: &Params) -> Params {
        self.params.merged(overrides)
    }
}
