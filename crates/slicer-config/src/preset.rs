//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use slicer_engine::EngineParameters;
use std::path::Path;

use crate::error::ConfigError;

/// A named parameter set.
///
/// # TOML Format
///
/// ```toml
/// name = "Drift"
/// description = "Slow scattered voices in a long room"
///
/// [params]
/// voices = 6
/// speed = 0.5
/// reverb_wet = 0.6
/// ```
///
/// Any parameter left out takes its default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Parameter values applied when the preset loads.
    #[serde(default)]
    pub params: EngineParameters,
}

impl Preset {
    /// Create a preset holding the default parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            params: EngineParameters::default(),
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the parameter set.
    pub fn with_params(mut self, params: EngineParameters) -> Self {
        self.params = params;
        self
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        crate::write_toml(path.as_ref(), &self.to_toml()?)
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
