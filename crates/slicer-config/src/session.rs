//! Session files: engine construction settings plus a starting preset.

use serde::{Deserialize, Serialize};
use slicer_engine::EngineConfig;
use std::path::Path;

use crate::error::ConfigError;

/// Everything needed to bring an engine up.
///
/// ```toml
/// preset = "drift"
///
/// [engine]
/// sample_rate = 44100.0
/// loop_seconds = 30.0
/// seed = 7
/// pan_mode = "fixed"
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Construction settings.
    pub engine: EngineConfig,
    /// Preset name or path to load at start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
}

impl SessionConfig {
    /// Load and validate a session file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse and validate a session from TOML text.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let session: Self = toml::from_str(toml_str)?;
        session.engine.validate()?;
        Ok(session)
    }

    /// Save the session to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        crate::write_toml(path.as_ref(), &self.to_toml()?)
    }

    /// Convert the session to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
