//! Presets, session files and validation for the slicer engine.
//!
//! # Features
//!
//! - **Presets**: named [`EngineParameters`](slicer_engine::EngineParameters) sets stored as TOML
//! - **Sessions**: engine construction settings plus a starting preset
//! - **Validation**: strict range checks and textual parameter parsing
//! - **Paths**: platform-specific user directories
//! - **Factory Presets**: built-in presets that need no files
//!
//! # Example
//!
//! ```rust,no_run
//! use slicer_config::{Preset, set_parameter, user_presets_dir, validate_preset};
//!
//! let mut preset = Preset::new("Shimmer").with_description("Bright and wide");
//! set_parameter(&mut preset.params, "voices", "5").unwrap();
//! set_parameter(&mut preset.params, "reverb_wet", "60%").unwrap();
//! validate_preset(&preset).unwrap();
//!
//! preset.save(user_presets_dir().join("shimmer.toml")).unwrap();
//! ```

mod error;
mod preset;
mod session;

/// Platform-specific paths for presets and session files.
pub mod paths;

/// Parameter and preset validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

use std::path::Path;

pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_preset_names, factory_presets, get_factory_preset,
    is_factory_preset,
};
pub use paths::{
    default_session_path, ensure_user_presets_dir, find_preset, find_preset_in,
    list_presets_in_dir, list_user_presets, preset_name_from_path, user_config_dir,
    user_presets_dir,
};
pub use preset::Preset;
pub use session::SessionConfig;
pub use validation::{
    ValidationError, ValidationResult, parse_param_value, set_parameter, validate_param_value,
    validate_parameters, validate_preset,
};

/// Resolve a preset by name: factory presets first, then files.
///
/// File presets are validated; factory presets are known good.
pub fn resolve_preset(name: &str) -> Result<Preset, ConfigError> {
    if let Some(preset) = get_factory_preset(name) {
        return Ok(preset);
    }
    let path = find_preset(name).ok_or_else(|| ConfigError::PresetNotFound(name.to_string()))?;
    let preset = Preset::load(path)?;
    validate_preset(&preset)?;
    Ok(preset)
}

fn write_toml(path: &Path, content: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))
}
