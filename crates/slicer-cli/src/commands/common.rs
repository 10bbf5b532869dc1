//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use slicer_config::{Preset, resolve_preset, set_parameter};
use slicer_engine::EngineParameters;

/// Parse a `key=value` string for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!(
            "Invalid parameter format: '{}' (expected key=value)",
            s
        )),
    }
}

/// Load a preset by factory name, user preset name or path.
pub fn load_preset(name: &str) -> anyhow::Result<Preset> {
    resolve_preset(name).with_context(|| {
        format!(
            "could not load preset '{}'. Use 'slicer presets list' to see available presets",
            name
        )
    })
}

/// Start from a preset (or the defaults) and apply `key=value` overrides.
pub fn build_parameters(
    preset: Option<&str>,
    overrides: &[(String, String)],
) -> anyhow::Result<EngineParameters> {
    let mut params = match preset {
        Some(name) => load_preset(name)?.params,
        None => EngineParameters::default(),
    };
    for (key, value) in overrides {
        set_parameter(&mut params, key, value)?;
    }
    Ok(params)
}
