//! Parameter and preset validation.
//!
//! The engine clamps anything it is handed. Presets are held to a stricter
//! standard: a stored value outside its range is reported instead of being
//! silently pulled back in.
//!
//! # Example
//!
//! ```rust
//! use slicer_config::{parse_param_value, set_parameter, validate_parameters};
//! use slicer_engine::EngineParameters;
//!
//! let mut params = EngineParameters::default();
//! set_parameter(&mut params, "delay-time-l", "375ms").unwrap();
//! assert!((params.delay_time_l - 0.375).abs() < 1e-6);
//!
//! assert_eq!(parse_param_value("mix", "50%").unwrap(), 0.5);
//! assert!(validate_parameters(&params).is_ok());
//! ```

use slicer_engine::{EngineParameters, MAX_VOICES, PARAM_RANGES};
use thiserror::Error;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Unknown parameter name.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter.
        param: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Invalid parameter format.
    #[error("invalid format for parameter '{param}': {reason}")]
    InvalidFormat {
        /// Name of the parameter.
        param: String,
        /// Description of the format error.
        reason: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Normalize a parameter name for lookup: lowercase, with spaces and
/// dashes turned into underscores.
fn normalize_param_name(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}

fn parse_number(param_name: &str, text: &str) -> ValidationResult<f32> {
    let text = text.trim();
    match text.parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ValidationError::InvalidFormat {
            param: param_name.to_string(),
            reason: format!("cannot parse '{}' as number", text),
        }),
    }
}

/// Parse a parameter value from a string.
///
/// Supports:
/// - Plain numbers: "0.5", "-6", "0.25"
/// - Decibels: "6dB", "-3db" (taken as is)
/// - Milliseconds: "375ms" (converted to seconds)
/// - Seconds: "0.5s"
/// - Percentages: "50%" (converted to 0-1)
pub fn parse_param_value(param_name: &str, value_str: &str) -> ValidationResult<f32> {
    let s = value_str.trim();

    if let Some(v) = s.strip_suffix("dB").or_else(|| s.strip_suffix("db")) {
        parse_number(param_name, v)
    } else if let Some(v) = s.strip_suffix("ms") {
        Ok(parse_number(param_name, v)? / 1000.0)
    } else if let Some(v) = s.strip_suffix('s') {
        parse_number(param_name, v)
    } else if let Some(v) = s.strip_suffix('%') {
        Ok(parse_number(param_name, v)? / 100.0)
    } else {
        parse_number(param_name, s)
    }
}

fn parse_bool(param_name: &str, value_str: &str) -> ValidationResult<bool> {
    match value_str.trim().to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => Err(ValidationError::InvalidFormat {
            param: param_name.to_string(),
            reason: format!("expected on/off, got '{}'", other),
        }),
    }
}

/// Check one continuous value against its range.
pub fn validate_param_value(param_name: &str, value: f32) -> ValidationResult<()> {
    let name = normalize_param_name(param_name);
    let &(_, min, max) = PARAM_RANGES
        .iter()
        .find(|(n, _, _)| *n == name)
        .ok_or_else(|| ValidationError::UnknownParameter(param_name.to_string()))?;
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            param: name,
            value,
            min,
            max,
        })
    }
}

fn validate_voices(voices: usize) -> ValidationResult<()> {
    if (1..=MAX_VOICES).contains(&voices) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            param: "voices".to_string(),
            value: voices as f32,
            min: 1.0,
            max: MAX_VOICES as f32,
        })
    }
}

/// Set one parameter by name from its textual form.
///
/// The value is checked before it is stored; on error `params` is left
/// unchanged.
pub fn set_parameter(
    params: &mut EngineParameters,
    param_name: &str,
    value_str: &str,
) -> ValidationResult<()> {
    let name = normalize_param_name(param_name);
    match name.as_str() {
        "recording" => params.recording = parse_bool(&name, value_str)?,
        "looping" => params.looping = parse_bool(&name, value_str)?,
        "voices" => {
            let voices = value_str
                .trim()
                .parse::<usize>()
                .map_err(|_| ValidationError::InvalidFormat {
                    param: name.clone(),
                    reason: format!("cannot parse '{}' as a voice count", value_str.trim()),
                })?;
            validate_voices(voices)?;
            params.voices = voices;
        }
        _ => {
            let value = parse_param_value(&name, value_str)?;
            validate_param_value(&name, value)?;
            let slot = match name.as_str() {
                "min_slice_time" => &mut params.min_slice_time,
                "scan" => &mut params.scan,
                "mix" => &mut params.mix,
                "feedback" => &mut params.feedback,
                "speed" => &mut params.speed,
                "eq_low_db" => &mut params.eq_low_db,
                "eq_mid_db" => &mut params.eq_mid_db,
                "eq_high_db" => &mut params.eq_high_db,
                "delay_time_l" => &mut params.delay_time_l,
                "delay_time_r" => &mut params.delay_time_r,
                "delay_feedback" => &mut params.delay_feedback,
                "delay_wet" => &mut params.delay_wet,
                "reverb_room" => &mut params.reverb_room,
                "reverb_damping" => &mut params.reverb_damping,
                "reverb_decay" => &mut params.reverb_decay,
                "reverb_wet" => &mut params.reverb_wet,
                _ => return Err(ValidationError::UnknownParameter(param_name.to_string())),
            };
            *slot = value;
        }
    }
    Ok(())
}

/// Check every value of a parameter set, collecting all failures.
pub fn validate_parameters(params: &EngineParameters) -> ValidationResult<()> {
    let mut errors: Vec<ValidationError> = params
        .values()
        .iter()
        .filter_map(|&(name, value)| validate_param_value(name, value).err())
        .collect();
    if let Err(e) = validate_voices(params.voices) {
        errors.push(e);
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.swap_remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

/// Validate a preset's parameter set.
pub fn validate_preset(preset: &crate::Preset) -> ValidationResult<()> {
    validate_parameters(&preset.params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_units() {
        assert_eq!(parse_param_value("eq_low_db", "-6dB").unwrap(), -6.0);
        assert_eq!(parse_param_value("eq_low_db", "3 db").unwrap(), 3.0);
        assert!((parse_param_value("delay_time_l", "250ms").unwrap() - 0.25).abs() < 1e-6);
        assert_eq!(parse_param_value("delay_time_l", "1.5s").unwrap(), 1.5);
        assert_eq!(parse_param_value("mix", "75%").unwrap(), 0.75);
        assert_eq!(parse_param_value("speed", " -2 ").unwrap(), -2.0);
    }

    #[test]
    fn parse_rejects_garbage() {
        for text in ["", "abc", "NaN", "inf", "12dBx"] {
            assert!(
                matches!(
                    parse_param_value("mix", text),
                    Err(ValidationError::InvalidFormat { .. })
                ),
                "{text:?} should not parse"
            );
        }
    }

    #[test]
    fn set_parameter_by_any_spelling() {
        let mut params = EngineParameters::default();
        set_parameter(&mut params, "Reverb Wet", "0.4").unwrap();
        set_parameter(&mut params, "eq-mid-db", "-12dB").unwrap();
        set_parameter(&mut params, "voices", "6").unwrap();
        set_parameter(&mut params, "looping", "off").unwrap();
        assert_eq!(params.reverb_wet, 0.4);
        assert_eq!(params.eq_mid_db, -12.0);
        assert_eq!(params.voices, 6);
        assert!(!params.looping);
    }

    #[test]
    fn set_parameter_leaves_params_on_error() {
        let mut params = EngineParameters::default();
        let before = params;
        assert!(matches!(
            set_parameter(&mut params, "feedback", "0.99"),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            set_parameter(&mut params, "voices", "9"),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            set_parameter(&mut params, "wobble", "1"),
            Err(ValidationError::UnknownParameter(_))
        ));
        assert!(matches!(
            set_parameter(&mut params, "recording", "maybe"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert_eq!(params, before);
    }

    #[test]
    fn defaults_validate() {
        assert!(validate_parameters(&EngineParameters::default()).is_ok());
    }

    #[test]
    fn collects_every_failure() {
        let params = EngineParameters {
            mix: 1.5,
            speed: f32::NAN,
            voices: 0,
            ..EngineParameters::default()
        };
        match validate_parameters(&params) {
            Err(ValidationError::Multiple(errors)) => {
                assert_eq!(errors.len(), 3);
                let text = ValidationError::Multiple(errors).to_string();
                assert!(text.contains("mix"));
                assert!(text.contains("speed"));
                assert!(text.contains("voices"));
            }
            other => panic!("expected multiple errors, got {other:?}"),
        }
    }

    #[test]
    fn single_failure_is_not_wrapped() {
        let params = EngineParameters {
            delay_time_r: 5.0,
            ..EngineParameters::default()
        };
        assert!(matches!(
            validate_parameters(&params),
            Err(ValidationError::OutOfRange { ref param, .. }) if param == "delay_time_r"
        ));
    }
}
