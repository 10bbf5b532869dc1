//! Engine construction errors.
//!
//! Rendering never fails; only an invalid [`EngineConfig`](crate::EngineConfig)
//! is reported.

use thiserror::Error;

/// Invalid engine configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A numeric setting is outside its allowed range or not finite.
    #[error("{name} = {value} is outside {min}..={max}")]
    OutOfRange {
        /// Setting name.
        name: &'static str,
        /// Offending value.
        value: f32,
        /// Smallest allowed value.
        min: f32,
        /// Largest allowed value.
        max: f32,
    },

    /// EQ corner at or above Nyquist.
    #[error("{band} EQ frequency {hz} Hz must be below Nyquist ({nyquist} Hz)")]
    EqAboveNyquist {
        /// Band name.
        band: &'static str,
        /// Requested corner.
        hz: f32,
        /// Half the sample rate.
        nyquist: f32,
    },

    /// Delay buffer too small or too large.
    #[error("delay capacity {0} samples is outside 2..={max}", max = crate::config::MAX_DELAY_CAPACITY)]
    DelayCapacity(usize),
}

impl EngineError {
    /// Create an out-of-range error.
    pub fn out_of_range(name: &'static str, value: f32, min: f32, max: f32) -> Self {
        EngineError::OutOfRange {
            name,
            value,
            min,
            max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_setting() {
        let msg = EngineError::out_of_range("sample_rate", 10.0, 8000.0, 384000.0).to_string();
        assert!(msg.contains("sample_rate"), "got: {msg}");
        assert!(msg.contains("8000"), "got: {msg}");
    }

    #[test]
    fn delay_capacity_display() {
        let msg = EngineError::DelayCapacity(1).to_string();
        assert!(msg.contains("delay capacity 1"), "got: {msg}");
    }
}
