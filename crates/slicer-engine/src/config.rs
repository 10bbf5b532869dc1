//! Construction-time engine settings.
//!
//! Everything fixed for the lifetime of an [`Engine`](crate::Engine):
//! buffer sizes, the sample rate, the RNG seed and the voice layout.
//! Live-tunable values live in [`EngineParameters`](crate::EngineParameters).

use serde::{Deserialize, Serialize};
use slicer_effects::{DEFAULT_DELAY_CAPACITY, EqFrequencies};

use crate::error::EngineError;
use crate::slice::DEFAULT_ONSET_THRESHOLD;
use crate::voice::{DEFAULT_VOICE_SPEED_RANGE, MAX_VOICE_SPEED, PanMode};

/// Lowest supported sample rate.
pub const MIN_SAMPLE_RATE: f32 = 8000.0;

/// Highest supported sample rate.
pub const MAX_SAMPLE_RATE: f32 = 384_000.0;

/// Longest loop buffer in seconds.
pub const MAX_LOOP_SECONDS: f32 = 600.0;

/// Largest delay buffer per channel.
pub const MAX_DELAY_CAPACITY: usize = 10_000_000;

/// EQ corner frequencies in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EqBands {
    /// Low shelf corner.
    pub low_hz: f32,
    /// Mid peak center.
    pub mid_hz: f32,
    /// High shelf corner.
    pub high_hz: f32,
}

impl Default for EqBands {
    fn default() -> Self {
        let f = EqFrequencies::default();
        Self {
            low_hz: f.low_hz,
            mid_hz: f.mid_hz,
            high_hz: f.high_hz,
        }
    }
}

impl From<EqBands> for EqFrequencies {
    fn from(bands: EqBands) -> Self {
        EqFrequencies {
            low_hz: bands.low_hz,
            mid_hz: bands.mid_hz,
            high_hz: bands.high_hz,
        }
    }
}

/// Engine construction settings.
///
/// # Example
///
/// ```rust
/// use slicer_engine::EngineConfig;
///
/// let config = EngineConfig {
///     sample_rate: 44100.0,
///     loop_seconds: 10.0,
///     seed: Some(1),
///     ..EngineConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// assert_eq!(config.loop_capacity(), 441_000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// Loop buffer length in seconds.
    pub loop_seconds: f32,
    /// Voice RNG seed. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Stereo placement of voices.
    pub pan_mode: PanMode,
    /// Secondary voice speed multipliers are drawn from `±voice_speed_range`.
    pub voice_speed_range: f32,
    /// Onset threshold on `|x|`.
    pub onset_threshold: f32,
    /// Output is clamped to `±output_limit`.
    pub output_limit: f32,
    /// EQ corner frequencies.
    pub eq: EqBands,
    /// Delay buffer per channel in samples.
    pub delay_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000.0,
            loop_seconds: 60.0,
            seed: None,
            pan_mode: PanMode::Alternate,
            voice_speed_range: DEFAULT_VOICE_SPEED_RANGE,
            onset_threshold: DEFAULT_ONSET_THRESHOLD,
            output_limit: 10.0,
            eq: EqBands::default(),
            delay_capacity: DEFAULT_DELAY_CAPACITY,
        }
    }
}

fn check(name: &'static str, value: f32, min: f32, max: f32) -> Result<(), EngineError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::out_of_range(name, value, min, max))
    }
}

impl EngineConfig {
    /// Check every setting.
    pub fn validate(&self) -> Result<(), EngineError> {
        check("sample_rate", self.sample_rate, MIN_SAMPLE_RATE, MAX_SAMPLE_RATE)?;
        check(
            "loop_seconds",
            self.loop_seconds,
            1.0 / self.sample_rate,
            MAX_LOOP_SECONDS,
        )?;
        check(
            "voice_speed_range",
            self.voice_speed_range,
            f32::MIN_POSITIVE,
            MAX_VOICE_SPEED,
        )?;
        check("onset_threshold", self.onset_threshold, f32::MIN_POSITIVE, 100.0)?;
        check("output_limit", self.output_limit, f32::MIN_POSITIVE, 1000.0)?;

        let nyquist = self.sample_rate / 2.0;
        for (band, hz) in [
            ("low", self.eq.low_hz),
            ("mid", self.eq.mid_hz),
            ("high", self.eq.high_hz),
        ] {
            check("eq frequency", hz, 1.0, f32::MAX)?;
            if hz >= nyquist {
                return Err(EngineError::EqAboveNyquist { band, hz, nyquist });
            }
        }

        if !(2..=MAX_DELAY_CAPACITY).contains(&self.delay_capacity) {
            return Err(EngineError::DelayCapacity(self.delay_capacity));
        }
        Ok(())
    }

    /// Loop buffer length in samples.
    pub fn loop_capacity(&self) -> usize {
        ((self.loop_seconds * self.sample_rate).round() as usize).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.loop_capacity(), 2_880_000);
        assert_eq!(config.delay_capacity, 96_000);
    }

    #[test]
    fn rejects_bad_sample_rate() {
        for rate in [0.0, 1000.0, f32::NAN, 1e9] {
            let config = EngineConfig {
                sample_rate: rate,
                ..EngineConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(EngineError::OutOfRange { name: "sample_rate", .. })
            ));
        }
    }

    #[test]
    fn rejects_eq_above_nyquist() {
        let config = EngineConfig {
            sample_rate: 16000.0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EngineError::EqAboveNyquist { band: "high", .. })
        ));
    }

    #[test]
    fn rejects_tiny_delay() {
        let config = EngineConfig {
            delay_capacity: 1,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(EngineError::DelayCapacity(1)));
    }

    #[test]
    fn rejects_zero_loop() {
        let config = EngineConfig {
            loop_seconds: 0.0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: EngineConfig =
            toml::from_str("sample_rate = 44100.0\npan_mode = \"fixed\"\n[eq]\nlow_hz = 120.0\n")
                .unwrap();
        assert_eq!(config.sample_rate, 44100.0);
        assert_eq!(config.pan_mode, PanMode::Fixed);
        assert_eq!(config.eq.low_hz, 120.0);
        assert_eq!(config.eq.mid_hz, 2000.0);
        assert_eq!(config.loop_seconds, 60.0);
    }
}
