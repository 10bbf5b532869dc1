//! Test signals fed into the recorder.

use clap::{Args, ValueEnum};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f32::consts::PI;

/// Longest signal the CLI will synthesize, in seconds.
const MAX_DURATION: f32 = 600.0;

/// Decay time constant of a pulse burst, in seconds.
const PULSE_DECAY: f32 = 0.03;

/// Signal shapes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SignalKind {
    /// Continuous sine
    Tone,
    /// Decaying sine bursts at a fixed interval
    #[default]
    Pulses,
    /// Single-sample clicks at a fixed interval
    Clicks,
    /// White noise
    Noise,
}

/// Options shared by every command that synthesizes a take.
#[derive(Args, Clone, Debug)]
pub struct SignalArgs {
    /// Signal shape
    #[arg(long, value_enum, default_value_t = SignalKind::Pulses)]
    pub signal: SignalKind,

    /// Duration in seconds
    #[arg(long, default_value = "2.0")]
    pub duration: f32,

    /// Tone and burst frequency in Hz
    #[arg(long, default_value = "220.0")]
    pub freq: f32,

    /// Spacing between pulses or clicks in seconds
    #[arg(long, default_value = "0.25")]
    pub interval: f32,

    /// Peak amplitude
    #[arg(long, default_value = "0.8")]
    pub amplitude: f32,

    /// Noise seed
    #[arg(long, default_value = "1")]
    pub noise_seed: u64,
}

impl SignalArgs {
    /// Render the signal at `sample_rate`.
    pub fn synthesize(&self, sample_rate: f32) -> anyhow::Result<Vec<f32>> {
        if !(self.duration > 0.0 && self.duration <= MAX_DURATION) {
            anyhow::bail!("duration must be in (0, {MAX_DURATION}] seconds, got {}", self.duration);
        }
        if !(self.freq > 0.0 && self.freq < sample_rate / 2.0) {
            anyhow::bail!("frequency {} Hz must be between 0 and Nyquist", self.freq);
        }
        if !(self.interval.is_finite() && self.interval > 0.0) {
            anyhow::bail!("interval must be positive, got {}", self.interval);
        }

        let len = (self.duration * sample_rate).round() as usize;
        let period = ((self.interval * sample_rate).round() as usize).max(1);
        let amp = self.amplitude;
        let freq = self.freq;

        let samples = match self.signal {
            SignalKind::Tone => (0..len)
                .map(|i| amp * (2.0 * PI * freq * i as f32 / sample_rate).sin())
                .collect(),
            SignalKind::Pulses => (0..len)
                .map(|i| {
                    let t = (i % period) as f32 / sample_rate;
                    amp * (-t / PULSE_DECAY).exp() * (2.0 * PI * freq * t).sin()
                })
                .collect(),
            SignalKind::Clicks => (0..len)
                .map(|i| if i % period == 0 { amp } else { 0.0 })
                .collect(),
            SignalKind::Noise => {
                let mut rng = ChaCha8Rng::seed_from_u64(self.noise_seed);
                (0..len).map(|_| amp * rng.random_range(-1.0f32..=1.0)).collect()
            }
        };
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(signal: SignalKind) -> SignalArgs {
        SignalArgs {
            signal,
            duration: 1.0,
            freq: 220.0,
            interval: 0.25,
            amplitude: 0.8,
            noise_seed: 1,
        }
    }

    #[test]
    fn lengths_follow_duration() {
        for kind in [SignalKind::Tone, SignalKind::Pulses, SignalKind::Clicks, SignalKind::Noise] {
            assert_eq!(args(kind).synthesize(48000.0).unwrap().len(), 48000);
        }
    }

    #[test]
    fn clicks_land_on_the_grid() {
        let signal = args(SignalKind::Clicks).synthesize(48000.0).unwrap();
        let hits: Vec<usize> = signal
            .iter()
            .enumerate()
            .filter(|(_, s)| **s != 0.0)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(hits, vec![0, 12000, 24000, 36000]);
    }

    #[test]
    fn noise_is_seeded_and_bounded() {
        let a = args(SignalKind::Noise).synthesize(8000.0).unwrap();
        let b = args(SignalKind::Noise).synthesize(8000.0).unwrap();
        assert_eq!(a, b);
        assert!(a.iter().all(|s| s.abs() <= 0.8));
    }

    #[test]
    fn bad_settings_are_rejected() {
        let mut bad = args(SignalKind::Tone);
        bad.duration = 0.0;
        assert!(bad.synthesize(48000.0).is_err());

        let mut bad = args(SignalKind::Tone);
        bad.freq = 30000.0;
        assert!(bad.synthesize(48000.0).is_err());

        let mut bad = args(SignalKind::Pulses);
        bad.interval = f32::NAN;
        assert!(bad.synthesize(48000.0).is_err());
    }
}
