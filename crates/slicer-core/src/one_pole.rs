//! One-pole (6 dB/oct) highpass.
//!
//! ```text
//! lp[n] = x[n] + coeff * (lp[n-1] - x[n])
//! hp[n] = x[n] - lp[n]
//! ```
//!
//! where `coeff = exp(-2π * freq / sample_rate)`. Removes DC and sub-bass
//! buildup at the end of the reverb.
//!
//! # Usage
//!
//! ```rust
//! use slicer_core::OnePole;
//!
//! let mut hp = OnePole::highpass(48000.0, 100.0);
//! let mut out = 0.0;
//! for _ in 0..48000 {
//!     out = hp.process(1.0);
//! }
//! assert!(out.abs() < 1e-3); // DC removed
//! ```

use crate::flush_denormal;
use libm::expf;

/// One-pole highpass.
///
/// `state` holds the lowpass history subtracted from the input and is
/// flushed to zero below 1e-20.
#[derive(Debug, Clone)]
pub struct OnePole {
    state: f32,
    coeff: f32,
}

impl OnePole {
    /// Create a one-pole highpass with its corner at `freq_hz`, clamped to
    /// `[1, nyquist]`.
    pub fn highpass(sample_rate: f32, freq_hz: f32) -> Self {
        let nyquist = sample_rate * 0.5;
        let freq = freq_hz.clamp(1.0, nyquist.max(1.0));
        Self {
            state: 0.0,
            coeff: expf(-core::f32::consts::TAU * freq / sample_rate.max(1.0)),
        }
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state = flush_denormal(input + self.coeff * (self.state - input));
        input - self.state
    }

    /// Reset filter state to zero.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}
