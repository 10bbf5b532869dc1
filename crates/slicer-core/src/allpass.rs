//! Allpass filter for reverb diffusion.
//!
//! Smears transients in time without shaping the magnitude response.

use crate::DelayLine;
use crate::flush_denormal;

/// Schroeder allpass diffuser.
///
/// ```text
/// output     = -input * g + delayed
/// delay_in   =  input + delayed * g
/// ```
///
/// # Example
///
/// ```rust
/// use slicer_core::AllpassFilter;
///
/// let mut allpass = AllpassFilter::new(556);
/// let first = allpass.process(1.0);
/// assert_eq!(first, -0.5);
/// ```
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    delay: DelayLine,
    gain: f32,
}

impl AllpassFilter {
    /// Create an allpass with a `delay_samples` loop and gain 0.5.
    pub fn new(delay_samples: usize) -> Self {
        Self {
            delay: DelayLine::new(delay_samples),
            gain: 0.5,
        }
    }

    /// Set the allpass gain, clamped to `(-1, 1)` for stability.
    #[inline]
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(-0.99, 0.99);
    }

    /// Current gain.
    #[inline]
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.delay.oldest();
        let output = -input * self.gain + delayed;
        self.delay.write(flush_denormal(input + delayed * self.gain));
        output
    }

    /// Clear the delay state.
    pub fn clear(&mut self) {
        self.delay.clear();
    }

    /// Loop length in samples.
    pub fn capacity(&self) -> usize {
        self.delay.capacity()
    }
}
