//! Stereo feedback delay with independent left/right times.

use libm::roundf;
use slicer_core::{DelayLine, Effect, flush_denormal};

/// Default per-channel buffer length in samples.
pub const DEFAULT_DELAY_CAPACITY: usize = 96_000;

/// Highest accepted feedback.
pub const MAX_DELAY_FEEDBACK: f32 = 0.95;

/// Shortest accepted delay time in seconds.
pub const MIN_DELAY_SECONDS: f32 = 0.001;

/// Stereo delay with a shared feedback coefficient.
///
/// Each channel writes `input + delayed * feedback` and returns only the
/// delayed signal; wet/dry mixing belongs to the caller.
///
/// # Example
///
/// ```rust
/// use slicer_core::Effect;
/// use slicer_effects::StereoDelay;
///
/// let mut delay = StereoDelay::new(48000.0);
/// delay.set_time_l(0.25);
/// delay.set_time_r(0.375);
/// delay.set_feedback(0.3);
///
/// let (l, r) = delay.process_stereo(1.0, 1.0);
/// assert_eq!((l, r), (0.0, 0.0)); // nothing has come back yet
/// ```
#[derive(Debug, Clone)]
pub struct StereoDelay {
    line_l: DelayLine,
    line_r: DelayLine,
    samples_l: usize,
    samples_r: usize,
    feedback: f32,
    sample_rate: f32,
}

impl StereoDelay {
    /// Create a delay with [`DEFAULT_DELAY_CAPACITY`] samples per channel.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_capacity(sample_rate, DEFAULT_DELAY_CAPACITY)
    }

    /// Create a delay with a custom per-channel capacity (at least 2).
    pub fn with_capacity(sample_rate: f32, capacity: usize) -> Self {
        let capacity = capacity.max(2);
        let mut delay = Self {
            line_l: DelayLine::new(capacity),
            line_r: DelayLine::new(capacity),
            samples_l: 1,
            samples_r: 1,
            feedback: 0.0,
            sample_rate,
        };
        delay.set_time_l(0.25);
        delay.set_time_r(0.25);
        delay
    }

    /// Longest settable time in seconds.
    pub fn max_time(&self) -> f32 {
        (self.line_l.capacity() - 1) as f32 / self.sample_rate
    }

    fn time_to_samples(&self, seconds: f32) -> usize {
        let max_samples = self.line_l.capacity() - 1;
        if !seconds.is_finite() {
            return max_samples.min(self.samples_for(MIN_DELAY_SECONDS));
        }
        let seconds = seconds.clamp(MIN_DELAY_SECONDS, self.max_time());
        self.samples_for(seconds).clamp(1, max_samples)
    }

    fn samples_for(&self, seconds: f32) -> usize {
        roundf(seconds * self.sample_rate).max(1.0) as usize
    }

    /// Set the left delay time in seconds.
    pub fn set_time_l(&mut self, seconds: f32) {
        self.samples_l = self.time_to_samples(seconds);
    }

    /// Set the right delay time in seconds.
    pub fn set_time_r(&mut self, seconds: f32) {
        self.samples_r = self.time_to_samples(seconds);
    }

    /// Current delay lengths `(left, right)` in samples.
    pub fn delay_samples(&self) -> (usize, usize) {
        (self.samples_l, self.samples_r)
    }

    /// Set the shared feedback, clamped to `[0, MAX_DELAY_FEEDBACK]`.
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = if feedback.is_finite() {
            feedback.clamp(0.0, MAX_DELAY_FEEDBACK)
        } else {
            0.0
        };
    }

    /// Current feedback.
    pub fn feedback(&self) -> f32 {
        self.feedback
    }
}

impl Effect for StereoDelay {
    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let delayed_l = self.line_l.tap(self.samples_l);
        let delayed_r = self.line_r.tap(self.samples_r);
        self.line_l
            .write(flush_denormal(left + delayed_l * self.feedback));
        self.line_r
            .write(flush_denormal(right + delayed_r * self.feedback));
        (delayed_l, delayed_r)
    }

    fn reset(&mut self) {
        self.line_l.clear();
        self.line_r.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_returns_after_delay_time() {
        let mut delay = StereoDelay::new(48000.0);
        delay.set_time_l(0.01);
        delay.set_time_r(0.02);
        delay.set_feedback(0.0);

        let mut hits_l = Vec::new();
        let mut hits_r = Vec::new();
        for i in 0..2000 {
            let x = if i == 0 { 1.0 } else { 0.0 };
            let (l, r) = delay.process_stereo(x, x);
            if l != 0.0 {
                hits_l.push((i, l));
            }
            if r != 0.0 {
                hits_r.push((i, r));
            }
        }
        assert_eq!(hits_l, vec![(480, 1.0)]);
        assert_eq!(hits_r, vec![(960, 1.0)]);
    }

    #[test]
    fn feedback_repeats_decay() {
        let mut delay = StereoDelay::new(48000.0);
        delay.set_time_l(0.001);
        delay.set_feedback(0.5);
        delay.process_stereo(1.0, 0.0);
        let mut echoes = Vec::new();
        for i in 1..=200 {
            let (l, _) = delay.process_stereo(0.0, 0.0);
            if i % 48 == 0 {
                echoes.push(l);
            }
        }
        assert_eq!(echoes[0], 1.0);
        assert_eq!(echoes[1], 0.5);
        assert_eq!(echoes[2], 0.25);
    }

    #[test]
    fn times_are_clamped() {
        let mut delay = StereoDelay::new(48000.0);
        delay.set_time_l(0.0);
        delay.set_time_r(100.0);
        assert_eq!(delay.delay_samples(), (48, DEFAULT_DELAY_CAPACITY - 1));

        delay.set_time_l(f32::NAN);
        assert_eq!(delay.delay_samples().0, 48);
    }

    #[test]
    fn feedback_is_clamped() {
        let mut delay = StereoDelay::new(48000.0);
        delay.set_feedback(2.0);
        assert_eq!(delay.feedback(), MAX_DELAY_FEEDBACK);
        delay.set_feedback(f32::INFINITY);
        assert_eq!(delay.feedback(), 0.0);
    }

    #[test]
    fn max_feedback_stays_bounded() {
        let mut delay = StereoDelay::with_capacity(48000.0, 1000);
        delay.set_time_l(0.001);
        delay.set_time_r(0.001);
        delay.set_feedback(1.0);
        for _ in 0..200_000 {
            let (l, r) = delay.process_stereo(1.0, -1.0);
            assert!(l.abs() <= 20.0 + 1e-3 && r.abs() <= 20.0 + 1e-3);
        }
    }

    #[test]
    fn reset_clears_lines() {
        let mut delay = StereoDelay::new(48000.0);
        delay.set_time_l(0.001);
        delay.process_stereo(1.0, 1.0);
        delay.reset();
        for _ in 0..100 {
            assert_eq!(delay.process_stereo(0.0, 0.0), (0.0, 0.0));
        }
    }
}
