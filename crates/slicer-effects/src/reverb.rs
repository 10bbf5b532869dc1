//! Freeverb-style stereo reverb.
//!
//! Per channel: four parallel damped combs, two series allpasses, and a
//! one-pole highpass that keeps DC and sub-bass from building up in the
//! tail. The right channel's delay lengths are offset by a fixed spread to
//! decorrelate the two sides.

use slicer_core::{AllpassFilter, CombFilter, Effect, MAX_COMB_FEEDBACK, OnePole};

/// Comb delay lengths at the reference rate.
const COMB_TUNINGS: [usize; 4] = [1557, 1617, 1491, 1422];

/// Allpass delay lengths at the reference rate.
const ALLPASS_TUNINGS: [usize; 2] = [556, 441];

/// Extra samples added to every right-channel length.
const STEREO_SPREAD: usize = 23;

/// Reference sample rate for the tuning constants.
const REFERENCE_RATE: f32 = 44100.0;

/// Corner of the output highpass in Hz.
const HIGHPASS_HZ: f32 = 100.0;

/// Scale delay lengths from the reference rate to the target rate.
fn scale_to_rate(samples: usize, target_rate: f32) -> usize {
    ((samples as f32 * target_rate / REFERENCE_RATE).round() as usize).max(1)
}

#[derive(Debug, Clone)]
struct ReverbChannel {
    combs: [CombFilter; 4],
    allpasses: [AllpassFilter; 2],
    highpass: OnePole,
}

impl ReverbChannel {
    fn new(sample_rate: f32, spread: usize) -> Self {
        Self {
            combs: core::array::from_fn(|i| {
                CombFilter::new(scale_to_rate(COMB_TUNINGS[i] + spread, sample_rate))
            }),
            allpasses: core::array::from_fn(|i| {
                AllpassFilter::new(scale_to_rate(ALLPASS_TUNINGS[i] + spread, sample_rate))
            }),
            highpass: OnePole::highpass(sample_rate, HIGHPASS_HZ),
        }
    }

    fn configure(&mut self, feedback: f32, damp: f32) {
        for comb in &mut self.combs {
            comb.set_feedback(feedback);
            comb.set_damp(damp);
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let mut comb_sum = 0.0f32;
        for comb in &mut self.combs {
            comb_sum += comb.process(input);
        }
        let mut diffused = comb_sum * 0.25;
        for allpass in &mut self.allpasses {
            diffused = allpass.process(diffused);
        }
        self.highpass.process(diffused)
    }

    fn clear(&mut self) {
        for comb in &mut self.combs {
            comb.clear();
        }
        for allpass in &mut self.allpasses {
            allpass.clear();
        }
        self.highpass.reset();
    }
}

/// Stereo Freeverb-style reverb. The output is fully wet.
///
/// # Parameters
///
/// - `room`: 0.0-1.0, input gain into the combs (`0.3 + 1.4 * room`)
/// - `damping`: 0.0-1.0, comb lowpass coefficient (`0.05 + 0.9 * damping`)
/// - `decay`: 0.0-1.0, comb feedback (`0.5 + 0.485 * decay`)
///
/// # Example
///
/// ```rust
/// use slicer_core::Effect;
/// use slicer_effects::StereoReverb;
///
/// let mut reverb = StereoReverb::new(48000.0);
/// reverb.set_room(0.5);
/// reverb.set_damping(0.4);
/// reverb.set_decay(0.6);
///
/// let (l, r) = reverb.process_stereo(1.0, 1.0);
/// assert!(l.is_finite() && r.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct StereoReverb {
    left: ReverbChannel,
    right: ReverbChannel,
    room: f32,
    damping: f32,
    decay: f32,
    input_gain: f32,

    // Last values pushed into the combs
    cached_damping: f32,
    cached_decay: f32,
}

impl StereoReverb {
    /// Create a reverb at the given sample rate with room 0.5, damping 0.4
    /// and decay 0.6.
    pub fn new(sample_rate: f32) -> Self {
        let mut reverb = Self {
            left: ReverbChannel::new(sample_rate, 0),
            right: ReverbChannel::new(sample_rate, STEREO_SPREAD),
            room: 0.5,
            damping: 0.4,
            decay: 0.6,
            input_gain: 0.0,
            cached_damping: -1.0,
            cached_decay: -1.0,
        };
        reverb.input_gain = room_gain(reverb.room);
        reverb.update_comb_params();
        reverb
    }

    /// Set the room size (0.0 to 1.0).
    pub fn set_room(&mut self, room: f32) {
        self.room = unit(room, self.room);
        self.input_gain = room_gain(self.room);
    }

    /// Current room size.
    pub fn room(&self) -> f32 {
        self.room
    }

    /// Set the damping (0.0 to 1.0).
    pub fn set_damping(&mut self, damping: f32) {
        self.damping = unit(damping, self.damping);
        self.update_comb_params();
    }

    /// Current damping.
    pub fn damping(&self) -> f32 {
        self.damping
    }

    /// Set the decay (0.0 to 1.0).
    pub fn set_decay(&mut self, decay: f32) {
        self.decay = unit(decay, self.decay);
        self.update_comb_params();
    }

    /// Current decay.
    pub fn decay(&self) -> f32 {
        self.decay
    }

    /// Comb feedback derived from the current decay.
    pub fn comb_feedback(&self) -> f32 {
        (0.5 + 0.485 * self.decay).min(MAX_COMB_FEEDBACK)
    }

    fn update_comb_params(&mut self) {
        if (self.damping - self.cached_damping).abs() < 1e-4
            && (self.decay - self.cached_decay).abs() < 1e-4
        {
            return;
        }
        self.cached_damping = self.damping;
        self.cached_decay = self.decay;

        // The comb stores `lp += (out - lp) * coeff`, i.e. a memory of
        // `1 - coeff`.
        let coeff = 0.05 + 0.9 * self.damping;
        let feedback = self.comb_feedback();
        self.left.configure(feedback, 1.0 - coeff);
        self.right.configure(feedback, 1.0 - coeff);
    }
}

fn room_gain(room: f32) -> f32 {
    0.3 + 1.4 * room
}

fn unit(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

impl Effect for StereoReverb {
    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        (
            self.left.process(left * self.input_gain),
            self.right.process(right * self.input_gain),
        )
    }

    fn reset(&mut self) {
        self.left.clear();
        self.right.clear();
    }
}
