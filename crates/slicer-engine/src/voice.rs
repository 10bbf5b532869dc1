//! Polyphonic slice playback.
//!
//! Up to [`MAX_VOICES`] cursors walk the committed loop buffer, each bound
//! to a slice (or to the whole buffer when no valid slice is bound) and
//! each with its own speed multiplier. Voice 0 is the primary voice: it
//! always plays at the global speed and follows the scan control.
//! Secondary voices are scattered over random slices by
//! [`VoicePool::redistribute`].

use libm::sqrtf;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::slice::Slice;

/// Largest voice count.
pub const MAX_VOICES: usize = 8;

/// Bound on `|speed * multiplier|` for any voice.
pub const MAX_VOICE_SPEED: f32 = 16.0;

/// Random re-draws after the first slice pick fails.
pub const SLICE_PICK_RETRIES: usize = 20;

/// Default half-width of the secondary voice speed range.
pub const DEFAULT_VOICE_SPEED_RANGE: f32 = 2.0;

/// How voices are spread across the stereo field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanMode {
    /// Even voices left, odd voices right.
    #[default]
    Alternate,
    /// One fixed pan position per voice.
    Fixed,
}

/// `(left, right)` gains per voice for [`PanMode::Fixed`].
const PAN_TABLE: [(f32, f32); MAX_VOICES] = [
    (0.5, 0.5),
    (0.75, 0.25),
    (0.25, 0.75),
    (1.0, 0.0),
    (0.0, 1.0),
    (0.875, 0.125),
    (0.125, 0.875),
    (1.0, 0.0),
];

/// One playback cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    /// Slice the voice loops inside. Out of range means the whole buffer.
    pub slice_index: usize,
    /// Integer read position.
    pub position: usize,
    /// Fractional part of the accumulated speed, in (-1, 1).
    pub phase: f32,
    /// Factor applied to the global speed.
    pub speed_multiplier: f32,
}

impl Default for Voice {
    fn default() -> Self {
        Self {
            slice_index: 0,
            position: 0,
            phase: 0.0,
            speed_multiplier: 1.0,
        }
    }
}

impl Voice {
    fn at_slice(index: usize, slice: &Slice, speed_multiplier: f32) -> Self {
        Self {
            slice_index: index,
            position: slice.start_sample,
            phase: 0.0,
            speed_multiplier,
        }
    }

    /// Move the cursor by `speed` samples, wrapping at the bound slice or
    /// at the buffer ends. `recorded_len` must be non-zero.
    #[inline]
    fn advance(&mut self, speed: f32, slices: &[Slice], recorded_len: usize) {
        self.phase += speed;
        if !self.phase.is_finite() {
            self.phase = 0.0;
        }
        let delta = self.phase as i64;
        self.phase -= delta as f32;

        let last = recorded_len as i64 - 1;
        let mut position = self.position as i64 + delta;
        let reverse = speed < 0.0;

        match slices
            .get(self.slice_index)
            .filter(|s| s.is_playable(recorded_len))
        {
            Some(slice) => {
                let start = slice.start_sample as i64;
                let end = (slice.end_sample as i64).min(last);
                if reverse {
                    if position < start {
                        position = end;
                    }
                } else if position > end {
                    position = start;
                }
            }
            None => {
                if reverse {
                    if position < 0 {
                        position = last;
                    }
                } else if position > last {
                    position = 0;
                }
            }
        }

        self.position = position.clamp(0, last) as usize;
    }

    /// Linearly interpolated sample at the cursor. Non-finite reads are 0.
    #[inline]
    fn read(&self, buffer: &[f32]) -> f32 {
        let len = buffer.len();
        let pos0 = self.position.min(len - 1);
        let pos1 = if len > 1 { (pos0 + 1) % len } else { pos0 };
        let frac = self.phase.abs().clamp(0.0, 1.0);
        let sample = buffer[pos0] * (1.0 - frac) + buffer[pos1] * frac;
        if sample.is_finite() { sample } else { 0.0 }
    }
}

/// Fixed set of voices with an owned, seedable RNG.
///
/// # Example
///
/// ```rust
/// use slicer_engine::{PanMode, SliceDetector, VoicePool};
///
/// let buffer: Vec<f32> = (0..4800).map(|i| if i % 600 == 0 { 1.0 } else { 0.2 }).collect();
/// let slices = SliceDetector::detect(&buffer, 0.5, 100);
///
/// let mut pool = VoicePool::new(Some(7), 2.0, PanMode::Alternate);
/// pool.set_voice_count(4, &slices, buffer.len());
///
/// let (l, r) = pool.render(1.0, &buffer, &slices);
/// assert!(l.is_finite() && r.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct VoicePool {
    voices: [Voice; MAX_VOICES],
    active: usize,
    rng: ChaCha8Rng,
    speed_range: f32,
    pan_mode: PanMode,
    // Per-channel normalization for the active count
    norm_l: f32,
    norm_r: f32,
}

impl VoicePool {
    /// Create a pool with one active voice.
    ///
    /// `seed: None` draws the RNG seed from the OS. `speed_range` is the
    /// half-width of the secondary speed multiplier range, limited to
    /// [`MAX_VOICE_SPEED`]; non-positive values fall back to
    /// [`DEFAULT_VOICE_SPEED_RANGE`].
    pub fn new(seed: Option<u64>, speed_range: f32, pan_mode: PanMode) -> Self {
        let rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_os_rng(),
        };
        let speed_range = if speed_range.is_finite() && speed_range > 0.0 {
            speed_range.min(MAX_VOICE_SPEED)
        } else {
            DEFAULT_VOICE_SPEED_RANGE
        };
        let mut pool = Self {
            voices: [Voice::default(); MAX_VOICES],
            active: 1,
            rng,
            speed_range,
            pan_mode,
            norm_l: 1.0,
            norm_r: 1.0,
        };
        pool.update_normalization();
        pool
    }

    /// Number of active voices.
    pub fn active_count(&self) -> usize {
        self.active
    }

    /// The active voices, primary first.
    pub fn voices(&self) -> &[Voice] {
        &self.voices[..self.active]
    }

    /// The primary voice.
    pub fn primary(&self) -> &Voice {
        &self.voices[0]
    }

    /// Stereo placement mode.
    pub fn pan_mode(&self) -> PanMode {
        self.pan_mode
    }

    /// Change the stereo placement mode.
    pub fn set_pan_mode(&mut self, pan_mode: PanMode) {
        self.pan_mode = pan_mode;
        self.update_normalization();
    }

    /// Half-width of the secondary speed multiplier range.
    pub fn speed_range(&self) -> f32 {
        self.speed_range
    }

    /// Resize to `count` voices (clamped to 1..=8).
    ///
    /// Voice 0 keeps its position and plays at the global speed. Voices
    /// 1.. get a random playable slice and speed multiplier; with no
    /// slices they are spread evenly over the recording instead. Returns
    /// whether the count changed.
    pub fn set_voice_count(&mut self, count: usize, slices: &[Slice], recorded_len: usize) -> bool {
        let count = count.clamp(1, MAX_VOICES);
        if count == self.active {
            return false;
        }
        self.active = count;
        self.voices[0].speed_multiplier = 1.0;
        let primary = self.voices[0];

        for i in 1..count {
            let voice = if !slices.is_empty() {
                match self.pick_slice(slices, recorded_len) {
                    Some(index) => {
                        let speed = self.random_speed();
                        Voice::at_slice(index, &slices[index], speed)
                    }
                    None => primary,
                }
            } else if recorded_len > 0 {
                Voice {
                    slice_index: usize::MAX,
                    position: recorded_len * i / count,
                    phase: 0.0,
                    speed_multiplier: self.random_speed(),
                }
            } else {
                primary
            };
            self.voices[i] = voice;
        }

        self.update_normalization();
        true
    }

    /// Re-roll the slice and speed of voices 1.. Voice 0 is untouched.
    pub fn redistribute(&mut self, slices: &[Slice], recorded_len: usize) {
        if slices.is_empty() || self.active <= 1 {
            return;
        }
        for i in 1..self.active {
            if let Some(index) = self.pick_slice(slices, recorded_len) {
                let speed = self.random_speed();
                self.voices[i] = Voice::at_slice(index, &slices[index], speed);
            }
        }
    }

    /// Put every voice at the start of the buffer, on slice 0, at unit
    /// speed.
    pub fn reset_to_start(&mut self) {
        self.voices = [Voice::default(); MAX_VOICES];
    }

    /// Jump the primary voice to the start of slice `index`.
    pub fn jump_primary(&mut self, index: usize, slice: &Slice) {
        let primary = &mut self.voices[0];
        primary.slice_index = index;
        primary.position = slice.start_sample;
        primary.phase = 0.0;
    }

    /// Keep the primary voice's slice index inside a list of `num_slices`.
    pub fn clamp_primary_slice(&mut self, num_slices: usize) {
        let primary = &mut self.voices[0];
        if primary.slice_index >= num_slices {
            primary.slice_index = num_slices.saturating_sub(1);
        }
    }

    /// Advance every active voice one sample at global `speed` and return
    /// the stereo sum.
    ///
    /// `buffer` is the committed recording; an empty buffer renders silence
    /// and leaves the voices where they are.
    #[inline]
    pub fn render(&mut self, speed: f32, buffer: &[f32], slices: &[Slice]) -> (f32, f32) {
        let recorded_len = buffer.len();
        if recorded_len == 0 {
            return (0.0, 0.0);
        }

        if self.active == 1 {
            let voice = &mut self.voices[0];
            voice.advance(speed, slices, recorded_len);
            let sample = voice.read(buffer);
            return (sample, sample);
        }

        let mut left = 0.0;
        let mut right = 0.0;
        for (i, voice) in self.voices[..self.active].iter_mut().enumerate() {
            let voice_speed =
                (speed * voice.speed_multiplier).clamp(-MAX_VOICE_SPEED, MAX_VOICE_SPEED);
            voice.advance(voice_speed, slices, recorded_len);
            let sample = voice.read(buffer);
            match self.pan_mode {
                PanMode::Alternate => {
                    if i % 2 == 0 {
                        left += sample;
                    } else {
                        right += sample;
                    }
                }
                PanMode::Fixed => {
                    let (gain_l, gain_r) = PAN_TABLE[i];
                    left += sample * gain_l;
                    right += sample * gain_r;
                }
            }
        }
        (left * self.norm_l, right * self.norm_r)
    }

    fn pick_slice(&mut self, slices: &[Slice], recorded_len: usize) -> Option<usize> {
        for _ in 0..=SLICE_PICK_RETRIES {
            let index = self.rng.random_range(0..slices.len());
            if slices[index].is_playable(recorded_len) {
                return Some(index);
            }
        }
        let fallback = self.voices[0].slice_index;
        slices
            .get(fallback)
            .filter(|s| s.is_playable(recorded_len))
            .map(|_| fallback)
    }

    fn random_speed(&mut self) -> f32 {
        self.rng.random_range(-self.speed_range..=self.speed_range)
    }

    fn update_normalization(&mut self) {
        let (sum_l, sum_r) = match self.pan_mode {
            PanMode::Alternate => {
                let left = self.active.div_ceil(2);
                (left as f32, (self.active - left) as f32)
            }
            PanMode::Fixed => PAN_TABLE[..self.active]
                .iter()
                .fold((0.0, 0.0), |(l, r), &(gl, gr)| (l + gl * gl, r + gr * gr)),
        };
        self.norm_l = if sum_l > 0.0 { 1.0 / sqrtf(sum_l) } else { 1.0 };
        self.norm_r = if sum_r > 0.0 { 1.0 / sqrtf(sum_r) } else { 1.0 };
    }
}
