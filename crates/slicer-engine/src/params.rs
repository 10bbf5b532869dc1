//! Live-tunable parameters and the handle used to change them.
//!
//! Control code writes through a [`ParamHandle`] from any thread. The render
//! path copies the whole [`EngineParameters`] struct once per block and
//! renders that block against the copy, so the lock is taken once per block
//! no matter how many setters fire.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use libm::{powf, roundf};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use slicer_effects::{EQ_GAIN_RANGE_DB, MAX_DELAY_FEEDBACK, MIN_DELAY_SECONDS};

use crate::voice::MAX_VOICES;

/// Highest loop feedback amount.
pub const MAX_FEEDBACK: f32 = 0.95;

/// Largest `|speed|`.
pub const MAX_SPEED: f32 = 8.0;

/// Longest settable delay time in seconds.
pub const MAX_DELAY_TIME: f32 = 2.0;

/// Domain of every continuous parameter, by field name.
pub const PARAM_RANGES: &[(&str, f32, f32)] = &[
    ("min_slice_time", 0.0, 1.0),
    ("scan", 0.0, 1.0),
    ("mix", 0.0, 1.0),
    ("feedback", 0.0, MAX_FEEDBACK),
    ("speed", -MAX_SPEED, MAX_SPEED),
    ("eq_low_db", -EQ_GAIN_RANGE_DB, EQ_GAIN_RANGE_DB),
    ("eq_mid_db", -EQ_GAIN_RANGE_DB, EQ_GAIN_RANGE_DB),
    ("eq_high_db", -EQ_GAIN_RANGE_DB, EQ_GAIN_RANGE_DB),
    ("delay_time_l", MIN_DELAY_SECONDS, MAX_DELAY_TIME),
    ("delay_time_r", MIN_DELAY_SECONDS, MAX_DELAY_TIME),
    ("delay_feedback", 0.0, MAX_DELAY_FEEDBACK),
    ("delay_wet", 0.0, 1.0),
    ("reverb_room", 0.0, 1.0),
    ("reverb_damping", 0.0, 1.0),
    ("reverb_decay", 0.0, 1.0),
    ("reverb_wet", 0.0, 1.0),
];

/// Map the minimum-slice-time knob (0 to 1) to seconds.
///
/// The lower half is exponential from 1 ms to 1 s, the upper half linear
/// from 1 s to 5 s. Out-of-range knobs are clamped, NaN reads as 0.
///
/// ```rust
/// use slicer_engine::min_slice_time_seconds;
///
/// assert!((min_slice_time_seconds(0.0) - 0.001).abs() < 1e-6);
/// assert!((min_slice_time_seconds(0.5) - 1.0).abs() < 1e-5);
/// assert!((min_slice_time_seconds(1.0) - 5.0).abs() < 1e-5);
/// ```
pub fn min_slice_time_seconds(knob: f32) -> f32 {
    let knob = if knob.is_nan() { 0.0 } else { knob.clamp(0.0, 1.0) };
    if knob <= 0.5 {
        0.001 * powf(1000.0, knob * 2.0)
    } else {
        1.0 + (knob - 0.5) * 8.0
    }
}

/// Minimum slice length in samples for `seconds`, rounded, at least 1.
pub fn min_slice_samples(seconds: f32, sample_rate: f32) -> usize {
    let samples = roundf(seconds * sample_rate);
    if samples.is_finite() && samples >= 1.0 {
        samples as usize
    } else {
        1
    }
}

/// Every live-tunable value of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParameters {
    /// Record input into a new take.
    pub recording: bool,
    /// Play the committed take.
    pub looping: bool,
    /// Minimum slice time knob, 0 to 1 (see [`min_slice_time_seconds`]).
    pub min_slice_time: f32,
    /// Slice selection, 0 to 1. At or below 0.01 selection is off.
    pub scan: f32,
    /// Input/loop crossfade, 0 = input only.
    pub mix: f32,
    /// Output fed back into the mix, 0 to 0.95.
    pub feedback: f32,
    /// Global playback speed, -8 to 8. Negative plays backwards.
    pub speed: f32,
    /// Active voices, 1 to 8.
    pub voices: usize,
    /// Low shelf gain in dB.
    pub eq_low_db: f32,
    /// Mid peak gain in dB.
    pub eq_mid_db: f32,
    /// High shelf gain in dB.
    pub eq_high_db: f32,
    /// Left delay time in seconds.
    pub delay_time_l: f32,
    /// Right delay time in seconds.
    pub delay_time_r: f32,
    /// Delay feedback, 0 to 0.95.
    pub delay_feedback: f32,
    /// Delay wet/dry, 0 to 1.
    pub delay_wet: f32,
    /// Reverb room size, 0 to 1.
    pub reverb_room: f32,
    /// Reverb damping, 0 to 1.
    pub reverb_damping: f32,
    /// Reverb decay, 0 to 1.
    pub reverb_decay: f32,
    /// Reverb wet/dry, 0 to 1.
    pub reverb_wet: f32,
}

impl Default for EngineParameters {
    fn default() -> Self {
        Self {
            recording: false,
            looping: true,
            min_slice_time: 0.05,
            scan: 0.0,
            mix: 0.5,
            feedback: 0.0,
            speed: 1.0,
            voices: 1,
            eq_low_db: 0.0,
            eq_mid_db: 0.0,
            eq_high_db: 0.0,
            delay_time_l: 0.25,
            delay_time_r: 0.25,
            delay_feedback: 0.3,
            delay_wet: 0.0,
            reverb_room: 0.5,
            reverb_damping: 0.4,
            reverb_decay: 0.6,
            reverb_wet: 0.0,
        }
    }
}

impl EngineParameters {
    /// Continuous values paired with their names, in [`PARAM_RANGES`] order.
    pub fn values(&self) -> [(&'static str, f32); 16] {
        [
            ("min_slice_time", self.min_slice_time),
            ("scan", self.scan),
            ("mix", self.mix),
            ("feedback", self.feedback),
            ("speed", self.speed),
            ("eq_low_db", self.eq_low_db),
            ("eq_mid_db", self.eq_mid_db),
            ("eq_high_db", self.eq_high_db),
            ("delay_time_l", self.delay_time_l),
            ("delay_time_r", self.delay_time_r),
            ("delay_feedback", self.delay_feedback),
            ("delay_wet", self.delay_wet),
            ("reverb_room", self.reverb_room),
            ("reverb_damping", self.reverb_damping),
            ("reverb_decay", self.reverb_decay),
            ("reverb_wet", self.reverb_wet),
        ]
    }

    /// Copy with every value forced into its domain. Non-finite values
    /// take the default.
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();
        let fix = |value: f32, fallback: f32, name: &str| -> f32 {
            let (min, max) = param_range(name);
            if value.is_finite() {
                value.clamp(min, max)
            } else {
                fallback
            }
        };
        Self {
            recording: self.recording,
            looping: self.looping,
            min_slice_time: fix(self.min_slice_time, defaults.min_slice_time, "min_slice_time"),
            scan: fix(self.scan, defaults.scan, "scan"),
            mix: fix(self.mix, defaults.mix, "mix"),
            feedback: fix(self.feedback, defaults.feedback, "feedback"),
            speed: fix(self.speed, defaults.speed, "speed"),
            voices: self.voices.clamp(1, MAX_VOICES),
            eq_low_db: fix(self.eq_low_db, defaults.eq_low_db, "eq_low_db"),
            eq_mid_db: fix(self.eq_mid_db, defaults.eq_mid_db, "eq_mid_db"),
            eq_high_db: fix(self.eq_high_db, defaults.eq_high_db, "eq_high_db"),
            delay_time_l: fix(self.delay_time_l, defaults.delay_time_l, "delay_time_l"),
            delay_time_r: fix(self.delay_time_r, defaults.delay_time_r, "delay_time_r"),
            delay_feedback: fix(self.delay_feedback, defaults.delay_feedback, "delay_feedback"),
            delay_wet: fix(self.delay_wet, defaults.delay_wet, "delay_wet"),
            reverb_room: fix(self.reverb_room, defaults.reverb_room, "reverb_room"),
            reverb_damping: fix(self.reverb_damping, defaults.reverb_damping, "reverb_damping"),
            reverb_decay: fix(self.reverb_decay, defaults.reverb_decay, "reverb_decay"),
            reverb_wet: fix(self.reverb_wet, defaults.reverb_wet, "reverb_wet"),
        }
    }
}

/// Domain of the named parameter. Unknown names get `[0, 1]`.
pub fn param_range(name: &str) -> (f32, f32) {
    PARAM_RANGES
        .iter()
        .find(|(n, _, _)| *n == name)
        .map_or((0.0, 1.0), |&(_, min, max)| (min, max))
}

/// Snapshot of the render-side state, readable from any thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineStatus {
    /// Slices in the committed take.
    pub num_slices: usize,
    /// Slice the primary voice is bound to.
    pub current_slice: usize,
    /// Active voices.
    pub num_voices: usize,
    /// Whether a take is in progress.
    pub recording: bool,
    /// Samples in the committed take.
    pub recorded_length: usize,
}

#[derive(Debug, Default)]
struct StatusCell {
    num_slices: AtomicUsize,
    current_slice: AtomicUsize,
    num_voices: AtomicUsize,
    recording: AtomicBool,
    recorded_length: AtomicUsize,
}

/// Clonable, thread-safe access to the engine's parameters and status.
///
/// Every setter clamps to the documented domain; non-finite values are
/// ignored. Changes are picked up at the start of the next render block.
///
/// # Example
///
/// ```rust
/// use slicer_engine::ParamHandle;
///
/// let handle = ParamHandle::default();
/// let remote = handle.clone();
/// std::thread::spawn(move || remote.set_mix(2.0)).join().unwrap();
/// assert_eq!(handle.snapshot().mix, 1.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParamHandle {
    params: Arc<Mutex<EngineParameters>>,
    status: Arc<StatusCell>,
}

macro_rules! clamped_setters {
    ($($(#[$doc:meta])* $setter:ident => $field:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $setter(&self, value: f32) {
                if !value.is_finite() {
                    return;
                }
                let (min, max) = param_range(stringify!($field));
                self.params.lock().$field = value.clamp(min, max);
            }
        )*
    };
}

impl ParamHandle {
    /// Create a handle holding `params` (clamped).
    pub fn new(params: EngineParameters) -> Self {
        Self {
            params: Arc::new(Mutex::new(params.clamped())),
            status: Arc::default(),
        }
    }

    /// Copy of the current parameters.
    pub fn snapshot(&self) -> EngineParameters {
        *self.params.lock()
    }

    /// Replace every parameter at once (clamped).
    pub fn replace(&self, params: EngineParameters) {
        *self.params.lock() = params.clamped();
    }

    /// Arm or stop recording.
    pub fn set_recording(&self, recording: bool) {
        self.params.lock().recording = recording;
    }

    /// Enable or mute loop playback.
    pub fn set_looping(&self, looping: bool) {
        self.params.lock().looping = looping;
    }

    /// Set the voice count (clamped to 1..=8).
    pub fn set_voices(&self, voices: usize) {
        self.params.lock().voices = voices.clamp(1, MAX_VOICES);
    }

    clamped_setters! {
        /// Minimum slice time knob, 0 to 1.
        set_min_slice_time => min_slice_time;
        /// Scan position, 0 to 1.
        set_scan => scan;
        /// Input/loop mix, 0 to 1.
        set_mix => mix;
        /// Loop feedback, 0 to 0.95.
        set_feedback => feedback;
        /// Playback speed, -8 to 8.
        set_speed => speed;
        /// Low shelf gain, -20 to 20 dB.
        set_eq_low => eq_low_db;
        /// Mid peak gain, -20 to 20 dB.
        set_eq_mid => eq_mid_db;
        /// High shelf gain, -20 to 20 dB.
        set_eq_high => eq_high_db;
        /// Left delay time, 0.001 to 2 s.
        set_delay_time_l => delay_time_l;
        /// Right delay time, 0.001 to 2 s.
        set_delay_time_r => delay_time_r;
        /// Delay feedback, 0 to 0.95.
        set_delay_feedback => delay_feedback;
        /// Delay wet/dry, 0 to 1.
        set_delay_wet => delay_wet;
        /// Reverb room size, 0 to 1.
        set_reverb_room => reverb_room;
        /// Reverb damping, 0 to 1.
        set_reverb_damping => reverb_damping;
        /// Reverb decay, 0 to 1.
        set_reverb_decay => reverb_decay;
        /// Reverb wet/dry, 0 to 1.
        set_reverb_wet => reverb_wet;
    }

    /// Latest status published by the render path.
    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            num_slices: self.status.num_slices.load(Ordering::Relaxed),
            current_slice: self.status.current_slice.load(Ordering::Relaxed),
            num_voices: self.status.num_voices.load(Ordering::Relaxed),
            recording: self.status.recording.load(Ordering::Relaxed),
            recorded_length: self.status.recorded_length.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn publish(&self, status: EngineStatus) {
        self.status.num_slices.store(status.num_slices, Ordering::Relaxed);
        self.status
            .current_slice
            .store(status.current_slice, Ordering::Relaxed);
        self.status.num_voices.store(status.num_voices, Ordering::Relaxed);
        self.status.recording.store(status.recording, Ordering::Relaxed);
        self.status
            .recorded_length
            .store(status.recorded_length, Ordering::Relaxed);
    }
}
