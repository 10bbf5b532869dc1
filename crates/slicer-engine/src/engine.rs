//! Top-level loop engine.
//!
//! Per block the engine copies the parameters once, applies structural
//! changes (recording, voice count, slicing, scan) and advances smoothing.
//! Per sample it runs:
//!
//! ```text
//! input ─┬─► recorder
//!        │
//!        ├─► voices ─► loop ─┐
//!        └─────────► dry ────┴─► mix + feedback ─► EQ ─► delay ─► reverb ─► out
//!                                    ▲                                      │
//!                                    └─────────── soft clip ◄───────────────┘
//! ```

use slicer_core::{Effect, SmoothedParam, sanitize, soft_saturate, wet_dry_mix_stereo};
use slicer_effects::{StereoDelay, StereoReverb, ThreeBandEq};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::params::{
    EngineParameters, EngineStatus, ParamHandle, min_slice_samples, min_slice_time_seconds,
};
use crate::recorder::LoopRecorder;
use crate::scan::ScanController;
use crate::slice::Slice;
use crate::voice::VoicePool;

/// Drive of the feedback soft clipper, `tanh(x * d) / d`.
pub const FEEDBACK_DRIVE: f32 = 0.3;

/// Per-block smoothing coefficient for continuous parameters.
pub const SMOOTHING_COEFF: f32 = 0.2;

/// Per-block smoothing coefficient for delay times.
pub const DELAY_TIME_SMOOTHING_COEFF: f32 = 0.05;

/// Continuous parameters after per-block smoothing.
#[derive(Debug, Clone)]
struct Smoothed {
    mix: SmoothedParam,
    feedback: SmoothedParam,
    speed: SmoothedParam,
    eq_low: SmoothedParam,
    eq_mid: SmoothedParam,
    eq_high: SmoothedParam,
    delay_time_l: SmoothedParam,
    delay_time_r: SmoothedParam,
    delay_feedback: SmoothedParam,
    delay_wet: SmoothedParam,
    reverb_room: SmoothedParam,
    reverb_damping: SmoothedParam,
    reverb_decay: SmoothedParam,
    reverb_wet: SmoothedParam,
}

impl Smoothed {
    fn new(p: &EngineParameters) -> Self {
        let smooth = |value| SmoothedParam::with_coefficient(value, SMOOTHING_COEFF);
        let slow = |value| SmoothedParam::with_coefficient(value, DELAY_TIME_SMOOTHING_COEFF);
        Self {
            mix: smooth(p.mix),
            feedback: smooth(p.feedback),
            speed: smooth(p.speed),
            eq_low: smooth(p.eq_low_db),
            eq_mid: smooth(p.eq_mid_db),
            eq_high: smooth(p.eq_high_db),
            delay_time_l: slow(p.delay_time_l),
            delay_time_r: slow(p.delay_time_r),
            delay_feedback: smooth(p.delay_feedback),
            delay_wet: smooth(p.delay_wet),
            reverb_room: smooth(p.reverb_room),
            reverb_damping: smooth(p.reverb_damping),
            reverb_decay: smooth(p.reverb_decay),
            reverb_wet: smooth(p.reverb_wet),
        }
    }

    fn params_mut(&mut self) -> [&mut SmoothedParam; 14] {
        [
            &mut self.mix,
            &mut self.feedback,
            &mut self.speed,
            &mut self.eq_low,
            &mut self.eq_mid,
            &mut self.eq_high,
            &mut self.delay_time_l,
            &mut self.delay_time_r,
            &mut self.delay_feedback,
            &mut self.delay_wet,
            &mut self.reverb_room,
            &mut self.reverb_damping,
            &mut self.reverb_decay,
            &mut self.reverb_wet,
        ]
    }

    fn targets(p: &EngineParameters) -> [f32; 14] {
        [
            p.mix,
            p.feedback,
            p.speed,
            p.eq_low_db,
            p.eq_mid_db,
            p.eq_high_db,
            p.delay_time_l,
            p.delay_time_r,
            p.delay_feedback,
            p.delay_wet,
            p.reverb_room,
            p.reverb_damping,
            p.reverb_decay,
            p.reverb_wet,
        ]
    }

    fn advance_toward(&mut self, p: &EngineParameters) {
        for (param, target) in self.params_mut().into_iter().zip(Self::targets(p)) {
            param.set_target(target);
            param.advance();
        }
    }

    fn snap_to(&mut self, p: &EngineParameters) {
        for (param, target) in self.params_mut().into_iter().zip(Self::targets(p)) {
            param.set_immediate(target);
        }
    }
}

/// The live-loop slicer.
///
/// Owns every buffer it needs from construction on; [`process`](Self::process)
/// never allocates, blocks beyond one short lock per block, or fails.
///
/// # Example
///
/// ```rust
/// use slicer_engine::{Engine, EngineConfig};
///
/// let mut engine = Engine::new(EngineConfig {
///     loop_seconds: 2.0,
///     seed: Some(9),
///     ..EngineConfig::default()
/// })?;
///
/// let input: Vec<f32> = (0..4800).map(|i| if i % 1200 == 0 { 1.0 } else { 0.1 }).collect();
/// let mut left = vec![0.0; input.len()];
/// let mut right = vec![0.0; input.len()];
///
/// engine.set_recording(true);
/// engine.process(&input, &mut left, &mut right);
/// engine.set_recording(false);
/// assert_eq!(engine.num_slices(), 4);
///
/// engine.set_voices(3);
/// engine.process(&input, &mut left, &mut right);
/// assert!(left.iter().chain(&right).all(|x| x.is_finite()));
/// # Ok::<(), slicer_engine::EngineError>(())
/// ```
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    handle: ParamHandle,

    recorder: LoopRecorder,
    voices: VoicePool,
    scan: ScanController,

    eq: ThreeBandEq,
    delay: StereoDelay,
    reverb: StereoReverb,

    smoothed: Smoothed,
    looping: bool,
    min_slice_samples: usize,
    last_output: (f32, f32),
}

macro_rules! forward_setters {
    ($($(#[$doc:meta])* $name:ident($ty:ty);)*) => {
        $(
            $(#[$doc])*
            pub fn $name(&mut self, value: $ty) {
                self.handle.$name(value);
                self.sync();
            }
        )*
    };
}

impl Engine {
    /// Build an engine with default parameters.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_parameters(config, EngineParameters::default())
    }

    /// Build an engine starting from `params`.
    pub fn with_parameters(
        config: EngineConfig,
        params: EngineParameters,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let sr = config.sample_rate;
        let params = params.clamped();

        let mut engine = Self {
            recorder: LoopRecorder::new(config.loop_capacity(), config.onset_threshold),
            voices: VoicePool::new(config.seed, config.voice_speed_range, config.pan_mode),
            scan: ScanController::new(params.scan),
            eq: ThreeBandEq::with_frequencies(sr, config.eq.into()),
            delay: StereoDelay::with_capacity(sr, config.delay_capacity),
            reverb: StereoReverb::new(sr),
            smoothed: Smoothed::new(&params),
            looping: params.looping,
            min_slice_samples: min_slice_samples(min_slice_time_seconds(params.min_slice_time), sr),
            last_output: (0.0, 0.0),
            handle: ParamHandle::new(params),
            config,
        };
        engine.update_effects();
        engine.sync();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate = engine.config.sample_rate,
            loop_capacity = engine.recorder.capacity(),
            "engine created"
        );

        Ok(engine)
    }

    /// Render one block.
    ///
    /// Processes `min(input.len(), out_l.len(), out_r.len())` frames. Output
    /// is always finite and within `±output_limit`.
    pub fn process(&mut self, input: &[f32], out_l: &mut [f32], out_r: &mut [f32]) {
        let params = self.handle.snapshot();
        self.apply_structure(&params);
        self.smoothed.advance_toward(&params);
        self.update_effects();

        let mix = self.smoothed.mix.get();
        let feedback = self.smoothed.feedback.get();
        let speed = self.smoothed.speed.get();
        let delay_wet = self.smoothed.delay_wet.get();
        let reverb_wet = self.smoothed.reverb_wet.get();
        let limit = self.config.output_limit;

        for ((&x, l_out), r_out) in input.iter().zip(out_l.iter_mut()).zip(out_r.iter_mut()) {
            let x = sanitize(x);
            self.recorder.record(x, self.min_slice_samples);

            let (loop_l, loop_r) = if self.looping {
                self.voices
                    .render(speed, self.recorder.buffer(), self.recorder.slices())
            } else {
                (0.0, 0.0)
            };

            let dry = x * (1.0 - mix);
            let mut l = dry + loop_l * mix;
            let mut r = dry + loop_r * mix;
            l += soft_saturate(self.last_output.0, FEEDBACK_DRIVE) * feedback;
            r += soft_saturate(self.last_output.1, FEEDBACK_DRIVE) * feedback;

            let (eq_l, eq_r) = self.eq.process_stereo(l, r);
            let (delayed_l, delayed_r) = self.delay.process_stereo(eq_l, eq_r);
            let (mid_l, mid_r) = wet_dry_mix_stereo(eq_l, eq_r, delayed_l, delayed_r, delay_wet);
            let (verb_l, verb_r) = self.reverb.process_stereo(mid_l, mid_r);
            let (out_l_sample, out_r_sample) =
                wet_dry_mix_stereo(mid_l, mid_r, verb_l, verb_r, reverb_wet);

            if out_l_sample.is_finite() && out_r_sample.is_finite() {
                self.last_output = (out_l_sample, out_r_sample);
                *l_out = out_l_sample.clamp(-limit, limit);
                *r_out = out_r_sample.clamp(-limit, limit);
            } else {
                self.recover();
                *l_out = 0.0;
                *r_out = 0.0;
            }
        }

        self.publish();
    }

    /// Apply the structural part of `params`: slicing, recording, voices
    /// and scan.
    fn apply_structure(&mut self, params: &EngineParameters) {
        let min = min_slice_samples(
            min_slice_time_seconds(params.min_slice_time),
            self.config.sample_rate,
        );
        let min_changed = min != self.min_slice_samples;
        self.min_slice_samples = min;
        self.looping = params.looping;

        let mut committed = false;
        if params.recording && !self.recorder.is_recording() {
            self.recorder.start_recording();
            #[cfg(feature = "tracing")]
            tracing::debug!("recording started");
        } else if !params.recording && self.recorder.is_recording() {
            committed = self.recorder.stop_recording(min);
            if committed {
                self.voices.reset_to_start();
                self.scan.reset();
                self.voices
                    .redistribute(self.recorder.slices(), self.recorder.recorded_length());
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    samples = self.recorder.recorded_length(),
                    slices = self.recorder.slices().len(),
                    "take committed"
                );
            }
        }

        if min_changed && !committed && self.recorder.rescan(min) {
            self.voices.clamp_primary_slice(self.recorder.slices().len());
            self.scan.reset();
            self.voices
                .redistribute(self.recorder.slices(), self.recorder.recorded_length());
            #[cfg(feature = "tracing")]
            tracing::debug!(
                min_slice_samples = min,
                slices = self.recorder.slices().len(),
                "rescanned"
            );
        }

        if self.voices.set_voice_count(
            params.voices,
            self.recorder.slices(),
            self.recorder.recorded_length(),
        ) {
            #[cfg(feature = "tracing")]
            tracing::debug!(voices = self.voices.active_count(), "voice count changed");
        }

        if self.scan.value_changed(params.scan) {
            self.voices
                .redistribute(self.recorder.slices(), self.recorder.recorded_length());
        }
        if let Some(target) = self.scan.apply(params.scan, self.recorder.slices()) {
            self.voices
                .jump_primary(target, &self.recorder.slices()[target]);
        }
    }

    fn update_effects(&mut self) {
        let s = &self.smoothed;
        self.eq.set_gains(s.eq_low.get(), s.eq_mid.get(), s.eq_high.get());
        self.delay.set_time_l(s.delay_time_l.get());
        self.delay.set_time_r(s.delay_time_r.get());
        self.delay.set_feedback(s.delay_feedback.get());
        self.reverb.set_room(s.reverb_room.get());
        self.reverb.set_damping(s.reverb_damping.get());
        self.reverb.set_decay(s.reverb_decay.get());
    }

    fn recover(&mut self) {
        self.eq.reset();
        self.delay.reset();
        self.reverb.reset();
        self.last_output = (0.0, 0.0);
        #[cfg(feature = "tracing")]
        tracing::warn!("non-finite output, effect chain reset");
    }

    /// Pick up parameter changes made through any handle now, without
    /// waiting for the next block.
    pub fn sync(&mut self) {
        let params = self.handle.snapshot();
        self.apply_structure(&params);
        self.publish();
    }

    fn publish(&self) {
        self.handle.publish(self.status());
    }

    forward_setters! {
        /// Arm (`true`) or commit (`false`) a recording.
        set_recording(bool);
        /// Enable or mute loop playback. Muted voices hold their position.
        set_looping(bool);
        /// Minimum slice time knob, 0 to 1. Re-slices a committed take.
        set_min_slice_time(f32);
        /// Scan position, 0 to 1.
        set_scan(f32);
        /// Loop feedback, 0 to 0.95.
        set_feedback(f32);
        /// Input/loop mix, 0 to 1.
        set_mix(f32);
        /// Playback speed, -8 to 8.
        set_speed(f32);
        /// Active voices, 1 to 8.
        set_voices(usize);
        /// Low shelf gain in dB.
        set_eq_low(f32);
        /// Mid peak gain in dB.
        set_eq_mid(f32);
        /// High shelf gain in dB.
        set_eq_high(f32);
        /// Left delay time in seconds.
        set_delay_time_l(f32);
        /// Right delay time in seconds.
        set_delay_time_r(f32);
        /// Delay feedback, 0 to 0.95.
        set_delay_feedback(f32);
        /// Delay wet/dry, 0 to 1.
        set_delay_wet(f32);
        /// Reverb room size, 0 to 1.
        set_reverb_room(f32);
        /// Reverb damping, 0 to 1.
        set_reverb_damping(f32);
        /// Reverb decay, 0 to 1.
        set_reverb_decay(f32);
        /// Reverb wet/dry, 0 to 1.
        set_reverb_wet(f32);
    }

    /// Replace every parameter (clamped) and jump straight to the new
    /// values without smoothing.
    pub fn apply_parameters(&mut self, params: EngineParameters) {
        self.handle.replace(params);
        let params = self.handle.snapshot();
        self.smoothed.snap_to(&params);
        self.update_effects();
        self.sync();
    }

    /// Drop the recording and silence every stage.
    ///
    /// Parameters are kept, except that recording is disarmed and the voice
    /// count returns to 1.
    pub fn clear(&mut self) {
        self.handle.set_recording(false);
        self.handle.set_voices(1);
        self.recorder.clear();
        self.voices.set_voice_count(1, &[], 0);
        self.voices.reset_to_start();
        self.scan.reset();
        self.eq.reset();
        self.delay.reset();
        self.reverb.reset();
        self.last_output = (0.0, 0.0);
        self.sync();
        #[cfg(feature = "tracing")]
        tracing::debug!("engine cleared");
    }

    /// Clonable handle for changing parameters from other threads.
    pub fn handle(&self) -> ParamHandle {
        self.handle.clone()
    }

    /// Current (unsmoothed) parameters.
    pub fn parameters(&self) -> EngineParameters {
        self.handle.snapshot()
    }

    /// Construction settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Slices in the committed take.
    pub fn num_slices(&self) -> usize {
        self.recorder.slices().len()
    }

    /// Slice the primary voice is bound to.
    pub fn current_slice(&self) -> usize {
        self.voices.primary().slice_index
    }

    /// Active voices.
    pub fn num_voices(&self) -> usize {
        self.voices.active_count()
    }

    /// Whether a take is in progress.
    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    /// Samples in the committed take.
    pub fn recorded_length(&self) -> usize {
        self.recorder.recorded_length()
    }

    /// Slices of the committed take.
    pub fn slices(&self) -> &[Slice] {
        self.recorder.slices()
    }

    /// Minimum slice length currently applied, in samples.
    pub fn min_slice_samples(&self) -> usize {
        self.min_slice_samples
    }

    /// Voice state, primary first.
    pub fn voices(&self) -> &[crate::voice::Voice] {
        self.voices.voices()
    }

    /// All queries at once.
    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            num_slices: self.num_slices(),
            current_slice: self.current_slice(),
            num_voices: self.num_voices(),
            recording: self.is_recording(),
            recorded_length: self.recorded_length(),
        }
    }
}
