//! Property-based tests for the slicer engine.
//!
//! Covers slice list invariants for arbitrary recordings, voice binding
//! after resizing, output bounds for arbitrary parameters, and committed
//! slice lengths when the minimum moves during a take.

use proptest::prelude::*;
use slicer_engine::{
    Engine, EngineConfig, EngineParameters, PanMode, SliceDetector, VoicePool,
};

fn arb_parameters() -> impl Strategy<Value = EngineParameters> {
    (
        (0.0f32..=1.0, 0.0f32..=1.0, 0.0f32..=1.0, 0.0f32..=0.95, -8.0f32..=8.0, 1usize..=8),
        (-20.0f32..=20.0, -20.0f32..=20.0, -20.0f32..=20.0),
        (0.001f32..=2.0, 0.001f32..=2.0, 0.0f32..=0.95, 0.0f32..=1.0),
        (0.0f32..=1.0, 0.0f32..=1.0, 0.0f32..=1.0, 0.0f32..=1.0),
    )
        .prop_map(|(base, eq, delay, reverb)| EngineParameters {
            recording: false,
            looping: true,
            min_slice_time: base.0,
            scan: base.1,
            mix: base.2,
            feedback: base.3,
            speed: base.4,
            voices: base.5,
            eq_low_db: eq.0,
            eq_mid_db: eq.1,
            eq_high_db: eq.2,
            delay_time_l: delay.0,
            delay_time_r: delay.1,
            delay_feedback: delay.2,
            delay_wet: delay.3,
            reverb_room: reverb.0,
            reverb_damping: reverb.1,
            reverb_decay: reverb.2,
            reverb_wet: reverb.3,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Slices come out ordered, disjoint, in bounds and at least `min` long.
    #[test]
    fn slice_list_invariants(
        buffer in prop::collection::vec(-1.5f32..=1.5f32, 0..4000),
        threshold in 0.05f32..=1.0f32,
        min in 1usize..200,
    ) {
        let slices = SliceDetector::detect(&buffer, threshold, min);
        for slice in &slices {
            prop_assert!(slice.active);
            prop_assert!(slice.start_sample <= slice.end_sample);
            prop_assert!(slice.end_sample < buffer.len());
            prop_assert!(slice.len_samples() >= min);
            prop_assert!(slice.peak_amplitude >= threshold);
        }
        for pair in slices.windows(2) {
            prop_assert!(pair[0].end_sample < pair[1].start_sample);
        }
    }

    /// Silence never yields a slice.
    #[test]
    fn silence_has_no_slices(len in 0usize..20_000, threshold in 1e-4f32..=1.0f32) {
        prop_assert!(SliceDetector::detect(&vec![0.0; len], threshold, 1).is_empty());
    }

    /// Resizing to any count binds every voice to a playable slice.
    #[test]
    fn resize_binds_playable_slices(
        seed in any::<u64>(),
        count in 1usize..=8,
        spacing in 50usize..2000,
    ) {
        let buffer: Vec<f32> = (0..20_000)
            .map(|i| if i % spacing == 0 { 1.0 } else { 0.1 })
            .collect();
        let slices = SliceDetector::detect(&buffer, 0.5, 10);
        prop_assume!(!slices.is_empty());

        let mut pool = VoicePool::new(Some(seed), 2.0, PanMode::Alternate);
        pool.set_voice_count(count, &slices, buffer.len());
        prop_assert_eq!(pool.voices().len(), count);
        for voice in pool.voices() {
            prop_assert!(slices[voice.slice_index].is_playable(buffer.len()));
        }
    }

    /// Output is finite and within the limit for any parameters and input.
    #[test]
    fn output_is_bounded(
        params in arb_parameters(),
        input in prop::collection::vec(-4.0f32..=4.0f32, 256),
        seed in any::<u64>(),
    ) {
        let mut engine = Engine::with_parameters(
            EngineConfig {
                loop_seconds: 0.5,
                seed: Some(seed),
                ..EngineConfig::default()
            },
            params,
        )
        .expect("valid config");

        let mut left = vec![0.0; input.len()];
        let mut right = vec![0.0; input.len()];

        engine.set_recording(true);
        for _ in 0..8 {
            engine.process(&input, &mut left, &mut right);
        }
        engine.set_recording(false);
        for _ in 0..16 {
            engine.process(&input, &mut left, &mut right);
            for (&l, &r) in left.iter().zip(&right) {
                prop_assert!(l.is_finite() && r.is_finite());
                prop_assert!(l.abs() <= 10.0 && r.abs() <= 10.0);
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Every committed slice meets the minimum in force at commit, however
    /// the knob moved while the take was recording.
    #[test]
    fn committed_slices_meet_minimum_after_knob_moves(
        spacing in 100usize..3000,
        start_knob in 0.0f32..=0.5,
        end_knob in 0.0f32..=0.5,
        switch_block in 0usize..94,
        seed in any::<u64>(),
    ) {
        let mut engine = Engine::new(EngineConfig {
            loop_seconds: 0.5,
            seed: Some(seed),
            ..EngineConfig::default()
        })
        .expect("valid config");
        engine.set_min_slice_time(start_knob);

        let take: Vec<f32> = (0..24_000)
            .map(|i| if i % spacing == 0 { 1.0 } else { 0.1 })
            .collect();
        let mut left = vec![0.0; 256];
        let mut right = vec![0.0; 256];

        engine.set_recording(true);
        for (block, x) in take.chunks(256).enumerate() {
            if block == switch_block {
                engine.set_min_slice_time(end_knob);
            }
            let n = x.len();
            engine.process(x, &mut left[..n], &mut right[..n]);
        }
        engine.set_recording(false);

        let min = engine.min_slice_samples();
        for slice in engine.slices() {
            prop_assert!(slice.len_samples() >= min);
        }
        for pair in engine.slices().windows(2) {
            prop_assert!(pair[0].end_sample < pair[1].start_sample);
        }
    }
}
