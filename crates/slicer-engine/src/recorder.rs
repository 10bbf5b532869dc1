//! Loop recording with staged commit.
//!
//! While recording, input goes to a staging buffer and its slices to a
//! staging list, so the committed take keeps playing untouched. Stopping
//! swaps the staging and committed storage; nothing is copied or allocated.

use crate::slice::{MAX_SLICES, Slice, SliceDetector};

/// Recorder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    /// Not recording; the committed take (if any) is playable.
    Idle,
    /// Appending input to the staging buffer.
    Recording,
}

/// Owns the committed loop buffer, the staging buffer, and both slice
/// lists.
///
/// # Example
///
/// ```rust
/// use slicer_engine::LoopRecorder;
///
/// let mut recorder = LoopRecorder::new(48_000, 0.5);
/// recorder.start_recording();
/// for i in 0..4800 {
///     recorder.record(if i % 1200 == 0 { 1.0 } else { 0.1 }, 100);
/// }
/// assert!(recorder.stop_recording(100));
/// assert_eq!(recorder.recorded_length(), 4800);
/// assert_eq!(recorder.slices().len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct LoopRecorder {
    buffer: Vec<f32>,
    recorded_len: usize,
    slices: Vec<Slice>,

    temp: Vec<f32>,
    temp_len: usize,
    // Prefix of `temp` holding stale data from an earlier take
    temp_dirty: usize,
    temp_slices: Vec<Slice>,
    // Minimum length the take's slices were closed with, and whether it
    // moved during the take
    take_min: Option<usize>,
    take_min_moved: bool,

    detector: SliceDetector,
    state: RecorderState,
}

impl LoopRecorder {
    /// Preallocate both buffers with `capacity` samples (at least 1) and
    /// both slice lists with [`MAX_SLICES`] entries.
    pub fn new(capacity: usize, threshold: f32) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: vec![0.0; capacity],
            recorded_len: 0,
            slices: Vec::with_capacity(MAX_SLICES),
            temp: vec![0.0; capacity],
            temp_len: 0,
            temp_dirty: 0,
            temp_slices: Vec::with_capacity(MAX_SLICES),
            take_min: None,
            take_min_moved: false,
            detector: SliceDetector::new(threshold),
            state: RecorderState::Idle,
        }
    }

    /// Begin a new take. Returns `false` if already recording.
    pub fn start_recording(&mut self) -> bool {
        if self.state == RecorderState::Recording {
            return false;
        }
        self.temp[..self.temp_dirty].fill(0.0);
        self.temp_dirty = 0;
        self.temp_len = 0;
        self.temp_slices.clear();
        self.take_min = None;
        self.take_min_moved = false;
        self.detector.reset();
        self.state = RecorderState::Recording;
        true
    }

    /// Append one sample to the take and run onset detection on it.
    ///
    /// Does nothing when idle. Samples past capacity are dropped.
    #[inline]
    pub fn record(&mut self, sample: f32, min_slice_samples: usize) {
        if self.state != RecorderState::Recording || self.temp_len >= self.temp.len() {
            return;
        }
        match self.take_min {
            None => self.take_min = Some(min_slice_samples),
            Some(min) if min != min_slice_samples => self.take_min_moved = true,
            Some(_) => {}
        }
        let pos = self.temp_len;
        self.temp[pos] = sample;
        self.detector
            .step(&mut self.temp_slices, pos, sample, min_slice_samples);
        self.temp_len += 1;
        self.temp_dirty = self.temp_dirty.max(self.temp_len);
    }

    /// Close the open slice and commit the take.
    ///
    /// Returns `false` (and changes nothing) if not recording. An empty
    /// take still commits, leaving no recording. If the take was sliced
    /// under a different minimum than `min_slice_samples`, the committed
    /// take is re-sliced so every slice meets the current minimum.
    pub fn stop_recording(&mut self, min_slice_samples: usize) -> bool {
        if self.state != RecorderState::Recording {
            return false;
        }
        self.detector.finish(
            &mut self.temp_slices,
            &self.temp[..self.temp_len],
            min_slice_samples,
        );

        core::mem::swap(&mut self.buffer, &mut self.temp);
        core::mem::swap(&mut self.slices, &mut self.temp_slices);
        // The old committed take now sits in the staging buffer
        self.temp_dirty = self.recorded_len;
        self.recorded_len = self.temp_len;
        self.temp_len = 0;
        self.temp_slices.clear();
        self.state = RecorderState::Idle;

        let stale = self.take_min_moved
            || self.take_min.is_some_and(|min| min != min_slice_samples);
        if stale {
            self.rescan(min_slice_samples);
        }
        true
    }

    /// Re-slice the committed take with a new minimum length.
    ///
    /// Returns `false` while recording or when nothing is committed.
    pub fn rescan(&mut self, min_slice_samples: usize) -> bool {
        if self.state == RecorderState::Recording || self.recorded_len == 0 {
            return false;
        }
        self.detector.rescan_into(
            &mut self.slices,
            &self.buffer[..self.recorded_len],
            min_slice_samples,
        );
        true
    }

    /// Drop the committed take and any take in progress.
    pub fn clear(&mut self) {
        self.buffer[..self.recorded_len].fill(0.0);
        self.temp[..self.temp_dirty].fill(0.0);
        self.recorded_len = 0;
        self.temp_len = 0;
        self.temp_dirty = 0;
        self.slices.clear();
        self.temp_slices.clear();
        self.take_min = None;
        self.take_min_moved = false;
        self.detector.reset();
        self.state = RecorderState::Idle;
    }

    /// Current state.
    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// Whether a take is in progress.
    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    /// Valid samples in the committed buffer.
    pub fn recorded_length(&self) -> usize {
        self.recorded_len
    }

    /// Samples captured so far in the take in progress.
    pub fn take_length(&self) -> usize {
        self.temp_len
    }

    /// Buffer capacity in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// The committed recording.
    pub fn buffer(&self) -> &[f32] {
        &self.buffer[..self.recorded_len]
    }

    /// Slices of the committed recording.
    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    /// Onset threshold in use.
    pub fn threshold(&self) -> f32 {
        self.detector.threshold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_all(recorder: &mut LoopRecorder, samples: &[f32], min: usize) {
        for &x in samples {
            recorder.record(x, min);
        }
    }

    fn pulse_take() -> Vec<f32> {
        let mut take = vec![0.0f32; 1000];
        take[100..200].fill(1.0);
        take
    }

    #[test]
    fn idle_ignores_input() {
        let mut recorder = LoopRecorder::new(100, 0.5);
        recorder.record(1.0, 1);
        assert_eq!(recorder.take_length(), 0);
        assert!(!recorder.stop_recording(1));
        assert_eq!(recorder.state(), RecorderState::Idle);
    }

    #[test]
    fn commit_swaps_take_in() {
        let mut recorder = LoopRecorder::new(2000, 0.5);
        assert!(recorder.start_recording());
        assert!(!recorder.start_recording());
        record_all(&mut recorder, &pulse_take(), 10);

        // Nothing is visible until the take is committed
        assert_eq!(recorder.recorded_length(), 0);
        assert!(recorder.slices().is_empty());

        assert!(recorder.stop_recording(10));
        assert_eq!(recorder.recorded_length(), 1000);
        assert_eq!(recorder.buffer()[150], 1.0);
        assert_eq!(recorder.slices().len(), 1);
        assert_eq!(recorder.slices()[0].end_sample, 199);
    }

    #[test]
    fn new_take_leaves_committed_take_playing() {
        let mut recorder = LoopRecorder::new(2000, 0.5);
        recorder.start_recording();
        record_all(&mut recorder, &pulse_take(), 10);
        recorder.stop_recording(10);

        recorder.start_recording();
        record_all(&mut recorder, &[0.0; 300], 10);
        assert_eq!(recorder.recorded_length(), 1000);
        assert_eq!(recorder.slices().len(), 1);
        assert_eq!(recorder.take_length(), 300);

        recorder.stop_recording(10);
        assert_eq!(recorder.recorded_length(), 300);
        assert!(recorder.slices().is_empty());
    }

    #[test]
    fn staging_is_zeroed_between_takes() {
        let mut recorder = LoopRecorder::new(1000, 0.5);
        recorder.start_recording();
        record_all(&mut recorder, &[0.7; 800], 10);
        recorder.stop_recording(10);
        recorder.start_recording();
        record_all(&mut recorder, &[0.2; 10], 10);
        recorder.stop_recording(10);
        // The first take's buffer is the staging buffer again
        recorder.start_recording();
        assert!(recorder.temp.iter().all(|&x| x == 0.0));
        recorder.stop_recording(10);
        recorder.start_recording();
        assert!(recorder.temp.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn capacity_overflow_is_dropped() {
        let mut recorder = LoopRecorder::new(500, 0.5);
        recorder.start_recording();
        record_all(&mut recorder, &[0.3; 800], 10);
        assert_eq!(recorder.take_length(), 500);
        recorder.stop_recording(10);
        assert_eq!(recorder.recorded_length(), 500);
    }

    #[test]
    fn rescan_applies_new_minimum() {
        let mut take = vec![0.1f32; 4800];
        for onset in [0, 480, 1500, 2000, 3500] {
            take[onset] = 1.0;
        }
        let mut recorder = LoopRecorder::new(4800, 0.5);
        recorder.start_recording();
        record_all(&mut recorder, &take, 100);
        recorder.stop_recording(100);
        assert_eq!(recorder.slices().len(), 5);

        assert!(recorder.rescan(1000));
        let bounds: Vec<_> = recorder
            .slices()
            .iter()
            .map(|s| (s.start_sample, s.end_sample))
            .collect();
        assert_eq!(bounds, vec![(480, 1499), (2000, 3499), (3500, 4799)]);
        assert!(recorder.slices().iter().all(|s| s.len_samples() >= 1000));
    }

    #[test]
    fn commit_reslices_when_minimum_moved_during_take() {
        let mut take = vec![0.1f32; 4800];
        for onset in [0, 480, 1500, 2000, 3500] {
            take[onset] = 1.0;
        }
        let expected = vec![(480, 1499), (2000, 3499), (3500, 4799)];
        let bounds = |recorder: &LoopRecorder| -> Vec<_> {
            recorder
                .slices()
                .iter()
                .map(|s| (s.start_sample, s.end_sample))
                .collect()
        };

        // Minimum raised halfway through the take
        let mut recorder = LoopRecorder::new(4800, 0.5);
        recorder.start_recording();
        record_all(&mut recorder, &take[..2400], 100);
        record_all(&mut recorder, &take[2400..], 1000);
        assert!(recorder.stop_recording(1000));
        assert_eq!(bounds(&recorder), expected);

        // Minimum raised between the last sample and the commit
        let mut recorder = LoopRecorder::new(4800, 0.5);
        recorder.start_recording();
        record_all(&mut recorder, &take, 100);
        assert!(recorder.stop_recording(1000));
        assert_eq!(bounds(&recorder), expected);
        assert!(recorder.slices().iter().all(|s| s.len_samples() >= 1000));
    }

    #[test]
    fn rescan_requires_committed_idle_take() {
        let mut recorder = LoopRecorder::new(100, 0.5);
        assert!(!recorder.rescan(1));
        recorder.start_recording();
        recorder.record(1.0, 1);
        assert!(!recorder.rescan(1));
    }

    #[test]
    fn clear_drops_everything() {
        let mut recorder = LoopRecorder::new(2000, 0.5);
        recorder.start_recording();
        record_all(&mut recorder, &pulse_take(), 10);
        recorder.stop_recording(10);
        recorder.start_recording();
        recorder.clear();
        assert!(!recorder.is_recording());
        assert_eq!(recorder.recorded_length(), 0);
        assert!(recorder.slices().is_empty());
        assert!(recorder.buffer().is_empty());
    }
}
