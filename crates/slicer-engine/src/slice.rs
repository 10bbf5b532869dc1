//! Onset slicing.
//!
//! A slice runs from one rising threshold crossing of `|x|` to the sample
//! before the next one, or to the end of the recording. Fragments shorter
//! than the minimum slice length are discarded, which merges them into the
//! following onset.
//!
//! The same [`SliceDetector`] runs incrementally while recording
//! ([`step`](SliceDetector::step) per sample, then
//! [`finish`](SliceDetector::finish)) and as a batch pass over a committed
//! buffer ([`rescan_into`](SliceDetector::rescan_into)).

use serde::{Deserialize, Serialize};

/// Most slices a recording can hold. Later onsets are ignored.
pub const MAX_SLICES: usize = 65_536;

/// Samples quieter than this at the end of a recording are not part of the
/// final slice.
pub const SILENCE_FLOOR: f32 = 1e-6;

/// Default onset threshold on `|x|`.
pub const DEFAULT_ONSET_THRESHOLD: f32 = 0.5;

/// A detected region of the loop buffer, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Slice {
    /// First sample of the slice.
    pub start_sample: usize,
    /// Last sample of the slice. Zero while the slice is still open.
    pub end_sample: usize,
    /// Largest `|x|` seen inside the slice.
    pub peak_amplitude: f32,
    /// Whether the slice may be played.
    pub active: bool,
}

impl Slice {
    fn open_at(start_sample: usize) -> Self {
        Self {
            start_sample,
            end_sample: 0,
            peak_amplitude: 0.0,
            active: true,
        }
    }

    /// Length in samples, `end - start + 1`. Not meaningful while the slice
    /// is still open.
    pub fn len_samples(&self) -> usize {
        if self.end_sample < self.start_sample {
            0
        } else {
            self.end_sample - self.start_sample + 1
        }
    }

    /// Whether `position` falls inside the slice.
    pub fn contains(&self, position: usize) -> bool {
        (self.start_sample..=self.end_sample).contains(&position)
    }

    /// Whether a voice may be bound to this slice of a recording of
    /// `recorded_len` samples.
    pub fn is_playable(&self, recorded_len: usize) -> bool {
        self.active && self.start_sample < recorded_len
    }
}

/// Amplitude-threshold onset scanner.
///
/// Holds only the scan state (previous amplitude and whether the last slice
/// in the list is open); the slice list itself belongs to the caller so the
/// recorder can keep separate staging and committed lists.
///
/// # Example
///
/// ```rust
/// use slicer_engine::SliceDetector;
///
/// let mut buffer = vec![0.0f32; 1000];
/// buffer[100..200].fill(1.0);
///
/// let slices = SliceDetector::detect(&buffer, 0.5, 10);
/// assert_eq!(slices.len(), 1);
/// assert_eq!((slices[0].start_sample, slices[0].end_sample), (100, 199));
/// ```
#[derive(Debug, Clone)]
pub struct SliceDetector {
    threshold: f32,
    last_amp: f32,
    open: bool,
}

impl Default for SliceDetector {
    fn default() -> Self {
        Self::new(DEFAULT_ONSET_THRESHOLD)
    }
}

impl SliceDetector {
    /// Create a detector. A non-positive or non-finite threshold falls back
    /// to [`DEFAULT_ONSET_THRESHOLD`].
    pub fn new(threshold: f32) -> Self {
        let threshold = if threshold.is_finite() && threshold > 0.0 {
            threshold
        } else {
            DEFAULT_ONSET_THRESHOLD
        };
        Self {
            threshold,
            last_amp: 0.0,
            open: false,
        }
    }

    /// Onset threshold on `|x|`.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Whether the last slice pushed by this detector is still open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Forget the scan state before a new pass.
    pub fn reset(&mut self) {
        self.last_amp = 0.0;
        self.open = false;
    }

    /// Feed the sample at `pos`.
    ///
    /// Positions must increase by one between calls since the last
    /// [`reset`](Self::reset). Never allocates while `slices` has spare
    /// capacity up to [`MAX_SLICES`].
    #[inline]
    pub fn step(&mut self, slices: &mut Vec<Slice>, pos: usize, sample: f32, min_slice_samples: usize) {
        let amp = sample.abs();

        if self.last_amp < self.threshold && amp >= self.threshold {
            if self.open && pos > 0 {
                self.close(slices, pos - 1, min_slice_samples);
            }
            if slices.len() < MAX_SLICES {
                slices.push(Slice::open_at(pos));
                self.open = true;
            }
        }

        if self.open
            && let Some(last) = slices.last_mut()
        {
            last.peak_amplitude = last.peak_amplitude.max(amp);
        }

        self.last_amp = amp;
    }

    /// Close the open slice at the end of `recorded`, the full recording
    /// fed through [`step`](Self::step).
    ///
    /// Trailing samples below [`SILENCE_FLOOR`] are excluded, so a pulse
    /// followed by digital silence ends on its last audible sample.
    pub fn finish(&mut self, slices: &mut Vec<Slice>, recorded: &[f32], min_slice_samples: usize) {
        if !self.open {
            return;
        }
        let Some(start) = slices.last().map(|s| s.start_sample) else {
            self.open = false;
            return;
        };
        let audible_end = recorded
            .get(start..)
            .and_then(|tail| tail.iter().rposition(|x| x.abs() >= SILENCE_FLOOR))
            .map(|offset| start + offset);

        match audible_end {
            Some(end) => self.close(slices, end, min_slice_samples),
            None => {
                slices.pop();
                self.open = false;
            }
        }
    }

    /// Replace `slices` with a batch scan of `buffer`.
    ///
    /// Reuses the list's allocation.
    pub fn rescan_into(&mut self, slices: &mut Vec<Slice>, buffer: &[f32], min_slice_samples: usize) {
        slices.clear();
        self.reset();
        for (pos, &sample) in buffer.iter().enumerate() {
            self.step(slices, pos, sample, min_slice_samples);
        }
        self.finish(slices, buffer, min_slice_samples);
    }

    /// Batch scan of `buffer` into a new list.
    pub fn detect(buffer: &[f32], threshold: f32, min_slice_samples: usize) -> Vec<Slice> {
        let mut slices = Vec::new();
        Self::new(threshold).rescan_into(&mut slices, buffer, min_slice_samples);
        slices
    }

    fn close(&mut self, slices: &mut Vec<Slice>, end: usize, min_slice_samples: usize) {
        self.open = false;
        let Some(last) = slices.last_mut() else {
            return;
        };
        if end >= last.start_sample && end - last.start_sample + 1 >= min_slice_samples {
            last.end_sample = end;
        } else {
            slices.pop();
        }
    }
}
