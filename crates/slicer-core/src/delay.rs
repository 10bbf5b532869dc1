//! Circular delay line.
//!
//! [`DelayLine`] is the storage behind the echo stage, the reverb combs and
//! the allpass diffusers. Taps are whole samples: a tap of `n` returns the
//! sample written `n` writes ago.
//!
//! # Use Cases
//!
//! | Stage | Length | Tap |
//! |-------|--------|-----|
//! | Echo | up to 2 s | set per channel |
//! | Reverb comb | ~30 ms | full length |
//! | Allpass | ~10 ms | full length |

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Fixed-capacity circular delay line (heap-allocated once).
///
/// # Example
///
/// ```rust
/// use slicer_core::DelayLine;
///
/// let mut delay = DelayLine::new(8);
/// delay.write(1.0);
/// delay.write(0.0);
/// assert_eq!(delay.tap(2), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    /// Creates a delay line holding `capacity` samples (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity.max(1)],
            write_pos: 0,
        }
    }

    /// Returns the sample written `delay` writes ago.
    ///
    /// `delay` is clamped to `[1, capacity]`; a tap of `capacity` returns the
    /// oldest stored sample.
    #[inline]
    pub fn tap(&self, delay: usize) -> f32 {
        let len = self.buffer.len();
        let delay = delay.clamp(1, len);
        self.buffer[(self.write_pos + len - delay) % len]
    }

    /// Returns the oldest stored sample (a tap of the full capacity).
    #[inline]
    pub fn oldest(&self) -> f32 {
        self.buffer[self.write_pos]
    }

    /// Writes a sample and advances the write cursor.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos += 1;
        if self.write_pos == self.buffer.len() {
            self.write_pos = 0;
        }
    }

    /// Zeroes the buffer and rewinds the cursor.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Capacity in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}
