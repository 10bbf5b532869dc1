//! Three-band shelving/peaking equalizer.
//!
//! Low shelf, mid peak and high shelf in cascade, one filter set per channel.

use slicer_core::{
    Biquad, Effect, high_shelf_coefficients, low_shelf_coefficients, peaking_eq_coefficients,
};

/// Gain range of each band in dB.
pub const EQ_GAIN_RANGE_DB: f32 = 20.0;

/// Q shared by all three bands.
const BAND_Q: f32 = 0.707;

/// Gains closer than this (in dB) do not trigger a coefficient update.
const GAIN_EPSILON_DB: f32 = 1e-4;

/// Corner frequencies of the three bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqFrequencies {
    /// Low shelf corner in Hz.
    pub low_hz: f32,
    /// Mid peak center in Hz.
    pub mid_hz: f32,
    /// High shelf corner in Hz.
    pub high_hz: f32,
}

impl Default for EqFrequencies {
    fn default() -> Self {
        Self {
            low_hz: 200.0,
            mid_hz: 2000.0,
            high_hz: 8000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BandShape {
    LowShelf,
    Peak,
    HighShelf,
}

#[derive(Debug, Clone)]
struct Band {
    shape: BandShape,
    freq: f32,
    gain_db: f32,
    left: Biquad,
    right: Biquad,
}

impl Band {
    fn new(shape: BandShape, freq: f32) -> Self {
        Self {
            shape,
            freq,
            gain_db: 0.0,
            left: Biquad::new(),
            right: Biquad::new(),
        }
    }

    /// Returns true when new coefficients were computed.
    fn set_gain(&mut self, gain_db: f32, sample_rate: f32) -> bool {
        let gain_db = if gain_db.is_finite() {
            gain_db.clamp(-EQ_GAIN_RANGE_DB, EQ_GAIN_RANGE_DB)
        } else {
            0.0
        };
        if (gain_db - self.gain_db).abs() <= GAIN_EPSILON_DB {
            return false;
        }
        self.gain_db = gain_db;
        self.update(sample_rate);
        true
    }

    fn update(&mut self, sample_rate: f32) {
        if self.gain_db.abs() <= GAIN_EPSILON_DB {
            // Flat band: exact identity rather than near-unity coefficients.
            self.left.set_passthrough();
            self.right.set_passthrough();
            return;
        }
        let freq = self.freq.clamp(10.0, sample_rate * 0.45);
        let coefficients = match self.shape {
            BandShape::LowShelf => low_shelf_coefficients(freq, BAND_Q, self.gain_db, sample_rate),
            BandShape::Peak => peaking_eq_coefficients(freq, BAND_Q, self.gain_db, sample_rate),
            BandShape::HighShelf => {
                high_shelf_coefficients(freq, BAND_Q, self.gain_db, sample_rate)
            }
        };
        self.left.apply(coefficients);
        self.right.apply(coefficients);
    }

    #[inline]
    fn process(&mut self, left: f32, right: f32) -> (f32, f32) {
        (self.left.process(left), self.right.process(right))
    }

    fn clear(&mut self) {
        self.left.clear();
        self.right.clear();
    }
}

/// Stereo three-band EQ.
///
/// Coefficients are recomputed only when a gain actually changes, so
/// calling [`set_gains`](Self::set_gains) once per block with unchanged
/// values costs three comparisons. A band at 0 dB is bypassed exactly.
///
/// # Example
///
/// ```rust
/// use slicer_core::Effect;
/// use slicer_effects::ThreeBandEq;
///
/// let mut eq = ThreeBandEq::new(48000.0);
/// assert_eq!(eq.process_stereo(0.3, -0.2), (0.3, -0.2));
///
/// eq.set_gains(6.0, 0.0, -3.0);
/// let (l, r) = eq.process_stereo(0.3, -0.2);
/// assert!(l.is_finite() && r.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct ThreeBandEq {
    bands: [Band; 3],
    sample_rate: f32,
}

impl ThreeBandEq {
    /// Create a flat EQ with the default corners (200 Hz, 2 kHz, 8 kHz).
    pub fn new(sample_rate: f32) -> Self {
        Self::with_frequencies(sample_rate, EqFrequencies::default())
    }

    /// Create a flat EQ with custom corner frequencies.
    pub fn with_frequencies(sample_rate: f32, frequencies: EqFrequencies) -> Self {
        Self {
            bands: [
                Band::new(BandShape::LowShelf, frequencies.low_hz),
                Band::new(BandShape::Peak, frequencies.mid_hz),
                Band::new(BandShape::HighShelf, frequencies.high_hz),
            ],
            sample_rate,
        }
    }

    /// Set all three gains in dB, clamped to ±20 dB.
    ///
    /// Returns the number of bands whose coefficients were recomputed.
    pub fn set_gains(&mut self, low_db: f32, mid_db: f32, high_db: f32) -> usize {
        let mut updated = 0;
        for (band, gain) in self.bands.iter_mut().zip([low_db, mid_db, high_db]) {
            if band.set_gain(gain, self.sample_rate) {
                updated += 1;
            }
        }
        updated
    }

    /// Current gains `(low, mid, high)` in dB.
    pub fn gains(&self) -> (f32, f32, f32) {
        (
            self.bands[0].gain_db,
            self.bands[1].gain_db,
            self.bands[2].gain_db,
        )
    }

    /// Corner frequencies in use.
    pub fn frequencies(&self) -> EqFrequencies {
        EqFrequencies {
            low_hz: self.bands[0].freq,
            mid_hz: self.bands[1].freq,
            high_hz: self.bands[2].freq,
        }
    }
}

impl Effect for ThreeBandEq {
    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let mut frame = (left, right);
        for band in &mut self.bands {
            frame = band.process(frame.0, frame.1);
        }
        frame
    }

    fn reset(&mut self) {
        for band in &mut self.bands {
            band.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, n: usize) -> impl Iterator<Item = f32> {
        (0..n).map(move |i| (2.0 * std::f32::consts::PI * freq * i as f32 / 48000.0).sin())
    }

    fn steady_peak(eq: &mut ThreeBandEq, freq: f32) -> f32 {
        let mut peak = 0.0f32;
        for (i, x) in sine(freq, 48000).enumerate() {
            let (l, _) = eq.process_stereo(x, x);
            if i > 24000 {
                peak = peak.max(l.abs());
            }
        }
        peak
    }

    #[test]
    fn flat_is_identity() {
        let mut eq = ThreeBandEq::new(48000.0);
        for x in [0.0, 1.0, -0.7, 3.5, 1e-6] {
            assert_eq!(eq.process_stereo(x, -x), (x, -x));
        }
    }

    #[test]
    fn returning_to_zero_restores_identity() {
        let mut eq = ThreeBandEq::new(48000.0);
        eq.set_gains(12.0, -6.0, 3.0);
        for x in sine(440.0, 512) {
            eq.process_stereo(x, x);
        }
        eq.set_gains(0.0, 0.0, 0.0);
        assert_eq!(eq.process_stereo(0.25, 0.5), (0.25, 0.5));
    }

    #[test]
    fn low_boost_raises_bass() {
        let mut eq = ThreeBandEq::new(48000.0);
        eq.set_gains(12.0, 0.0, 0.0);
        let peak = steady_peak(&mut eq, 50.0);
        assert!(peak > 3.0, "50 Hz should be boosted ~4x, got {peak}");
    }

    #[test]
    fn high_cut_lowers_treble() {
        let mut eq = ThreeBandEq::new(48000.0);
        eq.set_gains(0.0, 0.0, -12.0);
        let peak = steady_peak(&mut eq, 16000.0);
        assert!(peak < 0.35, "16 kHz should be cut, got {peak}");
    }

    #[test]
    fn gains_are_clamped_and_cached() {
        let mut eq = ThreeBandEq::new(48000.0);
        assert_eq!(eq.set_gains(50.0, -50.0, f32::NAN), 2);
        assert_eq!(eq.gains(), (20.0, -20.0, 0.0));
        assert_eq!(eq.set_gains(20.0, -20.0, 0.0), 0);
    }

    #[test]
    fn channels_are_independent() {
        let mut eq = ThreeBandEq::new(48000.0);
        eq.set_gains(6.0, 6.0, 6.0);
        for _ in 0..100 {
            let (_, r) = eq.process_stereo(1.0, 0.0);
            assert_eq!(r, 0.0);
        }
    }

    #[test]
    fn reset_clears_history() {
        let mut eq = ThreeBandEq::new(48000.0);
        eq.set_gains(6.0, 6.0, 6.0);
        eq.process_stereo(1.0, 1.0);
        eq.reset();
        assert_eq!(eq.process_stereo(0.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn custom_frequencies() {
        let bands = EqFrequencies {
            low_hz: 80.0,
            mid_hz: 2500.0,
            high_hz: 12000.0,
        };
        let eq = ThreeBandEq::with_frequencies(44100.0, bands);
        assert_eq!(eq.frequencies(), bands);
    }
}
