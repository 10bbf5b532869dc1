//! Parameter smoothing for click-free control changes.
//!
//! Control values arrive once per render block, so smoothing here is usually
//! advanced once per block rather than once per sample. [`SmoothedParam`]
//! supports both: build it with a fixed per-step coefficient through
//! [`SmoothedParam::with_coefficient`] and call
//! [`advance`](SmoothedParam::advance) at whichever rate fits.
//!
//! ## Usage
//!
//! ```rust
//! use slicer_core::SmoothedParam;
//!
//! // Per-block smoothing: move 20% of the remaining distance each block.
//! let mut mix = SmoothedParam::with_coefficient(0.0, 0.2);
//! mix.set_target(1.0);
//!
//! let first = mix.advance();
//! assert!((first - 0.2).abs() < 1e-6);
//! ```

/// A value that approaches its target exponentially.
///
/// `y[n] = y[n-1] + coeff * (target - y[n-1])`. A coefficient of 1.0 is an
/// instant change, values toward 0.0 are slower.
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    current: f32,
    target: f32,
    coeff: f32,
}

impl SmoothedParam {
    /// Create a parameter with no smoothing (instant changes).
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            coeff: 1.0,
        }
    }

    /// Create a parameter that moves `coeff` of the remaining distance per
    /// [`advance`](Self::advance) call.
    ///
    /// `coeff` is clamped to `[0.0, 1.0]`.
    pub fn with_coefficient(initial: f32, coeff: f32) -> Self {
        let mut param = Self::new(initial);
        param.set_coefficient(coeff);
        param
    }

    /// Set the per-step smoothing coefficient.
    pub fn set_coefficient(&mut self, coeff: f32) {
        self.coeff = coeff.clamp(0.0, 1.0);
    }

    /// Get the per-step smoothing coefficient.
    #[inline]
    pub fn coefficient(&self) -> f32 {
        self.coeff
    }

    /// Set the value to smooth towards.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Set target and current value at once.
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.current = value;
    }

    /// Advance one step and return the new value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.current += self.coeff * (self.target - self.current);
        self.current
    }

    /// Current smoothed value.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Whether the current value is within 1e-6 of the target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        (self.current - self.target).abs() < 1e-6
    }

    /// Jump to the target.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }
}

impl Default for SmoothedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}
