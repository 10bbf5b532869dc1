//! Slicer Effects - the post-player processing chain
//!
//! The three stages the loop engine runs after mixing, in order:
//!
//! - [`ThreeBandEq`] - Low shelf, mid peak and high shelf per channel
//! - [`StereoDelay`] - Independent left/right times, shared feedback
//! - [`StereoReverb`] - Freeverb-style combs, allpasses and DC-blocking highpass
//!
//! Every stage implements [`slicer_core::Effect`] and returns its processed
//! (wet) signal; the engine does the wet/dry blending between stages.
//!
//! ## Example
//!
//! ```rust
//! use slicer_core::{Effect, wet_dry_mix};
//! use slicer_effects::{StereoDelay, StereoReverb, ThreeBandEq};
//!
//! let mut eq = ThreeBandEq::new(48000.0);
//! let mut delay = StereoDelay::new(48000.0);
//! let mut reverb = StereoReverb::new(48000.0);
//!
//! let (l, r) = eq.process_stereo(0.5, 0.5);
//! let (dl, dr) = delay.process_stereo(l, r);
//! let (l, r) = (wet_dry_mix(l, dl, 0.3), wet_dry_mix(r, dr, 0.3));
//! let (rl, rr) = reverb.process_stereo(l, r);
//! let out = (wet_dry_mix(l, rl, 0.2), wet_dry_mix(r, rr, 0.2));
//! assert!(out.0.is_finite() && out.1.is_finite());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod delay;
pub mod eq;
pub mod reverb;

pub use delay::{DEFAULT_DELAY_CAPACITY, MAX_DELAY_FEEDBACK, MIN_DELAY_SECONDS, StereoDelay};
pub use eq::{EQ_GAIN_RANGE_DB, EqFrequencies, ThreeBandEq};
pub use reverb::StereoReverb;
