//! Slicer Core - DSP primitives for the loop slicer
//!
//! The building blocks shared by the EQ, echo and reverb stages and by the
//! loop engine. Everything here runs in the audio path, so nothing allocates
//! after construction.
//!
//! # Core Abstractions
//!
//! - [`Effect`] - Object-safe stereo processor trait
//! - [`SmoothedParam`] - One-pole smoothing, per sample or per block
//!
//! ## Filters
//!
//! - [`Biquad`] - Second-order IIR with RBJ cookbook shelf and peak
//!   coefficients ([`low_shelf_coefficients`], [`peaking_eq_coefficients`],
//!   [`high_shelf_coefficients`])
//! - [`CombFilter`] - Feedback comb with damping for Freeverb-style reverbs
//! - [`AllpassFilter`] - Schroeder allpass for diffusion
//! - [`OnePole`] - 6 dB/oct highpass
//!
//! ## Delay Lines
//!
//! - [`DelayLine`] - Fixed-capacity circular buffer with whole-sample taps
//!
//! ## Utilities
//!
//! - [`db_to_linear`], [`soft_saturate`], [`flush_denormal`], [`sanitize`],
//!   [`wet_dry_mix`]
//!
//! # no_std Support
//!
//! Disable the default `std` feature to build for targets without `std`:
//!
//! ```toml
//! [dependencies]
//! slicer-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod biquad;
pub mod comb;
pub mod delay;
pub mod effect;
pub mod math;
pub mod one_pole;
pub mod param;

pub use allpass::AllpassFilter;
pub use biquad::{
    Biquad, Coefficients, high_shelf_coefficients, low_shelf_coefficients,
    peaking_eq_coefficients,
};
pub use comb::{CombFilter, MAX_COMB_FEEDBACK};
pub use delay::DelayLine;
pub use effect::Effect;
pub use math::{
    db_to_linear, flush_denormal, sanitize, soft_clip, soft_saturate, wet_dry_mix,
    wet_dry_mix_stereo,
};
pub use one_pole::OnePole;
pub use param::SmoothedParam;
