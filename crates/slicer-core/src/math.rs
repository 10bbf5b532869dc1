//! Mathematical utility functions for DSP.
//!
//! All functions are allocation-free and `no_std` friendly.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`]
//!
//! # Saturation
//!
//! | Function | Shape | Use |
//! |----------|-------|-----|
//! | [`soft_clip`] | `tanh(x)` | Bounded output in (-1, 1) |
//! | [`soft_saturate`] | `tanh(x * k) / k` | Unity slope at zero, bounded by `1/k` |
//!
//! # Utilities
//!
//! - [`wet_dry_mix`], [`wet_dry_mix_stereo`]
//! - [`flush_denormal`], [`sanitize`]

use libm::{expf, tanhf};

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use slicer_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Soft clip using hyperbolic tangent. Output is in (-1, 1).
#[inline]
pub fn soft_clip(x: f32) -> f32 {
    tanhf(x)
}

/// Soft saturation with unity slope at the origin.
///
/// `tanh(x * drive) / drive`: small signals pass unchanged and large ones
/// approach `±1/drive`. With `drive = 0.3` the ceiling is about 3.33.
#[inline]
pub fn soft_saturate(x: f32, drive: f32) -> f32 {
    if drive <= 0.0 {
        return x;
    }
    tanhf(x * drive) / drive
}

/// Flush subnormal floats to zero.
///
/// Values below 1e-20 become zero, leaving margin before the IEEE 754
/// subnormal range. Use in feedback loops that decay toward silence.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Replace NaN and infinities with zero.
#[inline]
pub fn sanitize(x: f32) -> f32 {
    if x.is_finite() { x } else { 0.0 }
}

/// Crossfade between dry and wet signals.
///
/// Equivalent to `dry * (1 - mix) + wet * mix`.
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry + (wet - dry) * mix
}

/// Stereo crossfade, [`wet_dry_mix`] per channel.
#[inline]
pub fn wet_dry_mix_stereo(dry_l: f32, dry_r: f32, wet_l: f32, wet_r: f32, mix: f32) -> (f32, f32) {
    (
        wet_dry_mix(dry_l, wet_l, mix),
        wet_dry_mix(dry_r, wet_r, mix),
    )
}
