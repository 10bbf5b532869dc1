//! Manual slice selection.
//!
//! A normalized scan value picks the slice the primary voice loops. Small
//! values disengage scanning so the primary voice keeps whatever slice it
//! is on.

use libm::roundf;

use crate::slice::Slice;

/// Scan values at or below this leave slice selection alone.
pub const SCAN_ENGAGE_THRESHOLD: f32 = 0.01;

/// Scan moves larger than this re-roll the secondary voices.
pub const SCAN_CHANGE_EPSILON: f32 = 0.001;

/// Slice index selected by `scan` in a list of `num_slices`.
pub fn scan_target(scan: f32, num_slices: usize) -> usize {
    if num_slices == 0 {
        return 0;
    }
    let last = num_slices - 1;
    let target = roundf(scan.clamp(0.0, 1.0) * last as f32);
    (target as usize).min(last)
}

/// Remembers the last applied target so a held scan value jumps once.
#[derive(Debug, Clone, Default)]
pub struct ScanController {
    last_target: Option<usize>,
    last_value: Option<f32>,
}

impl ScanController {
    /// Create a controller that treats `initial` as already seen.
    pub fn new(initial: f32) -> Self {
        Self {
            last_target: None,
            last_value: Some(initial),
        }
    }

    /// Record `scan` and report whether it moved by more than
    /// [`SCAN_CHANGE_EPSILON`] since the last reported change.
    pub fn value_changed(&mut self, scan: f32) -> bool {
        match self.last_value {
            Some(last) if (scan - last).abs() <= SCAN_CHANGE_EPSILON => false,
            _ => {
                self.last_value = Some(scan);
                true
            }
        }
    }

    /// Slice the primary voice should jump to, if any.
    ///
    /// Needs more than one slice. Returns each engaged target once; a
    /// disengaged scan clears the memory.
    pub fn apply(&mut self, scan: f32, slices: &[Slice]) -> Option<usize> {
        if slices.len() <= 1 {
            return None;
        }
        if scan <= SCAN_ENGAGE_THRESHOLD {
            self.last_target = None;
            return None;
        }
        let target = scan_target(scan, slices.len());
        if self.last_target != Some(target) && slices[target].active {
            self.last_target = Some(target);
            Some(target)
        } else {
            None
        }
    }

    /// Forget the last applied target.
    pub fn reset(&mut self) {
        self.last_target = None;
    }

    /// Last applied target.
    pub fn last_target(&self) -> Option<usize> {
        self.last_target
    }
}
