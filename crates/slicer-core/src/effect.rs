//! Core stereo processor trait.
//!
//! Every stage after the loop player (EQ, echo, reverb) consumes and produces
//! a left/right pair. [`Effect`] gives them a common shape so stages can be
//! driven uniformly, tested as `dyn Effect`, and reset together when the
//! engine recovers from a numerical fault.
//!
//! - **Object-safe**: `&mut dyn Effect` works for heterogeneous lists.
//! - **No allocations**: every method is callable from the render path.

/// A stereo audio processor.
///
/// # Example
///
/// ```rust
/// use slicer_core::Effect;
///
/// struct Swap;
///
/// impl Effect for Swap {
///     fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
///         (right, left)
///     }
///
///     fn reset(&mut self) {}
/// }
///
/// let mut swap = Swap;
/// assert_eq!(swap.process_stereo(1.0, 2.0), (2.0, 1.0));
/// ```
pub trait Effect {
    /// Process one stereo frame.
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32);

    /// Process two channel buffers in place.
    ///
    /// Frames beyond the shorter buffer are left untouched.
    fn process_block_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(left.len(), right.len(), "channel buffers must match");
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let (out_l, out_r) = self.process_stereo(*l, *r);
            *l = out_l;
            *r = out_r;
        }
    }

    /// Clear internal state (delay lines, filter history) without touching
    /// parameters.
    fn reset(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Gain(f32);

    impl Effect for Gain {
        fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
            (left * self.0, right * self.0)
        }

        fn reset(&mut self) {}
    }

    #[test]
    fn block_processing_matches_per_frame() {
        let mut gain = Gain(2.0);
        let mut left = [1.0, 2.0, 3.0];
        let mut right = [-1.0, 0.0, 0.5];
        gain.process_block_stereo(&mut left, &mut right);
        assert_eq!(left, [2.0, 4.0, 6.0]);
        assert_eq!(right, [-2.0, 0.0, 1.0]);
    }

    #[test]
    fn object_safe() {
        let mut half = Gain(0.5);
        let mut quad = Gain(4.0);
        let mut effects: [&mut dyn Effect; 2] = [&mut half, &mut quad];
        let mut frame = (1.0, 1.0);
        for effect in effects.iter_mut() {
            frame = effect.process_stereo(frame.0, frame.1);
        }
        assert_eq!(frame, (2.0, 2.0));
    }
}
