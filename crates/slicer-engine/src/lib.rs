//! Slicer Engine - live-loop recording, onset slicing and polyphonic replay
//!
//! Records a mono input into a bounded loop buffer, cuts the take into
//! onset-detected slices, and replays them through up to eight voices with
//! independent speed and direction. The voices feed a three-band EQ, a
//! stereo delay and a reverb, with soft-clipped feedback from the output
//! back into the mix.
//!
//! # Components
//!
//! - [`SliceDetector`] - Threshold onset scanner, incremental or batch
//! - [`LoopRecorder`] - Committed loop plus a staging take, swapped on commit
//! - [`VoicePool`] - Up to [`MAX_VOICES`] cursors with a seedable RNG
//! - [`ScanController`] - Maps a 0-1 control to the primary voice's slice
//! - [`Engine`] - Per-sample composition of all of the above
//!
//! # Threading
//!
//! [`Engine::process`] runs on the audio thread and owns every buffer.
//! Other threads change parameters through a [`ParamHandle`]; the engine
//! copies the parameters once per block.
//!
//! # Example
//!
//! ```rust
//! use slicer_engine::{Engine, EngineConfig};
//!
//! let mut engine = Engine::new(EngineConfig {
//!     loop_seconds: 1.0,
//!     seed: Some(3),
//!     ..EngineConfig::default()
//! })?;
//! let handle = engine.handle();
//!
//! handle.set_recording(true);
//! let input = vec![0.25f32; 512];
//! let (mut l, mut r) = (vec![0.0; 512], vec![0.0; 512]);
//! engine.process(&input, &mut l, &mut r);
//! assert!(handle.status().recording);
//! # Ok::<(), slicer_engine::EngineError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod params;
pub mod recorder;
pub mod scan;
pub mod slice;
pub mod voice;

pub use config::{EngineConfig, EqBands};
pub use engine::Engine;
pub use error::EngineError;
pub use params::{
    EngineParameters, EngineStatus, PARAM_RANGES, ParamHandle, min_slice_samples,
    min_slice_time_seconds, param_range,
};
pub use recorder::{LoopRecorder, RecorderState};
pub use scan::{ScanController, scan_target};
pub use slice::{MAX_SLICES, SILENCE_FLOOR, Slice, SliceDetector};
pub use voice::{MAX_VOICES, PanMode, Voice, VoicePool};
