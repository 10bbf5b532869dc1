//! Factory presets compiled into the library.
//!
//! Each one is plain TOML in the same format as a user preset, so any of
//! them can be saved out and edited.

use crate::Preset;

/// Internal identifiers of the factory presets, in listing order.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "init",
    "scatter",
    "reverse_drift",
    "stutter",
    "tape_echo",
    "cathedral",
    "runaway",
];

static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("init", INIT_PRESET),
    ("scatter", SCATTER_PRESET),
    ("reverse_drift", REVERSE_DRIFT_PRESET),
    ("stutter", STUTTER_PRESET),
    ("tape_echo", TAPE_ECHO_PRESET),
    ("cathedral", CATHEDRAL_PRESET),
    ("runaway", RUNAWAY_PRESET),
];

const INIT_PRESET: &str = r#"
name = "Init"
description = "One voice, flat EQ, effects dry"

[params]
"#;

const SCATTER_PRESET: &str = r#"
name = "Scatter"
description = "Eight voices spread across short slices"

[params]
voices = 8
min_slice_time = 0.2
mix = 0.8
speed = 1.0
reverb_room = 0.4
reverb_wet = 0.2
"#;

const REVERSE_DRIFT_PRESET: &str = r#"
name = "Reverse Drift"
description = "Half-speed backwards playback into a dark room"

[params]
voices = 3
min_slice_time = 0.45
mix = 0.9
speed = -0.5
eq_high_db = -8.0
reverb_room = 0.8
reverb_damping = 0.7
reverb_decay = 0.8
reverb_wet = 0.5
"#;

const STUTTER_PRESET: &str = r#"
name = "Stutter"
description = "Very short slices at double speed"

[params]
voices = 2
min_slice_time = 0.05
mix = 1.0
speed = 2.0
eq_low_db = -4.0
eq_mid_db = 3.0
delay_time_l = 0.125
delay_time_r = 0.1875
delay_feedback = 0.2
delay_wet = 0.3
"#;

const TAPE_ECHO_PRESET: &str = r#"
name = "Tape Echo"
description = "Single voice with a dark ping-pong delay"

[params]
mix = 0.7
feedback = 0.2
eq_low_db = 2.0
eq_high_db = -6.0
delay_time_l = 0.375
delay_time_r = 0.5
delay_feedback = 0.55
delay_wet = 0.45
"#;

const CATHEDRAL_PRESET: &str = r#"
name = "Cathedral"
description = "Long slices washed in a huge reverb"

[params]
voices = 4
min_slice_time = 0.75
mix = 0.85
speed = 0.5
reverb_room = 1.0
reverb_damping = 0.3
reverb_decay = 0.95
reverb_wet = 0.7
"#;

const RUNAWAY_PRESET: &str = r#"
name = "Runaway"
description = "Heavy feedback through the whole chain"

[params]
voices = 6
min_slice_time = 0.3
mix = 0.9
feedback = 0.85
speed = 1.5
eq_mid_db = -6.0
delay_time_l = 0.2
delay_time_r = 0.3
delay_feedback = 0.7
delay_wet = 0.4
reverb_decay = 0.7
reverb_wet = 0.35
"#;

/// All factory presets, in listing order.
///
/// ```rust
/// use slicer_config::factory_presets;
///
/// for preset in factory_presets() {
///     println!("{}: {}", preset.name, preset.description.as_deref().unwrap_or(""));
/// }
/// ```
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by identifier or display name, case-insensitively.
///
/// ```rust
/// use slicer_config::get_factory_preset;
///
/// let preset = get_factory_preset("Tape Echo").unwrap();
/// assert_eq!(preset.params.delay_time_r, 0.5);
/// assert!(get_factory_preset("tape_echo").is_some());
/// ```
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    let name_lower = name.to_lowercase();

    if let Some((_, toml)) = FACTORY_PRESETS_TOML
        .iter()
        .find(|(id, _)| id.to_lowercase() == name_lower)
    {
        return Preset::from_toml(toml).ok();
    }

    factory_presets()
        .into_iter()
        .find(|preset| preset.name.to_lowercase() == name_lower)
}

/// Identifiers of all factory presets.
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_TOML.iter().map(|(name, _)| *name).collect()
}

/// Whether a name refers to a factory preset.
///
/// ```rust
/// use slicer_config::is_factory_preset;
///
/// assert!(is_factory_preset("cathedral"));
/// assert!(is_factory_preset("Reverse Drift"));
/// assert!(!is_factory_preset("my_custom_preset"));
/// ```
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}
