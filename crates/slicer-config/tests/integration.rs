//! Integration tests for slicer-config.
//!
//! Presets and sessions travel through files and into a running engine.

use slicer_config::{
    ConfigError, Preset, SessionConfig, ValidationError, factory_presets, find_preset_in,
    list_presets_in_dir, set_parameter, validate_preset,
};
use slicer_engine::{Engine, EngineParameters};
use tempfile::TempDir;

fn pulse_take(engine: &mut Engine, len: usize) {
    let input: Vec<f32> = (0..len)
        .map(|i| if i % 4800 < 20 { 0.9 } else { 0.0 })
        .collect();
    let mut l = vec![0.0; len];
    let mut r = vec![0.0; len];
    engine.set_recording(true);
    engine.process(&input, &mut l, &mut r);
    engine.set_recording(false);
}

#[test]
fn preset_file_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("mine.toml");

    let mut preset = Preset::new("Mine").with_description("saved in a test");
    set_parameter(&mut preset.params, "voices", "5").unwrap();
    set_parameter(&mut preset.params, "delay_time_l", "120ms").unwrap();
    set_parameter(&mut preset.params, "speed", "-1.25").unwrap();
    preset.save(&path).unwrap();

    let loaded = Preset::load(&path).unwrap();
    assert_eq!(loaded, preset);
    assert_eq!(find_preset_in("mine", path.parent().unwrap()), Some(path.clone()));
    assert_eq!(list_presets_in_dir(path.parent().unwrap()), vec![path]);
}

#[test]
fn out_of_range_file_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("hot.toml");
    std::fs::write(
        &path,
        "name = \"Hot\"\n[params]\nfeedback = 1.5\nvoices = 12\n",
    )
    .unwrap();

    let preset = Preset::load(&path).unwrap();
    let err = validate_preset(&preset).unwrap_err();
    assert!(matches!(err, ValidationError::Multiple(ref errors) if errors.len() == 2));

    let wrapped: ConfigError = err.into();
    assert!(wrapped.to_string().contains("feedback"));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, "name = \"Broken\"\n[params\n").unwrap();
    assert!(matches!(Preset::load(&path), Err(ConfigError::TomlParse(_))));
}

#[test]
fn session_file_builds_an_engine() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("session.toml");
    std::fs::write(
        &path,
        r#"
preset = "scatter"

[engine]
sample_rate = 44100.0
loop_seconds = 2.0
seed = 3
"#,
    )
    .unwrap();

    let session = SessionConfig::load(&path).unwrap();
    let engine = Engine::new(session.engine.clone()).unwrap();
    assert_eq!(engine.config().sample_rate, 44100.0);
    assert_eq!(session.preset.as_deref(), Some("scatter"));

    session.save(&path).unwrap();
    assert_eq!(SessionConfig::load(&path).unwrap(), session);
}

#[test]
fn every_factory_preset_drives_the_engine() {
    for preset in factory_presets() {
        let config = slicer_engine::EngineConfig {
            loop_seconds: 1.0,
            seed: Some(11),
            ..slicer_engine::EngineConfig::default()
        };
        let mut engine = Engine::new(config).unwrap();
        pulse_take(&mut engine, 48000);
        engine.apply_parameters(preset.params);

        assert_eq!(engine.num_voices(), preset.params.voices, "{}", preset.name);

        let input = vec![0.1f32; 512];
        let mut l = vec![0.0; 512];
        let mut r = vec![0.0; 512];
        for _ in 0..40 {
            engine.process(&input, &mut l, &mut r);
            assert!(
                l.iter().chain(&r).all(|s| s.is_finite() && s.abs() <= 10.0),
                "{} produced an invalid sample",
                preset.name
            );
        }
    }
}

#[test]
fn preset_applies_exactly() {
    let preset = slicer_config::get_factory_preset("tape_echo").unwrap();
    let mut engine = Engine::new(slicer_engine::EngineConfig::default()).unwrap();
    engine.apply_parameters(preset.params);
    assert_eq!(engine.parameters(), preset.params);
    assert_ne!(engine.parameters(), EngineParameters::default());
}
