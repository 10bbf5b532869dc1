//! Offline render: record a synthesized take, then play it back.

use super::common::{build_parameters, parse_key_val};
use crate::signal::SignalArgs;
use clap::Args;
use serde::Serialize;
use slicer_config::SessionConfig;
use slicer_engine::{Engine, EngineConfig, EngineParameters};
use std::path::PathBuf;

#[derive(Args)]
pub struct RenderArgs {
    #[command(flatten)]
    signal: SignalArgs,

    /// Session file with engine settings and a starting preset
    #[arg(long)]
    session: Option<PathBuf>,

    /// Preset name or path (overrides the session's preset)
    #[arg(short, long)]
    preset: Option<String>,

    /// Parameter overrides (e.g., "voices=4", "delay_time_l=300ms")
    #[arg(long = "set", value_parser = parse_key_val, number_of_values = 1)]
    overrides: Vec<(String, String)>,

    /// Sample rate in Hz (overrides the session)
    #[arg(long)]
    sample_rate: Option<f32>,

    /// Voice scheduling seed (overrides the session)
    #[arg(long)]
    seed: Option<u64>,

    /// Playback length in seconds after the take is committed
    #[arg(long, default_value = "4.0")]
    play: f32,

    /// Frames per processing block
    #[arg(long, default_value = "256")]
    block_size: usize,

    /// Keep feeding the signal during playback instead of silence
    #[arg(long)]
    live: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

/// Statistics of the playback phase.
#[derive(Debug, Serialize)]
struct RenderReport {
    preset: Option<String>,
    sample_rate: f32,
    recorded_samples: usize,
    slices: usize,
    voices: usize,
    current_slice: usize,
    frames: usize,
    peak_l: f32,
    peak_r: f32,
    rms_l: f32,
    rms_r: f32,
}

#[derive(Default)]
struct Meter {
    peak_l: f32,
    peak_r: f32,
    sum_sq_l: f64,
    sum_sq_r: f64,
    frames: usize,
}

impl Meter {
    fn add(&mut self, left: &[f32], right: &[f32]) {
        for (&l, &r) in left.iter().zip(right) {
            self.peak_l = self.peak_l.max(l.abs());
            self.peak_r = self.peak_r.max(r.abs());
            self.sum_sq_l += f64::from(l) * f64::from(l);
            self.sum_sq_r += f64::from(r) * f64::from(r);
        }
        self.frames += left.len().min(right.len());
    }

    fn rms(&self) -> (f32, f32) {
        if self.frames == 0 {
            return (0.0, 0.0);
        }
        let n = self.frames as f64;
        ((self.sum_sq_l / n).sqrt() as f32, (self.sum_sq_r / n).sqrt() as f32)
    }
}

fn run_blocks(engine: &mut Engine, input: &[f32], block_size: usize, meter: Option<&mut Meter>) {
    let mut out_l = vec![0.0f32; block_size];
    let mut out_r = vec![0.0f32; block_size];
    let mut meter = meter;
    for block in input.chunks(block_size) {
        let n = block.len();
        engine.process(block, &mut out_l[..n], &mut out_r[..n]);
        if let Some(meter) = meter.as_deref_mut() {
            meter.add(&out_l[..n], &out_r[..n]);
        }
    }
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    if args.block_size == 0 {
        anyhow::bail!("block size must be at least 1");
    }
    if !(args.play >= 0.0 && args.play.is_finite()) {
        anyhow::bail!("playback length must be a non-negative number of seconds");
    }

    let session = match &args.session {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    let mut config: EngineConfig = session.engine;
    if let Some(sample_rate) = args.sample_rate {
        config.sample_rate = sample_rate;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.loop_seconds = config.loop_seconds.max(args.signal.duration);

    let preset_name = args.preset.clone().or(session.preset);
    let params = build_parameters(preset_name.as_deref(), &args.overrides)?;

    let take = args.signal.synthesize(config.sample_rate)?;
    let mut engine = Engine::with_parameters(
        config,
        EngineParameters {
            recording: false,
            ..params
        },
    )?;
    let sample_rate = engine.config().sample_rate;

    tracing::info!(
        samples = take.len(),
        signal = ?args.signal.signal,
        "recording take"
    );
    engine.set_recording(true);
    run_blocks(&mut engine, &take, args.block_size, None);
    engine.set_recording(false);
    tracing::info!(
        recorded = engine.recorded_length(),
        slices = engine.num_slices(),
        "take committed"
    );

    let play_frames = (args.play * sample_rate).round() as usize;
    let playback_input: Vec<f32> = if args.live && !take.is_empty() {
        take.iter().copied().cycle().take(play_frames).collect()
    } else {
        vec![0.0; play_frames]
    };
    let mut meter = Meter::default();
    run_blocks(&mut engine, &playback_input, args.block_size, Some(&mut meter));

    let (rms_l, rms_r) = meter.rms();
    let report = RenderReport {
        preset: preset_name,
        sample_rate,
        recorded_samples: engine.recorded_length(),
        slices: engine.num_slices(),
        voices: engine.num_voices(),
        current_slice: engine.current_slice(),
        frames: meter.frames,
        peak_l: meter.peak_l,
        peak_r: meter.peak_r,
        rms_l,
        rms_r,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &RenderReport) {
    println!("Render");
    println!("======");
    println!(
        "  Preset:        {}",
        report.preset.as_deref().unwrap_or("(defaults)")
    );
    println!("  Sample rate:   {} Hz", report.sample_rate);
    println!(
        "  Take:          {} samples ({:.2}s)",
        report.recorded_samples,
        report.recorded_samples as f32 / report.sample_rate
    );
    println!("  Slices:        {}", report.slices);
    println!("  Voices:        {}", report.voices);
    println!("  Current slice: {}", report.current_slice);
    println!();
    println!("Playback ({} frames)", report.frames);
    println!(
        "  Peak:  L {:.4}  R {:.4}",
        report.peak_l, report.peak_r
    );
    println!("  RMS:   L {:.4}  R {:.4}", report.rms_l, report.rms_r);
}
