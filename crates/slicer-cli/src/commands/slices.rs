//! Batch slice detection over a synthesized signal.

use crate::signal::SignalArgs;
use clap::Args;
use slicer_engine::{
    SliceDetector, min_slice_samples, min_slice_time_seconds, param_range,
};

#[derive(Args)]
pub struct SlicesArgs {
    #[command(flatten)]
    signal: SignalArgs,

    /// Sample rate in Hz
    #[arg(long, default_value = "48000.0")]
    sample_rate: f32,

    /// Minimum slice time knob (0-1)
    #[arg(long, default_value = "0.3")]
    min_slice_time: f32,

    /// Onset threshold (absolute amplitude)
    #[arg(long, default_value = "0.5")]
    threshold: f32,

    /// Print the slice list as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: SlicesArgs) -> anyhow::Result<()> {
    let (min, max) = param_range("min_slice_time");
    if !(min..=max).contains(&args.min_slice_time) {
        anyhow::bail!("min slice time must be in [{min}, {max}], got {}", args.min_slice_time);
    }
    if !(args.threshold > 0.0 && args.threshold.is_finite()) {
        anyhow::bail!("threshold must be a positive number, got {}", args.threshold);
    }
    if !(8000.0..=384_000.0).contains(&args.sample_rate) {
        anyhow::bail!("sample rate must be in 8000..=384000 Hz, got {}", args.sample_rate);
    }

    let buffer = args.signal.synthesize(args.sample_rate)?;
    let seconds = min_slice_time_seconds(args.min_slice_time);
    let min_samples = min_slice_samples(seconds, args.sample_rate);
    let slices = SliceDetector::detect(&buffer, args.threshold, min_samples);

    tracing::debug!(
        samples = buffer.len(),
        min_samples,
        slices = slices.len(),
        "detection finished"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&slices)?);
        return Ok(());
    }

    println!(
        "{} slices in {} samples (minimum {} samples, {:.1} ms)",
        slices.len(),
        buffer.len(),
        min_samples,
        seconds * 1000.0
    );
    if slices.is_empty() {
        return Ok(());
    }
    println!();
    println!("  {:>5}  {:>10}  {:>10}  {:>10}  {:>6}", "#", "start", "end", "ms", "peak");
    for (i, slice) in slices.iter().enumerate() {
        println!(
            "  {:>5}  {:>10}  {:>10}  {:>10.1}  {:>6.3}",
            i,
            slice.start_sample,
            slice.end_sample,
            slice.len_samples() as f32 * 1000.0 / args.sample_rate,
            slice.peak_amplitude
        );
    }
    Ok(())
}
