//! End-to-end demo: a sine tone through the modulation pipelines.
//!
//! Mirrors the classic three-file walkthrough: the raw tone, the
//! delta-sigma bitstream, and the bitstream band-limited back to audio.
//! One modulator instance is shared between the second and third chain, so
//! the filtered run continues the integrator history of the plain run.

use std::f64::consts::PI;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;

use bitpulse_dsp::{
    shared, DeltaSigmaModulator, LowpassFilter, SignalBuffer, TransformChain,
};

use super::write_outputs;

pub struct DemoArgs {
    pub output_dir: String,
    pub frequency: f64,
    pub sample_rate: u32,
    pub duration: f64,
    pub oversampling_ratio: usize,
    pub cutoff: f64,
}

pub fn run(args: &DemoArgs) -> anyhow::Result<()> {
    let dir = Path::new(&args.output_dir);
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    println!(
        "{} {:.0} Hz sine, {} Hz, {:.2} s",
        "generating".cyan().bold(),
        args.frequency,
        args.sample_rate,
        args.duration
    );
    let tone = sine_tone(args.frequency, args.sample_rate, args.duration)?;
    write_outputs(&tone, dir, "output")?;

    println!("{}", "delta-sigma modulation".cyan().bold());
    let modulator = shared(DeltaSigmaModulator::new(args.oversampling_ratio)?);
    let mut plain_chain = TransformChain::new();
    plain_chain.attach(modulator.clone());
    let modulated = plain_chain.run(tone.clone())?;
    write_outputs(&modulated, dir, "output_pwm")?;

    println!(
        "{} cutoff {:.0} Hz",
        "delta-sigma + lowpass".cyan().bold(),
        args.cutoff
    );
    let mut filtered_chain = TransformChain::new();
    filtered_chain
        .attach(modulator.clone())
        .attach_stage(LowpassFilter::with_cutoff(args.cutoff)?);
    let filtered = filtered_chain.run(tone)?;
    write_outputs(&filtered, dir, "output_pwm_lowpass")?;

    Ok(())
}

/// Generates a sine tone buffer.
fn sine_tone(frequency: f64, sample_rate: u32, duration: f64) -> anyhow::Result<SignalBuffer> {
    let num_samples = (f64::from(sample_rate) * duration) as usize;
    let samples = (0..num_samples)
        .map(|i| (2.0 * PI * frequency * i as f64 / f64::from(sample_rate)).sin())
        .collect();
    Ok(SignalBuffer::from_samples(samples, sample_rate)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_writes_all_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let args = DemoArgs {
            output_dir: dir.path().to_string_lossy().into_owned(),
            frequency: 440.0,
            sample_rate: 8000,
            duration: 0.05,
            oversampling_ratio: 16,
            cutoff: 1000.0,
        };
        run(&args).unwrap();

        for name in [
            "output.wav",
            "output.png",
            "output_pwm.wav",
            "output_pwm.png",
            "output_pwm_lowpass.wav",
            "output_pwm_lowpass.png",
        ] {
            assert!(dir.path().join(name).exists(), "{name} missing");
        }
    }

    #[test]
    fn test_sine_tone_shape() {
        let tone = sine_tone(440.0, 48000, 0.5).unwrap();
        assert_eq!(tone.len(), 24000);
        assert!(tone.samples().iter().all(|s| (-1.0..=1.0).contains(s)));
    }
}
