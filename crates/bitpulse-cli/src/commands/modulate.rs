//! Modulate an existing mono WAV file.

use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;
use colored::Colorize;

use bitpulse_dsp::wav::read_wav;
use bitpulse_dsp::{DeltaSigmaModulator, LowpassFilter, PwmEncoder, TransformChain};
use bitpulse_viz::save_waveform_png;

use super::write_wav_with_status;

/// Which 2-level modulation to apply.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Mode {
    /// First-order delta-sigma modulation.
    DeltaSigma,
    /// Pulse-width modulation against a sawtooth carrier.
    Pwm,
}

pub struct ModulateArgs {
    pub input: String,
    pub output: String,
    pub mode: Mode,
    pub oversampling_ratio: usize,
    pub sample_length: usize,
    pub cutoff: Option<f64>,
    pub waveform: Option<String>,
}

pub fn run(args: &ModulateArgs) -> anyhow::Result<()> {
    let input_path = Path::new(&args.input);
    let input = read_wav(input_path).with_context(|| format!("reading {}", args.input))?;
    println!(
        "{} {} ({} samples at {} Hz)",
        "read".cyan().bold(),
        input_path.display(),
        input.len(),
        input.sample_rate()
    );

    let mut chain = TransformChain::new();
    match args.mode {
        Mode::DeltaSigma => {
            chain.attach_stage(DeltaSigmaModulator::new(args.oversampling_ratio)?);
        }
        Mode::Pwm => {
            chain.attach_stage(PwmEncoder::new(args.sample_length)?);
        }
    }
    if let Some(cutoff) = args.cutoff {
        chain.attach_stage(LowpassFilter::with_cutoff(cutoff)?);
    }

    let output = chain.run(input)?;
    write_wav_with_status(&output, Path::new(&args.output))?;

    if let Some(waveform) = &args.waveform {
        let png_path = Path::new(waveform);
        save_waveform_png(&output, png_path)
            .with_context(|| format!("writing {}", png_path.display()))?;
        println!("{} {}", "wrote".green().bold(), png_path.display());
    }

    Ok(())
}
