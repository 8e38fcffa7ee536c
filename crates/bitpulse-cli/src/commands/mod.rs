//! Command implementations for the bitpulse CLI.

pub mod demo;
pub mod modulate;

use std::path::Path;

use anyhow::Context;
use colored::Colorize;

use bitpulse_dsp::{SignalBuffer, WavResult};
use bitpulse_viz::save_waveform_png;

/// Writes a buffer as a WAV file plus a waveform preview PNG next to it,
/// with a status line for each.
pub(crate) fn write_outputs(buffer: &SignalBuffer, dir: &Path, stem: &str) -> anyhow::Result<()> {
    let wav_path = dir.join(format!("{stem}.wav"));
    write_wav_with_status(buffer, &wav_path)?;

    let png_path = dir.join(format!("{stem}.png"));
    save_waveform_png(buffer, &png_path)
        .with_context(|| format!("writing {}", png_path.display()))?;
    println!("{} {}", "wrote".green().bold(), png_path.display());

    Ok(())
}

/// Writes a buffer as a WAV file and prints a status line.
pub(crate) fn write_wav_with_status(buffer: &SignalBuffer, path: &Path) -> anyhow::Result<()> {
    let wav = WavResult::from_buffer(buffer);
    wav.write_to(path)
        .with_context(|| format!("writing {}", path.display()))?;
    println!(
        "{} {} ({:.2} s, pcm {})",
        "wrote".green().bold(),
        path.display(),
        wav.duration_seconds(),
        &wav.pcm_hash[..8]
    );
    Ok(())
}
