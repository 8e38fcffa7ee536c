//! bitpulse CLI - demo driver for the 1-bit modulation pipeline.
//!
//! This binary generates demo tones, runs them (or existing WAV files)
//! through delta-sigma / PWM / lowpass chains, and writes WAV files and
//! waveform preview images.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;

use commands::demo::DemoArgs;
use commands::modulate::{Mode, ModulateArgs};

/// bitpulse - delta-sigma and PWM audio modulation pipeline
#[derive(Parser)]
#[command(name = "bitpulse")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a sine tone and run it through the demo pipelines
    Demo {
        /// Directory for the generated files
        #[arg(short, long, default_value = ".")]
        output_dir: String,

        /// Tone frequency in Hz
        #[arg(long, default_value_t = 440.0)]
        frequency: f64,

        /// Sample rate in Hz
        #[arg(long, default_value_t = 96000)]
        sample_rate: u32,

        /// Tone duration in seconds
        #[arg(long, default_value_t = 1.0)]
        duration: f64,

        /// Delta-sigma oversampling ratio
        #[arg(long, default_value_t = 8)]
        oversampling_ratio: usize,

        /// Lowpass cutoff frequency in Hz for the filtered variant
        #[arg(long, default_value_t = 1000.0)]
        cutoff: f64,
    },

    /// Run an existing mono WAV file through a modulation chain
    Modulate {
        /// Path to the input WAV file (mono 16-bit PCM)
        #[arg(short, long)]
        input: String,

        /// Path for the output WAV file
        #[arg(short, long)]
        output: String,

        /// Modulation to apply
        #[arg(long, value_enum, default_value = "delta-sigma")]
        mode: Mode,

        /// Delta-sigma oversampling ratio
        #[arg(long, default_value_t = 32)]
        oversampling_ratio: usize,

        /// PWM carrier sample length
        #[arg(long, default_value_t = 16)]
        sample_length: usize,

        /// Append a lowpass stage with this cutoff frequency in Hz
        #[arg(long)]
        cutoff: Option<f64>,

        /// Also write a waveform preview PNG to this path
        #[arg(long)]
        waveform: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Demo {
            output_dir,
            frequency,
            sample_rate,
            duration,
            oversampling_ratio,
            cutoff,
        } => commands::demo::run(&DemoArgs {
            output_dir,
            frequency,
            sample_rate,
            duration,
            oversampling_ratio,
            cutoff,
        }),
        Commands::Modulate {
            input,
            output,
            mode,
            oversampling_ratio,
            sample_length,
            cutoff,
            waveform,
        } => commands::modulate::run(&ModulateArgs {
            input,
            output,
            mode,
            oversampling_ratio,
            sample_length,
            cutoff,
            waveform,
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
