//! Waveform rendering and deterministic PNG encoding.

use std::path::Path;

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};

use bitpulse_dsp::SignalBuffer;

use crate::VizResult;

/// Waveform image dimensions.
pub const WAVEFORM_WIDTH: u32 = 1024;
pub const WAVEFORM_HEIGHT: u32 = 256;

/// Colors for the waveform visualization.
const BACKGROUND_COLOR: [u8; 3] = [32, 32, 32];
const ENVELOPE_COLOR: [u8; 3] = [64, 192, 255];
const RMS_COLOR: [u8; 3] = [128, 224, 255];
const GRID_COLOR: [u8; 3] = [64, 64, 64];

/// Spacing of the vertical time gridlines in seconds.
const GRID_INTERVAL_SECONDS: f64 = 0.1;

/// A rendered waveform image.
pub struct WaveformImage {
    /// PNG image data.
    pub png_data: Vec<u8>,
    /// BLAKE3 hash of the PNG data, for determinism checks.
    pub hash: String,
}

/// Per-column amplitude data.
#[derive(Clone)]
struct ColumnData {
    min: f64,
    max: f64,
    rms: f64,
}

/// Renders a signal buffer to a waveform PNG.
pub fn render_waveform(buffer: &SignalBuffer) -> VizResult<WaveformImage> {
    let columns = compute_column_data(buffer.samples(), WAVEFORM_WIDTH as usize);
    let rgb = render_image(&columns, buffer, WAVEFORM_WIDTH, WAVEFORM_HEIGHT);
    let png_data = encode_png(&rgb, WAVEFORM_WIDTH, WAVEFORM_HEIGHT)?;
    let hash = blake3::hash(&png_data).to_hex().to_string();

    Ok(WaveformImage { png_data, hash })
}

/// Renders a signal buffer and writes the PNG to disk.
pub fn save_waveform_png(buffer: &SignalBuffer, path: &Path) -> VizResult<WaveformImage> {
    let image = render_waveform(buffer)?;
    std::fs::write(path, &image.png_data)?;
    Ok(image)
}

/// Computes min/max/RMS amplitude for each horizontal column.
fn compute_column_data(samples: &[f64], num_columns: usize) -> Vec<ColumnData> {
    if samples.is_empty() {
        return vec![
            ColumnData {
                min: 0.0,
                max: 0.0,
                rms: 0.0,
            };
            num_columns
        ];
    }

    let samples_per_column = samples.len() as f64 / num_columns as f64;
    let mut columns = Vec::with_capacity(num_columns);

    for col in 0..num_columns {
        let start = (col as f64 * samples_per_column).floor() as usize;
        let end = ((col + 1) as f64 * samples_per_column).ceil() as usize;
        let end = end.min(samples.len());

        if start >= end {
            columns.push(ColumnData {
                min: 0.0,
                max: 0.0,
                rms: 0.0,
            });
            continue;
        }

        let mut min = f64::MAX;
        let mut max = f64::MIN;
        let mut sum_squares = 0.0;
        for &sample in &samples[start..end] {
            min = min.min(sample);
            max = max.max(sample);
            sum_squares += sample * sample;
        }
        let rms = (sum_squares / (end - start) as f64).sqrt();

        columns.push(ColumnData { min, max, rms });
    }

    columns
}

/// Maps an amplitude in [-1.0, 1.0] to a row index, top row = +1.0.
fn amplitude_to_row(amplitude: f64, height: u32) -> usize {
    let clamped = amplitude.clamp(-1.0, 1.0);
    let normalized = (1.0 - clamped) / 2.0;
    ((normalized * (height - 1) as f64).round() as usize).min(height as usize - 1)
}

/// Renders the column data into an RGB buffer.
fn render_image(columns: &[ColumnData], buffer: &SignalBuffer, width: u32, height: u32) -> Vec<u8> {
    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for _ in 0..width * height {
        rgb.extend_from_slice(&BACKGROUND_COLOR);
    }

    let set_pixel = |rgb: &mut Vec<u8>, x: usize, y: usize, color: [u8; 3]| {
        let offset = (y * width as usize + x) * 3;
        rgb[offset..offset + 3].copy_from_slice(&color);
    };

    // Time gridlines, one per GRID_INTERVAL_SECONDS of signal.
    if !buffer.is_empty() {
        let columns_per_second =
            width as f64 * f64::from(buffer.sample_rate()) / buffer.len() as f64;
        let grid_step = columns_per_second * GRID_INTERVAL_SECONDS;
        if grid_step >= 2.0 {
            let mut tick = grid_step;
            while tick < width as f64 {
                let x = tick.round() as usize;
                if x < width as usize {
                    for y in 0..height as usize {
                        set_pixel(&mut rgb, x, y, GRID_COLOR);
                    }
                }
                tick += grid_step;
            }
        }
    }

    // Center line.
    let center = amplitude_to_row(0.0, height);
    for x in 0..width as usize {
        set_pixel(&mut rgb, x, center, GRID_COLOR);
    }

    // Envelope and RMS body per column.
    for (x, column) in columns.iter().enumerate() {
        let top = amplitude_to_row(column.max, height);
        let bottom = amplitude_to_row(column.min, height);
        for y in top..=bottom {
            set_pixel(&mut rgb, x, y, ENVELOPE_COLOR);
        }

        let rms_top = amplitude_to_row(column.rms, height);
        let rms_bottom = amplitude_to_row(-column.rms, height);
        for y in rms_top..=rms_bottom {
            set_pixel(&mut rgb, x, y, RMS_COLOR);
        }
    }

    rgb
}

/// Encodes an RGB buffer as a PNG with fixed settings for determinism.
fn encode_png(rgb: &[u8], width: u32, height: u32) -> VizResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = Encoder::new(&mut png_data, width, height);
        encoder.set_color(ColorType::Rgb);
        encoder.set_depth(BitDepth::Eight);
        encoder.set_compression(Compression::Default);
        encoder.set_filter(FilterType::NoFilter);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgb)?;
    }
    Ok(png_data)
}
