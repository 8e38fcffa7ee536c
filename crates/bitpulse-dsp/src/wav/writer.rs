//! Core WAV writing and PCM conversion.

use std::io::{self, Write};

use super::format::WavFormat;
use crate::buffer::SignalBuffer;

/// Writes a complete WAV file to a writer.
pub fn write_wav<W: Write>(writer: &mut W, format: &WavFormat, pcm_data: &[u8]) -> io::Result<()> {
    let data_size = pcm_data.len() as u32;
    let file_size = 36 + data_size; // Total file size minus 8 bytes for RIFF header

    // RIFF header
    writer.write_all(b"RIFF")?;
    writer.write_all(&file_size.to_le_bytes())?;
    writer.write_all(b"WAVE")?;

    // fmt chunk
    writer.write_all(b"fmt ")?;
    writer.write_all(&16u32.to_le_bytes())?; // Chunk size (16 for PCM)
    writer.write_all(&1u16.to_le_bytes())?; // Audio format (1 = PCM)
    writer.write_all(&format.channels.to_le_bytes())?;
    writer.write_all(&format.sample_rate.to_le_bytes())?;
    writer.write_all(&format.byte_rate().to_le_bytes())?;
    writer.write_all(&format.block_align().to_le_bytes())?;
    writer.write_all(&format.bits_per_sample.to_le_bytes())?;

    // data chunk
    writer.write_all(b"data")?;
    writer.write_all(&data_size.to_le_bytes())?;
    writer.write_all(pcm_data)?;

    Ok(())
}

/// Writes a WAV file to a byte vector.
pub fn write_wav_to_vec(format: &WavFormat, pcm_data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(44 + pcm_data.len());
    write_wav(&mut out, format, pcm_data).expect("writing to Vec should not fail");
    out
}

/// Converts a signal buffer to little-endian 16-bit PCM bytes.
///
/// Uses the buffer's egress conversion (multiply by 32767, clip, round), so
/// PCM ingested through [`SignalBuffer::from_pcm16`] round-trips within one
/// quantization step.
pub fn buffer_to_pcm16_bytes(buffer: &SignalBuffer) -> Vec<u8> {
    let samples = buffer.to_pcm16();
    let mut pcm = Vec::with_capacity(samples.len() * 2);
    for sample in samples {
        pcm.extend_from_slice(&sample.to_le_bytes());
    }
    pcm
}
