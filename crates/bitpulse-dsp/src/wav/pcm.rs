//! PCM chunk extraction, hashing, and WAV parsing.

use std::path::Path;

use crate::buffer::SignalBuffer;
use crate::error::{DspError, DspResult};

/// Extracts the PCM data chunk from a WAV file buffer.
///
/// Used for comparing WAV files by their audio content only. Returns
/// `None` if the RIFF structure is malformed or no data chunk exists.
pub fn extract_pcm_data(wav_data: &[u8]) -> Option<&[u8]> {
    if wav_data.len() < 44 {
        return None;
    }
    if &wav_data[0..4] != b"RIFF" || &wav_data[8..12] != b"WAVE" {
        return None;
    }

    let mut pos = 12;
    while pos + 8 <= wav_data.len() {
        let chunk_id = &wav_data[pos..pos + 4];
        let chunk_size = u32::from_le_bytes([
            wav_data[pos + 4],
            wav_data[pos + 5],
            wav_data[pos + 6],
            wav_data[pos + 7],
        ]) as usize;

        if chunk_id == b"data" {
            let data_start = pos + 8;
            let data_end = data_start.checked_add(chunk_size)?;
            if data_end <= wav_data.len() {
                return Some(&wav_data[data_start..data_end]);
            }
            return None;
        }

        pos += 8 + chunk_size;
        // Chunks are word-aligned.
        if chunk_size % 2 == 1 {
            pos += 1;
        }
    }

    None
}

/// Computes the BLAKE3 hash of a WAV file's PCM chunk.
pub fn compute_pcm_hash(wav_data: &[u8]) -> Option<String> {
    extract_pcm_data(wav_data).map(|pcm| blake3::hash(pcm).to_hex().to_string())
}

/// Parses a mono 16-bit PCM WAV file into a signal buffer.
///
/// The buffer comes back tagged [`SampleKind::Pcm16`], normalized by
/// 1/32768. Stereo, non-PCM, and non-16-bit payloads are rejected.
///
/// [`SampleKind::Pcm16`]: crate::buffer::SampleKind::Pcm16
pub fn parse_wav(wav_data: &[u8]) -> DspResult<SignalBuffer> {
    if wav_data.len() < 44 || &wav_data[0..4] != b"RIFF" || &wav_data[8..12] != b"WAVE" {
        return Err(DspError::invalid_wav("not a RIFF/WAVE file"));
    }

    let fmt = find_chunk(wav_data, b"fmt ")
        .ok_or_else(|| DspError::invalid_wav("missing fmt chunk"))?;
    if fmt.len() < 16 {
        return Err(DspError::invalid_wav("fmt chunk too short"));
    }

    let audio_format = u16::from_le_bytes([fmt[0], fmt[1]]);
    let channels = u16::from_le_bytes([fmt[2], fmt[3]]);
    let sample_rate = u32::from_le_bytes([fmt[4], fmt[5], fmt[6], fmt[7]]);
    let bits_per_sample = u16::from_le_bytes([fmt[14], fmt[15]]);

    if audio_format != 1 {
        return Err(DspError::invalid_wav(format!(
            "unsupported audio format {audio_format} (only uncompressed PCM)"
        )));
    }
    if channels != 1 {
        return Err(DspError::invalid_wav(format!(
            "unsupported channel count {channels} (only mono)"
        )));
    }
    if bits_per_sample != 16 {
        return Err(DspError::invalid_wav(format!(
            "unsupported bit depth {bits_per_sample} (only 16-bit)"
        )));
    }

    let pcm = extract_pcm_data(wav_data)
        .ok_or_else(|| DspError::invalid_wav("missing data chunk"))?;
    let samples: Vec<i16> = pcm
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    SignalBuffer::from_pcm16(&samples, sample_rate)
}

/// Reads and parses a WAV file from disk.
pub fn read_wav(path: &Path) -> DspResult<SignalBuffer> {
    let wav_data = std::fs::read(path)?;
    parse_wav(&wav_data)
}

/// Finds a chunk body by id, walking the RIFF structure.
fn find_chunk<'a>(wav_data: &'a [u8], id: &[u8; 4]) -> Option<&'a [u8]> {
    let mut pos = 12;
    while pos + 8 <= wav_data.len() {
        let chunk_id = &wav_data[pos..pos + 4];
        let chunk_size = u32::from_le_bytes([
            wav_data[pos + 4],
            wav_data[pos + 5],
            wav_data[pos + 6],
            wav_data[pos + 7],
        ]) as usize;

        let body_start = pos + 8;
        let body_end = body_start.checked_add(chunk_size)?;
        if chunk_id == id {
            if body_end <= wav_data.len() {
                return Some(&wav_data[body_start..body_end]);
            }
            return None;
        }

        pos = body_end;
        if chunk_size % 2 == 1 {
            pos += 1;
        }
    }
    None
}
