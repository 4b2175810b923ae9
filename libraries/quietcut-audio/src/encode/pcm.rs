//! 16-bit PCM WAV writer
//!
//! Layout is the canonical 44-byte RIFF/WAVE header followed by interleaved
//! little-endian `i16` frames.

use quietcut_core::{ProcessHooks, QuietcutError, Result, SampleBuffer, Stage};
use tracing::debug;

/// Size of the RIFF + fmt + data chunk headers
pub const WAV_HEADER_LEN: usize = 44;

/// Frames converted between host yields
pub const PCM_CHUNK_FRAMES: usize = 4096;

const BYTES_PER_SAMPLE: usize = 2;

/// Convert a float sample to 16-bit PCM
///
/// The input is clamped to [-1, 1]; negative values scale by 32768 and
/// non-negative values by 32767, truncating toward zero.
#[inline]
pub fn float_to_i16(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    if clamped < 0.0 {
        (clamped * 32768.0) as i16
    } else {
        (clamped * 32767.0) as i16
    }
}

/// Encode a buffer as a 16-bit PCM WAV file in memory
///
/// # Errors
/// Returns an `Encoding` stage error if the channel count or data size does
/// not fit the WAV header fields.
pub fn encode_wav(buffer: &SampleBuffer, hooks: &mut dyn ProcessHooks) -> Result<Vec<u8>> {
    let channels = buffer.channel_count();
    let frames = buffer.frames();
    let sample_rate = buffer.sample_rate();

    let header_field = |value: usize, what: &str| {
        u32::try_from(value).map_err(|_| {
            QuietcutError::stage_failed(Stage::Encoding, format!("{what} too large for WAV"))
        })
    };
    let channel_field = u16::try_from(channels).map_err(|_| {
        QuietcutError::stage_failed(
            Stage::Encoding,
            format!("{channels} channels do not fit a WAV header"),
        )
    })?;
    let block_align = channels * BYTES_PER_SAMPLE;
    let data_len = header_field(frames * block_align, "data length")?;
    let riff_len = header_field(frames * block_align + WAV_HEADER_LEN - 8, "file length")?;
    let byte_rate = header_field(sample_rate as usize * block_align, "byte rate")?;

    let mut bytes = Vec::with_capacity(WAV_HEADER_LEN + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&riff_len.to_le_bytes());
    bytes.extend_from_slice(b"WAVE");

    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // integer PCM
    bytes.extend_from_slice(&channel_field.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&byte_rate.to_le_bytes());
    bytes.extend_from_slice(&(block_align as u16).to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());

    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());

    let planes: Vec<&[f32]> = buffer.channels().collect();
    let chunks = frames.div_ceil(PCM_CHUNK_FRAMES);
    for chunk in 0..chunks {
        let start = chunk * PCM_CHUNK_FRAMES;
        let end = (start + PCM_CHUNK_FRAMES).min(frames);
        for frame in start..end {
            for plane in &planes {
                bytes.extend_from_slice(&float_to_i16(plane[frame]).to_le_bytes());
            }
        }
        hooks.progress((chunk + 1) as f32 / chunks as f32);
        hooks.yield_now();
    }

    debug!(frames, channels, bytes = bytes.len(), "Encoded WAV");
    Ok(bytes)
}
