//! Block-wise lossy encoding
//!
//! Samples are converted to 16-bit PCM one block of [`LOSSY_BLOCK_FRAMES`]
//! at a time and handed to a [`FrameEncoder`] opened from a
//! [`LossyBackend`]. The encoder is flushed once after the last block.

use super::pcm::float_to_i16;
use quietcut_core::{ProcessHooks, QuietcutError, Result, SampleBuffer, MP3_BITRATES};
use tracing::debug;

/// Frames per conversion block, ten MP3 frames of 1152 samples
pub const LOSSY_BLOCK_FRAMES: usize = 11_520;

/// One block of 16-bit PCM in encoder channel layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PcmBlock<'a> {
    Mono(&'a [i16]),
    Stereo { left: &'a [i16], right: &'a [i16] },
}

impl PcmBlock<'_> {
    pub fn frames(&self) -> usize {
        match self {
            PcmBlock::Mono(samples) => samples.len(),
            PcmBlock::Stereo { left, .. } => left.len(),
        }
    }
}

/// Parameters an encoder is opened with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderSpec {
    pub sample_rate: u32,
    /// 1 or 2
    pub channels: usize,
    pub bitrate_kbps: u32,
}

/// A running frame-based encoder
pub trait FrameEncoder {
    /// Encode one block, returning whatever output is ready
    fn encode(&mut self, block: PcmBlock<'_>) -> Result<Vec<u8>>;

    /// Drain buffered state; no blocks may follow
    fn flush(&mut self) -> Result<Vec<u8>>;
}

/// Source of lossy encoders
pub trait LossyBackend {
    fn name(&self) -> &str;

    /// Whether encoders can currently be opened
    fn is_available(&self) -> bool;

    /// Whether mono input must be fed as two identical channels
    fn requires_stereo(&self) -> bool {
        false
    }

    fn open(&self, spec: &EncoderSpec) -> Result<Box<dyn FrameEncoder>>;
}

/// Backend for builds or hosts without a lossy encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableBackend;

impl LossyBackend for UnavailableBackend {
    fn name(&self) -> &str {
        "none"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn open(&self, _spec: &EncoderSpec) -> Result<Box<dyn FrameEncoder>> {
        Err(QuietcutError::EncoderUnavailable(
            "no lossy encoder configured".to_string(),
        ))
    }
}

/// Most channels a lossy stream can carry
pub const MAX_LOSSY_CHANNELS: usize = 2;

/// Reject a lossy request that cannot succeed, without touching samples
///
/// # Errors
/// Same configuration and availability errors as [`encode_lossy`].
pub fn check_lossy(channels: usize, bitrate_kbps: u32, backend: &dyn LossyBackend) -> Result<()> {
    if !MP3_BITRATES.contains(&bitrate_kbps) {
        return Err(QuietcutError::UnsupportedConfiguration(format!(
            "bitrate {bitrate_kbps} kbps is not a supported MP3 bitrate"
        )));
    }
    if channels > MAX_LOSSY_CHANNELS {
        return Err(QuietcutError::UnsupportedConfiguration(format!(
            "lossy output supports at most {MAX_LOSSY_CHANNELS} channels, got {channels}"
        )));
    }
    if !backend.is_available() {
        return Err(QuietcutError::EncoderUnavailable(format!(
            "{} encoder is not available",
            backend.name()
        )));
    }
    Ok(())
}

/// Encode a buffer through `backend` at `bitrate_kbps`
///
/// Availability is checked before any sample is converted. Mono input is
/// duplicated to both encoder channels when the backend requires stereo.
///
/// # Errors
/// - `UnsupportedConfiguration` for a bitrate outside [`MP3_BITRATES`] or
///   more than two channels
/// - `EncoderUnavailable` if the backend cannot encode
/// - any error the encoder reports while encoding or flushing
pub fn encode_lossy(
    buffer: &SampleBuffer,
    bitrate_kbps: u32,
    backend: &dyn LossyBackend,
    hooks: &mut dyn ProcessHooks,
) -> Result<Vec<u8>> {
    check_lossy(buffer.channel_count(), bitrate_kbps, backend)?;

    let input_channels = buffer.channel_count();
    let duplicate_mono = input_channels == 1 && backend.requires_stereo();
    let spec = EncoderSpec {
        sample_rate: buffer.sample_rate(),
        channels: if duplicate_mono { 2 } else { input_channels },
        bitrate_kbps,
    };
    let mut encoder = backend.open(&spec)?;

    let planes: Vec<&[f32]> = buffer.channels().collect();
    let frames = buffer.frames();
    let blocks = frames.div_ceil(LOSSY_BLOCK_FRAMES);
    let mut output = Vec::new();
    let mut left = Vec::with_capacity(LOSSY_BLOCK_FRAMES);
    let mut right = Vec::with_capacity(LOSSY_BLOCK_FRAMES);

    for block in 0..blocks {
        let start = block * LOSSY_BLOCK_FRAMES;
        let end = (start + LOSSY_BLOCK_FRAMES).min(frames);

        left.clear();
        left.extend(planes[0][start..end].iter().map(|&s| float_to_i16(s)));

        let pcm = if let Some(plane) = planes.get(1) {
            right.clear();
            right.extend(plane[start..end].iter().map(|&s| float_to_i16(s)));
            PcmBlock::Stereo {
                left: &left,
                right: &right,
            }
        } else if duplicate_mono {
            PcmBlock::Stereo {
                left: &left,
                right: &left,
            }
        } else {
            PcmBlock::Mono(&left)
        };

        output.extend(encoder.encode(pcm)?);
        hooks.progress((block + 1) as f32 / blocks.max(1) as f32);
        hooks.yield_now();
    }
    output.extend(encoder.flush()?);
    hooks.progress(1.0);

    debug!(
        backend = backend.name(),
        frames,
        blocks,
        bitrate_kbps,
        bytes = output.len(),
        "Encoded lossy stream"
    );
    Ok(output)
}
