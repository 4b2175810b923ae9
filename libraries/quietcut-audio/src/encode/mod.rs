//! Output encoders
//!
//! - **PCM**: 16-bit WAV written in memory
//! - **Lossy**: block-wise MP3 through a pluggable [`LossyBackend`]

mod ffmpeg;
mod lossy;
mod pcm;

pub use ffmpeg::FfmpegBackend;
pub use lossy::{
    check_lossy, encode_lossy, EncoderSpec, FrameEncoder, LossyBackend, PcmBlock,
    UnavailableBackend, LOSSY_BLOCK_FRAMES, MAX_LOSSY_CHANNELS,
};
pub use pcm::{encode_wav, float_to_i16, PCM_CHUNK_FRAMES, WAV_HEADER_LEN};

use quietcut_core::{MimeType, OutputFormat, ProcessHooks, Result, SampleBuffer};

/// Encoded file contents and their media type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAudio {
    pub bytes: Vec<u8>,
    pub mime: MimeType,
}

/// Encode `buffer` in the requested output format
///
/// `backend` is only consulted for lossy formats.
pub fn encode(
    buffer: &SampleBuffer,
    format: &OutputFormat,
    backend: &dyn LossyBackend,
    hooks: &mut dyn ProcessHooks,
) -> Result<EncodedAudio> {
    let bytes = match *format {
        OutputFormat::Wav => encode_wav(buffer, hooks)?,
        OutputFormat::Mp3 { bitrate_kbps } => {
            encode_lossy(buffer, bitrate_kbps, backend, hooks)?
        }
    };
    Ok(EncodedAudio {
        bytes,
        mime: format.mime(),
    })
}
