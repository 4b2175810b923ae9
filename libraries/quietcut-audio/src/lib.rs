//! quietcut Audio
//!
//! Offline silence removal and voice enhancement for decoded audio.
//!
//! This crate provides:
//! - Signal analysis (noise floor, silence segmentation, region splicing)
//! - Offline audio effects (biquad EQ, noise gate, compressor) and the
//!   fixed voice enhancement chain
//! - Encoders for 16-bit WAV and, through a pluggable backend, MP3
//! - A pipeline running all of the above in order
//!
//! # Example: Removing Silence
//!
//! ```rust
//! use quietcut_audio::pipeline::remove_silence;
//! use quietcut_core::{SampleBuffer, SilenceOptions};
//!
//! // One second of tone, two seconds of silence, one second of tone
//! let tone: Vec<f32> = (0..8_000).map(|i| (i as f32 * 0.17).sin() * 0.5).collect();
//! let mut samples = tone.clone();
//! samples.extend(std::iter::repeat(0.0).take(16_000));
//! samples.extend(tone);
//! let buffer = SampleBuffer::mono(samples, 8_000)?;
//!
//! let result = remove_silence(&buffer, &SilenceOptions::default())?;
//! assert!(result.buffer.frames() < buffer.frames());
//! # Ok::<(), quietcut_core::QuietcutError>(())
//! ```
//!
//! # Example: Full Pipeline
//!
//! ```rust
//! use quietcut_audio::encode::UnavailableBackend;
//! use quietcut_audio::pipeline::process;
//! use quietcut_core::{
//!     EnhanceOptions, NoHooks, OutputFormat, ProcessOptions, SampleBuffer, SilenceOptions,
//! };
//!
//! let buffer = SampleBuffer::silent(2, 44_100, 44_100)?;
//! let options = ProcessOptions {
//!     silence: Some(SilenceOptions::default()),
//!     enhance: Some(EnhanceOptions { aggressive_gate: true }),
//!     output: OutputFormat::Wav,
//! };
//!
//! let output = process(buffer, &options, &UnavailableBackend, &mut NoHooks)?;
//! assert_eq!(output.encoded.mime.as_str(), "audio/wav");
//! # Ok::<(), quietcut_core::QuietcutError>(())
//! ```

#![forbid(unsafe_code)]

pub mod analysis;
pub mod effects;
pub mod encode;
pub mod pipeline;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use encode::EncodedAudio;
pub use pipeline::{process, remove_silence, PipelineOutput};
