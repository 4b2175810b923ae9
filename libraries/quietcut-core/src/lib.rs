//! quietcut core
//!
//! Platform-agnostic types, hooks, and error handling for the quietcut
//! silence-removal and voice-enhancement pipeline.
//!
//! This crate provides:
//! - **Domain Types**: `SampleBuffer`, `Region`, `ProcessResult`, option structs
//! - **Host Hooks**: `ProcessHooks` for cooperative yielding and progress
//! - **Error Handling**: Unified `QuietcutError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use quietcut_core::{SampleBuffer, SilenceOptions};
//!
//! let buffer = SampleBuffer::new(vec![vec![0.0; 44_100], vec![0.0; 44_100]], 44_100)?;
//! assert_eq!(buffer.frames(), 44_100);
//!
//! let options = SilenceOptions { remove_ratio: 0.5, ..Default::default() };
//! options.validate()?;
//! # Ok::<(), quietcut_core::QuietcutError>(())
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod hooks;
pub mod types;

pub use error::{QuietcutError, Result, Stage};
pub use hooks::{NoHooks, OnProgress, ProcessHooks, ProgressSpan};
pub use types::{
    EnhanceOptions, MimeType, OutputFormat, ProcessOptions, ProcessResult, Region, SampleBuffer,
    SilenceOptions, DEFAULT_MP3_BITRATE, MP3_BITRATES,
};
