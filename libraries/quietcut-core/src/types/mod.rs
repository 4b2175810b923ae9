/// Domain types for the quietcut pipeline
mod audio;
mod options;
mod region;

pub use audio::SampleBuffer;
pub use options::{
    EnhanceOptions, MimeType, OutputFormat, ProcessOptions, SilenceOptions, DEFAULT_MP3_BITRATE,
    MP3_BITRATES,
};
pub use region::{ProcessResult, Region};
