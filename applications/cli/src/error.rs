/// CLI error types
use quietcut_core::QuietcutError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Processing error: {0}")]
    Processing(#[from] QuietcutError),

    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}

/// Input that could not be turned into samples
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unrecognized container: {0}")]
    Probe(String),

    #[error("No decodable audio track")]
    NoTrack,

    #[error("Unsupported codec: {0}")]
    Codec(String),

    #[error("Corrupt stream: {0}")]
    Stream(String),

    #[error("Channel layout changed mid-stream ({expected} -> {found} channels)")]
    ChannelChange { expected: usize, found: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Buffer(#[from] QuietcutError),
}
