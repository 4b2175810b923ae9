/// Core error types for quietcut
use std::fmt;
use thiserror::Error;

/// Result type alias using `QuietcutError`
pub type Result<T> = std::result::Result<T, QuietcutError>;

/// Pipeline stage an error originated from
///
/// Noise floor estimation, segmentation, gating and enhancement cannot fail
/// once options are validated, so they have no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validation,
    Splicing,
    Encoding,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validation => "validation",
            Stage::Splicing => "region splicing",
            Stage::Encoding => "encoding",
        };
        f.write_str(name)
    }
}

/// Core error type for quietcut
///
/// Every failure is terminal for the call that produced it; no partial
/// buffer or payload accompanies an error.
#[derive(Error, Debug)]
pub enum QuietcutError {
    /// Options out of range, or nothing to do
    #[error("Unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    /// No lossy encoder backend is loaded
    #[error("Encoder unavailable: {0}")]
    EncoderUnavailable(String),

    /// Sample buffer shape is inconsistent
    #[error("Invalid sample buffer: {0}")]
    InvalidBuffer(String),

    /// Failure inside a specific stage
    #[error("{stage} failed: {message}")]
    Stage { stage: Stage, message: String },
}

impl QuietcutError {
    /// Create a stage failure
    pub fn stage_failed(stage: Stage, message: impl Into<String>) -> Self {
        Self::Stage {
            stage,
            message: message.into(),
        }
    }

    /// The stage that failed
    pub fn stage(&self) -> Stage {
        match self {
            Self::UnsupportedConfiguration(_) | Self::InvalidBuffer(_) => Stage::Validation,
            Self::EncoderUnavailable(_) => Stage::Encoding,
            Self::Stage { stage, .. } => *stage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_of_each_variant() {
        assert_eq!(
            QuietcutError::UnsupportedConfiguration("x".into()).stage(),
            Stage::Validation
        );
        assert_eq!(
            QuietcutError::EncoderUnavailable("x".into()).stage(),
            Stage::Encoding
        );
        assert_eq!(
            QuietcutError::stage_failed(Stage::Splicing, "boom").stage(),
            Stage::Splicing
        );
    }

    #[test]
    fn stage_failure_message_names_stage() {
        let err = QuietcutError::stage_failed(Stage::Encoding, "backend rejected block");
        assert_eq!(err.to_string(), "encoding failed: backend rejected block");
    }

    #[test]
    fn splicing_failure_message() {
        let err = QuietcutError::stage_failed(Stage::Splicing, "region out of bounds");
        assert_eq!(err.to_string(), "region splicing failed: region out of bounds");
    }
}
