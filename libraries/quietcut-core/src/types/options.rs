/// Processing configuration
use crate::error::{QuietcutError, Result};
use serde::{Deserialize, Serialize};

/// Bitrates (kbps) an MP3 stream can declare
pub const MP3_BITRATES: [u32; 17] = [
    8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320,
];

/// MP3 bitrate used when none is configured
pub const DEFAULT_MP3_BITRATE: u32 = 128;

fn default_mp3_bitrate() -> u32 {
    DEFAULT_MP3_BITRATE
}

/// Settings for one silence removal run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SilenceOptions {
    /// Fraction of each qualifying silent region to remove (0.0 to 1.0)
    pub remove_ratio: f32,

    /// Level below which a block counts as silent, in dBFS
    pub threshold_db: f32,

    /// Silent regions shorter than this (seconds) are left alone
    pub min_silence_duration: f64,

    /// Frames (in seconds) handed from silence to each adjoining voiced region
    pub padding_duration: f64,

    /// Derive the threshold from the estimated noise floor instead of `threshold_db`
    pub auto_threshold: bool,
}

impl SilenceOptions {
    /// Check ranges
    ///
    /// # Errors
    /// Returns `UnsupportedConfiguration` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.remove_ratio) {
            return Err(QuietcutError::UnsupportedConfiguration(format!(
                "remove_ratio must be within [0, 1], got {}",
                self.remove_ratio
            )));
        }
        if !self.threshold_db.is_finite() && self.threshold_db != f32::NEG_INFINITY {
            return Err(QuietcutError::UnsupportedConfiguration(format!(
                "threshold_db must be a number, got {}",
                self.threshold_db
            )));
        }
        if self.threshold_db > 0.0 {
            return Err(QuietcutError::UnsupportedConfiguration(format!(
                "threshold_db must not exceed 0 dBFS, got {}",
                self.threshold_db
            )));
        }
        for (name, value) in [
            ("min_silence_duration", self.min_silence_duration),
            ("padding_duration", self.padding_duration),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(QuietcutError::UnsupportedConfiguration(format!(
                    "{} must be a non-negative number of seconds, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl Default for SilenceOptions {
    fn default() -> Self {
        Self {
            remove_ratio: 0.7,
            threshold_db: -35.0,
            min_silence_duration: 0.3,
            padding_duration: 0.05,
            auto_threshold: false,
        }
    }
}

/// Settings for one enhancement run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceOptions {
    /// Tighter gating and a brighter, hiss-free voicing
    pub aggressive_gate: bool,
}

/// MIME-equivalent tag of an encoded payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MimeType {
    Wav,
    Mp3,
}

impl MimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MimeType::Wav => "audio/wav",
            MimeType::Mp3 => "audio/mp3",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            MimeType::Wav => "wav",
            MimeType::Mp3 => "mp3",
        }
    }
}

/// Container to encode the final buffer into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum OutputFormat {
    /// 16-bit PCM WAV
    #[default]
    Wav,
    /// MP3 at a constant bitrate in kbps
    Mp3 {
        #[serde(default = "default_mp3_bitrate")]
        bitrate_kbps: u32,
    },
}

impl OutputFormat {
    pub fn mime(&self) -> MimeType {
        match self {
            OutputFormat::Wav => MimeType::Wav,
            OutputFormat::Mp3 { .. } => MimeType::Mp3,
        }
    }

    /// # Errors
    /// Returns `UnsupportedConfiguration` for a bitrate MP3 cannot declare.
    pub fn validate(&self) -> Result<()> {
        match self {
            OutputFormat::Wav => Ok(()),
            OutputFormat::Mp3 { bitrate_kbps } => {
                if MP3_BITRATES.contains(bitrate_kbps) {
                    Ok(())
                } else {
                    Err(QuietcutError::UnsupportedConfiguration(format!(
                        "unsupported MP3 bitrate: {} kbps",
                        bitrate_kbps
                    )))
                }
            }
        }
    }
}

/// Everything one pipeline run needs
///
/// A stage is skipped when its options are `None`; at least one must be set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessOptions {
    pub silence: Option<SilenceOptions>,
    pub enhance: Option<EnhanceOptions>,
    #[serde(default)]
    pub output: OutputFormat,
}

impl ProcessOptions {
    /// # Errors
    /// Returns `UnsupportedConfiguration` when no stage is requested or any
    /// stage's options are out of range.
    pub fn validate(&self) -> Result<()> {
        if self.silence.is_none() && self.enhance.is_none() {
            return Err(QuietcutError::UnsupportedConfiguration(
                "neither silence removal nor enhancement requested".to_string(),
            ));
        }
        if let Some(silence) = &self.silence {
            silence.validate()?;
        }
        self.output.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SilenceOptions::default().validate().is_ok());
        assert!(OutputFormat::default().validate().is_ok());
    }

    #[test]
    fn ratio_out_of_range() {
        let options = SilenceOptions {
            remove_ratio: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            options.validate(),
            Err(QuietcutError::UnsupportedConfiguration(_))
        ));
    }

    #[test]
    fn negative_padding_rejected() {
        let options = SilenceOptions {
            padding_duration: -0.1,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn nan_threshold_rejected() {
        let options = SilenceOptions {
            threshold_db: f32::NAN,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn no_stage_requested() {
        let options = ProcessOptions {
            silence: None,
            enhance: None,
            output: OutputFormat::Wav,
        };
        let err = options.validate().unwrap_err();
        assert!(err.to_string().contains("neither"));
    }

    #[test]
    fn mp3_bitrates() {
        assert!(OutputFormat::Mp3 { bitrate_kbps: 128 }.validate().is_ok());
        assert!(OutputFormat::Mp3 { bitrate_kbps: 100 }.validate().is_err());
        assert_eq!(OutputFormat::Mp3 { bitrate_kbps: 192 }.mime().as_str(), "audio/mp3");
    }

    #[test]
    fn partial_toml_style_input_uses_defaults() {
        let options: SilenceOptions = serde_json::from_str(r#"{"remove_ratio":0.5}"#).unwrap();
        assert_eq!(options.remove_ratio, 0.5);
        assert_eq!(options.threshold_db, -35.0);
    }

    #[test]
    fn output_format_tagged() {
        let format: OutputFormat =
            serde_json::from_str(r#"{"format":"mp3","bitrate_kbps":192}"#).unwrap();
        assert_eq!(format, OutputFormat::Mp3 { bitrate_kbps: 192 });
    }

    #[test]
    fn mp3_bitrate_defaults() {
        let format: OutputFormat = serde_json::from_str(r#"{"format":"mp3"}"#).unwrap();
        assert_eq!(
            format,
            OutputFormat::Mp3 {
                bitrate_kbps: DEFAULT_MP3_BITRATE
            }
        );
    }
}
