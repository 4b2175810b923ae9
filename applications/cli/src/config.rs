/// CLI configuration
use crate::error::{CliError, Result};
use config::{Config, Environment, File, FileFormat};
use quietcut_core::{EnhanceOptions, OutputFormat, ProcessOptions, SilenceOptions};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "quietcut.toml";

/// Prefix of environment overrides, e.g. `QUIETCUT_SILENCE__REMOVE_RATIO`
pub const ENV_PREFIX: &str = "QUIETCUT";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub stages: StageSettings,

    #[serde(default)]
    pub silence: SilenceOptions,

    #[serde(default)]
    pub enhance: EnhanceOptions,

    #[serde(default)]
    pub output: OutputFormat,

    #[serde(default)]
    pub encoder: EncoderSettings,
}

/// Which pipeline stages run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct StageSettings {
    #[serde(default = "default_silence_enabled")]
    pub silence: bool,

    #[serde(default)]
    pub enhance: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EncoderSettings {
    /// Executable used for MP3 output, resolved on `PATH` when relative
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given; otherwise [`DEFAULT_CONFIG_FILE`] is read
    /// if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(path, None)
    }

    /// Load with an explicit environment map instead of the process environment
    pub fn load_from(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut settings = Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(File::from(path).format(FileFormat::Toml));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings =
                        settings.add_source(File::from(default_path).format(FileFormat::Toml));
                }
            }
        }

        // Override with environment variables (prefixed with QUIETCUT_)
        settings = settings.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config: AppConfig = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.silence
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        self.output
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;

        if self.encoder.ffmpeg_path.as_os_str().is_empty() {
            return Err(CliError::Config(
                "encoder.ffmpeg_path must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Pipeline options for the enabled stages
    pub fn process_options(&self) -> Result<ProcessOptions> {
        let options = ProcessOptions {
            silence: self.stages.silence.then_some(self.silence),
            enhance: self.stages.enhance.then_some(self.enhance),
            output: self.output,
        };
        options
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        Ok(options)
    }
}

fn default_silence_enabled() -> bool {
    true
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

impl Default for StageSettings {
    fn default() -> Self {
        Self {
            silence: default_silence_enabled(),
            enhance: false,
        }
    }
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = AppConfig::default();
        config.validate().unwrap();
        let options = config.process_options().unwrap();
        assert!(options.silence.is_some());
        assert!(options.enhance.is_none());
        assert_eq!(options.output, OutputFormat::Wav);
    }

    #[test]
    fn no_stage_is_rejected() {
        let config = AppConfig {
            stages: StageSettings {
                silence: false,
                enhance: false,
            },
            ..Default::default()
        };
        assert!(matches!(
            config.process_options(),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn empty_ffmpeg_path_is_rejected() {
        let mut config = AppConfig::default();
        config.encoder.ffmpeg_path = PathBuf::new();
        assert!(config.validate().is_err());
    }
}
