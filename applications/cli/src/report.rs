//! Region reports written next to processed audio or printed by `analyze`

use crate::error::Result;
use quietcut_audio::analysis::{apply_padding, estimate_noise_floor, segment};
use quietcut_audio::pipeline::{auto_threshold_db, PipelineOutput};
use quietcut_core::{Region, SampleBuffer, SilenceOptions};
use serde::Serialize;
use std::path::Path;

/// Region layout of an input buffer plus run statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionReport {
    pub sample_rate: u32,
    pub input_frames: usize,
    /// Absent for a dry analysis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_frames: Option<usize>,
    pub removed_frames: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise_floor_db: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_db: Option<f32>,
    pub regions: Vec<Region>,
}

impl RegionReport {
    /// Summarize a finished pipeline run over an input of `input_frames`
    pub fn from_run(input_frames: usize, sample_rate: u32, output: &PipelineOutput) -> Self {
        Self {
            sample_rate,
            input_frames,
            output_frames: Some(output.buffer.frames()),
            removed_frames: output.removed_frames,
            noise_floor_db: output.noise_floor_db,
            threshold_db: None,
            regions: output.regions.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Segment and pad `buffer` without splicing it
///
/// The noise floor is always estimated and reported. `threshold_override`
/// takes precedence over both the automatic and the configured threshold and
/// is validated like a configured one.
pub fn analyze(
    buffer: &SampleBuffer,
    options: &SilenceOptions,
    threshold_override: Option<f32>,
) -> Result<RegionReport> {
    let mut options = *options;
    if let Some(threshold_db) = threshold_override {
        options.threshold_db = threshold_db;
    }
    options.validate()?;

    let noise_floor_db = estimate_noise_floor(buffer);
    let threshold_db = threshold_override.unwrap_or(if options.auto_threshold {
        auto_threshold_db(noise_floor_db)
    } else {
        options.threshold_db
    });

    let mut regions = segment(buffer, threshold_db);
    apply_padding(&mut regions, buffer.seconds_to_frames(options.padding_duration));

    Ok(RegionReport {
        sample_rate: buffer.sample_rate(),
        input_frames: buffer.frames(),
        output_frames: None,
        removed_frames: 0,
        noise_floor_db: Some(noise_floor_db),
        threshold_db: Some(threshold_db),
        regions,
    })
}
