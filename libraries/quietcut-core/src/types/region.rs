/// Silence segmentation results
use super::audio::SampleBuffer;
use serde::{Deserialize, Serialize};

/// A contiguous span of frames sharing one silence classification
///
/// `start` is inclusive, `end` exclusive, both in frames of the buffer the
/// region was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub start: usize,
    pub end: usize,
    pub is_silence: bool,
}

impl Region {
    pub fn new(start: usize, end: usize, is_silence: bool) -> Self {
        Self {
            start,
            end,
            is_silence,
        }
    }

    /// Number of frames covered
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Output of silence removal
///
/// `regions` describe the layout of the *input* buffer and exist for
/// rendering only; they are not meant to be fed back into processing.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    pub buffer: SampleBuffer,
    pub regions: Vec<Region>,
    /// Input frames minus output frames
    pub removed_frames: usize,
    /// Estimated noise floor, present when the threshold was derived from it
    pub noise_floor_db: Option<f32>,
}

impl ProcessResult {
    /// Regions classified as silence
    pub fn silent_regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(|region| region.is_silence)
    }
}
