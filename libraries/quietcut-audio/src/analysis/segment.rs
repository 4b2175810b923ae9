//! Silence segmentation
//!
//! The buffer is classified in fixed blocks of [`BLOCK_SIZE`] frames: a block
//! is silent when every sample on every channel is strictly below the
//! threshold. Runs of equal classification become [`Region`]s.
//!
//! [`apply_padding`] then moves each voiced/silent boundary into the silence
//! so word onsets and decays survive removal.

use super::level::db_to_linear;
use quietcut_core::{NoHooks, ProcessHooks, Region, SampleBuffer};
use tracing::debug;

/// Frames per classification block
pub const BLOCK_SIZE: usize = 1024;

/// Blocks analysed between host yields
const YIELD_EVERY_BLOCKS: usize = 2048;

/// Split a buffer into alternating silent and voiced regions
///
/// The returned regions are ordered, contiguous, and cover `[0, frames)`
/// exactly. An empty buffer yields no regions.
pub fn segment(buffer: &SampleBuffer, threshold_db: f32) -> Vec<Region> {
    segment_with_hooks(buffer, threshold_db, &mut NoHooks)
}

/// [`segment`] with cooperative yields and progress reports
pub fn segment_with_hooks(
    buffer: &SampleBuffer,
    threshold_db: f32,
    hooks: &mut dyn ProcessHooks,
) -> Vec<Region> {
    let frames = buffer.frames();
    if frames == 0 {
        return Vec::new();
    }

    let threshold = db_to_linear(threshold_db);
    let block_count = frames.div_ceil(BLOCK_SIZE);

    let mut regions = Vec::new();
    let mut run_start = 0;
    let mut run_silent = block_is_silent(buffer, 0, BLOCK_SIZE.min(frames), threshold);

    for block in 1..block_count {
        let start = block * BLOCK_SIZE;
        let end = (start + BLOCK_SIZE).min(frames);
        let silent = block_is_silent(buffer, start, end, threshold);

        if silent != run_silent {
            regions.push(Region::new(run_start, start, run_silent));
            run_start = start;
            run_silent = silent;
        }

        if block % YIELD_EVERY_BLOCKS == 0 {
            hooks.progress(block as f32 / block_count as f32);
            hooks.yield_now();
        }
    }
    regions.push(Region::new(run_start, frames, run_silent));
    hooks.progress(1.0);

    debug!(
        blocks = block_count,
        regions = regions.len(),
        threshold_db,
        "Segmented buffer"
    );
    regions
}

/// Check whether every sample in `[start, end)` on every channel is below `threshold`
fn block_is_silent(buffer: &SampleBuffer, start: usize, end: usize, threshold: f32) -> bool {
    let mut peak = 0.0f32;
    for channel in buffer.channels() {
        for &sample in &channel[start..end] {
            peak = peak.max(sample.abs());
            // Classification is already decided
            if peak >= threshold {
                return false;
            }
        }
    }
    peak < threshold
}

/// Grow voiced regions into adjoining silence by up to `padding` frames per side
///
/// Two sweeps run in order: the forward sweep extends each voiced region's
/// end into the following silent region, the backward sweep extends each
/// voiced region's start into the preceding one. Every shift is clamped to
/// the silent region's current length, so no region becomes negative and no
/// boundary crosses a neighbour. Region count and coverage are unchanged;
/// silent regions may shrink to zero length.
pub fn apply_padding(regions: &mut [Region], padding: usize) {
    if padding == 0 || regions.len() < 2 {
        return;
    }

    for i in 0..regions.len() - 1 {
        if !regions[i].is_silence && regions[i + 1].is_silence {
            let shift = padding.min(regions[i + 1].len());
            regions[i].end += shift;
            regions[i + 1].start += shift;
        }
    }

    for i in (1..regions.len()).rev() {
        if !regions[i].is_silence && regions[i - 1].is_silence {
            let shift = padding.min(regions[i - 1].len());
            regions[i].start -= shift;
            regions[i - 1].end -= shift;
        }
    }
}
