//! Region splicing
//!
//! Rebuilds a buffer from a region list, keeping every voiced region whole
//! and only a leading fraction of each long-enough silent region.

use quietcut_core::{ProcessHooks, QuietcutError, Region, Result, SampleBuffer, Stage};
use tracing::debug;

/// Regions copied between progress reports
pub const PROGRESS_STRIDE_REGIONS: usize = 50;

/// Number of leading frames of `region` that survive splicing
///
/// Voiced regions and silent regions shorter than `min_silence_frames` are
/// kept whole; longer silent regions keep `floor(len * (1 - remove_ratio))`.
pub fn kept_frames(region: &Region, remove_ratio: f32, min_silence_frames: usize) -> usize {
    let len = region.len();
    if !region.is_silence || len < min_silence_frames {
        return len;
    }

    let keep_ratio = 1.0 - f64::from(remove_ratio.clamp(0.0, 1.0));
    ((len as f64 * keep_ratio).floor() as usize).min(len)
}

/// Assemble a new buffer from the kept prefix of each region
///
/// The output length is computed up front so each channel is allocated once.
/// Zero-length regions are skipped. `regions` are read only.
///
/// # Errors
/// Returns a `Splicing` stage error if a region lies outside the buffer or
/// has its start after its end.
pub fn splice(
    buffer: &SampleBuffer,
    regions: &[Region],
    remove_ratio: f32,
    min_silence_frames: usize,
    hooks: &mut dyn ProcessHooks,
) -> Result<SampleBuffer> {
    let frames = buffer.frames();
    if let Some(bad) = regions
        .iter()
        .find(|region| region.start > region.end || region.end > frames)
    {
        return Err(QuietcutError::stage_failed(
            Stage::Splicing,
            format!(
                "region [{}, {}) does not fit a buffer of {} frames",
                bad.start, bad.end, frames
            ),
        ));
    }

    let keep: Vec<usize> = regions
        .iter()
        .map(|region| kept_frames(region, remove_ratio, min_silence_frames))
        .collect();
    let total: usize = keep.iter().sum();

    let channel_count = buffer.channel_count();
    let steps = (channel_count * regions.len()).max(1);
    let mut channels = Vec::with_capacity(channel_count);

    for (channel_index, source) in buffer.channels().enumerate() {
        let mut output = Vec::with_capacity(total);
        for (region_index, (region, &count)) in regions.iter().zip(&keep).enumerate() {
            if count > 0 {
                output.extend_from_slice(&source[region.start..region.start + count]);
            }

            if region_index % PROGRESS_STRIDE_REGIONS == 0 {
                let step = channel_index * regions.len() + region_index;
                hooks.progress(step as f32 / steps as f32);
                hooks.yield_now();
            }
        }
        channels.push(output);
    }
    hooks.progress(1.0);

    debug!(
        input_frames = frames,
        output_frames = total,
        regions = regions.len(),
        "Spliced regions"
    );
    SampleBuffer::new(channels, buffer.sample_rate())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quietcut_core::NoHooks;

    fn ramp(frames: usize) -> SampleBuffer {
        let left: Vec<f32> = (0..frames).map(|i| i as f32).collect();
        let right: Vec<f32> = (0..frames).map(|i| -(i as f32)).collect();
        SampleBuffer::new(vec![left, right], 1_000).unwrap()
    }

    #[test]
    fn voiced_regions_kept_whole() {
        let region = Region::new(0, 100, false);
        assert_eq!(kept_frames(&region, 1.0, 0), 100);
    }

    #[test]
    fn short_silence_kept_whole() {
        let region = Region::new(0, 99, true);
        assert_eq!(kept_frames(&region, 1.0, 100), 99);
    }

    #[test]
    fn long_silence_keeps_fraction() {
        let region = Region::new(0, 1000, true);
        assert_eq!(kept_frames(&region, 0.7, 100), 300);
        assert_eq!(kept_frames(&region, 0.0, 100), 1000);
        assert_eq!(kept_frames(&region, 1.0, 100), 0);
    }

    #[test]
    fn keeps_prefix_of_silence() {
        let buffer = ramp(10);
        let regions = vec![
            Region::new(0, 2, false),
            Region::new(2, 8, true),
            Region::new(8, 10, false),
        ];
        let output = splice(&buffer, &regions, 0.5, 0, &mut NoHooks).unwrap();
        assert_eq!(output.channel(0).unwrap(), &[0.0, 1.0, 2.0, 3.0, 4.0, 8.0, 9.0]);
        assert_eq!(
            output.channel(1).unwrap(),
            &[0.0, -1.0, -2.0, -3.0, -4.0, -8.0, -9.0]
        );
    }

    #[test]
    fn zero_length_regions_are_skipped() {
        let buffer = ramp(6);
        let regions = vec![
            Region::new(0, 3, false),
            Region::new(3, 3, true),
            Region::new(3, 6, false),
        ];
        let output = splice(&buffer, &regions, 1.0, 0, &mut NoHooks).unwrap();
        assert_eq!(output, buffer);
    }

    #[test]
    fn region_outside_buffer_is_rejected() {
        let buffer = ramp(4);
        let err = splice(&buffer, &[Region::new(0, 5, false)], 0.0, 0, &mut NoHooks).unwrap_err();
        assert_eq!(err.stage(), Stage::Splicing);
    }

    #[test]
    fn empty_region_list_gives_empty_buffer() {
        let buffer = ramp(4);
        let output = splice(&buffer, &[], 0.5, 0, &mut NoHooks).unwrap();
        assert!(output.is_empty());
        assert_eq!(output.channel_count(), 2);
        assert_eq!(output.sample_rate(), 1_000);
    }

    #[test]
    fn progress_is_monotonic_and_ends_at_one() {
        struct Collect(Vec<f32>);
        impl ProcessHooks for Collect {
            fn progress(&mut self, fraction: f32) {
                self.0.push(fraction);
            }
        }

        let buffer = ramp(400);
        let regions: Vec<Region> = (0..200)
            .map(|i| Region::new(i * 2, i * 2 + 2, i % 2 == 1))
            .collect();
        let mut hooks = Collect(Vec::new());
        splice(&buffer, &regions, 0.5, 0, &mut hooks).unwrap();

        assert!(hooks.0.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(*hooks.0.last().unwrap(), 1.0);
        assert!(hooks.0.iter().all(|f| (0.0..=1.0).contains(f)));
    }
}
