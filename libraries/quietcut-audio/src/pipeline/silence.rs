/// Silence removal: threshold, segment, pad, splice
use crate::analysis::{apply_padding, estimate_noise_floor, segment_with_hooks, splice};
use quietcut_core::{
    NoHooks, ProcessHooks, ProcessResult, ProgressSpan, Result, SampleBuffer, SilenceOptions,
};
use tracing::{debug, info};

/// Automatic threshold sits this far above the noise floor
pub const AUTO_THRESHOLD_OFFSET_DB: f32 = 10.0;
/// Lowest automatic threshold
pub const AUTO_THRESHOLD_MIN_DB: f32 = -60.0;
/// Highest automatic threshold
pub const AUTO_THRESHOLD_MAX_DB: f32 = -20.0;

/// Segmentation threshold derived from a noise floor
pub fn auto_threshold_db(noise_floor_db: f32) -> f32 {
    (noise_floor_db + AUTO_THRESHOLD_OFFSET_DB).clamp(AUTO_THRESHOLD_MIN_DB, AUTO_THRESHOLD_MAX_DB)
}

/// Shorten long silent passages of `buffer`
///
/// The input is left untouched. The returned regions describe the input
/// buffer after padding.
///
/// # Errors
/// Returns `UnsupportedConfiguration` for out-of-range options.
pub fn remove_silence(buffer: &SampleBuffer, options: &SilenceOptions) -> Result<ProcessResult> {
    remove_silence_with_hooks(buffer, options, &mut NoHooks)
}

/// [`remove_silence`] with host yields and progress reports
pub fn remove_silence_with_hooks(
    buffer: &SampleBuffer,
    options: &SilenceOptions,
    hooks: &mut dyn ProcessHooks,
) -> Result<ProcessResult> {
    options.validate()?;

    let noise_floor_db = options
        .auto_threshold
        .then(|| estimate_noise_floor(buffer));
    let threshold_db = noise_floor_db.map_or(options.threshold_db, auto_threshold_db);
    debug!(threshold_db, ?noise_floor_db, "Silence threshold");

    let mut regions =
        segment_with_hooks(buffer, threshold_db, &mut ProgressSpan::new(hooks, 0.0, 0.5));
    apply_padding(&mut regions, buffer.seconds_to_frames(options.padding_duration));

    let spliced = splice(
        buffer,
        &regions,
        options.remove_ratio,
        buffer.seconds_to_frames(options.min_silence_duration),
        &mut ProgressSpan::new(hooks, 0.5, 1.0),
    )?;

    let removed_frames = buffer.frames() - spliced.frames();
    info!(
        input_secs = buffer.duration_secs(),
        output_secs = spliced.duration_secs(),
        regions = regions.len(),
        removed_frames,
        "Silence removed"
    );

    Ok(ProcessResult {
        buffer: spliced,
        regions,
        removed_frames,
        noise_floor_db,
    })
}
