//! Noise floor estimation
//!
//! Samples one short window per second of channel 0 and reports a low
//! percentile of the window RMS values. The figure seeds thresholds only, so
//! a sparse scan is precise enough even on long recordings.

use super::level::{linear_to_db, rms};
use quietcut_core::SampleBuffer;
use tracing::debug;

/// Length of each analysis window in seconds
pub const WINDOW_SECS: f64 = 0.05;

/// Distance between window starts in seconds
pub const HOP_SECS: f64 = 1.0;

/// Windows quieter than this RMS are digital silence and ignored
pub const SILENCE_RMS_FLOOR: f32 = 1e-6;

/// Percentile of surviving window levels taken as the floor
pub const FLOOR_PERCENTILE: f64 = 0.1;

/// Returned when no window carries any signal
pub const FALLBACK_NOISE_FLOOR_DB: f32 = -60.0;

/// Estimate the noise floor of a buffer in dBFS
pub fn estimate_noise_floor(buffer: &SampleBuffer) -> f32 {
    let Some(samples) = buffer.channel(0) else {
        return FALLBACK_NOISE_FLOOR_DB;
    };

    let window = buffer.seconds_to_frames(WINDOW_SECS).max(1);
    let hop = buffer.seconds_to_frames(HOP_SECS).max(1);

    let mut levels: Vec<f32> = (0..samples.len())
        .step_by(hop)
        .take_while(|start| start + window <= samples.len())
        .map(|start| rms(&samples[start..start + window]))
        .filter(|level| *level >= SILENCE_RMS_FLOOR)
        .collect();

    if levels.is_empty() {
        debug!("No audible analysis windows, using fallback noise floor");
        return FALLBACK_NOISE_FLOOR_DB;
    }

    levels.sort_by(f32::total_cmp);
    let index = (FLOOR_PERCENTILE * levels.len() as f64).floor() as usize;
    let floor_db = linear_to_db(levels[index]);

    debug!(
        windows = levels.len(),
        noise_floor_db = floor_db,
        "Estimated noise floor"
    );
    floor_db
}
