//! Signal analysis for silence removal
//!
//! - **Noise floor**: sparse low-percentile loudness estimate
//! - **Segmenter**: block-wise silent/voiced classification plus boundary padding
//! - **Splicer**: per-region truncation and buffer reassembly

mod level;
mod noise_floor;
mod segment;
mod splice;

pub use level::{db_to_linear, linear_to_db, rms};
pub use noise_floor::{
    estimate_noise_floor, FALLBACK_NOISE_FLOOR_DB, FLOOR_PERCENTILE, HOP_SECS, SILENCE_RMS_FLOOR,
    WINDOW_SECS,
};
pub use segment::{apply_padding, segment, segment_with_hooks, BLOCK_SIZE};
pub use splice::{kept_frames, splice, PROGRESS_STRIDE_REGIONS};
