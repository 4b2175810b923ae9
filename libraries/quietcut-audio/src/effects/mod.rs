//! Audio effects processing
//!
//! Trait-based effect chain for offline processing. All effects operate on
//! planar f32 buffers and resolve the whole buffer per call.
//!
//! Available effects:
//! - **BiquadFilter**: high/low-pass, shelf and peaking sections
//! - **NoiseGate**: envelope-driven downward expander
//! - **Compressor**: channel-linked dynamic range compressor
//! - **Gain**: fixed linear gain
//!
//! [`enhance`] runs them as the fixed voice enhancement cascade.

mod chain;
mod compressor;
mod enhance;
mod eq;
mod gain;
mod gate;

pub use chain::{AudioEffect, EffectChain};
pub use compressor::{Compressor, CompressorSettings};
pub use enhance::{
    build_chain, enhance, enhance_with_hooks, gate_threshold_db, GATE_OFFSET_AGGRESSIVE_DB,
    GATE_OFFSET_NORMAL_DB, GATE_THRESHOLD_MAX_DB, GATE_THRESHOLD_MIN_DB, MAKEUP_GAIN,
};
pub use eq::{BiquadFilter, EqBand, FilterType};
pub use gain::Gain;
pub use gate::{gate, EnvelopeFollower, GateSettings, NoiseGate};
