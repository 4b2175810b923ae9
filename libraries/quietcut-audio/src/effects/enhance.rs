//! Voice enhancement chain
//!
//! A fixed cascade, always in this order:
//!
//! 1. Adaptive noise gate (threshold from the measured noise floor)
//! 2. High-pass against rumble
//! 3. Low-shelf warmth at 100 Hz
//! 4. Peaking cut at 350 Hz against boxiness
//! 5. De-essers at 5.5, 7.5 and 10 kHz
//! 6. Low-pass at 6.5 kHz (aggressive) or high-shelf cut at 12 kHz (normal)
//! 7. Voice compressor
//! 8. Makeup gain
//!
//! The gate runs first so gated silence is never lifted by the makeup gain.

use super::chain::EffectChain;
use super::compressor::{Compressor, CompressorSettings};
use super::eq::{BiquadFilter, EqBand};
use super::gain::Gain;
use super::gate::{GateSettings, NoiseGate};
use crate::analysis::estimate_noise_floor;
use quietcut_core::{EnhanceOptions, NoHooks, ProcessHooks, SampleBuffer};
use tracing::debug;

/// Gate threshold above the noise floor, normal mode
pub const GATE_OFFSET_NORMAL_DB: f32 = 6.0;
/// Gate threshold above the noise floor, aggressive mode
pub const GATE_OFFSET_AGGRESSIVE_DB: f32 = 22.0;
/// Lowest gate threshold
pub const GATE_THRESHOLD_MIN_DB: f32 = -50.0;
/// Highest gate threshold
pub const GATE_THRESHOLD_MAX_DB: f32 = -12.0;
/// Linear gain after compression
pub const MAKEUP_GAIN: f32 = 1.3;

const PEAKING_Q: f32 = 1.0;
const DE_ESSER_Q: f32 = 2.0;
const DE_ESSERS: [(f32, f32); 3] = [(5_500.0, -5.0), (7_500.0, -7.0), (10_000.0, -8.0)];

/// Gate threshold for a measured noise floor
pub fn gate_threshold_db(noise_floor_db: f32, aggressive: bool) -> f32 {
    let offset = if aggressive {
        GATE_OFFSET_AGGRESSIVE_DB
    } else {
        GATE_OFFSET_NORMAL_DB
    };
    (noise_floor_db + offset).clamp(GATE_THRESHOLD_MIN_DB, GATE_THRESHOLD_MAX_DB)
}

/// Build the enhancement cascade for a given gate threshold
pub fn build_chain(gate_threshold_db: f32, aggressive: bool) -> EffectChain {
    let mut chain = EffectChain::new();

    chain.add_effect(Box::new(NoiseGate::new(
        gate_threshold_db,
        GateSettings::for_mode(aggressive),
    )));

    let (high_pass_hz, warmth_db) = if aggressive {
        (160.0, 0.5)
    } else {
        (85.0, 2.0)
    };
    chain.add_effect(Box::new(BiquadFilter::new(EqBand::high_pass(high_pass_hz))));
    chain.add_effect(Box::new(BiquadFilter::new(EqBand::low_shelf(100.0, warmth_db))));
    chain.add_effect(Box::new(BiquadFilter::new(EqBand::peaking(
        350.0, -2.5, PEAKING_Q,
    ))));

    for (frequency, gain_db) in DE_ESSERS {
        chain.add_effect(Box::new(BiquadFilter::new(EqBand::peaking(
            frequency, gain_db, DE_ESSER_Q,
        ))));
    }

    let top = if aggressive {
        EqBand::low_pass(6_500.0)
    } else {
        EqBand::high_shelf(12_000.0, -6.0)
    };
    chain.add_effect(Box::new(BiquadFilter::new(top)));

    chain.add_effect(Box::new(Compressor::with_settings(
        CompressorSettings::voice(),
    )));
    chain.add_effect(Box::new(Gain::new(MAKEUP_GAIN)));

    chain
}

/// Enhance a buffer into a new buffer of the same shape
pub fn enhance(buffer: &SampleBuffer, options: &EnhanceOptions) -> SampleBuffer {
    enhance_with_hooks(buffer, options, &mut NoHooks)
}

/// [`enhance`] with a host yield and progress report after every stage
pub fn enhance_with_hooks(
    buffer: &SampleBuffer,
    options: &EnhanceOptions,
    hooks: &mut dyn ProcessHooks,
) -> SampleBuffer {
    let noise_floor_db = estimate_noise_floor(buffer);
    let threshold_db = gate_threshold_db(noise_floor_db, options.aggressive_gate);
    debug!(
        noise_floor_db,
        threshold_db,
        aggressive = options.aggressive_gate,
        "Enhancement gate threshold"
    );

    let mut output = buffer.clone();
    build_chain(threshold_db, options.aggressive_gate).process_with_hooks(&mut output, hooks);
    output
}
