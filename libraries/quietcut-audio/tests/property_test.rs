//! Property-based tests for silence removal and gating
//!
//! These tests use proptest to verify invariants across many random inputs.

use proptest::prelude::*;
use quietcut_audio::analysis::{
    apply_padding, estimate_noise_floor, segment, splice, FALLBACK_NOISE_FLOOR_DB,
};
use quietcut_audio::effects::gate;
use quietcut_core::{NoHooks, Region, SampleBuffer};

// Helper: alternating runs of loud and near-silent samples on every channel
fn buffer_from_runs(runs: &[(bool, usize)], channels: usize) -> SampleBuffer {
    let samples: Vec<f32> = runs
        .iter()
        .flat_map(|&(loud, len)| {
            (0..len).map(move |i| {
                let level = if loud { 0.5 } else { 0.001 };
                if i % 2 == 0 {
                    level
                } else {
                    -level
                }
            })
        })
        .collect();
    SampleBuffer::new(vec![samples; channels], 44_100).unwrap()
}

fn runs_strategy() -> impl Strategy<Value = Vec<(bool, usize)>> {
    prop::collection::vec((any::<bool>(), 1usize..4000), 0..8)
}

// Helper: regions tile [0, frames) in order
fn assert_tiles(regions: &[Region], frames: usize) -> Result<(), TestCaseError> {
    if frames == 0 {
        prop_assert!(regions.is_empty());
        return Ok(());
    }
    prop_assert_eq!(regions.first().map(|r| r.start), Some(0));
    prop_assert_eq!(regions.last().map(|r| r.end), Some(frames));
    for pair in regions.windows(2) {
        prop_assert_eq!(pair[0].end, pair[1].start);
    }
    for region in regions {
        prop_assert!(region.start <= region.end);
    }
    Ok(())
}

proptest! {
    /// Property: segmentation covers the buffer exactly, alternating classes
    #[test]
    fn segments_tile_buffer(
        runs in runs_strategy(),
        channels in 1usize..3,
        threshold_db in -70.0f32..0.0,
    ) {
        let buffer = buffer_from_runs(&runs, channels);
        let regions = segment(&buffer, threshold_db);

        assert_tiles(&regions, buffer.frames())?;
        for region in &regions {
            prop_assert!(!region.is_empty(), "Unpadded region is empty");
        }
        for pair in regions.windows(2) {
            prop_assert_ne!(pair[0].is_silence, pair[1].is_silence, "Adjacent regions not merged");
        }
    }

    /// Property: padding keeps coverage and never crosses a neighbour's far boundary
    #[test]
    fn padding_is_safe(
        runs in runs_strategy(),
        threshold_db in -70.0f32..0.0,
        padding in 0usize..5000,
    ) {
        let buffer = buffer_from_runs(&runs, 1);
        let original = segment(&buffer, threshold_db);
        let mut padded = original.clone();
        apply_padding(&mut padded, padding);

        prop_assert_eq!(padded.len(), original.len());
        assert_tiles(&padded, buffer.frames())?;
        for (i, (before, after)) in original.iter().zip(&padded).enumerate() {
            prop_assert_eq!(before.is_silence, after.is_silence);
            if i + 1 < original.len() {
                // Boundary i stays between region i's start and region i+1's end
                prop_assert!(after.end >= before.start);
                prop_assert!(after.end <= original[i + 1].end);
            }
            if !before.is_silence {
                prop_assert!(after.len() >= before.len(), "Voiced region shrank");
            }
        }
    }

    /// Property: removing nothing returns the input sample for sample
    #[test]
    fn splice_ratio_zero_is_identity(
        runs in runs_strategy(),
        channels in 1usize..3,
        threshold_db in -70.0f32..0.0,
        padding in 0usize..3000,
        min_silence in 0usize..5000,
    ) {
        let buffer = buffer_from_runs(&runs, channels);
        let mut regions = segment(&buffer, threshold_db);
        apply_padding(&mut regions, padding);

        let output = splice(&buffer, &regions, 0.0, min_silence, &mut NoHooks).unwrap();
        prop_assert_eq!(output, buffer);
    }

    /// Property: removing everything leaves exactly the voiced frames
    #[test]
    fn splice_ratio_one_drops_all_silence(
        runs in runs_strategy(),
        threshold_db in -70.0f32..0.0,
        padding in 0usize..3000,
    ) {
        let buffer = buffer_from_runs(&runs, 2);
        let mut regions = segment(&buffer, threshold_db);
        apply_padding(&mut regions, padding);

        let output = splice(&buffer, &regions, 1.0, 0, &mut NoHooks).unwrap();
        let voiced: usize = regions.iter().filter(|r| !r.is_silence).map(Region::len).sum();
        prop_assert_eq!(output.frames(), voiced);
    }

    /// Property: a gate that can never close is the identity
    #[test]
    fn gate_at_negative_infinity_is_identity(
        samples in prop::collection::vec(-1.0f32..1.0, 0..2000),
        aggressive in any::<bool>(),
    ) {
        let buffer = SampleBuffer::mono(samples, 44_100).unwrap();
        prop_assert_eq!(gate(&buffer, f32::NEG_INFINITY, aggressive), buffer);
    }

    /// Property: a 0 dBFS gate attenuates anything below full scale
    #[test]
    fn gate_at_zero_db_attenuates(
        samples in prop::collection::vec(-0.9f32..0.9, 1..2000),
        aggressive in any::<bool>(),
    ) {
        let buffer = SampleBuffer::mono(samples, 44_100).unwrap();
        let peak = buffer.peak();
        let output = gate(&buffer, 0.0, aggressive);

        // Envelope never exceeds the input peak, so gain <= peak^3
        prop_assert!(output.peak() <= peak.powi(4) + 1e-7);
        prop_assert!(output.channels().flatten().all(|s| s.is_finite()));
    }

    /// Property: pure digital silence reports the fallback noise floor
    #[test]
    fn silent_noise_floor_is_fallback(
        frames in 0usize..200_000,
        channels in 1usize..3,
    ) {
        let buffer = SampleBuffer::silent(channels, frames, 44_100).unwrap();
        prop_assert_eq!(estimate_noise_floor(&buffer), FALLBACK_NOISE_FLOOR_DB);
    }
}
