//! Test signal generation
//!
//! Every generator returns a planar [`SampleBuffer`]:
//! - Sine waves and tone mixes
//! - Digital silence
//! - Seeded white noise
//! - A speech-like burst/gap/burst pattern for silence removal

use quietcut_core::SampleBuffer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;

fn frame_count(sample_rate: u32, duration: f32) -> usize {
    (sample_rate as f32 * duration) as usize
}

fn planar(samples: Vec<f32>, channels: usize, sample_rate: u32) -> SampleBuffer {
    SampleBuffer::new(vec![samples; channels.max(1)], sample_rate)
        .expect("generated channels share one length")
}

/// Generate a sine wave, identical on every channel
///
/// # Arguments
/// * `frequency` - Frequency in Hz
/// * `sample_rate` - Sample rate in Hz
/// * `duration` - Duration in seconds
/// * `amplitude` - Peak amplitude (0.0 to 1.0)
/// * `channels` - Channel count
pub fn sine(
    frequency: f32,
    sample_rate: u32,
    duration: f32,
    amplitude: f32,
    channels: usize,
) -> SampleBuffer {
    tones(&[(frequency, amplitude)], sample_rate, duration, channels)
}

/// Sum of sine tones given as `(frequency, amplitude)` pairs
pub fn tones(
    partials: &[(f32, f32)],
    sample_rate: u32,
    duration: f32,
    channels: usize,
) -> SampleBuffer {
    let samples = (0..frame_count(sample_rate, duration))
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            partials
                .iter()
                .map(|&(frequency, amplitude)| (2.0 * PI * frequency * t).sin() * amplitude)
                .sum()
        })
        .collect();
    planar(samples, channels, sample_rate)
}

/// Digital silence
pub fn silence(sample_rate: u32, duration: f32, channels: usize) -> SampleBuffer {
    planar(
        vec![0.0; frame_count(sample_rate, duration)],
        channels,
        sample_rate,
    )
}

/// Uniform white noise from a fixed seed, independent per channel
pub fn white_noise(
    sample_rate: u32,
    duration: f32,
    amplitude: f32,
    channels: usize,
    seed: u64,
) -> SampleBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    let frames = frame_count(sample_rate, duration);
    let data = (0..channels.max(1))
        .map(|_| {
            (0..frames)
                .map(|_| rng.gen_range(-amplitude..=amplitude))
                .collect()
        })
        .collect();
    SampleBuffer::new(data, sample_rate).expect("generated channels share one length")
}

/// Join buffers end to end
///
/// # Panics
/// Panics if the parts disagree on channel count or sample rate.
pub fn concat(parts: &[SampleBuffer]) -> SampleBuffer {
    let first = parts.first().expect("at least one part");
    let mut data = vec![Vec::new(); first.channel_count()];
    for part in parts {
        assert_eq!(part.channel_count(), first.channel_count());
        assert_eq!(part.sample_rate(), first.sample_rate());
        for (out, channel) in data.iter_mut().zip(part.channels()) {
            out.extend_from_slice(channel);
        }
    }
    SampleBuffer::new(data, first.sample_rate()).expect("parts share one length per channel")
}

/// Tone, silence gap, tone
///
/// A stand-in for two spoken phrases separated by a pause. The tone is
/// 220 Hz at amplitude 0.5 so every block is well above typical thresholds.
pub fn speech_with_gap(
    sample_rate: u32,
    voiced_secs: f32,
    gap_secs: f32,
    channels: usize,
) -> SampleBuffer {
    let voiced = sine(220.0, sample_rate, voiced_secs, 0.5, channels);
    concat(&[
        voiced.clone(),
        silence(sample_rate, gap_secs, channels),
        voiced,
    ])
}
