//! WAV encoder round trip through an independent decoder (hound)

use hound::{SampleFormat, WavReader};
use quietcut_audio::encode::{encode_wav, float_to_i16};
use quietcut_audio::test_utils::{sine, tones};
use quietcut_core::{NoHooks, SampleBuffer};
use std::io::Cursor;

/// Largest quantization error of the asymmetric 16-bit mapping
const ONE_LSB: f32 = 1.0 / 32767.0;

fn to_float(sample: i16) -> f32 {
    if sample < 0 {
        f32::from(sample) / 32768.0
    } else {
        f32::from(sample) / 32767.0
    }
}

fn decode(bytes: &[u8]) -> (hound::WavSpec, Vec<i16>) {
    let mut reader = WavReader::new(Cursor::new(bytes)).expect("valid WAV");
    let spec = reader.spec();
    let samples = reader
        .samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .expect("readable samples");
    (spec, samples)
}

#[test]
fn sine_round_trip_within_one_lsb() {
    let input = sine(997.0, 44_100, 0.5, 0.9, 2);
    let bytes = encode_wav(&input, &mut NoHooks).unwrap();
    let (spec, samples) = decode(&bytes);

    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 44_100);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, SampleFormat::Int);
    assert_eq!(samples.len(), input.frames() * 2);

    for (frame, pair) in samples.chunks_exact(2).enumerate() {
        for (channel, &sample) in pair.iter().enumerate() {
            let original = input.channel(channel).unwrap()[frame];
            let error = (to_float(sample) - original).abs();
            assert!(
                error <= ONE_LSB,
                "frame {frame} channel {channel}: error {error}"
            );
        }
    }
}

#[test]
fn channel_order_is_preserved() {
    let left = tones(&[(440.0, 0.5)], 8_000, 0.1, 1);
    let right = tones(&[(880.0, 0.25)], 8_000, 0.1, 1);
    let input = SampleBuffer::new(
        vec![
            left.channel(0).unwrap().to_vec(),
            right.channel(0).unwrap().to_vec(),
        ],
        8_000,
    )
    .unwrap();

    let (_, samples) = decode(&encode_wav(&input, &mut NoHooks).unwrap());
    let decoded_left: Vec<i16> = samples.iter().step_by(2).copied().collect();
    let decoded_right: Vec<i16> = samples.iter().skip(1).step_by(2).copied().collect();

    let expected_left: Vec<i16> =
        left.channel(0).unwrap().iter().map(|&s| float_to_i16(s)).collect();
    let expected_right: Vec<i16> =
        right.channel(0).unwrap().iter().map(|&s| float_to_i16(s)).collect();
    assert_eq!(decoded_left, expected_left);
    assert_eq!(decoded_right, expected_right);
}

#[test]
fn clipped_input_saturates() {
    let input = SampleBuffer::mono(vec![1.5, -1.5, 1.0, -1.0], 16_000).unwrap();
    let (spec, samples) = decode(&encode_wav(&input, &mut NoHooks).unwrap());
    assert_eq!(spec.channels, 1);
    assert_eq!(samples, vec![32767, -32768, 32767, -32768]);
}

#[test]
fn mono_header_matches_hound() {
    let input = sine(440.0, 22_050, 0.25, 0.5, 1);
    let bytes = encode_wav(&input, &mut NoHooks).unwrap();
    let reader = WavReader::new(Cursor::new(&bytes[..])).unwrap();
    assert_eq!(reader.duration() as usize, input.frames());
    assert_eq!(reader.spec().channels, 1);
    assert_eq!(reader.spec().sample_rate, 22_050);
}
