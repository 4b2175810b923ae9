//! Audio analysis tools for verification
//!
//! Spectral measurements use a single Hann-windowed FFT over the whole slice.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use std::f32::consts::PI;

/// Calculate peak level
pub fn calculate_peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
}

/// Magnitude spectrum as `(frequency_hz, magnitude)` pairs up to Nyquist
pub fn spectrum(samples: &[f32], sample_rate: u32) -> Vec<(f32, f32)> {
    let n = samples.len();
    if n == 0 {
        return Vec::new();
    }

    let mut bins: Vec<Complex<f32>> = samples
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            let window = 0.5 - 0.5 * (2.0 * PI * i as f32 / n as f32).cos();
            Complex::new(s * window, 0.0)
        })
        .collect();

    FftPlanner::new().plan_fft_forward(n).process(&mut bins);

    bins.iter()
        .take(n / 2 + 1)
        .enumerate()
        .map(|(k, bin)| {
            let frequency = k as f32 * sample_rate as f32 / n as f32;
            (frequency, bin.norm() / n as f32)
        })
        .collect()
}

/// RMS of the spectrum restricted to `[low_hz, high_hz]`
///
/// Only comparable between signals of equal length and sample rate.
pub fn band_rms(samples: &[f32], sample_rate: u32, low_hz: f32, high_hz: f32) -> f32 {
    let energy: f32 = spectrum(samples, sample_rate)
        .into_iter()
        .filter(|&(frequency, _)| frequency >= low_hz && frequency <= high_hz)
        .map(|(_, magnitude)| magnitude * magnitude)
        .sum();
    energy.sqrt()
}

/// Find the dominant frequency in a signal
pub fn find_dominant_frequency(samples: &[f32], sample_rate: u32) -> f32 {
    spectrum(samples, sample_rate)
        .into_iter()
        .skip(1)
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(frequency, _)| frequency)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::signals::{sine, tones};

    #[test]
    fn dominant_frequency_of_sine() {
        let buffer = sine(1000.0, 44_100, 0.5, 0.5, 1);
        let found = find_dominant_frequency(buffer.channel(0).unwrap(), 44_100);
        assert!((found - 1000.0).abs() < 5.0);
    }

    #[test]
    fn band_rms_separates_tones() {
        let buffer = tones(&[(500.0, 0.5), (8000.0, 0.05)], 44_100, 0.5, 1);
        let samples = buffer.channel(0).unwrap();
        let low = band_rms(samples, 44_100, 300.0, 700.0);
        let high = band_rms(samples, 44_100, 7000.0, 9000.0);
        assert!(low > high * 5.0);
    }

    #[test]
    fn empty_input() {
        assert!(spectrum(&[], 44_100).is_empty());
        assert_eq!(calculate_peak(&[]), 0.0);
    }
}
