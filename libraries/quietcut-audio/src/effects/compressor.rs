/// Dynamic Range Compressor
///
/// Attenuates levels above a threshold with a soft knee. Detection is linked
/// across all channels of the buffer so the same gain lands on every channel
/// at a given frame.
use super::chain::AudioEffect;
use quietcut_core::SampleBuffer;

/// Release of the peak detector, independent of the user release
const PEAK_RELEASE_MS: f32 = 50.0;

/// Level the peak detector decays toward
const DETECTOR_FLOOR_DB: f32 = -120.0;

/// Compressor settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressorSettings {
    /// Threshold in dB (-60 to 0)
    pub threshold_db: f32,

    /// Ratio (1.0 to 20.0), e.g. 4.0 means 4:1
    pub ratio: f32,

    /// Attack time in milliseconds (0.1 to 100)
    pub attack_ms: f32,

    /// Release time in milliseconds (10 to 1000)
    pub release_ms: f32,

    /// Knee width in dB (0 to 40), 0 is a hard knee
    pub knee_db: f32,

    /// Makeup gain in dB (0 to 24)
    pub makeup_gain_db: f32,
}

impl CompressorSettings {
    /// Spoken-word leveling used by the enhancement chain
    /// - Threshold: -24 dB
    /// - Ratio: 3.5:1
    /// - Attack: 2 ms
    /// - Release: 150 ms
    /// - Soft knee: 15 dB
    /// - Makeup gain: 0 dB (applied as a separate stage)
    pub fn voice() -> Self {
        Self {
            threshold_db: -24.0,
            ratio: 3.5,
            attack_ms: 2.0,
            release_ms: 150.0,
            knee_db: 15.0,
            makeup_gain_db: 0.0,
        }
    }

    /// Validate and clamp settings to safe ranges
    pub fn validate(&mut self) {
        self.threshold_db = self.threshold_db.clamp(-60.0, 0.0);
        self.ratio = self.ratio.clamp(1.0, 20.0);
        self.attack_ms = self.attack_ms.clamp(0.1, 100.0);
        self.release_ms = self.release_ms.clamp(10.0, 1000.0);
        self.knee_db = self.knee_db.clamp(0.0, 40.0);
        self.makeup_gain_db = self.makeup_gain_db.clamp(0.0, 24.0);
    }
}

/// Dynamic Range Compressor
///
/// Two stages:
/// 1. Peak level detection with instant attack and a fixed slow release, so
///    the level holds across waveform cycles
/// 2. Gain smoothing with the configured attack/release
pub struct Compressor {
    settings: CompressorSettings,
    enabled: bool,

    // Detector and smoother state, in dB
    peak_level_db: f32,
    gain_reduction_db: f32,

    // Coefficients for the current sample rate
    peak_release_coeff: f32,
    gr_attack_coeff: f32,
    gr_release_coeff: f32,
    makeup_gain_linear: f32,
    sample_rate: u32,
}

impl Compressor {
    /// Create compressor with specific settings
    pub fn with_settings(mut settings: CompressorSettings) -> Self {
        settings.validate();
        Self {
            settings,
            enabled: true,
            peak_level_db: DETECTOR_FLOOR_DB,
            gain_reduction_db: 0.0,
            peak_release_coeff: 0.0,
            gr_attack_coeff: 0.0,
            gr_release_coeff: 0.0,
            makeup_gain_linear: 1.0,
            sample_rate: 0,
        }
    }

    /// Get current settings
    pub fn settings(&self) -> CompressorSettings {
        self.settings
    }

    fn update_coefficients(&mut self, sample_rate: u32) {
        if self.sample_rate == sample_rate {
            return;
        }
        self.sample_rate = sample_rate;

        // coeff = exp(-1 / samples): 63.2% response after the given time
        let per_ms = sample_rate as f32 / 1000.0;
        self.peak_release_coeff = (-1.0 / (PEAK_RELEASE_MS * per_ms)).exp();
        self.gr_attack_coeff = (-1.0 / (self.settings.attack_ms * per_ms)).exp();
        self.gr_release_coeff = (-1.0 / (self.settings.release_ms * per_ms)).exp();
        self.makeup_gain_linear = 10.0_f32.powf(self.settings.makeup_gain_db / 20.0);
    }

    /// Static curve: output level in dB for an input level in dB
    #[inline]
    fn compute_output_level(&self, input_db: f32) -> f32 {
        let threshold = self.settings.threshold_db;
        let ratio = self.settings.ratio;
        let knee = self.settings.knee_db;

        if knee <= 0.0 {
            if input_db <= threshold {
                input_db
            } else {
                threshold + (input_db - threshold) / ratio
            }
        } else {
            let knee_start = threshold - knee / 2.0;
            let knee_end = threshold + knee / 2.0;

            if input_db <= knee_start {
                input_db
            } else if input_db >= knee_end {
                threshold + (input_db - threshold) / ratio
            } else {
                // Quadratic blend across the knee
                let x = input_db - knee_start;
                let slope_change = (1.0 - 1.0 / ratio) / (2.0 * knee);
                input_db - slope_change * x * x
            }
        }
    }

    /// Gain reduction in dB (negative means attenuation)
    #[inline]
    fn compute_gain_reduction(&self, input_db: f32) -> f32 {
        self.compute_output_level(input_db) - input_db
    }

    #[inline]
    fn update_peak_level(&mut self, input_db: f32) {
        if input_db > self.peak_level_db {
            self.peak_level_db = input_db;
        } else {
            // Decay toward the floor, not the input: input is -inf at zero crossings
            self.peak_level_db = self.peak_release_coeff * (self.peak_level_db - DETECTOR_FLOOR_DB)
                + DETECTOR_FLOOR_DB;
        }
    }

    #[inline]
    fn smooth_gain_reduction(&mut self, target_gr_db: f32) {
        // More negative target means compressing harder
        let coeff = if target_gr_db < self.gain_reduction_db {
            self.gr_attack_coeff
        } else {
            self.gr_release_coeff
        };

        self.gain_reduction_db = coeff * self.gain_reduction_db + (1.0 - coeff) * target_gr_db;
    }

    /// Linked detector input: loudest channel at `frame`
    #[inline]
    fn frame_peak(buffer: &SampleBuffer, frame: usize) -> f32 {
        buffer
            .channels()
            .map(|channel| channel[frame].abs())
            .fold(0.0, f32::max)
    }
}

impl AudioEffect for Compressor {
    fn process(&mut self, buffer: &mut SampleBuffer) {
        if !self.enabled {
            return;
        }

        self.update_coefficients(buffer.sample_rate());

        let mut gains = Vec::with_capacity(buffer.frames());
        for frame in 0..buffer.frames() {
            let max_sample = Self::frame_peak(buffer, frame);
            let input_db = if max_sample > 1e-10 {
                20.0 * max_sample.log10()
            } else {
                -200.0
            };

            self.update_peak_level(input_db);
            let target_gr_db = self.compute_gain_reduction(self.peak_level_db);
            self.smooth_gain_reduction(target_gr_db);

            gains.push(10.0_f32.powf(self.gain_reduction_db / 20.0) * self.makeup_gain_linear);
        }

        for channel in buffer.channels_mut() {
            for (sample, gain) in channel.iter_mut().zip(&gains) {
                *sample *= gain;
            }
        }
    }

    fn reset(&mut self) {
        self.peak_level_db = DETECTOR_FLOOR_DB;
        self.gain_reduction_db = 0.0;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn name(&self) -> &str {
        "Dynamic Range Compressor"
    }
}
