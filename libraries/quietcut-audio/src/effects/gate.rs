/// Adaptive Noise Gate
///
/// Downward expander driven by a per-channel envelope follower. Above the
/// threshold the signal passes untouched; below it the gain falls off as
/// `(envelope / threshold)^n`, so the curve is soft in normal mode and close
/// to a hard mute in aggressive mode.
use super::chain::AudioEffect;
use crate::analysis::db_to_linear;
use quietcut_core::SampleBuffer;

/// Envelope and expander timing for one gate mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateSettings {
    /// Attack time in milliseconds (envelope rising)
    pub attack_ms: f32,
    /// Release time in milliseconds (envelope falling)
    pub release_ms: f32,
    /// Expansion exponent below threshold
    pub exponent: i32,
}

impl GateSettings {
    /// Soft gate with a natural-sounding decay between words
    pub fn normal() -> Self {
        Self {
            attack_ms: 10.0,
            release_ms: 200.0,
            exponent: 3,
        }
    }

    /// Fast, near-hard gate for tight gating between words
    pub fn aggressive() -> Self {
        Self {
            attack_ms: 1.0,
            release_ms: 50.0,
            exponent: 12,
        }
    }

    pub fn for_mode(aggressive: bool) -> Self {
        if aggressive {
            Self::aggressive()
        } else {
            Self::normal()
        }
    }
}

impl Default for GateSettings {
    fn default() -> Self {
        Self::normal()
    }
}

/// One-pole envelope follower with separate attack and release
///
/// Starts at zero. Rising input moves the envelope with the attack
/// coefficient, falling input with the release coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeFollower {
    envelope: f32,
    attack_coeff: f32,
    release_coeff: f32,
}

impl EnvelopeFollower {
    pub fn new(attack_ms: f32, release_ms: f32, sample_rate: u32) -> Self {
        Self {
            envelope: 0.0,
            attack_coeff: time_coefficient(attack_ms, sample_rate),
            release_coeff: time_coefficient(release_ms, sample_rate),
        }
    }

    /// Feed one sample and return the updated envelope
    #[inline]
    pub fn next(&mut self, input: f32) -> f32 {
        let level = input.abs();
        let coeff = if level > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.envelope = coeff * self.envelope + (1.0 - coeff) * level;
        self.envelope
    }

    pub fn envelope(&self) -> f32 {
        self.envelope
    }

    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }
}

/// `exp(-1 / (sample_rate * t))` with `t` in seconds
fn time_coefficient(time_ms: f32, sample_rate: u32) -> f32 {
    let samples = sample_rate as f32 * time_ms / 1000.0;
    if samples <= 0.0 {
        0.0
    } else {
        (-1.0 / samples).exp()
    }
}

/// Gain for a given envelope, `threshold` linear
#[inline]
fn expander_gain(envelope: f32, threshold: f32, exponent: i32) -> f32 {
    if envelope >= threshold {
        1.0
    } else {
        (envelope / threshold).powi(exponent)
    }
}

/// Noise gate effect
///
/// Each channel gets its own envelope follower, started from zero on every
/// `process` call: the gate is applied to whole buffers, never to a stream.
pub struct NoiseGate {
    threshold_db: f32,
    settings: GateSettings,
    enabled: bool,
}

impl NoiseGate {
    pub fn new(threshold_db: f32, settings: GateSettings) -> Self {
        Self {
            threshold_db,
            settings,
            enabled: true,
        }
    }

    pub fn threshold_db(&self) -> f32 {
        self.threshold_db
    }

    pub fn settings(&self) -> GateSettings {
        self.settings
    }

    fn process_channel(&self, samples: &mut [f32], threshold: f32, sample_rate: u32) {
        let mut follower =
            EnvelopeFollower::new(self.settings.attack_ms, self.settings.release_ms, sample_rate);
        for sample in samples.iter_mut() {
            let envelope = follower.next(*sample);
            *sample *= expander_gain(envelope, threshold, self.settings.exponent);
        }
    }
}

impl AudioEffect for NoiseGate {
    fn process(&mut self, buffer: &mut SampleBuffer) {
        if !self.enabled {
            return;
        }

        let threshold = db_to_linear(self.threshold_db);
        let sample_rate = buffer.sample_rate();
        for channel in buffer.channels_mut() {
            self.process_channel(channel, threshold, sample_rate);
        }
    }

    fn reset(&mut self) {
        // Envelope state lives only for the duration of one process call
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn name(&self) -> &str {
        "Noise Gate"
    }
}

/// Gate a buffer into a new buffer of the same shape
pub fn gate(buffer: &SampleBuffer, threshold_db: f32, aggressive: bool) -> SampleBuffer {
    let mut output = buffer.clone();
    NoiseGate::new(threshold_db, GateSettings::for_mode(aggressive)).process(&mut output);
    output
}
