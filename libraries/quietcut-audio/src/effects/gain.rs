/// Fixed linear gain
use super::chain::AudioEffect;
use quietcut_core::SampleBuffer;

/// Multiplies every sample by a constant factor
///
/// No clipping is applied; the encoder clamps at conversion time.
pub struct Gain {
    factor: f32,
    enabled: bool,
    name: String,
}

impl Gain {
    pub fn new(factor: f32) -> Self {
        Self {
            factor,
            enabled: true,
            name: format!("Gain x{factor}"),
        }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }
}

impl AudioEffect for Gain {
    fn process(&mut self, buffer: &mut SampleBuffer) {
        if !self.enabled {
            return;
        }
        for channel in buffer.channels_mut() {
            for sample in channel.iter_mut() {
                *sample *= self.factor;
            }
        }
    }

    fn reset(&mut self) {}

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_every_channel() {
        let mut buffer = SampleBuffer::new(vec![vec![0.5, -0.5], vec![0.1, 1.0]], 8_000).unwrap();
        Gain::new(1.3).process(&mut buffer);
        assert_eq!(buffer.channel(0).unwrap(), &[0.5 * 1.3, -0.5 * 1.3]);
        assert_eq!(buffer.channel(1).unwrap(), &[0.1 * 1.3, 1.3]);
    }

    #[test]
    fn name_shows_factor() {
        assert_eq!(Gain::new(1.3).name(), "Gain x1.3");
    }
}
