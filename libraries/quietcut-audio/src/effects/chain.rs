/// Effect chain for offline processing
///
/// Effects run in insertion order and each one resolves the whole buffer
/// before the next starts. Order is significant: the chain never reorders.
use quietcut_core::{NoHooks, ProcessHooks, SampleBuffer};
use tracing::trace;

/// Trait for audio effects that can be chained together
///
/// Effects keep their filter or envelope state in `self`, so `reset()` must
/// be called before reusing an effect on unrelated audio.
pub trait AudioEffect: Send {
    /// Process every channel of the buffer in place
    ///
    /// The buffer's sample rate drives any time constants or filter design.
    fn process(&mut self, buffer: &mut SampleBuffer);

    /// Reset effect state
    fn reset(&mut self);

    /// Enable/disable the effect
    fn set_enabled(&mut self, enabled: bool);

    /// Check if effect is enabled
    fn is_enabled(&self) -> bool;

    /// Get effect name (for logging)
    fn name(&self) -> &str;
}

/// Chain of audio effects processed in order
pub struct EffectChain {
    effects: Vec<Box<dyn AudioEffect>>,
}

impl EffectChain {
    /// Create a new empty effect chain
    pub fn new() -> Self {
        Self {
            effects: Vec::new(),
        }
    }

    /// Add an effect to the end of the chain
    pub fn add_effect(&mut self, effect: Box<dyn AudioEffect>) {
        self.effects.push(effect);
    }

    /// Process audio through the entire effect chain
    pub fn process(&mut self, buffer: &mut SampleBuffer) {
        self.process_with_hooks(buffer, &mut NoHooks);
    }

    /// Process the chain, yielding to the host after every stage
    ///
    /// Progress advances by one step per effect, disabled effects included.
    pub fn process_with_hooks(
        &mut self,
        buffer: &mut SampleBuffer,
        hooks: &mut dyn ProcessHooks,
    ) {
        let total = self.effects.len().max(1);
        for (index, effect) in self.effects.iter_mut().enumerate() {
            if effect.is_enabled() {
                trace!(effect = effect.name(), "Running effect");
                effect.process(buffer);
            }
            hooks.progress((index + 1) as f32 / total as f32);
            hooks.yield_now();
        }
    }

    /// Get number of effects in chain
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Check if chain is empty
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Names of all effects, in processing order
    pub fn names(&self) -> Vec<&str> {
        self.effects.iter().map(|e| e.name()).collect()
    }
}

impl Default for EffectChain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Mock effect for testing
    struct GainEffect {
        gain: f32,
        enabled: bool,
    }

    impl AudioEffect for GainEffect {
        fn process(&mut self, buffer: &mut SampleBuffer) {
            for channel in buffer.channels_mut() {
                for sample in channel.iter_mut() {
                    *sample *= self.gain;
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
            "Gain"
        }
    }

    fn ones() -> SampleBuffer {
        SampleBuffer::new(vec![vec![1.0; 50], vec![1.0; 50]], 44_100).unwrap()
    }

    #[test]
    fn empty_chain() {
        let chain = EffectChain::new();
        assert_eq!(chain.len(), 0);
        assert!(chain.is_empty());
    }

    #[test]
    fn process_chain() {
        let mut chain = EffectChain::new();

        // 0.5 then 2.0 leaves the signal unchanged
        chain.add_effect(Box::new(GainEffect {
            gain: 0.5,
            enabled: true,
        }));
        chain.add_effect(Box::new(GainEffect {
            gain: 2.0,
            enabled: true,
        }));

        let mut buffer = ones();
        chain.process(&mut buffer);

        for sample in buffer.channels().flatten() {
            assert!((sample - 1.0).abs() < 0.0001);
        }
    }

    #[test]
    fn disabled_effect_bypassed() {
        let mut chain = EffectChain::new();
        chain.add_effect(Box::new(GainEffect {
            gain: 0.0,
            enabled: false,
        }));

        let mut buffer = ones();
        chain.process(&mut buffer);
        assert_eq!(buffer, ones());
    }

    #[test]
    fn hooks_see_every_stage() {
        struct Count {
            yields: usize,
            last: f32,
        }
        impl ProcessHooks for Count {
            fn yield_now(&mut self) {
                self.yields += 1;
            }
            fn progress(&mut self, fraction: f32) {
                self.last = fraction;
            }
        }

        let mut chain = EffectChain::new();
        for _ in 0..3 {
            chain.add_effect(Box::new(GainEffect {
                gain: 1.0,
                enabled: true,
            }));
        }

        let mut hooks = Count {
            yields: 0,
            last: 0.0,
        };
        chain.process_with_hooks(&mut ones(), &mut hooks);
        assert_eq!(hooks.yields, 3);
        assert_eq!(hooks.last, 1.0);
        assert_eq!(chain.names(), vec!["Gain", "Gain", "Gain"]);
    }
}
