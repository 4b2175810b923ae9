/// Biquad Equalizer Stages
///
/// One second-order IIR section per stage, designed with the RBJ Audio EQ
/// Cookbook formulas. Coefficients are fixed for a run; state is kept per
/// channel.
use super::chain::AudioEffect;
use quietcut_core::SampleBuffer;
use std::f32::consts::PI;

/// Shelf slope used by the shelf constructors (steepest without overshoot)
const SHELF_SLOPE: f32 = 1.0;

/// Butterworth Q for the pass filters
const BUTTERWORTH_Q: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Filter response for an EQ band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    /// Removes content below frequency
    HighPass,
    /// Removes content above frequency
    LowPass,
    /// Boosts/cuts below frequency
    LowShelf,
    /// Boosts/cuts around frequency with Q bandwidth
    Peaking,
    /// Boosts/cuts above frequency
    HighShelf,
}

/// EQ band configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqBand {
    /// Corner or center frequency in Hz
    pub frequency: f32,
    /// Gain in dB (-24 to +24), ignored by pass filters
    gain_db: f32,
    /// Q for peaking and pass filters, slope for shelves
    q: f32,
    filter_type: FilterType,
}

impl EqBand {
    /// Create a high-pass band with Butterworth Q
    pub fn high_pass(frequency: f32) -> Self {
        Self {
            frequency,
            gain_db: 0.0,
            q: BUTTERWORTH_Q,
            filter_type: FilterType::HighPass,
        }
    }

    /// Create a low-pass band with Butterworth Q
    pub fn low_pass(frequency: f32) -> Self {
        Self {
            frequency,
            gain_db: 0.0,
            q: BUTTERWORTH_Q,
            filter_type: FilterType::LowPass,
        }
    }

    /// Create a low shelf filter (boosts/cuts below frequency)
    pub fn low_shelf(frequency: f32, gain_db: f32) -> Self {
        Self {
            frequency,
            gain_db: gain_db.clamp(-24.0, 24.0),
            q: SHELF_SLOPE,
            filter_type: FilterType::LowShelf,
        }
    }

    /// Create a peaking filter (boosts/cuts around frequency)
    pub fn peaking(frequency: f32, gain_db: f32, q: f32) -> Self {
        Self {
            frequency,
            gain_db: gain_db.clamp(-24.0, 24.0),
            q: q.clamp(0.1, 10.0),
            filter_type: FilterType::Peaking,
        }
    }

    /// Create a high shelf filter (boosts/cuts above frequency)
    pub fn high_shelf(frequency: f32, gain_db: f32) -> Self {
        Self {
            frequency,
            gain_db: gain_db.clamp(-24.0, 24.0),
            q: SHELF_SLOPE,
            filter_type: FilterType::HighShelf,
        }
    }

    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    pub fn q(&self) -> f32 {
        self.q
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }
}

/// Normalized biquad coefficients (a0 = 1)
#[derive(Debug, Clone, Copy, PartialEq)]
struct Coefficients {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
}

impl Coefficients {
    const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    fn design(band: &EqBand, sample_rate: u32) -> Self {
        let sample_rate = sample_rate as f32;
        if sample_rate < 1.0 {
            return Self::IDENTITY;
        }

        // Near-Nyquist designs are unstable
        let frequency = band.frequency.clamp(1.0, sample_rate * 0.45);
        let omega = 2.0 * PI * frequency / sample_rate;
        let sin_omega = omega.sin();
        let cos_omega = omega.cos();
        let a = 10.0_f32.powf(band.gain_db / 40.0);

        let (b0, b1, b2, a0, a1, a2) = match band.filter_type {
            FilterType::HighPass => {
                let alpha = sin_omega / (2.0 * band.q);
                (
                    (1.0 + cos_omega) / 2.0,
                    -(1.0 + cos_omega),
                    (1.0 + cos_omega) / 2.0,
                    1.0 + alpha,
                    -2.0 * cos_omega,
                    1.0 - alpha,
                )
            }
            FilterType::LowPass => {
                let alpha = sin_omega / (2.0 * band.q);
                (
                    (1.0 - cos_omega) / 2.0,
                    1.0 - cos_omega,
                    (1.0 - cos_omega) / 2.0,
                    1.0 + alpha,
                    -2.0 * cos_omega,
                    1.0 - alpha,
                )
            }
            FilterType::Peaking => {
                let alpha = sin_omega / (2.0 * band.q);
                (
                    1.0 + alpha * a,
                    -2.0 * cos_omega,
                    1.0 - alpha * a,
                    1.0 + alpha / a,
                    -2.0 * cos_omega,
                    1.0 - alpha / a,
                )
            }
            FilterType::LowShelf => {
                let alpha = sin_omega / 2.0 * ((a + 1.0 / a) * (1.0 / band.q - 1.0) + 2.0).sqrt();
                let beta = 2.0 * a.sqrt() * alpha;
                (
                    a * ((a + 1.0) - (a - 1.0) * cos_omega + beta),
                    2.0 * a * ((a - 1.0) - (a + 1.0) * cos_omega),
                    a * ((a + 1.0) - (a - 1.0) * cos_omega - beta),
                    (a + 1.0) + (a - 1.0) * cos_omega + beta,
                    -2.0 * ((a - 1.0) + (a + 1.0) * cos_omega),
                    (a + 1.0) + (a - 1.0) * cos_omega - beta,
                )
            }
            FilterType::HighShelf => {
                let alpha = sin_omega / 2.0 * ((a + 1.0 / a) * (1.0 / band.q - 1.0) + 2.0).sqrt();
                let beta = 2.0 * a.sqrt() * alpha;
                (
                    a * ((a + 1.0) + (a - 1.0) * cos_omega + beta),
                    -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_omega),
                    a * ((a + 1.0) + (a - 1.0) * cos_omega - beta),
                    (a + 1.0) - (a - 1.0) * cos_omega + beta,
                    2.0 * ((a - 1.0) - (a + 1.0) * cos_omega),
                    (a + 1.0) - (a - 1.0) * cos_omega - beta,
                )
            }
        };

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    /// Magnitude response in dB at `frequency`
    fn magnitude_db(&self, frequency: f32, sample_rate: u32) -> f32 {
        let omega = 2.0 * PI * frequency / sample_rate as f32;
        let (cos1, sin1) = (omega.cos(), omega.sin());
        let (cos2, sin2) = ((2.0 * omega).cos(), (2.0 * omega).sin());

        let num_re = self.b0 + self.b1 * cos1 + self.b2 * cos2;
        let num_im = -(self.b1 * sin1 + self.b2 * sin2);
        let den_re = 1.0 + self.a1 * cos1 + self.a2 * cos2;
        let den_im = -(self.a1 * sin1 + self.a2 * sin2);

        let num = (num_re * num_re + num_im * num_im).sqrt();
        let den = (den_re * den_re + den_im * den_im).sqrt();
        20.0 * (num / den).log10()
    }
}

/// Direct form I state for one channel
#[derive(Debug, Clone, Copy, Default)]
struct BiquadState {
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl BiquadState {
    #[inline]
    fn process(&mut self, c: &Coefficients, input: f32) -> f32 {
        let mut output =
            c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;

        // Flush denormals
        if output.abs() < 1e-15 {
            output = 0.0;
        }

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;
        output
    }
}

/// A single biquad stage usable in an [`super::EffectChain`]
pub struct BiquadFilter {
    band: EqBand,
    name: String,
    enabled: bool,
    states: Vec<BiquadState>,
}

impl BiquadFilter {
    pub fn new(band: EqBand) -> Self {
        let name = match band.filter_type {
            FilterType::HighPass => format!("High-pass {:.0} Hz", band.frequency),
            FilterType::LowPass => format!("Low-pass {:.0} Hz", band.frequency),
            FilterType::LowShelf => {
                format!("Low shelf {:.0} Hz {:+.1} dB", band.frequency, band.gain_db)
            }
            FilterType::Peaking => {
                format!("Peaking {:.0} Hz {:+.1} dB", band.frequency, band.gain_db)
            }
            FilterType::HighShelf => {
                format!("High shelf {:.0} Hz {:+.1} dB", band.frequency, band.gain_db)
            }
        };

        Self {
            band,
            name,
            enabled: true,
            states: Vec::new(),
        }
    }

    pub fn band(&self) -> EqBand {
        self.band
    }

    /// Magnitude response of this stage in dB at `frequency`
    pub fn response_db(&self, frequency: f32, sample_rate: u32) -> f32 {
        Coefficients::design(&self.band, sample_rate).magnitude_db(frequency, sample_rate)
    }
}

impl AudioEffect for BiquadFilter {
    fn process(&mut self, buffer: &mut SampleBuffer) {
        if !self.enabled {
            return;
        }

        let coefficients = Coefficients::design(&self.band, buffer.sample_rate());
        self.states
            .resize(buffer.channel_count(), BiquadState::default());

        for (channel, state) in buffer.channels_mut().zip(self.states.iter_mut()) {
            for sample in channel.iter_mut() {
                *sample = state.process(&coefficients, *sample);
            }
        }
    }

    fn reset(&mut self) {
        self.states.clear();
    }

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
