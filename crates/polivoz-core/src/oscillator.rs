//! Audio-rate oscillator.
//!
//! Phase-accumulator oscillator with polyBLEP edge correction on the
//! discontinuous waveforms. The waveform math here is a swappable leaf —
//! the voice engine only requires `set_frequency` + `advance`.

use core::f32::consts::TAU;
use libm::sinf;

/// Oscillator waveform selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OscWaveform {
    /// Pure sine
    Sine,
    /// Linear triangle
    Triangle,
    /// Rising sawtooth with polyBLEP correction
    #[default]
    Saw,
    /// Square with polyBLEP correction on both edges
    Square,
    /// White noise (LCG)
    Noise,
}

/// A single audio oscillator.
///
/// # Example
///
/// ```rust
/// use polivoz_core::{Oscillator, OscWaveform};
///
/// let mut osc = Oscillator::new(48_000.0);
/// osc.set_frequency(440.0);
/// osc.set_waveform(OscWaveform::Square);
/// let sample = osc.advance();
/// assert!(sample.abs() <= 1.1);
/// ```
#[derive(Debug, Clone)]
pub struct Oscillator {
    phase: f32,
    phase_inc: f32,
    frequency: f32,
    sample_rate: f32,
    waveform: OscWaveform,
    noise_state: u32,
}

impl Oscillator {
    /// Create an oscillator at the given sample rate (440 Hz, saw).
    pub fn new(sample_rate: f32) -> Self {
        let mut osc = Self {
            phase: 0.0,
            phase_inc: 0.0,
            frequency: 440.0,
            sample_rate,
            waveform: OscWaveform::Saw,
            noise_state: 0x2F6E_2B1,
        };
        osc.update_increment();
        osc
    }

    /// Set frequency in Hz (clamped to Nyquist).
    #[inline]
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.frequency = freq_hz.clamp(0.0, self.sample_rate * 0.5);
        self.update_increment();
    }

    /// Current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Select the waveform.
    pub fn set_waveform(&mut self, waveform: OscWaveform) {
        self.waveform = waveform;
    }

    /// Current waveform.
    pub fn waveform(&self) -> OscWaveform {
        self.waveform
    }

    /// Update sample rate, preserving frequency.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_increment();
    }

    /// Reset phase to zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Advance one sample and return the output in \[-1, 1\].
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let out = match self.waveform {
            OscWaveform::Sine => sinf(self.phase * TAU),
            OscWaveform::Triangle => {
                if self.phase < 0.5 {
                    4.0 * self.phase - 1.0
                } else {
                    3.0 - 4.0 * self.phase
                }
            }
            OscWaveform::Saw => {
                let naive = 2.0 * self.phase - 1.0;
                naive - poly_blep(self.phase, self.phase_inc)
            }
            OscWaveform::Square => {
                let naive = if self.phase < 0.5 { 1.0 } else { -1.0 };
                naive + poly_blep(self.phase, self.phase_inc)
                    - poly_blep((self.phase + 0.5) % 1.0, self.phase_inc)
            }
            OscWaveform::Noise => {
                self.noise_state = self
                    .noise_state
                    .wrapping_mul(1_664_525)
                    .wrapping_add(1_013_904_223);
                ((self.noise_state >> 8) as f32 / (1u32 << 24) as f32) * 2.0 - 1.0
            }
        };

        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        out
    }

    fn update_increment(&mut self) {
        self.phase_inc = self.frequency / self.sample_rate;
    }
}

/// Two-sample polynomial band-limited step correction.
#[inline]
fn poly_blep(phase: f32, inc: f32) -> f32 {
    if inc <= 0.0 {
        0.0
    } else if phase < inc {
        let t = phase / inc;
        2.0 * t - t * t - 1.0
    } else if phase > 1.0 - inc {
        let t = (phase - 1.0) / inc;
        t * t + 2.0 * t + 1.0
    } else {
        0.0
    }
}
