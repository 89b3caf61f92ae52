//! Low-frequency oscillator for modulation.
//!
//! Runs at control-friendly rates and feeds the modulation source registry.
//! Output is bipolar \[-1, 1\] for every waveform.

use core::f32::consts::TAU;
use libm::sinf;

/// LFO waveform selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LfoWaveform {
    /// Smooth sine
    #[default]
    Sine,
    /// Linear triangle
    Triangle,
    /// Rising ramp with hard reset
    Saw,
    /// Binary high/low
    Square,
    /// Random value held for one cycle
    SampleHold,
}

/// A modulation LFO.
///
/// # Example
///
/// ```rust
/// use polivoz_core::{Lfo, LfoWaveform};
///
/// let mut lfo = Lfo::new(48_000.0, 5.0);
/// lfo.set_waveform(LfoWaveform::Triangle);
/// let v = lfo.advance();
/// assert!((-1.0..=1.0).contains(&v));
/// ```
#[derive(Debug, Clone)]
pub struct Lfo {
    phase: f32,
    phase_inc: f32,
    sample_rate: f32,
    waveform: LfoWaveform,
    held: f32,
    rng: u32,
}

impl Lfo {
    /// Create an LFO at the given rate.
    pub fn new(sample_rate: f32, rate_hz: f32) -> Self {
        Self {
            phase: 0.0,
            phase_inc: rate_hz / sample_rate,
            sample_rate,
            waveform: LfoWaveform::Sine,
            held: 0.0,
            rng: 0x9E37_79B9,
        }
    }

    /// Set rate in Hz.
    #[inline]
    pub fn set_rate(&mut self, rate_hz: f32) {
        self.phase_inc = rate_hz / self.sample_rate;
    }

    /// Current rate in Hz.
    pub fn rate(&self) -> f32 {
        self.phase_inc * self.sample_rate
    }

    /// Select the waveform.
    pub fn set_waveform(&mut self, waveform: LfoWaveform) {
        self.waveform = waveform;
    }

    /// Update sample rate, preserving rate in Hz.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        let rate = self.rate();
        self.sample_rate = sample_rate;
        self.phase_inc = rate / sample_rate;
    }

    /// Reset phase to zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Set phase directly (0.0 to 1.0), for phase-offset LFO pairs.
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = phase.clamp(0.0, 1.0);
    }

    /// Advance one sample and return the bipolar output.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let out = match self.waveform {
            LfoWaveform::Sine => sinf(self.phase * TAU),
            LfoWaveform::Triangle => {
                if self.phase < 0.5 {
                    4.0 * self.phase - 1.0
                } else {
                    3.0 - 4.0 * self.phase
                }
            }
            LfoWaveform::Saw => 2.0 * self.phase - 1.0,
            LfoWaveform::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            LfoWaveform::SampleHold => self.held,
        };

        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
            self.rng = self.rng.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            self.held = ((self.rng >> 8) as f32 / (1u32 << 24) as f32) * 2.0 - 1.0;
        }
        out
    }
}
