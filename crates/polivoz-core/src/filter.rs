//! State-variable lowpass filter.
//!
//! Chamberlin-style SVF run in lowpass configuration. Cutoff is set per
//! sample by the voice (base value plus modulation), so `set_cutoff` stays
//! cheap and clamps rather than panics on out-of-range input.

use core::f32::consts::PI;
use libm::sinf;

/// Cutoff clamp range in Hz.
pub const CUTOFF_MIN_HZ: f32 = 20.0;
/// Upper cutoff clamp in Hz.
pub const CUTOFF_MAX_HZ: f32 = 20_000.0;

/// A state-variable lowpass filter.
///
/// # Example
///
/// ```rust
/// use polivoz_core::SvfFilter;
///
/// let mut filter = SvfFilter::new(48_000.0);
/// filter.set_cutoff(2000.0);
/// filter.set_resonance(0.3);
/// let out = filter.process(0.5);
/// assert!(out.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct SvfFilter {
    sample_rate: f32,
    cutoff_hz: f32,
    resonance: f32,
    f: f32,
    q: f32,
    low: f32,
    band: f32,
}

impl SvfFilter {
    /// Create a filter with cutoff wide open and no resonance.
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            sample_rate,
            cutoff_hz: CUTOFF_MAX_HZ,
            resonance: 0.0,
            f: 0.0,
            q: 1.0,
            low: 0.0,
            band: 0.0,
        };
        filter.update_coefficients();
        filter
    }

    /// Set cutoff in Hz, clamped to \[20, 20000\] and Nyquist.
    #[inline]
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        let nyquist_guard = self.sample_rate * 0.45;
        self.cutoff_hz = cutoff_hz.clamp(CUTOFF_MIN_HZ, CUTOFF_MAX_HZ.min(nyquist_guard));
        self.update_coefficients();
    }

    /// Current cutoff in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    /// Set resonance (0.0 = none, 1.0 = maximum stable).
    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance = resonance.clamp(0.0, 1.0);
        self.update_coefficients();
    }

    /// Update sample rate, preserving cutoff and resonance.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.set_cutoff(self.cutoff_hz);
    }

    /// Clear internal state (new-note start).
    pub fn reset(&mut self) {
        self.low = 0.0;
        self.band = 0.0;
    }

    /// Filter one sample, returning the lowpass output.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        // Two passes per sample halves the effective f and improves
        // stability near Nyquist.
        let mut out = 0.0;
        for _ in 0..2 {
            self.low += self.f * self.band;
            let high = input - self.low - self.q * self.band;
            self.band += self.f * high;
            out = self.low;
        }
        out
    }

    fn update_coefficients(&mut self) {
        // Oversampled by 2 in process(), so the tuning uses half the ratio.
        self.f = 2.0 * sinf(PI * self.cutoff_hz / (self.sample_rate * 2.0));
        self.q = 2.0 - 1.9 * self.resonance;
    }
}
