//! Digitally controlled amplifier: gain and constant-power pan.

use core::f32::consts::FRAC_PI_4;
use libm::sincosf;

/// Per-voice output stage applying gain and stereo placement.
///
/// Pan follows a constant-power law so a sound swept across the field
/// keeps perceived loudness. Gain is a plain linear multiplier; the
/// envelope and velocity scaling arrive pre-combined from the voice.
///
/// # Example
///
/// ```rust
/// use polivoz_core::Amplifier;
///
/// let mut amp = Amplifier::new();
/// amp.set_pan(-1.0); // hard left
/// let (l, r) = amp.process(1.0);
/// assert!(l > 0.99 && r.abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct Amplifier {
    gain: f32,
    pan: f32,
    left_scale: f32,
    right_scale: f32,
}

impl Default for Amplifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Amplifier {
    /// Unity gain, centered.
    pub fn new() -> Self {
        let mut amp = Self {
            gain: 1.0,
            pan: 0.0,
            left_scale: 0.0,
            right_scale: 0.0,
        };
        amp.update_pan_law();
        amp
    }

    /// Set linear gain (clamped non-negative).
    #[inline]
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain.max(0.0);
    }

    /// Current linear gain.
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Set pan position, -1.0 (left) to 1.0 (right).
    #[inline]
    pub fn set_pan(&mut self, pan: f32) {
        self.pan = pan.clamp(-1.0, 1.0);
        self.update_pan_law();
    }

    /// Current pan position.
    pub fn pan(&self) -> f32 {
        self.pan
    }

    /// Apply gain and pan to a mono sample.
    #[inline]
    pub fn process(&self, input: f32) -> (f32, f32) {
        let scaled = input * self.gain;
        (scaled * self.left_scale, scaled * self.right_scale)
    }

    fn update_pan_law(&mut self) {
        let angle = (self.pan + 1.0) * FRAC_PI_4;
        let (sin, cos) = sincosf(angle);
        self.left_scale = cos;
        self.right_scale = sin;
    }
}
