//! One-pole parameter smoothing for zipper-free control changes.
//!
//! Block-rate control updates (automation, patch loads, live knob moves)
//! would produce audible steps if applied directly to gain or cutoff.
//! [`SmoothedParam`] exponentially approaches its target so the audio path
//! sees a continuous value.

use libm::expf;

/// A parameter value that exponentially approaches its target.
///
/// With a smoothing time of zero the parameter snaps instantly, which is
/// the correct behavior for patch loads and engine initialization.
///
/// # Example
///
/// ```rust
/// use polivoz_core::SmoothedParam;
///
/// let mut cutoff = SmoothedParam::new(1000.0, 48_000.0, 20.0);
/// cutoff.set_target(4000.0);
/// for _ in 0..4800 {
///     let _hz = cutoff.advance();
/// }
/// assert!((cutoff.value() - 4000.0).abs() < 50.0);
/// ```
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    current: f32,
    target: f32,
    coeff: f32,
    sample_rate: f32,
    time_ms: f32,
}

impl SmoothedParam {
    /// Create a smoothed parameter with the given smoothing time constant.
    ///
    /// A `time_ms` of 0.0 disables smoothing (instant changes).
    pub fn new(initial: f32, sample_rate: f32, time_ms: f32) -> Self {
        let mut p = Self {
            current: initial,
            target: initial,
            coeff: 0.0,
            sample_rate,
            time_ms,
        };
        p.recalculate();
        p
    }

    /// Set the value the parameter smooths toward.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Snap to a value immediately, bypassing smoothing.
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value;
        self.target = value;
    }

    /// Update the sample rate, preserving the smoothing time constant.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate();
    }

    /// Set the smoothing time constant in milliseconds.
    pub fn set_time_ms(&mut self, time_ms: f32) {
        self.time_ms = time_ms.max(0.0);
        self.recalculate();
    }

    /// Advance one sample and return the smoothed value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.current = self.target + (self.current - self.target) * self.coeff;
        self.current
    }

    /// Current smoothed value, without advancing.
    #[inline]
    pub fn value(&self) -> f32 {
        self.current
    }

    /// The value currently being approached.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// True once the value is within rounding distance of the target.
    pub fn is_settled(&self) -> bool {
        (self.current - self.target).abs() < 1e-6
    }

    fn recalculate(&mut self) {
        if self.time_ms <= 0.0 {
            self.coeff = 0.0;
        } else {
            let samples = self.time_ms * self.sample_rate / 1000.0;
            self.coeff = expf(-1.0 / samples.max(1.0));
        }
    }
}
