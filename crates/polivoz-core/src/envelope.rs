//! ADSR envelope generator.
//!
//! Exponential attack-decay-sustain-release envelope with two hooks the
//! modulation matrix drives: per-note time scaling (velocity shortens the
//! attack, high notes shorten the decay) and a sustain-pedal hold that
//! parks the envelope in its sustain stage instead of releasing.

use libm::expf;

/// Envelope stages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopeStage {
    /// Output is zero; the owning voice is free.
    #[default]
    Idle,
    /// Ramping toward peak.
    Attack,
    /// Falling toward the sustain level.
    Decay,
    /// Holding the sustain level while gated (or pedal-held).
    Sustain,
    /// Decaying toward zero after gate release.
    Release,
}

/// ADSR envelope generator.
///
/// # Example
///
/// ```rust
/// use polivoz_core::{AdsrEnvelope, EnvelopeStage};
///
/// let mut eg = AdsrEnvelope::new(48_000.0);
/// eg.set_attack_ms(5.0);
/// eg.gate_on();
/// for _ in 0..1000 {
///     let level = eg.advance();
///     assert!((0.0..=1.0).contains(&level));
/// }
/// eg.gate_off();
/// assert_eq!(eg.stage(), EnvelopeStage::Release);
/// ```
#[derive(Debug, Clone)]
pub struct AdsrEnvelope {
    stage: EnvelopeStage,
    level: f32,
    gate: bool,
    sustain_hold: bool,
    sample_rate: f32,

    attack_ms: f32,
    decay_ms: f32,
    sustain: f32,
    release_ms: f32,

    // Per-note time scaling, applied when coefficients are rebuilt at gate-on
    attack_scale: f32,
    decay_scale: f32,

    attack_coeff: f32,
    decay_coeff: f32,
    release_coeff: f32,
}

// Attack approaches an overshoot target so the ramp stays snappy near 1.0.
const ATTACK_TARGET: f32 = 1.2;
const LEVEL_EPSILON: f32 = 1e-4;

impl Default for AdsrEnvelope {
    fn default() -> Self {
        Self::new(48_000.0)
    }
}

impl AdsrEnvelope {
    /// Create an envelope with 10/100/0.7/200 defaults.
    pub fn new(sample_rate: f32) -> Self {
        let mut eg = Self {
            stage: EnvelopeStage::Idle,
            level: 0.0,
            gate: false,
            sustain_hold: false,
            sample_rate,
            attack_ms: 10.0,
            decay_ms: 100.0,
            sustain: 0.7,
            release_ms: 200.0,
            attack_scale: 1.0,
            decay_scale: 1.0,
            attack_coeff: 0.0,
            decay_coeff: 0.0,
            release_coeff: 0.0,
        };
        eg.rebuild_coefficients();
        eg
    }

    fn rebuild_coefficients(&mut self) {
        self.attack_coeff = exp_coeff(self.attack_ms * self.attack_scale, self.sample_rate);
        self.decay_coeff = exp_coeff(self.decay_ms * self.decay_scale, self.sample_rate);
        self.release_coeff = exp_coeff(self.release_ms, self.sample_rate);
    }

    /// Set attack time in milliseconds.
    pub fn set_attack_ms(&mut self, ms: f32) {
        self.attack_ms = ms.max(0.1);
        self.attack_coeff = exp_coeff(self.attack_ms * self.attack_scale, self.sample_rate);
    }

    /// Set decay time in milliseconds.
    pub fn set_decay_ms(&mut self, ms: f32) {
        self.decay_ms = ms.max(0.1);
        self.decay_coeff = exp_coeff(self.decay_ms * self.decay_scale, self.sample_rate);
    }

    /// Set sustain level (0.0 to 1.0).
    pub fn set_sustain(&mut self, level: f32) {
        self.sustain = level.clamp(0.0, 1.0);
    }

    /// Set release time in milliseconds.
    pub fn set_release_ms(&mut self, ms: f32) {
        self.release_ms = ms.max(0.1);
        self.release_coeff = exp_coeff(self.release_ms, self.sample_rate);
    }

    /// Update sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.rebuild_coefficients();
    }

    /// Apply per-note attack/decay time multipliers.
    ///
    /// Scales come from the layer-0 modulation pass (velocity, note number)
    /// and take effect when coefficients are rebuilt — call before
    /// [`gate_on`](Self::gate_on). Clamped to \[0.01, 1.0\]: modulation only
    /// ever shortens the configured times.
    pub fn set_time_scaling(&mut self, attack_scale: f32, decay_scale: f32) {
        self.attack_scale = attack_scale.clamp(0.01, 1.0);
        self.decay_scale = decay_scale.clamp(0.01, 1.0);
        self.attack_coeff = exp_coeff(self.attack_ms * self.attack_scale, self.sample_rate);
        self.decay_coeff = exp_coeff(self.decay_ms * self.decay_scale, self.sample_rate);
    }

    /// Sustain-pedal hold. While held, a gate-off parks the envelope in
    /// its sustain stage; clearing the hold after gate-off releases it.
    pub fn set_sustain_hold(&mut self, hold: bool) {
        self.sustain_hold = hold;
        if !hold && !self.gate && matches!(self.stage, EnvelopeStage::Sustain) {
            self.stage = EnvelopeStage::Release;
        }
    }

    /// Start the envelope (note on). Level is preserved for smooth retrigger.
    pub fn gate_on(&mut self) {
        self.gate = true;
        self.stage = EnvelopeStage::Attack;
    }

    /// Release the envelope (note off), honoring a sustain-pedal hold.
    pub fn gate_off(&mut self) {
        self.gate = false;
        if self.stage == EnvelopeStage::Idle {
            return;
        }
        if !self.sustain_hold {
            self.stage = EnvelopeStage::Release;
        }
        // With the pedal held, the stage machine continues toward Sustain
        // and advance() keeps it there until the hold clears.
    }

    /// Force the envelope to idle immediately.
    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.level = 0.0;
        self.gate = false;
    }

    /// Current stage.
    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    /// Current level without advancing.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// True unless the envelope is idle.
    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    /// Advance one sample and return the level in \[0, 1\].
    #[inline]
    pub fn advance(&mut self) -> f32 {
        match self.stage {
            EnvelopeStage::Idle => {
                self.level = 0.0;
            }
            EnvelopeStage::Attack => {
                self.level = ATTACK_TARGET + (self.level - ATTACK_TARGET) * self.attack_coeff;
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeStage::Decay;
                }
            }
            EnvelopeStage::Decay => {
                self.level = self.sustain + (self.level - self.sustain) * self.decay_coeff;
                if (self.level - self.sustain).abs() < LEVEL_EPSILON {
                    self.level = self.sustain;
                    self.stage = EnvelopeStage::Sustain;
                }
            }
            EnvelopeStage::Sustain => {
                self.level = self.sustain;
                if !self.gate && !self.sustain_hold {
                    self.stage = EnvelopeStage::Release;
                }
            }
            EnvelopeStage::Release => {
                self.level *= self.release_coeff;
                if self.level < LEVEL_EPSILON {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
        }
        self.level
    }
}

#[inline]
fn exp_coeff(time_ms: f32, sample_rate: f32) -> f32 {
    let samples = time_ms * sample_rate / 1000.0;
    expf(-1.0 / samples.max(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(eg: &mut AdsrEnvelope, n: usize) {
        for _ in 0..n {
            eg.advance();
        }
    }

    #[test]
    fn full_cycle() {
        let mut eg = AdsrEnvelope::new(48_000.0);
        eg.set_attack_ms(1.0);
        eg.set_decay_ms(5.0);
        eg.set_sustain(0.5);
        eg.set_release_ms(10.0);

        assert_eq!(eg.stage(), EnvelopeStage::Idle);
        eg.gate_on();
        run(&mut eg, 5000);
        assert_eq!(eg.stage(), EnvelopeStage::Sustain);
        assert!((eg.level() - 0.5).abs() < 0.01);

        eg.gate_off();
        assert_eq!(eg.stage(), EnvelopeStage::Release);
        run(&mut eg, 30_000);
        assert_eq!(eg.stage(), EnvelopeStage::Idle);
        assert_eq!(eg.level(), 0.0);
    }

    #[test]
    fn attack_scaling_shortens_attack() {
        let mut slow = AdsrEnvelope::new(48_000.0);
        let mut fast = AdsrEnvelope::new(48_000.0);
        slow.set_attack_ms(100.0);
        fast.set_attack_ms(100.0);
        fast.set_time_scaling(0.1, 1.0);

        slow.gate_on();
        fast.gate_on();
        run(&mut slow, 500);
        run(&mut fast, 500);
        assert!(
            fast.level() > slow.level(),
            "scaled attack should rise faster: {} vs {}",
            fast.level(),
            slow.level()
        );
    }

    #[test]
    fn decay_scaling_shortens_decay() {
        let mut slow = AdsrEnvelope::new(48_000.0);
        let mut fast = AdsrEnvelope::new(48_000.0);
        for eg in [&mut slow, &mut fast] {
            eg.set_attack_ms(0.1);
            eg.set_decay_ms(500.0);
            eg.set_sustain(0.2);
        }
        fast.set_time_scaling(1.0, 0.05);

        slow.gate_on();
        fast.gate_on();
        run(&mut slow, 2000);
        run(&mut fast, 2000);
        assert!(fast.level() < slow.level());
    }

    #[test]
    fn sustain_hold_parks_gate_off() {
        let mut eg = AdsrEnvelope::new(48_000.0);
        eg.set_attack_ms(0.1);
        eg.set_decay_ms(0.1);
        eg.set_sustain(0.6);

        eg.gate_on();
        run(&mut eg, 2000);
        assert_eq!(eg.stage(), EnvelopeStage::Sustain);

        eg.set_sustain_hold(true);
        eg.gate_off();
        run(&mut eg, 2000);
        // Pedal held: still sustaining
        assert_eq!(eg.stage(), EnvelopeStage::Sustain);
        assert!((eg.level() - 0.6).abs() < 0.01);

        eg.set_sustain_hold(false);
        assert_eq!(eg.stage(), EnvelopeStage::Release);
    }

    #[test]
    fn hold_released_while_still_gated_keeps_sustain() {
        let mut eg = AdsrEnvelope::new(48_000.0);
        eg.set_attack_ms(0.1);
        eg.set_decay_ms(0.1);
        eg.gate_on();
        run(&mut eg, 2000);

        eg.set_sustain_hold(true);
        eg.set_sustain_hold(false);
        // Gate is still on — no release
        assert_eq!(eg.stage(), EnvelopeStage::Sustain);
    }

    #[test]
    fn hold_during_attack_still_reaches_sustain() {
        let mut eg = AdsrEnvelope::new(48_000.0);
        eg.set_attack_ms(20.0);
        eg.set_decay_ms(10.0);
        eg.set_sustain(0.4);

        eg.gate_on();
        eg.set_sustain_hold(true);
        run(&mut eg, 100);
        eg.gate_off(); // pedal held mid-attack
        run(&mut eg, 48_000);
        assert_eq!(eg.stage(), EnvelopeStage::Sustain);
    }

    #[test]
    fn retrigger_preserves_level() {
        let mut eg = AdsrEnvelope::new(48_000.0);
        eg.set_attack_ms(50.0);
        eg.gate_on();
        run(&mut eg, 500);
        let before = eg.level();
        eg.gate_on();
        assert!((eg.level() - before).abs() < 1e-6);
        assert_eq!(eg.stage(), EnvelopeStage::Attack);
    }

    #[test]
    fn gate_off_when_idle_is_noop() {
        let mut eg = AdsrEnvelope::new(48_000.0);
        eg.gate_off();
        assert_eq!(eg.stage(), EnvelopeStage::Idle);
    }

    #[test]
    fn output_range() {
        let mut eg = AdsrEnvelope::new(48_000.0);
        eg.set_attack_ms(2.0);
        eg.set_decay_ms(10.0);
        eg.set_sustain(0.5);
        eg.gate_on();
        for _ in 0..5000 {
            let v = eg.advance();
            assert!((0.0..=1.0).contains(&v), "level out of range: {v}");
        }
        eg.gate_off();
        for _ in 0..20_000 {
            let v = eg.advance();
            assert!((0.0..=1.0).contains(&v));
        }
    }
}
