//! Modulation destinations and per-voice accumulators.
//!
//! Each destination slot is read by exactly one DSP component per sample.
//! Additive destinations (pitch offsets, cutoff offset, gain/pan offsets)
//! rest at 0.0; multiplicative scales (keytrack, amp scale, envelope time
//! scales) rest at 1.0. [`DestAccumulators::reset`] restores every slot to
//! its neutral value at the top of each sample, so a destination with no
//! enabled rows always reads as "no modulation".

/// Identifier for every modulation destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum ModDest {
    /// Pitch offset applied to both oscillators, in semitones
    AllOscPitch,
    /// Pitch offset for oscillator 1 only, in semitones
    Osc1Pitch,
    /// Pitch offset for oscillator 2 only, in semitones
    Osc2Pitch,
    /// Filter cutoff offset in Hz
    FilterCutoff,
    /// Filter cutoff multiplier from keyboard tracking
    FilterKeytrack,
    /// Additive gain offset into the DCA
    DcaGain,
    /// Pan offset, \[-1, 1\] scale
    DcaPan,
    /// Gain multiplier (volume/expression CCs)
    DcaAmpScale,
    /// Amp-envelope attack time multiplier
    Eg1AttackScale,
    /// Amp-envelope decay time multiplier
    Eg1DecayScale,
    /// Sustain-pedal hold gate (> 0.5 holds)
    Eg1SustainHold,
}

impl ModDest {
    /// Number of destinations; sizes the accumulator array.
    pub const COUNT: usize = 11;

    /// The value a destination reads when nothing modulates it.
    ///
    /// 1.0 for multiplicative scales, 0.0 for additive offsets.
    #[inline]
    pub fn neutral(self) -> f32 {
        match self {
            ModDest::FilterKeytrack
            | ModDest::DcaAmpScale
            | ModDest::Eg1AttackScale
            | ModDest::Eg1DecayScale => 1.0,
            _ => 0.0,
        }
    }
}

/// Per-voice destination accumulators.
#[derive(Debug, Clone)]
pub struct DestAccumulators {
    values: [f32; ModDest::COUNT],
}

impl Default for DestAccumulators {
    fn default() -> Self {
        Self::new()
    }
}

impl DestAccumulators {
    /// Accumulators at their neutral values.
    pub fn new() -> Self {
        let mut acc = Self {
            values: [0.0; ModDest::COUNT],
        };
        acc.reset();
        acc
    }

    /// Restore every slot to its neutral value. Called at the top of each
    /// sample before matrix evaluation.
    #[inline]
    pub fn reset(&mut self) {
        for (i, slot) in self.values.iter_mut().enumerate() {
            // Index order mirrors the enum; COUNT is checked in tests
            *slot = NEUTRALS[i];
        }
    }

    /// Add a row contribution to a destination.
    #[inline]
    pub fn add(&mut self, dest: ModDest, value: f32) {
        self.values[dest as usize] += value;
    }

    /// Read the accumulated value for a destination.
    #[inline]
    pub fn get(&self, dest: ModDest) -> f32 {
        self.values[dest as usize]
    }
}

static NEUTRALS: [f32; ModDest::COUNT] = [
    0.0, // AllOscPitch
    0.0, // Osc1Pitch
    0.0, // Osc2Pitch
    0.0, // FilterCutoff
    1.0, // FilterKeytrack
    0.0, // DcaGain
    0.0, // DcaPan
    1.0, // DcaAmpScale
    1.0, // Eg1AttackScale
    1.0, // Eg1DecayScale
    0.0, // Eg1SustainHold
];
