//! Control tags, descriptors, and the canonical parameter store.
//!
//! Every user-facing control is identified by a dense [`ControlTag`]. The
//! engine owns one [`ControlStore`] holding each control's current value in
//! natural units (Hz, ms, semitones, plain scalars). Modulation rows and DSP
//! components reference controls by tag, never by pointer, so "live"
//! intensities and ranges follow knob moves without aliasing.
//!
//! **Cooking** converts a normalized \[0, 1\] automation value into a
//! control's natural range, linearly or logarithmically per control. The
//! inverse (`uncook`) is used when exporting state for host display.

use libm::{logf, powf};

/// Identifier for every user-facing control.
///
/// Tags are dense and sized at compile time; [`ControlStore`] and the
/// descriptor table are plain arrays indexed by `tag as usize`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum ControlTag {
    /// Oscillator 2 detune in cents
    Osc2DetuneCents,
    /// Oscillator mix, 0 = osc1 only, 1 = osc2 only
    OscMix,
    /// Filter base cutoff in Hz
    FilterCutoff,
    /// Filter resonance (Q)
    FilterResonance,
    /// Amplitude envelope attack in ms
    Eg1AttackMs,
    /// Amplitude envelope decay in ms
    Eg1DecayMs,
    /// Amplitude envelope sustain level
    Eg1Sustain,
    /// Amplitude envelope release in ms
    Eg1ReleaseMs,
    /// Filter envelope attack in ms
    Eg2AttackMs,
    /// Filter envelope decay in ms
    Eg2DecayMs,
    /// Filter envelope sustain level
    Eg2Sustain,
    /// Filter envelope release in ms
    Eg2ReleaseMs,
    /// LFO 1 rate in Hz
    Lfo1RateHz,
    /// LFO 2 rate in Hz
    Lfo2RateHz,
    /// LFO 1 to oscillator pitch intensity
    Lfo1PitchIntensity,
    /// LFO 1 to amplifier gain intensity (tremolo)
    Lfo1AmpIntensity,
    /// LFO 2 to filter cutoff intensity
    Lfo2CutoffIntensity,
    /// Filter envelope to cutoff intensity
    Eg2CutoffIntensity,
    /// Filter keyboard tracking intensity
    KeytrackIntensity,
    /// Velocity to amp-envelope attack scaling intensity
    VelAttackIntensity,
    /// Note number to amp-envelope decay scaling intensity
    NoteDecayIntensity,
    /// Mod wheel to filter cutoff intensity
    ModWheelCutoffIntensity,
    /// Pitch bend range in semitones
    PitchBendRangeSemis,
    /// Master output gain in dB
    OutputGainDb,
}

impl ControlTag {
    /// Number of controls; sizes the store and descriptor table.
    pub const COUNT: usize = 24;

    /// All tags, in store order.
    pub const ALL: [ControlTag; Self::COUNT] = [
        ControlTag::Osc2DetuneCents,
        ControlTag::OscMix,
        ControlTag::FilterCutoff,
        ControlTag::FilterResonance,
        ControlTag::Eg1AttackMs,
        ControlTag::Eg1DecayMs,
        ControlTag::Eg1Sustain,
        ControlTag::Eg1ReleaseMs,
        ControlTag::Eg2AttackMs,
        ControlTag::Eg2DecayMs,
        ControlTag::Eg2Sustain,
        ControlTag::Eg2ReleaseMs,
        ControlTag::Lfo1RateHz,
        ControlTag::Lfo2RateHz,
        ControlTag::Lfo1PitchIntensity,
        ControlTag::Lfo1AmpIntensity,
        ControlTag::Lfo2CutoffIntensity,
        ControlTag::Eg2CutoffIntensity,
        ControlTag::KeytrackIntensity,
        ControlTag::VelAttackIntensity,
        ControlTag::NoteDecayIntensity,
        ControlTag::ModWheelCutoffIntensity,
        ControlTag::PitchBendRangeSemis,
        ControlTag::OutputGainDb,
    ];

    /// The static descriptor for this control.
    pub fn descriptor(self) -> &'static ControlDescriptor {
        &DESCRIPTORS[self as usize]
    }

    /// Look up a tag by its stable string id (used by the patch format).
    pub fn from_string_id(id: &str) -> Option<ControlTag> {
        Self::ALL
            .iter()
            .copied()
            .find(|tag| tag.descriptor().string_id == id)
    }
}

/// Where an inbound control value originated.
///
/// The store treats every origin identically once the value is cooked;
/// the tag exists so the (out-of-scope) host glue can apply different
/// smoothing policy per origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlOrigin {
    /// Live UI interaction
    Ui,
    /// Host automation
    Automation,
    /// Patch/preset load
    PresetLoad,
}

/// Normalization curve between normalized \[0, 1\] and natural units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlScale {
    /// Equal resolution across the range.
    Linear,
    /// More resolution at low values; for frequency and time controls.
    /// Requires `min > 0`.
    Logarithmic,
}

/// Static metadata for one control.
#[derive(Debug, Clone, Copy)]
pub struct ControlDescriptor {
    /// Display name
    pub name: &'static str,
    /// Stable id for patches and debugging (never changes once assigned)
    pub string_id: &'static str,
    /// Unit suffix for display
    pub unit: &'static str,
    /// Minimum natural-unit value
    pub min: f32,
    /// Maximum natural-unit value
    pub max: f32,
    /// Default natural-unit value
    pub default: f32,
    /// Cooking curve
    pub scale: ControlScale,
}

impl ControlDescriptor {
    const fn linear(
        name: &'static str,
        string_id: &'static str,
        unit: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            string_id,
            unit,
            min,
            max,
            default,
            scale: ControlScale::Linear,
        }
    }

    const fn log(
        name: &'static str,
        string_id: &'static str,
        unit: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            string_id,
            unit,
            min,
            max,
            default,
            scale: ControlScale::Logarithmic,
        }
    }

    /// Clamp a natural-unit value to this control's range.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Cook a normalized \[0, 1\] value into natural units.
    #[inline]
    pub fn cook(&self, normalized: f32) -> f32 {
        let n = normalized.clamp(0.0, 1.0);
        match self.scale {
            ControlScale::Linear => self.min + n * (self.max - self.min),
            ControlScale::Logarithmic => self.min * powf(self.max / self.min, n),
        }
    }

    /// Convert a natural-unit value back to normalized \[0, 1\].
    #[inline]
    pub fn uncook(&self, value: f32) -> f32 {
        let v = self.clamp(value);
        match self.scale {
            ControlScale::Linear => {
                let range = self.max - self.min;
                if range == 0.0 { 0.0 } else { (v - self.min) / range }
            }
            ControlScale::Logarithmic => logf(v / self.min) / logf(self.max / self.min),
        }
    }
}

static DESCRIPTORS: [ControlDescriptor; ControlTag::COUNT] = [
    ControlDescriptor::linear("Osc 2 Detune", "osc2_detune", " ct", -1200.0, 1200.0, 0.0),
    ControlDescriptor::linear("Osc Mix", "osc_mix", "", 0.0, 1.0, 0.0),
    ControlDescriptor::log("Filter Cutoff", "filter_cutoff", " Hz", 20.0, 20000.0, 1000.0),
    ControlDescriptor::linear("Filter Resonance", "filter_res", "", 0.5, 10.0, 0.7),
    ControlDescriptor::log("EG1 Attack", "eg1_attack", " ms", 0.1, 5000.0, 10.0),
    ControlDescriptor::log("EG1 Decay", "eg1_decay", " ms", 0.1, 5000.0, 100.0),
    ControlDescriptor::linear("EG1 Sustain", "eg1_sustain", "", 0.0, 1.0, 0.7),
    ControlDescriptor::log("EG1 Release", "eg1_release", " ms", 0.1, 10000.0, 200.0),
    ControlDescriptor::log("EG2 Attack", "eg2_attack", " ms", 0.1, 5000.0, 5.0),
    ControlDescriptor::log("EG2 Decay", "eg2_decay", " ms", 0.1, 5000.0, 150.0),
    ControlDescriptor::linear("EG2 Sustain", "eg2_sustain", "", 0.0, 1.0, 0.4),
    ControlDescriptor::log("EG2 Release", "eg2_release", " ms", 0.1, 10000.0, 100.0),
    ControlDescriptor::log("LFO1 Rate", "lfo1_rate", " Hz", 0.02, 20.0, 5.0),
    ControlDescriptor::log("LFO2 Rate", "lfo2_rate", " Hz", 0.02, 20.0, 0.5),
    ControlDescriptor::linear("LFO1 > Pitch", "lfo1_pitch_int", "", 0.0, 1.0, 0.0),
    ControlDescriptor::linear("LFO1 > Amp", "lfo1_amp_int", "", 0.0, 1.0, 0.0),
    ControlDescriptor::linear("LFO2 > Cutoff", "lfo2_cutoff_int", "", 0.0, 1.0, 0.0),
    ControlDescriptor::linear("EG2 > Cutoff", "eg2_cutoff_int", "", 0.0, 1.0, 0.5),
    ControlDescriptor::linear("Keytrack", "keytrack_int", "", 0.0, 1.0, 0.0),
    ControlDescriptor::linear("Vel > Attack", "vel_attack_int", "", 0.0, 1.0, 0.0),
    ControlDescriptor::linear("Note > Decay", "note_decay_int", "", 0.0, 1.0, 0.0),
    ControlDescriptor::linear("Wheel > Cutoff", "wheel_cutoff_int", "", 0.0, 1.0, 0.0),
    ControlDescriptor::linear("Bend Range", "bend_range", " st", 0.0, 12.0, 2.0),
    ControlDescriptor::linear("Output Gain", "output_gain", " dB", -60.0, 12.0, 0.0),
];

/// The engine-owned canonical parameter store.
///
/// Holds every control's current value in natural units. The audio thread
/// reads it; writes happen only at block boundaries through the engine's
/// inbound control path.
#[derive(Debug, Clone)]
pub struct ControlStore {
    values: [f32; ControlTag::COUNT],
}

impl Default for ControlStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlStore {
    /// Create a store populated with every control's default value.
    pub fn new() -> Self {
        let mut values = [0.0; ControlTag::COUNT];
        for tag in ControlTag::ALL {
            values[tag as usize] = tag.descriptor().default;
        }
        Self { values }
    }

    /// Current natural-unit value of a control.
    #[inline]
    pub fn get(&self, tag: ControlTag) -> f32 {
        self.values[tag as usize]
    }

    /// Set a control, clamped to its descriptor range.
    #[inline]
    pub fn set(&mut self, tag: ControlTag, value: f32) {
        self.values[tag as usize] = tag.descriptor().clamp(value);
    }

    /// Iterate `(tag, value)` pairs in store order, for persistence.
    pub fn snapshot(&self) -> impl Iterator<Item = (ControlTag, f32)> + '_ {
        ControlTag::ALL.iter().map(|&tag| (tag, self.get(tag)))
    }
}
