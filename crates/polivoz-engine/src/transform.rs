//! Source-value transforms applied by matrix rows.
//!
//! A transform shapes a raw source value before intensity and range are
//! applied. The catalog is a plain enum dispatched in [`ModTransform::apply`];
//! rows pick the member that matches their source's scaling convention.

use libm::exp2f;

/// Shaping applied to a source value before intensity/range scaling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ModTransform {
    /// Pass the source value through unchanged.
    Identity,
    /// Raw MIDI 0..127 to \[0, 1\]; `invert` flips the sense (`1 - v/127`).
    /// The inversion sense belongs to the routing, not the controller.
    MidiNormalize {
        /// Flip so 0 maps to 1.0 and 127 to 0.0.
        invert: bool,
    },
    /// MIDI note number to a pitch-tracking frequency ratio relative to
    /// middle C: `2^((note - 60) / 12)`. C4 maps to exactly 1.0.
    NoteToFreqRatio,
    /// Raw MIDI 0..127 to a pan position in \[-1, 1\], exact center at 64.
    MidiToPan,
    /// Switch-style controller: value >= 64 reads 1.0, else 0.0.
    MidiSwitch,
    /// MIDI volume-style CC to a gain multiplier: 0 maps to 0.0 (silent)
    /// and 127 to 1.0 (unity).
    InvertNormalize,
}

impl ModTransform {
    /// Apply the transform to a raw source value.
    #[inline]
    pub fn apply(self, value: f32) -> f32 {
        match self {
            ModTransform::Identity => value,
            ModTransform::MidiNormalize { invert } => {
                let n = value / 127.0;
                if invert { 1.0 - n } else { n }
            }
            ModTransform::NoteToFreqRatio => exp2f((value - 60.0) / 12.0),
            ModTransform::MidiToPan => (value - 64.0) / 64.0,
            ModTransform::MidiSwitch => {
                if value >= 64.0 { 1.0 } else { 0.0 }
            }
            ModTransform::InvertNormalize => {
                let attenuation = 127.0 - value;
                (127.0 - attenuation) / 127.0
            }
        }
    }
}
