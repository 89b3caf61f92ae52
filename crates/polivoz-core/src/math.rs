//! Pitch and level conversions shared across the workspace.

use libm::{log2f, log10f, powf};

/// Convert a MIDI note number to frequency in Hz.
///
/// Standard tuning: A4 (note 69) = 440 Hz.
#[inline]
pub fn midi_to_freq(note: u8) -> f32 {
    440.0 * powf(2.0, (note as f32 - 69.0) / 12.0)
}

/// Convert semitones to a frequency ratio.
#[inline]
pub fn semitones_to_ratio(semitones: f32) -> f32 {
    powf(2.0, semitones / 12.0)
}

/// Convert cents to a frequency ratio. 100 cents = 1 semitone.
#[inline]
pub fn cents_to_ratio(cents: f32) -> f32 {
    powf(2.0, cents / 1200.0)
}

/// Convert decibels to a linear amplitude multiplier.
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    powf(10.0, db / 20.0)
}

/// Convert a linear amplitude multiplier to decibels.
///
/// Values at or below zero clamp to -120 dB rather than producing -inf.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        -120.0
    } else {
        20.0 * log10f(linear)
    }
}

/// Convert a frequency in Hz to a fractional MIDI note number.
#[inline]
pub fn freq_to_midi(freq: f32) -> f32 {
    69.0 + 12.0 * log2f(freq / 440.0)
}
