//! Property tests for the control layer and DSP leaves.

use polivoz_core::{
    AdsrEnvelope, ControlStore, ControlTag, Lfo, LfoWaveform, OscWaveform, Oscillator,
    SmoothedParam, SvfFilter, db_to_linear, linear_to_db, midi_to_freq, semitones_to_ratio,
};
use proptest::prelude::*;

proptest! {
    /// cook(uncook(v)) is the identity (within float tolerance) across
    /// every control's natural range.
    #[test]
    fn cooking_round_trips(normalized in 0.0f32..=1.0) {
        for tag in ControlTag::ALL {
            let desc = tag.descriptor();
            let natural = desc.cook(normalized);
            prop_assert!(natural >= desc.min && natural <= desc.max, "{tag:?}");
            let back = desc.uncook(natural);
            prop_assert!((back - normalized).abs() < 1e-3, "{tag:?}: {normalized} -> {back}");
        }
    }

    /// Cooked values are monotonic in the normalized input.
    #[test]
    fn cooking_is_monotonic(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        for tag in ControlTag::ALL {
            let desc = tag.descriptor();
            prop_assert!(desc.cook(lo) <= desc.cook(hi) + 1e-4, "{tag:?}");
        }
    }

    /// The store clamps every write to the control's range.
    #[test]
    fn store_never_exceeds_range(value in -1e6f32..1e6) {
        let mut store = ControlStore::new();
        for tag in ControlTag::ALL {
            store.set(tag, value);
            let desc = tag.descriptor();
            let stored = store.get(tag);
            prop_assert!(stored >= desc.min && stored <= desc.max, "{tag:?}: {stored}");
        }
    }

    /// Equal-tempered pitch math: one semitone up multiplies frequency by
    /// the same ratio everywhere on the keyboard.
    #[test]
    fn semitone_steps_are_uniform(note in 0u8..126) {
        let ratio = midi_to_freq(note + 1) / midi_to_freq(note);
        prop_assert!((ratio - semitones_to_ratio(1.0)).abs() < 1e-4);
    }

    /// dB conversion round-trips above the silence floor.
    #[test]
    fn db_round_trip(db in -100.0f32..20.0) {
        let back = linear_to_db(db_to_linear(db));
        prop_assert!((back - db).abs() < 0.01, "{db} -> {back}");
    }

    /// Envelope output stays in [0, 1] for arbitrary ADSR settings.
    #[test]
    fn envelope_output_bounded(
        attack in 0.1f32..500.0,
        decay in 0.1f32..500.0,
        sustain in 0.0f32..=1.0,
        release in 0.1f32..500.0,
        gate_len in 1usize..4000,
    ) {
        let mut eg = AdsrEnvelope::new(48_000.0);
        eg.set_attack_ms(attack);
        eg.set_decay_ms(decay);
        eg.set_sustain(sustain);
        eg.set_release_ms(release);

        eg.gate_on();
        for _ in 0..gate_len {
            let v = eg.advance();
            prop_assert!((0.0..=1.0).contains(&v), "{v}");
        }
        eg.gate_off();
        for _ in 0..8000 {
            let v = eg.advance();
            prop_assert!((0.0..=1.0).contains(&v), "{v}");
        }
    }

    /// Oscillator output is bounded (small polyBLEP overshoot allowed).
    #[test]
    fn oscillator_output_bounded(freq in 20.0f32..10_000.0) {
        for wf in [
            OscWaveform::Sine,
            OscWaveform::Triangle,
            OscWaveform::Saw,
            OscWaveform::Square,
            OscWaveform::Noise,
        ] {
            let mut osc = Oscillator::new(48_000.0);
            osc.set_waveform(wf);
            osc.set_frequency(freq);
            for _ in 0..2000 {
                let s = osc.advance();
                prop_assert!(s.abs() <= 1.5, "{wf:?} at {freq} Hz: {s}");
            }
        }
    }

    /// The LFO stays bipolar at any rate.
    #[test]
    fn lfo_output_bipolar(rate in 0.02f32..20.0) {
        for wf in [
            LfoWaveform::Sine,
            LfoWaveform::Triangle,
            LfoWaveform::Saw,
            LfoWaveform::Square,
            LfoWaveform::SampleHold,
        ] {
            let mut lfo = Lfo::new(48_000.0, rate);
            lfo.set_waveform(wf);
            for _ in 0..2000 {
                let v = lfo.advance();
                prop_assert!((-1.0..=1.0).contains(&v), "{wf:?}: {v}");
            }
        }
    }

    /// Smoothing never overshoots its target.
    #[test]
    fn smoothing_never_overshoots(
        start in -10.0f32..10.0,
        target in -10.0f32..10.0,
        time_ms in 0.0f32..100.0,
    ) {
        let mut p = SmoothedParam::new(start, 48_000.0, time_ms);
        p.set_target(target);
        let lo = start.min(target);
        let hi = start.max(target);
        for _ in 0..2000 {
            let v = p.advance();
            prop_assert!(v >= lo - 1e-4 && v <= hi + 1e-4, "{v} outside [{lo}, {hi}]");
        }
    }

    /// The filter is stable for any cutoff/resonance pair fed a saw.
    #[test]
    fn filter_stays_finite(cutoff in 20.0f32..20_000.0, resonance in 0.0f32..=1.0) {
        let mut filter = SvfFilter::new(48_000.0);
        filter.set_cutoff(cutoff);
        filter.set_resonance(resonance);
        let mut osc = Oscillator::new(48_000.0);
        osc.set_frequency(220.0);
        for _ in 0..4000 {
            let y = filter.process(osc.advance());
            prop_assert!(y.is_finite());
            prop_assert!(y.abs() < 100.0, "{y} at cutoff {cutoff}, res {resonance}");
        }
    }
}
