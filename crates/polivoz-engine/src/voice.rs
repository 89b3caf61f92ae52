//! A single polyphonic voice.
//!
//! Each voice composes two oscillators, a state-variable filter, two
//! envelope generators (EG1 amplitude, EG2 filter), and a DCA. Concrete
//! types throughout; the hot loop dispatches no trait objects. The voice
//! owns its [`VoiceSources`] and [`DestAccumulators`]; the matrix, shared
//! sources, and control store arrive by reference each tick.
//!
//! Per-sample order inside [`Voice::tick`] is the matrix's layer contract:
//! reset accumulators, evaluate the note-scaling layer, advance the EGs and
//! publish their outputs as sources, evaluate the audio-rate layer, then
//! let the DSP chain consume its accumulators. Envelope time scaling is the
//! exception: it is captured once at note-on from the note's own velocity
//! and number, which cannot change mid-note.

use polivoz_core::{
    AdsrEnvelope, Amplifier, ControlStore, ControlTag, Oscillator, SvfFilter, cents_to_ratio,
    midi_to_freq, semitones_to_ratio,
};

use crate::dest::{DestAccumulators, ModDest};
use crate::matrix::{ModLayer, ModMatrix};
use crate::source::{ModSource, SharedSources, SourceView, VoiceSources};

/// Voice lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VoiceState {
    /// Free for allocation; output is exactly (0.0, 0.0).
    #[default]
    Idle,
    /// Gated on and producing audio.
    Sounding,
    /// Note released; audible until EG1 finishes.
    Releasing,
}

/// One voice of the polyphonic engine.
#[derive(Debug, Clone)]
pub struct Voice {
    state: VoiceState,
    note: u8,
    channel: u8,
    velocity: u8,
    age: u64,
    base_freq: f32,
    release_pending: bool,

    osc1: Oscillator,
    osc2: Oscillator,
    filter: SvfFilter,
    eg1: AdsrEnvelope,
    eg2: AdsrEnvelope,
    amp: Amplifier,

    sources: VoiceSources,
    accum: DestAccumulators,
}

impl Voice {
    /// An idle voice at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            state: VoiceState::Idle,
            note: 0,
            channel: 0,
            velocity: 0,
            age: 0,
            base_freq: 0.0,
            release_pending: false,
            osc1: Oscillator::new(sample_rate),
            osc2: Oscillator::new(sample_rate),
            filter: SvfFilter::new(sample_rate),
            eg1: AdsrEnvelope::new(sample_rate),
            eg2: AdsrEnvelope::new(sample_rate),
            amp: Amplifier::new(),
            sources: VoiceSources::new(),
            accum: DestAccumulators::new(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> VoiceState {
        self.state
    }

    /// The note this voice carries (meaningful while not idle).
    pub fn note(&self) -> u8 {
        self.note
    }

    /// The channel this voice carries.
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Allocation events survived since this voice's note-on; the
    /// allocator steals the voice with the maximum age.
    pub fn age(&self) -> u64 {
        self.age
    }

    /// True while sounding or releasing.
    pub fn is_active(&self) -> bool {
        self.state != VoiceState::Idle
    }

    pub(crate) fn increment_age(&mut self) {
        self.age += 1;
    }

    /// Push block-rate control values into the components that cache them.
    ///
    /// Called by the engine when controls change; cutoff, mix, and detune
    /// are instead read live each tick because modulation rides on them.
    pub fn apply_controls(&mut self, controls: &ControlStore) {
        self.eg1.set_attack_ms(controls.get(ControlTag::Eg1AttackMs));
        self.eg1.set_decay_ms(controls.get(ControlTag::Eg1DecayMs));
        self.eg1.set_sustain(controls.get(ControlTag::Eg1Sustain));
        self.eg1.set_release_ms(controls.get(ControlTag::Eg1ReleaseMs));

        self.eg2.set_attack_ms(controls.get(ControlTag::Eg2AttackMs));
        self.eg2.set_decay_ms(controls.get(ControlTag::Eg2DecayMs));
        self.eg2.set_sustain(controls.get(ControlTag::Eg2Sustain));
        self.eg2.set_release_ms(controls.get(ControlTag::Eg2ReleaseMs));

        let resonance = controls.get(ControlTag::FilterResonance);
        let desc = ControlTag::FilterResonance.descriptor();
        self.filter.set_resonance(desc.uncook(resonance));
    }

    /// Update sample rate on every component.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.osc1.set_sample_rate(sample_rate);
        self.osc2.set_sample_rate(sample_rate);
        self.filter.set_sample_rate(sample_rate);
        self.eg1.set_sample_rate(sample_rate);
        self.eg2.set_sample_rate(sample_rate);
    }

    /// Start (or steal-restart) this voice on a note.
    ///
    /// Runs one note-scaling matrix pass so the envelopes pick up their
    /// velocity/note time scaling before gating on.
    pub fn note_on<const R: usize>(
        &mut self,
        note: u8,
        velocity: u8,
        channel: u8,
        matrix: &ModMatrix<R>,
        shared: &SharedSources,
        controls: &ControlStore,
    ) {
        self.note = note;
        self.velocity = velocity;
        self.channel = channel;
        self.age = 0;
        self.base_freq = midi_to_freq(note);

        self.sources = VoiceSources::new();
        self.sources.set(ModSource::Velocity, f32::from(velocity));
        self.sources.set(ModSource::NoteNumber, f32::from(note));

        self.accum.reset();
        let view = SourceView::new(shared, &self.sources);
        matrix.evaluate(ModLayer::NoteScaling, &view, controls, &mut self.accum);

        self.apply_controls(controls);
        self.eg1.set_time_scaling(
            self.accum.get(ModDest::Eg1AttackScale),
            self.accum.get(ModDest::Eg1DecayScale),
        );
        self.eg1
            .set_sustain_hold(self.accum.get(ModDest::Eg1SustainHold) > 0.5);

        self.osc1.reset();
        self.osc2.reset();
        self.filter.reset();
        self.eg1.gate_on();
        self.eg2.gate_on();
        self.release_pending = false;
        self.state = VoiceState::Sounding;
    }

    /// Release the note.
    ///
    /// The envelope gate-off is deferred to the next tick so it sees the
    /// current sustain-pedal state: a pedal press and a note-off arriving
    /// in the same block must still hold the note.
    pub fn note_off(&mut self) {
        if self.state != VoiceState::Sounding {
            return;
        }
        self.release_pending = true;
        self.state = VoiceState::Releasing;
    }

    /// Silence immediately without a release tail.
    pub fn force_off(&mut self) {
        self.eg1.reset();
        self.eg2.reset();
        self.release_pending = false;
        self.state = VoiceState::Idle;
    }

    /// Produce one stereo sample.
    #[inline]
    pub fn tick<const R: usize>(
        &mut self,
        matrix: &ModMatrix<R>,
        shared: &SharedSources,
        controls: &ControlStore,
    ) -> (f32, f32) {
        if self.state == VoiceState::Idle {
            return (0.0, 0.0);
        }

        self.accum.reset();
        let view = SourceView::new(shared, &self.sources);
        matrix.evaluate(ModLayer::NoteScaling, &view, controls, &mut self.accum);

        // Pedal state flows per sample; time scaling stays note-on exact
        self.eg1
            .set_sustain_hold(self.accum.get(ModDest::Eg1SustainHold) > 0.5);
        if self.release_pending {
            self.eg1.gate_off();
            self.eg2.gate_off();
            self.release_pending = false;
        }

        let eg1_level = self.eg1.advance();
        let eg2_level = self.eg2.advance();
        self.sources.set(ModSource::Eg1, eg1_level);
        self.sources.set(ModSource::Eg2, eg2_level);

        let view = SourceView::new(shared, &self.sources);
        matrix.evaluate(ModLayer::AudioRate, &view, controls, &mut self.accum);

        let pitch_all = self.accum.get(ModDest::AllOscPitch);
        let semis1 = pitch_all + self.accum.get(ModDest::Osc1Pitch);
        let semis2 = pitch_all + self.accum.get(ModDest::Osc2Pitch);
        let detune = cents_to_ratio(controls.get(ControlTag::Osc2DetuneCents));
        self.osc1
            .set_frequency(self.base_freq * semitones_to_ratio(semis1));
        self.osc2
            .set_frequency(self.base_freq * detune * semitones_to_ratio(semis2));

        let mix = controls.get(ControlTag::OscMix);
        let dry = self.osc1.advance() * (1.0 - mix) + self.osc2.advance() * mix;

        let cutoff = controls.get(ControlTag::FilterCutoff) * self.accum.get(ModDest::FilterKeytrack)
            + self.accum.get(ModDest::FilterCutoff);
        self.filter.set_cutoff(cutoff);
        let filtered = self.filter.process(dry);

        let amp_scale = self.accum.get(ModDest::DcaAmpScale).max(0.0);
        let gain = (eg1_level * amp_scale + self.accum.get(ModDest::DcaGain)).max(0.0);
        self.amp.set_gain(gain);
        self.amp.set_pan(self.accum.get(ModDest::DcaPan));
        let out = self.amp.process(filtered);

        if self.state == VoiceState::Releasing && !self.eg1.is_active() {
            self.state = VoiceState::Idle;
        }
        out
    }
}
