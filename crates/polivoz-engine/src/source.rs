//! Modulation source registry.
//!
//! Every modulation input is identified by a dense [`ModSource`] tag and
//! stored in a plain array. Channel-wide values (LFOs, pitch bend, CCs)
//! live in the engine's [`SharedSources`]; per-note values (velocity, note
//! number, envelope outputs) live in each voice's [`VoiceSources`]. A
//! [`SourceView`] overlays the two for matrix evaluation, with voice-local
//! tags shadowing shared storage.
//!
//! Scaling convention: raw MIDI sources (velocity, note number, all CCs)
//! are stored as their raw 0..127 value; transforms own the normalization.
//! Bipolar sources (LFOs, pitch bend) are stored in \[-1, 1\]. Envelope
//! outputs are \[0, 1\].

/// Identifier for every modulation source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum ModSource {
    /// Global LFO 1, bipolar
    Lfo1,
    /// Global LFO 2, bipolar
    Lfo2,
    /// Amplitude envelope output, per voice, \[0, 1\]
    Eg1,
    /// Filter envelope output, per voice, \[0, 1\]
    Eg2,
    /// Note-on velocity, per voice, raw 0..127
    Velocity,
    /// MIDI note number, per voice, raw 0..127
    NoteNumber,
    /// Pitch bend, bipolar \[-1, 1\]
    PitchBend,
    /// CC 1, raw 0..127
    ModWheel,
    /// CC 7, raw 0..127
    VolumeCc,
    /// CC 11, raw 0..127
    ExpressionCc,
    /// CC 10, raw 0..127
    PanCc,
    /// CC 64, raw 0..127
    SustainPedal,
}

impl ModSource {
    /// Number of sources; sizes the registries.
    pub const COUNT: usize = 12;

    const VOICE_LOCAL_BASE: usize = ModSource::Eg1 as usize;
    const VOICE_LOCAL_END: usize = ModSource::NoteNumber as usize;

    /// True for sources that differ per voice.
    #[inline]
    pub fn is_voice_local(self) -> bool {
        (Self::VOICE_LOCAL_BASE..=Self::VOICE_LOCAL_END).contains(&(self as usize))
    }
}

/// Channel-wide source values, owned by the engine.
#[derive(Debug, Clone)]
pub struct SharedSources {
    values: [f32; ModSource::COUNT],
}

impl Default for SharedSources {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedSources {
    /// All sources zero except volume and expression CCs, which idle at
    /// full (127) so a synth that never receives CC7/CC11 plays at unity.
    pub fn new() -> Self {
        let mut sources = Self {
            values: [0.0; ModSource::COUNT],
        };
        sources.set(ModSource::VolumeCc, 127.0);
        sources.set(ModSource::ExpressionCc, 127.0);
        sources.set(ModSource::PanCc, 64.0);
        sources
    }

    /// Current value of a source.
    #[inline]
    pub fn get(&self, source: ModSource) -> f32 {
        self.values[source as usize]
    }

    /// Overwrite a source value.
    #[inline]
    pub fn set(&mut self, source: ModSource, value: f32) {
        self.values[source as usize] = value;
    }
}

/// Per-voice source values, overwritten at note-on and each sample.
#[derive(Debug, Clone)]
pub struct VoiceSources {
    values: [f32; ModSource::COUNT],
}

impl Default for VoiceSources {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceSources {
    /// All-zero registry.
    pub fn new() -> Self {
        Self {
            values: [0.0; ModSource::COUNT],
        }
    }

    /// Current value of a source.
    #[inline]
    pub fn get(&self, source: ModSource) -> f32 {
        self.values[source as usize]
    }

    /// Overwrite a source value.
    #[inline]
    pub fn set(&mut self, source: ModSource, value: f32) {
        self.values[source as usize] = value;
    }
}

/// Read view resolving any source tag for one voice.
#[derive(Clone, Copy)]
pub struct SourceView<'a> {
    shared: &'a SharedSources,
    voice: &'a VoiceSources,
}

impl<'a> SourceView<'a> {
    /// Combine the engine registry with one voice's registry.
    #[inline]
    pub fn new(shared: &'a SharedSources, voice: &'a VoiceSources) -> Self {
        Self { shared, voice }
    }

    /// Resolve a source tag; voice-local tags shadow shared storage.
    #[inline]
    pub fn get(&self, source: ModSource) -> f32 {
        if source.is_voice_local() {
            self.voice.get(source)
        } else {
            self.shared.get(source)
        }
    }
}
