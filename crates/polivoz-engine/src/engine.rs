//! The block-processing driver.
//!
//! [`Engine`] owns everything the audio callback touches: the voice pool,
//! the modulation matrix, the control store, the shared source registry,
//! two global LFOs, and the block event queue. All of it is built in
//! [`Engine::new`]; rendering allocates nothing, takes no locks, and
//! returns no `Result` — malformed input is a no-op.
//!
//! Control changes are applied at block boundaries with latest-value-wins
//! per control (no intra-block automation interpolation). Note events
//! carry a sample offset and take effect at the sub-block containing it;
//! sub-blocks are [`SUB_BLOCK`] samples, fine enough that event timing
//! stays under a millisecond at common rates.

use polivoz_core::{
    ControlOrigin, ControlStore, ControlTag, Lfo, LfoWaveform, SmoothedParam, db_to_linear,
};

use crate::event::{EventQueue, NoteEvent, NoteEventKind};
use crate::matrix::{DEFAULT_ROW_CAPACITY, ModMatrix};
use crate::pool::VoicePool;
use crate::source::{ModSource, SharedSources};

/// Samples per event-dispatch sub-block (about 0.7 ms at 48 kHz).
pub const SUB_BLOCK: usize = 32;

/// Capacity of the per-block note event queue.
pub const EVENT_CAPACITY: usize = 64;

/// A complete polyphonic engine with `N` voices.
///
/// # Example
///
/// ```rust
/// use polivoz_engine::{Engine, NoteEvent, NoteEventKind};
///
/// let mut engine: Engine<8> = Engine::new(48_000.0);
/// engine.queue_note_event(NoteEvent {
///     kind: NoteEventKind::NoteOn { velocity: 100 },
///     note: 60,
///     channel: 0,
///     offset: 0,
/// });
///
/// let mut left = [0.0f32; 256];
/// let mut right = [0.0f32; 256];
/// let silent = engine.render(&mut left, &mut right);
/// assert!(!silent);
/// ```
#[derive(Debug, Clone)]
pub struct Engine<const N: usize> {
    sample_rate: f32,
    pool: VoicePool<N>,
    matrix: ModMatrix<DEFAULT_ROW_CAPACITY>,
    controls: ControlStore,
    shared: SharedSources,
    lfo1: Lfo,
    lfo2: Lfo,
    events: EventQueue<EVENT_CAPACITY>,
    pending: [Option<f32>; ControlTag::COUNT],
    channel_filter: Option<u8>,
    output_gain: SmoothedParam,
}

impl<const N: usize> Engine<N> {
    /// Build an engine with the default modulation wiring and control
    /// values. Everything the audio path needs is allocated here.
    pub fn new(sample_rate: f32) -> Self {
        let controls = ControlStore::new();
        let mut lfo1 = Lfo::new(sample_rate, controls.get(ControlTag::Lfo1RateHz));
        lfo1.set_waveform(LfoWaveform::Sine);
        let mut lfo2 = Lfo::new(sample_rate, controls.get(ControlTag::Lfo2RateHz));
        lfo2.set_waveform(LfoWaveform::Triangle);

        let mut pool = VoicePool::new(sample_rate);
        pool.apply_controls(&controls);

        let gain = db_to_linear(controls.get(ControlTag::OutputGainDb));

        Self {
            sample_rate,
            pool,
            matrix: ModMatrix::default_rows(),
            controls,
            shared: SharedSources::new(),
            lfo1,
            lfo2,
            events: EventQueue::new(),
            pending: [None; ControlTag::COUNT],
            channel_filter: None,
            output_gain: SmoothedParam::new(gain, sample_rate, 5.0),
        }
    }

    /// The sample rate this engine runs at.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Read access to the control store.
    pub fn controls(&self) -> &ControlStore {
        &self.controls
    }

    /// The routing table, for init-time row setup and enable/switch
    /// toggles between blocks.
    pub fn matrix_mut(&mut self) -> &mut ModMatrix<DEFAULT_ROW_CAPACITY> {
        &mut self.matrix
    }

    /// Restrict note events to one MIDI channel; `None` is omni.
    pub fn set_channel_filter(&mut self, channel: Option<u8>) {
        self.channel_filter = channel;
    }

    /// Queue a natural-unit control change. Latest value per control wins
    /// within a block; applied (clamped) at the next `render`.
    pub fn queue_control(&mut self, tag: ControlTag, value: f32, origin: ControlOrigin) {
        #[cfg(feature = "tracing")]
        tracing::trace!(?tag, value, ?origin, "control change queued");
        #[cfg(not(feature = "tracing"))]
        let _ = origin;
        self.pending[tag as usize] = Some(value);
    }

    /// Queue a normalized \[0, 1\] control change, cooked through the
    /// control's descriptor.
    pub fn queue_control_normalized(&mut self, tag: ControlTag, normalized: f32, origin: ControlOrigin) {
        let value = tag.descriptor().cook(normalized);
        self.queue_control(tag, value, origin);
    }

    /// Queue a note event for the next block. Returns false (dropped)
    /// when the queue is full; channel filtering happens at dispatch.
    pub fn queue_note_event(&mut self, event: NoteEvent) -> bool {
        self.events.push(event)
    }

    /// Apply a continuous controller. CC 1/7/10/11/64 feed the matrix
    /// sources; CC 123 releases all notes; anything else is ignored.
    pub fn control_change(&mut self, cc: u8, value: u8) {
        let value_f = f32::from(value.min(127));
        match cc {
            1 => self.shared.set(ModSource::ModWheel, value_f),
            7 => self.shared.set(ModSource::VolumeCc, value_f),
            10 => self.shared.set(ModSource::PanCc, value_f),
            11 => self.shared.set(ModSource::ExpressionCc, value_f),
            64 => self.shared.set(ModSource::SustainPedal, value_f),
            123 => self.pool.all_notes_off(),
            _ => {}
        }
    }

    /// Set pitch bend as a bipolar \[-1, 1\] value. The semitone range
    /// comes from the bend-range control via the matrix row.
    pub fn set_pitch_bend(&mut self, bend: f32) {
        self.shared.set(ModSource::PitchBend, bend.clamp(-1.0, 1.0));
    }

    /// Release every sounding note.
    pub fn all_notes_off(&mut self) {
        self.pool.all_notes_off();
    }

    /// Hard-reset voices and the event queue (transport stop).
    pub fn reset(&mut self) {
        self.pool.reset();
        self.events.clear();
    }

    /// Render one block into the stereo buffers.
    ///
    /// Returns true when the block ends with no active voices, so the
    /// host can gate downstream processing.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) -> bool {
        let frames = left.len().min(right.len());
        self.apply_pending_controls();

        let mut sub_start = 0;
        while sub_start < frames {
            let sub_end = (sub_start + SUB_BLOCK).min(frames);
            self.dispatch_events(sub_start, sub_end);

            for frame in sub_start..sub_end {
                let l1 = self.lfo1.advance();
                let l2 = self.lfo2.advance();
                self.shared.set(ModSource::Lfo1, l1);
                self.shared.set(ModSource::Lfo2, l2);

                let (l, r) = self.pool.tick_all(&self.matrix, &self.shared, &self.controls);
                let gain = self.output_gain.advance();
                left[frame] = l * gain;
                right[frame] = r * gain;
            }
            sub_start = sub_end;
        }

        self.events.clear();
        self.pool.active_count() == 0
    }

    fn dispatch_events(&mut self, start: usize, end: usize) {
        for event in self.events.in_range(start, end) {
            if let Some(channel) = self.channel_filter {
                if event.channel != channel {
                    continue;
                }
            }
            match event.kind {
                // Velocity 0 is a note-off in disguise
                NoteEventKind::NoteOn { velocity: 0 } | NoteEventKind::NoteOff => {
                    self.pool.note_off(event.note, event.channel);
                }
                NoteEventKind::NoteOn { velocity } => {
                    self.pool.note_on(
                        event.note,
                        velocity,
                        event.channel,
                        &self.matrix,
                        &self.shared,
                        &self.controls,
                    );
                }
                NoteEventKind::PolyPressure { pressure } => {
                    // Observed, not yet routed to a destination
                    #[cfg(feature = "tracing")]
                    tracing::trace!(note = event.note, pressure, "poly pressure ignored");
                    #[cfg(not(feature = "tracing"))]
                    let _ = pressure;
                }
            }
        }
    }

    fn apply_pending_controls(&mut self) {
        let mut voice_controls_changed = false;
        for tag in ControlTag::ALL {
            let Some(value) = self.pending[tag as usize].take() else {
                continue;
            };
            self.controls.set(tag, value);
            let applied = self.controls.get(tag);
            match tag {
                ControlTag::Lfo1RateHz => self.lfo1.set_rate(applied),
                ControlTag::Lfo2RateHz => self.lfo2.set_rate(applied),
                ControlTag::OutputGainDb => {
                    self.output_gain.set_target(db_to_linear(applied));
                }
                ControlTag::Eg1AttackMs
                | ControlTag::Eg1DecayMs
                | ControlTag::Eg1Sustain
                | ControlTag::Eg1ReleaseMs
                | ControlTag::Eg2AttackMs
                | ControlTag::Eg2DecayMs
                | ControlTag::Eg2Sustain
                | ControlTag::Eg2ReleaseMs
                | ControlTag::FilterResonance => voice_controls_changed = true,
                _ => {}
            }
        }
        if voice_controls_changed {
            self.pool.apply_controls(&self.controls);
        }
    }
}
