//! The modulation matrix: a shared, data-driven routing table.
//!
//! One [`ModMatrix`] is built at engine init and shared read-only by every
//! voice; per-voice state lives entirely in each voice's
//! [`DestAccumulators`](crate::DestAccumulators). A row is (source, dest,
//! layer, intensity, range, transform, enabled); intensity and range are
//! [`ScalarRef`]s, so a row can follow a live control without holding a
//! pointer into anything.
//!
//! Evaluation happens in two declared layers per sample:
//! [`ModLayer::NoteScaling`] first (rows whose results feed the envelope
//! generators), then [`ModLayer::AudioRate`] (rows consumed by the
//! oscillators, filter, and DCA, including the envelope outputs produced in
//! between). The ordering is part of the matrix contract, not an accident
//! of call sites.
//!
//! A row contributes `intensity * (transform(source) * range - neutral)`,
//! where neutral is the destination's resting value. Summation is uniform:
//! a full-intensity row reproduces its transform output exactly, a disabled
//! or zero-intensity row contributes nothing, and multiple rows targeting
//! one destination add up.

use polivoz_core::{ControlStore, ControlTag};

use crate::dest::{DestAccumulators, ModDest};
use crate::source::{ModSource, SourceView};
use crate::transform::ModTransform;

/// A scalar that is either fixed at row-build time or tracks a control.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScalarRef {
    /// Constant value baked into the row.
    Fixed(f32),
    /// Read the control's current natural-unit value at evaluation time.
    Control(ControlTag),
}

impl ScalarRef {
    /// Resolve against the control store.
    #[inline]
    pub fn resolve(self, controls: &ControlStore) -> f32 {
        match self {
            ScalarRef::Fixed(value) => value,
            ScalarRef::Control(tag) => controls.get(tag),
        }
    }
}

/// Evaluation phase a row belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModLayer {
    /// Phase 0: rows whose results the envelope generators consume
    /// (time scaling, sustain hold).
    NoteScaling,
    /// Phase 1: rows consumed by the oscillators, filter, and DCA.
    /// Envelope outputs are published between the two phases.
    AudioRate,
}

/// One modulation routing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModRow {
    /// Where the value comes from.
    pub source: ModSource,
    /// Which accumulator receives the contribution.
    pub dest: ModDest,
    /// Evaluation phase.
    pub layer: ModLayer,
    /// Contribution strength; often a live control.
    pub intensity: ScalarRef,
    /// Full-scale magnitude in the destination's units.
    pub range: ScalarRef,
    /// Source shaping.
    pub transform: ModTransform,
    /// Disabled rows are skipped entirely.
    pub enabled: bool,
}

const INERT_ROW: ModRow = ModRow {
    source: ModSource::Lfo1,
    dest: ModDest::AllOscPitch,
    layer: ModLayer::AudioRate,
    intensity: ScalarRef::Fixed(0.0),
    range: ScalarRef::Fixed(0.0),
    transform: ModTransform::Identity,
    enabled: false,
};

/// Row capacity of the default wiring.
pub const DEFAULT_ROW_CAPACITY: usize = 16;

/// Fixed-capacity modulation routing table.
///
/// Built once before processing starts, then shared immutably by the audio
/// path except for the `enabled` toggles, which flip in place.
#[derive(Debug, Clone)]
pub struct ModMatrix<const R: usize> {
    rows: [ModRow; R],
    len: usize,
}

impl<const R: usize> Default for ModMatrix<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const R: usize> ModMatrix<R> {
    /// An empty matrix.
    pub fn new() -> Self {
        Self {
            rows: [INERT_ROW; R],
            len: 0,
        }
    }

    /// Number of installed rows.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no rows are installed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a row. Returns false when the table is full.
    ///
    /// Init-time only; never called while the audio thread is evaluating.
    pub fn add_row(&mut self, row: ModRow) -> bool {
        if self.len >= R {
            return false;
        }
        self.rows[self.len] = row;
        self.len += 1;
        true
    }

    /// Toggle the first row matching (source, dest). Returns false when no
    /// such row exists, leaving the table untouched.
    pub fn enable_row(&mut self, source: ModSource, dest: ModDest, enabled: bool) -> bool {
        match self.find(source, dest) {
            Some(i) => {
                self.rows[i].enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Atomically retarget a source: disable its row into `from` and enable
    /// its row into `to` in one logical update, so mutually exclusive
    /// destination selection never double-counts or leaves both rows dead.
    ///
    /// Returns false (no mutation) when either row is missing.
    pub fn switch_destination(&mut self, source: ModSource, from: ModDest, to: ModDest) -> bool {
        let (Some(from_idx), Some(to_idx)) = (self.find(source, from), self.find(source, to))
        else {
            return false;
        };
        self.rows[from_idx].enabled = false;
        self.rows[to_idx].enabled = true;
        true
    }

    /// Evaluate every enabled row of one layer into the accumulators.
    ///
    /// If two nominally exclusive rows are both enabled, both contribute;
    /// exclusivity is [`switch_destination`](Self::switch_destination)'s
    /// job, and the evaluator stays uniform.
    #[inline]
    pub fn evaluate(
        &self,
        layer: ModLayer,
        sources: &SourceView<'_>,
        controls: &ControlStore,
        accum: &mut DestAccumulators,
    ) {
        for row in &self.rows[..self.len] {
            if !row.enabled || row.layer != layer {
                continue;
            }
            let shaped = row.transform.apply(sources.get(row.source));
            let intensity = row.intensity.resolve(controls);
            let range = row.range.resolve(controls);
            accum.add(row.dest, intensity * (shaped * range - row.dest.neutral()));
        }
    }

    fn find(&self, source: ModSource, dest: ModDest) -> Option<usize> {
        self.rows[..self.len]
            .iter()
            .position(|row| row.source == source && row.dest == dest)
    }
}

impl ModMatrix<DEFAULT_ROW_CAPACITY> {
    /// The standard wiring, built at engine init.
    ///
    /// LFO1 carries both a pitch route (vibrato, enabled) and a gain route
    /// (tremolo, disabled): a mutually exclusive pair toggled with
    /// [`switch_destination`](Self::switch_destination).
    pub fn default_rows() -> Self {
        let mut matrix = Self::new();

        // Layer 0: note-on scaling and envelope gating
        matrix.add_row(ModRow {
            source: ModSource::Velocity,
            dest: ModDest::Eg1AttackScale,
            layer: ModLayer::NoteScaling,
            intensity: ScalarRef::Control(ControlTag::VelAttackIntensity),
            range: ScalarRef::Fixed(1.0),
            transform: ModTransform::MidiNormalize { invert: true },
            enabled: true,
        });
        matrix.add_row(ModRow {
            source: ModSource::NoteNumber,
            dest: ModDest::Eg1DecayScale,
            layer: ModLayer::NoteScaling,
            intensity: ScalarRef::Control(ControlTag::NoteDecayIntensity),
            range: ScalarRef::Fixed(1.0),
            transform: ModTransform::MidiNormalize { invert: true },
            enabled: true,
        });
        matrix.add_row(ModRow {
            source: ModSource::SustainPedal,
            dest: ModDest::Eg1SustainHold,
            layer: ModLayer::NoteScaling,
            intensity: ScalarRef::Fixed(1.0),
            range: ScalarRef::Fixed(1.0),
            transform: ModTransform::MidiSwitch,
            enabled: true,
        });

        // Layer 1: audio-rate routes
        matrix.add_row(ModRow {
            source: ModSource::Lfo1,
            dest: ModDest::AllOscPitch,
            layer: ModLayer::AudioRate,
            intensity: ScalarRef::Control(ControlTag::Lfo1PitchIntensity),
            range: ScalarRef::Fixed(0.5), // vibrato depth in semitones
            transform: ModTransform::Identity,
            enabled: true,
        });
        matrix.add_row(ModRow {
            source: ModSource::Lfo1,
            dest: ModDest::DcaGain,
            layer: ModLayer::AudioRate,
            intensity: ScalarRef::Control(ControlTag::Lfo1AmpIntensity),
            range: ScalarRef::Fixed(0.5),
            transform: ModTransform::Identity,
            enabled: false, // tremolo alternative to the vibrato route
        });
        matrix.add_row(ModRow {
            source: ModSource::Lfo2,
            dest: ModDest::FilterCutoff,
            layer: ModLayer::AudioRate,
            intensity: ScalarRef::Control(ControlTag::Lfo2CutoffIntensity),
            range: ScalarRef::Fixed(1000.0), // Hz
            transform: ModTransform::Identity,
            enabled: true,
        });
        matrix.add_row(ModRow {
            source: ModSource::Eg2,
            dest: ModDest::FilterCutoff,
            layer: ModLayer::AudioRate,
            intensity: ScalarRef::Control(ControlTag::Eg2CutoffIntensity),
            range: ScalarRef::Fixed(5000.0), // Hz
            transform: ModTransform::Identity,
            enabled: true,
        });
        matrix.add_row(ModRow {
            source: ModSource::NoteNumber,
            dest: ModDest::FilterKeytrack,
            layer: ModLayer::AudioRate,
            intensity: ScalarRef::Control(ControlTag::KeytrackIntensity),
            range: ScalarRef::Fixed(1.0),
            transform: ModTransform::NoteToFreqRatio,
            enabled: true,
        });
        matrix.add_row(ModRow {
            source: ModSource::PitchBend,
            dest: ModDest::AllOscPitch,
            layer: ModLayer::AudioRate,
            intensity: ScalarRef::Fixed(1.0),
            range: ScalarRef::Control(ControlTag::PitchBendRangeSemis),
            transform: ModTransform::Identity,
            enabled: true,
        });
        matrix.add_row(ModRow {
            source: ModSource::ModWheel,
            dest: ModDest::FilterCutoff,
            layer: ModLayer::AudioRate,
            intensity: ScalarRef::Control(ControlTag::ModWheelCutoffIntensity),
            range: ScalarRef::Fixed(4000.0), // Hz
            transform: ModTransform::MidiNormalize { invert: false },
            enabled: true,
        });
        matrix.add_row(ModRow {
            source: ModSource::VolumeCc,
            dest: ModDest::DcaAmpScale,
            layer: ModLayer::AudioRate,
            intensity: ScalarRef::Fixed(1.0),
            range: ScalarRef::Fixed(1.0),
            transform: ModTransform::InvertNormalize,
            enabled: true,
        });
        matrix.add_row(ModRow {
            source: ModSource::ExpressionCc,
            dest: ModDest::DcaAmpScale,
            layer: ModLayer::AudioRate,
            intensity: ScalarRef::Fixed(1.0),
            range: ScalarRef::Fixed(1.0),
            transform: ModTransform::InvertNormalize,
            enabled: true,
        });
        matrix.add_row(ModRow {
            source: ModSource::PanCc,
            dest: ModDest::DcaPan,
            layer: ModLayer::AudioRate,
            intensity: ScalarRef::Fixed(1.0),
            range: ScalarRef::Fixed(1.0),
            transform: ModTransform::MidiToPan,
            enabled: true,
        });

        matrix
    }
}
