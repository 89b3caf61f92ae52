//! Fixed-size voice pool and allocator.
//!
//! `N` voices are built once and never deallocated; allocation is a scan,
//! not a free list. Stealing the oldest voice is policy, not failure: a
//! note-on is never dropped. Ages count allocation events, so "oldest"
//! means "longest since its own note-on", independent of block size.

use polivoz_core::ControlStore;

use crate::matrix::ModMatrix;
use crate::source::SharedSources;
use crate::voice::{Voice, VoiceState};

/// Pool of `N` voices with oldest-steal allocation.
#[derive(Debug, Clone)]
pub struct VoicePool<const N: usize> {
    voices: [Voice; N],
}

impl<const N: usize> VoicePool<N> {
    /// Build the pool; every voice starts idle.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            voices: core::array::from_fn(|_| Voice::new(sample_rate)),
        }
    }

    /// Allocate a voice for a note-on.
    ///
    /// Prefers an idle voice; when none exists, steals the non-idle voice
    /// with the maximum age and restarts it on the new note. Every other
    /// active voice's age is bumped, so relative seniority is maintained
    /// without a timestamp.
    pub fn note_on<const R: usize>(
        &mut self,
        note: u8,
        velocity: u8,
        channel: u8,
        matrix: &ModMatrix<R>,
        shared: &SharedSources,
        controls: &ControlStore,
    ) {
        let target = match self.find_idle() {
            Some(idle) => idle,
            None => {
                let oldest = self.find_oldest();
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    stolen_note = self.voices[oldest].note(),
                    new_note = note,
                    "voice pool full, stealing oldest voice"
                );
                oldest
            }
        };

        for (i, voice) in self.voices.iter_mut().enumerate() {
            if i != target && voice.is_active() {
                voice.increment_age();
            }
        }
        self.voices[target].note_on(note, velocity, channel, matrix, shared, controls);
    }

    /// Release the oldest sounding voice carrying (note, channel).
    ///
    /// Newer duplicates of the same note keep sounding. Silent no-op when
    /// nothing matches (a note-off for a stolen voice, for example).
    pub fn note_off(&mut self, note: u8, channel: u8) {
        let mut candidate: Option<usize> = None;
        for (i, voice) in self.voices.iter().enumerate() {
            if voice.state() == VoiceState::Sounding
                && voice.note() == note
                && voice.channel() == channel
                && candidate.is_none_or(|c| voice.age() > self.voices[c].age())
            {
                candidate = Some(i);
            }
        }
        if let Some(i) = candidate {
            self.voices[i].note_off();
        }
    }

    /// Release every sounding voice (MIDI all-notes-off).
    pub fn all_notes_off(&mut self) {
        for voice in &mut self.voices {
            voice.note_off();
        }
    }

    /// Hard-stop every voice without a release tail.
    pub fn reset(&mut self) {
        for voice in &mut self.voices {
            voice.force_off();
        }
    }

    /// Number of non-idle voices (sounding or releasing).
    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    /// Push block-rate control values into every voice.
    pub fn apply_controls(&mut self, controls: &ControlStore) {
        for voice in &mut self.voices {
            voice.apply_controls(controls);
        }
    }

    /// Update sample rate on every voice.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        for voice in &mut self.voices {
            voice.set_sample_rate(sample_rate);
        }
    }

    /// Tick every voice unconditionally and sum the stereo outputs.
    #[inline]
    pub fn tick_all<const R: usize>(
        &mut self,
        matrix: &ModMatrix<R>,
        shared: &SharedSources,
        controls: &ControlStore,
    ) -> (f32, f32) {
        let mut left = 0.0;
        let mut right = 0.0;
        for voice in &mut self.voices {
            let (l, r) = voice.tick(matrix, shared, controls);
            left += l;
            right += r;
        }
        (left, right)
    }

    /// Read access for tests and diagnostics.
    pub fn voices(&self) -> &[Voice; N] {
        &self.voices
    }

    fn find_idle(&self) -> Option<usize> {
        self.voices
            .iter()
            .position(|v| v.state() == VoiceState::Idle)
    }

    fn find_oldest(&self) -> usize {
        let mut oldest = 0;
        for (i, voice) in self.voices.iter().enumerate() {
            if voice.age() > self.voices[oldest].age() {
                oldest = i;
            }
        }
        oldest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polivoz_core::ControlStore;

    const SR: f32 = 48_000.0;

    fn rig() -> (ModMatrix<16>, SharedSources, ControlStore) {
        (
            ModMatrix::default_rows(),
            SharedSources::new(),
            ControlStore::new(),
        )
    }

    fn notes<const N: usize>(pool: &VoicePool<N>) -> [Option<u8>; N] {
        let mut out = [None; N];
        for (i, v) in pool.voices().iter().enumerate() {
            if v.is_active() {
                out[i] = Some(v.note());
            }
        }
        out
    }

    #[test]
    fn fills_idle_voices_first() {
        let (matrix, shared, controls) = rig();
        let mut pool: VoicePool<4> = VoicePool::new(SR);
        for note in [60, 62, 64] {
            pool.note_on(note, 100, 0, &matrix, &shared, &controls);
        }
        assert_eq!(pool.active_count(), 3);
    }

    #[test]
    fn steals_oldest_when_full() {
        // Pool of 2: C4, E4, then G4 must steal C4's voice
        let (matrix, shared, controls) = rig();
        let mut pool: VoicePool<2> = VoicePool::new(SR);
        pool.note_on(60, 100, 0, &matrix, &shared, &controls);
        pool.note_on(64, 100, 0, &matrix, &shared, &controls);
        pool.note_on(67, 100, 0, &matrix, &shared, &controls);

        assert_eq!(pool.active_count(), 2, "a note-on is never dropped");
        let held = notes(&pool);
        assert!(held.contains(&Some(64)), "E4 survives: {held:?}");
        assert!(held.contains(&Some(67)), "G4 plays: {held:?}");
        assert!(!held.contains(&Some(60)), "C4 was stolen: {held:?}");
    }

    #[test]
    fn steal_chain_follows_seniority() {
        let (matrix, shared, controls) = rig();
        let mut pool: VoicePool<2> = VoicePool::new(SR);
        for note in [60, 62, 64, 66] {
            pool.note_on(note, 100, 0, &matrix, &shared, &controls);
        }
        let held = notes(&pool);
        assert!(held.contains(&Some(64)));
        assert!(held.contains(&Some(66)));
    }

    #[test]
    fn note_off_releases_matching_voice() {
        let (matrix, shared, controls) = rig();
        let mut pool: VoicePool<4> = VoicePool::new(SR);
        pool.note_on(60, 100, 0, &matrix, &shared, &controls);
        pool.note_on(64, 100, 0, &matrix, &shared, &controls);

        pool.note_off(60, 0);
        let releasing: usize = pool
            .voices()
            .iter()
            .filter(|v| v.state() == VoiceState::Releasing)
            .count();
        assert_eq!(releasing, 1);
        let still_sounding = pool
            .voices()
            .iter()
            .find(|v| v.state() == VoiceState::Sounding)
            .map(Voice::note);
        assert_eq!(still_sounding, Some(64));
    }

    #[test]
    fn note_off_without_match_is_noop() {
        let (matrix, shared, controls) = rig();
        let mut pool: VoicePool<4> = VoicePool::new(SR);
        pool.note_on(60, 100, 0, &matrix, &shared, &controls);

        pool.note_off(61, 0); // wrong note
        pool.note_off(60, 5); // wrong channel
        assert_eq!(pool.active_count(), 1);
        assert_eq!(pool.voices()[0].state(), VoiceState::Sounding);
    }

    #[test]
    fn duplicate_notes_release_oldest_first() {
        let (matrix, shared, controls) = rig();
        let mut pool: VoicePool<4> = VoicePool::new(SR);
        pool.note_on(60, 100, 0, &matrix, &shared, &controls);
        pool.note_on(60, 100, 0, &matrix, &shared, &controls);

        pool.note_off(60, 0);
        let sounding: usize = pool
            .voices()
            .iter()
            .filter(|v| v.state() == VoiceState::Sounding)
            .count();
        assert_eq!(sounding, 1, "the newer duplicate keeps sounding");

        // Oldest went first: the surviving sounding voice is the newer one
        let survivor = pool
            .voices()
            .iter()
            .find(|v| v.state() == VoiceState::Sounding)
            .map(Voice::age);
        assert_eq!(survivor, Some(0));
    }

    #[test]
    fn all_notes_off_releases_everything() {
        let (matrix, shared, controls) = rig();
        let mut pool: VoicePool<4> = VoicePool::new(SR);
        for note in [60, 62, 64, 66] {
            pool.note_on(note, 100, 0, &matrix, &shared, &controls);
        }
        pool.all_notes_off();
        assert!(
            pool.voices()
                .iter()
                .all(|v| v.state() != VoiceState::Sounding)
        );
    }

    #[test]
    fn reset_goes_straight_to_idle() {
        let (matrix, shared, controls) = rig();
        let mut pool: VoicePool<4> = VoicePool::new(SR);
        pool.note_on(60, 100, 0, &matrix, &shared, &controls);
        pool.reset();
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn tick_all_sums_voices() {
        let (matrix, shared, controls) = rig();
        let mut pool: VoicePool<4> = VoicePool::new(SR);
        pool.note_on(60, 100, 0, &matrix, &shared, &controls);
        pool.note_on(64, 100, 0, &matrix, &shared, &controls);

        let mut energy = 0.0f32;
        for _ in 0..4800 {
            let (l, r) = pool.tick_all(&matrix, &shared, &controls);
            assert!(l.is_finite() && r.is_finite());
            energy += l * l + r * r;
        }
        assert!(energy > 0.0);
    }
}
