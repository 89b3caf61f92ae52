//! Note events and the fixed-capacity block event queue.

/// What happened on a note.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteEventKind {
    /// Key down with velocity 0..127.
    NoteOn {
        /// Strike velocity, raw MIDI.
        velocity: u8,
    },
    /// Key up.
    NoteOff,
    /// Per-key aftertouch. Observed but currently wired to no
    /// destination; an extension point for a future matrix source.
    PolyPressure {
        /// Pressure, raw MIDI.
        pressure: u8,
    },
}

/// A timestamped note event within one render block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoteEvent {
    /// Event payload.
    pub kind: NoteEventKind,
    /// MIDI note number.
    pub note: u8,
    /// MIDI channel, 0-based.
    pub channel: u8,
    /// Sample position within the current block.
    pub offset: usize,
}

/// Fixed-capacity event queue, filled between blocks and drained in
/// sub-block order during rendering. No allocation, no locking; the
/// engine's caller owns the thread hand-off.
#[derive(Debug, Clone)]
pub struct EventQueue<const CAP: usize> {
    events: [Option<NoteEvent>; CAP],
    len: usize,
}

impl<const CAP: usize> Default for EventQueue<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAP: usize> EventQueue<CAP> {
    /// An empty queue.
    pub fn new() -> Self {
        Self {
            events: [None; CAP],
            len: 0,
        }
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Queue an event. Returns false (event dropped) when full.
    pub fn push(&mut self, event: NoteEvent) -> bool {
        if self.len >= CAP {
            #[cfg(feature = "tracing")]
            tracing::debug!(note = event.note, "event queue full, dropping event");
            return false;
        }
        self.events[self.len] = Some(event);
        self.len += 1;
        true
    }

    /// Iterate events whose offset falls in `[start, end)`.
    pub fn in_range(&self, start: usize, end: usize) -> impl Iterator<Item = NoteEvent> + '_ {
        self.events[..self.len]
            .iter()
            .flatten()
            .copied()
            .filter(move |e| e.offset >= start && e.offset < end)
    }

    /// Discard all events (end of block).
    pub fn clear(&mut self) {
        self.events[..self.len].fill(None);
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on(note: u8, offset: usize) -> NoteEvent {
        NoteEvent {
            kind: NoteEventKind::NoteOn { velocity: 100 },
            note,
            channel: 0,
            offset,
        }
    }

    #[test]
    fn push_until_full() {
        let mut queue: EventQueue<2> = EventQueue::new();
        assert!(queue.push(on(60, 0)));
        assert!(queue.push(on(62, 1)));
        assert!(!queue.push(on(64, 2)), "overflow must report the drop");
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn range_filtering() {
        let mut queue: EventQueue<8> = EventQueue::new();
        queue.push(on(60, 0));
        queue.push(on(61, 31));
        queue.push(on(62, 32));
        queue.push(on(63, 100));

        let first: Vec<u8> = queue.in_range(0, 32).map(|e| e.note).collect();
        assert_eq!(first, vec![60, 61]);
        let second: Vec<u8> = queue.in_range(32, 64).map(|e| e.note).collect();
        assert_eq!(second, vec![62]);
    }

    #[test]
    fn clear_empties() {
        let mut queue: EventQueue<4> = EventQueue::new();
        queue.push(on(60, 0));
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.in_range(0, usize::MAX).count(), 0);
    }
}
