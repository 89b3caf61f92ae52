//! Polivoz Engine - polyphonic voice engine with a data-driven modulation
//! matrix
//!
//! The pieces, bottom up:
//!
//! - [`ModSource`] / [`SharedSources`] / [`VoiceSources`] - dense-tagged
//!   registries of modulation inputs (LFOs, envelopes, velocity, MIDI
//!   controllers), split into channel-wide and per-voice storage
//! - [`ModDest`] / [`DestAccumulators`] - per-voice accumulation slots,
//!   each read by exactly one DSP component, reset to its neutral value
//!   every sample
//! - [`ModTransform`] - the source-shaping catalog (MIDI normalization,
//!   note-to-frequency-ratio keytracking, pan mapping, switch gating)
//! - [`ModMatrix`] - the shared routing table; rows carry live
//!   [`ScalarRef`] intensities and ranges and evaluate in two declared
//!   layers per sample
//! - [`Voice`] / [`VoicePool`] - the oscillator→filter→DCA signal chain
//!   and its fixed-size, oldest-steal allocator
//! - [`Engine`] - the block driver: sub-block event dispatch,
//!   latest-wins control application, and the silence flag
//!
//! # Example
//!
//! ```rust
//! use polivoz_engine::{Engine, NoteEvent, NoteEventKind};
//!
//! let mut engine: Engine<16> = Engine::new(48_000.0);
//! engine.queue_note_event(NoteEvent {
//!     kind: NoteEventKind::NoteOn { velocity: 100 },
//!     note: 60,
//!     channel: 0,
//!     offset: 0,
//! });
//!
//! let mut left = [0.0f32; 512];
//! let mut right = [0.0f32; 512];
//! let silent = engine.render(&mut left, &mut right);
//! assert!(!silent);
//! ```
//!
//! # Real-time behavior
//!
//! Everything is sized at compile time (`Engine<N>` voices,
//! fixed-capacity matrix and event queue) and built in [`Engine::new`];
//! the render path performs no allocation, takes no locks, and returns no
//! `Result`. Unmatched note-offs, unknown CCs, and full queues are
//! handled no-ops.
//!
//! # Features
//!
//! - `std` (default) - standard library support
//! - `tracing` - debug logging of voice steals and dropped events

#![cfg_attr(not(feature = "std"), no_std)]

pub mod dest;
pub mod engine;
pub mod event;
pub mod matrix;
pub mod pool;
pub mod source;
pub mod transform;
pub mod voice;

pub use dest::{DestAccumulators, ModDest};
pub use engine::{EVENT_CAPACITY, Engine, SUB_BLOCK};
pub use event::{EventQueue, NoteEvent, NoteEventKind};
pub use matrix::{DEFAULT_ROW_CAPACITY, ModLayer, ModMatrix, ModRow, ScalarRef};
pub use pool::VoicePool;
pub use source::{ModSource, SharedSources, SourceView, VoiceSources};
pub use transform::ModTransform;
pub use voice::{Voice, VoiceState};
