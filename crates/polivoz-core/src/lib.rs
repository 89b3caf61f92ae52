//! Polivoz Core - DSP leaf components and the control layer
//!
//! This crate provides the building blocks the polivoz voice engine wires
//! together: oscillators, envelopes, a filter, a stereo amplifier, parameter
//! smoothing, and the control system that converts normalized automation
//! values into natural units ("cooking").
//!
//! The components here are deliberately plain: each exposes `new(sample_rate)`,
//! setters in natural units, and an `#[inline]` per-sample advance/process
//! method. All modulation routing lives in `polivoz-engine`; a leaf component
//! only consumes the values handed to it.
//!
//! # Control Layer
//!
//! - [`ControlTag`] - dense identifier for every user-facing control
//! - [`ControlDescriptor`] - per-control metadata with linear/log cooking
//! - [`ControlStore`] - the engine-owned canonical natural-unit store
//!
//! ```rust
//! use polivoz_core::{ControlStore, ControlTag};
//!
//! let mut store = ControlStore::new();
//! store.set(ControlTag::FilterCutoff, 2000.0);
//! assert_eq!(store.get(ControlTag::FilterCutoff), 2000.0);
//!
//! // Cook a normalized automation value into natural units
//! let hz = ControlTag::FilterCutoff.descriptor().cook(0.5);
//! assert!(hz > 20.0 && hz < 20_000.0);
//! ```
//!
//! # DSP Leaves
//!
//! ```rust
//! use polivoz_core::{AdsrEnvelope, Oscillator, OscWaveform};
//!
//! let mut osc = Oscillator::new(48_000.0);
//! osc.set_frequency(440.0);
//! osc.set_waveform(OscWaveform::Saw);
//!
//! let mut env = AdsrEnvelope::new(48_000.0);
//! env.gate_on();
//!
//! let sample = osc.advance() * env.advance();
//! ```
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! polivoz-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod amplifier;
pub mod control;
pub mod envelope;
pub mod filter;
pub mod lfo;
pub mod math;
pub mod oscillator;
pub mod param;

pub use amplifier::Amplifier;
pub use control::{ControlDescriptor, ControlOrigin, ControlScale, ControlStore, ControlTag};
pub use envelope::{AdsrEnvelope, EnvelopeStage};
pub use filter::SvfFilter;
pub use lfo::{Lfo, LfoWaveform};
pub use math::{cents_to_ratio, db_to_linear, linear_to_db, midi_to_freq, semitones_to_ratio};
pub use oscillator::{OscWaveform, Oscillator};
pub use param::SmoothedParam;
