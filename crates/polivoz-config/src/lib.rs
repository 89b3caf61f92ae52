//! Polivoz Config - patch persistence
//!
//! Saves and restores the engine's control values as versioned TOML
//! patches. A patch is a format version plus a flat list of
//! `(stable string id, natural-unit value)` entries; unknown ids are
//! skipped on load and missing ids keep their current values, so patches
//! move between releases in both directions.
//!
//! ```rust
//! use polivoz_config::Patch;
//! use polivoz_core::{ControlStore, ControlTag};
//!
//! let mut store = ControlStore::new();
//! store.set(ControlTag::FilterCutoff, 2500.0);
//!
//! let toml = Patch::from_store(&store).to_toml().unwrap();
//! let mut restored = ControlStore::new();
//! Patch::from_toml(&toml).unwrap().apply_to(&mut restored);
//! assert_eq!(restored.get(ControlTag::FilterCutoff), 2500.0);
//! ```

pub mod error;
pub mod patch;

pub use error::PatchError;
pub use patch::{PATCH_VERSION, Patch, PatchEntry};
