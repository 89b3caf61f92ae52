//! The versioned patch format.
//!
//! A patch is a leading format version plus a flat, ordered list of
//! `(string id, natural-unit value)` entries. String ids are the controls'
//! stable identifiers, so patches survive enum reordering; unknown ids are
//! skipped on apply and ids absent from the patch keep their current
//! values, which together give forward and backward compatibility within
//! a major version.

use std::fs;
use std::path::Path;

use polivoz_core::{ControlStore, ControlTag};
use serde::{Deserialize, Serialize};

use crate::error::PatchError;

/// Newest patch format version this build reads and writes.
pub const PATCH_VERSION: u32 = 1;

/// One saved control value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchEntry {
    /// The control's stable string id.
    pub id: String,
    /// Natural-unit value.
    pub value: f32,
}

/// A complete saved patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    /// Format version; files from newer revisions are rejected.
    pub version: u32,
    /// Saved control values, in store order.
    #[serde(default)]
    pub controls: Vec<PatchEntry>,
}

impl Patch {
    /// Snapshot every control from a store.
    pub fn from_store(store: &ControlStore) -> Self {
        Self {
            version: PATCH_VERSION,
            controls: store
                .snapshot()
                .map(|(tag, value)| PatchEntry {
                    id: tag.descriptor().string_id.to_string(),
                    value,
                })
                .collect(),
        }
    }

    /// Apply the patch to a store. Returns the number of entries applied;
    /// unknown ids are skipped.
    pub fn apply_to(&self, store: &mut ControlStore) -> usize {
        self.apply_with(|tag, value| store.set(tag, value))
    }

    /// Apply the patch through an arbitrary sink, e.g. an engine's queued
    /// control path so patch loads and live parameter changes take the
    /// same route. Returns the number of entries applied.
    pub fn apply_with(&self, mut sink: impl FnMut(ControlTag, f32)) -> usize {
        let mut applied = 0;
        for entry in &self.controls {
            if let Some(tag) = ControlTag::from_string_id(&entry.id) {
                sink(tag, entry.value);
                applied += 1;
            }
        }
        applied
    }

    /// Parse a patch from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, PatchError> {
        let patch: Patch = toml::from_str(text)?;
        if patch.version > PATCH_VERSION {
            return Err(PatchError::UnsupportedVersion {
                found: patch.version,
                supported: PATCH_VERSION,
            });
        }
        Ok(patch)
    }

    /// Serialize to TOML text.
    pub fn to_toml(&self) -> Result<String, PatchError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load a patch from a file.
    pub fn load(path: &Path) -> Result<Self, PatchError> {
        let text = fs::read_to_string(path).map_err(|source| PatchError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Save the patch to a file.
    pub fn save(&self, path: &Path) -> Result<(), PatchError> {
        let text = self.to_toml()?;
        fs::write(path, text).map_err(|source| PatchError::WriteFile {
            path: path.to_path_buf(),
            source,
        })
    }
}
