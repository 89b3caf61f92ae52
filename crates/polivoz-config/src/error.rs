//! Patch load/save errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from patch persistence.
#[derive(Debug, Error)]
pub enum PatchError {
    /// Reading the patch file failed.
    #[error("failed to read patch file {path}")]
    ReadFile {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Writing the patch file failed.
    #[error("failed to write patch file {path}")]
    WriteFile {
        /// The file that could not be written.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The patch file is not valid TOML or has the wrong shape.
    #[error("invalid patch file")]
    TomlParse(#[from] toml::de::Error),

    /// Serializing a patch to TOML failed.
    #[error("failed to serialize patch")]
    TomlSerialize(#[from] toml::ser::Error),

    /// The patch was written by a newer format revision.
    #[error("unsupported patch version {found} (newest supported is {supported})")]
    UnsupportedVersion {
        /// Version found in the file.
        found: u32,
        /// Newest version this build understands.
        supported: u32,
    },
}
