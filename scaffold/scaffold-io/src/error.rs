//! Error types for region I/O.

use std::path::PathBuf;

use scaffold_types::FieldError;
use thiserror::Error;

/// Result type for region I/O operations.
pub type RegionIoResult<T> = Result<T, RegionIoError>;

/// Errors that can occur while reading or writing regions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegionIoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Unknown file format (unrecognized extension).
    #[error("unknown region file format: .{extension}")]
    UnknownFormat {
        /// The unrecognized extension.
        extension: String,
    },

    /// The document could not be parsed or serialized.
    #[error("invalid region document {path}: {source}")]
    Document {
        /// Offending file, or `<memory>` for in-memory resources.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The document was written by an incompatible version.
    #[error("unsupported region document version {found} in {path} (expected {expected})")]
    UnsupportedVersion {
        /// Offending file.
        path: PathBuf,
        /// Version in the file.
        found: u32,
        /// Version this crate reads.
        expected: u32,
    },

    /// Opening a file for reading failed.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Source path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Writing a file failed.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A field or group lookup failed while preparing output.
    #[error(transparent)]
    Field(#[from] FieldError),
}

impl RegionIoError {
    pub(crate) fn document(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Document {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// The file this error concerns, if any.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::FileNotFound { path }
            | Self::Document { path, .. }
            | Self::UnsupportedVersion { path, .. }
            | Self::Read { path, .. }
            | Self::Write { path, .. } => Some(path),
            _ => None,
        }
    }
}
