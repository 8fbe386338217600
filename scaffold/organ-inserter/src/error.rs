//! Error types for organ insertion.

use std::path::PathBuf;

use scaffold_fit::FitError;
use scaffold_io::RegionIoError;
use scaffold_markers::MarkerError;
use scaffold_types::FieldError;
use thiserror::Error;

/// Result type for organ insertion.
pub type InsertResult<T> = Result<T, InsertError>;

/// Errors that can occur while inserting organs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InsertError {
    /// The organ file has no 3-D elements to tag.
    #[error("no 3-D elements in {path}")]
    NoVolumeElements {
        /// Organ file.
        path: PathBuf,
    },

    /// The encoded group did not contain the tagged elements.
    #[error("group '{group}' did not survive encoding for {path}; file left unchanged")]
    TagVerification {
        /// Organ file.
        path: PathBuf,
        /// Group name.
        group: String,
    },

    /// Writing the annotation manifest failed.
    #[error("failed to write manifest {path}: {source}")]
    Manifest {
        /// Manifest path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Processing one organ file failed.
    #[error("organ file {path}: {source}")]
    Organ {
        /// Organ file.
        path: PathBuf,
        /// What went wrong.
        #[source]
        source: Box<InsertError>,
    },

    /// Marker extraction from the scaffold failed.
    #[error(transparent)]
    Markers(#[from] MarkerError),

    /// The fitting service failed.
    #[error(transparent)]
    Fit(#[from] FitError),

    /// Reading or writing a region file failed.
    #[error(transparent)]
    Io(#[from] RegionIoError),

    /// A group could not be created or filled.
    #[error(transparent)]
    Field(#[from] FieldError),
}

impl InsertError {
    pub(crate) fn organ(path: impl Into<PathBuf>, source: Self) -> Self {
        Self::Organ {
            path: path.into(),
            source: Box::new(source),
        }
    }
}
