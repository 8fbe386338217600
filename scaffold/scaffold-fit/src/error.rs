//! Error types for fitting.

use scaffold_io::RegionIoError;
use scaffold_markers::MarkerError;
use scaffold_types::FieldError;
use thiserror::Error;

/// Result type for fitting operations.
pub type FitResult<T> = Result<T, FitError>;

/// Errors that can occur while fitting a model to marker data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FitError {
    /// Not enough model markers share a label with the data markers.
    #[error("at least {required} matching markers required, got {provided}")]
    InsufficientMarkers {
        /// Number of markers required.
        required: usize,
        /// Number of matching markers found.
        provided: usize,
    },

    /// SVD computation failed during transform estimation.
    #[error("SVD computation failed during transform estimation")]
    SvdFailed,

    /// The plan never writes a model.
    #[error("fit plan has no fit step, nothing was written")]
    NoFitSteps,

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Marker discovery or extraction on the model failed.
    #[error(transparent)]
    Markers(#[from] MarkerError),

    /// Reading or writing a region file failed.
    #[error(transparent)]
    Io(#[from] RegionIoError),

    /// A field lookup or update failed.
    #[error(transparent)]
    Field(#[from] FieldError),
}
