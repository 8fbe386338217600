//! Error types for marker discovery and extraction.

use scaffold_io::RegionIoError;
use scaffold_types::FieldError;
use thiserror::Error;

use crate::MarkerRole;

/// Result type for marker operations.
pub type MarkerResult<T> = Result<T, MarkerError>;

/// Errors that can occur while discovering or extracting markers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MarkerError {
    /// No field qualifies as the 3-D coordinate field.
    #[error("no coordinate field found in region '{region}'")]
    NoCoordinateField {
        /// Region name.
        region: String,
    },

    /// The region has no elements in any dimension.
    #[error("region '{region}' has no elements to sample coordinates on")]
    EmptyMesh {
        /// Region name.
        region: String,
    },

    /// One or more marker roles have no candidate field.
    #[error("marker fields not found: missing {}", missing.join(", "))]
    MarkerFieldsNotFound {
        /// Roles with no candidate, e.g. `["location", "name"]`.
        missing: Vec<&'static str>,
    },

    /// Two fields claim a role that must be unique.
    #[error("ambiguous marker {role} field: '{first}' and '{second}'")]
    AmbiguousRole {
        /// The contested role.
        role: MarkerRole,
        /// First candidate in catalog order.
        first: String,
        /// Second candidate in catalog order.
        second: String,
    },

    /// Field construction or evaluation failed.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Reading the scaffold or writing the dataset failed.
    #[error(transparent)]
    Io(#[from] RegionIoError),
}

impl MarkerError {
    /// True for errors raised while discovering coordinate or marker fields.
    #[must_use]
    pub const fn is_discovery_failure(&self) -> bool {
        matches!(
            self,
            Self::NoCoordinateField { .. }
                | Self::EmptyMesh { .. }
                | Self::MarkerFieldsNotFound { .. }
                | Self::AmbiguousRole { .. }
        )
    }
}
