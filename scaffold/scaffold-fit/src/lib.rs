//! Fitting organ models to scaffold marker data.
//!
//! This crate defines the interface between organ insertion and a fitting
//! tool, plus a built-in implementation based on marker alignment:
//!
//! - [`FittingService`] - Runs a [`FitPlan`] for a [`FitRequest`]
//! - [`MarkerAlignFitter`] - Aligns a model on label-matched markers
//! - [`compute_rigid_transform`] - Kabsch alignment with optional scale
//!
//! # Outputs
//!
//! The model is written once per [`FitStep::Fit`] step, the `n`-th to
//! `<stem>_fit<n>.<ext>` (see [`fit_output_path`]), where `<ext>` is the
//! model file's extension.
//!
//! # Example
//!
//! ```no_run
//! use scaffold_fit::{FitRequest, FittingService, MarkerAlignFitter};
//!
//! let request = FitRequest::new(
//!     "heart.exf",
//!     "out/whole_body_marker_coordinates.exnode",
//!     "out/heart_transformed",
//! );
//! let fitted = MarkerAlignFitter::new().fit(&request).unwrap();
//! assert!(fitted.ends_with("heart_transformed_fit1.exf"));
//! ```
//!
//! # Features
//!
//! - `serde` - Serialize fit plans

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod fitter;
mod kabsch;
mod landmark;
mod plan;
mod transform;

pub use error::{FitError, FitResult};
pub use fitter::MarkerAlignFitter;
pub use kabsch::{alignment_rms, compute_rigid_transform, MIN_MARKER_PAIRS};
pub use landmark::{match_markers, MarkerPair};
pub use plan::{fit_output_path, FitPlan, FitRequest, FitStep, FittingService};
pub use transform::RigidTransform;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, UnitQuaternion, Vector3};
