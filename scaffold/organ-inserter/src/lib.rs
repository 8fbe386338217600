//! Insert organ models into a whole-body anatomical scaffold.
//!
//! This crate runs the organ insertion workflow:
//!
//! 1. Extract the scaffold's marker coordinates to
//!    `<scaffold>_marker_coordinates.exnode` in the output directory.
//! 2. For each organ file, in order:
//!    - pre-tagged organs (file name contains `colon` by default) are tagged
//!      in place;
//!    - other organs are fitted to the markers by a [`FittingService`] and the
//!      fitted model `<organ>_transformed_fit1.<ext>` is tagged.
//! 3. Optionally write an annotation manifest listing every model.
//!
//! Tagging adds a group named after the organ covering all of its 3-D
//! elements (see [`organ_name_from_path`] for the naming rule).
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with no UI dependencies.
//!
//! # Example
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//! use organ_inserter::{FailurePolicy, InsertParams, OrganInserter};
//!
//! let params = InsertParams::default().with_failure_policy(FailurePolicy::Continue);
//! let report = OrganInserter::new(params)
//!     .run(
//!         Path::new("whole_body.exf"),
//!         &[PathBuf::from("heart.exf"), PathBuf::from("colon.exf")],
//!         Path::new("out"),
//!     )
//!     .unwrap();
//!
//! for outcome in &report.organs {
//!     println!("{}: {:?}", outcome.organ, outcome.output());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod inserter;
mod manifest;
mod organ;
mod params;
mod tagger;

pub use error::{InsertError, InsertResult};
pub use inserter::{InsertReport, OrganInserter, OrganOutcome, OrganRoute, TRANSFORMED_SUFFIX};
pub use manifest::{AnnotationManifest, ManifestRow, MANIFEST_FILE_NAME, WHOLE_BODY};
pub use organ::{organ_name_from_path, OrganName};
pub use params::{FailurePolicy, InsertParams};
pub use tagger::{tag_organ_file, tag_region, TagOutcome};

// Re-export the collaborator interface.
pub use scaffold_fit::{FitPlan, FitRequest, FitStep, FittingService, MarkerAlignFitter};
pub use scaffold_markers::{ExtractOptions, ExtractionReport};
