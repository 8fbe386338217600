//! Coordinate field discovery and marker coordinate extraction.
//!
//! Anatomical scaffolds carry landmark ("marker") nodes embedded in their
//! elements. This crate finds the fields describing them and turns them into
//! a standalone coordinate dataset:
//!
//! - [`resolve_coordinate_field`] - Pick the 3-D coordinate field of a region
//! - [`MarkerRoleTable`] / [`locate_marker_fields`] - Find marker fields by
//!   naming convention
//! - [`extract_markers`] / [`export_marker_coordinates`] - Evaluate marker
//!   positions into a dataset region and write it
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use scaffold_markers::{export_marker_coordinates, ExtractOptions};
//!
//! let export = export_marker_coordinates(
//!     Path::new("whole_body.exf"),
//!     Path::new("out"),
//!     &ExtractOptions::default(),
//! )
//! .unwrap();
//! println!("{} markers -> {}", export.report.markers, export.path.display());
//! ```
//!
//! # Features
//!
//! - `serde` - Serialize options and role tables

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod coordinates;
mod error;
mod extract;
mod locator;

pub use coordinates::resolve_coordinate_field;
pub use error::{MarkerError, MarkerResult};
pub use extract::{
    export_marker_coordinates, extract_markers, marker_file_name, ExtractOptions,
    ExtractionReport, MarkerDataset, MarkerExport, MARKER_DATA_COORDINATES, MARKER_DATA_NAME,
    MARKER_GROUP_NAME,
};
pub use locator::{locate_marker_fields, MarkerFields, MarkerRole, MarkerRoleTable, RolePattern};
