//! Marker coordinate extraction.
//!
//! Each marker node of a scaffold stores a host element location. Evaluating
//! the scaffold's coordinate field there gives the marker's position. The
//! extractor collects these positions, with their labels, into a small
//! dataset region that fitting tools consume as target data.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use scaffold_io::{file_basename, read_region, write_region};
use scaffold_types::{EmbeddedField, Field, FieldError, GroupField, Location, Region};
use tracing::{debug, info, warn};

use crate::coordinates::resolve_coordinate_field;
use crate::error::MarkerResult;
use crate::locator::{locate_marker_fields, MarkerRoleTable};

/// Coordinate field of a marker dataset.
pub const MARKER_DATA_COORDINATES: &str = "marker_data_coordinates";

/// Label field of a marker dataset.
pub const MARKER_DATA_NAME: &str = "marker_data_name";

/// Node group of a marker dataset, also the dataset region's name.
pub const MARKER_GROUP_NAME: &str = "marker";

/// Parameters for marker extraction.
///
/// # Example
///
/// ```
/// use scaffold_markers::ExtractOptions;
///
/// let options = ExtractOptions::new()
///     .with_coordinate_field("coordinates")
///     .with_extension("exf");
/// assert_eq!(options.coordinate_field.as_deref(), Some("coordinates"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExtractOptions {
    /// Coordinate field to use instead of discovering one.
    pub coordinate_field: Option<String>,
    /// Marker field naming rules.
    pub roles: MarkerRoleTable,
    /// Extension of the written dataset file.
    pub extension: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            coordinate_field: None,
            roles: MarkerRoleTable::default(),
            extension: Self::DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl ExtractOptions {
    /// Default dataset file extension.
    pub const DEFAULT_EXTENSION: &'static str = "exnode";

    /// Create options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a named coordinate field when it exists.
    #[must_use]
    pub fn with_coordinate_field(mut self, name: impl Into<String>) -> Self {
        self.coordinate_field = Some(name.into());
        self
    }

    /// Use custom marker naming rules.
    #[must_use]
    pub fn with_roles(mut self, roles: MarkerRoleTable) -> Self {
        self.roles = roles;
        self
    }

    /// Set the dataset file extension.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}

/// Counts describing an extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExtractionReport {
    /// Marker group fields examined.
    pub groups_visited: usize,
    /// Marker group fields with no usable node group.
    pub groups_skipped: usize,
    /// Distinct marker nodes in the dataset.
    pub markers: usize,
    /// Markers whose coordinates were written.
    pub coordinates_written: usize,
    /// Markers whose coordinates could not be evaluated.
    pub coordinates_skipped: usize,
    /// Markers with coordinates but no non-empty label.
    pub labels_missing: usize,
}

impl ExtractionReport {
    /// True if a group or a coordinate had to be skipped.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.groups_skipped > 0 || self.coordinates_skipped > 0
    }
}

/// An extracted marker dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerDataset {
    /// Dataset region, named [`MARKER_GROUP_NAME`].
    pub region: Region,
    /// Run counts.
    pub report: ExtractionReport,
}

/// Result of [`export_marker_coordinates`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerExport {
    /// Written dataset file.
    pub path: PathBuf,
    /// Run counts.
    pub report: ExtractionReport,
}

/// Extract marker coordinates from a scaffold region.
///
/// The dataset has one node per marker, using the scaffold node's
/// identifier, a 3-component [`MARKER_DATA_COORDINATES`] field, a
/// [`MARKER_DATA_NAME`] label field and a [`MARKER_GROUP_NAME`] group of all
/// marker nodes. Values are copied without rounding.
///
/// A marker group with no node group is skipped. A marker whose position
/// cannot be evaluated stays in the group without coordinates. Labels are
/// copied only for markers with coordinates and only when non-empty. The
/// scaffold is not modified.
///
/// # Errors
///
/// Fails without producing a dataset if no coordinate field or no complete
/// set of marker fields is found, or if the location field does not store
/// mesh locations.
pub fn extract_markers(scaffold: &Region, options: &ExtractOptions) -> MarkerResult<MarkerDataset> {
    let coordinates = resolve_coordinate_field(scaffold, options.coordinate_field.as_deref())?;
    let fields = locate_marker_fields(scaffold.fields(), &options.roles)?;
    let location_field = lookup(scaffold, &fields.location)?;
    let name_field = lookup(scaffold, &fields.name)?;
    let embedded = EmbeddedField::new(coordinates, location_field)?;

    let mut dataset = Region::new(MARKER_GROUP_NAME);
    dataset.add_field(Field::coordinates(MARKER_DATA_COORDINATES))?;
    dataset.add_field(Field::stored_string(MARKER_DATA_NAME))?;
    if let Some(group) = dataset.find_or_create_group(MARKER_GROUP_NAME)?.as_group_mut() {
        group.create_node_group();
    }

    let mut report = ExtractionReport::default();
    let mut seen = BTreeSet::new();

    for group_name in &fields.groups {
        report.groups_visited += 1;
        let Some(nodes) = scaffold
            .field(group_name)
            .and_then(Field::as_group)
            .and_then(GroupField::node_group)
        else {
            report.groups_skipped += 1;
            debug!(group = %group_name, "Marker group has no node group, skipping");
            continue;
        };

        for &node in nodes {
            dataset.create_node(node);
            dataset.add_node_to_group(MARKER_GROUP_NAME, node)?;
            if !seen.insert(node) {
                continue;
            }
            report.markers += 1;

            let at = Location::Node(node);
            let written = embedded
                .evaluate(scaffold, &at)
                .and_then(|x| dataset.set_node_values(MARKER_DATA_COORDINATES, node, &x));
            if let Err(e) = written {
                report.coordinates_skipped += 1;
                debug!(node, error = %e, "Marker coordinates not evaluated");
                continue;
            }
            report.coordinates_written += 1;

            match scaffold.evaluate_string(name_field, &at) {
                Ok(label) if !label.is_empty() => {
                    dataset.assign_string(MARKER_DATA_NAME, node, label)?;
                }
                _ => report.labels_missing += 1,
            }
        }
    }

    if report.is_degraded() {
        warn!(
            region = scaffold.name(),
            markers = report.markers,
            groups_skipped = report.groups_skipped,
            coordinates_skipped = report.coordinates_skipped,
            labels_missing = report.labels_missing,
            "Marker extraction incomplete"
        );
    } else {
        info!(
            region = scaffold.name(),
            coordinates = coordinates.name(),
            markers = report.markers,
            groups = report.groups_visited,
            labels_missing = report.labels_missing,
            "Marker extraction complete"
        );
    }

    Ok(MarkerDataset {
        region: dataset,
        report,
    })
}

/// File name of the marker dataset written for a scaffold file.
///
/// # Example
///
/// ```
/// use scaffold_markers::marker_file_name;
///
/// assert_eq!(
///     marker_file_name("/in/whole_body.v3.exf", "exnode"),
///     "whole_body_marker_coordinates.exnode"
/// );
/// ```
#[must_use]
pub fn marker_file_name<P: AsRef<Path>>(scaffold_path: P, extension: &str) -> String {
    format!(
        "{}_marker_coordinates.{extension}",
        file_basename(scaffold_path)
    )
}

/// Load a scaffold file, extract its markers and write the dataset.
///
/// The dataset becomes the `marker` child region of the loaded scaffold and
/// that child is written to
/// `<output_dir>/<scaffold basename>_marker_coordinates.<extension>`. On any
/// error nothing is written.
///
/// # Errors
///
/// Fails if the scaffold cannot be read, extraction fails (see
/// [`extract_markers`]) or the dataset cannot be written.
pub fn export_marker_coordinates(
    scaffold_path: &Path,
    output_dir: &Path,
    options: &ExtractOptions,
) -> MarkerResult<MarkerExport> {
    let mut scaffold = read_region(scaffold_path)?;
    let dataset = extract_markers(&scaffold, options)?;
    let marker = scaffold.attach_child(dataset.region);

    let path = output_dir.join(marker_file_name(scaffold_path, &options.extension));
    write_region(marker, &path)?;
    info!(path = %path.display(), "Wrote marker coordinates");

    Ok(MarkerExport {
        path,
        report: dataset.report,
    })
}

fn lookup<'r>(region: &'r Region, name: &str) -> MarkerResult<&'r Field> {
    region.field(name).ok_or_else(|| {
        FieldError::FieldNotFound {
            name: name.to_string(),
        }
        .into()
    })
}
