//! Marker field discovery by naming convention.
//!
//! Scaffolds annotate landmark nodes with three kinds of field, recognized by
//! name alone:
//!
//! | Role       | Example                  | Kind                 |
//! |------------|--------------------------|----------------------|
//! | `Location` | `marker_location`        | stored mesh location |
//! | `Name`     | `marker_name`            | stored string        |
//! | `Group`    | `marker_bodyA`           | group                |
//!
//! The rules live in a [`MarkerRoleTable`] so they can be tested and changed
//! without a region.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use scaffold_types::FieldCatalog;
use tracing::debug;

use crate::error::{MarkerError, MarkerResult};

/// What a marker field is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MarkerRole {
    /// Host mesh location of each marker node.
    Location,
    /// Label of each marker node.
    Name,
    /// Set of marker nodes.
    Group,
}

impl MarkerRole {
    /// Lowercase role name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Name => "name",
            Self::Group => "group",
        }
    }
}

impl fmt::Display for MarkerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classification rule.
///
/// A name matches if it contains every `contains` substring and none of the
/// `excludes` substrings. Matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RolePattern {
    /// Role assigned on match.
    pub role: MarkerRole,
    /// Required substrings.
    #[cfg_attr(feature = "serde", serde(default))]
    pub contains: Vec<String>,
    /// Forbidden substrings.
    #[cfg_attr(feature = "serde", serde(default))]
    pub excludes: Vec<String>,
}

impl RolePattern {
    /// Create a pattern with no substrings.
    #[must_use]
    pub const fn new(role: MarkerRole) -> Self {
        Self {
            role,
            contains: Vec::new(),
            excludes: Vec::new(),
        }
    }

    /// Require a substring.
    #[must_use]
    pub fn containing(mut self, token: impl Into<String>) -> Self {
        self.contains.push(token.into());
        self
    }

    /// Forbid a substring.
    #[must_use]
    pub fn excluding(mut self, token: impl Into<String>) -> Self {
        self.excludes.push(token.into());
        self
    }

    fn matches(&self, lowercase_name: &str) -> bool {
        self.contains
            .iter()
            .all(|t| lowercase_name.contains(&t.to_lowercase()))
            && !self
                .excludes
                .iter()
                .any(|t| lowercase_name.contains(&t.to_lowercase()))
    }
}

/// Naming rules for marker fields.
///
/// A field is a candidate if its name contains `marker_token` and
/// `separator`. Candidates take the role of the first pattern they match;
/// candidates matching no pattern are ignored.
///
/// # Example
///
/// ```
/// use scaffold_markers::{MarkerRole, MarkerRoleTable};
///
/// let table = MarkerRoleTable::default();
/// assert_eq!(table.classify("marker_location"), Some(MarkerRole::Location));
/// assert_eq!(table.classify("Marker_Name"), Some(MarkerRole::Name));
/// assert_eq!(table.classify("marker_bodyA"), Some(MarkerRole::Group));
/// assert_eq!(table.classify("marker.x"), None);
/// assert_eq!(table.classify("coordinates"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MarkerRoleTable {
    /// Substring every marker field name contains.
    pub marker_token: String,
    /// Separator every marker field name contains.
    pub separator: char,
    /// Rules in priority order.
    pub patterns: Vec<RolePattern>,
}

impl MarkerRoleTable {
    /// Default marker token.
    pub const DEFAULT_MARKER_TOKEN: &'static str = "marker";

    /// Default separator.
    pub const DEFAULT_SEPARATOR: char = '_';

    /// Classify a field name.
    #[must_use]
    pub fn classify(&self, name: &str) -> Option<MarkerRole> {
        let lower = name.to_lowercase();
        if !lower.contains(&self.marker_token.to_lowercase()) || !lower.contains(self.separator) {
            return None;
        }
        self.patterns
            .iter()
            .find(|p| p.matches(&lower))
            .map(|p| p.role)
    }
}

impl Default for MarkerRoleTable {
    fn default() -> Self {
        Self {
            marker_token: Self::DEFAULT_MARKER_TOKEN.to_string(),
            separator: Self::DEFAULT_SEPARATOR,
            patterns: vec![
                RolePattern::new(MarkerRole::Name).containing("name"),
                RolePattern::new(MarkerRole::Location).containing("location"),
                RolePattern::new(MarkerRole::Group).excluding("."),
            ],
        }
    }
}

/// Names of the discovered marker fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerFields {
    /// Stored mesh location field.
    pub location: String,
    /// Stored string label field.
    pub name: String,
    /// Group fields, in catalog order.
    pub groups: Vec<String>,
}

/// Find the marker location, name and group fields of a catalog.
///
/// # Errors
///
/// Returns [`MarkerError::MarkerFieldsNotFound`] if there is no location
/// field, no name field or no group field, and
/// [`MarkerError::AmbiguousRole`] if two fields claim the location or name
/// role.
pub fn locate_marker_fields(
    catalog: &FieldCatalog,
    table: &MarkerRoleTable,
) -> MarkerResult<MarkerFields> {
    let mut location: Option<String> = None;
    let mut name: Option<String> = None;
    let mut groups = Vec::new();

    for field_name in catalog.names() {
        let Some(role) = table.classify(field_name) else {
            continue;
        };
        let slot = match role {
            MarkerRole::Group => {
                groups.push(field_name.to_string());
                continue;
            }
            MarkerRole::Location => &mut location,
            MarkerRole::Name => &mut name,
        };
        if let Some(first) = slot {
            return Err(MarkerError::AmbiguousRole {
                role,
                first: first.clone(),
                second: field_name.to_string(),
            });
        }
        *slot = Some(field_name.to_string());
    }

    let mut missing = Vec::new();
    if location.is_none() {
        missing.push(MarkerRole::Location.as_str());
    }
    if name.is_none() {
        missing.push(MarkerRole::Name.as_str());
    }
    if groups.is_empty() {
        missing.push(MarkerRole::Group.as_str());
    }

    match (location, name) {
        (Some(location), Some(name)) if missing.is_empty() => {
            debug!(%location, %name, groups = groups.len(), "Located marker fields");
            Ok(MarkerFields {
                location,
                name,
                groups,
            })
        }
        _ => Err(MarkerError::MarkerFieldsNotFound { missing }),
    }
}
