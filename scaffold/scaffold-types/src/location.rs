//! Evaluation locations.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point inside an element: mesh dimension, element identifier and
/// element-local xi coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeshLocation {
    /// Dimension of the host mesh.
    pub dimension: u8,
    /// Host element identifier.
    pub element: u32,
    /// Element-local coordinates; components past `dimension` are ignored.
    pub xi: [f64; 3],
}

impl MeshLocation {
    /// Create a mesh location.
    #[must_use]
    pub const fn new(dimension: u8, element: u32, xi: [f64; 3]) -> Self {
        Self {
            dimension,
            element,
            xi,
        }
    }
}

/// Where a field is evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Location {
    /// At a node, by identifier.
    Node(u32),
    /// Inside an element.
    Element(MeshLocation),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(id) => write!(f, "node {id}"),
            Self::Element(loc) => write!(
                f,
                "{}-D element {} xi ({}, {}, {})",
                loc.dimension, loc.element, loc.xi[0], loc.xi[1], loc.xi[2]
            ),
        }
    }
}

impl From<MeshLocation> for Location {
    fn from(location: MeshLocation) -> Self {
        Self::Element(location)
    }
}
