//! Region, mesh and field types for anatomical scaffolds.
//!
//! This crate provides the foundational data model for scaffold processing:
//!
//! - [`Region`] - Named container of meshes, nodes and fields
//! - [`Mesh`] / [`Element`] - Elements of one dimension with a linear basis
//! - [`Field`] - Finite element, stored string, stored mesh location, group
//!   and constant fields
//! - [`FieldCatalog`] - Ordered, name-indexed fields of a region
//! - [`EmbeddedField`] - A field evaluated at a per-node host location
//!
//! # Layer 0 Crate
//!
//! This crate has no I/O and no global state. Every operation takes the
//! region it acts on explicitly, so any number of regions can be processed
//! side by side.
//!
//! # Node and Element Identifiers
//!
//! Nodes and elements are identified by positive `u32` identifiers that are
//! unique within a region (nodes) or a mesh (elements). Meshes exist for
//! dimensions 1, 2 and 3.
//!
//! # Example
//!
//! ```
//! use scaffold_types::{unit_cube_region, Location, MeshLocation};
//!
//! let cube = unit_cube_region("cube");
//! let coordinates = cube.field("coordinates").unwrap();
//!
//! let centre = Location::Element(MeshLocation::new(3, 1, [0.5, 0.5, 0.5]));
//! let x = cube.evaluate_real(coordinates, &centre).unwrap();
//! assert_eq!(x, vec![0.5, 0.5, 0.5]);
//! ```
//!
//! # Features
//!
//! - `serde` - Serialize and deserialize regions and their contents

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod catalog;
mod error;
mod evaluate;
mod field;
mod location;
mod mesh;
mod region;

pub use catalog::FieldCatalog;
pub use error::{FieldError, FieldResult};
pub use evaluate::EmbeddedField;
pub use field::{
    Field, FieldKind, FiniteElementField, GroupField, StoredMeshLocationField, StoredStringField,
    SubelementHandling,
};
pub use location::{Location, MeshLocation};
pub use mesh::{Element, ElementShape, Mesh};
pub use region::{unit_cube_region, Region};
