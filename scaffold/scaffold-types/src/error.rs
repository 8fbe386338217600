//! Error types for region, mesh and field operations.

use thiserror::Error;

/// Result type for field operations.
pub type FieldResult<T> = Result<T, FieldError>;

/// Errors that can occur when building or evaluating a region's fields.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum FieldError {
    /// A field with this name already exists in the catalog.
    #[error("field '{name}' already exists")]
    DuplicateField {
        /// The duplicate field name.
        name: String,
    },

    /// The named field is not in the catalog.
    #[error("field '{name}' not found")]
    FieldNotFound {
        /// The missing field name.
        name: String,
    },

    /// The field has no value at the requested location.
    #[error("field '{name}' is not defined at {location}")]
    NotDefined {
        /// The field name.
        name: String,
        /// Description of the location.
        location: String,
    },

    /// The field is of a kind that cannot perform the requested operation.
    #[error("field '{name}' is a {kind} field, expected {expected}")]
    WrongKind {
        /// The field name.
        name: String,
        /// The actual field kind.
        kind: &'static str,
        /// The kind the operation needs.
        expected: &'static str,
    },

    /// A value had the wrong number of components.
    #[error("field '{name}' has {expected} components, got {got} values")]
    ComponentMismatch {
        /// The field name.
        name: String,
        /// Number of components the field has.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },

    /// The element does not exist in the mesh of the given dimension.
    #[error("element {element} not found in {dimension}-D mesh")]
    ElementNotFound {
        /// Mesh dimension.
        dimension: u8,
        /// Element identifier.
        element: u32,
    },

    /// An element with this identifier already exists.
    #[error("element {element} already exists in {dimension}-D mesh")]
    DuplicateElement {
        /// Mesh dimension.
        dimension: u8,
        /// Element identifier.
        element: u32,
    },

    /// The node does not exist in the region.
    #[error("node {node} not found")]
    NodeNotFound {
        /// Node identifier.
        node: u32,
    },

    /// Mesh dimensions are 1, 2 or 3.
    #[error("invalid mesh dimension {0}")]
    InvalidDimension(u8),

    /// The element's node list does not match its shape.
    #[error("element {element} has {got} nodes but its shape needs {expected}")]
    InvalidElement {
        /// Element identifier.
        element: u32,
        /// Node count required by the shape.
        expected: usize,
        /// Node count supplied.
        got: usize,
    },
}

impl FieldError {
    /// Create a `NotDefined` error for a field at a location.
    #[must_use]
    pub fn not_defined(name: impl Into<String>, location: impl ToString) -> Self {
        Self::NotDefined {
            name: name.into(),
            location: location.to_string(),
        }
    }
}
