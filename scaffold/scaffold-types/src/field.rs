//! Field definitions.
//!
//! A [`Field`] is a named function over a region's nodes or element
//! locations. The kinds relevant to scaffold processing are:
//!
//! - **finite element** - real, N components, interpolated from node values
//! - **stored mesh location** - per-node reference to a point in an element
//! - **stored string** - per-node label
//! - **group** - node and element subsets
//! - **constant** - the same value everywhere
//!
//! Coordinate fields are finite-element fields flagged as
//! [`Field::is_type_coordinate`].

use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{FieldError, FieldResult, MeshLocation};

/// A named field.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Field {
    name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    type_coordinate: bool,
    kind: FieldKind,
}

/// Field payload by kind.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FieldKind {
    /// Node-interpolated real field.
    FiniteElement(FiniteElementField),
    /// Per-node embedding location.
    StoredMeshLocation(StoredMeshLocationField),
    /// Per-node string.
    StoredString(StoredStringField),
    /// Node and element membership.
    Group(GroupField),
    /// Constant real values.
    Constant(Vec<f64>),
}

impl FieldKind {
    /// Short name of the kind, used in error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FiniteElement(_) => "finite element",
            Self::StoredMeshLocation(_) => "stored mesh location",
            Self::StoredString(_) => "stored string",
            Self::Group(_) => "group",
            Self::Constant(_) => "constant",
        }
    }
}

impl Field {
    /// Create a field from a name and kind.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            type_coordinate: false,
            kind,
        }
    }

    /// Create a finite-element field with `components` components.
    #[must_use]
    pub fn finite_element(name: impl Into<String>, components: usize) -> Self {
        Self::new(
            name,
            FieldKind::FiniteElement(FiniteElementField::new(components)),
        )
    }

    /// Create a 3-component finite-element field flagged as coordinates.
    ///
    /// # Example
    ///
    /// ```
    /// use scaffold_types::Field;
    ///
    /// let field = Field::coordinates("coordinates");
    /// assert!(field.is_type_coordinate());
    /// assert_eq!(field.number_of_components(), 3);
    /// ```
    #[must_use]
    pub fn coordinates(name: impl Into<String>) -> Self {
        Self::finite_element(name, 3).with_type_coordinate(true)
    }

    /// Create an empty stored mesh location field.
    #[must_use]
    pub fn stored_mesh_location(name: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::StoredMeshLocation(StoredMeshLocationField::default()),
        )
    }

    /// Create an empty stored string field.
    #[must_use]
    pub fn stored_string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::StoredString(StoredStringField::default()))
    }

    /// Create an empty group.
    #[must_use]
    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Group(GroupField::default()))
    }

    /// Create a constant field.
    #[must_use]
    pub fn constant(name: impl Into<String>, values: impl Into<Vec<f64>>) -> Self {
        Self::new(name, FieldKind::Constant(values.into()))
    }

    /// Set the coordinate-type flag.
    #[must_use]
    pub fn with_type_coordinate(mut self, type_coordinate: bool) -> Self {
        self.type_coordinate = type_coordinate;
        self
    }

    /// Field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field payload.
    #[must_use]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// True if the field is flagged as a coordinate field.
    #[must_use]
    pub const fn is_type_coordinate(&self) -> bool {
        self.type_coordinate
    }

    /// Number of components the field evaluates to.
    ///
    /// Non-real fields report 1.
    #[must_use]
    pub fn number_of_components(&self) -> usize {
        match &self.kind {
            FieldKind::FiniteElement(fe) => fe.components,
            FieldKind::Constant(values) => values.len(),
            _ => 1,
        }
    }

    /// View as a finite-element field.
    #[must_use]
    pub const fn as_finite_element(&self) -> Option<&FiniteElementField> {
        match &self.kind {
            FieldKind::FiniteElement(fe) => Some(fe),
            _ => None,
        }
    }

    /// Mutable view as a finite-element field.
    pub fn as_finite_element_mut(&mut self) -> Option<&mut FiniteElementField> {
        match &mut self.kind {
            FieldKind::FiniteElement(fe) => Some(fe),
            _ => None,
        }
    }

    /// View as a stored mesh location field.
    #[must_use]
    pub const fn as_stored_mesh_location(&self) -> Option<&StoredMeshLocationField> {
        match &self.kind {
            FieldKind::StoredMeshLocation(f) => Some(f),
            _ => None,
        }
    }

    /// View as a stored string field.
    #[must_use]
    pub const fn as_stored_string(&self) -> Option<&StoredStringField> {
        match &self.kind {
            FieldKind::StoredString(f) => Some(f),
            _ => None,
        }
    }

    /// View as a group.
    #[must_use]
    pub const fn as_group(&self) -> Option<&GroupField> {
        match &self.kind {
            FieldKind::Group(g) => Some(g),
            _ => None,
        }
    }

    /// Mutable view as a group.
    pub fn as_group_mut(&mut self) -> Option<&mut GroupField> {
        match &mut self.kind {
            FieldKind::Group(g) => Some(g),
            _ => None,
        }
    }

    pub(crate) fn kind_mut(&mut self) -> &mut FieldKind {
        &mut self.kind
    }

    pub(crate) fn wrong_kind(&self, expected: &'static str) -> FieldError {
        FieldError::WrongKind {
            name: self.name.clone(),
            kind: self.kind.name(),
            expected,
        }
    }

    /// Drop all per-node data for nodes not satisfying `keep`.
    pub fn retain_nodes(&mut self, keep: impl Fn(u32) -> bool) {
        match &mut self.kind {
            FieldKind::FiniteElement(fe) => fe.values.retain(|id, _| keep(*id)),
            FieldKind::StoredMeshLocation(f) => f.locations.retain(|id, _| keep(*id)),
            FieldKind::StoredString(f) => f.values.retain(|id, _| keep(*id)),
            FieldKind::Group(g) => {
                if let Some(nodes) = g.nodes.as_mut() {
                    nodes.retain(|id| keep(*id));
                }
            }
            FieldKind::Constant(_) => {}
        }
    }
}

/// Node parameters of a finite-element field.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FiniteElementField {
    components: usize,
    values: BTreeMap<u32, Vec<f64>>,
}

impl FiniteElementField {
    /// Create a field with no node parameters.
    #[must_use]
    pub const fn new(components: usize) -> Self {
        Self {
            components,
            values: BTreeMap::new(),
        }
    }

    /// Number of components.
    #[must_use]
    pub const fn components(&self) -> usize {
        self.components
    }

    /// Parameters at a node, if defined there.
    #[must_use]
    pub fn node_values(&self, node: u32) -> Option<&[f64]> {
        self.values.get(&node).map(Vec::as_slice)
    }

    /// True if the field has parameters at the node.
    #[must_use]
    pub fn is_defined_at_node(&self, node: u32) -> bool {
        self.values.contains_key(&node)
    }

    /// Iterate mutable node parameters in node order.
    pub fn node_values_mut(&mut self) -> impl Iterator<Item = (u32, &mut [f64])> {
        self.values.iter_mut().map(|(id, v)| (*id, v.as_mut_slice()))
    }

    pub(crate) fn set(&mut self, name: &str, node: u32, values: &[f64]) -> FieldResult<()> {
        if values.len() != self.components {
            return Err(FieldError::ComponentMismatch {
                name: name.to_string(),
                expected: self.components,
                got: values.len(),
            });
        }
        self.values.insert(node, values.to_vec());
        Ok(())
    }
}

/// Per-node embedding locations.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StoredMeshLocationField {
    locations: BTreeMap<u32, MeshLocation>,
}

impl StoredMeshLocationField {
    /// Location stored at a node.
    #[must_use]
    pub fn location(&self, node: u32) -> Option<&MeshLocation> {
        self.locations.get(&node)
    }

    pub(crate) fn set(&mut self, node: u32, location: MeshLocation) {
        self.locations.insert(node, location);
    }
}

/// Per-node strings.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StoredStringField {
    values: BTreeMap<u32, String>,
}

impl StoredStringField {
    /// String stored at a node.
    #[must_use]
    pub fn value(&self, node: u32) -> Option<&str> {
        self.values.get(&node).map(String::as_str)
    }

    pub(crate) fn set(&mut self, node: u32, value: impl Into<String>) {
        self.values.insert(node, value.into());
    }
}

/// How adding an element to a group treats its boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SubelementHandling {
    /// Only the element itself joins the group.
    #[default]
    None,
    /// Faces, edges and nodes of the element join too.
    Full,
}

/// Membership sets of a group field.
///
/// A group may own a node group and one element group per mesh dimension;
/// any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupField {
    #[cfg_attr(feature = "serde", serde(default))]
    subelement_handling: SubelementHandling,
    #[cfg_attr(feature = "serde", serde(default))]
    nodes: Option<BTreeSet<u32>>,
    #[cfg_attr(feature = "serde", serde(default))]
    elements: [Option<BTreeSet<u32>>; 3],
}

impl GroupField {
    /// Subelement handling mode.
    #[must_use]
    pub const fn subelement_handling(&self) -> SubelementHandling {
        self.subelement_handling
    }

    /// Set the subelement handling mode.
    pub fn set_subelement_handling(&mut self, mode: SubelementHandling) {
        self.subelement_handling = mode;
    }

    /// The node group, if one has been created.
    #[must_use]
    pub const fn node_group(&self) -> Option<&BTreeSet<u32>> {
        self.nodes.as_ref()
    }

    /// Get or create the node group.
    pub fn create_node_group(&mut self) -> &mut BTreeSet<u32> {
        self.nodes.get_or_insert_with(BTreeSet::new)
    }

    /// The element group for a mesh dimension, if one has been created.
    #[must_use]
    pub fn mesh_group(&self, dimension: u8) -> Option<&BTreeSet<u32>> {
        dimension_index(dimension).and_then(|i| self.elements[i].as_ref())
    }

    /// Get or create the element group for a mesh dimension.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidDimension`] for dimensions outside 1-3.
    pub fn create_mesh_group(&mut self, dimension: u8) -> FieldResult<&mut BTreeSet<u32>> {
        let i = dimension_index(dimension).ok_or(FieldError::InvalidDimension(dimension))?;
        Ok(self.elements[i].get_or_insert_with(BTreeSet::new))
    }

    /// True if the group has no nodes and no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.as_ref().is_none_or(BTreeSet::is_empty)
            && self
                .elements
                .iter()
                .all(|e| e.as_ref().is_none_or(BTreeSet::is_empty))
    }

    pub(crate) fn retain_elements(&mut self, dimension: u8, keep: impl Fn(u32) -> bool) {
        if let Some(set) = dimension_index(dimension).and_then(|i| self.elements[i].as_mut()) {
            set.retain(|id| keep(*id));
        }
    }
}

pub(crate) fn dimension_index(dimension: u8) -> Option<usize> {
    (1..=3)
        .contains(&dimension)
        .then(|| usize::from(dimension - 1))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn components_by_kind() {
        assert_eq!(Field::coordinates("c").number_of_components(), 3);
        assert_eq!(Field::constant("k", [1.0, 2.0]).number_of_components(), 2);
        assert_eq!(Field::stored_string("s").number_of_components(), 1);
    }

    #[test]
    fn finite_element_rejects_wrong_length() {
        let mut fe = FiniteElementField::new(3);
        assert!(matches!(
            fe.set("c", 1, &[1.0, 2.0]),
            Err(FieldError::ComponentMismatch { expected: 3, got: 2, .. })
        ));
        fe.set("c", 1, &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(fe.node_values(1), Some(&[1.0, 2.0, 3.0][..]));
    }

    #[test]
    fn group_mesh_groups_by_dimension() {
        let mut group = GroupField::default();
        assert!(group.is_empty());
        group.create_mesh_group(3).unwrap().insert(5);
        assert!(group.mesh_group(3).unwrap().contains(&5));
        assert!(group.mesh_group(2).is_none());
        assert!(group.create_mesh_group(4).is_err());
        assert!(!group.is_empty());
    }

    #[test]
    fn retain_nodes_filters_payload() {
        let mut field = Field::stored_string("label");
        if let FieldKind::StoredString(s) = field.kind_mut() {
            s.set(1, "a");
            s.set(2, "b");
        }
        field.retain_nodes(|id| id == 2);
        let s = field.as_stored_string().unwrap();
        assert_eq!(s.value(1), None);
        assert_eq!(s.value(2), Some("b"));
    }
}
