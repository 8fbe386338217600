//! Regions: meshes, nodes and fields under one name.
//!
//! A [`Region`] is the unit of loading, processing and writing. It owns one
//! mesh per dimension, the node set, the field catalog and any child
//! regions. Every operation on scaffold data takes an explicit region; there
//! is no shared context between regions.

use std::collections::BTreeSet;

use hashbrown::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::field::dimension_index;
use crate::{
    Element, ElementShape, Field, FieldCatalog, FieldError, FieldKind, FieldResult,
    FiniteElementField, Location, Mesh, MeshLocation, SubelementHandling,
};

/// A named container of meshes, nodes and fields.
///
/// # Example
///
/// ```
/// use scaffold_types::{Field, Region};
///
/// let mut region = Region::new("body");
/// region.create_node(1);
/// region.add_field(Field::coordinates("coordinates")).unwrap();
/// region.set_node_values("coordinates", 1, &[0.0, 1.0, 2.0]).unwrap();
///
/// assert!(region.field("coordinates").is_some());
/// assert!(region.highest_dimension_mesh().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Region {
    name: String,
    meshes: [Mesh; 3],
    nodes: BTreeSet<u32>,
    fields: FieldCatalog,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    children: Vec<Region>,
}

impl Default for Region {
    fn default() -> Self {
        Self::new("")
    }
}

impl Region {
    /// Create an empty region.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            meshes: [Mesh::empty(1), Mesh::empty(2), Mesh::empty(3)],
            nodes: BTreeSet::new(),
            fields: FieldCatalog::new(),
            children: Vec::new(),
        }
    }

    /// Region name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the region.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // ------------------------------------------------------------------
    // Meshes
    // ------------------------------------------------------------------

    /// The mesh of a dimension (1-3).
    #[must_use]
    pub fn mesh(&self, dimension: u8) -> Option<&Mesh> {
        dimension_index(dimension).map(|i| &self.meshes[i])
    }

    /// The mesh of a dimension, for adding elements.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidDimension`] outside 1-3.
    pub fn mesh_mut(&mut self, dimension: u8) -> FieldResult<&mut Mesh> {
        let i = dimension_index(dimension).ok_or(FieldError::InvalidDimension(dimension))?;
        Ok(&mut self.meshes[i])
    }

    /// The populated mesh of highest dimension, searching 3 down to 1.
    #[must_use]
    pub fn highest_dimension_mesh(&self) -> Option<&Mesh> {
        self.meshes.iter().rev().find(|m| !m.is_empty())
    }

    // ------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------

    /// All node identifiers, ascending.
    #[must_use]
    pub const fn nodes(&self) -> &BTreeSet<u32> {
        &self.nodes
    }

    /// Create a node. Returns false if the identifier is already in use.
    pub fn create_node(&mut self, id: u32) -> bool {
        self.nodes.insert(id)
    }

    /// Check whether a node exists.
    #[must_use]
    pub fn contains_node(&self, id: u32) -> bool {
        self.nodes.contains(&id)
    }

    /// Keep only nodes satisfying `keep`, dropping their field data too.
    pub fn retain_nodes(&mut self, keep: impl Fn(u32) -> bool) {
        self.nodes.retain(|id| keep(*id));
        for field in self.fields.iter_mut() {
            field.retain_nodes(&keep);
        }
    }

    // ------------------------------------------------------------------
    // Fields
    // ------------------------------------------------------------------

    /// The field catalog.
    #[must_use]
    pub const fn fields(&self) -> &FieldCatalog {
        &self.fields
    }

    /// The field catalog, mutable.
    pub fn fields_mut(&mut self) -> &mut FieldCatalog {
        &mut self.fields
    }

    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Add a field to the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::DuplicateField`] if the name is taken.
    pub fn add_field(&mut self, field: Field) -> FieldResult<()> {
        self.fields.add(field)
    }

    /// Return the named group, creating an empty one if absent.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::WrongKind`] if a non-group field has the name.
    pub fn find_or_create_group(&mut self, name: &str) -> FieldResult<&mut Field> {
        if !self.fields.contains(name) {
            self.fields.add(Field::group(name))?;
        }
        let field = self.field_entry(name)?;
        if field.as_group().is_none() {
            return Err(field.wrong_kind("group"));
        }
        Ok(field)
    }

    /// Set finite-element parameters at a node.
    ///
    /// # Errors
    ///
    /// Fails if the node or field does not exist, the field is not a
    /// finite-element field, or `values` has the wrong length.
    pub fn set_node_values(&mut self, field: &str, node: u32, values: &[f64]) -> FieldResult<()> {
        self.require_node(node)?;
        let entry = self.field_entry(field)?;
        let name = entry.name().to_string();
        match entry.kind_mut() {
            FieldKind::FiniteElement(fe) => fe.set(&name, node, values),
            _ => Err(entry.wrong_kind("finite element")),
        }
    }

    /// Assign a string at a node.
    ///
    /// # Errors
    ///
    /// Fails if the node or field does not exist or the field is not a
    /// stored string field.
    pub fn assign_string(&mut self, field: &str, node: u32, value: &str) -> FieldResult<()> {
        self.require_node(node)?;
        let entry = self.field_entry(field)?;
        match entry.kind_mut() {
            FieldKind::StoredString(s) => {
                s.set(node, value);
                Ok(())
            }
            _ => Err(entry.wrong_kind("stored string")),
        }
    }

    /// Assign an embedding location at a node.
    ///
    /// # Errors
    ///
    /// Fails if the node or field does not exist or the field is not a
    /// stored mesh location field.
    pub fn assign_mesh_location(
        &mut self,
        field: &str,
        node: u32,
        location: MeshLocation,
    ) -> FieldResult<()> {
        self.require_node(node)?;
        let entry = self.field_entry(field)?;
        match entry.kind_mut() {
            FieldKind::StoredMeshLocation(f) => {
                f.set(node, location);
                Ok(())
            }
            _ => Err(entry.wrong_kind("stored mesh location")),
        }
    }

    /// Add a node to a group's node group, creating the node group if needed.
    ///
    /// # Errors
    ///
    /// Fails if the node or group does not exist.
    pub fn add_node_to_group(&mut self, group: &str, node: u32) -> FieldResult<()> {
        self.require_node(node)?;
        let entry = self.field_entry(group)?;
        let wrong = entry.wrong_kind("group");
        let g = entry.as_group_mut().ok_or(wrong)?;
        g.create_node_group().insert(node);
        Ok(())
    }

    /// Add every element of a mesh at which `conditional` evaluates non-zero.
    ///
    /// The conditional is evaluated at each element's centre. With
    /// [`SubelementHandling::Full`] the element's nodes, and every
    /// lower-dimensional element whose nodes all belong to it, join the group
    /// as well. Returns the number of elements newly added at `dimension`.
    ///
    /// # Errors
    ///
    /// Fails if the group does not exist, is not a group, or the dimension is
    /// invalid.
    pub fn add_elements_conditional(
        &mut self,
        group: &str,
        dimension: u8,
        conditional: &Field,
    ) -> FieldResult<usize> {
        let mesh = self
            .mesh(dimension)
            .ok_or(FieldError::InvalidDimension(dimension))?;

        let selected: Vec<(u32, BTreeSet<u32>)> = mesh
            .elements()
            .filter(|element| {
                let location =
                    Location::Element(MeshLocation::new(dimension, element.id, element.shape.centre()));
                self.evaluate_real(conditional, &location)
                    .is_ok_and(|v| v.first().is_some_and(|x| *x != 0.0))
            })
            .map(|element| (element.id, element.nodes.iter().copied().collect()))
            .collect();

        // faces and edges of each selected element, by node containment;
        // a candidate is only checked against hosts of its first node
        let mut hosts_of: HashMap<u32, Vec<usize>> = HashMap::new();
        for (i, (_, nodes)) in selected.iter().enumerate() {
            for &node in nodes {
                hosts_of.entry(node).or_default().push(i);
            }
        }
        let mut subelements: Vec<(u8, u32)> = Vec::new();
        for lower in 1..dimension {
            if let Some(lower_mesh) = self.mesh(lower) {
                for candidate in lower_mesh.elements() {
                    let Some(hosts) = candidate.nodes.first().and_then(|n| hosts_of.get(n)) else {
                        continue;
                    };
                    if hosts
                        .iter()
                        .any(|&i| candidate.nodes.iter().all(|n| selected[i].1.contains(n)))
                    {
                        subelements.push((lower, candidate.id));
                    }
                }
            }
        }

        let entry = self.field_entry(group)?;
        let wrong = entry.wrong_kind("group");
        let g = entry.as_group_mut().ok_or(wrong)?;
        let full = g.subelement_handling() == SubelementHandling::Full;

        let mesh_group = g.create_mesh_group(dimension)?;
        let mut added = 0;
        for (id, _) in &selected {
            if mesh_group.insert(*id) {
                added += 1;
            }
        }

        if full {
            for (lower, id) in subelements {
                g.create_mesh_group(lower)?.insert(id);
            }
            let node_group = g.create_node_group();
            for (_, nodes) in &selected {
                node_group.extend(nodes.iter().copied());
            }
        }

        Ok(added)
    }

    /// Drop elements not in `keep` from the mesh of a dimension, along with
    /// their group memberships.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidDimension`] outside 1-3.
    pub fn retain_elements(&mut self, dimension: u8, keep: impl Fn(u32) -> bool) -> FieldResult<()> {
        self.mesh_mut(dimension)?.retain(&keep);
        for field in self.fields.iter_mut() {
            if let Some(g) = field.as_group_mut() {
                g.retain_elements(dimension, &keep);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Children
    // ------------------------------------------------------------------

    /// Attach `child` under this region, replacing any child of the same
    /// name, and return it.
    pub fn attach_child(&mut self, child: Region) -> &Region {
        self.children.retain(|c| c.name != child.name);
        self.children.push(child);
        &self.children[self.children.len() - 1]
    }

    /// Look up a child region by name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Region> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Child regions.
    #[must_use]
    pub fn children(&self) -> &[Region] {
        &self.children
    }

    // ------------------------------------------------------------------

    fn require_node(&self, node: u32) -> FieldResult<()> {
        if self.nodes.contains(&node) {
            Ok(())
        } else {
            Err(FieldError::NodeNotFound { node })
        }
    }

    fn field_entry(&mut self, name: &str) -> FieldResult<&mut Field> {
        self.fields
            .get_mut(name)
            .ok_or_else(|| FieldError::FieldNotFound {
                name: name.to_string(),
            })
    }
}

/// Create a region holding a single unit cube element.
///
/// Nodes 1-8 sit at the corners of (0,0,0)-(1,1,1) in local node order, so
/// node `n` has coordinates `((n-1) & 1, ((n-1) >> 1) & 1, ((n-1) >> 2) & 1)`.
/// The region has one field, a 3-component coordinate field named
/// `coordinates`.
///
/// # Example
///
/// ```
/// use scaffold_types::unit_cube_region;
///
/// let cube = unit_cube_region("cube");
/// assert_eq!(cube.nodes().len(), 8);
/// assert_eq!(cube.highest_dimension_mesh().map(|m| m.size()), Some(1));
/// ```
#[must_use]
pub fn unit_cube_region(name: impl Into<String>) -> Region {
    let mut region = Region::new(name);
    let mut coordinates = FiniteElementField::new(3);

    for local in 0..8_u32 {
        let node = local + 1;
        region.nodes.insert(node);
        let corner = [
            f64::from(local & 1),
            f64::from((local >> 1) & 1),
            f64::from((local >> 2) & 1),
        ];
        // component count always matches
        let _ = coordinates.set("coordinates", node, &corner);
    }

    region.meshes[2] = {
        let mut mesh = Mesh::empty(3);
        let _ = mesh.add_element(Element::new(1, ElementShape::Cube, [1, 2, 3, 4, 5, 6, 7, 8]));
        mesh
    };
    let _ = region.fields.add(
        Field::new("coordinates", FieldKind::FiniteElement(coordinates)).with_type_coordinate(true),
    );
    region
}
