//! Field evaluation at nodes and element locations.

use crate::{Field, FieldError, FieldKind, FieldResult, Location, MeshLocation, Region};

impl Region {
    /// Evaluate a real-valued field.
    ///
    /// - finite element fields return node parameters at a node, or the
    ///   basis-weighted sum of the element's node parameters inside an element
    /// - constant fields return their values everywhere
    /// - groups return 1.0 for members and 0.0 otherwise
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotDefined`] if the field has no value at the
    /// location (including an element with any undefined node) and
    /// [`FieldError::WrongKind`] for non-real fields.
    pub fn evaluate_real(&self, field: &Field, location: &Location) -> FieldResult<Vec<f64>> {
        match (field.kind(), location) {
            (FieldKind::Constant(values), _) => Ok(values.clone()),
            (FieldKind::FiniteElement(fe), Location::Node(node)) => fe
                .node_values(*node)
                .map(<[f64]>::to_vec)
                .ok_or_else(|| FieldError::not_defined(field.name(), location)),
            (FieldKind::FiniteElement(fe), Location::Element(loc)) => {
                let element = self.locate_element(loc)?;
                let weights = element.shape.basis(&loc.xi);
                let mut result = vec![0.0; fe.components()];
                for (node, weight) in element.nodes.iter().zip(weights) {
                    let values = fe
                        .node_values(*node)
                        .ok_or_else(|| FieldError::not_defined(field.name(), location))?;
                    for (r, v) in result.iter_mut().zip(values) {
                        *r += weight * v;
                    }
                }
                Ok(result)
            }
            (FieldKind::Group(group), Location::Node(node)) => {
                let member = group.node_group().is_some_and(|n| n.contains(node));
                Ok(vec![if member { 1.0 } else { 0.0 }])
            }
            (FieldKind::Group(group), Location::Element(loc)) => {
                let member = group
                    .mesh_group(loc.dimension)
                    .is_some_and(|e| e.contains(&loc.element));
                Ok(vec![if member { 1.0 } else { 0.0 }])
            }
            _ => Err(field.wrong_kind("real")),
        }
    }

    /// Evaluate a stored string field at a node.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotDefined`] if no string is stored there and
    /// [`FieldError::WrongKind`] for other kinds or element locations.
    pub fn evaluate_string<'a>(&self, field: &'a Field, location: &Location) -> FieldResult<&'a str> {
        let strings = field
            .as_stored_string()
            .ok_or_else(|| field.wrong_kind("stored string"))?;
        match location {
            Location::Node(node) => strings
                .value(*node)
                .ok_or_else(|| FieldError::not_defined(field.name(), location)),
            Location::Element(_) => Err(FieldError::not_defined(field.name(), location)),
        }
    }

    /// Evaluate a stored mesh location field at a node.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotDefined`] if nothing is stored there and
    /// [`FieldError::WrongKind`] for other kinds.
    pub fn evaluate_mesh_location(
        &self,
        field: &Field,
        location: &Location,
    ) -> FieldResult<MeshLocation> {
        let locations = field
            .as_stored_mesh_location()
            .ok_or_else(|| field.wrong_kind("stored mesh location"))?;
        match location {
            Location::Node(node) => locations
                .location(*node)
                .copied()
                .ok_or_else(|| FieldError::not_defined(field.name(), location)),
            Location::Element(_) => Err(FieldError::not_defined(field.name(), location)),
        }
    }

    /// True if the field has a value at the location.
    #[must_use]
    pub fn is_defined_at(&self, field: &Field, location: &Location) -> bool {
        match field.kind() {
            FieldKind::StoredString(_) => self.evaluate_string(field, location).is_ok(),
            FieldKind::StoredMeshLocation(_) => {
                self.evaluate_mesh_location(field, location).is_ok()
            }
            _ => self.evaluate_real(field, location).is_ok(),
        }
    }

    fn locate_element(&self, loc: &MeshLocation) -> FieldResult<&crate::Element> {
        self.mesh(loc.dimension)
            .ok_or(FieldError::InvalidDimension(loc.dimension))?
            .element(loc.element)
            .ok_or(FieldError::ElementNotFound {
                dimension: loc.dimension,
                element: loc.element,
            })
    }
}

/// A real field evaluated at the host location stored per node.
///
/// This is how a marker node's coordinates are obtained: the node stores
/// *where* it sits in the host mesh and the evaluand (usually the coordinate
/// field) is evaluated there.
///
/// # Example
///
/// ```
/// use scaffold_types::{unit_cube_region, EmbeddedField, Field, Location, MeshLocation};
///
/// let mut region = unit_cube_region("cube");
/// region.add_field(Field::stored_mesh_location("marker_location")).unwrap();
/// region.create_node(9);
/// region
///     .assign_mesh_location("marker_location", 9, MeshLocation::new(3, 1, [0.25, 0.5, 1.0]))
///     .unwrap();
///
/// let coordinates = region.field("coordinates").unwrap();
/// let host = region.field("marker_location").unwrap();
/// let embedded = EmbeddedField::new(coordinates, host).unwrap();
///
/// let x = embedded.evaluate(&region, &Location::Node(9)).unwrap();
/// assert_eq!(x, vec![0.25, 0.5, 1.0]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedField<'a> {
    evaluand: &'a Field,
    location: &'a Field,
}

impl<'a> EmbeddedField<'a> {
    /// Combine an evaluand with a stored mesh location field.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::WrongKind`] if `location` does not store mesh
    /// locations.
    pub fn new(evaluand: &'a Field, location: &'a Field) -> FieldResult<Self> {
        if location.as_stored_mesh_location().is_none() {
            return Err(location.wrong_kind("stored mesh location"));
        }
        Ok(Self { evaluand, location })
    }

    /// The field evaluated at the host location.
    #[must_use]
    pub const fn evaluand(&self) -> &'a Field {
        self.evaluand
    }

    /// Evaluate at a location of the embedding region.
    ///
    /// # Errors
    ///
    /// Fails if no host location is stored at `at` or the evaluand is not
    /// defined at the host location.
    pub fn evaluate(&self, region: &Region, at: &Location) -> FieldResult<Vec<f64>> {
        let host = region.evaluate_mesh_location(self.location, at)?;
        region.evaluate_real(self.evaluand, &Location::Element(host))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::unit_cube_region;
    use approx::assert_relative_eq;

    #[test]
    fn interpolates_inside_cube() {
        let region = unit_cube_region("cube");
        let coordinates = region.field("coordinates").unwrap();
        let at = Location::Element(MeshLocation::new(3, 1, [0.2, 0.7, 0.4]));
        let x = region.evaluate_real(coordinates, &at).unwrap();
        assert_relative_eq!(x[0], 0.2, epsilon = 1e-12);
        assert_relative_eq!(x[1], 0.7, epsilon = 1e-12);
        assert_relative_eq!(x[2], 0.4, epsilon = 1e-12);
    }

    #[test]
    fn undefined_node_makes_element_undefined() {
        let mut region = unit_cube_region("cube");
        region.retain_nodes(|id| id != 8);
        let coordinates = region.field("coordinates").unwrap();
        let at = Location::Element(MeshLocation::new(3, 1, [0.5, 0.5, 0.5]));
        assert!(matches!(
            region.evaluate_real(coordinates, &at),
            Err(FieldError::NotDefined { .. })
        ));
        assert!(!region.is_defined_at(coordinates, &at));
        assert!(region.is_defined_at(coordinates, &Location::Node(1)));
    }

    #[test]
    fn missing_element_is_reported() {
        let region = unit_cube_region("cube");
        let coordinates = region.field("coordinates").unwrap();
        let at = Location::Element(MeshLocation::new(3, 42, [0.5; 3]));
        assert_eq!(
            region.evaluate_real(coordinates, &at),
            Err(FieldError::ElementNotFound {
                dimension: 3,
                element: 42
            })
        );
    }

    #[test]
    fn constant_and_group_values() {
        let mut region = unit_cube_region("cube");
        let one = Field::constant("one", [1.0]);
        assert_eq!(region.evaluate_real(&one, &Location::Node(77)).unwrap(), vec![1.0]);

        region.find_or_create_group("g").unwrap();
        region.add_node_to_group("g", 3).unwrap();
        let g = region.field("g").unwrap();
        assert_eq!(region.evaluate_real(g, &Location::Node(3)).unwrap(), vec![1.0]);
        assert_eq!(region.evaluate_real(g, &Location::Node(4)).unwrap(), vec![0.0]);
    }

    #[test]
    fn strings_are_not_real() {
        let mut region = Region::new("r");
        region.add_field(Field::stored_string("name")).unwrap();
        region.create_node(1);
        region.assign_string("name", 1, "apex").unwrap();
        let name = region.field("name").unwrap();
        assert_eq!(region.evaluate_string(name, &Location::Node(1)).unwrap(), "apex");
        assert!(matches!(
            region.evaluate_real(name, &Location::Node(1)),
            Err(FieldError::WrongKind { .. })
        ));
    }

    #[test]
    fn embedded_field_requires_location_kind() {
        let region = unit_cube_region("cube");
        let coordinates = region.field("coordinates").unwrap();
        assert!(EmbeddedField::new(coordinates, coordinates).is_err());
    }

    #[test]
    fn embedded_field_without_stored_location_fails() {
        let mut region = unit_cube_region("cube");
        region.add_field(Field::stored_mesh_location("host")).unwrap();
        region.create_node(20);
        let embedded =
            EmbeddedField::new(region.field("coordinates").unwrap(), region.field("host").unwrap())
                .unwrap();
        assert!(embedded.evaluate(&region, &Location::Node(20)).is_err());
    }
}
