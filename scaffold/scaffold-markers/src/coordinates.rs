//! Coordinate field discovery.

use scaffold_types::{Field, Location, MeshLocation, Region};
use tracing::debug;

use crate::error::{MarkerError, MarkerResult};

/// Find the 3-D coordinate field of a region.
///
/// If `preferred` names an existing field it is returned without further
/// checks. Otherwise the first element of the highest-dimension populated
/// mesh is sampled at its centre and the first field in catalog order that
///
/// - is flagged as a coordinate field,
/// - has 3 components,
/// - is a finite-element field, and
/// - is defined at the sample
///
/// is returned.
///
/// # Errors
///
/// Returns [`MarkerError::EmptyMesh`] if no mesh has elements and
/// [`MarkerError::NoCoordinateField`] if no field qualifies.
///
/// # Example
///
/// ```
/// use scaffold_markers::resolve_coordinate_field;
/// use scaffold_types::unit_cube_region;
///
/// let cube = unit_cube_region("cube");
/// let field = resolve_coordinate_field(&cube, None).unwrap();
/// assert_eq!(field.name(), "coordinates");
/// ```
pub fn resolve_coordinate_field<'r>(
    region: &'r Region,
    preferred: Option<&str>,
) -> MarkerResult<&'r Field> {
    if let Some(name) = preferred {
        if let Some(field) = region.field(name) {
            return Ok(field);
        }
        debug!(
            region = region.name(),
            field = name,
            "Preferred coordinate field not found, discovering"
        );
    }

    let mesh = region
        .highest_dimension_mesh()
        .ok_or_else(|| MarkerError::EmptyMesh {
            region: region.name().to_string(),
        })?;
    let element = mesh
        .first_element()
        .ok_or_else(|| MarkerError::EmptyMesh {
            region: region.name().to_string(),
        })?;
    let sample = Location::Element(MeshLocation::new(
        mesh.dimension(),
        element.id,
        element.shape.centre(),
    ));

    let field = region
        .fields()
        .find_first(|f| {
            f.is_type_coordinate()
                && f.number_of_components() == 3
                && f.as_finite_element().is_some()
                && region.is_defined_at(f, &sample)
        })
        .ok_or_else(|| MarkerError::NoCoordinateField {
            region: region.name().to_string(),
        })?;

    debug!(
        region = region.name(),
        field = field.name(),
        dimension = mesh.dimension(),
        "Discovered coordinate field"
    );
    Ok(field)
}
