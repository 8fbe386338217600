//! Marker correspondences between a model and a marker dataset.
//!
//! Markers are paired by label: a model marker labelled `apex of heart`
//! corresponds to the data marker with the same label.

use hashbrown::HashMap;
use nalgebra::Point3;
use scaffold_markers::{MARKER_DATA_COORDINATES, MARKER_DATA_NAME};
use scaffold_types::{FiniteElementField, Region, StoredStringField};

/// A labelled pair of marker positions.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerPair {
    /// Shared label.
    pub label: String,
    /// Position in the model.
    pub model: Point3<f64>,
    /// Position in the data.
    pub data: Point3<f64>,
}

/// Pair markers of two marker datasets by label.
///
/// Both regions must use the dataset field names written by
/// `scaffold_markers::extract_markers`. Markers without a label or without
/// coordinates are ignored. When a label repeats, the lowest node identifier
/// wins. Pairs are returned in model node order.
#[must_use]
pub fn match_markers(model: &Region, data: &Region) -> Vec<MarkerPair> {
    let Some((data_xyz, data_names)) = dataset_fields(data) else {
        return Vec::new();
    };
    let Some((model_xyz, model_names)) = dataset_fields(model) else {
        return Vec::new();
    };

    let mut targets: HashMap<&str, Point3<f64>> = HashMap::new();
    for &node in data.nodes() {
        if let (Some(label), Some(p)) = (data_names.value(node), point(data_xyz, node)) {
            targets.entry(label).or_insert(p);
        }
    }

    let mut used = hashbrown::HashSet::new();
    model
        .nodes()
        .iter()
        .filter_map(|&node| {
            let label = model_names.value(node)?;
            let source = point(model_xyz, node)?;
            let target = targets.get(label)?;
            used.insert(label).then(|| MarkerPair {
                label: label.to_string(),
                model: source,
                data: *target,
            })
        })
        .collect()
}

fn dataset_fields(region: &Region) -> Option<(&FiniteElementField, &StoredStringField)> {
    let xyz = region.field(MARKER_DATA_COORDINATES)?.as_finite_element()?;
    let names = region.field(MARKER_DATA_NAME)?.as_stored_string()?;
    Some((xyz, names))
}

fn point(field: &FiniteElementField, node: u32) -> Option<Point3<f64>> {
    match field.node_values(node)? {
        [x, y, z] => Some(Point3::new(*x, *y, *z)),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use scaffold_markers::MARKER_GROUP_NAME;
    use scaffold_types::Field;

    fn dataset(markers: &[(u32, &str, [f64; 3])]) -> Region {
        let mut region = Region::new(MARKER_GROUP_NAME);
        region.add_field(Field::coordinates(MARKER_DATA_COORDINATES)).unwrap();
        region.add_field(Field::stored_string(MARKER_DATA_NAME)).unwrap();
        for (node, label, x) in markers {
            region.create_node(*node);
            region.set_node_values(MARKER_DATA_COORDINATES, *node, x).unwrap();
            if !label.is_empty() {
                region.assign_string(MARKER_DATA_NAME, *node, label).unwrap();
            }
        }
        region
    }

    #[test]
    fn pairs_by_label() {
        let model = dataset(&[
            (1, "apex", [0.0, 0.0, 0.0]),
            (2, "base", [1.0, 0.0, 0.0]),
            (3, "", [2.0, 0.0, 0.0]),
            (4, "only in model", [3.0, 0.0, 0.0]),
        ]);
        let data = dataset(&[
            (100, "base", [10.0, 0.0, 0.0]),
            (101, "apex", [20.0, 0.0, 0.0]),
            (102, "apex", [30.0, 0.0, 0.0]),
        ]);

        let pairs = match_markers(&model, &data);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].label, "apex");
        assert_eq!(pairs[0].data, Point3::new(20.0, 0.0, 0.0));
        assert_eq!(pairs[1].label, "base");
        assert_eq!(pairs[1].model, Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn repeated_model_label_pairs_once() {
        let model = dataset(&[(1, "apex", [0.0; 3]), (2, "apex", [1.0; 3])]);
        let data = dataset(&[(9, "apex", [5.0; 3])]);
        let pairs = match_markers(&model, &data);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].model, Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn non_dataset_regions_have_no_pairs() {
        let model = Region::new("empty");
        let data = dataset(&[(9, "apex", [5.0; 3])]);
        assert!(match_markers(&model, &data).is_empty());
    }
}
