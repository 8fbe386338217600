//! Shared scaffold and organ fixtures.

#![allow(clippy::unwrap_used, dead_code)]

use std::path::{Path, PathBuf};

use scaffold_io::write_region;
use scaffold_types::{unit_cube_region, Element, ElementShape, Field, MeshLocation, Region};

/// Labelled marker positions, as element xi on the unit cube.
pub const MARKERS: [(u32, [f64; 3], &str); 4] = [
    (31, [0.0, 0.0, 0.0], "apex of heart"),
    (32, [1.0, 0.0, 0.0], "left atrium"),
    (33, [0.0, 1.0, 0.0], "right atrium"),
    (34, [0.0, 0.0, 1.0], "septum"),
];

/// Scale and offset between the scaffold and the digitized heart.
pub const HEART_SCALE: f64 = 0.5;
pub const HEART_OFFSET: [f64; 3] = [5.0, -3.0, 2.0];

fn add_markers(region: &mut Region, group: &str) {
    region.add_field(Field::stored_mesh_location("marker_location")).unwrap();
    region.add_field(Field::stored_string("marker_name")).unwrap();
    region.find_or_create_group(group).unwrap();
    for (node, xi, label) in MARKERS {
        region.create_node(node);
        region
            .assign_mesh_location("marker_location", node, MeshLocation::new(3, 1, xi))
            .unwrap();
        region.assign_string("marker_name", node, label).unwrap();
        region.add_node_to_group(group, node).unwrap();
    }
}

/// A unit cube scaffold carrying the four markers.
pub fn whole_body() -> Region {
    let mut region = unit_cube_region("whole_body");
    add_markers(&mut region, "marker_bodyA");
    region
}

/// The scaffold with an extra marker node that has no location, so its
/// coordinates cannot be evaluated.
pub fn whole_body_with_unplaced_marker() -> Region {
    let mut region = whole_body();
    region.create_node(UNPLACED_MARKER);
    region.add_node_to_group("marker_bodyA", UNPLACED_MARKER).unwrap();
    region
}

/// Node of the marker without a location.
pub const UNPLACED_MARKER: u32 = 35;

/// A heart digitized at half size away from the scaffold, with the same
/// markers.
pub fn heart() -> Region {
    let mut region = unit_cube_region("heart");
    for node in 1..=8_u32 {
        let local = node - 1;
        let corner: Vec<f64> = [local & 1, (local >> 1) & 1, (local >> 2) & 1]
            .iter()
            .zip(HEART_OFFSET)
            .map(|(&c, offset)| f64::from(c) * HEART_SCALE + offset)
            .collect();
        region.set_node_values("coordinates", node, &corner).unwrap();
    }
    add_markers(&mut region, "marker_heart");
    region
}

/// The heart with a second coordinate field ahead of `coordinates` in the
/// catalog, holding positions 100 times larger.
pub fn heart_with_decoy() -> Region {
    let source = heart();
    let xyz = source
        .field("coordinates")
        .unwrap()
        .as_finite_element()
        .unwrap()
        .clone();

    let mut region = Region::new("heart");
    for node in 1..=8 {
        region.create_node(node);
    }
    region
        .mesh_mut(3)
        .unwrap()
        .add_element(Element::new(1, ElementShape::Cube, [1, 2, 3, 4, 5, 6, 7, 8]))
        .unwrap();
    region.add_field(Field::coordinates(DECOY_COORDINATES)).unwrap();
    region.add_field(Field::coordinates("coordinates")).unwrap();
    for node in 1..=8 {
        let x = xyz.node_values(node).unwrap();
        let decoy: Vec<f64> = x.iter().map(|v| v * 100.0).collect();
        region.set_node_values(DECOY_COORDINATES, node, &decoy).unwrap();
        region.set_node_values("coordinates", node, x).unwrap();
    }
    add_markers(&mut region, "marker_heart");
    region
}

/// Name of the decoy coordinate field.
pub const DECOY_COORDINATES: &str = "body coordinates";

/// An organ mesh without markers.
pub fn plain_organ(name: &str) -> Region {
    unit_cube_region(name)
}

/// Write a region into `dir` and return its path.
pub fn write(dir: &Path, name: &str, region: &Region) -> PathBuf {
    let path = dir.join(name);
    write_region(region, &path).unwrap();
    path
}

/// True if every 3-D element of the region is in the named group.
pub fn group_covers_volume(region: &Region, group: &str) -> bool {
    let Some(members) = region
        .field(group)
        .and_then(Field::as_group)
        .and_then(|g| g.mesh_group(3))
    else {
        return false;
    };
    let mesh = region.mesh(3).unwrap();
    !mesh.is_empty() && mesh.element_ids().all(|id| members.contains(&id))
}
