//! Marker export against scaffold files on disk.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;

use approx::assert_relative_eq;
use scaffold_io::{read_region, write_region};
use scaffold_markers::{
    export_marker_coordinates, extract_markers, ExtractOptions, MARKER_DATA_COORDINATES,
    MARKER_DATA_NAME, MARKER_GROUP_NAME,
};
use scaffold_types::{unit_cube_region, Field, MeshLocation, Region};
use tempfile::tempdir;

/// A unit cube whose markers are split over two groups, sharing node 21.
fn two_group_scaffold() -> Region {
    let mut region = unit_cube_region("whole_body");
    region.add_field(Field::stored_mesh_location("marker_location")).unwrap();
    region.add_field(Field::stored_string("marker_name")).unwrap();
    region.find_or_create_group("marker_bodyA").unwrap();
    region.find_or_create_group("marker_bodyB").unwrap();

    let markers = [
        (20, [0.1, 0.2, 0.3], "heart apex", "marker_bodyA"),
        (21, [0.5, 0.5, 0.5], "", "marker_bodyA"),
        (21, [0.5, 0.5, 0.5], "", "marker_bodyB"),
        (22, [0.9, 0.8, 0.7], "lung base", "marker_bodyB"),
    ];
    for (node, xi, label, group) in markers {
        region.create_node(node);
        region
            .assign_mesh_location("marker_location", node, MeshLocation::new(3, 1, xi))
            .unwrap();
        region.assign_string("marker_name", node, label).unwrap();
        region.add_node_to_group(group, node).unwrap();
    }
    region
}

#[test]
fn test_exported_coordinates_match_extraction_exactly() {
    let dir = tempdir().unwrap();
    let scaffold_path = dir.path().join("whole_body.exf");
    let mut scaffold = two_group_scaffold();
    for node in 1..=8_u32 {
        let local = f64::from(node - 1);
        let x = [
            local / 3.0 + std::f64::consts::PI,
            local.sqrt() * 1.1e-3,
            -local / 7.0 - std::f64::consts::E,
        ];
        scaffold.set_node_values("coordinates", node, &x).unwrap();
    }
    write_region(&scaffold, &scaffold_path).unwrap();

    let in_memory = extract_markers(&scaffold, &ExtractOptions::default()).unwrap();
    let export =
        export_marker_coordinates(&scaffold_path, dir.path(), &ExtractOptions::default()).unwrap();
    let written = read_region(&export.path).unwrap();

    let field = |region: &Region| {
        region
            .field(MARKER_DATA_COORDINATES)
            .unwrap()
            .as_finite_element()
            .unwrap()
            .clone()
    };
    let (expected, actual) = (field(&in_memory.region), field(&written));
    for node in [20, 21, 22] {
        assert_eq!(actual.node_values(node), expected.node_values(node));
    }
}

#[test]
fn test_export_writes_union_of_groups() {
    let dir = tempdir().unwrap();
    let scaffold_path = dir.path().join("whole_body.exf");
    write_region(&two_group_scaffold(), &scaffold_path).unwrap();

    let export =
        export_marker_coordinates(&scaffold_path, dir.path(), &ExtractOptions::default()).unwrap();
    assert_eq!(
        export.path,
        dir.path().join("whole_body_marker_coordinates.exnode")
    );
    assert_eq!(export.report.groups_visited, 2);
    assert_eq!(export.report.markers, 3);
    assert_eq!(export.report.coordinates_written, 3);

    let dataset = read_region(&export.path).unwrap();
    assert_eq!(dataset.name(), MARKER_GROUP_NAME);
    let expected: BTreeSet<u32> = [20, 21, 22].into_iter().collect();
    assert_eq!(dataset.nodes(), &expected);

    let group = dataset.field(MARKER_GROUP_NAME).unwrap().as_group().unwrap();
    assert_eq!(group.node_group().unwrap(), &expected);

    let coordinates = dataset
        .field(MARKER_DATA_COORDINATES)
        .unwrap()
        .as_finite_element()
        .unwrap();
    let x = coordinates.node_values(22).unwrap();
    assert_relative_eq!(x[0], 0.9, epsilon = 1e-12);
    assert_relative_eq!(x[1], 0.8, epsilon = 1e-12);
    assert_relative_eq!(x[2], 0.7, epsilon = 1e-12);

    let names = dataset.field(MARKER_DATA_NAME).unwrap().as_stored_string().unwrap();
    assert_eq!(names.value(20), Some("heart apex"));
    assert_eq!(names.value(21), None);
    assert_eq!(names.value(22), Some("lung base"));
}

#[test]
fn test_empty_group_contributes_nothing() {
    let dir = tempdir().unwrap();
    let scaffold_path = dir.path().join("whole_body.exf");
    let mut scaffold = two_group_scaffold();
    scaffold
        .find_or_create_group("marker_empty")
        .unwrap()
        .as_group_mut()
        .unwrap()
        .create_node_group();
    write_region(&scaffold, &scaffold_path).unwrap();

    let export =
        export_marker_coordinates(&scaffold_path, dir.path(), &ExtractOptions::default()).unwrap();
    assert_eq!(export.report.groups_visited, 3);
    assert_eq!(export.report.groups_skipped, 0);
    assert_eq!(export.report.markers, 3);
}

#[test]
fn test_no_marker_fields_writes_nothing() {
    let dir = tempdir().unwrap();
    let scaffold_path = dir.path().join("plain.exf");
    write_region(&unit_cube_region("plain"), &scaffold_path).unwrap();

    let out = dir.path().join("out");
    std::fs::create_dir(&out).unwrap();
    let err =
        export_marker_coordinates(&scaffold_path, &out, &ExtractOptions::default()).unwrap_err();
    assert!(err.is_discovery_failure());
    assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
}

#[test]
fn test_custom_extension() {
    let dir = tempdir().unwrap();
    let scaffold_path = dir.path().join("whole_body.exf");
    write_region(&two_group_scaffold(), &scaffold_path).unwrap();

    let options = ExtractOptions::new().with_extension("exf");
    let export = export_marker_coordinates(&scaffold_path, dir.path(), &options).unwrap();
    assert!(export
        .path
        .ends_with("whole_body_marker_coordinates.exf"));
    assert!(export.path.exists());
}
