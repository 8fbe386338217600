//! Marker alignment fitter against files on disk.

#![allow(clippy::unwrap_used)]

use approx::assert_relative_eq;
use scaffold_fit::{
    FitError, FitPlan, FitRequest, FitStep, FittingService, MarkerAlignFitter, Point3,
    RigidTransform, UnitQuaternion, Vector3,
};
use scaffold_io::{read_region, write_region};
use scaffold_markers::{extract_markers, ExtractOptions, MARKER_DATA_COORDINATES};
use scaffold_types::{unit_cube_region, Field, MeshLocation, Region};
use tempfile::tempdir;

/// A unit cube organ with four labelled markers at non-coplanar positions.
fn organ_with_markers() -> Region {
    let mut organ = unit_cube_region("heart");
    organ.add_field(Field::stored_mesh_location("marker_location")).unwrap();
    organ.add_field(Field::stored_string("marker_name")).unwrap();
    organ.find_or_create_group("marker_heart").unwrap();
    for (node, xi, label) in [
        (31, [0.0, 0.0, 0.0], "apex"),
        (32, [1.0, 0.0, 0.0], "left base"),
        (33, [0.0, 1.0, 0.0], "right base"),
        (34, [0.0, 0.0, 1.0], "septum"),
    ] {
        organ.create_node(node);
        organ
            .assign_mesh_location("marker_location", node, MeshLocation::new(3, 1, xi))
            .unwrap();
        organ.assign_string("marker_name", node, label).unwrap();
        organ.add_node_to_group("marker_heart", node).unwrap();
    }
    organ
}

fn expected_transform() -> RigidTransform {
    RigidTransform::with_scale(
        UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.3),
        Vector3::new(10.0, -2.0, 4.0),
        2.5,
    )
}

/// Marker data equal to the organ's markers moved by `expected_transform`.
fn moved_marker_data(organ: &Region) -> Region {
    let mut data = extract_markers(organ, &ExtractOptions::default())
        .unwrap()
        .region;
    let field = data
        .fields_mut()
        .get_mut(MARKER_DATA_COORDINATES)
        .unwrap()
        .as_finite_element_mut()
        .unwrap();
    expected_transform().apply_to_field(field);
    data
}

#[test]
fn test_align_then_fit_writes_moved_model() {
    let dir = tempdir().unwrap();
    let organ = organ_with_markers();
    let model_path = dir.path().join("heart.exf");
    let data_path = dir.path().join("whole_body_marker_coordinates.exnode");
    write_region(&organ, &model_path).unwrap();
    write_region(&moved_marker_data(&organ), &data_path).unwrap();

    let request = FitRequest::new(&model_path, &data_path, dir.path().join("heart_transformed"));
    let fitted = MarkerAlignFitter::new().fit(&request).unwrap();
    assert_eq!(fitted, dir.path().join("heart_transformed_fit1.exf"));

    let result = read_region(&fitted).unwrap();
    let coordinates = result
        .field("coordinates")
        .unwrap()
        .as_finite_element()
        .unwrap();
    let corner = coordinates.node_values(8).unwrap();
    let expected = expected_transform().transform_point(&Point3::new(1.0, 1.0, 1.0));
    assert_relative_eq!(corner[0], expected.x, epsilon = 1e-9);
    assert_relative_eq!(corner[1], expected.y, epsilon = 1e-9);
    assert_relative_eq!(corner[2], expected.z, epsilon = 1e-9);

    // the input model is untouched
    assert_eq!(read_region(&model_path).unwrap(), organ);
}

#[test]
fn test_one_output_per_fit_step() {
    let dir = tempdir().unwrap();
    let organ = organ_with_markers();
    let model_path = dir.path().join("heart.json");
    let data_path = dir.path().join("markers.exnode");
    write_region(&organ, &model_path).unwrap();
    write_region(&moved_marker_data(&organ), &data_path).unwrap();

    let plan = FitPlan::empty()
        .with_step(FitStep::default_fit())
        .with_step(FitStep::align_markers())
        .with_step(FitStep::default_fit());
    let request = FitRequest::new(&model_path, &data_path, dir.path().join("heart_transformed"))
        .with_plan(plan);
    let fitted = MarkerAlignFitter::new().fit(&request).unwrap();

    assert_eq!(fitted, dir.path().join("heart_transformed_fit2.json"));
    let first = read_region(dir.path().join("heart_transformed_fit1.json")).unwrap();
    assert_eq!(first, organ);
}

#[test]
fn test_align_only_plan_writes_nothing() {
    let dir = tempdir().unwrap();
    let organ = organ_with_markers();
    let model_path = dir.path().join("heart.exf");
    let data_path = dir.path().join("markers.exnode");
    write_region(&organ, &model_path).unwrap();
    write_region(&moved_marker_data(&organ), &data_path).unwrap();

    let request = FitRequest::new(&model_path, &data_path, dir.path().join("heart_transformed"))
        .with_plan(FitPlan::empty().with_step(FitStep::align_markers()));
    assert!(matches!(
        MarkerAlignFitter::new().fit(&request),
        Err(FitError::NoFitSteps)
    ));
}

#[test]
fn test_too_few_shared_labels() {
    let dir = tempdir().unwrap();
    let organ = organ_with_markers();
    let mut data = moved_marker_data(&organ);
    data.retain_nodes(|id| id <= 32);

    let model_path = dir.path().join("heart.exf");
    let data_path = dir.path().join("markers.exnode");
    write_region(&organ, &model_path).unwrap();
    write_region(&data, &data_path).unwrap();

    let request = FitRequest::new(&model_path, &data_path, dir.path().join("heart_transformed"));
    assert!(matches!(
        MarkerAlignFitter::new().fit(&request),
        Err(FitError::InsufficientMarkers {
            required: 3,
            provided: 2
        })
    ));
    assert!(!dir.path().join("heart_transformed_fit1.exf").exists());
}
