//! Kabsch alignment of paired marker positions.
//!
//! Finds the rotation (and optionally uniform scale) and translation that
//! minimize the RMS distance between two paired point sets.

use nalgebra::{Matrix3, Point3, Rotation3, UnitQuaternion, Vector3};

use crate::{FitError, FitResult, RigidTransform};

/// Minimum number of pairs for a well-defined rotation.
pub const MIN_MARKER_PAIRS: usize = 3;

/// Computes the transform that best maps `source_points` onto `target_points`.
///
/// # Errors
///
/// Returns an error if:
/// - The point sets have different lengths
/// - Fewer than [`MIN_MARKER_PAIRS`] pairs are given
/// - SVD computation fails
///
/// # Example
///
/// ```
/// use nalgebra::Point3;
/// use scaffold_fit::compute_rigid_transform;
///
/// let source = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let target: Vec<_> = source
///     .iter()
///     .map(|p| Point3::new(2.0 * p.x + 1.0, 2.0 * p.y, 2.0 * p.z))
///     .collect();
///
/// let transform = compute_rigid_transform(&source, &target, true).unwrap();
/// assert!((transform.scale - 2.0).abs() < 1e-9);
/// ```
pub fn compute_rigid_transform(
    source_points: &[Point3<f64>],
    target_points: &[Point3<f64>],
    compute_scale: bool,
) -> FitResult<RigidTransform> {
    if source_points.len() != target_points.len() {
        return Err(FitError::InvalidParameter(format!(
            "point sets must have equal length: {} vs {}",
            source_points.len(),
            target_points.len()
        )));
    }
    if source_points.len() < MIN_MARKER_PAIRS {
        return Err(FitError::InsufficientMarkers {
            required: MIN_MARKER_PAIRS,
            provided: source_points.len(),
        });
    }

    let source_centroid = centroid(source_points);
    let target_centroid = centroid(target_points);

    let source_centered: Vec<Vector3<f64>> = source_points
        .iter()
        .map(|p| p.coords - source_centroid)
        .collect();
    let target_centered: Vec<Vector3<f64>> = target_points
        .iter()
        .map(|p| p.coords - target_centroid)
        .collect();

    // H = sum(source_i * target_i^T)
    let mut h = Matrix3::zeros();
    for (s, t) in source_centered.iter().zip(&target_centered) {
        h += s * t.transpose();
    }

    let svd = h.svd(true, true);
    let u = svd.u.ok_or(FitError::SvdFailed)?;
    let v_t = svd.v_t.ok_or(FitError::SvdFailed)?;

    let mut rotation_matrix = v_t.transpose() * u.transpose();
    if rotation_matrix.determinant() < 0.0 {
        // reflection: flip the last column of V
        let mut v = v_t.transpose();
        for i in 0..3 {
            v[(i, 2)] = -v[(i, 2)];
        }
        rotation_matrix = v * u.transpose();
    }
    let rotation =
        UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(rotation_matrix));

    let scale = if compute_scale {
        optimal_scale(&source_centered, &target_centered, &rotation)
    } else {
        1.0
    };
    let translation = target_centroid - scale * (rotation * source_centroid);

    Ok(RigidTransform::with_scale(rotation, translation, scale))
}

/// RMS distance between transformed source points and their targets.
#[must_use]
pub fn alignment_rms(
    transform: &RigidTransform,
    source_points: &[Point3<f64>],
    target_points: &[Point3<f64>],
) -> f64 {
    if source_points.is_empty() {
        return 0.0;
    }
    let sum: f64 = source_points
        .iter()
        .zip(target_points)
        .map(|(s, t)| (transform.transform_point(s) - *t).norm_squared())
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let n = source_points.len() as f64;
    (sum / n).sqrt()
}

fn centroid(points: &[Point3<f64>]) -> Vector3<f64> {
    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    let sum: Vector3<f64> = points.iter().map(|p| p.coords).sum();
    sum / n
}

fn optimal_scale(
    source_centered: &[Vector3<f64>],
    target_centered: &[Vector3<f64>],
    rotation: &UnitQuaternion<f64>,
) -> f64 {
    let mut source_variance = 0.0;
    let mut cross_variance = 0.0;
    for (s, t) in source_centered.iter().zip(target_centered) {
        source_variance += s.norm_squared();
        cross_variance += (rotation * s).dot(t);
    }
    if source_variance > 1e-10 {
        cross_variance / source_variance
    } else {
        1.0
    }
}
