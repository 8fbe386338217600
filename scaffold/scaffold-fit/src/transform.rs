//! Similarity transform produced by marker alignment.

use nalgebra::{Point3, UnitQuaternion, Vector3};
use scaffold_types::FiniteElementField;

/// A rotation, translation and uniform scale.
///
/// The transformation is applied in the order: scale -> rotate -> translate.
///
/// # Example
///
/// ```
/// use nalgebra::{Point3, UnitQuaternion, Vector3};
/// use scaffold_fit::RigidTransform;
///
/// let transform = RigidTransform::with_scale(
///     UnitQuaternion::identity(),
///     Vector3::new(1.0, 0.0, 0.0),
///     2.0,
/// );
/// let p = transform.transform_point(&Point3::new(1.0, 1.0, 1.0));
/// assert_eq!(p, Point3::new(3.0, 2.0, 2.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    /// Rotation as a unit quaternion.
    pub rotation: UnitQuaternion<f64>,
    /// Translation vector.
    pub translation: Vector3<f64>,
    /// Uniform scale factor.
    pub scale: f64,
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl RigidTransform {
    /// Creates a transform with the given rotation and translation and unit scale.
    #[must_use]
    pub const fn new(rotation: UnitQuaternion<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
            scale: 1.0,
        }
    }

    /// Creates a transform with rotation, translation, and scale.
    #[must_use]
    pub const fn with_scale(
        rotation: UnitQuaternion<f64>,
        translation: Vector3<f64>,
        scale: f64,
    ) -> Self {
        Self {
            rotation,
            translation,
            scale,
        }
    }

    /// The identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(UnitQuaternion::identity(), Vector3::zeros())
    }

    /// Transforms a point.
    #[must_use]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * (point.coords * self.scale) + self.translation)
    }

    /// Transforms every 3-component node parameter of a field in place.
    ///
    /// Returns the number of nodes moved. Parameters of other lengths are left
    /// unchanged.
    pub fn apply_to_field(&self, field: &mut FiniteElementField) -> usize {
        let mut moved = 0;
        for (_, values) in field.node_values_mut() {
            if let [x, y, z] = values {
                let p = self.transform_point(&Point3::new(*x, *y, *z));
                *x = p.x;
                *y = p.y;
                *z = p.z;
                moved += 1;
            }
        }
        moved
    }

    /// Returns true if this transform is approximately the identity.
    #[must_use]
    pub fn is_identity(&self, epsilon: f64) -> bool {
        self.rotation.angle().abs() < epsilon
            && self.translation.norm() < epsilon
            && (self.scale - 1.0).abs() < epsilon
    }
}
