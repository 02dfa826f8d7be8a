//! Location / rotation / scale transform
//!
//! Composition follows the scene hierarchy rule
//! `world = compose(parent.world, relative)`.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::{Mat4, Matrix3, Rotator, Vector3};
use nalgebra::UnitQuaternion;

/// Iteration cap when extracting a rotation from a matrix
const MAX_ROTATION_ITERATIONS: usize = 32;

/// Transform representing location, rotation, and scale
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Transform {
    /// Location in 3D space
    pub location: Vector3,

    /// Rotation
    pub rotation: Rotator,

    /// Scale factors
    pub scale: Vector3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// Identity transform
    pub const IDENTITY: Self = Self {
        location: Vector3::ZERO,
        rotation: Rotator::IDENTITY,
        scale: Vector3::ONE,
    };

    /// Create a transform from its parts
    pub const fn new(location: Vector3, rotation: Rotator, scale: Vector3) -> Self {
        Self { location, rotation, scale }
    }

    /// Create a transform with only a location
    pub const fn from_location(location: Vector3) -> Self {
        Self {
            location,
            rotation: Rotator::IDENTITY,
            scale: Vector3::ONE,
        }
    }

    /// Builder: set rotation
    pub const fn with_rotation(mut self, rotation: Rotator) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder: set scale
    pub const fn with_scale(mut self, scale: Vector3) -> Self {
        self.scale = scale;
        self
    }

    /// Apply `child` inside the space of `self`
    pub fn compose(&self, child: &Transform) -> Transform {
        Transform {
            location: self.location + self.rotation.rotate(self.scale * child.location),
            rotation: self.rotation * child.rotation,
            scale: self.scale * child.scale,
        }
    }

    /// Express `self` relative to `parent`, so that
    /// `parent.compose(&self.relative_to(parent)) == *self`
    pub fn relative_to(&self, parent: &Transform) -> Transform {
        let inv_rotation = parent.rotation.inverse();
        Transform {
            location: inv_rotation.rotate(self.location - parent.location).safe_div(parent.scale),
            rotation: inv_rotation * self.rotation,
            scale: self.scale.safe_div(parent.scale),
        }
    }

    /// Get the inverse transform
    pub fn inverse(&self) -> Transform {
        Transform::IDENTITY.relative_to(self)
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Vector3) -> Vector3 {
        self.location + self.rotation.rotate(self.scale * point)
    }

    /// Apply this transform to a direction (no translation)
    pub fn transform_vector(&self, vector: Vector3) -> Vector3 {
        self.rotation.rotate(self.scale * vector)
    }

    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        let rotation: UnitQuaternion<f32> = self.rotation.quat().into();
        let location: nalgebra::Vector3<f32> = self.location.into();
        let scale: nalgebra::Vector3<f32> = self.scale.into();
        Mat4::new_translation(&location)
            * rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&scale)
    }

    /// Decompose a TRS matrix
    ///
    /// A matrix that collapses any axis (scale below `f32::EPSILON`) carries
    /// no usable rotation, so the identity rotation is returned with it.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let location = Vector3::new(matrix.m14, matrix.m24, matrix.m34);

        let axis_scale = |x: f32, y: f32, z: f32| {
            let length = Vector3::new(x, y, z).length();
            if length < f32::EPSILON { 0.0 } else { length }
        };
        let scale_x = axis_scale(matrix.m11, matrix.m21, matrix.m31);
        let scale_y = axis_scale(matrix.m12, matrix.m22, matrix.m32);
        let scale_z = axis_scale(matrix.m13, matrix.m23, matrix.m33);
        let scale = Vector3::new(scale_x, scale_y, scale_z);

        if scale_x.min(scale_y).min(scale_z) <= 0.0 {
            return Self { location, rotation: Rotator::IDENTITY, scale };
        }

        let rotation_matrix = Matrix3::new(
            matrix.m11 / scale_x, matrix.m12 / scale_y, matrix.m13 / scale_z,
            matrix.m21 / scale_x, matrix.m22 / scale_y, matrix.m23 / scale_z,
            matrix.m31 / scale_x, matrix.m32 / scale_y, matrix.m33 / scale_z,
        );
        let unit = UnitQuaternion::from_matrix_eps(
            &rotation_matrix,
            f32::EPSILON,
            MAX_ROTATION_ITERATIONS,
            UnitQuaternion::identity(),
        );
        let rotation = Rotator::from_quat(unit.into());

        Self { location, rotation, scale }
    }
}

impl approx::AbsDiffEq for Transform {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.location.abs_diff_eq(&other.location, epsilon)
            && self.rotation.abs_diff_eq(&other.rotation, epsilon)
            && self.scale.abs_diff_eq(&other.scale, epsilon)
    }
}

impl approx::RelativeEq for Transform {
    fn default_max_relative() -> f32 {
        f32::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.location.relative_eq(&other.location, epsilon, max_relative)
            && self.rotation.relative_eq(&other.rotation, epsilon, max_relative)
            && self.scale.relative_eq(&other.scale, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    fn parent() -> Transform {
        Transform::from_location(Vector3::new(10.0, 0.0, -5.0))
            .with_rotation(Rotator::from_euler_angles(Vector3::new(0.0, 90.0, 0.0)))
            .with_scale(Vector3::new(2.0, 2.0, 2.0))
    }

    #[test]
    fn test_compose_with_identity() {
        let t = parent();
        assert_relative_eq!(t.compose(&Transform::IDENTITY), t, epsilon = EPSILON);
        assert_relative_eq!(Transform::IDENTITY.compose(&t), t, epsilon = EPSILON);
    }

    #[test]
    fn test_compose_places_child_in_parent_space() {
        let child = Transform::from_location(Vector3::new(0.0, 0.0, -1.0));
        let world = parent().compose(&child);

        // Scaled by 2, then forward (-Z) yawed 90 degrees becomes -X
        assert_relative_eq!(world.location, Vector3::new(8.0, 0.0, -5.0), epsilon = EPSILON);
        assert_relative_eq!(world.scale, Vector3::new(2.0, 2.0, 2.0), epsilon = EPSILON);
    }

    #[test]
    fn test_relative_to_inverts_compose() {
        let child = Transform::from_location(Vector3::new(1.0, 2.0, 3.0))
            .with_rotation(Rotator::from_euler_angles(Vector3::new(15.0, 0.0, 45.0)))
            .with_scale(Vector3::new(0.5, 1.0, 3.0));
        let world = parent().compose(&child);

        assert_relative_eq!(world.relative_to(&parent()), child, epsilon = 1e-4);
    }

    #[test]
    fn test_inverse_composes_to_identity() {
        let t = parent();
        assert_relative_eq!(t.compose(&t.inverse()), Transform::IDENTITY, epsilon = EPSILON);
    }

    #[test]
    fn test_matrix_round_trip() {
        let t = parent();
        let decomposed = Transform::from_matrix(&t.to_matrix());
        assert_relative_eq!(decomposed, t, epsilon = 1e-4);
    }

    #[test]
    fn test_matrix_with_collapsed_axis() {
        let t = Transform::from_location(Vector3::new(1.0, 2.0, 3.0))
            .with_rotation(Rotator::from_euler_angles(Vector3::new(0.0, 45.0, 0.0)))
            .with_scale(Vector3::new(0.0, 1.0, 1.0));
        let decomposed = Transform::from_matrix(&t.to_matrix());

        assert_relative_eq!(decomposed.location, t.location, epsilon = EPSILON);
        assert_relative_eq!(decomposed.scale.x, 0.0);
        assert_relative_eq!(decomposed.rotation, Rotator::IDENTITY, epsilon = EPSILON);
    }
}
