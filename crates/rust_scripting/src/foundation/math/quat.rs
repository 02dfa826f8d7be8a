//! Quaternion and rotator types
//!
//! `Quat` stores `x, y, z, w` in that order to match the engine layout.
//! `Rotator` is the script-facing rotation: a quaternion that converts to and
//! from Euler angles in degrees.

use bytemuck::{Pod, Zeroable};
use nalgebra::{Quaternion, UnitQuaternion};
use serde::{Deserialize, Serialize};

use super::constants::{DEG_TO_RAD, RAD_TO_DEG};
use super::Vector3;

/// Quaternion (not necessarily unit length)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quat {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
    /// W (scalar) component
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    /// Identity rotation
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    /// Create a quaternion from its scalar part `w` and vector part
    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation from Euler angles in radians, applied X then Y then Z
    pub fn from_euler_angles(radians: Vector3) -> Self {
        UnitQuaternion::from_euler_angles(radians.x, radians.y, radians.z).into()
    }

    /// Euler angles in radians (inverse of [`Quat::from_euler_angles`])
    pub fn euler_angles(self) -> Vector3 {
        let (roll, pitch, yaw) = self.to_unit().euler_angles();
        Vector3::new(roll, pitch, yaw)
    }

    /// Conjugate (negated vector part)
    pub fn conjugate(self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Four-component dot product
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Multiplicative inverse; the zero quaternion has no inverse and maps to itself
    pub fn inverse(self) -> Self {
        let len_sq = self.dot(self);
        if len_sq > 0.0 {
            self.conjugate() / len_sq
        } else {
            self
        }
    }

    /// Length
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Normalize in place; the zero quaternion becomes identity
    pub fn normalize(&mut self) {
        *self = self.normalized();
    }

    /// Unit-length copy; the zero quaternion becomes identity
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            self / len
        } else {
            Self::IDENTITY
        }
    }

    /// Rotate a vector by this (normalized) quaternion
    pub fn rotate(self, v: Vector3) -> Vector3 {
        (self.to_unit() * nalgebra::Vector3::from(v)).into()
    }

    /// Convert to a nalgebra unit quaternion, renormalizing
    pub fn to_unit(self) -> UnitQuaternion<f32> {
        UnitQuaternion::new_normalize(Quaternion::new(self.w, self.x, self.y, self.z))
    }
}

impl From<UnitQuaternion<f32>> for Quat {
    fn from(q: UnitQuaternion<f32>) -> Self {
        Self::new(q.w, q.i, q.j, q.k)
    }
}

impl From<Quat> for UnitQuaternion<f32> {
    fn from(q: Quat) -> Self {
        q.to_unit()
    }
}

/// Hamilton product
impl std::ops::Mul for Quat {
    type Output = Self;

    fn mul(self, q: Self) -> Self {
        let p = self;
        Self {
            w: p.w * q.w - p.x * q.x - p.y * q.y - p.z * q.z,
            x: p.w * q.x + p.x * q.w + p.y * q.z - p.z * q.y,
            y: p.w * q.y + p.y * q.w + p.z * q.x - p.x * q.z,
            z: p.w * q.z + p.z * q.w + p.x * q.y - p.y * q.x,
        }
    }
}

impl std::ops::Mul<Vector3> for Quat {
    type Output = Vector3;

    fn mul(self, v: Vector3) -> Vector3 {
        self.rotate(v)
    }
}

impl std::ops::Div<f32> for Quat {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        Self::new(self.w / scalar, self.x / scalar, self.y / scalar, self.z / scalar)
    }
}

impl approx::AbsDiffEq for Quat {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
            && self.w.abs_diff_eq(&other.w, epsilon)
    }
}

impl approx::RelativeEq for Quat {
    fn default_max_relative() -> f32 {
        f32::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
            && self.w.relative_eq(&other.w, epsilon, max_relative)
    }
}

impl std::fmt::Display for Quat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Quat(w: {}, x: {}, y: {}, z: {})", self.w, self.x, self.y, self.z)
    }
}

/// Script-facing rotation backed by a quaternion
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rotator {
    /// Underlying rotation
    pub rotation: Quat,
}

impl Rotator {
    /// No rotation
    pub const IDENTITY: Self = Self { rotation: Quat::IDENTITY };

    /// Wrap a quaternion, normalizing it
    pub fn from_quat(rotation: Quat) -> Self {
        Self { rotation: rotation.normalized() }
    }

    /// Rotation from Euler angles in degrees
    pub fn from_euler_angles(degrees: Vector3) -> Self {
        Self { rotation: Quat::from_euler_angles(degrees * DEG_TO_RAD) }
    }

    /// Euler angles in degrees
    pub fn euler_angles(self) -> Vector3 {
        self.rotation.euler_angles() * RAD_TO_DEG
    }

    /// Underlying quaternion
    pub const fn quat(self) -> Quat {
        self.rotation
    }

    /// Inverse rotation
    pub fn inverse(self) -> Self {
        Self { rotation: self.rotation.inverse() }
    }

    /// Rotate a vector
    pub fn rotate(self, v: Vector3) -> Vector3 {
        self.rotation.rotate(v)
    }

    /// Forward direction (-Z rotated)
    pub fn forward_vector(self) -> Vector3 {
        self.rotate(Vector3::new(0.0, 0.0, -1.0))
    }

    /// Right direction (+X rotated)
    pub fn right_vector(self) -> Vector3 {
        self.rotate(Vector3::X)
    }

    /// Up direction (+Y rotated)
    pub fn up_vector(self) -> Vector3 {
        self.rotate(Vector3::Y)
    }
}

impl From<Quat> for Rotator {
    fn from(rotation: Quat) -> Self {
        Self::from_quat(rotation)
    }
}

/// Applies `rhs` first, then `self`
impl std::ops::Mul for Rotator {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self { rotation: (self.rotation * rhs.rotation).normalized() }
    }
}

impl std::ops::Mul<Vector3> for Rotator {
    type Output = Vector3;

    fn mul(self, v: Vector3) -> Vector3 {
        self.rotate(v)
    }
}

impl approx::AbsDiffEq for Rotator {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        // q and -q describe the same rotation
        self.rotation.abs_diff_eq(&other.rotation, epsilon)
            || self.rotation.abs_diff_eq(&(other.rotation / -1.0), epsilon)
    }
}

impl approx::RelativeEq for Rotator {
    fn default_max_relative() -> f32 {
        f32::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.rotation.relative_eq(&other.rotation, epsilon, max_relative)
            || self.rotation.relative_eq(&(other.rotation / -1.0), epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_identity_leaves_vectors_alone() {
        let v = Vector3::new(1.0, -2.0, 3.0);
        assert_relative_eq!(Quat::IDENTITY * v, v, epsilon = EPSILON);
    }

    #[test]
    fn test_hamilton_product_matches_nalgebra() {
        let a = Quat::from_euler_angles(Vector3::new(0.3, -0.2, 1.1));
        let b = Quat::from_euler_angles(Vector3::new(-0.7, 0.4, 0.25));

        let ours = a * b;
        let theirs: Quat = (a.to_unit() * b.to_unit()).into();
        assert_relative_eq!(ours, theirs, epsilon = EPSILON);
    }

    #[test]
    fn test_inverse_cancels() {
        let q = Quat::new(2.0, 1.0, -1.0, 0.5);
        assert_relative_eq!(q * q.inverse(), Quat::IDENTITY, epsilon = EPSILON);
    }

    #[test]
    fn test_normalize_and_conjugate() {
        let mut q = Quat::new(0.0, 0.0, 3.0, 4.0);
        q.normalize();
        assert_relative_eq!(q.length(), 1.0, epsilon = EPSILON);
        assert_eq!(q.conjugate(), Quat::new(0.0, 0.0, -0.6, -0.8));
        assert_eq!(Quat::new(0.0, 0.0, 0.0, 0.0).normalized(), Quat::IDENTITY);
    }

    #[test]
    fn test_euler_round_trip_degrees() {
        let angles = Vector3::new(10.0, 20.0, 30.0);
        let rotator = Rotator::from_euler_angles(angles);
        assert_relative_eq!(rotator.euler_angles(), angles, epsilon = 1e-3);
    }

    #[test]
    fn test_yaw_turns_forward_vector() {
        let rotator = Rotator::from_euler_angles(Vector3::new(0.0, 90.0, 0.0));

        assert_relative_eq!(Rotator::IDENTITY.forward_vector(), Vector3::new(0.0, 0.0, -1.0), epsilon = EPSILON);
        assert_relative_eq!(rotator.forward_vector(), Vector3::new(-1.0, 0.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(rotator.up_vector(), Vector3::Y, epsilon = EPSILON);
    }

    #[test]
    fn test_layout_matches_xyzw() {
        let q = Quat::new(4.0, 1.0, 2.0, 3.0);
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&q));
        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(std::mem::size_of::<Rotator>(), 16);
    }
}
