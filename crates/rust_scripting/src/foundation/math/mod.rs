//! Math utilities and types
//!
//! Plain value types shared between scripts and the scene store. Every type
//! here is `#[repr(C)]` and `bytemuck::Pod` so it keeps the same byte layout
//! as the engine-side definitions. Heavier work (rotation, matrices) is
//! delegated to nalgebra.

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Unit, UnitQuaternion};

/// Implements component-wise arithmetic, approx comparisons and `Display`
/// for a struct of `f32` fields.
macro_rules! impl_componentwise {
    ($t:ident { $($f:ident),+ }) => {
        impl std::ops::Add for $t {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self { $($f: self.$f + rhs.$f),+ }
            }
        }

        impl std::ops::Sub for $t {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self { $($f: self.$f - rhs.$f),+ }
            }
        }

        impl std::ops::Mul for $t {
            type Output = Self;
            fn mul(self, rhs: Self) -> Self {
                Self { $($f: self.$f * rhs.$f),+ }
            }
        }

        impl std::ops::Div for $t {
            type Output = Self;
            fn div(self, rhs: Self) -> Self {
                Self { $($f: self.$f / rhs.$f),+ }
            }
        }

        impl std::ops::Add<f32> for $t {
            type Output = Self;
            fn add(self, rhs: f32) -> Self {
                Self { $($f: self.$f + rhs),+ }
            }
        }

        impl std::ops::Sub<f32> for $t {
            type Output = Self;
            fn sub(self, rhs: f32) -> Self {
                Self { $($f: self.$f - rhs),+ }
            }
        }

        impl std::ops::Mul<f32> for $t {
            type Output = Self;
            fn mul(self, rhs: f32) -> Self {
                Self { $($f: self.$f * rhs),+ }
            }
        }

        impl std::ops::Div<f32> for $t {
            type Output = Self;
            fn div(self, rhs: f32) -> Self {
                Self { $($f: self.$f / rhs),+ }
            }
        }

        impl std::ops::Add<$t> for f32 {
            type Output = $t;
            fn add(self, rhs: $t) -> $t {
                $t { $($f: self + rhs.$f),+ }
            }
        }

        impl std::ops::Sub<$t> for f32 {
            type Output = $t;
            fn sub(self, rhs: $t) -> $t {
                $t { $($f: self - rhs.$f),+ }
            }
        }

        impl std::ops::Mul<$t> for f32 {
            type Output = $t;
            fn mul(self, rhs: $t) -> $t {
                $t { $($f: self * rhs.$f),+ }
            }
        }

        impl std::ops::Div<$t> for f32 {
            type Output = $t;
            fn div(self, rhs: $t) -> $t {
                $t { $($f: self / rhs.$f),+ }
            }
        }

        impl std::ops::Neg for $t {
            type Output = Self;
            fn neg(self) -> Self {
                Self { $($f: -self.$f),+ }
            }
        }

        impl std::ops::AddAssign for $t {
            fn add_assign(&mut self, rhs: Self) {
                $(self.$f += rhs.$f;)+
            }
        }

        impl std::ops::SubAssign for $t {
            fn sub_assign(&mut self, rhs: Self) {
                $(self.$f -= rhs.$f;)+
            }
        }

        impl std::ops::MulAssign<f32> for $t {
            fn mul_assign(&mut self, rhs: f32) {
                $(self.$f *= rhs;)+
            }
        }

        impl std::ops::DivAssign<f32> for $t {
            fn div_assign(&mut self, rhs: f32) {
                $(self.$f /= rhs;)+
            }
        }

        impl approx::AbsDiffEq for $t {
            type Epsilon = f32;

            fn default_epsilon() -> f32 {
                f32::EPSILON
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
                $(self.$f.abs_diff_eq(&other.$f, epsilon))&&+
            }
        }

        impl approx::RelativeEq for $t {
            fn default_max_relative() -> f32 {
                f32::EPSILON
            }

            fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
                $(self.$f.relative_eq(&other.$f, epsilon, max_relative))&&+
            }
        }

        impl std::fmt::Display for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let parts = [$(self.$f),+];
                write!(f, "(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{part}")?;
                }
                write!(f, ")")
            }
        }
    };
}

mod color;
mod quat;
mod transform;
mod vector;

pub mod mathf;

pub use color::{Color3, Color4};
pub use quat::{Quat, Rotator};
pub use transform::Transform;
pub use vector::{Vector2, Vector3, Vector4};

/// 4x4 matrix type used for GPU-facing transforms
pub type Mat4 = Matrix4<f32>;

/// Common mathematical constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Tau constant (2 * Pi)
    pub const TAU: f32 = std::f32::consts::TAU;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}
