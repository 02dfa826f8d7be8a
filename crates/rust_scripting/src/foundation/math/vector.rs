//! Vector value types

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 2D vector
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vector2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

/// 3D vector (Y-up, right-handed)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vector3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

/// 4D vector
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vector4 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
    /// W component
    pub w: f32,
}

impl_componentwise!(Vector2 { x, y });
impl_componentwise!(Vector3 { x, y, z });
impl_componentwise!(Vector4 { x, y, z, w });

impl Vector2 {
    /// Zero vector
    pub const ZERO: Self = Self::splat(0.0);
    /// Vector with all components set to one
    pub const ONE: Self = Self::splat(1.0);

    /// Create a new vector
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Create a vector with every component set to `value`
    pub const fn splat(value: f32) -> Self {
        Self { x: value, y: value }
    }

    /// Dot product
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Squared length
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Unit-length copy; the zero vector stays zero
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            self / len
        } else {
            Self::ZERO
        }
    }
}

impl Vector3 {
    /// Zero vector
    pub const ZERO: Self = Self::splat(0.0);
    /// Vector with all components set to one
    pub const ONE: Self = Self::splat(1.0);
    /// Positive X axis
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    /// Positive Y axis (up)
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    /// Positive Z axis (toward the viewer)
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Create a new vector
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Create a vector with every component set to `value`
    pub const fn splat(value: f32) -> Self {
        Self { x: value, y: value, z: value }
    }

    /// Dot product
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Squared length
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Unit-length copy; the zero vector stays zero
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            self / len
        } else {
            Self::ZERO
        }
    }

    /// Component-wise minimum
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Component-wise maximum
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    /// Component-wise absolute value
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    /// Divide component-wise, yielding zero where the divisor is zero
    pub fn safe_div(self, divisor: Self) -> Self {
        let div = |a: f32, b: f32| if b == 0.0 { 0.0 } else { a / b };
        Self::new(div(self.x, divisor.x), div(self.y, divisor.y), div(self.z, divisor.z))
    }
}

impl Vector4 {
    /// Zero vector
    pub const ZERO: Self = Self::splat(0.0);
    /// Vector with all components set to one
    pub const ONE: Self = Self::splat(1.0);

    /// Create a new vector
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Create a vector with every component set to `value`
    pub const fn splat(value: f32) -> Self {
        Self { x: value, y: value, z: value, w: value }
    }

    /// Extend a 3D vector with a W component
    pub const fn from_vector3(v: Vector3, w: f32) -> Self {
        Self::new(v.x, v.y, v.z, w)
    }

    /// Drop the W component
    pub const fn xyz(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Dot product
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Length
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit-length copy; the zero vector stays zero
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            self / len
        } else {
            Self::ZERO
        }
    }
}

impl From<nalgebra::Vector3<f32>> for Vector3 {
    fn from(v: nalgebra::Vector3<f32>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for nalgebra::Vector3<f32> {
    fn from(v: Vector3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<[f32; 2]> for Vector2 {
    fn from([x, y]: [f32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<[f32; 4]> for Vector4 {
    fn from([x, y, z, w]: [f32; 4]) -> Self {
        Self::new(x, y, z, w)
    }
}

macro_rules! impl_index {
    ($($t:ty),+) => {
        $(
            impl std::ops::Index<usize> for $t {
                type Output = f32;
                fn index(&self, index: usize) -> &f32 {
                    &bytemuck::cast_slice::<$t, f32>(std::slice::from_ref(self))[index]
                }
            }

            impl std::ops::IndexMut<usize> for $t {
                fn index_mut(&mut self, index: usize) -> &mut f32 {
                    &mut bytemuck::cast_slice_mut::<$t, f32>(std::slice::from_mut(self))[index]
                }
            }
        )+
    };
}

impl_index!(Vector2, Vector3, Vector4);
