//! Linear RGB(A) color value types

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::{Vector3, Vector4};

/// RGB color, components nominally in [0, 1]
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color3 {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
}

/// RGBA color, components nominally in [0, 1]
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color4 {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
    /// Alpha channel
    pub a: f32,
}

impl_componentwise!(Color3 { r, g, b });
impl_componentwise!(Color4 { r, g, b, a });

impl Color3 {
    /// Black
    pub const BLACK: Self = Self::splat(0.0);
    /// White
    pub const WHITE: Self = Self::splat(1.0);

    /// Create a new color
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Gray color with every channel set to `value`
    pub const fn splat(value: f32) -> Self {
        Self { r: value, g: value, b: value }
    }

    /// Add an alpha channel
    pub const fn with_alpha(self, a: f32) -> Color4 {
        Color4::new(self.r, self.g, self.b, a)
    }
}

impl Color4 {
    /// Opaque black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white
    pub const WHITE: Self = Self::splat(1.0);

    /// Create a new color
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Color with every channel, alpha included, set to `value`
    pub const fn splat(value: f32) -> Self {
        Self { r: value, g: value, b: value, a: value }
    }

    /// Drop the alpha channel
    pub const fn rgb(self) -> Color3 {
        Color3::new(self.r, self.g, self.b)
    }
}

impl From<Vector3> for Color3 {
    fn from(v: Vector3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Color3> for Vector3 {
    fn from(c: Color3) -> Self {
        Self::new(c.r, c.g, c.b)
    }
}

impl From<Vector4> for Color4 {
    fn from(v: Vector4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Color4> for Vector4 {
    fn from(c: Color4) -> Self {
        Self::new(c.r, c.g, c.b, c.a)
    }
}

impl From<(Color3, f32)> for Color4 {
    fn from((rgb, a): (Color3, f32)) -> Self {
        rgb.with_alpha(a)
    }
}
