//! Surface material description

use serde::{Deserialize, Serialize};

use crate::foundation::guid::Guid;
use crate::foundation::math::{Color4, Vector3};

/// How a material is blended with what is behind it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum MaterialBlendMode {
    /// Fully opaque
    #[default]
    Opaque = 0,
    /// Alpha blended using the opacity texture
    Translucent = 1,
    /// Alpha tested using the opacity mask texture
    Masked = 2,
}

/// Texture references and scalar parameters of a surface
///
/// Texture slots hold asset GUIDs; the null GUID means "no texture".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Base color
    pub albedo_texture: Guid,
    /// Metalness
    pub metallness_texture: Guid,
    /// Tangent-space normals
    pub normal_texture: Guid,
    /// Roughness
    pub roughness_texture: Guid,
    /// Ambient occlusion
    pub ao_texture: Guid,
    /// Emission
    pub emissive_texture: Guid,
    /// Opacity, used by translucent blending
    pub opacity_texture: Guid,
    /// Opacity mask, used by masked blending
    pub opacity_mask_texture: Guid,
    /// Multiplied with the albedo
    pub tint_color: Color4,
    /// Per-channel emissive multiplier
    pub emissive_intensity: Vector3,
    /// UV tiling
    pub tiling_factor: f32,
    /// Blend mode
    pub blend_mode: MaterialBlendMode,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            albedo_texture: Guid::NULL,
            metallness_texture: Guid::NULL,
            normal_texture: Guid::NULL,
            roughness_texture: Guid::NULL,
            ao_texture: Guid::NULL,
            emissive_texture: Guid::NULL,
            opacity_texture: Guid::NULL,
            opacity_mask_texture: Guid::NULL,
            tint_color: Color4::WHITE,
            emissive_intensity: Vector3::ONE,
            tiling_factor: 1.0,
            blend_mode: MaterialBlendMode::Opaque,
        }
    }
}

impl Material {
    /// Builder: set the albedo texture
    pub fn with_albedo(mut self, texture: Guid) -> Self {
        self.albedo_texture = texture;
        self
    }

    /// Builder: set the tint
    pub fn with_tint(mut self, tint: Color4) -> Self {
        self.tint_color = tint;
        self
    }

    /// Builder: set the blend mode
    pub fn with_blend_mode(mut self, blend_mode: MaterialBlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    /// Texture GUIDs in slot order, null for empty slots
    pub fn textures(&self) -> [Guid; 8] {
        [
            self.albedo_texture,
            self.metallness_texture,
            self.normal_texture,
            self.roughness_texture,
            self.ao_texture,
            self.emissive_texture,
            self.opacity_texture,
            self.opacity_mask_texture,
        ]
    }
}
