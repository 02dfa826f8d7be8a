//! Text and 2D overlay components

use crate::foundation::guid::Guid;
use crate::foundation::math::{Color3, Transform, Vector2};
use crate::renderer::MaterialBlendMode;

/// Text rendered in the 3D scene
#[derive(Debug, Clone, PartialEq)]
pub struct TextComponent {
    /// Transform relative to the owning entity
    pub transform: Transform,
    /// Font asset, null for the default font
    pub font: Guid,
    /// UTF-8 text
    pub text: String,
    /// Unlit text color
    pub color: Color3,
    /// Blend mode
    pub blend_mode: MaterialBlendMode,
    /// Lit albedo
    pub albedo: Color3,
    /// Lit emissive color
    pub emissive: Color3,
    metallness: f32,
    roughness: f32,
    ao: f32,
    opacity: f32,
    opacity_mask: f32,
    /// Use the lit material path
    pub is_lit: bool,
    /// Whether the text casts shadows
    pub casts_shadows: bool,
    /// Extra horizontal spacing between glyphs
    pub kerning: f32,
    /// Extra vertical spacing between lines
    pub line_spacing: f32,
    /// Wrap width
    pub max_width: f32,
}

impl Default for TextComponent {
    fn default() -> Self {
        Self {
            transform: Transform::IDENTITY,
            font: Guid::NULL,
            text: String::new(),
            color: Color3::WHITE,
            blend_mode: MaterialBlendMode::Opaque,
            albedo: Color3::WHITE,
            emissive: Color3::BLACK,
            metallness: 0.0,
            roughness: 0.5,
            ao: 1.0,
            opacity: 1.0,
            opacity_mask: 1.0,
            is_lit: false,
            casts_shadows: false,
            kerning: 0.0,
            line_spacing: 0.0,
            max_width: 10.0,
        }
    }
}

macro_rules! unit_interval_accessors {
    ($ty:ty { $($get:ident / $set:ident),+ $(,)? }) => {
        impl $ty {
            $(
                #[doc = concat!("`", stringify!($get), "` in [0, 1]")]
                pub fn $get(&self) -> f32 {
                    self.$get
                }

                #[doc = concat!("Set `", stringify!($get), "`, clamped to [0, 1]")]
                pub fn $set(&mut self, value: f32) {
                    self.$get = value.clamp(0.0, 1.0);
                }
            )+
        }
    };
}

unit_interval_accessors!(TextComponent {
    metallness / set_metallness,
    roughness / set_roughness,
    ao / set_ao,
    opacity / set_opacity,
    opacity_mask / set_opacity_mask,
});

impl TextComponent {
    /// Create a text component
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Screen-space text overlay; positions are normalized screen coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Text2DComponent {
    /// Font asset, null for the default font
    pub font: Guid,
    /// UTF-8 text
    pub text: String,
    /// Text color
    pub color: Color3,
    /// Screen position
    pub position: Vector2,
    /// Scale
    pub scale: Vector2,
    /// Rotation in degrees
    pub rotation: f32,
    opacity: f32,
    /// Extra horizontal spacing between glyphs
    pub kerning: f32,
    /// Extra vertical spacing between lines
    pub line_spacing: f32,
    /// Wrap width
    pub max_width: f32,
    /// Hidden overlays are not drawn
    pub visible: bool,
}

impl Default for Text2DComponent {
    fn default() -> Self {
        Self {
            font: Guid::NULL,
            text: String::new(),
            color: Color3::WHITE,
            position: Vector2::ZERO,
            scale: Vector2::ONE,
            rotation: 0.0,
            opacity: 1.0,
            kerning: 0.0,
            line_spacing: 0.0,
            max_width: 10.0,
            visible: true,
        }
    }
}

unit_interval_accessors!(Text2DComponent { opacity / set_opacity });

/// Screen-space image overlay
#[derive(Debug, Clone, PartialEq)]
pub struct Image2DComponent {
    /// Texture asset
    pub texture: Guid,
    /// Tint multiplied with the texture
    pub tint: Color3,
    /// Screen position
    pub position: Vector2,
    /// Scale
    pub scale: Vector2,
    /// Rotation in degrees
    pub rotation: f32,
    opacity: f32,
    /// Hidden overlays are not drawn
    pub visible: bool,
}

impl Default for Image2DComponent {
    fn default() -> Self {
        Self {
            texture: Guid::NULL,
            tint: Color3::WHITE,
            position: Vector2::ZERO,
            scale: Vector2::ONE,
            rotation: 0.0,
            opacity: 1.0,
            visible: true,
        }
    }
}

unit_interval_accessors!(Image2DComponent { opacity / set_opacity });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_params_clamp_to_unit_interval() {
        let mut text = TextComponent::new("Score: 0");
        text.set_roughness(3.0);
        text.set_opacity(-1.0);

        assert_eq!(text.roughness(), 1.0);
        assert_eq!(text.opacity(), 0.0);
        assert_eq!(text.text, "Score: 0");
    }

    #[test]
    fn test_overlay_defaults_visible() {
        assert!(Text2DComponent::default().visible);
        assert_eq!(Image2DComponent::default().opacity(), 1.0);
    }
}
