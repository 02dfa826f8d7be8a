//! Light components
//!
//! Point, directional and spot lights share [`LightProperties`] and are
//! reached polymorphically through the [`Light`] trait.

use super::SceneComponent;
use crate::foundation::math::{Color3, Transform};

/// Properties shared by every light type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightProperties {
    /// Diffuse light color
    pub light_color: Color3,
    /// Ambient contribution
    pub ambient_color: Color3,
    /// Specular highlight color
    pub specular_color: Color3,
    /// Whether the light contributes to world lighting at all
    pub affects_world: bool,
    /// Whether the light casts shadows
    pub casts_shadows: bool,
    /// Editor visualization of the light's reach
    pub visualize_distance: bool,
}

impl Default for LightProperties {
    fn default() -> Self {
        Self {
            light_color: Color3::WHITE,
            ambient_color: Color3::splat(0.1),
            specular_color: Color3::splat(0.5),
            affects_world: true,
            casts_shadows: false,
            visualize_distance: false,
        }
    }
}

/// Common contract of all light components
pub trait Light: SceneComponent {
    /// Shared light properties
    fn properties(&self) -> &LightProperties;

    /// Shared light properties, mutable
    fn properties_mut(&mut self) -> &mut LightProperties;

    /// Brightness multiplier
    fn intensity(&self) -> f32;

    /// Set the brightness multiplier (negative values clamp to zero)
    fn set_intensity(&mut self, intensity: f32);
}

macro_rules! impl_light {
    ($($ty:ty),+) => {
        $(
            impl Light for $ty {
                fn properties(&self) -> &LightProperties {
                    &self.light
                }

                fn properties_mut(&mut self) -> &mut LightProperties {
                    &mut self.light
                }

                fn intensity(&self) -> f32 {
                    self.intensity
                }

                fn set_intensity(&mut self, intensity: f32) {
                    self.intensity = intensity.max(0.0);
                }
            }
        )+
    };
}

impl_light!(PointLightComponent, DirectionalLightComponent, SpotLightComponent);

/// Omnidirectional light radiating from a point
#[derive(Debug, Clone, PartialEq)]
pub struct PointLightComponent {
    /// Transform relative to the owning entity
    pub transform: Transform,
    /// Shared light properties
    pub light: LightProperties,
    intensity: f32,
    radius: f32,
}

impl Default for PointLightComponent {
    fn default() -> Self {
        Self {
            transform: Transform::IDENTITY,
            light: LightProperties::default(),
            intensity: 1.0,
            radius: 10.0,
        }
    }
}

impl PointLightComponent {
    /// Builder: set the light color
    pub fn with_color(mut self, color: Color3) -> Self {
        self.light.light_color = color;
        self
    }

    /// Builder: set the intensity
    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.set_intensity(intensity);
        self
    }

    /// Attenuation radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Set the attenuation radius (negative values clamp to zero)
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }
}

/// Infinitely distant light with parallel rays along the entity's forward vector
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLightComponent {
    /// Transform relative to the owning entity
    pub transform: Transform,
    /// Shared light properties
    pub light: LightProperties,
    intensity: f32,
}

impl Default for DirectionalLightComponent {
    fn default() -> Self {
        Self {
            transform: Transform::IDENTITY,
            light: LightProperties {
                casts_shadows: true,
                ..LightProperties::default()
            },
            intensity: 1.0,
        }
    }
}

/// Cone light; angles are half-angles in degrees
#[derive(Debug, Clone, PartialEq)]
pub struct SpotLightComponent {
    /// Transform relative to the owning entity
    pub transform: Transform,
    /// Shared light properties
    pub light: LightProperties,
    intensity: f32,
    inner_cutoff_angle: f32,
    outer_cutoff_angle: f32,
    distance: f32,
}

impl Default for SpotLightComponent {
    fn default() -> Self {
        Self {
            transform: Transform::IDENTITY,
            light: LightProperties::default(),
            intensity: 1.0,
            inner_cutoff_angle: 25.0,
            outer_cutoff_angle: 45.0,
            distance: 10.0,
        }
    }
}

impl SpotLightComponent {
    /// Largest allowed cone half-angle
    pub const MAX_CUTOFF_ANGLE: f32 = 90.0;

    /// Inner cone half-angle (full intensity)
    pub fn inner_cutoff_angle(&self) -> f32 {
        self.inner_cutoff_angle
    }

    /// Set the inner half-angle, clamped to `[0, outer]`
    pub fn set_inner_cutoff_angle(&mut self, degrees: f32) {
        self.inner_cutoff_angle = degrees.max(0.0).min(self.outer_cutoff_angle);
    }

    /// Outer cone half-angle (falloff reaches zero)
    pub fn outer_cutoff_angle(&self) -> f32 {
        self.outer_cutoff_angle
    }

    /// Set the outer half-angle, clamped to `[inner, 90]`
    pub fn set_outer_cutoff_angle(&mut self, degrees: f32) {
        self.outer_cutoff_angle = degrees.min(Self::MAX_CUTOFF_ANGLE).max(self.inner_cutoff_angle);
    }

    /// Reach of the light
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Set the reach (negative values clamp to zero)
    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.max(0.0);
    }
}
