//! Renderer settings reachable from scripts
//!
//! Rendering itself happens in the engine. Scripts read and write the
//! settings below through the script context; values with an engine-side
//! constraint go through clamping setters.

use serde::{Deserialize, Serialize};

use crate::foundation::guid::Guid;
use crate::foundation::math::Color3;

mod material;

pub use material::{Material, MaterialBlendMode};

/// Fog falloff curve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum FogEquation {
    /// Linear between min and max distance
    #[default]
    Linear = 0,
    /// Exponential in density
    Exponential = 1,
    /// Squared exponential in density
    Exponential2 = 2,
}

/// Tonemapping operator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum TonemappingMethod {
    /// Clamp only
    None = 0,
    /// Reinhard
    Reinhard = 1,
    /// Filmic curve with a configurable white point
    Filmic = 2,
    /// ACES approximation
    #[default]
    ACES = 3,
    /// Physically based camera exposure
    PhotoLinear = 4,
}

/// Screen-space ambient occlusion technique
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum AmbientOcclusion {
    /// Disabled
    #[default]
    None = 0,
    /// Screen-space ambient occlusion
    SSAO = 1,
    /// Ground-truth ambient occlusion
    GTAO = 2,
}

/// Anti-aliasing technique
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum AAMethod {
    /// Disabled
    #[default]
    None = 0,
    /// Temporal anti-aliasing
    TAA = 1,
}

/// Distance fog
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogSettings {
    /// Fog color
    pub color: Color3,
    /// Anything closer is unfogged
    pub min_distance: f32,
    /// Anything further is fully fogged
    pub max_distance: f32,
    /// Density for the exponential equations
    pub density: f32,
    /// Falloff curve
    pub equation: FogEquation,
    /// Whether fog is drawn
    pub enabled: bool,
}

impl Default for FogSettings {
    fn default() -> Self {
        Self {
            color: Color3::WHITE,
            min_distance: 5.0,
            max_distance: 50.0,
            density: 0.05,
            equation: FogEquation::Linear,
            enabled: false,
        }
    }
}

/// Bloom post-process
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomSettings {
    /// Lens dirt texture, null for none
    pub dirt_texture: Guid,
    /// Brightness above which pixels bloom
    pub threshold: f32,
    /// Bloom strength
    pub intensity: f32,
    /// Lens dirt strength
    pub dirt_intensity: f32,
    /// Soft threshold knee
    pub knee: f32,
    /// Whether bloom is applied
    pub enabled: bool,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            dirt_texture: Guid::NULL,
            threshold: 1.5,
            intensity: 1.0,
            dirt_intensity: 1.0,
            knee: 0.1,
            enabled: true,
        }
    }
}

/// SSAO parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SsaoSettings {
    samples: u32,
    radius: f32,
    bias: f32,
}

impl Default for SsaoSettings {
    fn default() -> Self {
        Self {
            samples: 64,
            radius: 0.3,
            bias: 0.025,
        }
    }
}

impl SsaoSettings {
    /// Kernel sample count, always even and at least 2
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Set the sample count; raised to 2 and rounded down to even
    pub fn set_samples(&mut self, samples: u32) {
        self.samples = samples.max(2) & !1;
    }

    /// Sampling radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Set the radius (negative values clamp to zero)
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }

    /// Depth bias
    pub fn bias(&self) -> f32 {
        self.bias
    }

    /// Set the bias (negative values clamp to zero)
    pub fn set_bias(&mut self, bias: f32) {
        self.bias = bias.max(0.0);
    }
}

/// GTAO parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GtaoSettings {
    samples: u32,
    radius: f32,
}

impl Default for GtaoSettings {
    fn default() -> Self {
        Self { samples: 8, radius: 0.5 }
    }
}

impl GtaoSettings {
    /// Samples per direction, at least 1
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Set the samples per direction; raised to 1
    pub fn set_samples(&mut self, samples: u32) {
        self.samples = samples.max(1);
    }

    /// Sampling radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Set the radius (negative values clamp to zero)
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }
}

/// Parameters of [`TonemappingMethod::PhotoLinear`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoLinearTonemappingSettings {
    /// Sensor sensitivity
    pub sensitivity: f32,
    /// Exposure time in seconds
    pub exposure_time: f32,
    /// Aperture f-number
    pub f_stop: f32,
}

impl Default for PhotoLinearTonemappingSettings {
    fn default() -> Self {
        Self {
            sensitivity: 1.0,
            exposure_time: 0.12,
            f_stop: 1.0,
        }
    }
}

/// Parameters of [`TonemappingMethod::Filmic`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilmicTonemappingSettings {
    /// Linear value mapped to white
    pub white_point: f32,
}

impl Default for FilmicTonemappingSettings {
    fn default() -> Self {
        Self { white_point: 1.0 }
    }
}

/// Environment cubemap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyboxSettings {
    /// Cubemap asset, null for none
    pub cubemap: Guid,
    /// Brightness multiplier
    pub intensity: f32,
    /// Whether the skybox is drawn
    pub enabled: bool,
}

impl Default for SkyboxSettings {
    fn default() -> Self {
        Self {
            cubemap: Guid::NULL,
            intensity: 1.0,
            enabled: true,
        }
    }
}

/// Every renderer setting exposed to scripts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    /// Distance fog
    pub fog: FogSettings,
    /// Bloom
    pub bloom: BloomSettings,
    /// SSAO parameters
    pub ssao: SsaoSettings,
    /// GTAO parameters
    pub gtao: GtaoSettings,
    /// Photo-linear tonemapping parameters
    pub photo_linear: PhotoLinearTonemappingSettings,
    /// Filmic tonemapping parameters
    pub filmic: FilmicTonemappingSettings,
    /// Skybox
    pub skybox: SkyboxSettings,
    /// Tonemapping operator
    pub tonemapping: TonemappingMethod,
    /// Ambient occlusion technique
    pub ambient_occlusion: AmbientOcclusion,
    /// Anti-aliasing technique
    pub anti_aliasing: AAMethod,
    gamma: f32,
    exposure: f32,
    line_width: f32,
    /// Percentage-closer soft shadows
    pub soft_shadows: bool,
    /// Tint shadow cascades for debugging
    pub visualize_cascades: bool,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            fog: FogSettings::default(),
            bloom: BloomSettings::default(),
            ssao: SsaoSettings::default(),
            gtao: GtaoSettings::default(),
            photo_linear: PhotoLinearTonemappingSettings::default(),
            filmic: FilmicTonemappingSettings::default(),
            skybox: SkyboxSettings::default(),
            tonemapping: TonemappingMethod::ACES,
            ambient_occlusion: AmbientOcclusion::None,
            anti_aliasing: AAMethod::None,
            gamma: 2.2,
            exposure: 1.0,
            line_width: 2.5,
            soft_shadows: true,
            visualize_cascades: false,
        }
    }
}

impl RendererSettings {
    /// Display gamma
    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    /// Set display gamma (kept positive)
    pub fn set_gamma(&mut self, gamma: f32) {
        self.gamma = gamma.max(f32::EPSILON);
    }

    /// Exposure multiplier
    pub fn exposure(&self) -> f32 {
        self.exposure
    }

    /// Set exposure (negative values clamp to zero)
    pub fn set_exposure(&mut self, exposure: f32) {
        self.exposure = exposure.max(0.0);
    }

    /// Debug line width in pixels
    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    /// Set the debug line width (at least one pixel)
    pub fn set_line_width(&mut self, width: f32) {
        self.line_width = width.max(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_engine() {
        let settings = RendererSettings::default();

        assert_eq!(settings.gamma(), 2.2);
        assert_eq!(settings.tonemapping, TonemappingMethod::ACES);
        assert_eq!(settings.ssao.samples(), 64);
        assert_eq!(settings.gtao.samples(), 8);
        assert!(!settings.fog.enabled);
        assert!(settings.bloom.enabled);
        assert!(settings.soft_shadows);
    }

    #[test]
    fn test_ssao_samples_even_and_at_least_two() {
        let mut ssao = SsaoSettings::default();

        ssao.set_samples(0);
        assert_eq!(ssao.samples(), 2);
        ssao.set_samples(33);
        assert_eq!(ssao.samples(), 32);
        ssao.set_radius(-1.0);
        assert_eq!(ssao.radius(), 0.0);
    }

    #[test]
    fn test_gtao_samples_at_least_one() {
        let mut gtao = GtaoSettings::default();
        gtao.set_samples(0);
        assert_eq!(gtao.samples(), 1);
    }

    #[test]
    fn test_enum_values_match_engine() {
        assert_eq!(TonemappingMethod::PhotoLinear as u32, 4);
        assert_eq!(FogEquation::Exponential2 as u32, 2);
        assert_eq!(AmbientOcclusion::GTAO as u32, 2);
        assert_eq!(MaterialBlendMode::Masked as u32, 2);
    }

    #[test]
    fn test_settings_round_trip_through_ron() {
        let mut settings = RendererSettings::default();
        settings.fog.enabled = true;
        settings.ssao.set_samples(16);

        let text = ron::to_string(&settings).unwrap();
        let parsed: RendererSettings = ron::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
