//! Camera component

use serde::{Deserialize, Serialize};

use crate::foundation::math::{constants::DEG_TO_RAD, Mat4, Transform};

/// Projection used by a camera
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum CameraProjectionMode {
    /// Perspective projection
    #[default]
    Perspective = 0,
    /// Orthographic projection
    Orthographic = 1,
}

/// Camera looking along the entity's forward vector
#[derive(Debug, Clone, PartialEq)]
pub struct CameraComponent {
    /// Transform relative to the owning entity
    pub transform: Transform,
    /// Projection mode
    pub projection_mode: CameraProjectionMode,
    /// The primary camera renders the scene
    pub primary: bool,
    perspective_vertical_fov: f32,
    perspective_near: f32,
    perspective_far: f32,
    orthographic_size: f32,
    orthographic_near: f32,
    orthographic_far: f32,
    shadow_far: f32,
    cascades_split_alpha: f32,
    cascades_smooth_transition_alpha: f32,
}

impl Default for CameraComponent {
    fn default() -> Self {
        Self {
            transform: Transform::IDENTITY,
            projection_mode: CameraProjectionMode::Perspective,
            primary: false,
            perspective_vertical_fov: 45.0,
            perspective_near: 0.01,
            perspective_far: 1000.0,
            orthographic_size: 10.0,
            orthographic_near: -1.0,
            orthographic_far: 1.0,
            shadow_far: 500.0,
            cascades_split_alpha: 0.91,
            cascades_smooth_transition_alpha: 0.2,
        }
    }
}

impl CameraComponent {
    /// Create the primary perspective camera
    pub fn primary() -> Self {
        Self {
            primary: true,
            ..Self::default()
        }
    }

    /// Vertical field of view in degrees
    pub fn perspective_vertical_fov(&self) -> f32 {
        self.perspective_vertical_fov
    }

    /// Set the vertical field of view, clamped to [1, 179] degrees
    pub fn set_perspective_vertical_fov(&mut self, degrees: f32) {
        self.perspective_vertical_fov = degrees.clamp(1.0, 179.0);
    }

    /// Perspective near clip
    pub fn perspective_near_clip(&self) -> f32 {
        self.perspective_near
    }

    /// Set the perspective near clip (kept positive)
    pub fn set_perspective_near_clip(&mut self, near: f32) {
        self.perspective_near = near.max(1.0e-4);
    }

    /// Perspective far clip
    pub fn perspective_far_clip(&self) -> f32 {
        self.perspective_far
    }

    /// Set the perspective far clip (kept beyond the near clip)
    pub fn set_perspective_far_clip(&mut self, far: f32) {
        self.perspective_far = far.max(self.perspective_near + 1.0e-3);
    }

    /// Half the vertical extent of the orthographic view
    pub fn orthographic_size(&self) -> f32 {
        self.orthographic_size
    }

    /// Set the orthographic size (kept positive)
    pub fn set_orthographic_size(&mut self, size: f32) {
        self.orthographic_size = size.max(1.0e-3);
    }

    /// Orthographic near and far clip
    pub fn orthographic_clips(&self) -> (f32, f32) {
        (self.orthographic_near, self.orthographic_far)
    }

    /// Set orthographic clips; `far` is kept beyond `near`
    pub fn set_orthographic_clips(&mut self, near: f32, far: f32) {
        self.orthographic_near = near;
        self.orthographic_far = far.max(near + 1.0e-3);
    }

    /// Distance up to which shadows are rendered
    pub fn shadow_far_clip(&self) -> f32 {
        self.shadow_far
    }

    /// Set the shadow distance (negative values clamp to zero)
    pub fn set_shadow_far_clip(&mut self, far: f32) {
        self.shadow_far = far.max(0.0);
    }

    /// Blend between uniform and logarithmic cascade splits
    pub fn cascades_split_alpha(&self) -> f32 {
        self.cascades_split_alpha
    }

    /// Set the cascade split blend, clamped to [0, 1]
    pub fn set_cascades_split_alpha(&mut self, alpha: f32) {
        self.cascades_split_alpha = alpha.clamp(0.0, 1.0);
    }

    /// Portion of each cascade used to fade into the next
    pub fn cascades_smooth_transition_alpha(&self) -> f32 {
        self.cascades_smooth_transition_alpha
    }

    /// Set the cascade transition width, clamped to [0, 1]
    pub fn set_cascades_smooth_transition_alpha(&mut self, alpha: f32) {
        self.cascades_smooth_transition_alpha = alpha.clamp(0.0, 1.0);
    }

    /// Projection matrix for a viewport aspect ratio (width / height)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect > 0.0 { aspect } else { 1.0 };
        match self.projection_mode {
            CameraProjectionMode::Perspective => nalgebra::Perspective3::new(
                aspect,
                self.perspective_vertical_fov * DEG_TO_RAD,
                self.perspective_near,
                self.perspective_far,
            )
            .to_homogeneous(),
            CameraProjectionMode::Orthographic => {
                let half_height = self.orthographic_size * 0.5;
                let half_width = half_height * aspect;
                nalgebra::Orthographic3::new(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.orthographic_near,
                    self.orthographic_far,
                )
                .to_homogeneous()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clip_planes_stay_ordered() {
        let mut camera = CameraComponent::default();
        camera.set_perspective_near_clip(-3.0);
        camera.set_perspective_far_clip(0.0);

        assert!(camera.perspective_near_clip() > 0.0);
        assert!(camera.perspective_far_clip() > camera.perspective_near_clip());
    }

    #[test]
    fn test_perspective_projection_uses_fov() {
        let mut camera = CameraComponent::default();
        camera.set_perspective_vertical_fov(90.0);

        let projection = camera.projection_matrix(2.0);
        // cot(45 degrees) = 1 for the vertical scale, halved horizontally
        assert_relative_eq!(projection.m22, 1.0, epsilon = 1e-5);
        assert_relative_eq!(projection.m11, 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_orthographic_projection_scales_by_size() {
        let mut camera = CameraComponent::default();
        camera.projection_mode = CameraProjectionMode::Orthographic;
        camera.set_orthographic_size(4.0);

        let projection = camera.projection_matrix(1.0);
        assert_relative_eq!(projection.m22, 0.5, epsilon = 1e-5);
    }
}
