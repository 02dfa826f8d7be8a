//! Component types attached to entities
//!
//! Components are plain data. Values that carry an engine-side constraint
//! (non-negative sizes, cone angles, mass) are private with clamping setters;
//! everything else is a public field.

use crate::foundation::math::Transform;

pub mod audio;
pub mod camera;
pub mod collider;
pub mod light;
pub mod mesh;
pub mod rigid_body;
pub mod text;
pub mod transform;

pub use audio::{AudioComponent, ReverbComponent};
pub use camera::{CameraComponent, CameraProjectionMode};
pub use collider::{
    BoxColliderComponent, CapsuleColliderComponent, Collider, ColliderProperties, ColliderShape,
    MeshColliderComponent, SphereColliderComponent,
};
pub use light::{
    DirectionalLightComponent, Light, LightProperties, PointLightComponent, SpotLightComponent,
};
pub use mesh::StaticMeshComponent;
pub use rigid_body::{BodyNotDynamic, RigidBodyComponent};
pub use text::{Image2DComponent, Text2DComponent, TextComponent};
pub use transform::TransformComponent;

/// A component placed in the scene with its own transform relative to the
/// owning entity
pub trait SceneComponent {
    /// Transform relative to the owning entity
    fn relative_transform(&self) -> Transform;

    /// Replace the transform relative to the owning entity
    fn set_relative_transform(&mut self, transform: Transform);
}

macro_rules! impl_scene_component {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl SceneComponent for $ty {
                fn relative_transform(&self) -> Transform {
                    self.transform
                }

                fn set_relative_transform(&mut self, transform: Transform) {
                    self.transform = transform;
                }
            }
        )+
    };
}

impl_scene_component!(
    TransformComponent,
    PointLightComponent,
    DirectionalLightComponent,
    SpotLightComponent,
    StaticMeshComponent,
    BoxColliderComponent,
    SphereColliderComponent,
    CapsuleColliderComponent,
    MeshColliderComponent,
    AudioComponent,
    ReverbComponent,
    CameraComponent,
    TextComponent,
);
