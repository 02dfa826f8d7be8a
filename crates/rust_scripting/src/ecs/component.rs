//! Component kinds and per-kind storage
//!
//! The set of component types is closed: every type is listed once in the
//! registry below, which produces the [`ComponentKind`] tag enum, one
//! `SecondaryMap` per type, and the [`Component`] impls tying them together.
//! Polymorphic access (lights, colliders, scene components) resolves the tag
//! with a `match`, never with runtime type information.

use serde::{Deserialize, Serialize};
use slotmap::SecondaryMap;

use super::components::{
    AudioComponent, BoxColliderComponent, CameraComponent, CapsuleColliderComponent,
    DirectionalLightComponent, Image2DComponent, MeshColliderComponent, PointLightComponent,
    ReverbComponent, RigidBodyComponent, SphereColliderComponent, SpotLightComponent,
    StaticMeshComponent, Text2DComponent, TextComponent, TransformComponent,
};
use super::EntityKey;

mod sealed {
    pub trait Sealed {}
}

/// Data attached to an entity, at most one instance per type
pub trait Component: sealed::Sealed + Clone + std::fmt::Debug + 'static {
    /// Tag identifying this component type
    const KIND: ComponentKind;

    #[doc(hidden)]
    fn storage(store: &ComponentStore) -> &SecondaryMap<EntityKey, Self>;

    #[doc(hidden)]
    fn storage_mut(store: &mut ComponentStore) -> &mut SecondaryMap<EntityKey, Self>;
}

macro_rules! component_registry {
    ($( $kind:ident => $ty:ident in $field:ident ),+ $(,)?) => {
        /// Tag for every component type the store knows about
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(u32)]
        pub enum ComponentKind {
            $(
                #[doc = concat!("[`", stringify!($ty), "`]")]
                $kind,
            )+
        }

        impl ComponentKind {
            /// Every kind, in declaration order
            pub const ALL: &'static [ComponentKind] = &[$(ComponentKind::$kind),+];

            /// Type name of the component
            pub const fn name(self) -> &'static str {
                match self {
                    $(ComponentKind::$kind => stringify!($ty),)+
                }
            }
        }

        /// Per-kind component storage, keyed by entity
        #[derive(Default)]
        pub struct ComponentStore {
            $($field: SecondaryMap<EntityKey, $ty>,)+
        }

        impl ComponentStore {
            pub(crate) fn has(&self, key: EntityKey, kind: ComponentKind) -> bool {
                match kind {
                    $(ComponentKind::$kind => self.$field.contains_key(key),)+
                }
            }

            pub(crate) fn remove_all(&mut self, key: EntityKey) {
                $(self.$field.remove(key);)+
            }
        }

        $(
            impl sealed::Sealed for $ty {}

            impl Component for $ty {
                const KIND: ComponentKind = ComponentKind::$kind;

                fn storage(store: &ComponentStore) -> &SecondaryMap<EntityKey, Self> {
                    &store.$field
                }

                fn storage_mut(store: &mut ComponentStore) -> &mut SecondaryMap<EntityKey, Self> {
                    &mut store.$field
                }
            }
        )+
    };
}

component_registry! {
    Transform => TransformComponent in transforms,
    PointLight => PointLightComponent in point_lights,
    DirectionalLight => DirectionalLightComponent in directional_lights,
    SpotLight => SpotLightComponent in spot_lights,
    StaticMesh => StaticMeshComponent in static_meshes,
    BoxCollider => BoxColliderComponent in box_colliders,
    SphereCollider => SphereColliderComponent in sphere_colliders,
    CapsuleCollider => CapsuleColliderComponent in capsule_colliders,
    MeshCollider => MeshColliderComponent in mesh_colliders,
    RigidBody => RigidBodyComponent in rigid_bodies,
    Audio => AudioComponent in audio_sources,
    Reverb => ReverbComponent in reverbs,
    Camera => CameraComponent in cameras,
    Text => TextComponent in texts,
    Text2D => Text2DComponent in texts_2d,
    Image2D => Image2DComponent in images_2d,
}

impl ComponentKind {
    /// Whether the kind is a light
    pub const fn is_light(self) -> bool {
        matches!(self, Self::PointLight | Self::DirectionalLight | Self::SpotLight)
    }

    /// Whether the kind is a collider
    pub const fn is_collider(self) -> bool {
        matches!(
            self,
            Self::BoxCollider | Self::SphereCollider | Self::CapsuleCollider | Self::MeshCollider
        )
    }

    /// Whether the kind carries its own transform relative to the entity
    pub const fn is_scene_component(self) -> bool {
        !matches!(self, Self::RigidBody | Self::Text2D | Self::Image2D)
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_categories() {
        assert!(ComponentKind::SpotLight.is_light());
        assert!(!ComponentKind::SpotLight.is_collider());
        assert!(ComponentKind::MeshCollider.is_collider());
        assert!(ComponentKind::Camera.is_scene_component());
        assert!(!ComponentKind::RigidBody.is_scene_component());
    }

    #[test]
    fn test_kind_tags_match_types() {
        assert_eq!(PointLightComponent::KIND, ComponentKind::PointLight);
        assert_eq!(RigidBodyComponent::KIND.name(), "RigidBodyComponent");
        assert_eq!(ComponentKind::ALL.len(), 16);
    }
}
