//! Collider components
//!
//! Box, sphere, capsule and mesh colliders share [`ColliderProperties`]
//! (surface response and trigger flag) and are reached polymorphically
//! through the [`Collider`] trait.

use super::SceneComponent;
use crate::assets::PhysicsMaterial;
use crate::foundation::guid::Guid;
use crate::foundation::math::{Transform, Vector3};

/// Surface response shared by every collider type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderProperties {
    static_friction: f32,
    dynamic_friction: f32,
    bounciness: f32,
    /// Trigger colliders report overlaps instead of blocking
    pub is_trigger: bool,
    /// Draw the collision shape for debugging
    pub show_collision: bool,
}

impl Default for ColliderProperties {
    fn default() -> Self {
        Self {
            static_friction: 0.6,
            dynamic_friction: 0.6,
            bounciness: 0.0,
            is_trigger: false,
            show_collision: false,
        }
    }
}

impl ColliderProperties {
    /// Friction coefficient at rest
    pub fn static_friction(&self) -> f32 {
        self.static_friction
    }

    /// Set static friction (negative values clamp to zero)
    pub fn set_static_friction(&mut self, friction: f32) {
        self.static_friction = friction.max(0.0);
    }

    /// Friction coefficient while sliding
    pub fn dynamic_friction(&self) -> f32 {
        self.dynamic_friction
    }

    /// Set dynamic friction (negative values clamp to zero)
    pub fn set_dynamic_friction(&mut self, friction: f32) {
        self.dynamic_friction = friction.max(0.0);
    }

    /// Restitution in [0, 1]
    pub fn bounciness(&self) -> f32 {
        self.bounciness
    }

    /// Set restitution, clamped to [0, 1]
    pub fn set_bounciness(&mut self, bounciness: f32) {
        self.bounciness = bounciness.clamp(0.0, 1.0);
    }

    /// Copy friction and restitution from a physics material asset
    pub fn apply_material(&mut self, material: &PhysicsMaterial) {
        self.set_static_friction(material.static_friction);
        self.set_dynamic_friction(material.dynamic_friction);
        self.set_bounciness(material.bounciness);
    }
}

/// Local-space collision geometry, before the collider's transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// Oriented box
    Box {
        /// Half the box size along each axis
        half_extents: Vector3,
    },
    /// Sphere centered on the collider
    Sphere {
        /// Radius
        radius: f32,
    },
    /// Y-aligned capsule
    Capsule {
        /// Radius of the caps and cylinder
        radius: f32,
        /// Height of the cylindrical part
        height: f32,
    },
    /// Triangle mesh asset
    Mesh {
        /// Mesh asset
        mesh: Guid,
    },
}

/// Common contract of all collider components
pub trait Collider: SceneComponent {
    /// Shared surface properties
    fn properties(&self) -> &ColliderProperties;

    /// Shared surface properties, mutable
    fn properties_mut(&mut self) -> &mut ColliderProperties;

    /// Collision geometry
    fn shape(&self) -> ColliderShape;
}

/// Box-shaped collider
#[derive(Debug, Clone, PartialEq)]
pub struct BoxColliderComponent {
    /// Transform relative to the owning entity
    pub transform: Transform,
    /// Shared surface properties
    pub collider: ColliderProperties,
    size: Vector3,
}

impl Default for BoxColliderComponent {
    fn default() -> Self {
        Self {
            transform: Transform::IDENTITY,
            collider: ColliderProperties::default(),
            size: Vector3::ONE,
        }
    }
}

impl BoxColliderComponent {
    /// Create a box collider of the given full size
    pub fn new(size: Vector3) -> Self {
        let mut collider = Self::default();
        collider.set_size(size);
        collider
    }

    /// Full size along each axis
    pub fn size(&self) -> Vector3 {
        self.size
    }

    /// Set the full size (negative components clamp to zero)
    pub fn set_size(&mut self, size: Vector3) {
        self.size = size.max(Vector3::ZERO);
    }
}

/// Sphere-shaped collider
#[derive(Debug, Clone, PartialEq)]
pub struct SphereColliderComponent {
    /// Transform relative to the owning entity
    pub transform: Transform,
    /// Shared surface properties
    pub collider: ColliderProperties,
    radius: f32,
}

impl Default for SphereColliderComponent {
    fn default() -> Self {
        Self {
            transform: Transform::IDENTITY,
            collider: ColliderProperties::default(),
            radius: 0.5,
        }
    }
}

impl SphereColliderComponent {
    /// Create a sphere collider
    pub fn new(radius: f32) -> Self {
        let mut collider = Self::default();
        collider.set_radius(radius);
        collider
    }

    /// Radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Set the radius (negative values clamp to zero)
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }
}

/// Capsule-shaped collider aligned with the local Y axis
#[derive(Debug, Clone, PartialEq)]
pub struct CapsuleColliderComponent {
    /// Transform relative to the owning entity
    pub transform: Transform,
    /// Shared surface properties
    pub collider: ColliderProperties,
    radius: f32,
    height: f32,
}

impl Default for CapsuleColliderComponent {
    fn default() -> Self {
        Self {
            transform: Transform::IDENTITY,
            collider: ColliderProperties::default(),
            radius: 0.5,
            height: 1.0,
        }
    }
}

impl CapsuleColliderComponent {
    /// Radius of caps and cylinder
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Set the radius (negative values clamp to zero)
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }

    /// Height of the cylindrical part
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Set the cylinder height (negative values clamp to zero)
    pub fn set_height(&mut self, height: f32) {
        self.height = height.max(0.0);
    }
}

/// Collider built from a mesh asset
#[derive(Debug, Clone, PartialEq)]
pub struct MeshColliderComponent {
    /// Transform relative to the owning entity
    pub transform: Transform,
    /// Shared surface properties
    pub collider: ColliderProperties,
    /// Mesh asset used for collision
    pub collision_mesh: Guid,
    /// Cook as a convex hull instead of a triangle mesh
    pub is_convex: bool,
    /// Collide with both faces of each triangle
    pub is_two_sided: bool,
}

impl Default for MeshColliderComponent {
    fn default() -> Self {
        Self {
            transform: Transform::IDENTITY,
            collider: ColliderProperties::default(),
            collision_mesh: Guid::NULL,
            is_convex: true,
            is_two_sided: false,
        }
    }
}

macro_rules! impl_collider {
    ($($ty:ty => |$this:ident| $shape:expr),+ $(,)?) => {
        $(
            impl Collider for $ty {
                fn properties(&self) -> &ColliderProperties {
                    &self.collider
                }

                fn properties_mut(&mut self) -> &mut ColliderProperties {
                    &mut self.collider
                }

                fn shape(&self) -> ColliderShape {
                    let $this = self;
                    $shape
                }
            }
        )+
    };
}

impl_collider! {
    BoxColliderComponent => |c| ColliderShape::Box { half_extents: c.size * 0.5 },
    SphereColliderComponent => |c| ColliderShape::Sphere { radius: c.radius },
    CapsuleColliderComponent => |c| ColliderShape::Capsule { radius: c.radius, height: c.height },
    MeshColliderComponent => |c| ColliderShape::Mesh { mesh: c.collision_mesh },
}
