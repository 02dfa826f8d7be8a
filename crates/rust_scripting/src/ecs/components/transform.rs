//! Transform component
//!
//! Every entity owns exactly one. Its transform is the entity's transform
//! relative to its parent (or to the world for root entities).

use crate::foundation::math::{Rotator, Transform, Vector3};

/// The entity's own transform relative to its parent
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransformComponent {
    /// Transform relative to the parent entity
    pub transform: Transform,
}

impl TransformComponent {
    /// Create from a relative transform
    pub const fn new(transform: Transform) -> Self {
        Self { transform }
    }

    /// Create from a location only
    pub const fn from_location(location: Vector3) -> Self {
        Self::new(Transform::from_location(location))
    }

    /// Create from location and rotation
    pub const fn from_location_rotation(location: Vector3, rotation: Rotator) -> Self {
        Self::new(Transform::from_location(location).with_rotation(rotation))
    }
}

impl From<Transform> for TransformComponent {
    fn from(transform: Transform) -> Self {
        Self::new(transform)
    }
}
