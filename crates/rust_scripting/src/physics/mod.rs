//! Physics types and the rigid body integrator
//!
//! Contact generation and resolution belong to the embedding engine, which
//! reports contacts to the host. This module integrates rigid body motion
//! once per fixed step and answers ray queries against collider shapes.

use serde::{Deserialize, Serialize};

use crate::foundation::guid::Guid;
use crate::foundation::math::Vector3;

mod integrator;
mod raycast;

pub use integrator::step;
pub use raycast::{raycast, Ray};

/// Fixed-step simulation settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Seconds per physics step
    pub fixed_time_step: f32,
    /// World gravity
    pub gravity: Vector3,
    /// Steps run at most per frame; older backlog is dropped
    pub max_steps_per_frame: u32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            fixed_time_step: 1.0 / 120.0,
            gravity: Vector3::new(0.0, -9.81, 0.0),
            max_steps_per_frame: 8,
        }
    }
}

/// How `add_force` and `add_torque` change a body's motion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum ForceMode {
    /// Continuous force, scaled by inverse mass over the next step
    #[default]
    Force = 0,
    /// Instant change of momentum
    Impulse = 1,
    /// Instant change of velocity, ignoring mass
    VelocityChange = 2,
    /// Continuous acceleration, ignoring mass
    Acceleration = 3,
}

bitflags::bitflags! {
    /// Axes along which a body may not move or rotate
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ActorLockFlag: u32 {
        /// Lock movement along X
        const LOCATION_X = 1 << 0;
        /// Lock movement along Y
        const LOCATION_Y = 1 << 1;
        /// Lock movement along Z
        const LOCATION_Z = 1 << 2;
        /// Lock rotation around X
        const ROTATION_X = 1 << 3;
        /// Lock rotation around Y
        const ROTATION_Y = 1 << 4;
        /// Lock rotation around Z
        const ROTATION_Z = 1 << 5;

        /// Lock all movement
        const LOCATION = Self::LOCATION_X.bits() | Self::LOCATION_Y.bits() | Self::LOCATION_Z.bits();
        /// Lock all rotation
        const ROTATION = Self::ROTATION_X.bits() | Self::ROTATION_Y.bits() | Self::ROTATION_Z.bits();
    }
}

/// Body simulation type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum PhysicsBodyType {
    /// Never moves
    #[default]
    Static = 0,
    /// Moved by forces, gravity and velocity
    Dynamic = 1,
}

/// Contact details delivered with collision callbacks
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CollisionInfo {
    /// Contact point in world space
    pub position: Vector3,
    /// Contact normal
    pub normal: Vector3,
    /// Impulse applied to resolve the contact
    pub impulse: Vector3,
    /// Force applied to resolve the contact
    pub force: Vector3,
}

/// Closest hit of a ray query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Entity owning the collider that was hit
    pub entity: Guid,
    /// Hit point in world space
    pub position: Vector3,
    /// Surface normal at the hit point
    pub normal: Vector3,
    /// Distance from the ray origin
    pub distance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_values_match_engine() {
        assert_eq!(ForceMode::Force as u32, 0);
        assert_eq!(ForceMode::Acceleration as u32, 3);
        assert_eq!(PhysicsBodyType::Dynamic as u32, 1);
        assert_eq!(ActorLockFlag::ROTATION_Z.bits(), 32);
        assert_eq!(ActorLockFlag::LOCATION.bits(), 7);
    }

    #[test]
    fn test_collision_info_layout() {
        assert_eq!(std::mem::size_of::<CollisionInfo>(), 48);
    }
}
