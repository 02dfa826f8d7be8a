//! Rigid body component
//!
//! A body is Static or Dynamic. Only dynamic bodies accept forces and
//! velocities; the integrator in [`crate::physics`] consumes the pending
//! force and moves the owning entity once per fixed step.

use crate::foundation::math::{Rotator, Vector3};
use crate::physics::{ActorLockFlag, ForceMode, PhysicsBodyType};

/// Returned when a dynamic-only operation targets a static body
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("rigid body is not dynamic")]
pub struct BodyNotDynamic;

/// Physics body driving the owning entity's transform
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBodyComponent {
    body_type: PhysicsBodyType,
    mass: f32,
    linear_damping: f32,
    angular_damping: f32,
    linear_velocity: Vector3,
    angular_velocity: Vector3,
    max_linear_velocity: f32,
    max_angular_velocity: f32,
    /// Whether gravity accelerates this body
    pub gravity_enabled: bool,
    kinematic: bool,
    kinematic_target_location: Option<Vector3>,
    kinematic_target_rotation: Option<Rotator>,
    lock_flags: ActorLockFlag,
    sleeping: bool,
    pending_linear_acceleration: Vector3,
    pending_angular_acceleration: Vector3,
}

impl Default for RigidBodyComponent {
    fn default() -> Self {
        Self {
            body_type: PhysicsBodyType::Static,
            mass: 1.0,
            linear_damping: 0.01,
            angular_damping: 0.05,
            linear_velocity: Vector3::ZERO,
            angular_velocity: Vector3::ZERO,
            max_linear_velocity: 1.0e16,
            max_angular_velocity: 100.0,
            gravity_enabled: true,
            kinematic: false,
            kinematic_target_location: None,
            kinematic_target_rotation: None,
            lock_flags: ActorLockFlag::empty(),
            sleeping: false,
            pending_linear_acceleration: Vector3::ZERO,
            pending_angular_acceleration: Vector3::ZERO,
        }
    }
}

impl RigidBodyComponent {
    /// Smallest accepted mass
    pub const MIN_MASS: f32 = 0.001;

    /// Create a dynamic body
    pub fn dynamic() -> Self {
        Self {
            body_type: PhysicsBodyType::Dynamic,
            ..Self::default()
        }
    }

    /// Create a static body
    pub fn fixed() -> Self {
        Self::default()
    }

    /// Builder: set mass
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.set_mass(mass);
        self
    }

    /// Static or dynamic
    pub fn body_type(&self) -> PhysicsBodyType {
        self.body_type
    }

    /// Change the body type; switching to static clears motion
    pub fn set_body_type(&mut self, body_type: PhysicsBodyType) {
        self.body_type = body_type;
        if body_type == PhysicsBodyType::Static {
            self.linear_velocity = Vector3::ZERO;
            self.angular_velocity = Vector3::ZERO;
            self.clear_pending();
        }
    }

    /// Whether the body is dynamic
    pub fn is_dynamic(&self) -> bool {
        self.body_type == PhysicsBodyType::Dynamic
    }

    /// Mass in kilograms
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Set mass, clamped to at least [`Self::MIN_MASS`]
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass.max(Self::MIN_MASS);
    }

    /// Linear damping coefficient
    pub fn linear_damping(&self) -> f32 {
        self.linear_damping
    }

    /// Set linear damping (negative values clamp to zero)
    pub fn set_linear_damping(&mut self, damping: f32) {
        self.linear_damping = damping.max(0.0);
    }

    /// Angular damping coefficient
    pub fn angular_damping(&self) -> f32 {
        self.angular_damping
    }

    /// Set angular damping (negative values clamp to zero)
    pub fn set_angular_damping(&mut self, damping: f32) {
        self.angular_damping = damping.max(0.0);
    }

    /// Linear velocity in world units per second
    pub fn linear_velocity(&self) -> Vector3 {
        self.linear_velocity
    }

    /// Set linear velocity and wake the body
    pub fn set_linear_velocity(&mut self, velocity: Vector3) -> Result<(), BodyNotDynamic> {
        self.ensure_dynamic()?;
        self.linear_velocity = self.apply_linear_locks(velocity);
        self.sleeping = false;
        Ok(())
    }

    /// Angular velocity in radians per second
    pub fn angular_velocity(&self) -> Vector3 {
        self.angular_velocity
    }

    /// Set angular velocity and wake the body
    pub fn set_angular_velocity(&mut self, velocity: Vector3) -> Result<(), BodyNotDynamic> {
        self.ensure_dynamic()?;
        self.angular_velocity = self.apply_angular_locks(velocity);
        self.sleeping = false;
        Ok(())
    }

    /// Linear speed cap
    pub fn max_linear_velocity(&self) -> f32 {
        self.max_linear_velocity
    }

    /// Set the linear speed cap (negative values clamp to zero)
    pub fn set_max_linear_velocity(&mut self, max: f32) {
        self.max_linear_velocity = max.max(0.0);
    }

    /// Angular speed cap
    pub fn max_angular_velocity(&self) -> f32 {
        self.max_angular_velocity
    }

    /// Set the angular speed cap (negative values clamp to zero)
    pub fn set_max_angular_velocity(&mut self, max: f32) {
        self.max_angular_velocity = max.max(0.0);
    }

    /// Whether the body is moved by kinematic targets instead of forces
    pub fn is_kinematic(&self) -> bool {
        self.kinematic
    }

    /// Toggle kinematic mode; only dynamic bodies can be kinematic
    pub fn set_kinematic(&mut self, kinematic: bool) -> Result<(), BodyNotDynamic> {
        self.ensure_dynamic()?;
        self.kinematic = kinematic;
        if !kinematic {
            self.kinematic_target_location = None;
            self.kinematic_target_rotation = None;
        }
        Ok(())
    }

    /// Set both kinematic targets
    pub fn set_kinematic_target(&mut self, location: Vector3, rotation: Rotator) -> Result<(), BodyNotDynamic> {
        self.set_kinematic_target_location(location)?;
        self.set_kinematic_target_rotation(rotation)
    }

    /// Location a kinematic body moves to on the next step
    pub fn kinematic_target_location(&self) -> Option<Vector3> {
        self.kinematic_target_location
    }

    /// Set the kinematic target location
    pub fn set_kinematic_target_location(&mut self, location: Vector3) -> Result<(), BodyNotDynamic> {
        self.ensure_dynamic()?;
        if !self.kinematic {
            log::warn!("Kinematic target set on a non-kinematic body; it has no effect until kinematic mode is enabled");
        }
        self.kinematic_target_location = Some(location);
        Ok(())
    }

    /// Rotation a kinematic body moves to on the next step
    pub fn kinematic_target_rotation(&self) -> Option<Rotator> {
        self.kinematic_target_rotation
    }

    /// Set the kinematic target rotation
    pub fn set_kinematic_target_rotation(&mut self, rotation: Rotator) -> Result<(), BodyNotDynamic> {
        self.ensure_dynamic()?;
        self.kinematic_target_rotation = Some(rotation);
        Ok(())
    }

    /// Axes the body may not move or rotate along
    pub fn lock_flags(&self) -> ActorLockFlag {
        self.lock_flags
    }

    /// Replace all lock flags
    pub fn set_lock_flags(&mut self, flags: ActorLockFlag) {
        self.lock_flags = flags;
        self.linear_velocity = self.apply_linear_locks(self.linear_velocity);
        self.angular_velocity = self.apply_angular_locks(self.angular_velocity);
    }

    /// Set or clear individual lock flags
    pub fn set_lock_flag(&mut self, flag: ActorLockFlag, locked: bool) {
        let mut flags = self.lock_flags;
        flags.set(flag, locked);
        self.set_lock_flags(flags);
    }

    /// Whether the body is asleep
    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Wake the body
    pub fn wake_up(&mut self) {
        self.sleeping = false;
    }

    /// Put the body to sleep, stopping it
    pub fn put_to_sleep(&mut self) {
        self.sleeping = true;
        self.linear_velocity = Vector3::ZERO;
        self.angular_velocity = Vector3::ZERO;
        self.clear_pending();
    }

    /// Apply a force; `mode` selects how it changes velocity
    ///
    /// `Force` and `Acceleration` act over the next step, `Impulse` and
    /// `VelocityChange` change velocity immediately. Wakes the body.
    pub fn add_force(&mut self, force: Vector3, mode: ForceMode) -> Result<(), BodyNotDynamic> {
        self.ensure_dynamic()?;
        let inv_mass = 1.0 / self.mass;
        match mode {
            ForceMode::Force => self.pending_linear_acceleration += force * inv_mass,
            ForceMode::Acceleration => self.pending_linear_acceleration += force,
            ForceMode::Impulse => self.linear_velocity += force * inv_mass,
            ForceMode::VelocityChange => self.linear_velocity += force,
        }
        self.linear_velocity = self.apply_linear_locks(self.linear_velocity);
        self.sleeping = false;
        Ok(())
    }

    /// Apply a torque; bodies are treated as having unit inertia per kilogram
    pub fn add_torque(&mut self, torque: Vector3, mode: ForceMode) -> Result<(), BodyNotDynamic> {
        self.ensure_dynamic()?;
        let inv_mass = 1.0 / self.mass;
        match mode {
            ForceMode::Force => self.pending_angular_acceleration += torque * inv_mass,
            ForceMode::Acceleration => self.pending_angular_acceleration += torque,
            ForceMode::Impulse => self.angular_velocity += torque * inv_mass,
            ForceMode::VelocityChange => self.angular_velocity += torque,
        }
        self.angular_velocity = self.apply_angular_locks(self.angular_velocity);
        self.sleeping = false;
        Ok(())
    }

    /// Advance velocities by one step and return the (linear, angular)
    /// velocities to integrate positions with
    pub(crate) fn integrate_velocities(&mut self, gravity: Vector3, dt: f32) -> (Vector3, Vector3) {
        let mut linear_acceleration = self.pending_linear_acceleration;
        if self.gravity_enabled {
            linear_acceleration += gravity;
        }
        let angular_acceleration = self.pending_angular_acceleration;
        self.clear_pending();

        let mut linear = self.linear_velocity + linear_acceleration * dt;
        let mut angular = self.angular_velocity + angular_acceleration * dt;

        linear *= 1.0 / (1.0 + self.linear_damping * dt);
        angular *= 1.0 / (1.0 + self.angular_damping * dt);

        linear = clamp_length(linear, self.max_linear_velocity);
        angular = clamp_length(angular, self.max_angular_velocity);

        self.linear_velocity = self.apply_linear_locks(linear);
        self.angular_velocity = self.apply_angular_locks(angular);
        (self.linear_velocity, self.angular_velocity)
    }

    pub(crate) fn take_kinematic_targets(&mut self) -> (Option<Vector3>, Option<Rotator>) {
        (self.kinematic_target_location.take(), self.kinematic_target_rotation.take())
    }

    fn ensure_dynamic(&self) -> Result<(), BodyNotDynamic> {
        if self.is_dynamic() {
            Ok(())
        } else {
            Err(BodyNotDynamic)
        }
    }

    fn clear_pending(&mut self) {
        self.pending_linear_acceleration = Vector3::ZERO;
        self.pending_angular_acceleration = Vector3::ZERO;
    }

    fn apply_linear_locks(&self, mut v: Vector3) -> Vector3 {
        let flags = self.lock_flags;
        if flags.contains(ActorLockFlag::LOCATION_X) {
            v.x = 0.0;
        }
        if flags.contains(ActorLockFlag::LOCATION_Y) {
            v.y = 0.0;
        }
        if flags.contains(ActorLockFlag::LOCATION_Z) {
            v.z = 0.0;
        }
        v
    }

    fn apply_angular_locks(&self, mut v: Vector3) -> Vector3 {
        let flags = self.lock_flags;
        if flags.contains(ActorLockFlag::ROTATION_X) {
            v.x = 0.0;
        }
        if flags.contains(ActorLockFlag::ROTATION_Y) {
            v.y = 0.0;
        }
        if flags.contains(ActorLockFlag::ROTATION_Z) {
            v.z = 0.0;
        }
        v
    }
}

fn clamp_length(v: Vector3, max: f32) -> Vector3 {
    let len = v.length();
    if len > max && len > 0.0 {
        v * (max / len)
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_static_body_rejects_forces() {
        let mut body = RigidBodyComponent::fixed();

        assert_eq!(body.add_force(Vector3::X, ForceMode::Force), Err(BodyNotDynamic));
        assert_eq!(body.set_linear_velocity(Vector3::X), Err(BodyNotDynamic));
        assert_eq!(body.linear_velocity(), Vector3::ZERO);
    }

    #[test]
    fn test_force_modes() {
        let mut body = RigidBodyComponent::dynamic().with_mass(2.0);
        body.gravity_enabled = false;
        body.set_linear_damping(0.0);

        body.add_force(Vector3::new(4.0, 0.0, 0.0), ForceMode::Impulse).unwrap();
        assert_relative_eq!(body.linear_velocity(), Vector3::new(2.0, 0.0, 0.0), epsilon = EPSILON);

        body.add_force(Vector3::new(0.0, 1.0, 0.0), ForceMode::VelocityChange).unwrap();
        assert_relative_eq!(body.linear_velocity(), Vector3::new(2.0, 1.0, 0.0), epsilon = EPSILON);

        // 10 N on 2 kg for 0.5 s adds 2.5 m/s
        body.add_force(Vector3::new(0.0, 0.0, 10.0), ForceMode::Force).unwrap();
        let (linear, _) = body.integrate_velocities(Vector3::ZERO, 0.5);
        assert_relative_eq!(linear, Vector3::new(2.0, 1.0, 2.5), epsilon = EPSILON);

        // Pending force is consumed by the step
        let (linear, _) = body.integrate_velocities(Vector3::ZERO, 0.5);
        assert_relative_eq!(linear, Vector3::new(2.0, 1.0, 2.5), epsilon = EPSILON);
    }

    #[test]
    fn test_gravity_and_damping() {
        let mut body = RigidBodyComponent::dynamic();
        body.set_linear_damping(1.0);

        let (linear, _) = body.integrate_velocities(Vector3::new(0.0, -10.0, 0.0), 1.0);
        assert_relative_eq!(linear, Vector3::new(0.0, -5.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_lock_flags_zero_axes() {
        let mut body = RigidBodyComponent::dynamic();
        body.set_lock_flag(ActorLockFlag::LOCATION_Y | ActorLockFlag::ROTATION, true);

        body.set_linear_velocity(Vector3::new(1.0, 2.0, 3.0)).unwrap();
        body.add_torque(Vector3::ONE, ForceMode::VelocityChange).unwrap();

        assert_eq!(body.linear_velocity(), Vector3::new(1.0, 0.0, 3.0));
        assert_eq!(body.angular_velocity(), Vector3::ZERO);
    }

    #[test]
    fn test_max_velocity_clamps_speed() {
        let mut body = RigidBodyComponent::dynamic();
        body.gravity_enabled = false;
        body.set_linear_damping(0.0);
        body.set_max_linear_velocity(5.0);
        body.add_force(Vector3::new(30.0, 40.0, 0.0), ForceMode::VelocityChange).unwrap();

        let (linear, _) = body.integrate_velocities(Vector3::ZERO, 0.1);
        assert_relative_eq!(linear.length(), 5.0, epsilon = EPSILON);
    }

    #[test]
    fn test_sleep_and_wake() {
        let mut body = RigidBodyComponent::dynamic();
        body.set_linear_velocity(Vector3::X).unwrap();
        body.put_to_sleep();

        assert!(body.is_sleeping());
        assert_eq!(body.linear_velocity(), Vector3::ZERO);

        body.add_force(Vector3::Y, ForceMode::Impulse).unwrap();
        assert!(!body.is_sleeping());
    }

    #[test]
    fn test_mass_is_clamped() {
        let body = RigidBodyComponent::dynamic().with_mass(-5.0);
        assert_eq!(body.mass(), RigidBodyComponent::MIN_MASS);
    }
}
