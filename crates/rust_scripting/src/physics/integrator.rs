//! Semi-implicit Euler integration of rigid bodies

use crate::ecs::{RigidBodyComponent, Scene, SceneResult};
use crate::foundation::guid::Guid;
use crate::foundation::math::{mathf, Rotator, Vector3};

/// Advance every rigid body in the scene by `dt` seconds
///
/// Dynamic bodies integrate velocity then move their entity in world space.
/// Kinematic bodies jump to their pending target. Static and sleeping
/// bodies are left alone.
pub fn step(scene: &mut Scene, gravity: Vector3, dt: f32) {
    if dt <= 0.0 {
        return;
    }
    for entity in scene.entities_with::<RigidBodyComponent>() {
        if let Err(err) = step_body(scene, entity, gravity, dt) {
            log::warn!("Skipping rigid body of {}: {}", entity, err);
        }
    }
}

fn step_body(scene: &mut Scene, entity: Guid, gravity: Vector3, dt: f32) -> SceneResult<()> {
    let body = scene.component_mut::<RigidBodyComponent>(entity)?;
    if !body.is_dynamic() {
        return Ok(());
    }

    if body.is_kinematic() {
        let (location, rotation) = body.take_kinematic_targets();
        if location.is_none() && rotation.is_none() {
            return Ok(());
        }
        return scene.update_world_transform(entity, |world| {
            if let Some(location) = location {
                world.location = location;
            }
            if let Some(rotation) = rotation {
                world.rotation = rotation;
            }
        });
    }

    if body.is_sleeping() {
        return Ok(());
    }

    let (linear, angular) = body.integrate_velocities(gravity, dt);
    scene.update_world_transform(entity, |world| {
        world.location += linear * dt;
        let angle = angular.length() * dt;
        if angle > 0.0 {
            let spin = Rotator::from_quat(mathf::angle_axis(angle, angular));
            world.rotation = spin * world.rotation;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::TransformComponent;
    use crate::foundation::math::{constants::PI, Transform};
    use crate::physics::{ActorLockFlag, ForceMode};
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-4;
    const GRAVITY: Vector3 = Vector3::new(0.0, -10.0, 0.0);

    fn scene_with_body(body: RigidBodyComponent) -> (Scene, Guid) {
        let mut scene = Scene::new("physics");
        let entity = scene.create_entity("Body");
        scene.add_component(entity, body).unwrap();
        (scene, entity)
    }

    #[test]
    fn test_static_body_never_moves() {
        let (mut scene, entity) = scene_with_body(RigidBodyComponent::default());
        step(&mut scene, GRAVITY, 1.0);
        assert_eq!(scene.world_transform(entity).unwrap(), Transform::IDENTITY);
    }

    #[test]
    fn test_dynamic_body_falls() {
        let mut body = RigidBodyComponent::dynamic();
        body.set_linear_damping(0.0);
        let (mut scene, entity) = scene_with_body(body);

        step(&mut scene, GRAVITY, 0.5);

        // v = -5 after the step, then x = v * dt
        let location = scene.world_transform(entity).unwrap().location;
        assert_relative_eq!(location, Vector3::new(0.0, -2.5, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_locked_axes_stay_put() {
        let mut body = RigidBodyComponent::dynamic();
        body.set_lock_flags(ActorLockFlag::LOCATION_Y);
        body.add_force(Vector3::new(1.0, 1.0, 0.0), ForceMode::VelocityChange).unwrap();
        let (mut scene, entity) = scene_with_body(body);

        step(&mut scene, GRAVITY, 1.0);

        let location = scene.world_transform(entity).unwrap().location;
        assert_eq!(location.y, 0.0);
        assert!(location.x > 0.0);
    }

    #[test]
    fn test_angular_velocity_rotates() {
        let mut body = RigidBodyComponent::dynamic();
        body.gravity_enabled = false;
        body.set_angular_damping(0.0);
        body.set_angular_velocity(Vector3::new(0.0, PI / 2.0, 0.0)).unwrap();
        let (mut scene, entity) = scene_with_body(body);

        step(&mut scene, GRAVITY, 1.0);

        let rotation = scene.world_transform(entity).unwrap().rotation;
        assert_relative_eq!(rotation.rotate(Vector3::X), Vector3::new(0.0, 0.0, -1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_kinematic_body_moves_to_target_once() {
        let mut body = RigidBodyComponent::dynamic();
        body.set_kinematic(true).unwrap();
        body.set_kinematic_target_location(Vector3::new(3.0, 0.0, 0.0)).unwrap();
        let (mut scene, entity) = scene_with_body(body);

        step(&mut scene, GRAVITY, 0.1);
        assert_relative_eq!(scene.world_transform(entity).unwrap().location, Vector3::new(3.0, 0.0, 0.0));

        scene.update_world_transform(entity, |t| t.location = Vector3::ZERO).unwrap();
        step(&mut scene, GRAVITY, 0.1);
        assert_eq!(scene.world_transform(entity).unwrap().location, Vector3::ZERO);
    }

    #[test]
    fn test_sleeping_body_waits_for_wake_up() {
        let mut body = RigidBodyComponent::dynamic();
        body.put_to_sleep();
        let (mut scene, entity) = scene_with_body(body);

        step(&mut scene, GRAVITY, 1.0);
        assert_eq!(scene.component::<TransformComponent>(entity).unwrap().transform, Transform::IDENTITY);

        scene.component_mut::<RigidBodyComponent>(entity).unwrap().wake_up();
        step(&mut scene, GRAVITY, 1.0);
        assert!(scene.world_transform(entity).unwrap().location.y < 0.0);
    }
}
