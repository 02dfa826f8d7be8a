//! Ray queries against collider shapes
//!
//! Spheres and oriented boxes are intersected exactly. Capsules use their
//! bounding sphere. Mesh colliders and triggers are not hit.

use super::RaycastHit;
use crate::ecs::{
    BoxColliderComponent, CapsuleColliderComponent, Collider, ColliderShape, Component, Scene,
    SphereColliderComponent,
};
use crate::foundation::guid::Guid;
use crate::foundation::math::{Transform, Vector3};

/// A ray in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray
    pub origin: Vector3,
    /// The direction of the ray (normalized)
    pub direction: Vector3,
}

impl Ray {
    /// Creates a new ray; the direction is normalized
    pub fn new(origin: Vector3, direction: Vector3) -> Self {
        Self {
            origin,
            direction: direction.normalized(),
        }
    }

    /// Point at distance `t` along the ray
    pub fn point_at(&self, t: f32) -> Vector3 {
        self.origin + self.direction * t
    }

    /// Closest positive hit with a sphere: (distance, normal)
    pub fn intersect_sphere(&self, center: Vector3, radius: f32) -> Option<(f32, Vector3)> {
        // Solve |origin + t*direction - center|^2 = radius^2
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.dot(oc) - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        let t = if -b - root > 0.0 {
            -b - root
        } else if -b + root > 0.0 {
            -b + root
        } else {
            return None;
        };
        let normal = (self.point_at(t) - center).normalized();
        Some((t, normal))
    }

    /// Closest positive hit with an oriented box: (distance, normal)
    ///
    /// A ray starting inside the box hits the face it leaves through, and the
    /// normal is that face's outward normal.
    pub fn intersect_box(&self, world: &Transform, half_extents: Vector3) -> Option<(f32, Vector3)> {
        let inverse_rotation = world.rotation.inverse();
        let origin = inverse_rotation.rotate(self.origin - world.location);
        let direction = inverse_rotation.rotate(self.direction);
        let half = half_extents * world.scale.abs();

        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;
        let mut near_axis = 0;
        let mut near_sign = 1.0;
        let mut far_axis = 0;
        let mut far_sign = 1.0;

        for axis in 0..3 {
            if direction[axis].abs() < f32::EPSILON {
                if origin[axis].abs() > half[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / direction[axis];
            let mut t0 = (-half[axis] - origin[axis]) * inv;
            let mut t1 = (half[axis] - origin[axis]) * inv;
            // Entering through the negative face unless the slab is crossed backwards
            let mut sign = -1.0;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
                sign = 1.0;
            }
            if t0 > t_near {
                t_near = t0;
                near_axis = axis;
                near_sign = sign;
            }
            if t1 < t_far {
                t_far = t1;
                far_axis = axis;
                far_sign = -sign;
            }
            if t_near > t_far {
                return None;
            }
        }

        if t_far < 0.0 {
            return None;
        }
        let (t, axis, sign) = if t_near > 0.0 {
            (t_near, near_axis, near_sign)
        } else {
            (t_far, far_axis, far_sign)
        };

        let mut local_normal = Vector3::ZERO;
        local_normal[axis] = sign;
        Some((t, world.rotation.rotate(local_normal)))
    }
}

/// Cast a ray and return the closest hit within `max_distance`
pub fn raycast(scene: &Scene, origin: Vector3, direction: Vector3, max_distance: f32) -> Option<RaycastHit> {
    if direction.length_squared() == 0.0 || max_distance <= 0.0 {
        return None;
    }
    let ray = Ray::new(origin, direction);

    let mut closest: Option<RaycastHit> = None;
    let mut consider = |entity: Guid, hit: Option<(f32, Vector3)>| {
        if let Some((distance, normal)) = hit {
            if distance <= max_distance && closest.map_or(true, |c| distance < c.distance) {
                closest = Some(RaycastHit {
                    entity,
                    position: ray.point_at(distance),
                    normal,
                    distance,
                });
            }
        }
    };

    for_each_solid::<SphereColliderComponent>(scene, |entity, world, shape| {
        if let ColliderShape::Sphere { radius } = shape {
            consider(entity, ray.intersect_sphere(world.location, radius * max_scale(world)));
        }
    });
    for_each_solid::<BoxColliderComponent>(scene, |entity, world, shape| {
        if let ColliderShape::Box { half_extents } = shape {
            consider(entity, ray.intersect_box(&world, half_extents));
        }
    });
    for_each_solid::<CapsuleColliderComponent>(scene, |entity, world, shape| {
        if let ColliderShape::Capsule { radius, height } = shape {
            let bounding = (radius + height * 0.5) * max_scale(world);
            consider(entity, ray.intersect_sphere(world.location, bounding));
        }
    });

    closest
}

fn max_scale(world: Transform) -> f32 {
    let scale = world.scale.abs();
    scale.x.max(scale.y).max(scale.z)
}

fn for_each_solid<T: Component + Collider>(scene: &Scene, mut f: impl FnMut(Guid, Transform, ColliderShape)) {
    for entity in scene.entities_with::<T>() {
        let Ok(collider) = scene.component::<T>(entity) else {
            continue;
        };
        if collider.properties().is_trigger {
            continue;
        }
        let shape = collider.shape();
        match scene.component_world_transform(entity, T::KIND) {
            Ok(world) => f(entity, world, shape),
            Err(err) => log::warn!("Raycast skipped collider of {}: {}", entity, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Rotator;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_sphere_hit_from_outside() {
        let ray = Ray::new(Vector3::new(0.0, 0.0, 10.0), Vector3::new(0.0, 0.0, -2.0));
        let (t, normal) = ray.intersect_sphere(Vector3::ZERO, 1.0).unwrap();

        assert_relative_eq!(t, 9.0, epsilon = EPSILON);
        assert_relative_eq!(normal, Vector3::Z, epsilon = EPSILON);
    }

    #[test]
    fn test_sphere_behind_ray_is_missed() {
        let ray = Ray::new(Vector3::new(0.0, 0.0, 10.0), Vector3::Z);
        assert!(ray.intersect_sphere(Vector3::ZERO, 1.0).is_none());
    }

    #[test]
    fn test_rotated_box_hit() {
        let world = Transform::from_location(Vector3::new(5.0, 0.0, 0.0))
            .with_rotation(Rotator::from_euler_angles(Vector3::new(0.0, 90.0, 0.0)));
        let ray = Ray::new(Vector3::ZERO, Vector3::X);

        // Half extents (1, 1, 2) rotated 90 degrees about Y span 2 along world X
        let (t, normal) = ray.intersect_box(&world, Vector3::new(1.0, 1.0, 2.0)).unwrap();

        assert_relative_eq!(t, 3.0, epsilon = EPSILON);
        assert_relative_eq!(normal, Vector3::new(-1.0, 0.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_box_hit_from_inside_reports_exit_face() {
        let world = Transform::IDENTITY;
        let ray = Ray::new(Vector3::new(0.0, 0.5, 0.0), Vector3::new(1.0, 0.0, 0.0));

        let (t, normal) = ray.intersect_box(&world, Vector3::new(2.0, 1.0, 1.0)).unwrap();

        assert_relative_eq!(t, 2.0, epsilon = EPSILON);
        assert_relative_eq!(normal, Vector3::X, epsilon = EPSILON);
    }

    #[test]
    fn test_raycast_returns_closest_solid() {
        let mut scene = Scene::new("raycast");

        let near = scene.create_entity("Near");
        scene.set_relative_transform(near, Transform::from_location(Vector3::new(0.0, 0.0, -5.0))).unwrap();
        scene.add_component(near, SphereColliderComponent::new(1.0)).unwrap();

        let far = scene.create_entity("Far");
        scene.set_relative_transform(far, Transform::from_location(Vector3::new(0.0, 0.0, -20.0))).unwrap();
        scene.add_component(far, BoxColliderComponent::default()).unwrap();

        let trigger = scene.create_entity("Trigger");
        scene.set_relative_transform(trigger, Transform::from_location(Vector3::new(0.0, 0.0, -2.0))).unwrap();
        scene
            .add_component(trigger, SphereColliderComponent::new(0.5))
            .unwrap()
            .collider
            .is_trigger = true;

        let hit = raycast(&scene, Vector3::ZERO, Vector3::new(0.0, 0.0, -1.0), 100.0).unwrap();
        assert_eq!(hit.entity, near);
        assert_relative_eq!(hit.distance, 4.0, epsilon = EPSILON);
        assert_relative_eq!(hit.position, Vector3::new(0.0, 0.0, -4.0), epsilon = EPSILON);

        assert!(raycast(&scene, Vector3::ZERO, Vector3::new(0.0, 0.0, -1.0), 3.0).is_none());
    }
}
