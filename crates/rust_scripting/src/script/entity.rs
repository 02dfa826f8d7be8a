//! Script-side entity handle

use std::fmt;

use super::callbacks::{CollisionCallback, ContactEvent, SubscriptionId, TriggerCallback};
use super::component_ref::{ComponentRef, DynComponentRef};
use super::context::ScriptContext;
use super::error::ScriptResult;
use crate::ecs::{Component, ComponentKind};
use crate::foundation::guid::Guid;
use crate::foundation::math::{Rotator, Transform, Vector3};
use crate::physics::CollisionInfo;

/// Handle to an entity in the context's scene
///
/// A handle is just the entity's GUID. Every call goes through the scene,
/// so a handle to a destroyed entity fails with
/// [`SceneError::EntityDestroyed`](crate::ecs::SceneError::EntityDestroyed)
/// instead of touching stale data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(Guid);

macro_rules! transform_part_accessors {
    ($read:ident, $update:ident: $($get:ident / $set:ident => $field:ident: $ty:ty),+ $(,)?) => {
        $(
            #[doc = concat!("`", stringify!($field), "` of the `", stringify!($read), "`")]
            pub fn $get(self, ctx: &ScriptContext) -> ScriptResult<$ty> {
                Ok(ctx.scene().$read(self.0)?.$field)
            }

            #[doc = concat!("Set `", stringify!($field), "` of the `", stringify!($read), "`")]
            pub fn $set(self, ctx: &mut ScriptContext, value: $ty) -> ScriptResult {
                ctx.scene_mut().$update(self.0, |t| t.$field = value)?;
                Ok(())
            }
        )+
    };
}

impl Entity {
    /// Handle for an entity GUID
    pub const fn from_guid(guid: Guid) -> Self {
        Self(guid)
    }

    /// GUID of the entity
    pub const fn guid(self) -> Guid {
        self.0
    }

    /// Whether the entity exists and is not queued for destruction
    pub fn is_valid(self, ctx: &ScriptContext) -> bool {
        ctx.scene().contains(self.0) && !ctx.scene().is_pending_destroy(self.0)
    }

    /// Entity name
    pub fn name(self, ctx: &ScriptContext) -> ScriptResult<String> {
        Ok(ctx.scene().entity_name(self.0)?.to_string())
    }

    /// Rename the entity
    pub fn set_name(self, ctx: &mut ScriptContext, name: impl Into<String>) -> ScriptResult {
        ctx.scene_mut().set_entity_name(self.0, name)?;
        Ok(())
    }

    /// Parent entity, `None` for roots
    pub fn parent(self, ctx: &ScriptContext) -> ScriptResult<Option<Entity>> {
        Ok(ctx.scene().parent(self.0)?.map(Entity))
    }

    /// Attach to `parent` (or detach with `None`), keeping the world transform
    pub fn set_parent(self, ctx: &mut ScriptContext, parent: Option<Entity>) -> ScriptResult {
        ctx.scene_mut().set_parent(self.0, parent.map(Entity::guid))?;
        Ok(())
    }

    /// Direct children, in attach order
    pub fn children(self, ctx: &ScriptContext) -> ScriptResult<Vec<Entity>> {
        Ok(ctx.scene().children(self.0)?.into_iter().map(Entity).collect())
    }

    /// Children with the given name, optionally searching the whole subtree
    pub fn children_by_name(self, ctx: &ScriptContext, name: &str, recursive: bool) -> ScriptResult<Vec<Entity>> {
        Ok(ctx
            .scene()
            .children_by_name(self.0, name, recursive)?
            .into_iter()
            .map(Entity)
            .collect())
    }

    /// First direct child with the given name
    pub fn child_by_name(self, ctx: &ScriptContext, name: &str) -> ScriptResult<Option<Entity>> {
        Ok(self.children_by_name(ctx, name, false)?.into_iter().next())
    }

    // ----------------------------------------------------------------------
    // Transforms
    // ----------------------------------------------------------------------

    /// World-space transform
    pub fn world_transform(self, ctx: &ScriptContext) -> ScriptResult<Transform> {
        Ok(ctx.scene().world_transform(self.0)?)
    }

    /// Place the entity in world space
    pub fn set_world_transform(self, ctx: &mut ScriptContext, transform: Transform) -> ScriptResult {
        ctx.scene_mut().set_world_transform(self.0, transform)?;
        Ok(())
    }

    /// Transform relative to the parent
    pub fn relative_transform(self, ctx: &ScriptContext) -> ScriptResult<Transform> {
        Ok(ctx.scene().relative_transform(self.0)?)
    }

    /// Replace the transform relative to the parent
    pub fn set_relative_transform(self, ctx: &mut ScriptContext, transform: Transform) -> ScriptResult {
        ctx.scene_mut().set_relative_transform(self.0, transform)?;
        Ok(())
    }

    transform_part_accessors! {
        world_transform, update_world_transform:
        world_location / set_world_location => location: Vector3,
        world_rotation / set_world_rotation => rotation: Rotator,
        world_scale / set_world_scale => scale: Vector3,
    }

    transform_part_accessors! {
        relative_transform, update_relative_transform:
        relative_location / set_relative_location => location: Vector3,
        relative_rotation / set_relative_rotation => rotation: Rotator,
        relative_scale / set_relative_scale => scale: Vector3,
    }

    /// Move the entity by `delta` in world space
    pub fn add_world_location(self, ctx: &mut ScriptContext, delta: Vector3) -> ScriptResult {
        ctx.scene_mut().update_world_transform(self.0, |t| t.location += delta)?;
        Ok(())
    }

    /// Apply `delta` on top of the current world rotation
    pub fn add_world_rotation(self, ctx: &mut ScriptContext, delta: Rotator) -> ScriptResult {
        ctx.scene_mut()
            .update_world_transform(self.0, |t| t.rotation = delta * t.rotation)?;
        Ok(())
    }

    /// World-space forward direction
    pub fn forward_vector(self, ctx: &ScriptContext) -> ScriptResult<Vector3> {
        Ok(self.world_rotation(ctx)?.forward_vector())
    }

    /// World-space right direction
    pub fn right_vector(self, ctx: &ScriptContext) -> ScriptResult<Vector3> {
        Ok(self.world_rotation(ctx)?.right_vector())
    }

    /// World-space up direction
    pub fn up_vector(self, ctx: &ScriptContext) -> ScriptResult<Vector3> {
        Ok(self.world_rotation(ctx)?.up_vector())
    }

    // ----------------------------------------------------------------------
    // Components
    // ----------------------------------------------------------------------

    /// Attach a component and return a handle to it
    pub fn add_component<T: Component>(self, ctx: &mut ScriptContext, component: T) -> ScriptResult<ComponentRef<T>> {
        ctx.scene_mut().add_component(self.0, component)?;
        Ok(ComponentRef::new(self))
    }

    /// Whether the entity has a `T`; false for stale entities
    pub fn has_component<T: Component>(self, ctx: &ScriptContext) -> bool {
        ctx.scene().has_component::<T>(self.0)
    }

    /// Whether the entity has a component of `kind`; false for stale entities
    pub fn has_component_kind(self, ctx: &ScriptContext, kind: ComponentKind) -> bool {
        ctx.scene().has_component_kind(self.0, kind)
    }

    /// Handle to the entity's `T`, if it has one
    pub fn get_component<T: Component>(self, ctx: &ScriptContext) -> Option<ComponentRef<T>> {
        self.has_component::<T>(ctx).then(|| ComponentRef::new(self))
    }

    /// Handle to the component of `kind`, if the entity has one
    pub fn component_by_kind(self, ctx: &ScriptContext, kind: ComponentKind) -> Option<DynComponentRef> {
        self.has_component_kind(ctx, kind)
            .then(|| DynComponentRef::new(self, kind))
    }

    /// Detach the entity's `T` and return it
    pub fn remove_component<T: Component>(self, ctx: &mut ScriptContext) -> ScriptResult<T> {
        Ok(ctx.scene_mut().remove_component::<T>(self.0)?)
    }

    /// Queue the entity and its children for destruction at the end of the frame
    pub fn destroy(self, ctx: &mut ScriptContext) -> ScriptResult {
        ctx.scene_mut().destroy(self.0)?;
        Ok(())
    }

    /// Whether the cursor is over this entity
    pub fn is_mouse_hovered(self, ctx: &ScriptContext) -> bool {
        ctx.input().hovered_entity() == Some(self.0)
    }

    // ----------------------------------------------------------------------
    // Contact callbacks
    // ----------------------------------------------------------------------

    /// Observe collisions starting on this entity
    pub fn on_collision_begin(
        self,
        ctx: &mut ScriptContext,
        callback: impl FnMut(&mut ScriptContext, Entity, Entity, &CollisionInfo) -> ScriptResult + 'static,
    ) -> ScriptResult<SubscriptionId> {
        self.add_collision_callback(ctx, ContactEvent::CollisionBegin, Box::new(callback))
    }

    /// Observe collisions ending on this entity
    pub fn on_collision_end(
        self,
        ctx: &mut ScriptContext,
        callback: impl FnMut(&mut ScriptContext, Entity, Entity, &CollisionInfo) -> ScriptResult + 'static,
    ) -> ScriptResult<SubscriptionId> {
        self.add_collision_callback(ctx, ContactEvent::CollisionEnd, Box::new(callback))
    }

    /// Observe things entering this trigger
    pub fn on_trigger_begin(
        self,
        ctx: &mut ScriptContext,
        callback: impl FnMut(&mut ScriptContext, Entity, Entity) -> ScriptResult + 'static,
    ) -> ScriptResult<SubscriptionId> {
        self.add_trigger_callback(ctx, ContactEvent::TriggerBegin, Box::new(callback))
    }

    /// Observe things leaving this trigger
    pub fn on_trigger_end(
        self,
        ctx: &mut ScriptContext,
        callback: impl FnMut(&mut ScriptContext, Entity, Entity) -> ScriptResult + 'static,
    ) -> ScriptResult<SubscriptionId> {
        self.add_trigger_callback(ctx, ContactEvent::TriggerEnd, Box::new(callback))
    }

    /// Stop a collision-begin observer; false when `id` is not one
    pub fn remove_on_collision_begin(self, ctx: &mut ScriptContext, id: SubscriptionId) -> bool {
        ctx.callbacks_mut().remove(self.0, ContactEvent::CollisionBegin, id)
    }

    /// Stop a collision-end observer; false when `id` is not one
    pub fn remove_on_collision_end(self, ctx: &mut ScriptContext, id: SubscriptionId) -> bool {
        ctx.callbacks_mut().remove(self.0, ContactEvent::CollisionEnd, id)
    }

    /// Stop a trigger-begin observer; false when `id` is not one
    pub fn remove_on_trigger_begin(self, ctx: &mut ScriptContext, id: SubscriptionId) -> bool {
        ctx.callbacks_mut().remove(self.0, ContactEvent::TriggerBegin, id)
    }

    /// Stop a trigger-end observer; false when `id` is not one
    pub fn remove_on_trigger_end(self, ctx: &mut ScriptContext, id: SubscriptionId) -> bool {
        ctx.callbacks_mut().remove(self.0, ContactEvent::TriggerEnd, id)
    }

    fn add_collision_callback(
        self,
        ctx: &mut ScriptContext,
        event: ContactEvent,
        callback: CollisionCallback,
    ) -> ScriptResult<SubscriptionId> {
        ctx.scene().resolve(self.0)?;
        Ok(ctx.callbacks_mut().add_collision(self.0, event, callback))
    }

    fn add_trigger_callback(self, ctx: &mut ScriptContext, event: ContactEvent, callback: TriggerCallback) -> ScriptResult<SubscriptionId> {
        ctx.scene().resolve(self.0)?;
        Ok(ctx.callbacks_mut().add_trigger(self.0, event, callback))
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{PointLightComponent, SceneError, SpotLightComponent};
    use crate::script::ScriptError;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_transform_shortcuts() {
        let mut ctx = ScriptContext::default();
        let ship = ctx.spawn_entity("Ship");

        ship.set_world_location(&mut ctx, Vector3::new(1.0, 2.0, 3.0)).unwrap();
        ship.add_world_location(&mut ctx, Vector3::new(1.0, 0.0, 0.0)).unwrap();
        assert_eq!(ship.world_location(&ctx).unwrap(), Vector3::new(2.0, 2.0, 3.0));

        ship.add_world_rotation(&mut ctx, Rotator::from_euler_angles(Vector3::new(0.0, 90.0, 0.0)))
            .unwrap();
        assert_relative_eq!(ship.forward_vector(&ctx).unwrap(), Vector3::new(-1.0, 0.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(ship.up_vector(&ctx).unwrap(), Vector3::Y, epsilon = EPSILON);
    }

    #[test]
    fn test_relative_location_under_parent() {
        let mut ctx = ScriptContext::default();
        let parent = ctx.spawn_entity("Parent");
        let child = ctx.spawn_entity("Child");
        parent.set_world_location(&mut ctx, Vector3::new(10.0, 0.0, 0.0)).unwrap();

        child.set_parent(&mut ctx, Some(parent)).unwrap();
        child.set_relative_location(&mut ctx, Vector3::new(0.0, 1.0, 0.0)).unwrap();

        assert_eq!(child.parent(&ctx).unwrap(), Some(parent));
        assert_relative_eq!(child.world_location(&ctx).unwrap(), Vector3::new(10.0, 1.0, 0.0), epsilon = EPSILON);
        assert_eq!(parent.child_by_name(&ctx, "Child").unwrap(), Some(child));
    }

    #[test]
    fn test_component_handles() {
        let mut ctx = ScriptContext::default();
        let lamp = ctx.spawn_entity("Lamp");

        assert!(lamp.get_component::<PointLightComponent>(&ctx).is_none());
        lamp.add_component(&mut ctx, PointLightComponent::default()).unwrap();

        assert!(lamp.has_component::<PointLightComponent>(&ctx));
        assert!(!lamp.has_component::<SpotLightComponent>(&ctx));
        assert!(lamp.component_by_kind(&ctx, ComponentKind::PointLight).is_some());

        lamp.remove_component::<PointLightComponent>(&mut ctx).unwrap();
        assert!(lamp.get_component::<PointLightComponent>(&ctx).is_none());
    }

    #[test]
    fn test_stale_handle_errors() {
        let mut ctx = ScriptContext::default();
        let rock = ctx.spawn_entity("Rock");
        rock.destroy(&mut ctx).unwrap();
        assert!(!rock.is_valid(&ctx));
        assert!(rock.name(&ctx).is_ok());

        ctx.scene_mut().flush_destroyed();
        assert!(!rock.has_component::<PointLightComponent>(&ctx));
        assert!(matches!(
            rock.world_location(&ctx),
            Err(ScriptError::Scene(SceneError::EntityDestroyed(guid))) if guid == rock.guid()
        ));
        assert!(rock.on_trigger_begin(&mut ctx, |_, _, _| Ok(())).is_err());
    }

    #[test]
    fn test_mouse_hover() {
        let mut ctx = ScriptContext::default();
        let button = ctx.spawn_entity("Button");
        assert!(!button.is_mouse_hovered(&ctx));

        ctx.input_mut().set_hovered_entity(Some(button.guid()));
        assert!(button.is_mouse_hovered(&ctx));
    }

    #[test]
    fn test_callback_subscription_roundtrip() {
        let mut ctx = ScriptContext::default();
        let zone = ctx.spawn_entity("Zone");

        let id = zone.on_trigger_begin(&mut ctx, |_, _, _| Ok(())).unwrap();
        assert!(!zone.remove_on_trigger_end(&mut ctx, id));
        assert!(zone.remove_on_trigger_begin(&mut ctx, id));
    }
}
