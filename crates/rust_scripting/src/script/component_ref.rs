//! Typed and kind-tagged handles to components

use std::fmt;
use std::marker::PhantomData;

use super::context::ScriptContext;
use super::entity::Entity;
use super::error::ScriptResult;
use crate::assets::AssetError;
use crate::audio::SoundHandle;
use crate::ecs::{
    AudioComponent, BodyNotDynamic, Collider, Component, ComponentKind, Light, RigidBodyComponent,
    SceneComponent, SceneError,
};
use crate::foundation::math::{Rotator, Transform, Vector3};
use crate::physics::ForceMode;

/// Handle to the `T` of an entity
///
/// Holds no borrow: every access resolves the entity again, so a handle
/// whose entity or component is gone fails instead of reading stale data.
pub struct ComponentRef<T> {
    entity: Entity,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for ComponentRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ComponentRef<T> {}

impl<T> PartialEq for ComponentRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.entity == other.entity
    }
}

impl<T> Eq for ComponentRef<T> {}

impl<T: Component> fmt::Debug for ComponentRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRef")
            .field("entity", &self.entity)
            .field("kind", &T::KIND)
            .finish()
    }
}

impl<T: Component> ComponentRef<T> {
    pub(crate) fn new(entity: Entity) -> Self {
        Self {
            entity,
            _marker: PhantomData,
        }
    }

    /// Owning entity
    pub fn entity(self) -> Entity {
        self.entity
    }

    /// Component kind
    pub fn kind(self) -> ComponentKind {
        T::KIND
    }

    /// Whether the entity is alive and still has the component
    pub fn is_valid(self, ctx: &ScriptContext) -> bool {
        self.entity.has_component::<T>(ctx)
    }

    /// Borrow the component
    pub fn get(self, ctx: &ScriptContext) -> ScriptResult<&T> {
        Ok(ctx.scene().component::<T>(self.entity.guid())?)
    }

    /// Borrow the component mutably
    pub fn get_mut(self, ctx: &mut ScriptContext) -> ScriptResult<&mut T> {
        Ok(ctx.scene_mut().component_mut::<T>(self.entity.guid())?)
    }

    /// Run `f` on the component
    pub fn read<R>(self, ctx: &ScriptContext, f: impl FnOnce(&T) -> R) -> ScriptResult<R> {
        Ok(f(self.get(ctx)?))
    }

    /// Run `f` on the component mutably
    pub fn update<R>(self, ctx: &mut ScriptContext, f: impl FnOnce(&mut T) -> R) -> ScriptResult<R> {
        Ok(f(self.get_mut(ctx)?))
    }

    /// Forget the static type
    pub fn as_dyn(self) -> DynComponentRef {
        DynComponentRef::new(self.entity, T::KIND)
    }
}

impl<T: Component + SceneComponent> ComponentRef<T> {
    /// World transform: the entity's world transform composed with the
    /// component's relative one
    pub fn world_transform(self, ctx: &ScriptContext) -> ScriptResult<Transform> {
        self.as_dyn().world_transform(ctx)
    }

    /// Place the component in world space
    pub fn set_world_transform(self, ctx: &mut ScriptContext, transform: Transform) -> ScriptResult {
        self.as_dyn().set_world_transform(ctx, transform)
    }

    /// Transform relative to the owning entity
    pub fn relative_transform(self, ctx: &ScriptContext) -> ScriptResult<Transform> {
        self.read(ctx, SceneComponent::relative_transform)
    }

    /// Replace the transform relative to the owning entity
    pub fn set_relative_transform(self, ctx: &mut ScriptContext, transform: Transform) -> ScriptResult {
        self.update(ctx, |c| c.set_relative_transform(transform))
    }

    /// World-space forward direction
    pub fn forward_vector(self, ctx: &ScriptContext) -> ScriptResult<Vector3> {
        Ok(self.world_transform(ctx)?.rotation.forward_vector())
    }

    /// World-space right direction
    pub fn right_vector(self, ctx: &ScriptContext) -> ScriptResult<Vector3> {
        Ok(self.world_transform(ctx)?.rotation.right_vector())
    }

    /// World-space up direction
    pub fn up_vector(self, ctx: &ScriptContext) -> ScriptResult<Vector3> {
        Ok(self.world_transform(ctx)?.rotation.up_vector())
    }
}

impl ComponentRef<RigidBodyComponent> {
    fn dynamic_op(self, ctx: &mut ScriptContext, op: impl FnOnce(&mut RigidBodyComponent) -> Result<(), BodyNotDynamic>) -> ScriptResult {
        let guid = self.entity.guid();
        self.update(ctx, op)?
            .map_err(|BodyNotDynamic| SceneError::BodyNotDynamic(guid).into())
    }

    /// Apply a force or impulse; the body must be dynamic
    pub fn add_force(self, ctx: &mut ScriptContext, force: Vector3, mode: ForceMode) -> ScriptResult {
        self.dynamic_op(ctx, |body| body.add_force(force, mode))
    }

    /// Apply a torque; the body must be dynamic
    pub fn add_torque(self, ctx: &mut ScriptContext, torque: Vector3, mode: ForceMode) -> ScriptResult {
        self.dynamic_op(ctx, |body| body.add_torque(torque, mode))
    }

    /// Set linear velocity; the body must be dynamic
    pub fn set_linear_velocity(self, ctx: &mut ScriptContext, velocity: Vector3) -> ScriptResult {
        self.dynamic_op(ctx, |body| body.set_linear_velocity(velocity))
    }

    /// Set angular velocity; the body must be dynamic
    pub fn set_angular_velocity(self, ctx: &mut ScriptContext, velocity: Vector3) -> ScriptResult {
        self.dynamic_op(ctx, |body| body.set_angular_velocity(velocity))
    }

    /// Toggle kinematic mode; the body must be dynamic
    pub fn set_kinematic(self, ctx: &mut ScriptContext, kinematic: bool) -> ScriptResult {
        self.dynamic_op(ctx, |body| body.set_kinematic(kinematic))
    }

    /// Move a kinematic body on the next physics step
    pub fn set_kinematic_target(self, ctx: &mut ScriptContext, location: Vector3, rotation: Rotator) -> ScriptResult {
        self.dynamic_op(ctx, |body| body.set_kinematic_target(location, rotation))
    }
}

impl ComponentRef<AudioComponent> {
    /// Start the component's sound at its world location
    ///
    /// A sound this component already started is stopped first. The asset's
    /// own volume scales the component volume.
    pub fn play(self, ctx: &mut ScriptContext) -> ScriptResult<SoundHandle> {
        let source = self.get(ctx)?.clone();
        if source.sound.is_null() {
            return Err(SceneError::InvalidValue {
                what: "sound",
                reason: format!("{} has no sound assigned", self.entity),
            }
            .into());
        }
        let path = ctx
            .assets()
            .path_of(source.sound)
            .ok_or_else(|| AssetError::NotFound(source.sound.to_string()))?
            .to_string();
        let asset_volume = ctx.assets().audio(&path)?.volume();
        let location = self.world_transform(ctx)?.location;

        if let Some(previous) = source.playing_handle() {
            if let Err(err) = ctx.audio_mut().stop(previous) {
                log::warn!("Could not stop the previous sound of {}: {}", self.entity, err);
            }
        }

        let mut settings = source.sound_settings();
        settings.volume *= asset_volume;
        let handle = ctx.audio_mut().play_3d(
            &path,
            location,
            settings,
            source.min_distance(),
            source.max_distance(),
            source.roll_off,
        )?;
        self.get_mut(ctx)?.playing = Some(handle);
        Ok(handle)
    }

    /// Stop the sound started by this component, if any
    pub fn stop(self, ctx: &mut ScriptContext) -> ScriptResult {
        if let Some(handle) = self.get_mut(ctx)?.playing.take() {
            if let Err(err) = ctx.audio_mut().stop(handle) {
                log::warn!("Could not stop the sound of {}: {}", self.entity, err);
            }
        }
        Ok(())
    }

    /// Pause or resume the sound started by this component
    pub fn set_paused(self, ctx: &mut ScriptContext, paused: bool) -> ScriptResult {
        if let Some(handle) = self.get(ctx)?.playing_handle() {
            ctx.audio_mut().set_paused(handle, paused)?;
        }
        Ok(())
    }

    /// Whether the sound started by this component is audible
    pub fn is_playing(self, ctx: &ScriptContext) -> ScriptResult<bool> {
        Ok(self
            .get(ctx)?
            .playing_handle()
            .is_some_and(|handle| ctx.audio().is_playing(handle)))
    }

    /// Move the playing voice to the component's current world location
    pub fn sync_position(self, ctx: &mut ScriptContext) -> ScriptResult {
        if let Some(handle) = self.get(ctx)?.playing_handle() {
            let location = self.world_transform(ctx)?.location;
            if ctx.audio_mut().set_position(handle, location).is_err() {
                self.get_mut(ctx)?.playing = None;
            }
        }
        Ok(())
    }
}

/// Handle to a component known only by its kind
///
/// Gives access to the shared bases: [`Light`], [`Collider`] and
/// [`SceneComponent`] transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DynComponentRef {
    entity: Entity,
    kind: ComponentKind,
}

impl DynComponentRef {
    pub(crate) fn new(entity: Entity, kind: ComponentKind) -> Self {
        Self { entity, kind }
    }

    /// Owning entity
    pub fn entity(self) -> Entity {
        self.entity
    }

    /// Component kind
    pub fn kind(self) -> ComponentKind {
        self.kind
    }

    /// Whether the entity is alive and still has the component
    pub fn is_valid(self, ctx: &ScriptContext) -> bool {
        self.entity.has_component_kind(ctx, self.kind)
    }

    /// Typed handle, when the kind matches `T`
    pub fn downcast<T: Component>(self) -> Option<ComponentRef<T>> {
        (self.kind == T::KIND).then(|| ComponentRef::new(self.entity))
    }

    /// Light base of a light component
    pub fn light(self, ctx: &ScriptContext) -> ScriptResult<&dyn Light> {
        Ok(ctx.scene().light(self.entity.guid(), self.kind)?)
    }

    /// Mutable light base of a light component
    pub fn light_mut(self, ctx: &mut ScriptContext) -> ScriptResult<&mut dyn Light> {
        Ok(ctx.scene_mut().light_mut(self.entity.guid(), self.kind)?)
    }

    /// Collider base of a collider component
    pub fn collider(self, ctx: &ScriptContext) -> ScriptResult<&dyn Collider> {
        Ok(ctx.scene().collider(self.entity.guid(), self.kind)?)
    }

    /// Mutable collider base of a collider component
    pub fn collider_mut(self, ctx: &mut ScriptContext) -> ScriptResult<&mut dyn Collider> {
        Ok(ctx.scene_mut().collider_mut(self.entity.guid(), self.kind)?)
    }

    /// World transform of a scene component
    pub fn world_transform(self, ctx: &ScriptContext) -> ScriptResult<Transform> {
        Ok(ctx.scene().component_world_transform(self.entity.guid(), self.kind)?)
    }

    /// Place a scene component in world space
    pub fn set_world_transform(self, ctx: &mut ScriptContext, transform: Transform) -> ScriptResult {
        ctx.scene_mut()
            .set_component_world_transform(self.entity.guid(), self.kind, transform)?;
        Ok(())
    }

    /// Transform of a scene component relative to its entity
    pub fn relative_transform(self, ctx: &ScriptContext) -> ScriptResult<Transform> {
        Ok(ctx
            .scene()
            .scene_component(self.entity.guid(), self.kind)?
            .relative_transform())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetData, AudioAsset};
    use crate::audio::NullAudioDevice;
    use crate::ecs::{PointLightComponent, SphereColliderComponent};
    use crate::foundation::math::Color3;
    use crate::script::ScriptError;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_update_and_read() {
        let mut ctx = ScriptContext::default();
        let lamp = ctx.spawn_entity("Lamp");
        let light = lamp.add_component(&mut ctx, PointLightComponent::default()).unwrap();

        light.update(&mut ctx, |l| l.set_radius(25.0)).unwrap();
        assert_relative_eq!(light.read(&ctx, PointLightComponent::radius).unwrap(), 25.0);
    }

    #[test]
    fn test_stale_component_ref_fails() {
        let mut ctx = ScriptContext::default();
        let lamp = ctx.spawn_entity("Lamp");
        let light = lamp.add_component(&mut ctx, PointLightComponent::default()).unwrap();

        lamp.remove_component::<PointLightComponent>(&mut ctx).unwrap();
        assert!(!light.is_valid(&ctx));
        assert!(matches!(
            light.get(&ctx),
            Err(ScriptError::Scene(SceneError::MissingComponent { .. }))
        ));
    }

    #[test]
    fn test_dyn_light_access() {
        let mut ctx = ScriptContext::default();
        let lamp = ctx.spawn_entity("Lamp");
        let light = lamp.add_component(&mut ctx, PointLightComponent::default()).unwrap().as_dyn();

        light.light_mut(&mut ctx).unwrap().properties_mut().light_color = Color3::new(1.0, 0.0, 0.0);
        assert_eq!(light.light(&ctx).unwrap().properties().light_color, Color3::new(1.0, 0.0, 0.0));
        assert!(light.collider(&ctx).is_err());
        assert!(light.downcast::<PointLightComponent>().is_some());
        assert!(light.downcast::<SphereColliderComponent>().is_none());
    }

    #[test]
    fn test_scene_component_world_transform() {
        let mut ctx = ScriptContext::default();
        let ship = ctx.spawn_entity("Ship");
        ship.set_world_location(&mut ctx, Vector3::new(5.0, 0.0, 0.0)).unwrap();
        let collider = ship.add_component(&mut ctx, SphereColliderComponent::new(1.0)).unwrap();

        collider
            .set_relative_transform(&mut ctx, Transform::from_location(Vector3::new(0.0, 2.0, 0.0)))
            .unwrap();
        assert_relative_eq!(
            collider.world_transform(&ctx).unwrap().location,
            Vector3::new(5.0, 2.0, 0.0),
            epsilon = EPSILON
        );

        collider
            .set_world_transform(&mut ctx, Transform::from_location(Vector3::new(5.0, 0.0, 1.0)))
            .unwrap();
        assert_relative_eq!(
            collider.relative_transform(&ctx).unwrap().location,
            Vector3::new(0.0, 0.0, 1.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_static_body_rejects_force() {
        let mut ctx = ScriptContext::default();
        let wall = ctx.spawn_entity("Wall");
        let body = wall.add_component(&mut ctx, RigidBodyComponent::fixed()).unwrap();

        let err = body.add_force(&mut ctx, Vector3::Y, ForceMode::Impulse).unwrap_err();
        assert!(matches!(err, ScriptError::Scene(SceneError::BodyNotDynamic(guid)) if guid == wall.guid()));
    }

    #[test]
    fn test_audio_component_playback() {
        let mut ctx = ScriptContext::default();
        ctx.set_audio_device(Box::new(NullAudioDevice::new()));
        let mut asset = AudioAsset::default();
        asset.set_volume(0.5);
        let sound = ctx
            .assets_mut()
            .register("Content/Sounds/engine.wav", AssetData::Audio(asset))
            .unwrap();

        let ship = ctx.spawn_entity("Ship");
        ship.set_world_location(&mut ctx, Vector3::new(0.0, 3.0, 0.0)).unwrap();
        let source = ship.add_component(&mut ctx, AudioComponent::new(sound)).unwrap();

        source.play(&mut ctx).unwrap();
        assert!(source.is_playing(&ctx).unwrap());

        source.set_paused(&mut ctx, true).unwrap();
        assert!(!source.is_playing(&ctx).unwrap());

        source.stop(&mut ctx).unwrap();
        assert!(source.read(&ctx, AudioComponent::playing_handle).unwrap().is_none());
    }

    #[test]
    fn test_audio_component_stop_after_voice_ended() {
        let mut ctx = ScriptContext::default();
        let sound = ctx
            .assets_mut()
            .register("Content/Sounds/beep.wav", AssetData::Audio(AudioAsset::default()))
            .unwrap();
        let beacon = ctx.spawn_entity("Beacon");
        let source = beacon.add_component(&mut ctx, AudioComponent::new(sound)).unwrap();

        let first = source.play(&mut ctx).unwrap();
        ctx.audio_mut().stop(first).unwrap();

        // Restarting and stopping both tolerate the voice being gone
        let second = source.play(&mut ctx).unwrap();
        assert_ne!(first, second);
        ctx.audio_mut().stop(second).unwrap();
        source.stop(&mut ctx).unwrap();
        assert!(source.read(&ctx, AudioComponent::playing_handle).unwrap().is_none());
    }

    #[test]
    fn test_audio_component_without_sound() {
        let mut ctx = ScriptContext::default();
        let ship = ctx.spawn_entity("Ship");
        let source = ship.add_component(&mut ctx, AudioComponent::default()).unwrap();

        assert!(matches!(
            source.play(&mut ctx),
            Err(ScriptError::Scene(SceneError::InvalidValue { what: "sound", .. }))
        ));
    }
}
