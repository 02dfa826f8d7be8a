//! Script host: lifecycle dispatch and the frame loop
//!
//! The host owns the [`ScriptContext`] and one script per entity. Every
//! script call is guarded: an `Err` (or a caught panic) is logged with the
//! entity and the hook that failed, and the frame carries on.

use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};

use super::callbacks::{self, ContactEvent};
use super::context::ScriptContext;
use super::entity::Entity;
use super::error::{ScriptError, ScriptResult};
use crate::audio::AudioDevice;
use crate::config::HostConfig;
use crate::ecs::{AudioComponent, Scene};
use crate::events::Event;
use crate::foundation::guid::Guid;
use crate::foundation::time::{FixedStepAccumulator, Timestep};
use crate::physics::{self, CollisionInfo};

/// Behaviour attached to an entity
///
/// Every hook defaults to doing nothing.
#[allow(unused_variables)]
pub trait Script {
    /// Called once when the script is attached
    fn on_create(&mut self, ctx: &mut ScriptContext, entity: Entity) -> ScriptResult {
        Ok(())
    }

    /// Called once before the entity is removed from the scene
    fn on_destroy(&mut self, ctx: &mut ScriptContext, entity: Entity) -> ScriptResult {
        Ok(())
    }

    /// Called every frame with the frame time
    fn on_update(&mut self, ctx: &mut ScriptContext, entity: Entity, ts: Timestep) -> ScriptResult {
        Ok(())
    }

    /// Called once per fixed physics step, before bodies are integrated
    fn on_physics_update(&mut self, ctx: &mut ScriptContext, entity: Entity, ts: Timestep) -> ScriptResult {
        Ok(())
    }

    /// Called for every window and input event
    fn on_event(&mut self, ctx: &mut ScriptContext, entity: Entity, event: &Event) -> ScriptResult {
        Ok(())
    }
}

/// Run `f`, turning a panic into [`ScriptError::Panicked`] when asked to
pub(crate) fn guarded<R>(catch_panics: bool, f: impl FnOnce() -> ScriptResult<R>) -> ScriptResult<R> {
    if !catch_panics {
        return f();
    }
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| Err(ScriptError::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn report(ctx: &ScriptContext, hook: &str, entity: Guid, err: &ScriptError) {
    let name = ctx.scene().entity_name(entity).unwrap_or("<destroyed>");
    log::error!("{} failed on entity '{}' ({}): {}", hook, name, entity, err);
}

/// Owns the script context and drives every attached script
pub struct ScriptHost {
    config: HostConfig,
    context: ScriptContext,
    scripts: Vec<(Entity, Box<dyn Script>)>,
    accumulator: FixedStepAccumulator,
    started: bool,
}

impl ScriptHost {
    /// Create a host around `scene`
    pub fn new(config: HostConfig, scene: Scene) -> Self {
        let context = ScriptContext::new(scene, &config);
        let accumulator = FixedStepAccumulator::new(config.physics.fixed_time_step, config.physics.max_steps_per_frame);
        log::info!(
            "Script host ready for project '{}' (physics step {:.4}s)",
            config.project.name,
            accumulator.step().seconds()
        );
        Self {
            config,
            context,
            scripts: Vec::new(),
            accumulator,
            started: false,
        }
    }

    /// Builder: use `device` for audio playback
    pub fn with_audio_device(mut self, device: Box<dyn AudioDevice>) -> Self {
        self.context.set_audio_device(device);
        self
    }

    /// Host settings
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Shared script context
    pub fn context(&self) -> &ScriptContext {
        &self.context
    }

    /// Mutable script context, e.g. to set up a scene
    pub fn context_mut(&mut self) -> &mut ScriptContext {
        &mut self.context
    }

    /// Number of attached scripts
    pub fn script_count(&self) -> usize {
        self.scripts.len()
    }

    /// Whether `entity` has a script
    pub fn has_script(&self, entity: Entity) -> bool {
        self.scripts.iter().any(|(owner, _)| *owner == entity)
    }

    /// Attach `script` to `entity` and run its `on_create`
    ///
    /// An entity carries at most one script; a second one replaces the first
    /// without running its `on_destroy`.
    pub fn attach_script(&mut self, entity: Entity, script: impl Script + 'static) -> ScriptResult {
        self.context.scene().resolve(entity.guid())?;
        let mut script: Box<dyn Script> = Box::new(script);

        let catch_panics = self.config.catch_panics;
        let ctx = &mut self.context;
        if let Err(err) = guarded(catch_panics, || script.on_create(ctx, entity)) {
            report(ctx, "on_create", entity.guid(), &err);
        }

        match self.scripts.iter_mut().find(|(owner, _)| *owner == entity) {
            Some(slot) => {
                log::warn!("Replacing the script of {}", entity);
                slot.1 = script;
            }
            None => self.scripts.push((entity, script)),
        }
        Ok(())
    }

    /// Remove the script of `entity` without running `on_destroy`
    pub fn detach_script(&mut self, entity: Entity) -> Option<Box<dyn Script>> {
        let index = self.scripts.iter().position(|(owner, _)| *owner == entity)?;
        Some(self.scripts.remove(index).1)
    }

    /// Feed an event to the input state, then to every script
    pub fn dispatch_event(&mut self, event: &Event) {
        log::trace!("{}", event);
        self.context.input_mut().on_event(event);

        let catch_panics = self.config.catch_panics;
        for (entity, script) in &mut self.scripts {
            let ctx = &mut self.context;
            if let Err(err) = guarded(catch_panics, || script.on_event(ctx, *entity, event)) {
                report(ctx, "on_event", entity.guid(), &err);
            }
        }
    }

    /// Start the scene: play every autoplay audio source
    ///
    /// Runs once per scene. The first [`update`](Self::update) calls it when
    /// the embedder has not.
    pub fn begin_play(&mut self) {
        if self.started {
            return;
        }
        self.started = true;

        for guid in self.context.scene().entities_with::<AudioComponent>() {
            let Some(source) = Entity::from_guid(guid).get_component::<AudioComponent>(&self.context) else {
                continue;
            };
            let autoplay = source
                .read(&self.context, |c| c.autoplay && !c.sound.is_null())
                .unwrap_or(false);
            if !autoplay {
                continue;
            }
            if let Err(err) = source.play(&mut self.context) {
                log::warn!("Could not autoplay the sound of {}: {}", guid, err);
            }
        }
    }

    /// Whether [`begin_play`](Self::begin_play) ran for the current scene
    pub fn has_begun_play(&self) -> bool {
        self.started
    }

    /// Run one frame: `on_update`, fixed physics steps, then destruction
    pub fn update(&mut self, ts: Timestep) {
        self.begin_play();

        let catch_panics = self.config.catch_panics;
        for (entity, script) in &mut self.scripts {
            let ctx = &mut self.context;
            if let Err(err) = guarded(catch_panics, || script.on_update(ctx, *entity, ts)) {
                report(ctx, "on_update", entity.guid(), &err);
            }
        }

        self.physics_update(ts);
        self.flush_destroyed();
    }

    /// Bank `ts` and run as many fixed physics steps as are due
    ///
    /// Returns the number of steps run.
    pub fn physics_update(&mut self, ts: Timestep) -> u32 {
        let steps = self.accumulator.advance(ts);
        let step = self.accumulator.step();
        let catch_panics = self.config.catch_panics;

        for _ in 0..steps {
            for (entity, script) in &mut self.scripts {
                let ctx = &mut self.context;
                if let Err(err) = guarded(catch_panics, || script.on_physics_update(ctx, *entity, step)) {
                    report(ctx, "on_physics_update", entity.guid(), &err);
                }
            }
            let gravity = self.context.gravity();
            physics::step(self.context.scene_mut(), gravity, step.seconds());
        }

        if steps > 0 {
            self.sync_audio_sources();
        }
        steps
    }

    fn sync_audio_sources(&mut self) {
        for guid in self.context.scene().entities_with::<AudioComponent>() {
            let Some(source) = Entity::from_guid(guid).get_component::<AudioComponent>(&self.context) else {
                continue;
            };
            if let Err(err) = source.sync_position(&mut self.context) {
                log::warn!("Could not move the sound of {}: {}", guid, err);
            }
        }
    }

    /// Remove entities queued for destruction
    ///
    /// Scripts of doomed entities get `on_destroy` while the entity is still
    /// readable. Entities destroyed from `on_destroy` are collected in the
    /// same flush.
    pub fn flush_destroyed(&mut self) -> Vec<Guid> {
        let catch_panics = self.config.catch_panics;
        let mut notified = HashSet::new();
        loop {
            let doomed: Vec<Guid> = self
                .context
                .scene()
                .pending_destroy()
                .into_iter()
                .filter(|guid| notified.insert(*guid))
                .collect();
            if doomed.is_empty() {
                break;
            }
            for guid in doomed {
                let entity = Entity::from_guid(guid);
                if let Some(source) = entity.get_component::<AudioComponent>(&self.context) {
                    if let Err(err) = source.stop(&mut self.context) {
                        log::warn!("Could not stop the sound of {}: {}", guid, err);
                    }
                }
                let Some((_, script)) = self.scripts.iter_mut().find(|(owner, _)| *owner == entity) else {
                    continue;
                };
                let ctx = &mut self.context;
                if let Err(err) = guarded(catch_panics, || script.on_destroy(ctx, entity)) {
                    report(ctx, "on_destroy", guid, &err);
                }
            }
        }

        let removed = self.context.scene_mut().flush_destroyed();
        for guid in &removed {
            self.context.callbacks_mut().remove_entity(*guid);
        }
        self.scripts.retain(|(entity, _)| !removed.contains(&entity.guid()));
        removed
    }

    /// Two solid colliders started touching
    pub fn notify_collision_begin(&mut self, a: Entity, b: Entity, info: &CollisionInfo) {
        self.notify_collision(ContactEvent::CollisionBegin, a, b, info);
    }

    /// Two solid colliders stopped touching
    pub fn notify_collision_end(&mut self, a: Entity, b: Entity, info: &CollisionInfo) {
        self.notify_collision(ContactEvent::CollisionEnd, a, b, info);
    }

    /// `other` entered `trigger`
    pub fn notify_trigger_begin(&mut self, trigger: Entity, other: Entity) {
        self.notify_trigger(ContactEvent::TriggerBegin, trigger, other);
    }

    /// `other` left `trigger`
    pub fn notify_trigger_end(&mut self, trigger: Entity, other: Entity) {
        self.notify_trigger(ContactEvent::TriggerEnd, trigger, other);
    }

    fn notify_collision(&mut self, event: ContactEvent, a: Entity, b: Entity, info: &CollisionInfo) {
        for (this, other) in [(a, b), (b, a)] {
            if !this.is_valid(&self.context) {
                continue;
            }
            for err in callbacks::dispatch_collision(&mut self.context, event, this.guid(), other.guid(), info) {
                report(&self.context, "collision callback", this.guid(), &err);
            }
        }
    }

    fn notify_trigger(&mut self, event: ContactEvent, trigger: Entity, other: Entity) {
        for (this, other) in [(trigger, other), (other, trigger)] {
            if !this.is_valid(&self.context) {
                continue;
            }
            for err in callbacks::dispatch_trigger(&mut self.context, event, this.guid(), other.guid()) {
                report(&self.context, "trigger callback", this.guid(), &err);
            }
        }
    }

    /// Pending scene change requested by a script
    pub fn take_scene_request(&mut self) -> Option<String> {
        self.context.take_scene_request()
    }

    /// Swap in a new scene
    ///
    /// Every script gets `on_destroy` and is dropped along with all entity
    /// callbacks. The next frame begins play on the new scene. Returns the
    /// old scene.
    pub fn replace_scene(&mut self, scene: Scene) -> Scene {
        let catch_panics = self.config.catch_panics;
        for (entity, mut script) in std::mem::take(&mut self.scripts) {
            let ctx = &mut self.context;
            if let Err(err) = guarded(catch_panics, || script.on_destroy(ctx, entity)) {
                report(ctx, "on_destroy", entity.guid(), &err);
            }
        }
        log::info!("Switching to scene '{}'", scene.name());
        self.started = false;
        self.context.replace_scene(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetData, AudioAsset};
    use crate::ecs::RigidBodyComponent;
    use crate::script::ComponentRef;
    use crate::foundation::math::Vector3;
    use crate::input::KeyCode;
    use crate::physics::{PhysicsBodyType, PhysicsSettings};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Journal = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        journal: Journal,
    }

    impl Recorder {
        fn log(&self, ctx: &ScriptContext, entity: Entity, hook: &str) {
            let name = entity.name(ctx).unwrap_or_default();
            self.journal.borrow_mut().push(format!("{name}:{hook}"));
        }
    }

    impl Script for Recorder {
        fn on_create(&mut self, ctx: &mut ScriptContext, entity: Entity) -> ScriptResult {
            self.log(ctx, entity, "create");
            Ok(())
        }

        fn on_destroy(&mut self, ctx: &mut ScriptContext, entity: Entity) -> ScriptResult {
            self.log(ctx, entity, "destroy");
            Ok(())
        }

        fn on_update(&mut self, ctx: &mut ScriptContext, entity: Entity, _ts: Timestep) -> ScriptResult {
            self.log(ctx, entity, "update");
            Ok(())
        }

        fn on_physics_update(&mut self, ctx: &mut ScriptContext, entity: Entity, _ts: Timestep) -> ScriptResult {
            self.log(ctx, entity, "physics");
            Ok(())
        }

        fn on_event(&mut self, ctx: &mut ScriptContext, entity: Entity, event: &Event) -> ScriptResult {
            if let Event::KeyPressed { key, .. } = event {
                let held = ctx.input().is_key_pressed(*key);
                self.log(ctx, entity, &format!("key {key} held={held}"));
            }
            Ok(())
        }
    }

    fn host() -> ScriptHost {
        let config = HostConfig::default().with_physics(PhysicsSettings {
            fixed_time_step: 0.25,
            gravity: Vector3::new(0.0, -10.0, 0.0),
            max_steps_per_frame: 4,
        });
        ScriptHost::new(config, Scene::new("Test"))
    }

    fn recorded(host: &mut ScriptHost, name: &str) -> (Entity, Journal) {
        let journal = Journal::default();
        let entity = host.context_mut().spawn_entity(name);
        host.attach_script(entity, Recorder { journal: Rc::clone(&journal) }).unwrap();
        (entity, journal)
    }

    #[test]
    fn test_frame_order() {
        let mut host = host();
        let (_, journal) = recorded(&mut host, "Ship");

        host.update(Timestep::from_seconds(0.5));

        assert_eq!(
            *journal.borrow(),
            vec!["Ship:create", "Ship:update", "Ship:physics", "Ship:physics"]
        );
    }

    #[test]
    fn test_physics_moves_dynamic_bodies() {
        let mut host = host();
        let ball = host.context_mut().spawn_entity("Ball");
        let mut body = RigidBodyComponent::dynamic();
        body.set_linear_damping(0.0);
        ball.add_component(host.context_mut(), body).unwrap();
        assert_eq!(
            ball.get_component::<RigidBodyComponent>(host.context())
                .unwrap()
                .read(host.context(), RigidBodyComponent::body_type)
                .unwrap(),
            PhysicsBodyType::Dynamic
        );

        assert_eq!(host.physics_update(Timestep::from_seconds(0.25)), 1);
        assert!(ball.world_location(host.context()).unwrap().y < 0.0);
    }

    #[test]
    fn test_event_reaches_input_before_scripts() {
        let mut host = host();
        let (_, journal) = recorded(&mut host, "Player");

        host.dispatch_event(&Event::KeyPressed { key: KeyCode::SPACE, repeat_count: 0 });

        assert_eq!(journal.borrow().last().unwrap(), "Player:key 32 held=true");
    }

    #[test]
    fn test_destroy_runs_on_destroy_and_drops_script() {
        let mut host = host();
        let (rock, journal) = recorded(&mut host, "Rock");
        let (shard, child_journal) = recorded(&mut host, "Shard");
        shard.set_parent(host.context_mut(), Some(rock)).unwrap();
        rock.on_trigger_begin(host.context_mut(), |_, _, _| Ok(())).unwrap();

        rock.destroy(host.context_mut()).unwrap();
        host.update(Timestep::from_seconds(0.0));

        assert_eq!(journal.borrow().last().unwrap(), "Rock:destroy");
        assert_eq!(child_journal.borrow().last().unwrap(), "Shard:destroy");
        assert_eq!(host.script_count(), 0);
        assert_eq!(host.context().callbacks().count(rock.guid(), ContactEvent::TriggerBegin), 0);
        assert!(host.context().scene().is_destroyed(shard.guid()));
    }

    struct Failing;

    impl Script for Failing {
        fn on_update(&mut self, _ctx: &mut ScriptContext, _entity: Entity, _ts: Timestep) -> ScriptResult {
            Err(ScriptError::failed("out of fuel"))
        }

        fn on_physics_update(&mut self, _ctx: &mut ScriptContext, _entity: Entity, _ts: Timestep) -> ScriptResult {
            panic!("physics bug");
        }
    }

    #[test]
    fn test_failures_do_not_stop_the_frame() {
        let mut host = host();
        let broken = host.context_mut().spawn_entity("Broken");
        host.attach_script(broken, Failing).unwrap();
        let (_, journal) = recorded(&mut host, "Healthy");

        host.update(Timestep::from_seconds(0.25));

        assert_eq!(
            *journal.borrow(),
            vec!["Healthy:create", "Healthy:update", "Healthy:physics"]
        );
    }

    #[test]
    fn test_collision_reaches_both_parties() {
        let mut host = host();
        let a = host.context_mut().spawn_entity("A");
        let b = host.context_mut().spawn_entity("B");
        let seen: Rc<RefCell<Vec<(Entity, Entity)>>> = Rc::default();

        for entity in [a, b] {
            let seen = Rc::clone(&seen);
            entity
                .on_collision_begin(host.context_mut(), move |_, this, other, _| {
                    seen.borrow_mut().push((this, other));
                    Ok(())
                })
                .unwrap();
        }

        host.notify_collision_begin(a, b, &CollisionInfo::default());
        assert_eq!(*seen.borrow(), vec![(a, b), (b, a)]);

        b.destroy(host.context_mut()).unwrap();
        host.notify_collision_begin(a, b, &CollisionInfo::default());
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn test_attach_to_unknown_entity_fails() {
        let mut host = host();
        let ghost = Entity::from_guid(Guid::new(7, 7));

        assert!(host.attach_script(ghost, Failing).is_err());
        assert_eq!(host.script_count(), 0);
    }

    fn audio_source(host: &mut ScriptHost, name: &str, sound: Guid, autoplay: bool) -> ComponentRef<AudioComponent> {
        let entity = host.context_mut().spawn_entity(name);
        let mut source = AudioComponent::new(sound);
        source.autoplay = autoplay;
        entity.add_component(host.context_mut(), source).unwrap()
    }

    #[test]
    fn test_autoplay_sources_start_on_first_frame() {
        let mut host = host();
        let sound = host
            .context_mut()
            .assets_mut()
            .register("Content/Sounds/ambience.wav", AssetData::Audio(AudioAsset::default()))
            .unwrap();
        let ambience = audio_source(&mut host, "Ambience", sound, true);
        let alarm = audio_source(&mut host, "Alarm", sound, false);
        let silent = audio_source(&mut host, "Silent", Guid::NULL, true);

        assert!(!host.has_begun_play());
        host.update(Timestep::from_seconds(0.0));

        assert!(host.has_begun_play());
        assert!(ambience.is_playing(host.context()).unwrap());
        assert!(!alarm.is_playing(host.context()).unwrap());
        assert!(!silent.is_playing(host.context()).unwrap());
    }

    #[test]
    fn test_replace_scene_begins_play_again() {
        let mut host = host();
        host.update(Timestep::from_seconds(0.0));
        assert!(host.has_begun_play());

        host.replace_scene(Scene::new("Next"));
        assert!(!host.has_begun_play());

        host.update(Timestep::from_seconds(0.0));
        assert!(host.has_begun_play());
    }

    #[test]
    fn test_replace_scene_destroys_scripts() {
        let mut host = host();
        let (_, journal) = recorded(&mut host, "Menu");
        host.context_mut().open_scene("Content/Scenes/Level1.eagle");

        let request = host.take_scene_request().unwrap();
        let old = host.replace_scene(Scene::new(request));

        assert_eq!(old.name(), "Test");
        assert_eq!(host.context().scene().name(), "Content/Scenes/Level1.eagle");
        assert_eq!(journal.borrow().last().unwrap(), "Menu:destroy");
        assert_eq!(host.script_count(), 0);
    }
}
