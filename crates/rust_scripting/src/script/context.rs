//! Everything a script can reach
//!
//! The engine-wide facades (scene, renderer, audio, input, project, assets)
//! live in one [`ScriptContext`] that the host lends to every script call.
//! There is no global state: tests build a context directly.

use super::callbacks::CallbackRegistry;
use super::entity::Entity;
use crate::assets::AssetRegistry;
use crate::audio::{AudioDevice, NullAudioDevice};
use crate::config::HostConfig;
use crate::ecs::Scene;
use crate::foundation::math::Vector3;
use crate::input::InputState;
use crate::physics::{self, RaycastHit};
use crate::project::ProjectPaths;
use crate::renderer::RendererSettings;

/// Subsystems shared by all scripts
pub struct ScriptContext {
    scene: Scene,
    renderer: RendererSettings,
    input: InputState,
    audio: Box<dyn AudioDevice>,
    project: ProjectPaths,
    assets: AssetRegistry,
    callbacks: CallbackRegistry,
    gravity: Vector3,
    scene_request: Option<String>,
}

impl ScriptContext {
    /// Create a context around `scene` using the host settings
    pub fn new(scene: Scene, config: &HostConfig) -> Self {
        let scene = scene.with_duplicate_policy(config.duplicate_component_policy);
        Self {
            scene,
            renderer: RendererSettings::default(),
            input: InputState::new(),
            audio: Box::new(NullAudioDevice::new()),
            project: ProjectPaths::from(&config.project),
            assets: AssetRegistry::new(),
            callbacks: CallbackRegistry::new(config.catch_panics),
            gravity: config.physics.gravity,
            scene_request: None,
        }
    }

    /// Scene store
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene store
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Renderer settings
    pub fn renderer(&self) -> &RendererSettings {
        &self.renderer
    }

    /// Mutable renderer settings
    pub fn renderer_mut(&mut self) -> &mut RendererSettings {
        &mut self.renderer
    }

    /// Keyboard and mouse state
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Mutable input state, e.g. to change the cursor mode
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Audio device
    pub fn audio(&self) -> &dyn AudioDevice {
        self.audio.as_ref()
    }

    /// Mutable audio device
    pub fn audio_mut(&mut self) -> &mut dyn AudioDevice {
        self.audio.as_mut()
    }

    /// Swap the audio device, stopping every voice on the old one
    pub fn set_audio_device(&mut self, device: Box<dyn AudioDevice>) {
        self.audio.stop_all();
        self.audio = device;
    }

    /// Project directories
    pub fn project(&self) -> &ProjectPaths {
        &self.project
    }

    /// Asset registry
    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    /// Mutable asset registry
    pub fn assets_mut(&mut self) -> &mut AssetRegistry {
        &mut self.assets
    }

    pub(crate) fn callbacks(&self) -> &CallbackRegistry {
        &self.callbacks
    }

    pub(crate) fn callbacks_mut(&mut self) -> &mut CallbackRegistry {
        &mut self.callbacks
    }

    /// Create a new root entity
    pub fn spawn_entity(&mut self, name: impl Into<String>) -> Entity {
        Entity::from_guid(self.scene.create_entity(name))
    }

    /// First entity with the given name
    pub fn entity_by_name(&self, name: &str) -> Option<Entity> {
        self.scene.find_entity_by_name(name).map(Entity::from_guid)
    }

    /// Ask the host to switch scenes once the current frame is done
    ///
    /// A later request in the same frame replaces an earlier one.
    pub fn open_scene(&mut self, path: impl Into<String>) {
        let path = path.into();
        log::info!("Scene change to '{}' requested", path);
        self.scene_request = Some(path);
    }

    /// Take the pending scene change, if any
    pub fn take_scene_request(&mut self) -> Option<String> {
        self.scene_request.take()
    }

    /// Closest solid collider hit by a ray
    pub fn raycast(&self, origin: Vector3, direction: Vector3, max_distance: f32) -> Option<RaycastHit> {
        physics::raycast(&self.scene, origin, direction, max_distance)
    }

    /// World gravity applied by the physics step
    pub fn gravity(&self) -> Vector3 {
        self.gravity
    }

    /// Change world gravity
    pub fn set_gravity(&mut self, gravity: Vector3) {
        self.gravity = gravity;
    }

    /// Replace the scene, dropping every entity callback
    pub(crate) fn replace_scene(&mut self, scene: Scene) -> Scene {
        let policy = self.scene.duplicate_policy();
        self.callbacks.clear();
        self.audio.stop_all();
        std::mem::replace(&mut self.scene, scene.with_duplicate_policy(policy))
    }
}

impl Default for ScriptContext {
    fn default() -> Self {
        Self::new(Scene::default(), &HostConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{DuplicateComponentPolicy, SphereColliderComponent};
    use crate::foundation::math::Transform;

    #[test]
    fn test_context_follows_config() {
        let config = HostConfig::default().with_duplicate_component_policy(DuplicateComponentPolicy::Replace);
        let ctx = ScriptContext::new(Scene::new("Level"), &config);

        assert_eq!(ctx.scene().duplicate_policy(), DuplicateComponentPolicy::Replace);
        assert_eq!(ctx.gravity(), config.physics.gravity);
        assert_eq!(ctx.project().content(), std::path::Path::new("./Content"));
    }

    #[test]
    fn test_scene_request_is_taken_once() {
        let mut ctx = ScriptContext::default();
        ctx.open_scene("Content/Scenes/Menu.eagle");
        ctx.open_scene("Content/Scenes/Level1.eagle");

        assert_eq!(ctx.take_scene_request().as_deref(), Some("Content/Scenes/Level1.eagle"));
        assert_eq!(ctx.take_scene_request(), None);
    }

    #[test]
    fn test_spawn_and_find() {
        let mut ctx = ScriptContext::default();
        let ship = ctx.spawn_entity("Ship");

        assert_eq!(ctx.entity_by_name("Ship"), Some(ship));
        assert_eq!(ctx.entity_by_name("Rock"), None);
    }

    #[test]
    fn test_raycast_through_context() {
        let mut ctx = ScriptContext::default();
        let rock = ctx.spawn_entity("Rock");
        rock.set_world_transform(&mut ctx, Transform::from_location(Vector3::new(0.0, 0.0, -10.0)))
            .unwrap();
        rock.add_component(&mut ctx, SphereColliderComponent::new(1.0)).unwrap();

        let hit = ctx.raycast(Vector3::ZERO, Vector3::new(0.0, 0.0, -1.0), 100.0).unwrap();
        assert_eq!(hit.entity, rock.guid());
        assert!(ctx.raycast(Vector3::ZERO, Vector3::X, 100.0).is_none());
    }
}
