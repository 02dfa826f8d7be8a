//! Sandbox demo
//!
//! Runs a small headless scene: a rolling sphere, a shaking crate, a ball
//! falling into a trigger volume, and a ticking 2D sound. Pass a `.toml` or
//! `.ron` host config as the first argument to override the defaults.

use rand::Rng;
use rust_scripting::assets::{AssetData, AudioAsset};
use rust_scripting::config::ConfigError;
use rust_scripting::foundation::logging;
use rust_scripting::prelude::*;

const FRAMES: u32 = 180;
const FRAME_TIME: f32 = 1.0 / 60.0;

#[derive(thiserror::Error, Debug)]
enum SandboxError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Script error: {0}")]
    Script(#[from] ScriptError),
}

/// Rolls forward and spins around its right axis
struct Rolling {
    speed: f32,
}

impl Script for Rolling {
    fn on_update(&mut self, ctx: &mut ScriptContext, entity: Entity, ts: Timestep) -> ScriptResult {
        let forward = entity.forward_vector(ctx)?;
        entity.add_world_location(ctx, forward * self.speed * ts.seconds())?;

        let roll = mathf::rad_to_deg(self.speed * ts.seconds());
        entity.add_world_rotation(ctx, Rotator::from_euler_angles(Vector3::new(-roll, 0.0, 0.0)))
    }

    fn on_event(&mut self, ctx: &mut ScriptContext, entity: Entity, event: &Event) -> ScriptResult {
        if let Event::KeyPressed { key: KeyCode::SPACE, .. } = event {
            self.speed = -self.speed;
            log::info!("{} reverses at {}", entity.name(ctx)?, entity.world_location(ctx)?);
        }
        Ok(())
    }
}

/// Jitters around its spawn location
struct Shaking {
    origin: Vector3,
    amplitude: f32,
}

impl Script for Shaking {
    fn on_create(&mut self, ctx: &mut ScriptContext, entity: Entity) -> ScriptResult {
        self.origin = entity.world_location(ctx)?;
        Ok(())
    }

    fn on_update(&mut self, ctx: &mut ScriptContext, entity: Entity, _ts: Timestep) -> ScriptResult {
        let mut rng = rand::thread_rng();
        let offset = Vector3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        entity.set_world_location(ctx, self.origin + offset * self.amplitude)
    }
}

/// Watches the trigger volume
struct Zone;

impl Script for Zone {
    fn on_create(&mut self, ctx: &mut ScriptContext, entity: Entity) -> ScriptResult {
        entity.on_trigger_begin(ctx, |ctx, this, other| {
            log::info!("{} entered {}", other.name(ctx)?, this.name(ctx)?);
            Sound2D::play(ctx, "Content/Sounds/chime.wav", 1.0, 0)?;
            other.destroy(ctx)
        })?;
        Ok(())
    }

    fn on_destroy(&mut self, _ctx: &mut ScriptContext, entity: Entity) -> ScriptResult {
        log::info!("Zone {} removed", entity);
        Ok(())
    }
}

fn load_config() -> Result<HostConfig, SandboxError> {
    match std::env::args().nth(1) {
        Some(path) => Ok(HostConfig::load_from_file(path)?),
        None => Ok(HostConfig::default()),
    }
}

fn build_scene(host: &mut ScriptHost) -> Result<(Entity, Entity), SandboxError> {
    let ctx = host.context_mut();
    ctx.assets_mut()
        .register("Content/Sounds/chime.wav", AssetData::Audio(AudioAsset::default()))
        .map_err(ScriptError::from)?;

    let sphere = ctx.spawn_entity("Rolling Sphere");
    sphere.add_component(ctx, StaticMeshComponent::default())?;

    let crate_entity = ctx.spawn_entity("Shaking Crate");
    crate_entity.set_world_location(ctx, Vector3::new(4.0, 0.0, 0.0))?;
    crate_entity.add_component(ctx, BoxColliderComponent::new(Vector3::ONE))?;

    let zone = ctx.spawn_entity("Trigger Zone");
    zone.set_world_location(ctx, Vector3::new(0.0, -5.0, -8.0))?;
    let mut volume = BoxColliderComponent::new(Vector3::new(4.0, 1.0, 4.0));
    volume.collider.is_trigger = true;
    zone.add_component(ctx, volume)?;

    let ball = ctx.spawn_entity("Ball");
    ball.set_world_location(ctx, Vector3::new(0.0, 5.0, -8.0))?;
    ball.add_component(ctx, SphereColliderComponent::new(0.5))?;
    ball.add_component(ctx, RigidBodyComponent::dynamic().with_mass(2.0))?;

    host.attach_script(sphere, Rolling { speed: 2.0 })?;
    host.attach_script(crate_entity, Shaking { origin: Vector3::ZERO, amplitude: 0.05 })?;
    host.attach_script(zone, Zone)?;
    Ok((zone, ball))
}

fn main() -> Result<(), SandboxError> {
    let config = load_config()?;
    logging::init_with_level(config.log_level_filter());

    let mut host = ScriptHost::new(config, Scene::new("Sandbox"));
    let (zone, ball) = build_scene(&mut host)?;

    for frame in 0..FRAMES {
        if frame == FRAMES / 2 {
            host.dispatch_event(&Event::KeyPressed { key: KeyCode::SPACE, repeat_count: 0 });
        }
        host.update(Timestep::from_seconds(FRAME_TIME));

        // Contact generation belongs to the engine; fake the one we care about
        if ball.is_valid(host.context()) && ball.world_location(host.context())?.y <= -5.0 {
            host.notify_trigger_begin(zone, ball);
        }
    }

    let ctx = host.context();
    if let Some(hit) = ctx.raycast(Vector3::new(0.0, 10.0, -8.0), Vector3::new(0.0, -1.0, 0.0), 100.0) {
        log::info!("Ray from above hit {} at {}", hit.entity, hit.position);
    }
    log::info!(
        "Sandbox finished after {} frames with {} entities",
        FRAMES,
        ctx.scene().len()
    );
    Ok(())
}
