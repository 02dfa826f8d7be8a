//! # Rust Scripting
//!
//! The object model game scripts program against: math value types, GUIDs,
//! entities with a transform hierarchy and typed components, facades for the
//! renderer, audio, input, project and asset subsystems, and a host that
//! drives script lifecycles at a fixed physics rate.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rust_scripting::prelude::*;
//!
//! struct Spinner;
//!
//! impl Script for Spinner {
//!     fn on_update(&mut self, ctx: &mut ScriptContext, entity: Entity, ts: Timestep) -> ScriptResult {
//!         let spin = Rotator::from_euler_angles(Vector3::new(0.0, 90.0 * ts.seconds(), 0.0));
//!         entity.add_world_rotation(ctx, spin)
//!     }
//! }
//!
//! fn main() -> Result<(), ScriptError> {
//!     let mut host = ScriptHost::new(HostConfig::default(), Scene::new("Demo"));
//!     let cube = host.context_mut().spawn_entity("Cube");
//!     host.attach_script(cube, Spinner)?;
//!     host.update(Timestep::from_seconds(1.0 / 60.0));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;

pub mod assets;
pub mod audio;
pub mod config;
pub mod ecs;
pub mod events;
pub mod input;
pub mod physics;
pub mod project;
pub mod renderer;
pub mod script;

/// Common imports for script authors
pub mod prelude {
    pub use crate::{
        config::{Config, HostConfig},
        ecs::*,
        events::{Event, EventCategory, EventType},
        foundation::{
            guid::Guid,
            math::{mathf, Color3, Color4, Quat, Rotator, Transform, Vector2, Vector3, Vector4},
            time::Timestep,
        },
        input::{CursorMode, KeyCode, MouseButton},
        physics::{ActorLockFlag, CollisionInfo, ForceMode, PhysicsBodyType, RaycastHit},
        script::{ComponentRef, DynComponentRef, Entity, Script, ScriptContext, ScriptError, ScriptHost, ScriptResult},
        audio::{Sound2D, Sound3D},
    };
}
