//! Scripting surface
//!
//! Scripts implement [`Script`] and are driven by a [`ScriptHost`]. Each hook
//! receives the shared [`ScriptContext`] and the [`Entity`] the script is
//! attached to. Handles ([`Entity`], [`ComponentRef`]) are plain `Copy`
//! values that resolve through the context on every call.

mod callbacks;
mod component_ref;
mod context;
mod entity;
mod error;
mod host;

pub use callbacks::{CollisionCallback, ContactEvent, SubscriptionId, TriggerCallback};
pub use component_ref::{ComponentRef, DynComponentRef};
pub use context::ScriptContext;
pub use entity::Entity;
pub use error::{ScriptError, ScriptResult};
pub use host::{Script, ScriptHost};
