//! Entity-component store
//!
//! [`Scene`] is the authoritative owner of entities, their hierarchy, their
//! transforms and their components. Scripts never hold references into it;
//! they address entities by [`Guid`] and go through the store on every access.

use serde::{Deserialize, Serialize};

use crate::foundation::guid::Guid;

pub mod component;
pub mod components;
mod scene;

pub use component::{Component, ComponentKind, ComponentStore};
pub use components::*;
pub use scene::Scene;

slotmap::new_key_type! {
    /// Generational key of an entity slot inside a [`Scene`]
    pub struct EntityKey;
}

/// What `add_component` does when the entity already has that component
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DuplicateComponentPolicy {
    /// Fail with [`SceneError::DuplicateComponent`]
    #[default]
    Error,
    /// Keep the existing component and discard the new one
    KeepExisting,
    /// Overwrite the existing component
    Replace,
}

/// Errors raised by the scene store
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// No entity with this GUID ever existed in the scene
    #[error("Entity {0} not found")]
    EntityNotFound(Guid),

    /// The entity existed but has been destroyed
    #[error("Entity {0} has been destroyed")]
    EntityDestroyed(Guid),

    /// An entity with this GUID already exists
    #[error("Entity {0} already exists")]
    DuplicateEntity(Guid),

    /// The entity lacks the requested component
    #[error("Entity {entity} has no {kind}")]
    MissingComponent {
        /// Entity queried
        entity: Guid,
        /// Component kind requested
        kind: ComponentKind,
    },

    /// The component is already attached and the policy forbids duplicates
    #[error("Entity {entity} already has a {kind}")]
    DuplicateComponent {
        /// Entity queried
        entity: Guid,
        /// Component kind added twice
        kind: ComponentKind,
    },

    /// Reparenting would make an entity its own ancestor
    #[error("Parenting {child} to {parent} would create a cycle")]
    HierarchyCycle {
        /// Entity being reparented
        child: Guid,
        /// Requested parent
        parent: Guid,
    },

    /// An entity cannot be its own parent
    #[error("Entity {0} cannot be its own parent")]
    SelfParent(Guid),

    /// A component kind was used where another category was expected
    #[error("{kind} is not a {expected}")]
    KindMismatch {
        /// Kind supplied
        kind: ComponentKind,
        /// Category expected, e.g. "light"
        expected: &'static str,
    },

    /// A dynamic-only rigid body operation targeted a static body
    #[error("Rigid body of entity {0} is not dynamic")]
    BodyNotDynamic(Guid),

    /// A value was rejected by the store
    #[error("Invalid {what}: {reason}")]
    InvalidValue {
        /// What was invalid
        what: &'static str,
        /// Why
        reason: String,
    },
}

/// Convenience result alias for scene operations
pub type SceneResult<T> = Result<T, SceneError>;
