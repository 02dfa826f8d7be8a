//! Per-entity collision and trigger observers
//!
//! Each entity owns four observer lists. Dispatch runs subscribers in
//! registration order. While a list is being dispatched it is taken out of
//! the registry: removals made meanwhile are recorded as cancellations and
//! honoured before the next subscriber runs, additions land in a fresh list
//! that is appended once dispatch completes.

use std::collections::{HashMap, HashSet};

use super::context::ScriptContext;
use super::entity::Entity;
use super::error::{ScriptError, ScriptResult};
use super::host::guarded;
use crate::foundation::guid::Guid;
use crate::physics::CollisionInfo;

/// Observer of collision contacts: `(ctx, self, other, info)`
pub type CollisionCallback = Box<dyn FnMut(&mut ScriptContext, Entity, Entity, &CollisionInfo) -> ScriptResult>;

/// Observer of trigger overlaps: `(ctx, self, other)`
pub type TriggerCallback = Box<dyn FnMut(&mut ScriptContext, Entity, Entity) -> ScriptResult>;

/// Which contact notification an observer listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactEvent {
    /// Two solid colliders started touching
    CollisionBegin,
    /// Two solid colliders stopped touching
    CollisionEnd,
    /// Something entered a trigger
    TriggerBegin,
    /// Something left a trigger
    TriggerEnd,
}

impl ContactEvent {
    const fn is_collision(self) -> bool {
        matches!(self, Self::CollisionBegin | Self::CollisionEnd)
    }
}

/// Identifies one registered observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Key = (Guid, ContactEvent);
type ObserverMap<F> = HashMap<Key, Vec<(SubscriptionId, F)>>;

/// Observer lists of every entity in the scene
pub struct CallbackRegistry {
    collision: ObserverMap<CollisionCallback>,
    trigger: ObserverMap<TriggerCallback>,
    owners: HashMap<SubscriptionId, Key>,
    cancelled: HashSet<SubscriptionId>,
    catch_panics: bool,
    next_id: u64,
}

impl CallbackRegistry {
    pub(crate) fn new(catch_panics: bool) -> Self {
        Self {
            collision: HashMap::new(),
            trigger: HashMap::new(),
            owners: HashMap::new(),
            cancelled: HashSet::new(),
            catch_panics,
            next_id: 1,
        }
    }

    pub(crate) fn catch_panics(&self) -> bool {
        self.catch_panics
    }

    fn next_id(&mut self, key: Key) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.owners.insert(id, key);
        id
    }

    pub(crate) fn add_collision(&mut self, entity: Guid, event: ContactEvent, callback: CollisionCallback) -> SubscriptionId {
        debug_assert!(event.is_collision());
        let id = self.next_id((entity, event));
        self.collision.entry((entity, event)).or_default().push((id, callback));
        id
    }

    pub(crate) fn add_trigger(&mut self, entity: Guid, event: ContactEvent, callback: TriggerCallback) -> SubscriptionId {
        debug_assert!(!event.is_collision());
        let id = self.next_id((entity, event));
        self.trigger.entry((entity, event)).or_default().push((id, callback));
        id
    }

    /// Remove an observer; false when `id` is not registered on that list
    pub(crate) fn remove(&mut self, entity: Guid, event: ContactEvent, id: SubscriptionId) -> bool {
        if self.owners.get(&id) != Some(&(entity, event)) {
            return false;
        }
        self.owners.remove(&id);

        let removed = if event.is_collision() {
            detach(&mut self.collision, (entity, event), id)
        } else {
            detach(&mut self.trigger, (entity, event), id)
        };
        if !removed {
            // The list is out for dispatch
            self.cancelled.insert(id);
        }
        true
    }

    /// Number of live observers on one list
    #[cfg(test)]
    pub(crate) fn count(&self, entity: Guid, event: ContactEvent) -> usize {
        self.owners.values().filter(|key| **key == (entity, event)).count()
    }

    /// Drop every list owned by `entity`
    pub(crate) fn remove_entity(&mut self, entity: Guid) {
        self.collision.retain(|(owner, _), _| *owner != entity);
        self.trigger.retain(|(owner, _), _| *owner != entity);
        self.owners.retain(|_, (owner, _)| *owner != entity);
    }

    pub(crate) fn clear(&mut self) {
        self.collision.clear();
        self.trigger.clear();
        self.owners.clear();
        self.cancelled.clear();
    }
}

fn detach<F>(map: &mut ObserverMap<F>, key: Key, id: SubscriptionId) -> bool {
    let Some(list) = map.get_mut(&key) else {
        return false;
    };
    let before = list.len();
    list.retain(|(existing, _)| *existing != id);
    let removed = list.len() != before;
    if list.is_empty() {
        map.remove(&key);
    }
    removed
}

fn dispatch<F>(
    ctx: &mut ScriptContext,
    key: Key,
    select: fn(&mut CallbackRegistry) -> &mut ObserverMap<F>,
    mut invoke: impl FnMut(&mut ScriptContext, &mut F) -> ScriptResult,
) -> Vec<ScriptError> {
    let Some(mut list) = select(ctx.callbacks_mut()).remove(&key) else {
        return Vec::new();
    };
    let catch_panics = ctx.callbacks().catch_panics();

    let mut errors = Vec::new();
    for (id, callback) in &mut list {
        if ctx.callbacks().cancelled.contains(&*id) {
            continue;
        }
        if let Err(err) = guarded(catch_panics, || invoke(ctx, callback)) {
            errors.push(err);
        }
    }

    let registry = ctx.callbacks_mut();
    list.retain(|(id, _)| !registry.cancelled.remove(id));
    // The entity may have been dropped while its list was out
    list.retain(|(id, _)| registry.owners.contains_key(id));
    if let Some(added) = select(registry).remove(&key) {
        list.extend(added);
    }
    if !list.is_empty() {
        select(registry).insert(key, list);
    }
    errors
}

/// Run the collision observers of `entity`
pub(crate) fn dispatch_collision(
    ctx: &mut ScriptContext,
    event: ContactEvent,
    entity: Guid,
    other: Guid,
    info: &CollisionInfo,
) -> Vec<ScriptError> {
    let (this, other) = (Entity::from_guid(entity), Entity::from_guid(other));
    dispatch::<CollisionCallback>(ctx, (entity, event), |r| &mut r.collision, |ctx, callback| callback(ctx, this, other, info))
}

/// Run the trigger observers of `entity`
pub(crate) fn dispatch_trigger(ctx: &mut ScriptContext, event: ContactEvent, entity: Guid, other: Guid) -> Vec<ScriptError> {
    let (this, other) = (Entity::from_guid(entity), Entity::from_guid(other));
    dispatch::<TriggerCallback>(ctx, (entity, event), |r| &mut r.trigger, |ctx, callback| callback(ctx, this, other))
}
