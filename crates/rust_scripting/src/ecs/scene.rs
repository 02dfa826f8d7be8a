//! Scene store: entities, hierarchy, transforms and components
//!
//! Entities live in a generational slot map and are looked up by GUID.
//! Destroyed GUIDs are tombstoned and never reused, so a stale handle is
//! always reported as [`SceneError::EntityDestroyed`].

use std::collections::{HashMap, HashSet};

use slotmap::SlotMap;

use super::component::{Component, ComponentKind, ComponentStore};
use super::components::{
    AudioComponent, BoxColliderComponent, CameraComponent, CapsuleColliderComponent, Collider,
    DirectionalLightComponent, Light, MeshColliderComponent, PointLightComponent, ReverbComponent,
    SceneComponent, SphereColliderComponent, SpotLightComponent, StaticMeshComponent, TextComponent,
    TransformComponent,
};
use super::{DuplicateComponentPolicy, EntityKey, SceneError, SceneResult};
use crate::foundation::guid::Guid;
use crate::foundation::math::Transform;

#[derive(Debug)]
struct EntityRecord {
    guid: Guid,
    name: String,
    parent: Option<EntityKey>,
    children: Vec<EntityKey>,
    sequence: u64,
}

/// Authoritative store of entities and components
pub struct Scene {
    name: String,
    entities: SlotMap<EntityKey, EntityRecord>,
    by_guid: HashMap<Guid, EntityKey>,
    tombstones: HashSet<Guid>,
    pending_destroy: Vec<EntityKey>,
    components: ComponentStore,
    duplicate_policy: DuplicateComponentPolicy,
    next_sequence: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl Scene {
    /// Create an empty scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entities: SlotMap::with_key(),
            by_guid: HashMap::new(),
            tombstones: HashSet::new(),
            pending_destroy: Vec::new(),
            components: ComponentStore::default(),
            duplicate_policy: DuplicateComponentPolicy::default(),
            next_sequence: 0,
        }
    }

    /// Builder: set the duplicate component policy
    pub fn with_duplicate_policy(mut self, policy: DuplicateComponentPolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current duplicate component policy
    pub fn duplicate_policy(&self) -> DuplicateComponentPolicy {
        self.duplicate_policy
    }

    /// Change the duplicate component policy
    pub fn set_duplicate_policy(&mut self, policy: DuplicateComponentPolicy) {
        self.duplicate_policy = policy;
    }

    // ----------------------------------------------------------------------
    // Entity lifetime
    // ----------------------------------------------------------------------

    /// Create a root entity with a fresh GUID and an identity transform
    pub fn create_entity(&mut self, name: impl Into<String>) -> Guid {
        let guid = loop {
            let candidate = Guid::generate();
            if !self.by_guid.contains_key(&candidate) && !self.tombstones.contains(&candidate) {
                break candidate;
            }
        };
        self.insert_entity(guid, name.into());
        guid
    }

    /// Create a root entity with a known GUID, as when loading a saved scene
    pub fn create_entity_with_guid(&mut self, guid: Guid, name: impl Into<String>) -> SceneResult<Guid> {
        if guid.is_null() {
            return Err(SceneError::InvalidValue {
                what: "guid",
                reason: "the null GUID cannot name an entity".to_string(),
            });
        }
        if self.by_guid.contains_key(&guid) {
            return Err(SceneError::DuplicateEntity(guid));
        }
        if self.tombstones.contains(&guid) {
            return Err(SceneError::EntityDestroyed(guid));
        }
        self.insert_entity(guid, name.into());
        Ok(guid)
    }

    fn insert_entity(&mut self, guid: Guid, name: String) {
        log::trace!("Creating entity '{}' ({})", name, guid);
        let key = self.entities.insert(EntityRecord {
            guid,
            name,
            parent: None,
            children: Vec::new(),
            sequence: self.next_sequence,
        });
        self.next_sequence += 1;
        self.by_guid.insert(guid, key);
        TransformComponent::storage_mut(&mut self.components).insert(key, TransformComponent::default());
    }

    /// Number of live entities (including those pending destruction)
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the scene has no live entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Whether `guid` names a live entity
    pub fn contains(&self, guid: Guid) -> bool {
        self.by_guid.contains_key(&guid)
    }

    /// Whether `guid` named an entity that has since been destroyed
    pub fn is_destroyed(&self, guid: Guid) -> bool {
        self.tombstones.contains(&guid)
    }

    /// Whether `guid` is queued for destruction at the end of the frame
    pub fn is_pending_destroy(&self, guid: Guid) -> bool {
        self.by_guid
            .get(&guid)
            .is_some_and(|key| self.expanded_pending().contains(key))
    }

    /// Snapshot of every live entity, in creation order
    pub fn entities(&self) -> Vec<Guid> {
        let mut records: Vec<&EntityRecord> = self.entities.values().collect();
        records.sort_by_key(|r| r.sequence);
        records.into_iter().map(|r| r.guid).collect()
    }

    /// First entity (in creation order) with the given name
    pub fn find_entity_by_name(&self, name: &str) -> Option<Guid> {
        self.entities
            .values()
            .filter(|r| r.name == name)
            .min_by_key(|r| r.sequence)
            .map(|r| r.guid)
    }

    /// Queue an entity and its descendants for destruction
    ///
    /// They stay fully usable until [`Scene::flush_destroyed`] runs.
    pub fn destroy(&mut self, guid: Guid) -> SceneResult<()> {
        let key = self.resolve(guid)?;
        if !self.pending_destroy.contains(&key) {
            log::debug!("Entity '{}' ({}) queued for destruction", self.entities[key].name, guid);
            self.pending_destroy.push(key);
        }
        Ok(())
    }

    /// Entities that the next flush will remove, parents before children
    pub fn pending_destroy(&self) -> Vec<Guid> {
        self.expanded_pending()
            .into_iter()
            .map(|key| self.entities[key].guid)
            .collect()
    }

    /// Remove every queued entity, tombstoning their GUIDs
    ///
    /// Returns the removed GUIDs, parents before children.
    pub fn flush_destroyed(&mut self) -> Vec<Guid> {
        let doomed = self.expanded_pending();
        self.pending_destroy.clear();

        let mut removed = Vec::with_capacity(doomed.len());
        for key in doomed {
            if let Some(guid) = self.remove_entity(key) {
                removed.push(guid);
            }
        }
        removed
    }

    fn expanded_pending(&self) -> Vec<EntityKey> {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for &root in &self.pending_destroy {
            if self.entities.contains_key(root) {
                self.collect_subtree(root, &mut seen, &mut ordered);
            }
        }
        ordered
    }

    fn collect_subtree(&self, key: EntityKey, seen: &mut HashSet<EntityKey>, out: &mut Vec<EntityKey>) {
        if !seen.insert(key) {
            return;
        }
        out.push(key);
        for &child in &self.entities[key].children {
            self.collect_subtree(child, seen, out);
        }
    }

    fn remove_entity(&mut self, key: EntityKey) -> Option<Guid> {
        let record = self.entities.remove(key)?;
        if let Some(parent) = record.parent.and_then(|p| self.entities.get_mut(p)) {
            parent.children.retain(|&c| c != key);
        }
        for child in record.children {
            if let Some(child) = self.entities.get_mut(child) {
                child.parent = None;
            }
        }
        self.components.remove_all(key);
        self.by_guid.remove(&record.guid);
        self.tombstones.insert(record.guid);
        log::debug!("Entity '{}' ({}) destroyed", record.name, record.guid);
        Some(record.guid)
    }

    /// Resolve a GUID to its slot, distinguishing destroyed from unknown
    pub fn resolve(&self, guid: Guid) -> SceneResult<EntityKey> {
        match self.by_guid.get(&guid) {
            Some(&key) => Ok(key),
            None if self.tombstones.contains(&guid) => Err(SceneError::EntityDestroyed(guid)),
            None => Err(SceneError::EntityNotFound(guid)),
        }
    }

    fn record(&self, guid: Guid) -> SceneResult<&EntityRecord> {
        let key = self.resolve(guid)?;
        Ok(&self.entities[key])
    }

    fn record_mut(&mut self, guid: Guid) -> SceneResult<&mut EntityRecord> {
        let key = self.resolve(guid)?;
        Ok(&mut self.entities[key])
    }

    /// Entity name
    pub fn entity_name(&self, guid: Guid) -> SceneResult<&str> {
        Ok(&self.record(guid)?.name)
    }

    /// Rename an entity
    pub fn set_entity_name(&mut self, guid: Guid, name: impl Into<String>) -> SceneResult<()> {
        self.record_mut(guid)?.name = name.into();
        Ok(())
    }

    // ----------------------------------------------------------------------
    // Hierarchy
    // ----------------------------------------------------------------------

    /// Parent entity, if any
    pub fn parent(&self, guid: Guid) -> SceneResult<Option<Guid>> {
        Ok(self.record(guid)?.parent.map(|p| self.entities[p].guid))
    }

    /// Snapshot of direct children, in attach order
    pub fn children(&self, guid: Guid) -> SceneResult<Vec<Guid>> {
        Ok(self
            .record(guid)?
            .children
            .iter()
            .map(|&c| self.entities[c].guid)
            .collect())
    }

    /// Children with the given name; `recursive` searches all descendants
    pub fn children_by_name(&self, guid: Guid, name: &str, recursive: bool) -> SceneResult<Vec<Guid>> {
        let key = self.resolve(guid)?;
        let mut found = Vec::new();
        self.collect_children_by_name(key, name, recursive, &mut found);
        Ok(found)
    }

    fn collect_children_by_name(&self, key: EntityKey, name: &str, recursive: bool, out: &mut Vec<Guid>) {
        for &child in &self.entities[key].children {
            let record = &self.entities[child];
            if record.name == name {
                out.push(record.guid);
            }
            if recursive {
                self.collect_children_by_name(child, name, recursive, out);
            }
        }
    }

    /// Reparent an entity, keeping its world transform
    ///
    /// `None` detaches it to the scene root.
    pub fn set_parent(&mut self, child: Guid, parent: Option<Guid>) -> SceneResult<()> {
        let child_key = self.resolve(child)?;
        let parent_key = parent.map(|p| self.resolve(p)).transpose()?;

        if let Some(parent_key) = parent_key {
            if parent_key == child_key {
                return Err(SceneError::SelfParent(child));
            }
            let mut cursor = Some(parent_key);
            while let Some(ancestor) = cursor {
                if ancestor == child_key {
                    return Err(SceneError::HierarchyCycle {
                        child,
                        parent: self.entities[parent_key].guid,
                    });
                }
                cursor = self.entities[ancestor].parent;
            }
        }

        let old_parent = self.entities[child_key].parent;
        if old_parent == parent_key {
            return Ok(());
        }

        let world = self.world_of(child_key);

        if let Some(old) = old_parent {
            self.entities[old].children.retain(|&c| c != child_key);
        }
        if let Some(new) = parent_key {
            self.entities[new].children.push(child_key);
        }
        self.entities[child_key].parent = parent_key;

        let parent_world = parent_key.map_or(Transform::IDENTITY, |p| self.world_of(p));
        self.set_relative_of(child_key, world.relative_to(&parent_world));
        Ok(())
    }

    // ----------------------------------------------------------------------
    // Transforms
    // ----------------------------------------------------------------------

    fn relative_of(&self, key: EntityKey) -> Transform {
        TransformComponent::storage(&self.components)
            .get(key)
            .map(|t| t.transform)
            .unwrap_or_default()
    }

    fn set_relative_of(&mut self, key: EntityKey, transform: Transform) {
        if let Some(component) = TransformComponent::storage_mut(&mut self.components).get_mut(key) {
            component.transform = transform;
        }
    }

    fn world_of(&self, key: EntityKey) -> Transform {
        let mut chain = vec![key];
        let mut cursor = self.entities[key].parent;
        while let Some(parent) = cursor {
            chain.push(parent);
            cursor = self.entities[parent].parent;
        }
        chain
            .iter()
            .rev()
            .fold(Transform::IDENTITY, |world, &k| world.compose(&self.relative_of(k)))
    }

    /// World-space transform: the parent's world transform composed with
    /// the relative one
    pub fn world_transform(&self, guid: Guid) -> SceneResult<Transform> {
        Ok(self.world_of(self.resolve(guid)?))
    }

    /// Place the entity in world space; its relative transform is derived
    /// from the parent's world transform
    pub fn set_world_transform(&mut self, guid: Guid, world: Transform) -> SceneResult<()> {
        let key = self.resolve(guid)?;
        let relative = match self.entities[key].parent {
            Some(parent) => world.relative_to(&self.world_of(parent)),
            None => world,
        };
        self.set_relative_of(key, relative);
        Ok(())
    }

    /// Transform relative to the parent
    pub fn relative_transform(&self, guid: Guid) -> SceneResult<Transform> {
        Ok(self.relative_of(self.resolve(guid)?))
    }

    /// Replace the transform relative to the parent
    pub fn set_relative_transform(&mut self, guid: Guid, relative: Transform) -> SceneResult<()> {
        let key = self.resolve(guid)?;
        self.set_relative_of(key, relative);
        Ok(())
    }

    /// Read-modify-write the world transform
    pub fn update_world_transform(&mut self, guid: Guid, f: impl FnOnce(&mut Transform)) -> SceneResult<()> {
        let mut world = self.world_transform(guid)?;
        f(&mut world);
        self.set_world_transform(guid, world)
    }

    /// Read-modify-write the relative transform
    pub fn update_relative_transform(&mut self, guid: Guid, f: impl FnOnce(&mut Transform)) -> SceneResult<()> {
        let mut relative = self.relative_transform(guid)?;
        f(&mut relative);
        self.set_relative_transform(guid, relative)
    }

    // ----------------------------------------------------------------------
    // Components
    // ----------------------------------------------------------------------

    /// Attach a component, honouring the duplicate component policy
    pub fn add_component<T: Component>(&mut self, guid: Guid, component: T) -> SceneResult<&mut T> {
        let key = self.resolve(guid)?;
        let policy = self.duplicate_policy;
        let storage = T::storage_mut(&mut self.components);

        if storage.contains_key(key) {
            match policy {
                DuplicateComponentPolicy::Error => {
                    return Err(SceneError::DuplicateComponent { entity: guid, kind: T::KIND });
                }
                DuplicateComponentPolicy::KeepExisting => {
                    log::debug!("Entity {} already has a {}; keeping it", guid, T::KIND);
                }
                DuplicateComponentPolicy::Replace => {
                    log::debug!("Entity {} already has a {}; replacing it", guid, T::KIND);
                    storage.insert(key, component);
                }
            }
        } else {
            storage.insert(key, component);
        }

        storage
            .get_mut(key)
            .ok_or(SceneError::MissingComponent { entity: guid, kind: T::KIND })
    }

    /// Whether the entity has component `T`; false for stale entities
    pub fn has_component<T: Component>(&self, guid: Guid) -> bool {
        self.has_component_kind(guid, T::KIND)
    }

    /// Whether the entity has a component of the given kind; false for stale entities
    pub fn has_component_kind(&self, guid: Guid, kind: ComponentKind) -> bool {
        self.by_guid
            .get(&guid)
            .is_some_and(|&key| self.components.has(key, kind))
    }

    /// Borrow component `T`
    pub fn component<T: Component>(&self, guid: Guid) -> SceneResult<&T> {
        let key = self.resolve(guid)?;
        T::storage(&self.components)
            .get(key)
            .ok_or(SceneError::MissingComponent { entity: guid, kind: T::KIND })
    }

    /// Mutably borrow component `T`
    pub fn component_mut<T: Component>(&mut self, guid: Guid) -> SceneResult<&mut T> {
        let key = self.resolve(guid)?;
        T::storage_mut(&mut self.components)
            .get_mut(key)
            .ok_or(SceneError::MissingComponent { entity: guid, kind: T::KIND })
    }

    /// Detach component `T`, returning it; the transform cannot be removed
    pub fn remove_component<T: Component>(&mut self, guid: Guid) -> SceneResult<T> {
        if T::KIND == ComponentKind::Transform {
            return Err(SceneError::InvalidValue {
                what: "component",
                reason: "the transform component cannot be removed".to_string(),
            });
        }
        let key = self.resolve(guid)?;
        T::storage_mut(&mut self.components)
            .remove(key)
            .ok_or(SceneError::MissingComponent { entity: guid, kind: T::KIND })
    }

    /// Kinds attached to the entity, in declaration order
    pub fn component_kinds(&self, guid: Guid) -> SceneResult<Vec<ComponentKind>> {
        let key = self.resolve(guid)?;
        Ok(ComponentKind::ALL
            .iter()
            .copied()
            .filter(|&kind| self.components.has(key, kind))
            .collect())
    }

    /// Entities that have component `T`, in creation order
    pub fn entities_with<T: Component>(&self) -> Vec<Guid> {
        let mut records: Vec<&EntityRecord> = T::storage(&self.components)
            .keys()
            .filter_map(|key| self.entities.get(key))
            .collect();
        records.sort_by_key(|r| r.sequence);
        records.into_iter().map(|r| r.guid).collect()
    }

    // ----------------------------------------------------------------------
    // Polymorphic access by kind
    // ----------------------------------------------------------------------

    /// Borrow a light of the given kind
    pub fn light(&self, guid: Guid, kind: ComponentKind) -> SceneResult<&dyn Light> {
        let light: &dyn Light = match kind {
            ComponentKind::PointLight => self.component::<PointLightComponent>(guid)?,
            ComponentKind::DirectionalLight => self.component::<DirectionalLightComponent>(guid)?,
            ComponentKind::SpotLight => self.component::<SpotLightComponent>(guid)?,
            other => return Err(SceneError::KindMismatch { kind: other, expected: "light" }),
        };
        Ok(light)
    }

    /// Mutably borrow a light of the given kind
    pub fn light_mut(&mut self, guid: Guid, kind: ComponentKind) -> SceneResult<&mut dyn Light> {
        let light: &mut dyn Light = match kind {
            ComponentKind::PointLight => self.component_mut::<PointLightComponent>(guid)?,
            ComponentKind::DirectionalLight => self.component_mut::<DirectionalLightComponent>(guid)?,
            ComponentKind::SpotLight => self.component_mut::<SpotLightComponent>(guid)?,
            other => return Err(SceneError::KindMismatch { kind: other, expected: "light" }),
        };
        Ok(light)
    }

    /// Borrow a collider of the given kind
    pub fn collider(&self, guid: Guid, kind: ComponentKind) -> SceneResult<&dyn Collider> {
        let collider: &dyn Collider = match kind {
            ComponentKind::BoxCollider => self.component::<BoxColliderComponent>(guid)?,
            ComponentKind::SphereCollider => self.component::<SphereColliderComponent>(guid)?,
            ComponentKind::CapsuleCollider => self.component::<CapsuleColliderComponent>(guid)?,
            ComponentKind::MeshCollider => self.component::<MeshColliderComponent>(guid)?,
            other => return Err(SceneError::KindMismatch { kind: other, expected: "collider" }),
        };
        Ok(collider)
    }

    /// Mutably borrow a collider of the given kind
    pub fn collider_mut(&mut self, guid: Guid, kind: ComponentKind) -> SceneResult<&mut dyn Collider> {
        let collider: &mut dyn Collider = match kind {
            ComponentKind::BoxCollider => self.component_mut::<BoxColliderComponent>(guid)?,
            ComponentKind::SphereCollider => self.component_mut::<SphereColliderComponent>(guid)?,
            ComponentKind::CapsuleCollider => self.component_mut::<CapsuleColliderComponent>(guid)?,
            ComponentKind::MeshCollider => self.component_mut::<MeshColliderComponent>(guid)?,
            other => return Err(SceneError::KindMismatch { kind: other, expected: "collider" }),
        };
        Ok(collider)
    }

    /// Borrow a scene component of the given kind
    pub fn scene_component(&self, guid: Guid, kind: ComponentKind) -> SceneResult<&dyn SceneComponent> {
        let component: &dyn SceneComponent = match kind {
            ComponentKind::Transform => self.component::<TransformComponent>(guid)?,
            ComponentKind::StaticMesh => self.component::<StaticMeshComponent>(guid)?,
            ComponentKind::Audio => self.component::<AudioComponent>(guid)?,
            ComponentKind::Reverb => self.component::<ReverbComponent>(guid)?,
            ComponentKind::Camera => self.component::<CameraComponent>(guid)?,
            ComponentKind::Text => self.component::<TextComponent>(guid)?,
            ComponentKind::PointLight => self.component::<PointLightComponent>(guid)?,
            ComponentKind::DirectionalLight => self.component::<DirectionalLightComponent>(guid)?,
            ComponentKind::SpotLight => self.component::<SpotLightComponent>(guid)?,
            ComponentKind::BoxCollider => self.component::<BoxColliderComponent>(guid)?,
            ComponentKind::SphereCollider => self.component::<SphereColliderComponent>(guid)?,
            ComponentKind::CapsuleCollider => self.component::<CapsuleColliderComponent>(guid)?,
            ComponentKind::MeshCollider => self.component::<MeshColliderComponent>(guid)?,
            other => return Err(SceneError::KindMismatch { kind: other, expected: "scene component" }),
        };
        Ok(component)
    }

    /// Mutably borrow a scene component of the given kind
    pub fn scene_component_mut(&mut self, guid: Guid, kind: ComponentKind) -> SceneResult<&mut dyn SceneComponent> {
        let component: &mut dyn SceneComponent = match kind {
            ComponentKind::Transform => self.component_mut::<TransformComponent>(guid)?,
            ComponentKind::StaticMesh => self.component_mut::<StaticMeshComponent>(guid)?,
            ComponentKind::Audio => self.component_mut::<AudioComponent>(guid)?,
            ComponentKind::Reverb => self.component_mut::<ReverbComponent>(guid)?,
            ComponentKind::Camera => self.component_mut::<CameraComponent>(guid)?,
            ComponentKind::Text => self.component_mut::<TextComponent>(guid)?,
            ComponentKind::PointLight => self.component_mut::<PointLightComponent>(guid)?,
            ComponentKind::DirectionalLight => self.component_mut::<DirectionalLightComponent>(guid)?,
            ComponentKind::SpotLight => self.component_mut::<SpotLightComponent>(guid)?,
            ComponentKind::BoxCollider => self.component_mut::<BoxColliderComponent>(guid)?,
            ComponentKind::SphereCollider => self.component_mut::<SphereColliderComponent>(guid)?,
            ComponentKind::CapsuleCollider => self.component_mut::<CapsuleColliderComponent>(guid)?,
            ComponentKind::MeshCollider => self.component_mut::<MeshColliderComponent>(guid)?,
            other => return Err(SceneError::KindMismatch { kind: other, expected: "scene component" }),
        };
        Ok(component)
    }

    /// World transform of a scene component: the entity's world transform
    /// composed with the component's relative one
    ///
    /// For [`ComponentKind::Transform`] this is the entity's world transform.
    pub fn component_world_transform(&self, guid: Guid, kind: ComponentKind) -> SceneResult<Transform> {
        let entity_world = self.world_transform(guid)?;
        if kind == ComponentKind::Transform {
            return Ok(entity_world);
        }
        let relative = self.scene_component(guid, kind)?.relative_transform();
        Ok(entity_world.compose(&relative))
    }

    /// Place a scene component in world space relative to its entity
    pub fn set_component_world_transform(&mut self, guid: Guid, kind: ComponentKind, world: Transform) -> SceneResult<()> {
        if kind == ComponentKind::Transform {
            return self.set_world_transform(guid, world);
        }
        let entity_world = self.world_transform(guid)?;
        self.scene_component_mut(guid, kind)?
            .set_relative_transform(world.relative_to(&entity_world));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Rotator, Vector3};
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-4;

    fn moved(x: f32, y: f32, z: f32) -> Transform {
        Transform::from_location(Vector3::new(x, y, z))
    }

    #[test]
    fn test_new_entity_has_identity_transform() {
        let mut scene = Scene::new("test");
        let e = scene.create_entity("Root");

        assert!(scene.has_component::<TransformComponent>(e));
        assert_eq!(scene.world_transform(e).unwrap(), Transform::IDENTITY);
        assert_eq!(scene.entity_name(e).unwrap(), "Root");
    }

    #[test]
    fn test_world_composes_parent_chain() {
        let mut scene = Scene::new("test");
        let grandparent = scene.create_entity("Grandparent");
        let parent = scene.create_entity("Parent");
        let child = scene.create_entity("Child");

        scene.set_relative_transform(grandparent, moved(1.0, 0.0, 0.0)).unwrap();
        scene.set_parent(parent, Some(grandparent)).unwrap();
        scene.set_relative_transform(parent, moved(0.0, 2.0, 0.0).with_scale(Vector3::splat(2.0))).unwrap();
        scene.set_parent(child, Some(parent)).unwrap();
        scene.set_relative_transform(child, moved(0.0, 0.0, 3.0)).unwrap();

        let world = scene.world_transform(child).unwrap();
        assert_relative_eq!(world.location, Vector3::new(1.0, 2.0, 6.0), epsilon = EPSILON);
        assert_relative_eq!(world.scale, Vector3::splat(2.0), epsilon = EPSILON);
    }

    #[test]
    fn test_reparent_keeps_world_transform() {
        let mut scene = Scene::new("test");
        let parent = scene.create_entity("Parent");
        let child = scene.create_entity("Child");

        scene
            .set_world_transform(
                parent,
                moved(5.0, 0.0, 0.0).with_rotation(Rotator::from_euler_angles(Vector3::new(0.0, 90.0, 0.0))),
            )
            .unwrap();
        scene.set_world_transform(child, moved(1.0, 1.0, 1.0)).unwrap();

        scene.set_parent(child, Some(parent)).unwrap();
        assert_relative_eq!(scene.world_transform(child).unwrap().location, Vector3::new(1.0, 1.0, 1.0), epsilon = EPSILON);
        assert_eq!(scene.parent(child).unwrap(), Some(parent));
        assert_eq!(scene.children(parent).unwrap(), vec![child]);

        scene.set_parent(child, None).unwrap();
        assert_relative_eq!(scene.world_transform(child).unwrap().location, Vector3::new(1.0, 1.0, 1.0), epsilon = EPSILON);
        assert!(scene.children(parent).unwrap().is_empty());
    }

    #[test]
    fn test_set_world_location_under_parent() {
        let mut scene = Scene::new("test");
        let parent = scene.create_entity("Parent");
        let child = scene.create_entity("Child");
        scene.set_relative_transform(parent, moved(10.0, 0.0, 0.0)).unwrap();
        scene.set_parent(child, Some(parent)).unwrap();

        scene.update_world_transform(child, |t| t.location = Vector3::new(12.0, 0.0, 0.0)).unwrap();

        assert_relative_eq!(scene.relative_transform(child).unwrap().location, Vector3::new(2.0, 0.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_cycles_are_rejected() {
        let mut scene = Scene::new("test");
        let a = scene.create_entity("A");
        let b = scene.create_entity("B");
        let c = scene.create_entity("C");
        scene.set_parent(b, Some(a)).unwrap();
        scene.set_parent(c, Some(b)).unwrap();

        assert_eq!(scene.set_parent(a, Some(c)), Err(SceneError::HierarchyCycle { child: a, parent: c }));
        assert_eq!(scene.set_parent(a, Some(a)), Err(SceneError::SelfParent(a)));
    }

    #[test]
    fn test_children_snapshot_is_not_live() {
        let mut scene = Scene::new("test");
        let parent = scene.create_entity("Parent");
        let first = scene.create_entity("Child");
        scene.set_parent(first, Some(parent)).unwrap();

        let snapshot = scene.children(parent).unwrap();
        let second = scene.create_entity("Child");
        scene.set_parent(second, Some(parent)).unwrap();

        assert_eq!(snapshot, vec![first]);
        assert_eq!(scene.children(parent).unwrap(), vec![first, second]);
    }

    #[test]
    fn test_children_by_name() {
        let mut scene = Scene::new("test");
        let root = scene.create_entity("Root");
        let wheel_a = scene.create_entity("Wheel");
        let axle = scene.create_entity("Axle");
        let wheel_b = scene.create_entity("Wheel");
        scene.set_parent(wheel_a, Some(root)).unwrap();
        scene.set_parent(axle, Some(root)).unwrap();
        scene.set_parent(wheel_b, Some(axle)).unwrap();

        assert_eq!(scene.children_by_name(root, "Wheel", false).unwrap(), vec![wheel_a]);
        assert_eq!(scene.children_by_name(root, "Wheel", true).unwrap(), vec![wheel_a, wheel_b]);
    }

    #[test]
    fn test_destroy_is_deferred_then_tombstoned() {
        let mut scene = Scene::new("test");
        let parent = scene.create_entity("Parent");
        let child = scene.create_entity("Child");
        let survivor = scene.create_entity("Survivor");
        scene.set_parent(child, Some(parent)).unwrap();
        scene.add_component(parent, PointLightComponent::default()).unwrap();

        scene.destroy(parent).unwrap();
        assert!(scene.contains(parent));
        assert!(scene.is_pending_destroy(child));
        assert!(scene.has_component::<PointLightComponent>(parent));

        let removed = scene.flush_destroyed();
        assert_eq!(removed, vec![parent, child]);
        assert_eq!(scene.entities(), vec![survivor]);

        assert!(scene.is_destroyed(parent));
        assert!(!scene.has_component::<PointLightComponent>(parent));
        assert_eq!(scene.world_transform(child), Err(SceneError::EntityDestroyed(child)));
        assert_eq!(
            scene.create_entity_with_guid(parent, "Again"),
            Err(SceneError::EntityDestroyed(parent))
        );
    }

    #[test]
    fn test_unknown_guid_is_not_found() {
        let scene = Scene::new("test");
        let ghost = Guid::new(42, 42);
        assert_eq!(scene.entity_name(ghost), Err(SceneError::EntityNotFound(ghost)));
        assert!(!scene.has_component::<TransformComponent>(ghost));
    }

    #[test]
    fn test_add_has_get_remove() {
        let mut scene = Scene::new("test");
        let e = scene.create_entity("Lamp");

        assert!(!scene.has_component::<SpotLightComponent>(e));
        scene.add_component(e, SpotLightComponent::default()).unwrap().set_distance(25.0);

        assert!(scene.has_component::<SpotLightComponent>(e));
        assert_eq!(scene.component::<SpotLightComponent>(e).unwrap().distance(), 25.0);

        let removed = scene.remove_component::<SpotLightComponent>(e).unwrap();
        assert_eq!(removed.distance(), 25.0);
        assert!(!scene.has_component::<SpotLightComponent>(e));
        assert_eq!(
            scene.component::<SpotLightComponent>(e).err(),
            Some(SceneError::MissingComponent { entity: e, kind: ComponentKind::SpotLight })
        );
    }

    #[test]
    fn test_transform_cannot_be_removed() {
        let mut scene = Scene::new("test");
        let e = scene.create_entity("E");
        assert!(matches!(
            scene.remove_component::<TransformComponent>(e),
            Err(SceneError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_duplicate_policies() {
        let mut scene = Scene::new("test");
        let e = scene.create_entity("E");
        scene.add_component(e, SphereColliderComponent::new(1.0)).unwrap();

        assert_eq!(
            scene.add_component(e, SphereColliderComponent::new(2.0)).err(),
            Some(SceneError::DuplicateComponent { entity: e, kind: ComponentKind::SphereCollider })
        );

        scene.set_duplicate_policy(DuplicateComponentPolicy::KeepExisting);
        assert_eq!(scene.add_component(e, SphereColliderComponent::new(3.0)).unwrap().radius(), 1.0);

        scene.set_duplicate_policy(DuplicateComponentPolicy::Replace);
        assert_eq!(scene.add_component(e, SphereColliderComponent::new(4.0)).unwrap().radius(), 4.0);
    }

    #[test]
    fn test_polymorphic_light_access() {
        let mut scene = Scene::new("test");
        let e = scene.create_entity("Lamp");
        scene.add_component(e, PointLightComponent::default()).unwrap();

        scene.light_mut(e, ComponentKind::PointLight).unwrap().set_intensity(7.0);
        assert_eq!(scene.light(e, ComponentKind::PointLight).unwrap().intensity(), 7.0);

        assert!(matches!(
            scene.light(e, ComponentKind::Camera),
            Err(SceneError::KindMismatch { expected: "light", .. })
        ));
        assert!(matches!(
            scene.light(e, ComponentKind::SpotLight),
            Err(SceneError::MissingComponent { .. })
        ));
    }

    #[test]
    fn test_component_world_transform() {
        let mut scene = Scene::new("test");
        let e = scene.create_entity("Car");
        scene.set_relative_transform(e, moved(10.0, 0.0, 0.0)).unwrap();
        let mut collider = BoxColliderComponent::default();
        collider.transform = moved(0.0, 1.0, 0.0);
        scene.add_component(e, collider).unwrap();

        let world = scene.component_world_transform(e, ComponentKind::BoxCollider).unwrap();
        assert_relative_eq!(world.location, Vector3::new(10.0, 1.0, 0.0), epsilon = EPSILON);

        scene
            .set_component_world_transform(e, ComponentKind::BoxCollider, moved(10.0, 5.0, 0.0))
            .unwrap();
        let relative = scene.scene_component(e, ComponentKind::BoxCollider).unwrap().relative_transform();
        assert_relative_eq!(relative.location, Vector3::new(0.0, 5.0, 0.0), epsilon = EPSILON);

        assert_eq!(
            scene.component_world_transform(e, ComponentKind::Transform).unwrap(),
            scene.world_transform(e).unwrap()
        );
    }

    #[test]
    fn test_component_kinds_and_entities_with() {
        let mut scene = Scene::new("test");
        let a = scene.create_entity("A");
        let b = scene.create_entity("B");
        scene.add_component(b, CameraComponent::primary()).unwrap();
        scene.add_component(a, CameraComponent::default()).unwrap();

        assert_eq!(
            scene.component_kinds(b).unwrap(),
            vec![ComponentKind::Transform, ComponentKind::Camera]
        );
        assert_eq!(scene.entities_with::<CameraComponent>(), vec![a, b]);
        assert_eq!(scene.find_entity_by_name("B"), Some(b));
    }
}
