//! World container for entities
//!
//! The World is the instance registry: it owns the handles to every live
//! entity and hands them out to the tick driver and the frame pump.

use std::sync::Arc;

use slotmap::{new_key_type, SlotMap};

use crate::drawable::{Drawable, InstanceRegistry};
use crate::entity::{Entity, EntityKind, SharedEntity};

new_key_type! {
    /// Key to an entity in the world
    ///
    /// Uses generational indexing so a key to a removed entity returns None
    /// instead of pointing at whatever reused its slot.
    pub struct EntityKey;
}

/// Registry of all live entities
#[derive(Default)]
pub struct World {
    entities: SlotMap<EntityKey, SharedEntity>,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
        }
    }

    /// Load an entity, returning its key and the shared handle
    pub fn spawn(&mut self, entity: Entity) -> (EntityKey, SharedEntity) {
        log::debug!("Spawning {:?} '{}' at {:?}", entity.kind, entity.name, entity.position());
        let shared = entity.into_shared();
        let key = self.entities.insert(Arc::clone(&shared));
        (key, shared)
    }

    /// Unload an entity
    ///
    /// Handles already given to the frame pump keep the entity alive there.
    pub fn despawn(&mut self, key: EntityKey) -> Option<SharedEntity> {
        self.entities.remove(key)
    }

    pub fn get(&self, key: EntityKey) -> Option<&SharedEntity> {
        self.entities.get(key)
    }

    /// Find the first entity with the given name
    pub fn get_by_name(&self, name: &str) -> Option<(EntityKey, &SharedEntity)> {
        self.entities
            .iter()
            .find(|(_, entity)| entity.read().name == name)
    }

    /// Iterate over keys and entities
    pub fn iter(&self) -> impl Iterator<Item = (EntityKey, &SharedEntity)> {
        self.entities.iter()
    }

    /// Iterate over entities of one kind
    pub fn iter_kind(&self, kind: EntityKind) -> impl Iterator<Item = &SharedEntity> {
        self.entities
            .values()
            .filter(move |entity| entity.read().kind == kind)
    }

    /// Clone out every handle so they can be used without borrowing the world
    pub fn handles(&self) -> Vec<SharedEntity> {
        self.entities.values().cloned().collect()
    }

    #[inline]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl InstanceRegistry for World {
    fn loaded_drawables(&self) -> Vec<Arc<dyn Drawable>> {
        self.entities
            .values()
            .map(|entity| Arc::clone(entity) as Arc<dyn Drawable>)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::SolidSprite;
    use rehab_physics::KinematicBody;

    fn make_entity(name: &str, kind: EntityKind) -> Entity {
        Entity::new(
            name,
            kind,
            KinematicBody::new(1.0).unwrap(),
            Arc::new(SolidSprite::new(1, 1, 1)),
        )
    }

    #[test]
    fn test_world_new() {
        let world = World::new();
        assert!(world.is_empty());
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn test_spawn_and_get() {
        let mut world = World::new();
        let (key, shared) = world.spawn(make_entity("player", EntityKind::Actor));

        assert_eq!(world.entity_count(), 1);
        let stored = world.get(key).unwrap();
        assert!(Arc::ptr_eq(stored, &shared));
    }

    #[test]
    fn test_despawn_invalidates_key() {
        let mut world = World::new();
        let (key, _) = world.spawn(make_entity("a", EntityKind::Actor));
        assert!(world.despawn(key).is_some());
        assert!(world.get(key).is_none());

        // Reused slot does not resurrect the old key
        let (new_key, _) = world.spawn(make_entity("b", EntityKind::Actor));
        assert_ne!(key, new_key);
        assert!(world.get(key).is_none());
    }

    #[test]
    fn test_get_by_name() {
        let mut world = World::new();
        world.spawn(make_entity("floor", EntityKind::Prop));
        let (key, _) = world.spawn(make_entity("dummy", EntityKind::Actor));

        let (found, entity) = world.get_by_name("dummy").unwrap();
        assert_eq!(found, key);
        assert_eq!(entity.read().name, "dummy");
        assert!(world.get_by_name("missing").is_none());
    }

    #[test]
    fn test_iter_kind() {
        let mut world = World::new();
        world.spawn(make_entity("floor", EntityKind::Prop));
        world.spawn(make_entity("player", EntityKind::Actor));
        world.spawn(make_entity("dummy", EntityKind::Actor));

        assert_eq!(world.iter_kind(EntityKind::Actor).count(), 2);
        assert_eq!(world.iter_kind(EntityKind::Prop).count(), 1);
        assert_eq!(world.iter_kind(EntityKind::Projectile).count(), 0);
    }

    #[test]
    fn test_registry_lists_every_entity() {
        let mut world = World::new();
        world.spawn(make_entity("a", EntityKind::Actor));
        world.spawn(make_entity("b", EntityKind::Prop));

        let drawables = world.loaded_drawables();
        assert_eq!(drawables.len(), 2);
        assert_eq!(world.handles().len(), 2);
    }
}
