//! The scheduler's entity set.

use crate::components::SpawnOrder;
use hecs::{DynamicBundle, Entity, World};

/// An ECS world that remembers insertion order.
///
/// Every entity added through [`Scene::add`] gets a [`SpawnOrder`], which the
/// renderer uses to keep equal-depth draws in insertion order.
pub struct Scene {
    world: World,
    next_order: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            next_order: 0,
        }
    }

    pub fn add(&mut self, bundle: impl DynamicBundle) -> Entity {
        let entity = self.world.spawn(bundle);
        let _ = self.world.insert_one(entity, SpawnOrder(self.next_order));
        self.next_order += 1;
        entity
    }

    /// Returns `false` when the entity was already gone.
    pub fn remove(&mut self, entity: Entity) -> bool {
        self.world.despawn(entity).is_ok()
    }

    /// Despawn everything. Entities are despawned one by one so handles
    /// taken before the clear stay invalid.
    pub fn clear(&mut self) {
        let entities: Vec<Entity> = self.world.iter().map(|e| e.entity()).collect();
        for entity in entities {
            let _ = self.world.despawn(entity);
        }
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.world.contains(entity)
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
