//! The authoritative entity collection and its id allocator.

use glam::Vec2;

use crate::organisms::{Energy, Entity, EntityId, PopulationCounts, Species};

/// Hands out monotonically increasing ids. Each world owns one; ids are
/// never shared between worlds or reused within one.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.next
    }
}

/// Fields a new entity needs beyond its id.
#[derive(Debug, Clone, Copy)]
pub struct Spawn {
    pub species: Species,
    pub position: Vec2,
    pub heading: Vec2,
    pub energy: Energy,
    pub wander_ticks: u32,
    pub reproduction_cooldown: u32,
}

/// Owns every live entity, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    entities: Vec<Entity>,
    ids: IdAllocator,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, spawn: Spawn) -> Entity {
        let entity = Entity {
            id: self.ids.next_id(),
            species: spawn.species,
            position: spawn.position,
            heading: spawn.heading,
            energy: spawn.energy,
            age: 0,
            reproduction_cooldown: spawn.reproduction_cooldown,
            wander_ticks: spawn.wander_ticks,
        };
        self.entities.push(entity);
        entity
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }

    /// Working set for the tick pipeline.
    pub(crate) fn as_mut_slice(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    /// Owned point-in-time copy, safe to hand to a renderer.
    pub fn snapshot(&self) -> Vec<Entity> {
        self.entities.clone()
    }

    pub fn population_counts(&self) -> PopulationCounts {
        PopulationCounts::from_entities(&self.entities)
    }

    /// Drop every entity whose energy reached zero. Returns how many went.
    pub fn purge_dead(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| !e.is_dead());
        before - self.entities.len()
    }

    /// Remove all entities. The id allocator keeps counting.
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    pub fn ids_issued(&self) -> u64 {
        self.ids.issued()
    }
}
