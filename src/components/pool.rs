//! Capacity-limited FIFO of spawned entities.
//!
//! Blood splats, dash trails and in-flight bullets are tracked by the entity
//! that spawned them. When a push exceeds the capacity the oldest entry is
//! evicted and handed back so the caller can despawn it.

use std::collections::VecDeque;

use bevy_ecs::prelude::Entity;

#[derive(Debug, Clone, PartialEq)]
pub struct BoundedPool {
    items: VecDeque<Entity>,
    capacity: usize,
}

impl BoundedPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    /// Append `entity`; returns the evicted oldest entity when over capacity.
    pub fn push(&mut self, entity: Entity) -> Option<Entity> {
        self.items.push_back(entity);
        if self.items.len() > self.capacity {
            return self.items.pop_front();
        }
        None
    }

    /// Remove every entry, returning them oldest first.
    pub fn drain(&mut self) -> Vec<Entity> {
        self.items.drain(..).collect()
    }

    pub fn remove(&mut self, entity: Entity) {
        self.items.retain(|e| *e != entity);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.items.iter()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.items.contains(&entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::world::World;

    #[test]
    fn push_beyond_capacity_evicts_oldest() {
        let mut world = World::new();
        let ids: Vec<Entity> = (0..4).map(|_| world.spawn_empty().id()).collect();
        let mut pool = BoundedPool::new(2);
        assert_eq!(pool.push(ids[0]), None);
        assert_eq!(pool.push(ids[1]), None);
        assert_eq!(pool.push(ids[2]), Some(ids[0]));
        assert_eq!(pool.push(ids[3]), Some(ids[1]));
        assert_eq!(pool.len(), 2);
        assert!(pool.contains(ids[2]));
        assert!(pool.contains(ids[3]));
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut world = World::new();
        let mut pool = BoundedPool::new(10);
        for _ in 0..50 {
            pool.push(world.spawn_empty().id());
            assert!(pool.len() <= pool.capacity());
        }
        assert_eq!(pool.len(), 10);
    }

    #[test]
    fn drain_empties_in_order() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let mut pool = BoundedPool::new(4);
        pool.push(a);
        pool.push(b);
        assert_eq!(pool.drain(), vec![a, b]);
        assert!(pool.is_empty());
    }
}
