//! Entity groups
//!
//! One group per category (donuts, projectiles, explosions). Membership is
//! unique by entity id. Traversals that remove members walk a `snapshot()` of
//! ids taken up front and look each id up in the live group, so a removal
//! never skips or revisits anyone.

use serde::{Deserialize, Serialize};

use super::entity::Entity;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    members: Vec<Entity>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity; returns false (and drops it) if its id is already present
    pub fn insert(&mut self, entity: Entity) -> bool {
        if self.contains(entity.id) {
            return false;
        }
        self.members.push(entity);
        true
    }

    pub fn contains(&self, id: u32) -> bool {
        self.members.iter().any(|e| e.id == id)
    }

    pub fn get(&self, id: u32) -> Option<&Entity> {
        self.members.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Entity> {
        self.members.iter_mut().find(|e| e.id == id)
    }

    /// Remove by id, returning the entity if it was a member
    pub fn remove(&mut self, id: u32) -> Option<Entity> {
        let index = self.members.iter().position(|e| e.id == id)?;
        Some(self.members.swap_remove(index))
    }

    /// Ids of the current members, for mutate-while-walking traversals
    pub fn snapshot(&self) -> Vec<u32> {
        self.members.iter().map(|e| e.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::SpriteKind;
    use glam::Vec2;

    fn donut(id: u32) -> Entity {
        Entity::new(id, SpriteKind::Donut, Vec2::ZERO, Vec2::ZERO, 0.0, 0.0)
    }

    #[test]
    fn test_unique_membership() {
        let mut g = Group::new();
        assert!(g.insert(donut(1)));
        assert!(!g.insert(donut(1)));
        assert!(g.insert(donut(2)));
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn test_remove_during_snapshot_walk() {
        let mut g = Group::new();
        for id in 1..=5 {
            g.insert(donut(id));
        }
        let mut visited = Vec::new();
        for id in g.snapshot() {
            if g.get(id).is_none() {
                continue;
            }
            visited.push(id);
            g.remove(id);
            // Removing a neighbour too must not make the walk skip anyone else
            if id == 2 {
                g.remove(4);
            }
        }
        assert_eq!(visited, vec![1, 2, 3, 5]);
        assert!(g.is_empty());
    }

    #[test]
    fn test_remove_missing() {
        let mut g = Group::new();
        g.insert(donut(1));
        assert!(g.remove(9).is_none());
        assert_eq!(g.remove(1).map(|e| e.id), Some(1));
    }
}
