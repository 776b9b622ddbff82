//! Externally visible creature state for renderers and network peers
//!
//! The registry is a shared concurrent map. The manager writes to it once
//! per creature per tick; any number of other threads may read through a
//! cloned handle at the same time.

use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{CreatureId, Direction, Vec2};
use crate::entity::creature::Creature;

/// Lightweight copy of one creature's visible state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSnapshot {
    pub species: String,
    pub level: u32,
    pub position: Vec2,
    /// Last position reported by a remote authority
    pub target: Option<Vec2>,
    pub direction: Direction,
    pub moving: bool,
    /// Manager clock at the last write
    pub last_update: f64,
}

/// State change reported by a remote authority
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkUpdate {
    pub id: CreatureId,
    pub position: Vec2,
    pub direction: Direction,
    pub moving: bool,
}

/// Creature announced by a remote authority
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpawn {
    pub id: CreatureId,
    pub species: String,
    pub level: u32,
    pub position: Vec2,
}

/// Shared handle to the sync map
#[derive(Debug, Clone, Default)]
pub struct SyncRegistry {
    inner: Arc<DashMap<CreatureId, SyncSnapshot>>,
}

impl SyncRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy a creature's current state, keeping any remote target
    pub fn publish(&self, creature: &Creature, now: f64) {
        let mut entry = self
            .inner
            .entry(creature.id)
            .or_insert_with(|| SyncSnapshot {
                species: creature.species.clone(),
                level: creature.level,
                position: creature.position(),
                target: None,
                direction: creature.body.direction,
                moving: creature.is_moving(),
                last_update: now,
            });
        entry.position = creature.position();
        entry.direction = creature.body.direction;
        entry.moving = creature.is_moving();
        entry.last_update = now;
    }

    /// Record a remote update. Unknown ids are ignored.
    pub fn record_update(&self, update: &NetworkUpdate, now: f64) -> bool {
        match self.inner.get_mut(&update.id) {
            Some(mut entry) => {
                entry.target = Some(update.position);
                entry.direction = update.direction;
                entry.moving = update.moving;
                entry.last_update = now;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: CreatureId) -> Option<SyncSnapshot> {
        self.inner.get(&id).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, id: CreatureId) -> Option<SyncSnapshot> {
        self.inner.remove(&id).map(|(_, snapshot)| snapshot)
    }

    pub fn contains(&self, id: CreatureId) -> bool {
        self.inner.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&self) {
        self.inner.clear();
    }

    /// All snapshots ordered by id
    pub fn snapshots(&self) -> Vec<(CreatureId, SyncSnapshot)> {
        let mut all: Vec<_> = self
            .inner
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        all.sort_by_key(|(id, _)| *id);
        all
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshots())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn snapshot(x: f32) -> SyncSnapshot {
        SyncSnapshot {
            species: "Pidgey".into(),
            level: 3,
            position: Vec2::new(x, 0.0),
            target: None,
            direction: Direction::Down,
            moving: false,
            last_update: 0.0,
        }
    }

    #[test]
    fn test_record_update_sets_target() {
        let registry = SyncRegistry::new();
        let id = CreatureId(uuid::Uuid::from_u128(1));
        registry.inner.insert(id, snapshot(0.0));

        let update = NetworkUpdate {
            id,
            position: Vec2::new(64.0, 32.0),
            direction: Direction::Right,
            moving: true,
        };
        assert!(registry.record_update(&update, 4.5));

        let stored = registry.get(id).unwrap();
        assert_eq!(stored.target, Some(Vec2::new(64.0, 32.0)));
        assert_eq!(stored.direction, Direction::Right);
        assert!(stored.moving);
        assert_eq!(stored.last_update, 4.5);
        // position is only moved by interpolation
        assert_eq!(stored.position, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn test_update_for_unknown_id_ignored() {
        let registry = SyncRegistry::new();
        let update = NetworkUpdate {
            id: CreatureId(uuid::Uuid::from_u128(7)),
            position: Vec2::default(),
            direction: Direction::Up,
            moving: false,
        };
        assert!(!registry.record_update(&update, 0.0));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_concurrent_readers_see_writes() {
        let registry = SyncRegistry::new();
        for i in 0..32u128 {
            registry
                .inner
                .insert(CreatureId(uuid::Uuid::from_u128(i)), snapshot(i as f32));
        }

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let handle = registry.clone();
                thread::spawn(move || handle.snapshots().len())
            })
            .collect();
        for reader in readers {
            assert_eq!(reader.join().unwrap(), 32);
        }
    }

    #[test]
    fn test_json_dump_is_ordered() {
        let registry = SyncRegistry::new();
        registry.inner.insert(CreatureId(uuid::Uuid::from_u128(2)), snapshot(2.0));
        registry.inner.insert(CreatureId(uuid::Uuid::from_u128(1)), snapshot(1.0));
        let json = registry.to_json().unwrap();
        let first = json.find("00000000-0000-0000-0000-000000000001").unwrap();
        let second = json.find("00000000-0000-0000-0000-000000000002").unwrap();
        assert!(first < second);
    }
}
