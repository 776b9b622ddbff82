//! Read-only view of the population during a tick
//!
//! Controllers cannot borrow other creatures while one is being updated,
//! so the manager hands them a snapshot instead. The snapshot is refreshed
//! for each creature right after it moves, so later creatures in the same
//! tick see earlier ones where they now are.

use ahash::AHashMap;

use crate::core::types::{CreatureId, TilePos, Vec2};

/// What other creatures may learn about a neighbor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborInfo {
    pub id: CreatureId,
    pub position: Vec2,
    pub tile: TilePos,
    pub moving: bool,
}

/// Population queries available to behaviors
pub trait Neighborhood {
    /// Every creature within `radius` world units of `center`
    fn in_range(&self, center: Vec2, radius: f32) -> Vec<NeighborInfo>;

    fn get(&self, id: CreatureId) -> Option<NeighborInfo>;
}

/// Flat snapshot with linear range scans
#[derive(Debug, Default, Clone)]
pub struct PopulationSnapshot {
    entries: Vec<NeighborInfo>,
    index: AHashMap<CreatureId, usize>,
}

impl PopulationSnapshot {
    pub fn new(entries: impl IntoIterator<Item = NeighborInfo>) -> Self {
        let entries: Vec<NeighborInfo> = entries.into_iter().collect();
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, info)| (info.id, i))
            .collect();
        Self { entries, index }
    }

    /// Overwrite one creature's entry, ignoring unknown ids
    pub fn update(&mut self, info: NeighborInfo) {
        if let Some(&i) = self.index.get(&info.id) {
            self.entries[i] = info;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Neighborhood for PopulationSnapshot {
    fn in_range(&self, center: Vec2, radius: f32) -> Vec<NeighborInfo> {
        let radius_sq = radius * radius;
        self.entries
            .iter()
            .filter(|info| info.position.distance_sq(&center) <= radius_sq)
            .copied()
            .collect()
    }

    fn get(&self, id: CreatureId) -> Option<NeighborInfo> {
        self.index.get(&id).map(|&i| self.entries[i])
    }
}
