//! Interfaces to the world and player that this crate consumes
//!
//! The spawn manager and every AI controller receive these at construction
//! as non-owning handles. A dropped world or player is "unavailable" and
//! every behavior reports that it cannot execute.

use std::sync::{Arc, Weak};

use serde::{Deserialize, Serialize};

use crate::core::types::{ChunkCoord, TilePos, Vec2};

pub const DEFAULT_TILE_SIZE: f32 = 32.0;
pub const DEFAULT_CHUNK_SIZE: i32 = 16;

/// Biomes with spawn tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    Plains,
    Forest,
    Snow,
    Desert,
    Haunted,
    RainForest,
    BigMountains,
    Ruins,
    CherryGrove,
    Beach,
    Ocean,
}

impl Biome {
    pub const ALL: [Biome; 11] = [
        Biome::Plains,
        Biome::Forest,
        Biome::Snow,
        Biome::Desert,
        Biome::Haunted,
        Biome::RainForest,
        Biome::BigMountains,
        Biome::Ruins,
        Biome::CherryGrove,
        Biome::Beach,
        Biome::Ocean,
    ];
}

/// Read-only view of terrain, chunk loading and the world clock
pub trait WorldView: Send + Sync {
    fn is_passable(&self, tile: TilePos) -> bool;

    fn is_chunk_loaded(&self, chunk: ChunkCoord) -> bool;

    /// Hour of day in [0, 24)
    fn hour_of_day(&self) -> f32;

    /// `None` when the tile has no known biome
    fn biome_at(&self, tile: TilePos) -> Option<Biome>;

    /// World units per tile
    fn tile_size(&self) -> f32 {
        DEFAULT_TILE_SIZE
    }

    /// Tiles per chunk edge
    fn chunk_size(&self) -> i32 {
        DEFAULT_CHUNK_SIZE
    }

    /// Whether assets for a species exist (sprites, data). Unresolved
    /// species are skipped by the spawner.
    fn has_species(&self, _species: &str) -> bool {
        true
    }
}

/// The locally simulated player
pub trait PlayerView: Send + Sync {
    /// Position in world units, `None` while no player is present
    fn position(&self) -> Option<Vec2>;
}

/// Non-owning handles to the world and player
#[derive(Clone)]
pub struct Collaborators {
    world: Weak<dyn WorldView>,
    player: Weak<dyn PlayerView>,
}

impl Collaborators {
    pub fn new(world: &Arc<dyn WorldView>, player: &Arc<dyn PlayerView>) -> Self {
        Self {
            world: Arc::downgrade(world),
            player: Arc::downgrade(player),
        }
    }

    pub fn world(&self) -> Option<Arc<dyn WorldView>> {
        self.world.upgrade()
    }

    pub fn player_position(&self) -> Option<Vec2> {
        self.player.upgrade().and_then(|p| p.position())
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("world_available", &(self.world.strong_count() > 0))
            .field("player_available", &(self.player.strong_count() > 0))
            .finish()
    }
}
