//! In-memory tile world
//!
//! A complete `WorldView` backed by hash sets: blocked tiles, loaded chunks
//! and per-chunk biome overrides. Used by the demo driver and tests, and as
//! a stand-in wherever no terrain engine is attached.

use std::sync::{PoisonError, RwLock};

use ahash::{AHashMap, AHashSet};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::calendar::WorldClock;
use crate::core::types::{ChunkCoord, TilePos, Vec2};
use crate::world::collaborators::{
    Biome, PlayerView, WorldView, DEFAULT_CHUNK_SIZE, DEFAULT_TILE_SIZE,
};

#[derive(Debug)]
struct GridState {
    blocked: AHashSet<TilePos>,
    loaded: AHashSet<ChunkCoord>,
    all_loaded: bool,
    default_biome: Option<Biome>,
    chunk_biomes: AHashMap<ChunkCoord, Biome>,
    missing_species: AHashSet<String>,
    clock: WorldClock,
}

/// Tile world with interior mutability so it can be shared behind `Arc`
#[derive(Debug)]
pub struct GridWorld {
    tile_size: f32,
    chunk_size: i32,
    state: RwLock<GridState>,
}

impl GridWorld {
    /// Open plains, every chunk loaded, clock at `hour`
    pub fn new(hour: f32) -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            state: RwLock::new(GridState {
                blocked: AHashSet::new(),
                loaded: AHashSet::new(),
                all_loaded: true,
                default_biome: Some(Biome::Plains),
                chunk_biomes: AHashMap::new(),
                missing_species: AHashSet::new(),
                clock: WorldClock::new(hour, 1.0),
            }),
        }
    }

    pub fn with_dimensions(mut self, tile_size: f32, chunk_size: i32) -> Self {
        self.tile_size = tile_size;
        self.chunk_size = chunk_size;
        self
    }

    /// Scatter obstacles over a square of chunks around the origin and
    /// assign each chunk a biome. Only those chunks count as loaded.
    pub fn generate(seed: u64, chunk_radius: i32, obstacle_density: f32, hour: f32) -> Self {
        let world = Self::new(hour);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        {
            let mut state = world.write();
            state.all_loaded = false;
            for cx in -chunk_radius..=chunk_radius {
                for cy in -chunk_radius..=chunk_radius {
                    let chunk = ChunkCoord::new(cx, cy);
                    state.loaded.insert(chunk);
                    let biome = Biome::ALL[rng.gen_range(0..Biome::ALL.len())];
                    state.chunk_biomes.insert(chunk, biome);

                    for lx in 0..world.chunk_size {
                        for ly in 0..world.chunk_size {
                            if rng.gen::<f32>() < obstacle_density {
                                state.blocked.insert(TilePos::new(
                                    cx * world.chunk_size + lx,
                                    cy * world.chunk_size + ly,
                                ));
                            }
                        }
                    }
                }
            }
        }
        world
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, GridState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, GridState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn block(&self, tile: TilePos) {
        self.write().blocked.insert(tile);
    }

    pub fn unblock(&self, tile: TilePos) {
        self.write().blocked.remove(&tile);
    }

    /// Switch to explicit chunk loading with exactly these chunks
    pub fn set_loaded_chunks(&self, chunks: impl IntoIterator<Item = ChunkCoord>) {
        let mut state = self.write();
        state.all_loaded = false;
        state.loaded = chunks.into_iter().collect();
    }

    pub fn unload_chunk(&self, chunk: ChunkCoord) {
        let mut state = self.write();
        if state.all_loaded {
            return;
        }
        state.loaded.remove(&chunk);
    }

    pub fn set_default_biome(&self, biome: Option<Biome>) {
        self.write().default_biome = biome;
    }

    pub fn set_chunk_biome(&self, chunk: ChunkCoord, biome: Biome) {
        self.write().chunk_biomes.insert(chunk, biome);
    }

    /// Mark a species as having no assets
    pub fn remove_species(&self, species: &str) {
        self.write().missing_species.insert(species.to_lowercase());
    }

    pub fn set_hour(&self, hour: f32) {
        self.write().clock.set_hour(hour);
    }

    pub fn advance_clock(&self, delta: f32) {
        self.write().clock.advance(delta);
    }

    pub fn blocked_count(&self) -> usize {
        self.read().blocked.len()
    }
}

impl WorldView for GridWorld {
    fn is_passable(&self, tile: TilePos) -> bool {
        !self.read().blocked.contains(&tile)
    }

    fn is_chunk_loaded(&self, chunk: ChunkCoord) -> bool {
        let state = self.read();
        state.all_loaded || state.loaded.contains(&chunk)
    }

    fn hour_of_day(&self) -> f32 {
        self.read().clock.hour_of_day()
    }

    fn biome_at(&self, tile: TilePos) -> Option<Biome> {
        let state = self.read();
        let chunk = tile.chunk(self.chunk_size);
        state.chunk_biomes.get(&chunk).copied().or(state.default_biome)
    }

    fn tile_size(&self) -> f32 {
        self.tile_size
    }

    fn chunk_size(&self) -> i32 {
        self.chunk_size
    }

    fn has_species(&self, species: &str) -> bool {
        !self.read().missing_species.contains(&species.to_lowercase())
    }
}

/// Player whose position can be moved from another thread
#[derive(Debug, Default)]
pub struct SharedPlayer {
    position: RwLock<Option<Vec2>>,
}

impl SharedPlayer {
    pub fn at(position: Vec2) -> Self {
        Self {
            position: RwLock::new(Some(position)),
        }
    }

    pub fn at_tile(tile: TilePos, tile_size: f32) -> Self {
        Self::at(tile.to_world(tile_size))
    }

    pub fn set_position(&self, position: Vec2) {
        *self.position.write().unwrap_or_else(PoisonError::into_inner) = Some(position);
    }

    /// Player leaves the world (logged out, loading screen)
    pub fn clear(&self) {
        *self.position.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl PlayerView for SharedPlayer {
    fn position(&self) -> Option<Vec2> {
        *self.position.read().unwrap_or_else(PoisonError::into_inner)
    }
}
