//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use wild_roam::core::types::{TilePos, Vec2};
use wild_roam::spawn::{SpawnManager, SpeciesTable};
use wild_roam::world::{Collaborators, GridWorld, PlayerView, SharedPlayer, WorldView};
use wild_roam::WildConfig;

pub const TILE: f32 = 32.0;
pub const CHUNK: i32 = 16;

/// A manager wired to a world and player it does not own
pub struct Sim {
    pub world: Arc<GridWorld>,
    pub player: Arc<SharedPlayer>,
    pub manager: SpawnManager,
    world_view: Arc<dyn WorldView>,
    player_view: Arc<dyn PlayerView>,
}

impl Sim {
    pub fn new(world: GridWorld, config: WildConfig, seed: u64) -> Self {
        let world = Arc::new(world);
        let player = Arc::new(SharedPlayer::at_tile(TilePos::new(0, 0), TILE));
        let world_view: Arc<dyn WorldView> = world.clone();
        let player_view: Arc<dyn PlayerView> = player.clone();
        let manager = SpawnManager::new(
            config,
            SpeciesTable::default(),
            Collaborators::new(&world_view, &player_view),
            seed,
        )
        .expect("valid config");

        Self {
            world,
            player,
            manager,
            world_view,
            player_view,
        }
    }

    pub fn open(hour: f32) -> Self {
        Self::new(GridWorld::new(hour), WildConfig::default(), 7)
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators::new(&self.world_view, &self.player_view)
    }

    pub fn player_position(&self) -> Option<Vec2> {
        self.player_view.position()
    }

    /// Every creature is in exactly the chunk its tile says, and in the
    /// sync registry
    pub fn consistent(&self) -> bool {
        let sync = self.manager.sync_registry();
        let index = self.manager.chunk_index();
        self.manager.population() == index.len()
            && self.manager.population() == sync.len()
            && self
                .manager
                .all_pokemon()
                .iter()
                .all(|c| index.chunk_of(c.id) == Some(c.tile().chunk(CHUNK)) && sync.contains(c.id))
    }

    pub fn clear(&mut self) {
        let ids: Vec<_> = self.manager.all_pokemon().iter().map(|c| c.id).collect();
        for id in ids {
            self.manager.remove_pokemon(id);
        }
        self.manager.drain_events();
    }
}
