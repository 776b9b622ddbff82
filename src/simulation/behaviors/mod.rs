//! Behavior catalog implementations
//!
//! Each behavior is a small per-creature struct holding only its own
//! progress (a step budget, a locked target). Everything else it needs
//! arrives through [`BehaviorContext`] for the duration of one tick.

mod approach;
mod flee;
mod idle;
mod investigate;
mod pack;
mod patrol;
mod social;
mod territory;
mod wander;

pub use approach::ApproachPlayer;
pub use flee::Flee;
pub use idle::Idle;
pub use investigate::Investigate;
pub use pack::{FollowPack, PackLeader};
pub use patrol::Patrol;
pub use social::Social;
pub use territory::{DefendTerritory, Territorial};
pub use wander::Wander;

use rand_chacha::ChaCha8Rng;

use crate::actions::catalog::BehaviorId;
use crate::core::config::AiConfig;
use crate::core::types::{Direction, TilePos, Vec2};
use crate::entity::creature::Body;
use crate::simulation::controller::AiState;
use crate::simulation::movement::{self, AxisPolicy};
use crate::simulation::neighbors::Neighborhood;
use crate::world::collaborators::WorldView;

/// Everything a behavior may read or change during one tick
pub struct BehaviorContext<'a> {
    pub body: &'a mut Body,
    pub state: &'a mut AiState,
    pub world: &'a dyn WorldView,
    /// `None` while no player is present
    pub player: Option<Vec2>,
    pub neighbors: &'a dyn Neighborhood,
    pub rng: &'a mut ChaCha8Rng,
    pub config: &'a AiConfig,
    /// Seconds covered by this tick
    pub delta: f32,
}

impl<'a> BehaviorContext<'a> {
    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.world.tile_size()
    }

    pub fn player_tile(&self) -> Option<TilePos> {
        let tile_size = self.tile_size();
        self.player.map(|p| TilePos::from_world(p, tile_size))
    }

    /// Distance to the player in tiles
    pub fn player_distance(&self) -> Option<f32> {
        let tile_size = self.tile_size();
        self.player
            .map(|p| self.body.position.distance(&p) / tile_size)
    }

    pub fn on_cooldown(&self, id: BehaviorId) -> bool {
        self.state.cooldowns.is_active(id)
    }

    /// Whether the player stands inside this creature's territory
    pub fn player_in_territory(&self) -> bool {
        let tile_size = self.tile_size();
        self.player
            .map_or(false, |p| self.state.territory.contains(p, tile_size))
    }

    /// Commit a one-tile move if the target tile is passable
    pub fn try_step(&mut self, direction: Direction) -> bool {
        let target = self.body.tile.step(direction);
        if !self.world.is_passable(target) {
            return false;
        }
        let tile_size = self.tile_size();
        self.body
            .move_to_tile(target, direction, self.config.movement_duration, tile_size)
    }

    /// Step toward `target`, trying the other needed axis when the first is
    /// blocked. Returns false if nothing moved.
    pub fn step_toward(&mut self, target: TilePos, policy: AxisPolicy) -> bool {
        let candidates = movement::directions_toward(self.body.tile, target, policy, &mut *self.rng);
        candidates.into_iter().any(|dir| self.try_step(dir))
    }
}

/// Shared shape of every catalog entry
pub trait BehaviorStrategy {
    fn can_execute(&mut self, ctx: &mut BehaviorContext<'_>) -> bool;

    fn execute(&mut self, ctx: &mut BehaviorContext<'_>);
}

/// One registered behavior of one creature
#[derive(Debug, Clone)]
pub enum Behavior {
    Idle(Idle),
    Wander(Wander),
    Flee(Flee),
    ApproachPlayer(ApproachPlayer),
    Territorial(Territorial),
    DefendTerritory(DefendTerritory),
    Patrol(Patrol),
    Social(Social),
    Investigate(Investigate),
    PackLeader(PackLeader),
    FollowPack(FollowPack),
}

impl Behavior {
    pub fn new(id: BehaviorId) -> Self {
        match id {
            BehaviorId::Idle => Behavior::Idle(Idle::default()),
            BehaviorId::Wander => Behavior::Wander(Wander::default()),
            BehaviorId::Flee => Behavior::Flee(Flee::default()),
            BehaviorId::ApproachPlayer => Behavior::ApproachPlayer(ApproachPlayer),
            BehaviorId::Territorial => Behavior::Territorial(Territorial::default()),
            BehaviorId::DefendTerritory => Behavior::DefendTerritory(DefendTerritory::default()),
            BehaviorId::Patrol => Behavior::Patrol(Patrol),
            BehaviorId::Social => Behavior::Social(Social),
            BehaviorId::Investigate => Behavior::Investigate(Investigate::default()),
            BehaviorId::PackLeader => Behavior::PackLeader(PackLeader::default()),
            BehaviorId::FollowPack => Behavior::FollowPack(FollowPack),
        }
    }

    pub fn id(&self) -> BehaviorId {
        match self {
            Behavior::Idle(_) => BehaviorId::Idle,
            Behavior::Wander(_) => BehaviorId::Wander,
            Behavior::Flee(_) => BehaviorId::Flee,
            Behavior::ApproachPlayer(_) => BehaviorId::ApproachPlayer,
            Behavior::Territorial(_) => BehaviorId::Territorial,
            Behavior::DefendTerritory(_) => BehaviorId::DefendTerritory,
            Behavior::Patrol(_) => BehaviorId::Patrol,
            Behavior::Social(_) => BehaviorId::Social,
            Behavior::Investigate(_) => BehaviorId::Investigate,
            Behavior::PackLeader(_) => BehaviorId::PackLeader,
            Behavior::FollowPack(_) => BehaviorId::FollowPack,
        }
    }

    #[inline]
    pub fn priority(&self) -> u8 {
        self.id().priority()
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.id().name()
    }

    fn strategy(&mut self) -> &mut dyn BehaviorStrategy {
        match self {
            Behavior::Idle(b) => b,
            Behavior::Wander(b) => b,
            Behavior::Flee(b) => b,
            Behavior::ApproachPlayer(b) => b,
            Behavior::Territorial(b) => b,
            Behavior::DefendTerritory(b) => b,
            Behavior::Patrol(b) => b,
            Behavior::Social(b) => b,
            Behavior::Investigate(b) => b,
            Behavior::PackLeader(b) => b,
            Behavior::FollowPack(b) => b,
        }
    }

    pub fn can_execute(&mut self, ctx: &mut BehaviorContext<'_>) -> bool {
        self.strategy().can_execute(ctx)
    }

    pub fn execute(&mut self, ctx: &mut BehaviorContext<'_>) {
        self.strategy().execute(ctx)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Fixtures for driving a single behavior by hand

    use ahash::AHashSet;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::core::types::{ChunkCoord, CreatureId};
    use crate::entity::personality::Traits;
    use crate::simulation::neighbors::PopulationSnapshot;
    use crate::world::collaborators::Biome;

    pub const TILE: f32 = 32.0;

    #[derive(Default)]
    pub struct TestWorld {
        pub blocked: AHashSet<TilePos>,
    }

    impl WorldView for TestWorld {
        fn is_passable(&self, tile: TilePos) -> bool {
            !self.blocked.contains(&tile)
        }
        fn is_chunk_loaded(&self, _chunk: ChunkCoord) -> bool {
            true
        }
        fn hour_of_day(&self) -> f32 {
            12.0
        }
        fn biome_at(&self, _tile: TilePos) -> Option<Biome> {
            Some(Biome::Plains)
        }
    }

    pub struct Harness {
        pub body: Body,
        pub state: AiState,
        pub world: TestWorld,
        pub player: Option<Vec2>,
        pub neighbors: PopulationSnapshot,
        pub rng: ChaCha8Rng,
        pub config: AiConfig,
    }

    impl Harness {
        pub fn new(traits: Traits, tile: TilePos) -> Self {
            let mut rng = ChaCha8Rng::seed_from_u64(99);
            let config = AiConfig::default();
            let state = AiState::new(CreatureId::from_rng(&mut rng), traits, tile, &config, &mut rng);
            Self {
                body: Body::new(tile, TILE),
                state,
                world: TestWorld::default(),
                player: None,
                neighbors: PopulationSnapshot::default(),
                rng,
                config,
            }
        }

        pub fn player_at_tile(mut self, x: i32, y: i32) -> Self {
            self.player = Some(TilePos::new(x, y).to_world(TILE));
            self
        }

        pub fn ctx(&mut self) -> BehaviorContext<'_> {
            BehaviorContext {
                body: &mut self.body,
                state: &mut self.state,
                world: &self.world,
                player: self.player,
                neighbors: &self.neighbors,
                rng: &mut self.rng,
                config: &self.config,
                delta: 0.1,
            }
        }

        /// Finish any move in progress
        pub fn land(&mut self) {
            self.body.update(10.0);
        }
    }
}
