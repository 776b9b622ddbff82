//! Population registry and spawn loop
//!
//! The manager owns every creature. Each creature id appears in exactly
//! three places (the creature map, the chunk index and the sync registry)
//! and every removal path clears all three along with any pack links.
//!
//! Creatures are updated in ascending id order so a seeded manager replays
//! identically.

use std::f32::consts::TAU;
use std::sync::Arc;

use ahash::AHashMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::core::calendar::TimeOfDay;
use crate::core::config::{AiConfig, SpawnConfig, WildConfig};
use crate::core::error::{Result, WildError};
use crate::core::types::{ChunkCoord, CreatureId, PackId, TilePos, Vec2};
use crate::entity::creature::{Body, Creature};
use crate::entity::personality::Traits;
use crate::simulation::controller::AiController;
use crate::simulation::neighbors::{NeighborInfo, PopulationSnapshot};
use crate::spatial::chunk_index::ChunkIndex;
use crate::spawn::events::{DespawnReason, NoopNotifier, SpawnNotifier, WildEvent};
use crate::spawn::level;
use crate::spawn::pack::{self, Pack};
use crate::spawn::species::SpeciesTable;
use crate::spawn::sync::{NetworkSpawn, NetworkUpdate, SyncRegistry};
use crate::world::collaborators::{Collaborators, WorldView, DEFAULT_CHUNK_SIZE, DEFAULT_TILE_SIZE};

pub struct SpawnManager {
    spawn_config: SpawnConfig,
    ai_config: Arc<AiConfig>,
    species: SpeciesTable,
    collaborators: Collaborators,

    creatures: AHashMap<CreatureId, Creature>,
    chunks: ChunkIndex,
    packs: AHashMap<PackId, Pack>,
    sync: SyncRegistry,

    notifier: Box<dyn SpawnNotifier>,
    events: Vec<WildEvent>,
    rng: ChaCha8Rng,
    /// Seconds of simulated time since construction
    clock: f64,
    spawn_timer: f32,
    authoritative: bool,
}

impl SpawnManager {
    pub fn new(config: WildConfig, species: SpeciesTable, collaborators: Collaborators, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            spawn_config: config.spawn,
            ai_config: Arc::new(config.ai),
            species,
            collaborators,
            creatures: AHashMap::new(),
            chunks: ChunkIndex::new(),
            packs: AHashMap::new(),
            sync: SyncRegistry::new(),
            notifier: Box::new(NoopNotifier),
            events: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            clock: 0.0,
            spawn_timer: 0.0,
            authoritative: true,
        })
    }

    pub fn set_notifier(&mut self, notifier: Box<dyn SpawnNotifier>) {
        self.notifier = notifier;
    }

    /// Advance the population by `delta` seconds.
    ///
    /// At most one spawn decision is made per tick, expired creatures are
    /// removed, then every creature is updated. Returns the events produced
    /// since the previous tick, including those from explicit calls.
    pub fn tick(&mut self, delta: f32, player: Option<Vec2>) -> Vec<WildEvent> {
        let delta = delta.max(0.0);
        self.clock += delta as f64;
        self.spawn_timer += delta;

        if self.spawn_timer >= self.spawn_config.check_interval {
            self.spawn_timer = 0.0;
            if self.authoritative {
                match player {
                    Some(player) => self.check_spawns(player),
                    None => debug!("[SPAWN] no player, skipping spawn check"),
                }
            }
        }

        self.remove_expired_pokemon();
        self.update_creatures(delta);
        self.drain_events()
    }

    pub fn drain_events(&mut self) -> Vec<WildEvent> {
        std::mem::take(&mut self.events)
    }

    fn check_spawns(&mut self, player: Vec2) {
        let roll: f32 = self.rng.gen();
        if roll > self.spawn_config.base_spawn_chance {
            return;
        }
        self.attempt_spawn(player);
    }

    /// Search the annulus around `player` for a spawn tile and populate it.
    ///
    /// Returns the ids spawned: empty when every attempt was rejected, one
    /// id for a single spawn, leader first for a pack.
    pub fn attempt_spawn(&mut self, player: Vec2) -> Vec<CreatureId> {
        let Some(world) = self.collaborators.world() else {
            warn!("[SPAWN] world unavailable, skipping spawn");
            return Vec::new();
        };
        let world = world.as_ref();

        let Some(tile) = self.find_spawn_tile(world, player) else {
            debug!(
                "[SPAWN] no valid position after {} attempts",
                self.spawn_config.max_attempts
            );
            return Vec::new();
        };

        let time = TimeOfDay::from_hour(world.hour_of_day());
        let species = self.species.select(world.biome_at(tile), time, &mut self.rng);
        if !world.has_species(&species) {
            warn!("[SPAWN] species {} has no assets, skipping", species);
            return Vec::new();
        }

        if let Some(profile) = self.species.pack_profile(&species) {
            let chance = self.spawn_config.pack_spawn_chance * profile.chance;
            if self.rng.gen::<f32>() < chance {
                let size = self.rng.gen_range(profile.min_size..=profile.max_size.max(profile.min_size));
                return self.spawn_pack(world, &species, tile, size, profile.aggressive);
            }
        }

        let creature = self.create_pokemon(world, &species, tile);
        vec![self.register(creature, true)]
    }

    fn find_spawn_tile(&mut self, world: &dyn WorldView, player: Vec2) -> Option<TilePos> {
        let tile_size = world.tile_size();
        let min = self.spawn_config.min_spawn_distance;
        let max = self.spawn_config.max_spawn_distance;

        for _ in 0..self.spawn_config.max_attempts {
            let angle = self.rng.gen_range(0.0..TAU);
            let distance = self.rng.gen_range(min..=max) * tile_size;
            let target = Vec2::new(
                player.x + angle.cos() * distance,
                player.y + angle.sin() * distance,
            );
            let tile = TilePos::from_world(target, tile_size);
            if self.is_valid_spot(world, tile) {
                return Some(tile);
            }
        }
        None
    }

    /// Chunk cap, passability, spacing and chunk loading, in that order
    fn is_valid_spot(&self, world: &dyn WorldView, tile: TilePos) -> bool {
        let chunk = tile.chunk(world.chunk_size());
        if self.chunks.count(chunk) >= self.spawn_config.max_per_chunk {
            return false;
        }
        if !world.is_passable(tile) {
            return false;
        }
        let spacing = self.spawn_config.min_spacing * world.tile_size();
        let position = tile.to_world(world.tile_size());
        if self
            .creatures
            .values()
            .any(|c| c.position().distance(&position) < spacing)
        {
            return false;
        }
        world.is_chunk_loaded(chunk)
    }

    /// Spawn one creature at an explicit tile, subject to the usual
    /// placement rules. `Ok(None)` when the tile is rejected.
    pub fn spawn_at(&mut self, species: &str, tile: TilePos) -> Result<Option<CreatureId>> {
        let world = self.collaborators.world().ok_or(WildError::WorldUnavailable)?;
        if !self.is_valid_spot(world.as_ref(), tile) {
            return Ok(None);
        }
        let creature = self.create_pokemon(world.as_ref(), species, tile);
        Ok(Some(self.register(creature, true)))
    }

    /// Spawn a pack of up to `size` creatures led from `tile`. Empty when
    /// the leader's tile is rejected.
    pub fn spawn_pack_at(&mut self, species: &str, tile: TilePos, size: u32) -> Result<Vec<CreatureId>> {
        let world = self.collaborators.world().ok_or(WildError::WorldUnavailable)?;
        if !self.is_valid_spot(world.as_ref(), tile) {
            return Ok(Vec::new());
        }
        let aggressive = self
            .species
            .pack_profile(species)
            .map_or(false, |p| p.aggressive);
        Ok(self.spawn_pack(world.as_ref(), species, tile, size, aggressive))
    }

    fn create_pokemon(&mut self, world: &dyn WorldView, species: &str, tile: TilePos) -> Creature {
        let tile_size = world.tile_size();
        let id = CreatureId::from_rng(&mut self.rng);
        let level = level::level_for(tile.to_world(tile_size), tile_size, &self.spawn_config, &mut self.rng);
        let seed = self.rng.gen::<u64>();
        let controller = AiController::new(
            id,
            species,
            tile,
            self.collaborators.clone(),
            Arc::clone(&self.ai_config),
            seed,
        );

        Creature {
            id,
            species: species.to_string(),
            level,
            body: Body::new(tile, tile_size),
            spawned_at: self.clock,
            despawn_at: self.clock + self.spawn_config.despawn_seconds as f64,
            remote: false,
            pack: None,
            controller,
        }
    }

    fn register(&mut self, creature: Creature, notify: bool) -> CreatureId {
        let id = creature.id;
        let chunk = creature.tile().chunk(self.chunk_size());
        let event = WildEvent::Spawned {
            id,
            species: creature.species.clone(),
            level: creature.level,
            tile: creature.tile(),
            chunk,
        };
        info!(
            "[SPAWN] {} (lv {}) at ({}, {}) in chunk ({}, {})",
            creature.species,
            creature.level,
            creature.tile().x,
            creature.tile().y,
            chunk.x,
            chunk.y
        );

        self.chunks.insert(id, chunk);
        self.sync.publish(&creature, self.clock);
        self.creatures.insert(id, creature);
        if notify {
            self.notifier.on_spawn(&event);
        }
        self.events.push(event);
        id
    }

    fn spawn_pack(
        &mut self,
        world: &dyn WorldView,
        species: &str,
        tile: TilePos,
        size: u32,
        aggressive: bool,
    ) -> Vec<CreatureId> {
        let extra = if aggressive { Traits::AGGRESSIVE } else { Traits::empty() };

        let mut leader = self.create_pokemon(world, species, tile);
        if aggressive {
            leader.controller.add_trait(Traits::AGGRESSIVE);
        }
        let mut placed = vec![self.register(leader, true)];

        for _ in 1..size {
            let candidates = pack::member_candidates(tile, &self.spawn_config, &mut self.rng);
            let Some(spot) = candidates
                .into_iter()
                .find(|t| self.is_valid_spot(world, *t))
            else {
                debug!("[SPAWN] no room for more {} pack members", species);
                break;
            };

            let mut member = self.create_pokemon(world, species, spot);
            let traits = (member.controller.traits() | extra).as_pack_follower();
            member.controller.set_traits(traits);
            placed.push(self.register(member, true));
        }

        if placed.len() < 2 {
            debug!("[SPAWN] {} pack degraded to a single spawn", species);
            return placed;
        }
        self.form_pack(species, &placed);
        placed
    }

    /// Link leader and followers both ways and register the pack
    fn form_pack(&mut self, species: &str, placed: &[CreatureId]) -> PackId {
        let pack_id = PackId::from_rng(&mut self.rng);
        let leader_id = placed[0];
        let mut pack = Pack::new(pack_id, species.to_string(), leader_id);

        for &id in &placed[1..] {
            pack.members.insert(id);
            if let Some(member) = self.creatures.get_mut(&id) {
                member.pack = Some(pack_id);
                member.controller.set_pack_leader(Some(leader_id));
            }
        }

        if let Some(leader) = self.creatures.get_mut(&leader_id) {
            leader.pack = Some(pack_id);
            let traits = leader.controller.traits().as_pack_leader();
            leader.controller.set_traits(traits);
            for &id in &placed[1..] {
                leader.controller.add_pack_member(id);
            }
        }

        let size = pack.len();
        info!("[SPAWN] {} pack of {} formed around {}", species, size, leader_id);
        self.packs.insert(pack_id, pack);
        self.notifier.on_pack_formed(pack_id, leader_id, size);
        self.events.push(WildEvent::PackFormed {
            pack: pack_id,
            leader: leader_id,
            size,
        });
        pack_id
    }

    /// Remove a creature from every registry. Unknown ids are a no-op.
    pub fn remove_pokemon(&mut self, id: CreatureId) -> bool {
        self.remove_with(id, DespawnReason::Removed, true)
    }

    fn remove_with(&mut self, id: CreatureId, reason: DespawnReason, notify: bool) -> bool {
        let Some(creature) = self.creatures.remove(&id) else {
            return false;
        };
        self.chunks.remove(id);
        self.sync.remove(id);
        self.unlink(&creature);

        info!("[SPAWN] {} {} despawned ({:?})", creature.species, id, reason);
        if notify {
            self.notifier.on_despawn(id);
        }
        self.events.push(WildEvent::Despawned { id, reason });
        true
    }

    /// Clear every pack reference to a creature that just left
    fn unlink(&mut self, creature: &Creature) {
        let id = creature.id;

        for member in creature.controller.pack_members() {
            if let Some(follower) = self.creatures.get_mut(member) {
                if follower.controller.pack_leader() == Some(id) {
                    follower.controller.set_pack_leader(None);
                }
            }
        }
        if let Some(leader_id) = creature.controller.pack_leader() {
            if let Some(leader) = self.creatures.get_mut(&leader_id) {
                leader.controller.remove_pack_member(id);
            }
        }

        let Some(pack_id) = creature.pack else {
            return;
        };
        let dissolve = match self.packs.get_mut(&pack_id) {
            Some(pack) => {
                pack.members.remove(&id);
                if pack.leader == Some(id) {
                    pack.leader = None;
                }
                pack.members.len() <= 1
            }
            None => false,
        };
        if dissolve {
            self.dissolve_pack(pack_id);
        }
    }

    fn dissolve_pack(&mut self, pack_id: PackId) {
        let Some(pack) = self.packs.remove(&pack_id) else {
            return;
        };
        for id in &pack.members {
            if let Some(creature) = self.creatures.get_mut(id) {
                creature.pack = None;
                creature.controller.set_pack_leader(None);
                creature.controller.clear_pack_members();
            }
        }
        info!("[SPAWN] {} pack {} dissolved", pack.species, pack_id);
        self.events.push(WildEvent::PackDissolved { pack: pack_id });
    }

    /// Remove every creature whose lifetime has run out. Returns how many.
    pub fn remove_expired_pokemon(&mut self) -> usize {
        let now = self.clock;
        let mut expired: Vec<CreatureId> = self
            .creatures
            .values()
            .filter(|c| c.is_expired(now))
            .map(|c| c.id)
            .collect();
        expired.sort();
        for id in &expired {
            self.remove_with(*id, DespawnReason::Expired, true);
        }
        expired.len()
    }

    fn update_creatures(&mut self, delta: f32) {
        let tile_size = self.tile_size();
        let chunk_size = self.chunk_size();
        let lerp_speed = self.spawn_config.network_interpolation_speed;

        let ids = self.sorted_ids();
        let mut snapshot = PopulationSnapshot::new(
            ids.iter()
                .filter_map(|id| self.creatures.get(id))
                .map(neighbor_info),
        );

        for id in ids {
            let Some(creature) = self.creatures.get_mut(&id) else {
                continue;
            };

            let remote = if self.authoritative {
                None
            } else {
                self.sync.get(id).filter(|s| s.target.is_some())
            };

            match remote {
                Some(sync) => {
                    if let (true, Some(target)) = (sync.moving, sync.target) {
                        creature
                            .body
                            .interpolate_toward(target, delta * lerp_speed, tile_size);
                    }
                    creature.body.direction = sync.direction;
                }
                None => {
                    creature.body.update(delta);
                    creature.controller.update(&mut creature.body, &snapshot, delta);
                    if let Some(interaction) = creature.controller.take_interaction() {
                        self.events.push(WildEvent::Interaction {
                            id,
                            partner: interaction.partner,
                            flavor: interaction.flavor,
                        });
                    }
                }
            }

            let chunk = creature.tile().chunk(chunk_size);
            if self.chunks.chunk_of(id) != Some(chunk) {
                self.chunks.relocate(id, chunk);
            }
            snapshot.update(neighbor_info(creature));
            self.sync.publish(creature, self.clock);
        }
    }

    /// Apply a remote authority's report. The creature eases toward the
    /// reported position on later ticks while this manager is not
    /// authoritative.
    pub fn handle_network_update(&mut self, update: NetworkUpdate) -> Result<()> {
        let creature = self
            .creatures
            .get_mut(&update.id)
            .ok_or(WildError::CreatureNotFound(update.id))?;
        creature.body.direction = update.direction;
        creature.body.set_moving(update.moving);
        self.sync.record_update(&update, self.clock);
        Ok(())
    }

    /// Register a creature announced by a remote authority. Listeners are
    /// not notified. Returns false when the id is already present.
    pub fn handle_network_spawn(&mut self, spawn: NetworkSpawn) -> bool {
        if self.creatures.contains_key(&spawn.id) {
            return false;
        }
        let tile_size = self.tile_size();
        let tile = TilePos::from_world(spawn.position, tile_size);
        let seed = self.rng.gen::<u64>();
        let controller = AiController::new(
            spawn.id,
            &spawn.species,
            tile,
            self.collaborators.clone(),
            Arc::clone(&self.ai_config),
            seed,
        );
        let mut body = Body::new(tile, tile_size);
        body.position = spawn.position;

        self.add_pokemon_to_chunk(Creature {
            id: spawn.id,
            species: spawn.species,
            level: spawn.level,
            body,
            spawned_at: self.clock,
            despawn_at: self.clock + self.spawn_config.despawn_seconds as f64,
            remote: true,
            pack: None,
            controller,
        })
    }

    /// Remove a creature on a remote authority's behalf, without notifying
    pub fn handle_network_despawn(&mut self, id: CreatureId) -> bool {
        self.remove_with(id, DespawnReason::Network, false)
    }

    /// Register an already built creature in the chunk matching its tile.
    /// Listeners are not notified. Returns false for a duplicate id.
    pub fn add_pokemon_to_chunk(&mut self, creature: Creature) -> bool {
        if self.creatures.contains_key(&creature.id) {
            return false;
        }
        self.register(creature, false);
        true
    }

    pub fn get(&self, id: CreatureId) -> Option<&Creature> {
        self.creatures.get(&id)
    }

    pub fn get_mut(&mut self, id: CreatureId) -> Option<&mut Creature> {
        self.creatures.get_mut(&id)
    }

    pub fn creature(&self, id: CreatureId) -> Result<&Creature> {
        self.creatures.get(&id).ok_or(WildError::CreatureNotFound(id))
    }

    /// Creatures within `radius` world units of `center`, ordered by id
    pub fn get_pokemon_in_range(&self, center: Vec2, radius: f32) -> Vec<&Creature> {
        let radius_sq = radius * radius;
        let mut found: Vec<&Creature> = self
            .creatures
            .values()
            .filter(|c| c.position().distance_sq(&center) <= radius_sq)
            .collect();
        found.sort_by_key(|c| c.id);
        found
    }

    /// Every creature, ordered by id
    pub fn all_pokemon(&self) -> Vec<&Creature> {
        let mut all: Vec<&Creature> = self.creatures.values().collect();
        all.sort_by_key(|c| c.id);
        all
    }

    pub fn pokemon_in_chunk(&self, chunk: ChunkCoord) -> Vec<&Creature> {
        self.chunks
            .ids_in(chunk)
            .iter()
            .filter_map(|id| self.creatures.get(id))
            .collect()
    }

    pub fn chunk_population(&self, chunk: ChunkCoord) -> usize {
        self.chunks.count(chunk)
    }

    pub fn population(&self) -> usize {
        self.creatures.len()
    }

    pub fn chunk_index(&self) -> &ChunkIndex {
        &self.chunks
    }

    pub fn pack(&self, id: PackId) -> Option<&Pack> {
        self.packs.get(&id)
    }

    /// Every live pack, ordered by id
    pub fn packs(&self) -> Vec<&Pack> {
        let mut all: Vec<&Pack> = self.packs.values().collect();
        all.sort_by_key(|p| p.id);
        all
    }

    /// Shared handle for readers on other threads
    pub fn sync_registry(&self) -> SyncRegistry {
        self.sync.clone()
    }

    pub fn set_authoritative(&mut self, authoritative: bool) {
        if self.authoritative != authoritative {
            info!("[SPAWN] authoritative mode {}", if authoritative { "on" } else { "off" });
        }
        self.authoritative = authoritative;
    }

    pub fn is_authoritative(&self) -> bool {
        self.authoritative
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn species_table(&self) -> &SpeciesTable {
        &self.species
    }

    pub fn spawn_config(&self) -> &SpawnConfig {
        &self.spawn_config
    }

    pub fn ai_config(&self) -> &AiConfig {
        &self.ai_config
    }

    fn sorted_ids(&self) -> Vec<CreatureId> {
        let mut ids: Vec<CreatureId> = self.creatures.keys().copied().collect();
        ids.sort();
        ids
    }

    fn tile_size(&self) -> f32 {
        self.collaborators
            .world()
            .map_or(DEFAULT_TILE_SIZE, |w| w.tile_size())
    }

    fn chunk_size(&self) -> i32 {
        self.collaborators
            .world()
            .map_or(DEFAULT_CHUNK_SIZE, |w| w.chunk_size())
    }
}

impl std::fmt::Debug for SpawnManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpawnManager")
            .field("population", &self.creatures.len())
            .field("packs", &self.packs.len())
            .field("clock", &self.clock)
            .field("authoritative", &self.authoritative)
            .finish()
    }
}

fn neighbor_info(creature: &Creature) -> NeighborInfo {
    NeighborInfo {
        id: creature.id,
        position: creature.position(),
        tile: creature.tile(),
        moving: creature.is_moving(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::collaborators::PlayerView;
    use crate::world::grid_world::{GridWorld, SharedPlayer};
    use std::sync::Mutex;

    struct Fixture {
        world: Arc<GridWorld>,
        _world_dyn: Arc<dyn WorldView>,
        _player_dyn: Arc<dyn PlayerView>,
        manager: SpawnManager,
    }

    fn fixture(config: WildConfig) -> Fixture {
        let world = Arc::new(GridWorld::new(10.0));
        let player = Arc::new(SharedPlayer::at_tile(TilePos::new(0, 0), 32.0));
        let world_dyn: Arc<dyn WorldView> = world.clone();
        let player_dyn: Arc<dyn PlayerView> = player;
        let collaborators = Collaborators::new(&world_dyn, &player_dyn);
        let manager = SpawnManager::new(config, SpeciesTable::default(), collaborators, 21).unwrap();
        Fixture {
            world,
            _world_dyn: world_dyn,
            _player_dyn: player_dyn,
            manager,
        }
    }

    fn consistent(manager: &SpawnManager) -> bool {
        manager.population() == manager.chunk_index().len()
            && manager.population() == manager.sync_registry().len()
            && manager.all_pokemon().iter().all(|c| {
                manager.chunk_index().chunk_of(c.id) == Some(c.tile().chunk(16))
                    && manager.sync_registry().contains(c.id)
            })
    }

    #[derive(Default)]
    struct Recorder {
        spawns: Arc<Mutex<Vec<CreatureId>>>,
        despawns: Arc<Mutex<Vec<CreatureId>>>,
    }

    impl SpawnNotifier for Recorder {
        fn on_spawn(&mut self, event: &WildEvent) {
            if let WildEvent::Spawned { id, .. } = event {
                self.spawns.lock().unwrap().push(*id);
            }
        }

        fn on_despawn(&mut self, id: CreatureId) {
            self.despawns.lock().unwrap().push(id);
        }
    }

    #[test]
    fn test_spawn_at_registers_everywhere() {
        let mut f = fixture(WildConfig::default());
        let id = f.manager.spawn_at("Pidgey", TilePos::new(12, 0)).unwrap().unwrap();

        let creature = f.manager.creature(id).unwrap();
        assert_eq!(creature.tile(), TilePos::new(12, 0));
        assert!((1..=4).contains(&creature.level));
        assert!(consistent(&f.manager));
    }

    #[test]
    fn test_spacing_rejects_crowded_tile() {
        let mut f = fixture(WildConfig::default());
        assert!(f.manager.spawn_at("Pidgey", TilePos::new(12, 0)).unwrap().is_some());
        assert!(f.manager.spawn_at("Pidgey", TilePos::new(13, 0)).unwrap().is_none());
        assert!(f.manager.spawn_at("Pidgey", TilePos::new(14, 0)).unwrap().is_some());
    }

    #[test]
    fn test_blocked_and_unloaded_tiles_rejected() {
        let mut f = fixture(WildConfig::default());
        f.world.block(TilePos::new(12, 0));
        assert!(f.manager.spawn_at("Pidgey", TilePos::new(12, 0)).unwrap().is_none());

        f.world.set_loaded_chunks([ChunkCoord::new(0, 0)]);
        assert!(f.manager.spawn_at("Pidgey", TilePos::new(20, 0)).unwrap().is_none());
        assert!(f.manager.spawn_at("Pidgey", TilePos::new(3, 3)).unwrap().is_some());
    }

    #[test]
    fn test_chunk_cap_enforced() {
        let mut config = WildConfig::default();
        config.spawn.max_per_chunk = 2;
        let mut f = fixture(config);
        assert!(f.manager.spawn_at("Pidgey", TilePos::new(1, 1)).unwrap().is_some());
        assert!(f.manager.spawn_at("Pidgey", TilePos::new(5, 5)).unwrap().is_some());
        assert!(f.manager.spawn_at("Pidgey", TilePos::new(10, 10)).unwrap().is_none());
        assert_eq!(f.manager.chunk_population(ChunkCoord::new(0, 0)), 2);
    }

    #[test]
    fn test_attempt_spawn_lands_in_annulus() {
        let mut f = fixture(WildConfig::default());
        let mut spawned = 0;
        for _ in 0..20 {
            for id in f.manager.attempt_spawn(Vec2::new(0.0, 0.0)) {
                let tile = f.manager.get(id).unwrap().tile();
                let d = ((tile.x * tile.x + tile.y * tile.y) as f32).sqrt();
                // pack members may sit up to 4 tiles (diagonally) off the leader
                assert!((3.0..=27.0).contains(&d), "distance {}", d);
                spawned += 1;
            }
        }
        assert!(spawned > 0);
        assert!(consistent(&f.manager));
    }

    #[test]
    fn test_pack_links_are_bidirectional() {
        let mut f = fixture(WildConfig::default());
        let ids = f.manager.spawn_pack_at("Zubat", TilePos::new(8, 8), 4).unwrap();
        assert_eq!(ids.len(), 4);

        let leader = f.manager.get(ids[0]).unwrap();
        assert!(leader.controller.has_trait(Traits::PACK_LEADER));
        let pack_id = leader.pack.unwrap();
        let pack = f.manager.pack(pack_id).unwrap();
        assert_eq!(pack.leader, Some(ids[0]));
        assert_eq!(pack.len(), 4);

        for &member in &ids[1..] {
            let follower = f.manager.get(member).unwrap();
            assert_eq!(follower.controller.pack_leader(), Some(ids[0]));
            assert!(follower.controller.has_trait(Traits::FOLLOWER));
            assert!(leader.controller.pack_members().contains(&member));
        }
    }

    #[test]
    fn test_pack_without_room_degrades_to_single() {
        let mut f = fixture(WildConfig::default());
        for x in -6..=6 {
            for y in -6..=6 {
                if (x, y) != (0, 0) {
                    f.world.block(TilePos::new(8 + x, 8 + y));
                }
            }
        }
        let ids = f.manager.spawn_pack_at("Zubat", TilePos::new(8, 8), 5).unwrap();
        assert_eq!(ids.len(), 1);
        assert!(f.manager.packs().is_empty());
        let solo = f.manager.get(ids[0]).unwrap();
        assert!(solo.pack.is_none());
        assert!(solo.controller.pack_members().is_empty());
        assert_eq!(solo.controller.pack_leader(), None);
    }

    #[test]
    fn test_leader_removal_frees_followers() {
        let mut f = fixture(WildConfig::default());
        let ids = f.manager.spawn_pack_at("Zubat", TilePos::new(8, 8), 3).unwrap();
        assert_eq!(ids.len(), 3);

        assert!(f.manager.remove_pokemon(ids[0]));
        for &member in &ids[1..] {
            assert_eq!(f.manager.get(member).unwrap().controller.pack_leader(), None);
        }
        // two followers remain, so the pack survives leaderless
        let pack = f.manager.packs()[0];
        assert_eq!(pack.leader, None);
        assert_eq!(pack.len(), 2);

        assert!(f.manager.remove_pokemon(ids[1]));
        assert!(f.manager.packs().is_empty());
        assert!(f.manager.get(ids[2]).unwrap().pack.is_none());
        assert!(consistent(&f.manager));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut f = fixture(WildConfig::default());
        let id = f.manager.spawn_at("Pidgey", TilePos::new(12, 0)).unwrap().unwrap();
        assert!(f.manager.remove_pokemon(id));
        assert!(!f.manager.remove_pokemon(id));
        assert!(consistent(&f.manager));

        let despawns = f
            .manager
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, WildEvent::Despawned { .. }))
            .count();
        assert_eq!(despawns, 1);
    }

    #[test]
    fn test_expiry_removes_from_all_registries() {
        let mut config = WildConfig::default();
        config.spawn.despawn_seconds = 1.0;
        config.spawn.base_spawn_chance = 0.0;
        let mut f = fixture(config);
        let id = f.manager.spawn_at("Pidgey", TilePos::new(12, 0)).unwrap().unwrap();

        f.manager.tick(0.6, None);
        assert!(f.manager.get(id).is_some());
        let events = f.manager.tick(0.6, None);
        assert!(f.manager.get(id).is_none());
        assert!(!f.manager.sync_registry().contains(id));
        assert!(events.contains(&WildEvent::Despawned {
            id,
            reason: DespawnReason::Expired
        }));
    }

    #[test]
    fn test_network_paths_skip_notifier() {
        let mut f = fixture(WildConfig::default());
        let recorder = Recorder::default();
        let spawns = Arc::clone(&recorder.spawns);
        let despawns = Arc::clone(&recorder.despawns);
        f.manager.set_notifier(Box::new(recorder));

        let remote = CreatureId(uuid::Uuid::from_u128(77));
        assert!(f.manager.handle_network_spawn(NetworkSpawn {
            id: remote,
            species: "Rattata".into(),
            level: 9,
            position: Vec2::new(320.0, 0.0),
        }));
        assert!(f.manager.get(remote).unwrap().remote);
        assert!(f.manager.handle_network_despawn(remote));

        let local = f.manager.spawn_at("Pidgey", TilePos::new(-12, 0)).unwrap().unwrap();
        f.manager.remove_pokemon(local);

        assert_eq!(*spawns.lock().unwrap(), vec![local]);
        assert_eq!(*despawns.lock().unwrap(), vec![local]);
    }

    #[test]
    fn test_non_authoritative_interpolates_toward_target() {
        let mut f = fixture(WildConfig::default());
        f.manager.set_authoritative(false);
        let id = CreatureId(uuid::Uuid::from_u128(5));
        f.manager.handle_network_spawn(NetworkSpawn {
            id,
            species: "Rattata".into(),
            level: 3,
            position: Vec2::new(0.0, 0.0),
        });
        f.manager
            .handle_network_update(NetworkUpdate {
                id,
                position: Vec2::new(100.0, 0.0),
                direction: crate::core::types::Direction::Right,
                moving: true,
            })
            .unwrap();

        f.manager.tick(0.1, None);
        // delta 0.1 at speed 5 covers half the gap
        let x = f.manager.get(id).unwrap().position().x;
        assert!((x - 50.0).abs() < 1e-3, "x = {}", x);
        assert_eq!(f.manager.sync_registry().get(id).unwrap().position.x, x);
    }

    #[test]
    fn test_remote_creature_stops_moving_at_target() {
        let mut f = fixture(WildConfig::default());
        f.manager.set_authoritative(false);
        let id = CreatureId(uuid::Uuid::from_u128(6));
        f.manager.handle_network_spawn(NetworkSpawn {
            id,
            species: "Rattata".into(),
            level: 3,
            position: Vec2::new(0.0, 0.0),
        });
        f.manager
            .handle_network_update(NetworkUpdate {
                id,
                position: Vec2::new(64.0, 0.0),
                direction: crate::core::types::Direction::Right,
                moving: true,
            })
            .unwrap();
        assert!(f.manager.get(id).unwrap().is_moving());

        for _ in 0..30 {
            f.manager.tick(0.1, None);
        }
        let creature = f.manager.get(id).unwrap();
        assert_eq!(creature.position(), Vec2::new(64.0, 0.0));
        assert!(!creature.is_moving());
        assert!(!f.manager.sync_registry().get(id).unwrap().moving);
    }

    #[test]
    fn test_network_update_for_unknown_id_is_error() {
        let mut f = fixture(WildConfig::default());
        let missing = CreatureId(uuid::Uuid::from_u128(404));
        let result = f.manager.handle_network_update(NetworkUpdate {
            id: missing,
            position: Vec2::default(),
            direction: crate::core::types::Direction::Up,
            moving: false,
        });
        assert!(matches!(result, Err(WildError::CreatureNotFound(id)) if id == missing));
    }

    #[test]
    fn test_non_authoritative_never_spawns() {
        let mut config = WildConfig::default();
        config.spawn.base_spawn_chance = 1.0;
        let mut f = fixture(config);
        f.manager.set_authoritative(false);
        for _ in 0..20 {
            f.manager.tick(2.5, Some(Vec2::new(0.0, 0.0)));
        }
        assert_eq!(f.manager.population(), 0);
    }

    #[test]
    fn test_same_seed_replays_identically() {
        let run = || {
            let mut config = WildConfig::default();
            config.spawn.base_spawn_chance = 1.0;
            let mut f = fixture(config);
            let mut log = Vec::new();
            for _ in 0..60 {
                log.extend(f.manager.tick(0.5, Some(Vec2::new(0.0, 0.0))));
            }
            let tiles: Vec<TilePos> = f.manager.all_pokemon().iter().map(|c| c.tile()).collect();
            (log, tiles)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_dropped_world_stops_spawning() {
        let mut f = fixture(WildConfig::default());
        drop(f._world_dyn);
        drop(f.world);
        assert!(f.manager.attempt_spawn(Vec2::new(0.0, 0.0)).is_empty());
        assert!(matches!(
            f.manager.spawn_at("Pidgey", TilePos::new(12, 0)),
            Err(WildError::WorldUnavailable)
        ));
    }
}
