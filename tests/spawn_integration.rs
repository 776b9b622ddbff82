//! Spawn placement, species selection and lifetime

mod common;

use common::{Sim, CHUNK, TILE};
use wild_roam::core::calendar::TimeOfDay;
use wild_roam::core::types::{ChunkCoord, TilePos, Vec2};
use wild_roam::spawn::{DespawnReason, WildEvent};
use wild_roam::world::{Biome, GridWorld, WorldView};
use wild_roam::WildConfig;

#[test]
fn test_plains_daytime_draws_day_table_only() {
    let mut sim = Sim::open(10.0);
    let day: Vec<String> = sim
        .manager
        .species_table()
        .candidates(Some(Biome::Plains), TimeOfDay::Day)
        .to_vec();

    let mut seen = 0;
    for _ in 0..100 {
        for id in sim.manager.attempt_spawn(Vec2::new(0.0, 0.0)) {
            let species = &sim.manager.get(id).unwrap().species;
            assert!(day.contains(species), "{} is not a day species", species);
            assert_ne!(species, "Zubat");
            seen += 1;
        }
        sim.clear();
    }
    assert!(seen >= 100);
}

#[test]
fn test_night_switches_tables() {
    let mut sim = Sim::open(22.0);
    let night: Vec<String> = sim
        .manager
        .species_table()
        .candidates(Some(Biome::Plains), TimeOfDay::Night)
        .to_vec();

    for _ in 0..50 {
        for id in sim.manager.attempt_spawn(Vec2::new(0.0, 0.0)) {
            assert!(night.contains(&sim.manager.get(id).unwrap().species));
        }
        sim.clear();
    }
}

#[test]
fn test_biome_without_table_uses_default() {
    let world = GridWorld::new(10.0);
    world.set_default_biome(None);
    let mut sim = Sim::new(world, WildConfig::default(), 3);

    for _ in 0..20 {
        for id in sim.manager.attempt_spawn(Vec2::new(0.0, 0.0)) {
            assert_eq!(sim.manager.get(id).unwrap().species, "Rattata");
        }
    }
}

#[test]
fn test_full_chunk_rejects_further_spawns() {
    let world = GridWorld::new(10.0);
    world.set_loaded_chunks([ChunkCoord::new(1, 0)]);
    let mut sim = Sim::new(world, WildConfig::default(), 11);
    let player = TilePos::new(8, 8).to_world(TILE);

    for _ in 0..300 {
        sim.manager.attempt_spawn(player);
        assert!(sim.manager.chunk_population(ChunkCoord::new(1, 0)) <= 6);
    }
    assert_eq!(sim.manager.chunk_population(ChunkCoord::new(1, 0)), 6);
    assert_eq!(sim.manager.population(), 6);
    assert!(sim.manager.attempt_spawn(player).is_empty());
    assert!(sim.consistent());
}

#[test]
fn test_spawned_tiles_are_passable_loaded_and_spaced() {
    let world = GridWorld::generate(99, 3, 0.25, 10.0);
    world.unload_chunk(ChunkCoord::new(1, 1));
    let mut sim = Sim::new(world, WildConfig::default(), 99);

    for _ in 0..200 {
        sim.manager.attempt_spawn(Vec2::new(0.0, 0.0));
    }
    let all = sim.manager.all_pokemon();
    assert!(!all.is_empty());
    for creature in &all {
        assert!(sim.world.is_passable(creature.tile()));
        assert!(sim.world.is_chunk_loaded(creature.tile().chunk(CHUNK)));
        for other in &all {
            if other.id != creature.id {
                assert!(creature.position().distance(&other.position()) >= 1.5 * TILE);
            }
        }
    }
    assert!(sim.consistent());
}

#[test]
fn test_missing_species_assets_skip_spawn() {
    let world = GridWorld::new(10.0);
    world.set_default_biome(None);
    world.remove_species("Rattata");
    let mut sim = Sim::new(world, WildConfig::default(), 4);

    for _ in 0..20 {
        assert!(sim.manager.attempt_spawn(Vec2::new(0.0, 0.0)).is_empty());
    }
    assert_eq!(sim.manager.population(), 0);
}

#[test]
fn test_spawn_decision_waits_for_interval() {
    let mut config = WildConfig::default();
    config.spawn.base_spawn_chance = 1.0;
    let mut sim = Sim::new(GridWorld::new(10.0), config, 5);
    let player = Some(Vec2::new(0.0, 0.0));

    for _ in 0..4 {
        sim.manager.tick(0.5, player);
    }
    assert_eq!(sim.manager.population(), 0);

    let events = sim.manager.tick(0.5, player);
    assert!(sim.manager.population() >= 1);
    assert!(events.iter().any(|e| matches!(e, WildEvent::Spawned { .. })));
}

#[test]
fn test_no_player_no_spawns() {
    let mut config = WildConfig::default();
    config.spawn.base_spawn_chance = 1.0;
    let mut sim = Sim::new(GridWorld::new(10.0), config, 5);
    for _ in 0..40 {
        sim.manager.tick(0.5, None);
    }
    assert_eq!(sim.manager.population(), 0);
}

#[test]
fn test_lifetime_expiry_clears_registries() {
    let mut config = WildConfig::default();
    config.spawn.despawn_seconds = 5.0;
    config.spawn.base_spawn_chance = 0.0;
    let mut sim = Sim::new(GridWorld::new(10.0), config, 8);

    let id = sim.manager.spawn_at("Pidgey", TilePos::new(12, 0)).unwrap().unwrap();
    let mut expired = false;
    for _ in 0..60 {
        for event in sim.manager.tick(0.1, None) {
            if event == (WildEvent::Despawned { id, reason: DespawnReason::Expired }) {
                expired = true;
            }
        }
    }
    assert!(expired);
    assert!(sim.manager.get(id).is_none());
    assert!(sim.manager.chunk_index().is_empty());
    assert!(sim.manager.sync_registry().is_empty());
}

#[test]
fn test_creatures_stay_bucketed_while_moving() {
    let mut config = WildConfig::default();
    config.spawn.base_spawn_chance = 1.0;
    let mut sim = Sim::new(GridWorld::new(10.0), config, 12);
    let player = sim.player_position();

    for _ in 0..600 {
        sim.manager.tick(0.1, player);
        assert!(sim.consistent());
    }
    assert!(sim.manager.population() > 0);
}

#[test]
fn test_events_serialize_as_tagged_json() {
    let mut sim = Sim::open(10.0);
    sim.manager.spawn_at("Pidgey", TilePos::new(12, 0)).unwrap();
    let events = sim.manager.drain_events();
    let json = serde_json::to_string(&events).unwrap();
    assert!(json.contains("\"event\":\"spawned\""));
    assert!(json.contains("Pidgey"));
}
