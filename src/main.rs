//! Wild Roam - headless overworld runner
//!
//! Generates a grid world, walks a player through it and reports what
//! spawned, despawned and formed packs along the way.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use wild_roam::core::types::Vec2;
use wild_roam::spawn::{SpawnManager, SpeciesTable, WildEvent};
use wild_roam::world::{Collaborators, GridWorld, PlayerView, SharedPlayer, WorldView};
use wild_roam::{Result, WildConfig};

/// Headless Wild Roam runner
#[derive(Parser, Debug)]
#[command(name = "wild_roam")]
#[command(about = "Simulate wild creature spawning around a walking player")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 2400)]
    ticks: u32,

    /// Seconds per tick
    #[arg(long, default_value_t = 0.05)]
    delta: f32,

    /// Starting hour of day
    #[arg(long, default_value_t = 10.0)]
    hour: f32,

    /// Chunks generated in each direction from the origin
    #[arg(long, default_value_t = 4)]
    radius: i32,

    /// Fraction of tiles blocked by obstacles
    #[arg(long, default_value_t = 0.08)]
    obstacles: f32,

    /// TOML file overriding spawn and AI settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// TOML file replacing the built-in species table
    #[arg(long)]
    species: Option<PathBuf>,

    /// Print the final population as JSON
    #[arg(long)]
    json: bool,

    /// Log filter, e.g. `wild_roam=debug` (overrides RUST_LOG)
    #[arg(long)]
    log: Option<String>,

    /// Log every event as it happens
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Serialize, Default)]
struct RunSummary {
    seed: u64,
    ticks: u32,
    spawned: usize,
    despawned: usize,
    packs_formed: usize,
    interactions: usize,
    final_population: usize,
    final_packs: usize,
    by_species: BTreeMap<String, usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let fallback = if args.verbose { "wild_roam=debug" } else { "wild_roam=info" };
    let filter = match &args.log {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let seed = args.seed.unwrap_or_else(rand::random);
    let config = match &args.config {
        Some(path) => WildConfig::load(path)?,
        None => WildConfig::default(),
    };
    let species = match &args.species {
        Some(path) => SpeciesTable::load(path)?,
        None => SpeciesTable::default(),
    };

    let world = Arc::new(GridWorld::generate(seed, args.radius, args.obstacles, args.hour));
    let player = Arc::new(SharedPlayer::at(Vec2::new(0.0, 0.0)));
    let world_view: Arc<dyn WorldView> = world.clone();
    let player_view: Arc<dyn PlayerView> = player.clone();
    let mut manager = SpawnManager::new(config, species, Collaborators::new(&world_view, &player_view), seed)?;

    tracing::info!(
        "Wild Roam starting: seed {}, {} ticks, {} blocked tiles",
        seed,
        args.ticks,
        world.blocked_count()
    );

    let mut summary = RunSummary {
        seed,
        ticks: args.ticks,
        ..RunSummary::default()
    };
    let walk_radius = (args.radius.max(1) * world.chunk_size()) as f32 * world.tile_size() * 0.5;

    for tick in 0..args.ticks {
        let t = tick as f32 * args.delta;
        // slow circle so the spawn annulus sweeps new chunks
        let angle = t * 0.02;
        let position = Vec2::new(angle.cos() * walk_radius, angle.sin() * walk_radius);
        player.set_position(position);
        world.advance_clock(args.delta);

        for event in manager.tick(args.delta, Some(position)) {
            match &event {
                WildEvent::Spawned { .. } => summary.spawned += 1,
                WildEvent::Despawned { .. } => summary.despawned += 1,
                WildEvent::PackFormed { .. } => summary.packs_formed += 1,
                WildEvent::Interaction { .. } => summary.interactions += 1,
                WildEvent::PackDissolved { .. } => {}
            }
            tracing::debug!("[EVENT] {:?}", event);
        }
    }

    summary.final_population = manager.population();
    summary.final_packs = manager.packs().len();
    for creature in manager.all_pokemon() {
        *summary.by_species.entry(creature.species.clone()).or_default() += 1;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        println!("{}", manager.sync_registry().to_json()?);
    } else {
        println!("\n=== WILD ROAM ===");
        println!("Seed:          {}", summary.seed);
        println!("Simulated:     {:.1}s", manager.clock());
        println!("Spawned:       {}", summary.spawned);
        println!("Despawned:     {}", summary.despawned);
        println!("Packs formed:  {}", summary.packs_formed);
        println!("Interactions:  {}", summary.interactions);
        println!("Population:    {} ({} packs)", summary.final_population, summary.final_packs);
        for (name, count) in &summary.by_species {
            println!("  {:<12} {}", name, count);
        }
    }

    Ok(())
}
