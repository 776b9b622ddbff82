//! Per-creature AI controller
//!
//! The controller owns the creature's personality, territory, patrol route,
//! pack links and cooldown table, plus one instance of every behavior its
//! traits allow. Each tick it evaluates those behaviors in descending
//! priority and executes the first eligible one, falling back to Idle.
//!
//! States are labels set by whichever behavior runs; there is no separate
//! transition table.

use std::collections::BTreeSet;
use std::f32::consts::TAU;
use std::sync::Arc;

use ahash::AHashMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actions::catalog::BehaviorId;
use crate::core::config::AiConfig;
use crate::core::types::{CreatureId, TilePos, Vec2};
use crate::entity::creature::Body;
use crate::entity::personality::Traits;
use crate::simulation::behaviors::{Behavior, BehaviorContext};
use crate::simulation::neighbors::Neighborhood;
use crate::world::collaborators::Collaborators;

/// Declarative state label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AiMode {
    Idle,
    Wandering,
    Fleeing,
    Approaching,
    Patrolling,
    Investigating,
    Following,
}

/// Remaining seconds per behavior. Absent means ready.
#[derive(Debug, Clone, Default)]
pub struct Cooldowns {
    remaining: AHashMap<BehaviorId, f32>,
}

impl Cooldowns {
    pub fn set(&mut self, id: BehaviorId, seconds: f32) {
        if seconds > 0.0 {
            self.remaining.insert(id, seconds);
        } else {
            self.remaining.remove(&id);
        }
    }

    pub fn remaining(&self, id: BehaviorId) -> f32 {
        self.remaining.get(&id).copied().unwrap_or(0.0)
    }

    #[inline]
    pub fn is_active(&self, id: BehaviorId) -> bool {
        self.remaining(id) > 0.0
    }

    /// Count every cooldown down by `delta`, floored at zero
    pub fn tick(&mut self, delta: f32) {
        let delta = delta.max(0.0);
        for value in self.remaining.values_mut() {
            *value = (*value - delta).max(0.0);
        }
        self.remaining.retain(|_, v| *v > 0.0);
    }

    pub fn clear(&mut self) {
        self.remaining.clear();
    }
}

/// Circular home range, radius in tiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Territory {
    pub center: TilePos,
    pub radius: f32,
}

impl Territory {
    pub fn contains(&self, position: Vec2, tile_size: f32) -> bool {
        position.distance(&self.center.to_world(tile_size)) <= self.radius * tile_size
    }

    pub fn contains_tile(&self, tile: TilePos) -> bool {
        let dx = (tile.x - self.center.x) as f32;
        let dy = (tile.y - self.center.y) as f32;
        (dx * dx + dy * dy).sqrt() <= self.radius
    }
}

/// Ordered waypoint loop
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatrolRoute {
    waypoints: Vec<TilePos>,
    index: usize,
}

impl PatrolRoute {
    pub fn new(waypoints: Vec<TilePos>) -> Self {
        Self { waypoints, index: 0 }
    }

    /// Waypoints evenly spaced on a circle, snapped to tiles
    pub fn around(center: TilePos, radius: f32, count: u32) -> Self {
        let waypoints = (0..count)
            .map(|i| {
                let angle = TAU * i as f32 / count as f32;
                TilePos::new(
                    center.x + (angle.cos() * radius).round() as i32,
                    center.y + (angle.sin() * radius).round() as i32,
                )
            })
            .collect();
        Self::new(waypoints)
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn current(&self) -> Option<TilePos> {
        self.waypoints.get(self.index).copied()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn advance(&mut self) {
        if !self.waypoints.is_empty() {
            self.index = (self.index + 1) % self.waypoints.len();
        }
    }

    pub fn waypoints(&self) -> &[TilePos] {
        &self.waypoints
    }
}

/// Tone of a social interaction, from the initiator's traits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionFlavor {
    Challenge,
    Curious,
    Peaceful,
}

impl InteractionFlavor {
    pub fn for_traits(traits: Traits) -> Self {
        if traits.contains(Traits::AGGRESSIVE) {
            InteractionFlavor::Challenge
        } else if traits.contains(Traits::CURIOUS) {
            InteractionFlavor::Curious
        } else {
            InteractionFlavor::Peaceful
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialInteraction {
    pub partner: CreatureId,
    pub flavor: InteractionFlavor,
}

/// Controller data shared by every behavior of one creature
#[derive(Debug, Clone)]
pub struct AiState {
    /// Back-reference to the owning creature
    pub owner: CreatureId,
    pub mode: AiMode,
    /// Seconds since the active behavior last changed
    pub state_timer: f32,
    pub traits: Traits,
    pub territory: Territory,
    pub patrol: PatrolRoute,
    pub pack_leader: Option<CreatureId>,
    pub pack_members: BTreeSet<CreatureId>,
    pub cooldowns: Cooldowns,
    /// Tiles
    pub flee_threshold: f32,
    pub approach_factor: f32,
    pub active: Option<BehaviorId>,
    pub paused: bool,
    /// Set by Social, drained by the spawn manager
    pub interaction: Option<SocialInteraction>,
}

impl AiState {
    pub fn new<R: Rng + ?Sized>(
        owner: CreatureId,
        traits: Traits,
        home: TilePos,
        config: &AiConfig,
        rng: &mut R,
    ) -> Self {
        let territorial = traits.contains(Traits::TERRITORIAL);
        let radius = if territorial {
            rng.gen_range(config.territory_min_radius..=config.territory_max_radius) as f32
        } else {
            config.territory_default_radius
        };
        let patrol = if territorial {
            let count = rng.gen_range(config.patrol_min_waypoints..=config.patrol_max_waypoints);
            PatrolRoute::around(home, radius * config.patrol_radius_factor, count)
        } else {
            PatrolRoute::default()
        };

        Self {
            owner,
            mode: AiMode::Idle,
            state_timer: 0.0,
            traits,
            territory: Territory {
                center: home,
                radius,
            },
            patrol,
            pack_leader: None,
            pack_members: BTreeSet::new(),
            cooldowns: Cooldowns::default(),
            flee_threshold: config.flee_base_distance * traits.flee_multiplier(),
            approach_factor: traits.approach_factor(),
            active: None,
            paused: false,
            interaction: None,
        }
    }
}

/// Behavior arbitration for one creature
#[derive(Debug, Clone)]
pub struct AiController {
    state: AiState,
    behaviors: Vec<Behavior>,
    rng: ChaCha8Rng,
    collaborators: Collaborators,
    config: Arc<AiConfig>,
}

impl AiController {
    /// Controller with a freshly rolled personality for `species`
    pub fn new(
        owner: CreatureId,
        species: &str,
        home: TilePos,
        collaborators: Collaborators,
        config: Arc<AiConfig>,
        seed: u64,
    ) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let traits = Traits::generate(species, &mut rng);
        Self::build(owner, traits, home, collaborators, config, rng)
    }

    /// Controller with a fixed personality
    pub fn with_traits(
        owner: CreatureId,
        traits: Traits,
        home: TilePos,
        collaborators: Collaborators,
        config: Arc<AiConfig>,
        seed: u64,
    ) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(seed);
        Self::build(owner, traits, home, collaborators, config, rng)
    }

    fn build(
        owner: CreatureId,
        traits: Traits,
        home: TilePos,
        collaborators: Collaborators,
        config: Arc<AiConfig>,
        mut rng: ChaCha8Rng,
    ) -> Self {
        let state = AiState::new(owner, traits, home, &config, &mut rng);
        let behaviors = BehaviorId::registered_for(traits)
            .into_iter()
            .map(Behavior::new)
            .collect();
        Self {
            state,
            behaviors,
            rng,
            collaborators,
            config,
        }
    }

    /// Run one tick of arbitration.
    ///
    /// Returns the behavior that holds the creature this tick: the one just
    /// executed, or the active one while a move is still in progress.
    /// Returns `None` only while paused or with the world unavailable.
    pub fn update(
        &mut self,
        body: &mut Body,
        neighbors: &dyn Neighborhood,
        delta: f32,
    ) -> Option<BehaviorId> {
        if self.state.paused {
            return None;
        }

        self.state.cooldowns.tick(delta);
        self.state.state_timer += delta;

        let world = match self.collaborators.world() {
            Some(world) => world,
            None => {
                debug!("[AI] {} has no world, skipping", self.state.owner);
                return None;
            }
        };

        if body.is_moving() {
            return Some(self.state.active.unwrap_or(BehaviorId::Idle));
        }

        let mut ctx = BehaviorContext {
            body,
            state: &mut self.state,
            world: world.as_ref(),
            player: self.collaborators.player_position(),
            neighbors,
            rng: &mut self.rng,
            config: &self.config,
            delta,
        };

        let mut selected = None;
        for (idx, behavior) in self.behaviors.iter_mut().enumerate() {
            if ctx.state.cooldowns.is_active(behavior.id()) {
                continue;
            }
            if behavior.can_execute(&mut ctx) {
                selected = Some(idx);
                break;
            }
        }
        let idx = selected.or_else(|| {
            self.behaviors
                .iter()
                .position(|b| b.id() == BehaviorId::Idle)
        })?;

        let id = self.behaviors[idx].id();
        if ctx.state.active != Some(id) {
            if let Some(previous) = ctx.state.active {
                debug!(
                    "[AI] {} switching from {} to {}",
                    ctx.state.owner, previous, id
                );
            }
            ctx.state.active = Some(id);
            ctx.state.state_timer = 0.0;
        }

        self.behaviors[idx].execute(&mut ctx);
        Some(id)
    }

    pub fn owner(&self) -> CreatureId {
        self.state.owner
    }

    pub fn state(&self) -> &AiState {
        &self.state
    }

    pub fn mode(&self) -> AiMode {
        self.state.mode
    }

    pub fn traits(&self) -> Traits {
        self.state.traits
    }

    pub fn has_trait(&self, t: Traits) -> bool {
        self.state.traits.contains(t)
    }

    /// Replace the trait set and rebuild the behavior list. Behaviors that
    /// survive the change keep their progress.
    pub fn set_traits(&mut self, traits: Traits) {
        if traits == self.state.traits {
            return;
        }
        self.state.traits = traits;
        self.state.flee_threshold = self.config.flee_base_distance * traits.flee_multiplier();
        self.state.approach_factor = traits.approach_factor();

        let mut previous: Vec<Behavior> = std::mem::take(&mut self.behaviors);
        self.behaviors = BehaviorId::registered_for(traits)
            .into_iter()
            .map(|id| match previous.iter().position(|b| b.id() == id) {
                Some(i) => previous.swap_remove(i),
                None => Behavior::new(id),
            })
            .collect();

        if let Some(active) = self.state.active {
            if !self.behaviors.iter().any(|b| b.id() == active) {
                self.state.active = None;
            }
        }
    }

    pub fn add_trait(&mut self, t: Traits) {
        self.set_traits(self.state.traits | t);
    }

    pub fn remove_trait(&mut self, t: Traits) {
        self.set_traits(self.state.traits - t);
    }

    /// Registered behaviors, highest priority first
    pub fn behavior_ids(&self) -> Vec<BehaviorId> {
        self.behaviors.iter().map(Behavior::id).collect()
    }

    pub fn current_behavior(&self) -> Option<BehaviorId> {
        self.state.active
    }

    pub fn flee_threshold(&self) -> f32 {
        self.state.flee_threshold
    }

    pub fn set_flee_threshold(&mut self, tiles: f32) {
        self.state.flee_threshold = tiles.max(0.0);
    }

    pub fn set_cooldown(&mut self, id: BehaviorId, seconds: f32) {
        self.state.cooldowns.set(id, seconds);
    }

    pub fn cooldown(&self, id: BehaviorId) -> f32 {
        self.state.cooldowns.remaining(id)
    }

    pub fn is_on_cooldown(&self, id: BehaviorId) -> bool {
        self.state.cooldowns.is_active(id)
    }

    pub fn territory(&self) -> Territory {
        self.state.territory
    }

    pub fn patrol_route(&self) -> &PatrolRoute {
        &self.state.patrol
    }

    pub fn pack_leader(&self) -> Option<CreatureId> {
        self.state.pack_leader
    }

    pub fn set_pack_leader(&mut self, leader: Option<CreatureId>) {
        self.state.pack_leader = leader;
    }

    pub fn pack_members(&self) -> &BTreeSet<CreatureId> {
        &self.state.pack_members
    }

    pub fn add_pack_member(&mut self, member: CreatureId) {
        if member != self.state.owner {
            self.state.pack_members.insert(member);
        }
    }

    pub fn remove_pack_member(&mut self, member: CreatureId) -> bool {
        self.state.pack_members.remove(&member)
    }

    pub fn clear_pack_members(&mut self) {
        self.state.pack_members.clear();
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.state.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    /// Drop back to IDLE and restart the state timer
    pub fn enter_idle(&mut self) {
        self.state.mode = AiMode::Idle;
        self.state.state_timer = 0.0;
        self.state.active = None;
    }

    pub fn take_interaction(&mut self) -> Option<SocialInteraction> {
        self.state.interaction.take()
    }

    pub fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }
}
