//! Spawn and AI configuration with documented constants
//!
//! Distances are expressed in tiles and times in simulation seconds. Every
//! field has a default, so a TOML file only needs the values it overrides.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, WildError};

/// Top-level configuration for a spawn manager and the controllers it creates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WildConfig {
    pub spawn: SpawnConfig,
    pub ai: AiConfig,
}

impl WildConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: WildConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        self.spawn.validate()?;
        self.ai.validate()
    }
}

/// Population and placement settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    // === TIMING ===
    /// Seconds between spawn decisions
    pub check_interval: f32,

    /// Probability that a spawn decision searches at all
    ///
    /// At 0.275 with a 2.5s interval a player sees roughly one new creature
    /// (or pack) every nine seconds while chunks have room.
    pub base_spawn_chance: f32,

    /// Maximum creature lifetime before forced removal
    pub despawn_seconds: f32,

    // === PLACEMENT ===
    /// Inner radius of the spawn annulus around the player
    pub min_spawn_distance: f32,

    /// Outer radius of the spawn annulus around the player
    pub max_spawn_distance: f32,

    /// Population cap of a single chunk
    pub max_per_chunk: usize,

    /// No two creatures may spawn closer than this
    pub min_spacing: f32,

    /// Placement samples per spawn decision
    pub max_attempts: u32,

    // === PACKS ===
    /// Multiplied with the species pack chance
    pub pack_spawn_chance: f32,

    /// Innermost ring tried when placing pack members
    pub pack_base_radius: f32,

    /// Outermost ring, spiral extent and random-sampling bound
    pub pack_max_radius: f32,

    /// Random samples tried after rings and spiral fail
    pub pack_random_tries: u32,

    // === LEVELS ===
    /// Random spread added to the distance-based level
    pub level_variance: f32,

    /// Tiles from the origin per additional level
    pub level_distance_scale: f32,

    // === NETWORK ===
    /// Lerp speed toward authority-reported positions (per second)
    pub network_interpolation_speed: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            check_interval: 2.5,
            base_spawn_chance: 0.275,
            despawn_seconds: 300.0,

            min_spawn_distance: 10.0,
            max_spawn_distance: 20.0,
            max_per_chunk: 6,
            min_spacing: 1.5,
            max_attempts: 15,

            pack_spawn_chance: 0.3,
            pack_base_radius: 2.0,
            pack_max_radius: 4.0,
            pack_random_tries: 20,

            level_variance: 2.0,
            level_distance_scale: 50.0,

            network_interpolation_speed: 5.0,
        }
    }
}

impl SpawnConfig {
    pub fn validate(&self) -> Result<()> {
        if self.check_interval <= 0.0 || self.despawn_seconds <= 0.0 {
            return Err(WildError::InvalidConfig(
                "check_interval and despawn_seconds must be positive".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.base_spawn_chance)
            || !(0.0..=1.0).contains(&self.pack_spawn_chance)
        {
            return Err(WildError::InvalidConfig(
                "spawn chances must lie in [0, 1]".into(),
            ));
        }

        if self.min_spawn_distance < 0.0 || self.min_spawn_distance >= self.max_spawn_distance {
            return Err(WildError::InvalidConfig(format!(
                "min_spawn_distance ({}) should be < max_spawn_distance ({})",
                self.min_spawn_distance, self.max_spawn_distance
            )));
        }

        if self.max_per_chunk == 0 || self.max_attempts == 0 {
            return Err(WildError::InvalidConfig(
                "max_per_chunk and max_attempts must be at least 1".into(),
            ));
        }

        if self.pack_base_radius < 1.0 || self.pack_base_radius > self.pack_max_radius {
            return Err(WildError::InvalidConfig(format!(
                "pack radii must satisfy 1 <= base ({}) <= max ({})",
                self.pack_base_radius, self.pack_max_radius
            )));
        }

        if self.level_distance_scale <= 0.0 {
            return Err(WildError::InvalidConfig("level_distance_scale must be positive".into()));
        }

        Ok(())
    }
}

/// Behavior tuning shared by every controller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Seconds to cross one tile
    pub movement_duration: f32,

    /// Flee distance before trait multipliers
    ///
    /// A TIMID creature (x2.0) bolts at 6 tiles, a PROTECTIVE one (x0.5)
    /// only when the player is practically adjacent.
    pub flee_base_distance: f32,

    // Idle
    pub idle_min_seconds: f32,
    pub idle_max_seconds: f32,

    // Wander
    pub wander_min_steps: u32,
    pub wander_max_steps: u32,
    pub wander_min_pause: f32,
    pub wander_max_pause: f32,

    // Flee
    pub flee_min_steps: u32,
    pub flee_max_steps: u32,
    pub flee_cooldown: f32,

    // ApproachPlayer
    pub approach_range: f32,
    pub approach_optimal_distance: f32,
    /// Per-tick roll is `approach_factor * approach_roll_scale`
    pub approach_roll_scale: f32,
    pub approach_cooldown: f32,

    // Territory
    pub territory_min_radius: u32,
    pub territory_max_radius: u32,
    pub territory_default_radius: f32,
    pub defend_chase_distance: f32,
    pub defend_min_steps: u32,
    pub defend_max_steps: u32,
    pub defend_cooldown: f32,

    // Patrol
    pub patrol_min_waypoints: u32,
    pub patrol_max_waypoints: u32,
    /// Waypoint circle as a fraction of the territory radius
    pub patrol_radius_factor: f32,
    pub patrol_min_state_time: f32,
    pub patrol_waypoint_pause: f32,

    // Social
    pub social_chance: f32,
    pub social_range: f32,
    pub social_cooldown: f32,

    // Investigate
    pub investigate_chance: f32,
    pub investigate_range: f32,
    pub investigate_cooldown: f32,

    // Packs
    pub pack_leader_interval: f32,
    pub pack_coordination_range: f32,
    pub follow_distance: f32,
    pub max_follow_distance: f32,
    pub follow_cooldown: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            movement_duration: 0.75,
            flee_base_distance: 3.0,

            idle_min_seconds: 0.3,
            idle_max_seconds: 1.2,

            wander_min_steps: 1,
            wander_max_steps: 4,
            wander_min_pause: 0.5,
            wander_max_pause: 1.5,

            flee_min_steps: 2,
            flee_max_steps: 32,
            flee_cooldown: 5.0,

            approach_range: 10.0,
            approach_optimal_distance: 2.0,
            approach_roll_scale: 0.25,
            approach_cooldown: 1.0,

            territory_min_radius: 4,
            territory_max_radius: 8,
            territory_default_radius: 2.0,
            defend_chase_distance: 20.0,
            defend_min_steps: 3,
            defend_max_steps: 6,
            defend_cooldown: 8.0,

            patrol_min_waypoints: 3,
            patrol_max_waypoints: 6,
            patrol_radius_factor: 0.7,
            patrol_min_state_time: 3.0,
            patrol_waypoint_pause: 2.0,

            social_chance: 0.05,
            social_range: 2.0,
            social_cooldown: 10.0,

            investigate_chance: 0.05,
            investigate_range: 20.0,
            investigate_cooldown: 10.0,

            pack_leader_interval: 0.5,
            pack_coordination_range: 16.0,
            follow_distance: 3.0,
            max_follow_distance: 6.0,
            follow_cooldown: 0.5,
        }
    }
}

impl AiConfig {
    pub fn validate(&self) -> Result<()> {
        let ranges = [
            ("idle seconds", self.idle_min_seconds, self.idle_max_seconds),
            ("wander pause", self.wander_min_pause, self.wander_max_pause),
            (
                "wander steps",
                self.wander_min_steps as f32,
                self.wander_max_steps as f32,
            ),
            ("flee steps", self.flee_min_steps as f32, self.flee_max_steps as f32),
            (
                "defend steps",
                self.defend_min_steps as f32,
                self.defend_max_steps as f32,
            ),
            (
                "territory radius",
                self.territory_min_radius as f32,
                self.territory_max_radius as f32,
            ),
            (
                "patrol waypoints",
                self.patrol_min_waypoints as f32,
                self.patrol_max_waypoints as f32,
            ),
        ];
        for (name, min, max) in ranges {
            if min < 0.0 || min > max {
                return Err(WildError::InvalidConfig(format!(
                    "{} range is inverted or negative: {}..{}",
                    name, min, max
                )));
            }
        }

        if self.movement_duration <= 0.0 {
            return Err(WildError::InvalidConfig("movement_duration must be positive".into()));
        }

        if self.wander_min_steps == 0 || self.flee_min_steps == 0 {
            return Err(WildError::InvalidConfig("step budgets must be at least 1".into()));
        }

        if self.approach_optimal_distance >= self.approach_range {
            return Err(WildError::InvalidConfig(format!(
                "approach_optimal_distance ({}) should be < approach_range ({})",
                self.approach_optimal_distance, self.approach_range
            )));
        }

        if self.follow_distance >= self.max_follow_distance {
            return Err(WildError::InvalidConfig(format!(
                "follow_distance ({}) should be < max_follow_distance ({})",
                self.follow_distance, self.max_follow_distance
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(WildConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = WildConfig::from_toml_str(
            r#"
            [spawn]
            max_per_chunk = 3

            [ai]
            flee_cooldown = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(config.spawn.max_per_chunk, 3);
        assert_eq!(config.spawn.max_attempts, 15);
        assert_eq!(config.ai.flee_cooldown, 2.0);
        assert_eq!(config.ai.defend_cooldown, 8.0);
    }

    #[test]
    fn test_inverted_annulus_rejected() {
        let result = WildConfig::from_toml_str(
            r#"
            [spawn]
            min_spawn_distance = 30.0
            "#,
        );
        assert!(matches!(result, Err(WildError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let result = WildConfig::from_toml_str("[spawn\nmax_per_chunk = ");
        assert!(matches!(result, Err(WildError::ConfigParse(_))));
    }
}
