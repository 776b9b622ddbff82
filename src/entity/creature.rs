//! Wild creature and its physical body

use serde::{Deserialize, Serialize};

use crate::core::types::{CreatureId, Direction, PackId, TilePos, Vec2};
use crate::simulation::controller::AiController;

/// Position and tile-to-tile movement
///
/// `tile` is the logical tile: it switches to the destination the moment
/// a move starts, while `position` eases there over the move duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    pub tile: TilePos,
    pub direction: Direction,
    moving: bool,
    move_from: Vec2,
    move_to: Vec2,
    elapsed: f32,
    duration: f32,
}

impl Body {
    pub fn new(tile: TilePos, tile_size: f32) -> Self {
        let position = tile.to_world(tile_size);
        Self {
            position,
            tile,
            direction: Direction::Down,
            moving: false,
            move_from: position,
            move_to: position,
            elapsed: 0.0,
            duration: 0.0,
        }
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Begin a one-tile move. Ignored while a move is in progress.
    pub fn move_to_tile(&mut self, tile: TilePos, direction: Direction, duration: f32, tile_size: f32) -> bool {
        if self.moving {
            return false;
        }
        self.direction = direction;
        self.move_from = self.position;
        self.move_to = tile.to_world(tile_size);
        self.tile = tile;
        self.elapsed = 0.0;
        self.duration = duration.max(f32::EPSILON);
        self.moving = true;
        true
    }

    /// Advance the interpolation. Returns true on the tick the move lands.
    pub fn update(&mut self, delta: f32) -> bool {
        if !self.moving {
            return false;
        }
        self.elapsed += delta;
        let t = (self.elapsed / self.duration).min(1.0);
        self.position = self.move_from.lerp(&self.move_to, smoothstep(t));
        if t >= 1.0 {
            self.position = self.move_to;
            self.moving = false;
            return true;
        }
        false
    }

    /// Ease toward a remote target; the tile follows the position.
    ///
    /// Returns true once the target is reached, which also ends the move.
    pub fn interpolate_toward(&mut self, target: Vec2, alpha: f32, tile_size: f32) -> bool {
        self.position = self.position.lerp(&target, alpha.clamp(0.0, 1.0));
        let arrived = self.position.distance(&target) <= tile_size * ARRIVE_FRACTION;
        if arrived {
            self.position = target;
            self.move_from = target;
            self.move_to = target;
            self.moving = false;
        }
        self.tile = TilePos::from_world(self.position, tile_size);
        arrived
    }

    /// Snap to a tile, cancelling any move
    pub fn place(&mut self, tile: TilePos, tile_size: f32) {
        self.tile = tile;
        self.position = tile.to_world(tile_size);
        self.move_from = self.position;
        self.move_to = self.position;
        self.moving = false;
    }

    pub fn set_moving(&mut self, moving: bool) {
        self.moving = moving;
    }
}

/// Remote easing snaps once this close, as a fraction of a tile
const ARRIVE_FRACTION: f32 = 0.02;

fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// A wild creature: identity, body and the controller it exclusively owns
#[derive(Debug, Clone)]
pub struct Creature {
    pub id: CreatureId,
    pub species: String,
    pub level: u32,
    pub body: Body,
    /// Manager clock reading at spawn
    pub spawned_at: f64,
    pub despawn_at: f64,
    /// Spawned by a remote authority rather than this simulation
    pub remote: bool,
    pub pack: Option<PackId>,
    pub controller: AiController,
}

impl Creature {
    pub fn age(&self, now: f64) -> f64 {
        (now - self.spawned_at).max(0.0)
    }

    pub fn is_expired(&self, now: f64) -> bool {
        now >= self.despawn_at
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    #[inline]
    pub fn tile(&self) -> TilePos {
        self.body.tile
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.body.is_moving()
    }
}
