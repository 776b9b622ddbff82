use std::f32::consts::TAU;

use rand::Rng;
use tracing::debug;

use super::{BehaviorContext, BehaviorStrategy};
use crate::actions::catalog::BehaviorId;
use crate::core::types::TilePos;
use crate::entity::personality::Traits;
use crate::simulation::controller::AiMode;
use crate::simulation::movement::AxisPolicy;

const DESTINATION_TRIES: u32 = 10;
const MIN_DESTINATION_DISTANCE: f32 = 2.0;

/// Lead the pack toward periodically chosen destinations.
///
/// Followers are not signalled; they notice the leader moving through
/// their own FollowPack behavior.
#[derive(Debug, Clone, Default)]
pub struct PackLeader {
    destination: Option<TilePos>,
}

impl PackLeader {
    pub fn destination(&self) -> Option<TilePos> {
        self.destination
    }

    fn pick_destination(ctx: &mut BehaviorContext<'_>) -> Option<TilePos> {
        let (center, max_range) = if ctx.state.traits.contains(Traits::TERRITORIAL) {
            (ctx.state.territory.center, ctx.state.territory.radius)
        } else {
            (ctx.body.tile, ctx.config.pack_coordination_range)
        };
        let max_range = max_range.max(MIN_DESTINATION_DISTANCE);

        for _ in 0..DESTINATION_TRIES {
            let angle = ctx.rng.gen_range(0.0..TAU);
            let distance = ctx.rng.gen_range(MIN_DESTINATION_DISTANCE..=max_range);
            let tile = TilePos::new(
                center.x + (angle.cos() * distance).round() as i32,
                center.y + (angle.sin() * distance).round() as i32,
            );
            if ctx.world.is_passable(tile) {
                return Some(tile);
            }
        }
        None
    }

    fn reached(&self, tile: TilePos) -> bool {
        self.destination.map_or(true, |d| {
            let dx = (d.x - tile.x) as f32;
            let dy = (d.y - tile.y) as f32;
            (dx * dx + dy * dy).sqrt() <= 1.0
        })
    }
}

impl BehaviorStrategy for PackLeader {
    fn can_execute(&mut self, ctx: &mut BehaviorContext<'_>) -> bool {
        ctx.state.traits.contains(Traits::PACK_LEADER)
            && !ctx.state.pack_members.is_empty()
            && !ctx.body.is_moving()
            && !ctx.on_cooldown(BehaviorId::PackLeader)
    }

    fn execute(&mut self, ctx: &mut BehaviorContext<'_>) {
        if self.reached(ctx.body.tile) {
            self.destination = Self::pick_destination(ctx);
            if let Some(dest) = self.destination {
                debug!(
                    "[AI] pack leader {} heads for ({}, {}) with {} members",
                    ctx.state.owner,
                    dest.x,
                    dest.y,
                    ctx.state.pack_members.len()
                );
            }
        }

        if let Some(dest) = self.destination {
            if ctx.step_toward(dest, AxisPolicy::RandomAmongNeeded) {
                ctx.state.mode = AiMode::Wandering;
            }
        }
        ctx.state
            .cooldowns
            .set(BehaviorId::PackLeader, ctx.config.pack_leader_interval);
    }
}

/// Keep up with the pack leader
#[derive(Debug, Clone, Copy, Default)]
pub struct FollowPack;

impl FollowPack {
    /// Leader within follow range, resolved through a range query
    fn locate_leader(ctx: &BehaviorContext<'_>) -> Option<crate::simulation::neighbors::NeighborInfo> {
        let leader = ctx.state.pack_leader?;
        let radius = ctx.config.max_follow_distance * ctx.tile_size();
        ctx.neighbors
            .in_range(ctx.body.position, radius)
            .into_iter()
            .find(|n| n.id == leader)
    }
}

impl BehaviorStrategy for FollowPack {
    fn can_execute(&mut self, ctx: &mut BehaviorContext<'_>) -> bool {
        if !ctx.state.traits.contains(Traits::FOLLOWER)
            || ctx.body.is_moving()
            || ctx.on_cooldown(BehaviorId::FollowPack)
        {
            return false;
        }
        let follow_distance = ctx.config.follow_distance * ctx.tile_size();
        Self::locate_leader(ctx)
            .map_or(false, |leader| ctx.body.position.distance(&leader.position) > follow_distance)
    }

    fn execute(&mut self, ctx: &mut BehaviorContext<'_>) {
        let Some(leader) = Self::locate_leader(ctx) else {
            return;
        };
        if ctx.step_toward(leader.tile, AxisPolicy::Dominant) {
            ctx.state.mode = AiMode::Following;
            ctx.state
                .cooldowns
                .set(BehaviorId::FollowPack, ctx.config.follow_cooldown);
        }
    }
}
