use rand::Rng;

use super::{BehaviorContext, BehaviorStrategy};
use crate::actions::catalog::BehaviorId;
use crate::core::types::TilePos;
use crate::entity::personality::Traits;
use crate::simulation::controller::AiMode;
use crate::simulation::movement::{self, AxisPolicy};

/// Walk to where the player was last seen
#[derive(Debug, Clone, Default)]
pub struct Investigate {
    target: Option<TilePos>,
}

impl Investigate {
    pub fn target(&self) -> Option<TilePos> {
        self.target
    }

    fn finish(&mut self, ctx: &mut BehaviorContext<'_>) {
        self.target = None;
        ctx.state
            .cooldowns
            .set(BehaviorId::Investigate, ctx.config.investigate_cooldown);
    }
}

impl BehaviorStrategy for Investigate {
    fn can_execute(&mut self, ctx: &mut BehaviorContext<'_>) -> bool {
        if !ctx.state.traits.contains(Traits::CURIOUS)
            || ctx.body.is_moving()
            || ctx.on_cooldown(BehaviorId::Investigate)
        {
            return false;
        }
        if self.target.is_some() {
            return true;
        }
        ctx.player.is_some() && ctx.rng.gen::<f32>() < ctx.config.investigate_chance
    }

    fn execute(&mut self, ctx: &mut BehaviorContext<'_>) {
        let target = match self.target {
            Some(target) => target,
            None => {
                let in_range = ctx
                    .player_distance()
                    .map_or(false, |d| d <= ctx.config.investigate_range);
                match ctx.player_tile() {
                    Some(tile) if in_range => {
                        self.target = Some(tile);
                        tile
                    }
                    _ => return,
                }
            }
        };

        if ctx.body.tile == target {
            self.finish(ctx);
            return;
        }

        // Single dominant-axis attempt; a blocked path ends the errand
        let next = movement::directions_toward(ctx.body.tile, target, AxisPolicy::Dominant, &mut *ctx.rng)
            .into_iter()
            .next();
        match next {
            Some(dir) if ctx.try_step(dir) => ctx.state.mode = AiMode::Investigating,
            _ => self.target = None,
        }
    }
}
