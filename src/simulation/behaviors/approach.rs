use rand::Rng;

use super::{BehaviorContext, BehaviorStrategy};
use crate::actions::catalog::BehaviorId;
use crate::entity::personality::Traits;
use crate::simulation::controller::AiMode;
use crate::simulation::movement::AxisPolicy;

/// Edge toward the player, stopping at a standoff distance
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproachPlayer;

impl BehaviorStrategy for ApproachPlayer {
    fn can_execute(&mut self, ctx: &mut BehaviorContext<'_>) -> bool {
        if !ctx
            .state
            .traits
            .intersects(Traits::AGGRESSIVE | Traits::CURIOUS)
        {
            return false;
        }
        if ctx.body.is_moving() || ctx.on_cooldown(BehaviorId::ApproachPlayer) {
            return false;
        }
        let Some(distance) = ctx.player_distance() else {
            return false;
        };
        if distance > ctx.config.approach_range || distance <= ctx.config.approach_optimal_distance {
            return false;
        }
        let roll: f32 = ctx.rng.gen();
        roll < ctx.state.approach_factor * ctx.config.approach_roll_scale
    }

    fn execute(&mut self, ctx: &mut BehaviorContext<'_>) {
        let Some(target) = ctx.player_tile() else {
            return;
        };
        if ctx.step_toward(target, AxisPolicy::RandomAmongNeeded) {
            ctx.state.mode = AiMode::Approaching;
            ctx.state
                .cooldowns
                .set(BehaviorId::ApproachPlayer, ctx.config.approach_cooldown);
        }
    }
}
