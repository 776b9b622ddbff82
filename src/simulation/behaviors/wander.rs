use rand::seq::SliceRandom;
use rand::Rng;

use super::{BehaviorContext, BehaviorStrategy};
use crate::actions::catalog::BehaviorId;
use crate::core::types::Direction;
use crate::entity::personality::Traits;
use crate::simulation::controller::AiMode;

/// Short straight walks in a random cardinal direction
#[derive(Debug, Clone, Default)]
pub struct Wander {
    direction: Option<Direction>,
    steps_left: u32,
}

impl Wander {
    fn finish(&mut self, ctx: &mut BehaviorContext<'_>) {
        self.direction = None;
        self.steps_left = 0;
        let pause = ctx
            .rng
            .gen_range(ctx.config.wander_min_pause..=ctx.config.wander_max_pause);
        ctx.state.cooldowns.set(BehaviorId::Wander, pause);
    }
}

impl BehaviorStrategy for Wander {
    fn can_execute(&mut self, ctx: &mut BehaviorContext<'_>) -> bool {
        !ctx.body.is_moving() && !ctx.on_cooldown(BehaviorId::Wander)
    }

    fn execute(&mut self, ctx: &mut BehaviorContext<'_>) {
        let direction = match self.direction {
            Some(dir) if self.steps_left > 0 => dir,
            _ => {
                let dir = *Direction::ALL.choose(&mut *ctx.rng).unwrap_or(&Direction::Down);
                self.direction = Some(dir);
                self.steps_left = ctx
                    .rng
                    .gen_range(ctx.config.wander_min_steps..=ctx.config.wander_max_steps);
                dir
            }
        };

        // Territorial creatures stay home
        let target = ctx.body.tile.step(direction);
        if ctx.state.traits.contains(Traits::TERRITORIAL) && !ctx.state.territory.contains_tile(target) {
            self.finish(ctx);
            return;
        }

        if ctx.try_step(direction) {
            ctx.state.mode = AiMode::Wandering;
            self.steps_left -= 1;
            if self.steps_left == 0 {
                self.finish(ctx);
            }
        } else {
            self.finish(ctx);
        }
    }
}
