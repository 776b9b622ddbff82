use rand::Rng;
use tracing::debug;

use super::{BehaviorContext, BehaviorStrategy};
use crate::actions::catalog::BehaviorId;
use crate::core::types::Direction;
use crate::simulation::controller::AiMode;
use crate::simulation::movement;

/// Run straight away from a player who came too close
#[derive(Debug, Clone, Default)]
pub struct Flee {
    direction: Option<Direction>,
    steps_left: u32,
}

impl Flee {
    pub fn steps_left(&self) -> u32 {
        self.steps_left
    }

    fn stop(&mut self, ctx: &mut BehaviorContext<'_>) {
        self.steps_left = 0;
        self.direction = None;
        ctx.state.cooldowns.set(BehaviorId::Flee, ctx.config.flee_cooldown);
    }
}

impl BehaviorStrategy for Flee {
    fn can_execute(&mut self, ctx: &mut BehaviorContext<'_>) -> bool {
        if ctx.body.is_moving() || ctx.on_cooldown(BehaviorId::Flee) {
            return false;
        }
        match ctx.player_distance() {
            Some(distance) => self.steps_left > 0 || distance < ctx.state.flee_threshold,
            None => false,
        }
    }

    fn execute(&mut self, ctx: &mut BehaviorContext<'_>) {
        if self.steps_left == 0 {
            let Some(player) = ctx.player_tile() else {
                return;
            };
            self.direction = Some(movement::away_from(ctx.body.tile, player));
            self.steps_left = ctx
                .rng
                .gen_range(ctx.config.flee_min_steps..=ctx.config.flee_max_steps);
            debug!("[AI] {} flees for {} steps", ctx.state.owner, self.steps_left);
        }

        let preferred = self.direction.unwrap_or(Direction::Right);
        let escape = std::iter::once(preferred)
            .chain(Direction::ALL.into_iter().filter(|d| *d != preferred))
            .find(|dir| ctx.try_step(*dir));

        match escape {
            Some(dir) => {
                self.direction = Some(dir);
                self.steps_left -= 1;
                ctx.state.mode = AiMode::Fleeing;
                if self.steps_left == 0 {
                    self.stop(ctx);
                }
            }
            // Cornered
            None => self.stop(ctx),
        }
    }
}
