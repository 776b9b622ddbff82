use rand::Rng;
use tracing::info;

use super::{BehaviorContext, BehaviorStrategy};
use crate::actions::catalog::BehaviorId;
use crate::simulation::controller::AiMode;
use crate::simulation::movement::AxisPolicy;

/// Step toward a player standing inside the territory
#[derive(Debug, Clone, Default)]
pub struct Territorial {
    defending: bool,
}

impl BehaviorStrategy for Territorial {
    fn can_execute(&mut self, ctx: &mut BehaviorContext<'_>) -> bool {
        let eligible = !ctx.body.is_moving()
            && !ctx.on_cooldown(BehaviorId::Territorial)
            && ctx.player_in_territory();
        if !eligible {
            self.defending = false;
        }
        eligible
    }

    fn execute(&mut self, ctx: &mut BehaviorContext<'_>) {
        let Some(target) = ctx.player_tile() else {
            return;
        };
        if !self.defending {
            info!("[AI] {} is defending its territory", ctx.state.owner);
            self.defending = true;
        }
        if ctx.step_toward(target, AxisPolicy::Dominant) {
            ctx.state.mode = AiMode::Approaching;
        }
    }
}

/// Committed chase of an intruder
#[derive(Debug, Clone, Default)]
pub struct DefendTerritory {
    chasing: bool,
    steps_left: u32,
}

impl DefendTerritory {
    pub fn is_chasing(&self) -> bool {
        self.chasing
    }

    fn intruder_present(ctx: &BehaviorContext<'_>) -> bool {
        ctx.player_in_territory()
            && ctx
                .player_distance()
                .map_or(false, |d| d <= ctx.config.defend_chase_distance)
    }

    fn end_chase(&mut self, ctx: &mut BehaviorContext<'_>) {
        if self.chasing {
            info!("[AI] {} stops chasing", ctx.state.owner);
        }
        self.chasing = false;
        self.steps_left = 0;
        ctx.state
            .cooldowns
            .set(BehaviorId::DefendTerritory, ctx.config.defend_cooldown);
    }
}

impl BehaviorStrategy for DefendTerritory {
    fn can_execute(&mut self, ctx: &mut BehaviorContext<'_>) -> bool {
        if ctx.body.is_moving() || ctx.on_cooldown(BehaviorId::DefendTerritory) || ctx.player.is_none() {
            return false;
        }
        (self.chasing && self.steps_left > 0) || Self::intruder_present(ctx)
    }

    fn execute(&mut self, ctx: &mut BehaviorContext<'_>) {
        if !Self::intruder_present(ctx) {
            self.end_chase(ctx);
            return;
        }
        let Some(target) = ctx.player_tile() else {
            return;
        };

        if !self.chasing {
            self.chasing = true;
            self.steps_left = ctx
                .rng
                .gen_range(ctx.config.defend_min_steps..=ctx.config.defend_max_steps);
            info!(
                "[AI] {} chases intruder for {} steps",
                ctx.state.owner, self.steps_left
            );
        }

        if ctx.step_toward(target, AxisPolicy::RandomAmongNeeded) {
            ctx.state.mode = AiMode::Approaching;
        }
        self.steps_left = self.steps_left.saturating_sub(1);
        if self.steps_left == 0 {
            self.end_chase(ctx);
        }
    }
}
