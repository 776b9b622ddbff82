use rand::Rng;

use super::{BehaviorContext, BehaviorStrategy};
use crate::actions::catalog::BehaviorId;
use crate::simulation::controller::AiMode;

/// Stand still for a random dwell. Always available when not moving.
///
/// The dwell is drawn on entry and holds Wander off until it runs out.
#[derive(Debug, Clone, Default)]
pub struct Idle {
    dwell: f32,
}

impl Idle {
    pub fn dwell(&self) -> f32 {
        self.dwell
    }
}

impl BehaviorStrategy for Idle {
    fn can_execute(&mut self, ctx: &mut BehaviorContext<'_>) -> bool {
        !ctx.body.is_moving()
    }

    fn execute(&mut self, ctx: &mut BehaviorContext<'_>) {
        // state_timer is zeroed whenever Idle takes over
        if ctx.state.state_timer <= 0.0 || self.dwell <= 0.0 {
            self.dwell = ctx
                .rng
                .gen_range(ctx.config.idle_min_seconds..=ctx.config.idle_max_seconds);
            if ctx.state.cooldowns.remaining(BehaviorId::Wander) < self.dwell {
                ctx.state.cooldowns.set(BehaviorId::Wander, self.dwell);
            }
        }
        ctx.state.mode = AiMode::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use super::super::wander::Wander;
    use super::*;
    use crate::core::types::TilePos;
    use crate::entity::personality::Traits;

    #[test]
    fn test_idle_draws_dwell_in_range() {
        let mut h = Harness::new(Traits::LAZY, TilePos::new(0, 0));
        let mut idle = Idle::default();
        let mut ctx = h.ctx();
        assert!(idle.can_execute(&mut ctx));
        idle.execute(&mut ctx);
        assert!((0.3..=1.2).contains(&idle.dwell()));
        assert_eq!(ctx.state.mode, AiMode::Idle);
        assert!(!ctx.body.is_moving());
    }

    #[test]
    fn test_dwell_holds_off_wander_until_it_runs_out() {
        let mut h = Harness::new(Traits::PASSIVE, TilePos::new(0, 0));
        h.state.cooldowns.set(BehaviorId::Wander, 0.1);
        let mut idle = Idle::default();
        idle.execute(&mut h.ctx());
        let dwell = idle.dwell();
        assert!((h.state.cooldowns.remaining(BehaviorId::Wander) - dwell).abs() < 1e-6);

        let mut wander = Wander::default();
        h.state.cooldowns.tick(dwell - 0.05);
        assert!(!wander.can_execute(&mut h.ctx()));
        h.state.cooldowns.tick(0.1);
        assert!(wander.can_execute(&mut h.ctx()));
    }

    #[test]
    fn test_staying_idle_does_not_extend_the_hold() {
        let mut h = Harness::new(Traits::PASSIVE, TilePos::new(0, 0));
        let mut idle = Idle::default();
        idle.execute(&mut h.ctx());
        let first = idle.dwell();

        h.state.state_timer = 0.2;
        h.state.cooldowns.tick(0.2);
        idle.execute(&mut h.ctx());
        assert_eq!(idle.dwell(), first);
        assert!((h.state.cooldowns.remaining(BehaviorId::Wander) - (first - 0.2)).abs() < 1e-5);
    }

    #[test]
    fn test_longer_wander_pause_is_kept() {
        let mut h = Harness::new(Traits::PASSIVE, TilePos::new(0, 0));
        h.state.cooldowns.set(BehaviorId::Wander, 5.0);
        Idle::default().execute(&mut h.ctx());
        assert_eq!(h.state.cooldowns.remaining(BehaviorId::Wander), 5.0);
    }
}
