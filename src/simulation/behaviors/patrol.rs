use super::{BehaviorContext, BehaviorStrategy};
use crate::actions::catalog::BehaviorId;
use crate::simulation::controller::AiMode;
use crate::simulation::movement::AxisPolicy;

/// Walk the territory's waypoint loop
#[derive(Debug, Clone, Copy, Default)]
pub struct Patrol;

impl BehaviorStrategy for Patrol {
    fn can_execute(&mut self, ctx: &mut BehaviorContext<'_>) -> bool {
        if ctx.state.patrol.is_empty() || ctx.body.is_moving() || ctx.on_cooldown(BehaviorId::Patrol) {
            return false;
        }
        // Engaging needs a settled creature; continuing does not
        ctx.state.active == Some(BehaviorId::Patrol)
            || ctx.state.state_timer > ctx.config.patrol_min_state_time
    }

    fn execute(&mut self, ctx: &mut BehaviorContext<'_>) {
        let Some(waypoint) = ctx.state.patrol.current() else {
            return;
        };

        if ctx.body.tile == waypoint {
            ctx.state.patrol.advance();
            ctx.state
                .cooldowns
                .set(BehaviorId::Patrol, ctx.config.patrol_waypoint_pause);
            return;
        }

        if ctx.step_toward(waypoint, AxisPolicy::Dominant) {
            ctx.state.mode = AiMode::Patrolling;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use super::*;
    use crate::core::types::TilePos;
    use crate::entity::personality::Traits;
    use crate::simulation::controller::PatrolRoute;

    fn patroller() -> Harness {
        let mut h = Harness::new(Traits::TERRITORIAL, TilePos::new(0, 0));
        h.state.patrol = PatrolRoute::new(vec![TilePos::new(2, 0), TilePos::new(0, 2)]);
        h
    }

    #[test]
    fn test_patrol_waits_for_state_time() {
        let mut h = patroller();
        h.state.state_timer = 1.0;
        assert!(!Patrol.can_execute(&mut h.ctx()));
        h.state.state_timer = 3.5;
        assert!(Patrol.can_execute(&mut h.ctx()));
    }

    #[test]
    fn test_patrol_advances_at_waypoint() {
        let mut h = patroller();
        h.state.active = Some(BehaviorId::Patrol);

        Patrol.execute(&mut h.ctx());
        h.land();
        Patrol.execute(&mut h.ctx());
        h.land();
        assert_eq!(h.body.tile, TilePos::new(2, 0));

        Patrol.execute(&mut h.ctx());
        assert_eq!(h.state.patrol.index(), 1);
        assert!(h.state.cooldowns.is_active(BehaviorId::Patrol));
    }

    #[test]
    fn test_patrol_falls_back_to_other_axis() {
        let mut h = patroller();
        h.state.patrol = PatrolRoute::new(vec![TilePos::new(3, 1)]);
        h.world.blocked.insert(TilePos::new(1, 0));
        Patrol.execute(&mut h.ctx());
        assert_eq!(h.body.tile, TilePos::new(0, 1));
        assert_eq!(h.state.mode, AiMode::Patrolling);
    }
}
