use rand::Rng;
use tracing::debug;

use super::{BehaviorContext, BehaviorStrategy};
use crate::actions::catalog::BehaviorId;
use crate::entity::personality::Traits;
use crate::simulation::controller::{InteractionFlavor, SocialInteraction};

/// Occasionally greet, sniff at or challenge a resting neighbor
#[derive(Debug, Clone, Copy, Default)]
pub struct Social;

impl BehaviorStrategy for Social {
    fn can_execute(&mut self, ctx: &mut BehaviorContext<'_>) -> bool {
        if ctx.state.traits.contains(Traits::SOLITARY)
            || ctx.body.is_moving()
            || ctx.on_cooldown(BehaviorId::Social)
        {
            return false;
        }
        ctx.rng.gen::<f32>() < ctx.config.social_chance
    }

    fn execute(&mut self, ctx: &mut BehaviorContext<'_>) {
        let radius = ctx.config.social_range * ctx.tile_size();
        let owner = ctx.state.owner;
        let partner = ctx
            .neighbors
            .in_range(ctx.body.position, radius)
            .into_iter()
            .find(|n| n.id != owner && !n.moving);

        if let Some(partner) = partner {
            let flavor = InteractionFlavor::for_traits(ctx.state.traits);
            debug!("[AI] {} {:?} interaction with {}", owner, flavor, partner.id);
            ctx.state.interaction = Some(SocialInteraction {
                partner: partner.id,
                flavor,
            });
            ctx.state
                .cooldowns
                .set(BehaviorId::Social, ctx.config.social_cooldown);
        }
    }
}
