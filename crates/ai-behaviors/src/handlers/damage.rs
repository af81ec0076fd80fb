use ai_core::{HandlerKey, Lifetime, TickContext};
use ai_motion::{MotionWorld, MovementSolver};

use super::walk;
use crate::{keys, AgentConfig};

/// Stands still under gravity for `damage_duration`, then hands control back.
#[derive(Debug, Clone)]
pub struct DamageResponse {
    solver: MovementSolver,
    lifetime: Lifetime,
}

impl DamageResponse {
    pub fn new(config: &AgentConfig) -> Self {
        Self {
            solver: MovementSolver::new(config.standing()),
            lifetime: config.damage_lifetime(),
        }
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// Hits while already reeling are ignored.
    pub fn may_follow(previous: Option<HandlerKey>) -> bool {
        previous != Some(keys::DAMAGED)
    }

    pub fn update<W: MotionWorld>(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
    ) -> bool {
        walk(&mut self.solver, ctx, agent, world, None).is_some()
    }
}
