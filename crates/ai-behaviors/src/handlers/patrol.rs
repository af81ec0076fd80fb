use ai_core::{AgentId, TickContext};
use ai_motion::{EdgePolicy, MovementSolver};
use ai_perception::PerceptionScanner;

use super::walk;
use crate::{AgentConfig, Behavior, BehaviorStack, Chase, PlatformerWorld};

/// Walks its platform end to end, turning at edges and walls.
///
/// Given a target it also scans for it and pushes a [`Chase`] once the target has been in
/// sight for `detect_player_duration`.
#[derive(Debug, Clone)]
pub struct Patrol<A> {
    config: AgentConfig,
    solver: MovementSolver,
    watch: Option<(A, PerceptionScanner)>,
}

impl<A: AgentId> Patrol<A> {
    pub fn new(config: &AgentConfig, target: Option<A>) -> Self {
        Self {
            config: *config,
            solver: MovementSolver::new(config.movement(EdgePolicy::TurnAround)),
            watch: target.map(|t| {
                (
                    t,
                    PerceptionScanner::new(config.scan(), config.detect_threshold()),
                )
            }),
        }
    }

    pub fn target(&self) -> Option<A> {
        self.watch.as_ref().map(|(t, _)| *t)
    }

    pub fn update<W>(
        &mut self,
        ctx: &TickContext,
        agent: A,
        world: &mut W,
        stack: &mut BehaviorStack<W>,
    ) -> bool
    where
        W: PlatformerWorld<Agent = A> + 'static,
    {
        if walk(&mut self.solver, ctx, agent, world, None).is_none() {
            return false;
        }

        let Some((target, scanner)) = self.watch.as_mut() else {
            return true;
        };
        let target = *target;
        let sight = scanner.scan(ctx.dt(), agent, target, world);
        if scanner.is_detected(sight) {
            scanner.reset();
            let chase = Behavior::Chase(Chase::new(&self.config, target));
            if stack.push(chase, agent, world) {
                tracing::debug!(
                    agent = ?agent,
                    target = ?target,
                    sight = sight.sight_duration,
                    "target spotted; chasing"
                );
            }
        }
        true
    }
}
