use ai_core::TickContext;
use ai_motion::{
    jump_velocity, EdgePolicy, LandingEvents, MotionWorld, MovementSolver, Subscription,
};

use super::walk;
use crate::AgentConfig;

/// Runs straight ahead and drops off ledges.
#[derive(Debug, Clone)]
pub struct Runner {
    solver: MovementSolver,
}

impl Runner {
    pub fn new(config: &AgentConfig) -> Self {
        Self {
            solver: MovementSolver::new(config.movement(EdgePolicy::FallOff)),
        }
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

/// A [`Runner`] that jumps every `jump_interval` seconds.
///
/// A jump needs the agent grounded and re-armed by a landing event since the previous jump. The
/// landing subscription is taken on construction and handed back on dispose, so this type is not
/// `Clone`.
#[derive(Debug)]
pub struct JumpingRunner {
    solver: MovementSolver,
    launch_speed: f32,
    interval: f32,
    next_jump_at: Option<f32>,
    armed: bool,
    subscription: Option<Subscription>,
}

impl JumpingRunner {
    pub fn new<W: LandingEvents>(config: &AgentConfig, agent: W::Agent, world: &mut W) -> Self {
        Self {
            solver: MovementSolver::new(config.movement(EdgePolicy::FallOff)),
            launch_speed: jump_velocity(config.gravity, config.jump_height),
            interval: config.jump_interval.max(0.0),
            next_jump_at: None,
            armed: true,
            subscription: Some(world.subscribe_landed(agent)),
        }
    }

    pub fn launch_speed(&self) -> f32 {
        self.launch_speed
    }

    pub fn subscription(&self) -> Option<Subscription> {
        self.subscription
    }

    pub fn update<W>(&mut self, ctx: &TickContext, agent: W::Agent, world: &mut W) -> bool
    where
        W: MotionWorld + LandingEvents,
    {
        if let Some(subscription) = self.subscription {
            if world.take_landed(subscription) {
                self.armed = true;
            }
        }

        let now = ctx.time_seconds;
        let next_jump_at = *self.next_jump_at.get_or_insert(now + self.interval);
        let grounded = world.collisions(agent).grounded();

        let jump = if self.armed && grounded && now >= next_jump_at {
            self.armed = false;
            self.next_jump_at = Some(now + self.interval);
            tracing::debug!(agent = ?agent, speed = self.launch_speed, "jump");
            Some(self.launch_speed)
        } else {
            None
        };

        walk(&mut self.solver, ctx, agent, world, jump).is_some()
    }

    pub fn dispose<W: LandingEvents>(&mut self, _agent: W::Agent, world: &mut W) {
        if let Some(subscription) = self.subscription.take() {
            world.unsubscribe(subscription);
        }
    }
}
