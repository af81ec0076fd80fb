use ai_core::{AgentId, TickContext};
use ai_motion::{Direction, MotionWorld, Vec2};

use super::known_target;
use crate::{AgentConfig, BehaviorError};

/// Flies toward the target with smoothed velocity and no gravity.
#[derive(Debug, Clone)]
pub struct FlyingFollower<A> {
    target: A,
    speed: f32,
    smoothing: f32,
    arrival_distance: f32,
    velocity: Vec2,
}

impl<A: AgentId> FlyingFollower<A> {
    pub fn new<W>(
        config: &AgentConfig,
        target: Option<A>,
        world: &W,
    ) -> Result<Self, BehaviorError>
    where
        W: MotionWorld<Agent = A>,
    {
        Ok(Self {
            target: known_target("flying follower", target, world)?,
            speed: config.speed,
            smoothing: config.follow_smoothing,
            arrival_distance: config.arrival_distance,
            velocity: Vec2::ZERO,
        })
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn update<W>(&mut self, ctx: &TickContext, agent: A, world: &mut W) -> bool
    where
        W: MotionWorld<Agent = A>,
    {
        let (Some(from), Some(to)) = (world.position(agent), world.position(self.target)) else {
            tracing::debug!(agent = ?agent, target = ?self.target, "follow target lost");
            return false;
        };
        let dt = ctx.dt();
        let offset = to - from;
        let desired = if offset.length() <= self.arrival_distance {
            Vec2::ZERO
        } else {
            offset.normalize_or_zero() * self.speed
        };
        let blend = (self.smoothing * dt).clamp(0.0, 1.0);
        self.velocity = self.velocity.lerp(desired, blend);

        world.move_agent(agent, self.velocity * dt);
        if let Some(mut kinematics) = world.kinematics(agent) {
            kinematics.velocity = self.velocity;
            if let Some(direction) = Direction::from_sign(self.velocity.x) {
                kinematics.direction = direction;
            }
            world.set_kinematics(agent, kinematics);
        }
        true
    }
}
