use ai_core::{AgentId, HandlerKey, Lifetime, TickContext};
use ai_motion::{Direction, EdgePolicy, MotionWorld, MovementSolver, Vec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{face, known_target, walk};
use crate::{keys, AgentConfig, BehaviorError};

/// Runs at the target for `total_chase_duration` seconds, falling off ledges on the way.
#[derive(Debug, Clone)]
pub struct Chase<A> {
    target: A,
    solver: MovementSolver,
    lifetime: Lifetime,
}

impl<A: AgentId> Chase<A> {
    pub fn new(config: &AgentConfig, target: A) -> Self {
        Self {
            target,
            solver: MovementSolver::new(config.movement(EdgePolicy::FallOff)),
            lifetime: config.chase_lifetime(),
        }
    }

    pub fn target(&self) -> A {
        self.target
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// A chase never stacks on another chase or interrupts a damage response.
    pub fn may_follow(previous: Option<HandlerKey>) -> bool {
        previous != Some(keys::CHASE) && previous != Some(keys::DAMAGED)
    }

    pub fn update<W>(&mut self, ctx: &TickContext, agent: A, world: &mut W) -> bool
    where
        W: MotionWorld<Agent = A>,
    {
        let (Some(from), Some(to)) = (world.position(agent), world.position(self.target)) else {
            tracing::debug!(agent = ?agent, target = ?self.target, "chase target lost");
            return false;
        };
        if let Some(direction) = Direction::toward(from.x, to.x) {
            face(agent, world, direction);
        }
        walk(&mut self.solver, ctx, agent, world, None).is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn component(self, v: Vec2) -> f32 {
        match self {
            Axis::Horizontal => v.x,
            Axis::Vertical => v.y,
        }
    }

    pub fn unit(self) -> Vec2 {
        match self {
            Axis::Horizontal => Vec2::X,
            Axis::Vertical => Vec2::Y,
        }
    }
}

/// Slides along one axis to match the target's coordinate on it, ignoring gravity.
///
/// Never overshoots: the last step lands exactly on the target coordinate.
#[derive(Debug, Clone)]
pub struct AxisLockedChase<A> {
    target: A,
    axis: Axis,
    speed: f32,
}

impl<A: AgentId> AxisLockedChase<A> {
    pub fn new<W>(
        config: &AgentConfig,
        axis: Axis,
        target: Option<A>,
        world: &W,
    ) -> Result<Self, BehaviorError>
    where
        W: MotionWorld<Agent = A>,
    {
        Ok(Self {
            target: known_target("axis-locked chase", target, world)?,
            axis,
            speed: config.speed,
        })
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn update<W>(&mut self, ctx: &TickContext, agent: A, world: &mut W) -> bool
    where
        W: MotionWorld<Agent = A>,
    {
        let (Some(from), Some(to)) = (world.position(agent), world.position(self.target)) else {
            return false;
        };
        let dt = ctx.dt();
        let reach = self.speed * dt;
        let gap = self.axis.component(to) - self.axis.component(from);
        let step = gap.clamp(-reach, reach);
        let displacement = self.axis.unit() * step;

        if step != 0.0 {
            world.move_agent(agent, displacement);
        }
        if let Some(mut kinematics) = world.kinematics(agent) {
            kinematics.velocity = if dt > 0.0 { displacement / dt } else { Vec2::ZERO };
            if self.axis == Axis::Horizontal {
                if let Some(direction) = Direction::from_sign(step) {
                    kinematics.direction = direction;
                }
            }
            world.set_kinematics(agent, kinematics);
        }
        true
    }
}
