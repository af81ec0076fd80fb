//! One module per behavior. Each handler is a plain struct; [`Behavior`](crate::Behavior) wraps
//! them for the stack.

mod chase;
mod damage;
mod follower;
mod patrol;
mod projectile;
mod runner;
mod shooter;

pub use chase::{Axis, AxisLockedChase, Chase};
pub use damage::DamageResponse;
pub use follower::FlyingFollower;
pub use patrol::Patrol;
pub use projectile::BallisticProjectile;
pub use runner::{JumpingRunner, Runner};
pub use shooter::{StationaryShooter, TargetedShooter};

use ai_core::{AgentId, TickContext};
use ai_motion::{MotionWorld, MoveResult, MovementSolver};

use crate::BehaviorError;

/// The required `target`, as long as the world can locate it.
fn known_target<W: MotionWorld>(
    role: &'static str,
    target: Option<W::Agent>,
    world: &W,
) -> Result<W::Agent, BehaviorError> {
    let target = target.ok_or(BehaviorError::MissingTarget { role })?;
    if world.position(target).is_none() {
        return Err(BehaviorError::UnknownTarget {
            role,
            target: target.stable_id(),
        });
    }
    Ok(target)
}

/// One movement step for `agent`, or `None` (logged) when the world has lost it.
fn walk<W: MotionWorld>(
    solver: &mut MovementSolver,
    ctx: &TickContext,
    agent: W::Agent,
    world: &mut W,
    jump: Option<f32>,
) -> Option<MoveResult> {
    let result = solver.step_agent(ctx.dt(), agent, world, jump);
    if result.is_none() {
        tracing::warn!(agent = ?agent, "agent missing from world; completing handler");
    }
    result
}

/// Turn `agent` to face `direction` without touching its velocity.
fn face<W: MotionWorld>(agent: W::Agent, world: &mut W, direction: ai_motion::Direction) {
    if let Some(mut kinematics) = world.kinematics(agent) {
        if kinematics.direction != direction {
            kinematics.direction = direction;
            world.set_kinematics(agent, kinematics);
        }
    }
}
