#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::handlers::{
    Axis, AxisLockedChase, FlyingFollower, JumpingRunner, Patrol, Runner, StationaryShooter,
    TargetedShooter,
};
use crate::{AgentConfig, Behavior, BehaviorError, PlatformerWorld};

/// Kinds of enemy, each starting out with one behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Archetype {
    Patrol,
    Runner,
    JumpingRunner,
    FlyingFollower,
    HorizontalChaser,
    VerticalChaser,
    StationaryShooter,
    TargetedShooter,
}

impl Archetype {
    pub fn name(self) -> &'static str {
        match self {
            Archetype::Patrol => "patrol",
            Archetype::Runner => "runner",
            Archetype::JumpingRunner => "jumping runner",
            Archetype::FlyingFollower => "flying follower",
            Archetype::HorizontalChaser => "horizontal chaser",
            Archetype::VerticalChaser => "vertical chaser",
            Archetype::StationaryShooter => "stationary shooter",
            Archetype::TargetedShooter => "targeted shooter",
        }
    }

    /// Whether the archetype cannot be built without a target.
    pub fn requires_target(self) -> bool {
        !matches!(
            self,
            Archetype::Patrol | Archetype::Runner | Archetype::JumpingRunner
        )
    }

    pub fn initial_behavior<W>(
        self,
        config: &AgentConfig,
        agent: W::Agent,
        target: Option<W::Agent>,
        world: &mut W,
    ) -> Result<Behavior<W::Agent>, BehaviorError>
    where
        W: PlatformerWorld,
    {
        Ok(match self {
            Archetype::Patrol => Behavior::Patrol(Patrol::new(config, target)),
            Archetype::Runner => Behavior::Runner(Runner::new(config)),
            Archetype::JumpingRunner => {
                Behavior::JumpingRunner(JumpingRunner::new(config, agent, world))
            }
            Archetype::FlyingFollower => {
                Behavior::FlyingFollower(FlyingFollower::new(config, target, world)?)
            }
            Archetype::HorizontalChaser => Behavior::AxisLockedChase(AxisLockedChase::new(
                config,
                Axis::Horizontal,
                target,
                world,
            )?),
            Archetype::VerticalChaser => Behavior::AxisLockedChase(AxisLockedChase::new(
                config,
                Axis::Vertical,
                target,
                world,
            )?),
            Archetype::StationaryShooter => {
                Behavior::StationaryShooter(StationaryShooter::new(config, target, world)?)
            }
            Archetype::TargetedShooter => {
                Behavior::TargetedShooter(TargetedShooter::new(config, target, world)?)
            }
        })
    }
}
