//! Contract with the collision/physics engine.
//!
//! The motion layer does no geometry of its own: grounded/blocked state and the actual
//! displacement of a body both come from the host through [`PhysicsWorld`].

use ai_core::WorldMut;

use crate::{Direction, Vec2};

/// Contact flags reported by the physics engine after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Collisions {
    pub below: bool,
    pub left: bool,
    pub right: bool,
}

impl Collisions {
    pub fn grounded(self) -> bool {
        self.below
    }

    pub fn blocked_toward(self, direction: Direction) -> bool {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn any(self) -> bool {
        self.below || self.left || self.right
    }
}

/// Mutable kinematic state of an agent. `velocity.y` is the vertical velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Kinematics {
    pub direction: Direction,
    pub velocity: Vec2,
}

impl Kinematics {
    pub fn facing(direction: Direction) -> Self {
        Self {
            direction,
            velocity: Vec2::ZERO,
        }
    }
}

pub trait PhysicsWorld: WorldMut {
    /// Contacts left over from the agent's most recent move.
    fn collisions(&self, agent: Self::Agent) -> Collisions;

    /// Move the agent by `displacement`, resolving collisions, and report the resulting contacts.
    fn move_agent(&mut self, agent: Self::Agent, displacement: Vec2) -> Collisions;

    /// Whether there is ground just past the agent's leading edge in `direction`.
    fn is_grounded_ahead(&self, agent: Self::Agent, direction: Direction) -> bool;
}

pub trait MotionWorld: PhysicsWorld {
    fn position(&self, agent: Self::Agent) -> Option<Vec2>;

    /// Teleport without collision resolution (spawns, respawns).
    fn set_position(&mut self, agent: Self::Agent, position: Vec2);

    fn kinematics(&self, agent: Self::Agent) -> Option<Kinematics>;

    fn set_kinematics(&mut self, agent: Self::Agent, kinematics: Kinematics);
}
