//! Horizontal platform locomotion with edge handling, gravity and jumps.

use crate::{Collisions, Kinematics, MotionWorld, PhysicsWorld, Vec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What a grounded agent does when the next step would leave its platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EdgePolicy {
    /// Reverse direction (after the optional edge pause). Walls also turn the agent around.
    #[default]
    TurnAround,
    /// Keep walking and fall.
    FallOff,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementConfig {
    pub speed: f32,
    /// Magnitude of downward acceleration.
    pub gravity: f32,
    pub edge_policy: EdgePolicy,
    /// Seconds spent idling at an edge before turning around.
    pub edge_pause: f32,
}

impl MovementConfig {
    pub fn new(speed: f32, gravity: f32, edge_policy: EdgePolicy) -> Self {
        Self {
            speed,
            gravity,
            edge_policy,
            edge_pause: 0.0,
        }
    }

    pub fn with_edge_pause(mut self, seconds: f32) -> Self {
        self.edge_pause = seconds.max(0.0);
        self
    }
}

/// Outcome of one [`MovementSolver::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    pub collisions: Collisions,
    /// A grounded agent had no ground ahead in its direction of travel.
    pub edge_ahead: bool,
    /// Direction was reversed this step.
    pub turned: bool,
    pub velocity: Vec2,
}

impl MoveResult {
    pub fn grounded(&self) -> bool {
        self.collisions.below
    }
}

/// Launch speed that peaks exactly `height` above the take-off point.
pub fn jump_velocity(gravity: f32, height: f32) -> f32 {
    (2.0 * gravity.max(0.0) * height.max(0.0)).sqrt()
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovementSolver {
    config: MovementConfig,
    /// Time left idling at an edge before turning.
    pause_left: Option<f32>,
}

impl MovementSolver {
    pub fn new(config: MovementConfig) -> Self {
        Self {
            config,
            pause_left: None,
        }
    }

    pub fn config(&self) -> MovementConfig {
        self.config
    }

    pub fn is_pausing(&self) -> bool {
        self.pause_left.is_some()
    }

    /// Advance one step, mutating `kinematics` in place.
    ///
    /// `jump` replaces the vertical velocity for this step instead of integrating gravity.
    pub fn step<W>(
        &mut self,
        dt: f32,
        agent: W::Agent,
        world: &mut W,
        kinematics: &mut Kinematics,
        jump: Option<f32>,
    ) -> MoveResult
    where
        W: PhysicsWorld,
    {
        let dt = dt.max(0.0);
        let contacts = world.collisions(agent);
        let grounded = contacts.grounded();

        let mut edge_ahead = false;
        let mut turned = false;
        let mut idle = false;

        if grounded {
            edge_ahead = !world.is_grounded_ahead(agent, kinematics.direction);
            let walled = contacts.blocked_toward(kinematics.direction);

            match self.config.edge_policy {
                EdgePolicy::TurnAround if edge_ahead || walled => {
                    match self.pause_left {
                        None if self.config.edge_pause > 0.0 => {
                            self.pause_left = Some(self.config.edge_pause);
                            idle = true;
                        }
                        Some(left) if left - dt > 0.0 => {
                            self.pause_left = Some(left - dt);
                            idle = true;
                        }
                        _ => {
                            self.pause_left = None;
                            kinematics.direction.flip();
                            turned = true;
                        }
                    }
                }
                _ => self.pause_left = None,
            }
        } else {
            self.pause_left = None;
        }

        match jump {
            Some(launch) => kinematics.velocity.y = launch,
            None => {
                if grounded && kinematics.velocity.y < 0.0 {
                    kinematics.velocity.y = 0.0;
                }
                kinematics.velocity.y -= self.config.gravity * dt;
            }
        }

        kinematics.velocity.x = if idle {
            0.0
        } else {
            kinematics.direction.sign() * self.config.speed
        };

        let collisions = world.move_agent(agent, kinematics.velocity * dt);
        if turned {
            tracing::trace!(agent = ?agent, direction = ?kinematics.direction, "turned around");
        }

        MoveResult {
            collisions,
            edge_ahead,
            turned,
            velocity: kinematics.velocity,
        }
    }

    /// [`step`](Self::step) reading and writing the agent's stored kinematics.
    ///
    /// Returns `None` when the world does not know the agent.
    pub fn step_agent<W>(
        &mut self,
        dt: f32,
        agent: W::Agent,
        world: &mut W,
        jump: Option<f32>,
    ) -> Option<MoveResult>
    where
        W: MotionWorld,
    {
        let mut kinematics = world.kinematics(agent)?;
        let result = self.step(dt, agent, world, &mut kinematics, jump);
        world.set_kinematics(agent, kinematics);
        Some(result)
    }
}
